// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::geometry::util::{EPS, WEIGHT_EPS};

/// Knobs shared by the 2D and 3D weight builders.
#[derive(Debug, Clone, PartialEq)]
pub struct RegridConfig {
    /// Target number of source cells per locator bucket.
    pub cells_per_bucket: usize,
    /// Find candidate source cells through a bucketed index of the source
    /// cell edges instead of the cell bounding boxes.
    pub use_edges_locator: bool,
    pub tolerance: f64,
    /// Weights at or below this magnitude are dropped.
    pub weight_threshold: f64,
    /// Longitude period (typically 360) for grids wrapping around the globe.
    pub periodicity: Option<f64>,
}

impl Default for RegridConfig {
    fn default() -> Self {
        Self {
            cells_per_bucket: 128,
            use_edges_locator: false,
            tolerance: EPS,
            weight_threshold: WEIGHT_EPS,
            periodicity: None,
        }
    }
}

impl RegridConfig {
    pub fn with_cells_per_bucket(mut self, n: usize) -> Self {
        self.cells_per_bucket = n.max(1);
        self
    }

    pub fn with_edges_locator(mut self, on: bool) -> Self {
        self.use_edges_locator = on;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_weight_threshold(mut self, threshold: f64) -> Self {
        self.weight_threshold = threshold;
        self
    }

    pub fn with_periodicity(mut self, period: f64) -> Self {
        self.periodicity = Some(period);
        self
    }
}
