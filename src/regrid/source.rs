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

use log::debug;
use smallvec::SmallVec;

use crate::{
    config::RegridConfig,
    geometry::{Point3, Vector3},
    mesh::{BucketCellLocator, CellLocator, EdgesLocator, Grid},
    regrid::polysegment::{PolysegmentIter, collect_sub_segments},
};

/// Index of the source cell edges, each tagged with its owning cell.
#[derive(Debug)]
struct EdgeIndex {
    locator: EdgesLocator,
    owners: Vec<usize>,
}

/// Source grid plus the search structures used to break destination edges
/// into sub-segments.
#[derive(Debug)]
pub struct SourceCells<'a> {
    grid: &'a Grid,
    locator: BucketCellLocator<'a>,
    edges: Option<EdgeIndex>,
    periodicity: Option<f64>,
    tol: f64,
}

impl<'a> SourceCells<'a> {
    pub fn new(grid: &'a Grid, config: &RegridConfig) -> Self {
        let locator = BucketCellLocator::with_tolerance(grid, config.cells_per_bucket, config.tolerance);
        let edges = config.use_edges_locator.then(|| build_edge_index(grid, config.cells_per_bucket));
        Self {
            grid,
            locator,
            edges,
            periodicity: config.periodicity,
            tol: config.tolerance,
        }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn locator(&self) -> &BucketCellLocator<'a> {
        &self.locator
    }

    /// Source cells that `p0 -> p1` may intersect.
    pub fn candidates(&self, p0: &Point3<f64>, p1: &Point3<f64>) -> Vec<usize> {
        let Some(index) = &self.edges else {
            return self.locator.candidate_cells(p0, p1);
        };
        // a segment meeting a cell either crosses one of its edges or starts
        // or ends inside it
        let mut cells: Vec<usize> = index
            .locator
            .edges_along_line(p0, p1)
            .into_iter()
            .map(|e| index.owners[e])
            .collect();
        cells.extend(self.locator.find_cell(p0).map(|(c, _)| c));
        cells.extend(self.locator.find_cell(p1).map(|(c, _)| c));
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Sub-segments of `p0 -> p1`, including copies shifted by one period
    /// when the grid is periodic in x.
    pub fn polysegment(&self, p0: &Point3<f64>, p1: &Point3<f64>) -> PolysegmentIter {
        let shifts: SmallVec<[f64; 3]> = match self.periodicity {
            Some(period) => SmallVec::from_buf([-period, 0.0, period]),
            None => SmallVec::from_slice(&[0.0]),
        };
        let mut segments = Vec::new();
        for shift in shifts {
            let offset = Vector3::new(shift, 0.0, 0.0);
            let (q0, q1) = (*p0 + offset, *p1 + offset);
            let candidates = self.candidates(&q0, &q1);
            collect_sub_segments(
                self.grid,
                &self.locator,
                &q0,
                &q1,
                &candidates,
                self.tol,
                &mut segments,
            );
        }
        PolysegmentIter::from_segments(segments, self.tol)
    }
}

fn build_edge_index(grid: &Grid, per_bucket: usize) -> EdgeIndex {
    let ne = grid.kind().num_edges();
    let mut edges = Vec::with_capacity(grid.num_cells() * ne);
    let mut owners = Vec::with_capacity(grid.num_cells() * ne);
    for (c, cell) in grid.cells().enumerate() {
        for ie in 0..ne {
            edges.push(cell.edge(ie));
            owners.push(c);
        }
    }
    let origin = Point3::new(0.0, 0.0, 0.0);
    let (xmin, xmax) = grid
        .bounds()
        .map(|bb| (bb.min, bb.max))
        .unwrap_or((origin, origin));
    let mut locator = EdgesLocator::new(&xmin, &xmax);
    locator.build(&edges, per_bucket);
    debug!("indexed {} source cell edges", edges.len());
    EdgeIndex { locator, owners }
}
