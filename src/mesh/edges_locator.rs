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

use crate::geometry::{Point2, Point3, Segment3};

/// Half-width of the band, in bucket units, around a bucket within which an
/// edge's closest point must fall for the edge to be registered there.
const HALO: f64 = 0.12;

/// Uniform `N x N` bucket grid over a set of edges, in the x-y plane.
///
/// `edges_along_line` returns a superset of the edges a line may cross.
#[derive(Debug, Clone)]
pub struct EdgesLocator {
    xmin: Point2<f64>,
    xmax: Point2<f64>,
    n: usize,
    buckets: Vec<Vec<usize>>,
}

impl EdgesLocator {
    /// Locator over the domain `[xmin, xmax]`. The z components are ignored.
    pub fn new(xmin: &Point3<f64>, xmax: &Point3<f64>) -> Self {
        Self {
            xmin: xmin.resize(),
            xmax: xmax.resize(),
            n: 1,
            buckets: vec![Vec::new()],
        }
    }

    pub fn num_buckets_per_axis(&self) -> usize {
        self.n
    }

    /// Register `edges`; edge ids are their positions in the slice.
    pub fn build(&mut self, edges: &[Segment3<f64>], num_edges_per_bucket: usize) {
        let per_bucket = num_edges_per_bucket.max(1) as f64;
        self.n = ((edges.len() as f64 / (2.0 * per_bucket)).sqrt() as usize).max(1);
        self.buckets = vec![Vec::new(); self.n * self.n];

        for (ie, edge) in edges.iter().enumerate() {
            let b_beg = self.bucket_space_loc(&edge.a);
            let b_end = self.bucket_space_loc(&edge.b);
            let bu = b_end - b_beg;
            let bu2 = bu.norm_squared();

            let i_beg = self.bucket_cell_loc(&edge.a);
            let i_end = self.bucket_cell_loc(&edge.b);
            let (imin, imax) = (i_beg[0].min(i_end[0]), i_beg[0].max(i_end[0]));
            let (jmin, jmax) = (i_beg[1].min(i_end[1]), i_beg[1].max(i_end[1]));

            for i in imin..=imax {
                for j in jmin..=jmax {
                    let centre = Point2::new(i as f64 + 0.5, j as f64 + 0.5);
                    // closest point on the edge to the bucket centre
                    let lam = if bu2 > 0.0 {
                        ((centre - b_beg).dot(&bu) / bu2).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                    let c = b_beg + bu * lam;
                    let (fi, fj) = (i as f64, j as f64);
                    if c[0] >= fi - HALO
                        && c[0] <= fi + 1.0 + HALO
                        && c[1] >= fj - HALO
                        && c[1] <= fj + 1.0 + HALO
                    {
                        let k = j + i * self.n;
                        self.buckets[k].push(ie);
                    }
                }
            }
        }
        debug!(
            "edges locator: {} edges in {}x{} buckets",
            edges.len(),
            self.n,
            self.n
        );
    }

    /// Sorted, deduplicated ids of the edges registered in every bucket
    /// spanned by `p_beg -> p_end`.
    pub fn edges_along_line(&self, p_beg: &Point3<f64>, p_end: &Point3<f64>) -> Vec<usize> {
        let i_beg = self.bucket_cell_loc(p_beg);
        let i_end = self.bucket_cell_loc(p_end);
        let mut ids = Vec::new();
        for i in i_beg[0].min(i_end[0])..=i_beg[0].max(i_end[0]) {
            for j in i_beg[1].min(i_end[1])..=i_beg[1].max(i_end[1]) {
                ids.extend_from_slice(&self.buckets[j + i * self.n]);
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Position of `p` in bucket space, `[0, N]` over the domain.
    pub fn bucket_space_loc(&self, p: &Point3<f64>) -> Point2<f64> {
        let n = self.n as f64;
        Point2::from_coords(std::array::from_fn(|d| {
            let extent = self.xmax[d] - self.xmin[d];
            if extent > 0.0 { (p[d] - self.xmin[d]) / extent * n } else { 0.0 }
        }))
    }

    /// Bucket containing `p`, clamped to `[0, N - 1]`.
    pub fn bucket_cell_loc(&self, p: &Point3<f64>) -> [usize; 2] {
        let b = self.bucket_space_loc(p);
        let top = (self.n - 1) as f64;
        std::array::from_fn(|d| b[d].floor().clamp(0.0, top) as usize)
    }
}
