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

use crate::{
    geometry::{Aabb, Point3, util::EPS},
    mesh::grid::Grid,
};

/// Spatial queries on a source grid.
pub trait CellLocator {
    /// Cell containing `p` and the parametric coordinates of `p` in it.
    fn find_cell(&self, p: &Point3<f64>) -> Option<(usize, [f64; 3])>;

    /// Superset of the cells that the segment `beg -> end` may intersect.
    fn candidate_cells(&self, beg: &Point3<f64>, end: &Point3<f64>) -> Vec<usize>;

    /// Parametric coordinates of `p` in `cell`, possibly outside `[0, 1]`.
    fn local_coords(&self, cell: usize, p: &Point3<f64>) -> Option<[f64; 3]>;
}

/// Uniform bucket grid over the cell bounding boxes.
#[derive(Debug)]
pub struct BucketCellLocator<'a> {
    grid: &'a Grid,
    bounds: Aabb<f64, 3>,
    dims: [usize; 3],
    buckets: Vec<Vec<usize>>,
    cell_bounds: Vec<Aabb<f64, 3>>,
    tol: f64,
}

impl<'a> BucketCellLocator<'a> {
    pub fn new(grid: &'a Grid, cells_per_bucket: usize) -> Self {
        Self::with_tolerance(grid, cells_per_bucket, EPS)
    }

    pub fn with_tolerance(grid: &'a Grid, cells_per_bucket: usize, tol: f64) -> Self {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let bounds = grid.bounds().unwrap_or(Aabb::new(origin, origin));
        let pad = tol * (1.0 + bounds.diagonal());
        let cell_bounds: Vec<_> = grid.cells().map(|c| c.bounds().padded(pad)).collect();

        // bucket counts follow the parametric dimension of the grid
        let ndims = grid.kind().num_param_dims();
        let num_buckets = (grid.num_cells() / cells_per_bucket.max(1)).max(1) as f64;
        let per_axis = num_buckets.powf(1.0 / ndims as f64).round().max(1.0) as usize;
        let dims = std::array::from_fn(|d| {
            if d < ndims && bounds.extent(d) > 0.0 { per_axis } else { 1 }
        });

        let mut locator = Self {
            grid,
            bounds,
            dims,
            buckets: vec![Vec::new(); dims[0] * dims[1] * dims[2]],
            cell_bounds,
            tol,
        };
        for cell in 0..grid.num_cells() {
            let bb = locator.cell_bounds[cell];
            let lo = locator.bucket_of(&bb.min);
            let hi = locator.bucket_of(&bb.max);
            locator.for_each_bucket(lo, hi, |b| b.push(cell));
        }
        debug!(
            "cell locator: {} cells in {}x{}x{} buckets",
            grid.num_cells(),
            dims[0],
            dims[1],
            dims[2]
        );
        locator
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, p: &Point3<f64>) -> [usize; 3] {
        std::array::from_fn(|d| {
            let extent = self.bounds.extent(d);
            if self.dims[d] == 1 || extent <= 0.0 {
                return 0;
            }
            let x = (p[d] - self.bounds.min[d]) / extent * self.dims[d] as f64;
            (x.floor().max(0.0) as usize).min(self.dims[d] - 1)
        })
    }

    #[inline(always)]
    fn flat(&self, i: [usize; 3]) -> usize {
        i[0] + self.dims[0] * (i[1] + self.dims[1] * i[2])
    }

    fn for_each_bucket(&mut self, lo: [usize; 3], hi: [usize; 3], mut f: impl FnMut(&mut Vec<usize>)) {
        for k in lo[2]..=hi[2] {
            for j in lo[1]..=hi[1] {
                for i in lo[0]..=hi[0] {
                    let idx = self.flat([i, j, k]);
                    f(&mut self.buckets[idx]);
                }
            }
        }
    }
}

impl CellLocator for BucketCellLocator<'_> {
    fn find_cell(&self, p: &Point3<f64>) -> Option<(usize, [f64; 3])> {
        let pad = self.tol * (1.0 + self.bounds.diagonal());
        if !self.bounds.contains(p, pad) {
            return None;
        }
        let bucket = &self.buckets[self.flat(self.bucket_of(p))];
        bucket
            .iter()
            .filter(|&&c| self.cell_bounds[c].contains(p, 0.0))
            .find_map(|&c| self.grid.cell(c).locate(p, self.tol).map(|xi| (c, xi)))
    }

    fn candidate_cells(&self, beg: &Point3<f64>, end: &Point3<f64>) -> Vec<usize> {
        let query = Aabb::from_points(beg, end);
        let lo = self.bucket_of(&query.min);
        let hi = self.bucket_of(&query.max);
        let mut cells = Vec::new();
        for k in lo[2]..=hi[2] {
            for j in lo[1]..=hi[1] {
                for i in lo[0]..=hi[0] {
                    cells.extend(
                        self.buckets[self.flat([i, j, k])]
                            .iter()
                            .copied()
                            .filter(|&c| self.cell_bounds[c].intersects(&query)),
                    );
                }
            }
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    fn local_coords(&self, cell: usize, p: &Point3<f64>) -> Option<[f64; 3]> {
        self.grid.cell(cell).local_coords(p)
    }
}
