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

#![allow(dead_code)]

use std::path::PathBuf;

use edgeregrid::geometry::{Point3, Vector3};
use edgeregrid::{CellKind, Grid};

/// `nx x ny` structured quad grid over `[lo, hi]` in the z = 0 plane, with
/// shared nodes and cells numbered row by row.
pub fn quad_grid(nx: usize, ny: usize, lo: [f64; 2], hi: [f64; 2]) -> Grid {
    let node = |i: usize, j: usize| j * (nx + 1) + i;
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            nodes.push(Point3::new(
                lo[0] + (hi[0] - lo[0]) * i as f64 / nx as f64,
                lo[1] + (hi[1] - lo[1]) * j as f64 / ny as f64,
                0.0,
            ));
        }
    }
    let mut faces = Vec::with_capacity(4 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            faces.extend_from_slice(&[node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)]);
        }
    }
    Grid::from_nodes(CellKind::Quad, &nodes, faces).expect("valid quad grid")
}

/// Structured hex grid over the box `[lo, hi]`, cells numbered x fastest.
pub fn hex_grid(n: [usize; 3], lo: [f64; 3], hi: [f64; 3]) -> Grid {
    let [nx, ny, nz] = n;
    let node = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;
    let mut nodes = Vec::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                nodes.push(Point3::new(
                    lo[0] + (hi[0] - lo[0]) * i as f64 / nx as f64,
                    lo[1] + (hi[1] - lo[1]) * j as f64 / ny as f64,
                    lo[2] + (hi[2] - lo[2]) * k as f64 / nz as f64,
                ));
            }
        }
    }
    let mut cells = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                cells.extend_from_slice(&[
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j + 1, k),
                    node(i, j + 1, k),
                    node(i, j, k + 1),
                    node(i + 1, j, k + 1),
                    node(i + 1, j + 1, k + 1),
                    node(i, j + 1, k + 1),
                ]);
            }
        }
    }
    Grid::from_nodes(CellKind::Hex, &nodes, cells).expect("valid hex grid")
}

/// Line integrals of the constant vector field `f` along every cell-local
/// edge, laid out `cell * num_edges + edge`.
pub fn cell_edge_field(grid: &Grid, f: [f64; 3]) -> Vec<f64> {
    let f = Vector3::new(f[0], f[1], f[2]);
    let ne = grid.kind().num_edges();
    let mut out = Vec::with_capacity(grid.num_cells() * ne);
    for cell in 0..grid.num_cells() {
        for ie in 0..ne {
            let (p0, p1) = grid.edge_points(cell, ie);
            out.push((p1 - p0).dot(&f));
        }
    }
    out
}

/// Line integrals of `f` along the unique edges, in unique edge orientation.
pub fn unique_edge_field(grid: &Grid, f: [f64; 3]) -> Vec<f64> {
    let local = cell_edge_field(grid, f);
    let ne = grid.kind().num_edges();
    let mut out = vec![0.0; grid.num_unique_edges()];
    for cell in 0..grid.num_cells() {
        for ie in 0..ne {
            let (id, sign) = grid.edge_id(cell, ie).expect("edge connectivity");
            out[id] = sign * local[cell * ne + ie];
        }
    }
    out
}

/// Per-process scratch file path.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("edgeregrid-{}-{}", std::process::id(), name))
}

pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
}
