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

use std::array;

use crate::geometry::{
    Aabb, Point3, Segment3,
    matrix::{Matrix, SquareMatrix},
};

const MAX_NEWTON_ITERS: usize = 50;
const NEWTON_TOL: f64 = 1e-14;

/// Supported cell shapes, VTK vertex ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Quad,
    Hex,
}

const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [3, 2], [0, 3]];

const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [3, 2],
    [0, 3],
    [4, 5],
    [5, 6],
    [7, 6],
    [4, 7],
    [0, 4],
    [1, 5],
    [3, 7],
    [2, 6],
];

const QUAD_REF: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];

const HEX_REF: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

const QUAD_TRIANGLES: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

// Each hex face {a, b, c, d} is split into (a, b, c) and (a, c, d).
const HEX_TRIANGLES: [[usize; 3]; 12] = [
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
    [0, 1, 5],
    [0, 5, 4],
    [3, 7, 6],
    [3, 6, 2],
    [0, 3, 2],
    [0, 2, 1],
    [4, 5, 6],
    [4, 6, 7],
];

impl CellKind {
    pub fn from_num_vertices(n: usize) -> Option<Self> {
        match n {
            4 => Some(CellKind::Quad),
            8 => Some(CellKind::Hex),
            _ => None,
        }
    }

    pub const fn num_vertices(self) -> usize {
        match self {
            CellKind::Quad => 4,
            CellKind::Hex => 8,
        }
    }

    pub const fn num_edges(self) -> usize {
        match self {
            CellKind::Quad => 4,
            CellKind::Hex => 12,
        }
    }

    pub const fn num_param_dims(self) -> usize {
        match self {
            CellKind::Quad => 2,
            CellKind::Hex => 3,
        }
    }

    /// Local vertex pairs of each edge, oriented along increasing parametric
    /// coordinate.
    pub fn edge_vertices(self) -> &'static [[usize; 2]] {
        match self {
            CellKind::Quad => &QUAD_EDGES,
            CellKind::Hex => &HEX_EDGES,
        }
    }

    /// Parametric coordinates of the vertices (unit square or cube).
    pub fn reference_coords(self) -> &'static [[f64; 3]] {
        match self {
            CellKind::Quad => &QUAD_REF,
            CellKind::Hex => &HEX_REF,
        }
    }

    pub fn triangles(self) -> &'static [[usize; 3]] {
        match self {
            CellKind::Quad => &QUAD_TRIANGLES,
            CellKind::Hex => &HEX_TRIANGLES,
        }
    }

    /// Begin and end parametric points of local edge `ie`.
    pub fn reference_edge(self, ie: usize) -> ([f64; 3], [f64; 3]) {
        let [i0, i1] = self.edge_vertices()[ie];
        let refs = self.reference_coords();
        (refs[i0], refs[i1])
    }

    /// Parametric midpoint of local edge `ie`.
    pub fn reference_edge_midpoint(self, ie: usize) -> [f64; 3] {
        let (a, b) = self.reference_edge(ie);
        array::from_fn(|d| 0.5 * (a[d] + b[d]))
    }
}

/// Borrowed view of one cell's vertices.
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    kind: CellKind,
    vertices: &'a [Point3<f64>],
}

impl<'a> Cell<'a> {
    pub fn new(kind: CellKind, vertices: &'a [Point3<f64>]) -> Self {
        debug_assert_eq!(vertices.len(), kind.num_vertices());
        Self { kind, vertices }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn vertices(&self) -> &'a [Point3<f64>] {
        self.vertices
    }

    pub fn vertex(&self, i: usize) -> &'a Point3<f64> {
        &self.vertices[i]
    }

    /// Physical end points of local edge `ie`.
    pub fn edge(&self, ie: usize) -> Segment3<f64> {
        let [i0, i1] = self.kind.edge_vertices()[ie];
        Segment3::new(&self.vertices[i0], &self.vertices[i1])
    }

    pub fn bounds(&self) -> Aabb<f64, 3> {
        let first = self.vertices[0];
        self.vertices[1..]
            .iter()
            .fold(Aabb::new(first, first), |bb, p| bb.expand_to(p))
    }

    /// Triangles covering the cell boundary (2D: the cell itself).
    pub fn triangles(&self) -> impl Iterator<Item = [&'a Point3<f64>; 3]> + '_ {
        let vertices = self.vertices;
        self.kind
            .triangles()
            .iter()
            .map(move |t| [&vertices[t[0]], &vertices[t[1]], &vertices[t[2]]])
    }

    /// Multilinear interpolation of the vertex positions at `xi`.
    pub fn point_at(&self, xi: &[f64; 3]) -> Point3<f64> {
        match self.kind {
            CellKind::Quad => map_with_jacobian::<2>(self.vertices, &QUAD_REF, &[xi[0], xi[1]]).0,
            CellKind::Hex => map_with_jacobian::<3>(self.vertices, &HEX_REF, xi).0,
        }
    }

    /// Parametric coordinates of `p`, unbounded. Quads use the x and y
    /// components only.
    pub fn local_coords(&self, p: &Point3<f64>) -> Option<[f64; 3]> {
        match self.kind {
            CellKind::Quad => {
                inverse_map::<2>(self.vertices, &QUAD_REF, p).map(|[x, y]| [x, y, 0.0])
            }
            CellKind::Hex => inverse_map::<3>(self.vertices, &HEX_REF, p),
        }
    }

    pub fn contains_param(&self, xi: &[f64; 3], tol: f64) -> bool {
        xi[..self.kind.num_param_dims()]
            .iter()
            .all(|&x| x >= -tol && x <= 1.0 + tol)
    }

    /// Parametric coordinates of `p` if it lies in the cell.
    pub fn locate(&self, p: &Point3<f64>, tol: f64) -> Option<[f64; 3]> {
        let bounds = self.bounds();
        if !bounds.contains(p, tol * (1.0 + bounds.diagonal())) {
            return None;
        }
        self.local_coords(p).filter(|xi| self.contains_param(xi, tol))
    }
}

#[inline]
fn shape_factor(r: f64, x: f64) -> f64 {
    if r > 0.5 { x } else { 1.0 - x }
}

/// Position and Jacobian of the multilinear map over the first `D` axes.
fn map_with_jacobian<const D: usize>(
    vertices: &[Point3<f64>],
    refs: &[[f64; 3]],
    xi: &[f64; D],
) -> (Point3<f64>, Matrix<f64, D, D>) {
    let mut x = [0.0; 3];
    let mut jac = Matrix::<f64, D, D>::zero();
    for (v, r) in vertices.iter().zip(refs) {
        let n: f64 = (0..D).map(|d| shape_factor(r[d], xi[d])).product();
        for c in 0..3 {
            x[c] += n * v[c];
        }
        for k in 0..D {
            let sign = if r[k] > 0.5 { 1.0 } else { -1.0 };
            let dn: f64 = sign
                * (0..D)
                    .filter(|&d| d != k)
                    .map(|d| shape_factor(r[d], xi[d]))
                    .product::<f64>();
            for c in 0..D {
                jac[c][k] += dn * v[c];
            }
        }
    }
    (Point3::from_coords(x), jac)
}

/// Newton iteration for the parametric coordinates of `p`.
fn inverse_map<const D: usize>(
    vertices: &[Point3<f64>],
    refs: &[[f64; 3]],
    p: &Point3<f64>,
) -> Option<[f64; D]>
where
    Matrix<f64, D, D>: SquareMatrix<f64, D>,
{
    let mut xi = [0.5; D];
    for _ in 0..MAX_NEWTON_ITERS {
        let (x, jac) = map_with_jacobian::<D>(vertices, refs, &xi);
        let residual: [f64; D] = array::from_fn(|c| x[c] - p[c]);
        let dxi = jac.solve(&residual)?;
        for k in 0..D {
            xi[k] -= dxi[k];
        }
        if !xi.iter().all(|v| v.is_finite() && v.abs() < 1e6) {
            return None;
        }
        if dxi.iter().all(|d| d.abs() < NEWTON_TOL) {
            return Some(xi);
        }
    }
    // converged to round-off without meeting the step tolerance
    let (x, _) = map_with_jacobian::<D>(vertices, refs, &xi);
    let scale = vertices
        .iter()
        .map(|v| v.distance_to(&vertices[0]))
        .fold(1.0, f64::max);
    ((0..D).all(|c| (x[c] - p[c]).abs() <= 1e-10 * scale)).then_some(xi)
}
