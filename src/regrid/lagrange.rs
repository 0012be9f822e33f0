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

//! Integrals of the edge basis functions along a sub-segment.
//!
//! `x` is the parametric midpoint of a source edge (each component in
//! `{0, 1/2, 1}`), `xi_mid` and `dxi` the midpoint and extent of the
//! sub-segment in the same parametric space.

/// Quadratic Lagrange polynomials through `{0, 1/2, 1}` evaluated at `x`.
#[inline]
pub fn lagrange_basis(x: f64) -> (f64, f64, f64) {
    let (xm00, xm05, xm10) = (x, x - 0.5, x - 1.0);
    (2.0 * xm05 * xm10, -4.0 * xm00 * xm10, 2.0 * xm00 * xm05)
}

/// Weight of the source edge with midpoint `x` in a quad.
pub fn quad_edge_weight(x: &[f64; 3], xi_mid: &[f64; 3], dxi: &[f64; 3]) -> f64 {
    (0..2)
        .map(|d| {
            let (l0, l05, l1) = lagrange_basis(x[d]);
            (1.0 - xi_mid[d]) * l0 + dxi[d] * l05 + xi_mid[d] * l1
        })
        .product()
}

/// Weight of the source edge with midpoint `x` in a hexahedron.
pub fn hex_edge_weight(x: &[f64; 3], xi_mid: &[f64; 3], dxi: &[f64; 3]) -> f64 {
    let w: f64 = (0..3)
        .map(|d| {
            let (xm00, xm05, xm10) = (x[d], x[d] - 0.5, x[d] - 1.0);
            (1.0 - xi_mid[d]) * xm05 * xm10 - dxi[d] * xm00 * xm10 + xi_mid[d] * xm00 * xm05
        })
        .product();
    2.0 * w
}
