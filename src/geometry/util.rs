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

use std::cmp::Ordering;

use crate::numeric::scalar::Scalar;

pub const EPS: f64 = 1e-10;

/// Weights at or below this magnitude are not stored.
pub const WEIGHT_EPS: f64 = 1e-15;

/// Total order on floats that treats NaN as equal, for sorting parameter lists.
#[inline(always)]
pub fn cmp_scalar<T: Scalar>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Sort ascending and drop values within `tol` of their predecessor.
pub fn sort_dedup<T: Scalar>(values: &mut Vec<T>, tol: T) {
    values.sort_by(cmp_scalar);
    values.dedup_by(|b, a| (*b - *a).abs() <= tol);
}

/// Is `x` in `[lo - tol, hi + tol]`?
#[inline(always)]
pub fn in_range<T: Scalar>(x: T, lo: T, hi: T, tol: T) -> bool {
    x >= lo - tol && x <= hi + tol
}
