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

use crate::{geometry::point::Point, numeric::scalar::Scalar};

/// An axis‐aligned bounding box in N dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<T: Scalar, const N: usize> {
    pub min: Point<T, N>,
    pub max: Point<T, N>,
}

impl<T: Scalar, const N: usize> Aabb<T, N> {
    pub fn new(min: Point<T, N>, max: Point<T, N>) -> Self {
        Aabb { min, max }
    }

    pub fn min(&self) -> &Point<T, N> {
        &self.min
    }

    /// Access the maximum corner.
    pub fn max(&self) -> &Point<T, N> {
        &self.max
    }

    /// Build the smallest AABB containing two points.
    pub fn from_points(a: &Point<T, N>, b: &Point<T, N>) -> Self {
        Aabb::new(a.inf(b), a.sup(b))
    }

    /// Smallest AABB containing every point, `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point<T, N>>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        Some(it.fold(Aabb::new(*first, *first), |bb, p| bb.expand_to(p)))
    }

    pub fn expand_to(&self, p: &Point<T, N>) -> Self {
        Aabb::new(self.min.inf(p), self.max.sup(p))
    }

    /// Grow by `pad` on every side.
    pub fn padded(&self, pad: T) -> Self {
        let mut out = *self;
        for i in 0..N {
            out.min[i] = out.min[i] - pad;
            out.max[i] = out.max[i] + pad;
        }
        out
    }

    /// Does this AABB intersect `other`?
    pub fn intersects(&self, other: &Aabb<T, N>) -> bool {
        (0..N).all(|i| self.max[i] >= other.min[i] && other.max[i] >= self.min[i])
    }

    pub fn contains(&self, p: &Point<T, N>, tol: T) -> bool {
        (0..N).all(|i| p[i] >= self.min[i] - tol && p[i] <= self.max[i] + tol)
    }

    /// Length along axis `i`.
    pub fn extent(&self, i: usize) -> T {
        self.max[i] - self.min[i]
    }

    pub fn diagonal(&self) -> T {
        self.min.distance_to(&self.max)
    }
}
