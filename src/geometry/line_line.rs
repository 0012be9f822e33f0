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

use crate::{
    geometry::{matrix::Matrix, point::Point2, util::in_range, vector::Vector2},
    numeric::scalar::Scalar,
};

/// Outcome of intersecting two finite 2D segments `p0 -> p1` and `q0 -> q1`.
///
/// `s` parametrises `p`, `t` parametrises `q`, both in `[0, 1]` on the segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineLineIntersection<T: Scalar> {
    None,
    Point { s: T, t: T },
    /// Colinear segments sharing a range of positive length, expressed along `p`.
    Overlapping { s_beg: T, s_end: T },
}

/// Solves `p0 + s (p1 - p0) = q0 + t (q1 - q0)`.
///
/// The 2x2 system is solved through its adjugate, so `solution * det` stays
/// available when the segments are parallel.
#[derive(Debug, Clone, Copy)]
pub struct LineLineIntersector<T: Scalar> {
    p0: Point2<T>,
    p1: Point2<T>,
    q0: Point2<T>,
    q1: Point2<T>,
    sol_times_det: [T; 2],
    det: T,
}

impl<T: Scalar> LineLineIntersector<T> {
    pub fn new(p0: &Point2<T>, p1: &Point2<T>, q0: &Point2<T>, q1: &Point2<T>) -> Self {
        let dp = *p1 - *p0;
        let mq = *q0 - *q1;
        let rhs = *q0 - *p0;
        let mat = Matrix::from_cols([dp.coords, mq.coords]);
        Self {
            p0: *p0,
            p1: *p1,
            q0: *q0,
            q1: *q1,
            sol_times_det: mat.adjugate().mul_vec(&rhs.coords),
            det: mat.det(),
        }
    }

    pub fn det(&self) -> T {
        self.det
    }

    pub fn is_singular(&self, tol: T) -> bool {
        self.det.abs() < tol
    }

    fn dp(&self) -> Vector2<T> {
        self.p1 - self.p0
    }

    fn dq(&self) -> Vector2<T> {
        self.q1 - self.q0
    }

    /// Parallel within tolerance, relative to the segment lengths.
    fn is_parallel(&self) -> bool {
        let scale = self.dp().norm() * self.dq().norm();
        self.det.abs() <= T::tolerance() * scale
    }

    /// Do the two supporting lines coincide?
    fn is_colinear(&self, tol: T) -> bool {
        let dp = self.dp();
        let r = self.q0 - self.p0;
        dp.cross(&r).abs() <= tol * dp.norm() * r.norm().max(T::one())
    }

    /// `true` when the segments cross, or are colinear with an overlap of
    /// positive length.
    pub fn has_solution(&self, tol: T) -> bool {
        if self.det.abs() > tol || !self.is_parallel() {
            return true;
        }
        self.beg_end_params(tol).is_some()
    }

    /// `(s, t)`, or `None` when the lines are parallel.
    pub fn solution(&self) -> Option<[T; 2]> {
        if self.det.is_zero() || self.is_parallel() {
            return None;
        }
        Some([self.sol_times_det[0] / self.det, self.sol_times_det[1] / self.det])
    }

    /// Overlap of two colinear segments as a range of `s` along `p`.
    pub fn beg_end_params(&self, tol: T) -> Option<(T, T)> {
        if !self.is_parallel() || !self.is_colinear(tol) {
            return None;
        }
        let dp = self.dp();
        let dp2 = dp.norm_squared();
        if dp2.is_zero() {
            return None;
        }
        let sq0 = (self.q0 - self.p0).dot(&dp) / dp2;
        let sq1 = (self.q1 - self.p0).dot(&dp) / dp2;
        let s_beg = sq0.min(sq1).max(T::zero());
        let s_end = sq0.max(sq1).min(T::one());
        if s_end - s_beg > tol {
            Some((s_beg, s_end))
        } else {
            None
        }
    }

    /// End points of the colinear overlap, ordered along `p`.
    pub fn beg_end_points(&self, tol: T) -> Option<(Point2<T>, Point2<T>)> {
        let (s_beg, s_end) = self.beg_end_params(tol)?;
        Some((self.p0.lerp(&self.p1, s_beg), self.p0.lerp(&self.p1, s_end)))
    }

    /// Classify the intersection restricted to both finite segments.
    pub fn intersect(&self, tol: T) -> LineLineIntersection<T> {
        if let Some([s, t]) = self.solution() {
            let (zero, one) = (T::zero(), T::one());
            if in_range(s, zero, one, tol) && in_range(t, zero, one, tol) {
                return LineLineIntersection::Point {
                    s: s.clamp_to(zero, one),
                    t: t.clamp_to(zero, one),
                };
            }
            return LineLineIntersection::None;
        }
        match self.beg_end_params(tol) {
            Some((s_beg, s_end)) => LineLineIntersection::Overlapping { s_beg, s_end },
            None => LineLineIntersection::None,
        }
    }
}
