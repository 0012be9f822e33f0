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
    geometry::{
        line_line::{LineLineIntersection, LineLineIntersector},
        matrix::Matrix,
        point::{Point2, Point3},
        util::{in_range, sort_dedup},
        vector::Vector3,
    },
    numeric::scalar::Scalar,
};

/// Outcome of intersecting a 3D segment with a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineTriangleIntersection<T: Scalar> {
    None,
    /// Transverse crossing at line parameter `lambda`, triangle coordinates `xi`.
    Point { lambda: T, xi: [T; 2] },
    /// Segment lies in the triangle plane and runs through the triangle.
    Overlapping { lam_beg: T, lam_end: T },
}

/// Solves `p0 + lambda (p1 - p0) = q0 + xi (q1 - q0) + eta (q2 - q0)`.
///
/// The system `[p1 - p0, q0 - q1, q0 - q2] (lambda, xi, eta) = q0 - p0` is
/// solved with its adjugate. When the determinant vanishes the segment is
/// parallel to the triangle plane; if it also lies in that plane the entry
/// and exit parameters are recovered in the triangle's parametric space.
#[derive(Debug, Clone, Copy)]
pub struct LineTriangleIntersector<T: Scalar> {
    p0: Point3<T>,
    p1: Point3<T>,
    q0: Point3<T>,
    q1: Point3<T>,
    q2: Point3<T>,
    sol_times_det: [T; 3],
    det: T,
}

impl<T: Scalar> LineTriangleIntersector<T> {
    pub fn new(
        p0: &Point3<T>,
        p1: &Point3<T>,
        q0: &Point3<T>,
        q1: &Point3<T>,
        q2: &Point3<T>,
    ) -> Self {
        let mat = Matrix::from_cols([
            (*p1 - *p0).coords,
            (*q0 - *q1).coords,
            (*q0 - *q2).coords,
        ]);
        let rhs = *q0 - *p0;
        Self {
            p0: *p0,
            p1: *p1,
            q0: *q0,
            q1: *q1,
            q2: *q2,
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

    fn dp(&self) -> Vector3<T> {
        self.p1 - self.p0
    }

    /// `|dp| |e1| |e2|`, the magnitude the determinant scales with.
    fn det_scale(&self) -> T {
        self.dp().norm() * (self.q1 - self.q0).norm() * (self.q2 - self.q0).norm()
    }

    /// Singular relative to the segment and triangle sizes.
    pub fn is_degenerate(&self, tol: T) -> bool {
        self.det.abs() <= tol * self.det_scale()
    }

    /// Both segment end points lie in the triangle's plane.
    pub fn is_coplanar(&self, tol: T) -> bool {
        let e1 = self.q1 - self.q0;
        let e2 = self.q2 - self.q0;
        let Some(n) = e1.cross(&e2).normalized() else {
            return false;
        };
        let size = self.dp().norm().max(e1.norm()).max(e2.norm()).max(T::one());
        let d0 = n.dot(&(self.p0 - self.q0)).abs();
        let d1 = n.dot(&(self.p1 - self.q0)).abs();
        d0 <= tol * size && d1 <= tol * size
    }

    /// `[lambda, xi, eta]`, or `None` when the segment is parallel to the plane.
    pub fn solution(&self) -> Option<[T; 3]> {
        if self.det.is_zero() || self.is_degenerate(T::tolerance()) {
            return None;
        }
        Some(self.sol_times_det.map(|v| v / self.det))
    }

    pub fn has_solution(&self, tol: T) -> bool {
        if self.det.abs() > tol {
            return true;
        }
        self.beg_end_params(tol).is_some()
    }

    /// Entry and exit line parameters of a segment lying in the triangle plane.
    pub fn beg_end_params(&self, tol: T) -> Option<(T, T)> {
        if !self.is_coplanar(tol) {
            return None;
        }
        let pxi0 = triangle_param_location(&self.q0, &self.q1, &self.q2, &self.p0)?;
        let pxi1 = triangle_param_location(&self.q0, &self.q1, &self.q2, &self.p1)?;

        let mut lams: Vec<T> = Vec::with_capacity(8);
        if in_reference_triangle(&pxi0, tol) {
            lams.push(T::zero());
        }
        if in_reference_triangle(&pxi1, tol) {
            lams.push(T::one());
        }

        let (zero, one) = (T::zero(), T::one());
        let corners = [
            Point2::new(zero, zero),
            Point2::new(one, zero),
            Point2::new(zero, one),
        ];
        for k in 0..3 {
            let ll = LineLineIntersector::new(&pxi0, &pxi1, &corners[k], &corners[(k + 1) % 3]);
            match ll.intersect(tol) {
                LineLineIntersection::Point { s, .. } => lams.push(s),
                LineLineIntersection::Overlapping { s_beg, s_end } => {
                    lams.push(s_beg);
                    lams.push(s_end);
                }
                LineLineIntersection::None => {}
            }
        }

        sort_dedup(&mut lams, T::zero());
        if lams.len() < 2 {
            return None;
        }
        let lam_beg = lams[0];
        let lam_end = lams[lams.len() - 1];
        if lam_end - lam_beg > tol {
            Some((lam_beg, lam_end))
        } else {
            None
        }
    }

    pub fn beg_end_points(&self, tol: T) -> Option<(Point3<T>, Point3<T>)> {
        let (a, b) = self.beg_end_params(tol)?;
        Some((self.p0.lerp(&self.p1, a), self.p0.lerp(&self.p1, b)))
    }

    /// Classify the intersection with the segment restricted to `[0, 1]`.
    pub fn intersect(&self, tol: T) -> LineTriangleIntersection<T> {
        let (zero, one) = (T::zero(), T::one());
        if let Some([lambda, xi, eta]) = self.solution() {
            let inside = xi >= -tol && eta >= -tol && xi + eta <= one + tol;
            if inside && in_range(lambda, zero, one, tol) {
                return LineTriangleIntersection::Point {
                    lambda: lambda.clamp_to(zero, one),
                    xi: [xi, eta],
                };
            }
            return LineTriangleIntersection::None;
        }
        match self.beg_end_params(tol) {
            Some((lam_beg, lam_end)) => LineTriangleIntersection::Overlapping { lam_beg, lam_end },
            None => LineTriangleIntersection::None,
        }
    }
}

fn in_reference_triangle<T: Scalar>(xi: &Point2<T>, tol: T) -> bool {
    xi[0] >= -tol && xi[1] >= -tol && xi[0] + xi[1] <= T::one() + tol
}

/// Location of `p` in the parametric space of triangle `(q0, q1, q2)`.
///
/// Least squares through the normal equations of the 3x2 edge matrix. `None`
/// when the triangle is too thin for the 2x2 system to be trusted.
pub fn triangle_param_location<T: Scalar>(
    q0: &Point3<T>,
    q1: &Point3<T>,
    q2: &Point3<T>,
    p: &Point3<T>,
) -> Option<Point2<T>> {
    let m: Matrix<T, 3, 2> = Matrix::from_cols([(*q1 - *q0).coords, (*q2 - *q0).coords]);
    let mt = m.transpose();
    let a = mt * m;
    let det = a.det();
    if det.abs() <= T::tolerance() * a[0][0] * a[1][1] || det.is_zero() {
        return None;
    }
    let rhs = mt.mul_vec(&(*p - *q0).coords);
    let x = a.adjugate().mul_vec(&rhs);
    Some(Point2::new(x[0] / det, x[1] / det))
}
