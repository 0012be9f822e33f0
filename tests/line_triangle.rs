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

use edgeregrid::geometry::line_triangle::triangle_param_location;
use edgeregrid::geometry::{LineTriangleIntersection, LineTriangleIntersector, Point3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-10;

fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

fn unit_triangle() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
    (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
}

#[test]
fn test_transverse_hit() {
    let (q0, q1, q2) = unit_triangle();
    let lti = LineTriangleIntersector::new(&p(0.2, 0.2, -1.0), &p(0.2, 0.2, 1.0), &q0, &q1, &q2);
    let [lambda, xi, eta] = lti.solution().unwrap();
    assert!((lambda - 0.5).abs() < TOL);
    assert!((xi - 0.2).abs() < TOL);
    assert!((eta - 0.2).abs() < TOL);
    assert!(lti.has_solution(TOL));
    match lti.intersect(TOL) {
        LineTriangleIntersection::Point { lambda, xi } => {
            assert!((lambda - 0.5).abs() < TOL);
            assert!((xi[0] - 0.2).abs() < TOL && (xi[1] - 0.2).abs() < TOL);
        }
        other => panic!("expected a point, got {other:?}"),
    }
}

#[test]
fn test_transverse_miss() {
    let (q0, q1, q2) = unit_triangle();
    // crosses the plane outside the triangle
    let lti = LineTriangleIntersector::new(&p(0.8, 0.8, -1.0), &p(0.8, 0.8, 1.0), &q0, &q1, &q2);
    assert!(lti.solution().is_some());
    assert_eq!(lti.intersect(TOL), LineTriangleIntersection::None);
    // stops short of the plane
    let lti = LineTriangleIntersector::new(&p(0.2, 0.2, -2.0), &p(0.2, 0.2, -1.0), &q0, &q1, &q2);
    assert_eq!(lti.intersect(TOL), LineTriangleIntersection::None);
}

#[test]
fn test_parallel_offset() {
    let (q0, q1, q2) = unit_triangle();
    let lti = LineTriangleIntersector::new(&p(0.0, 0.0, 1.0), &p(1.0, 0.0, 1.0), &q0, &q1, &q2);
    assert!(lti.det().abs() < TOL);
    assert!(!lti.is_coplanar(TOL));
    assert!(!lti.has_solution(TOL));
    assert!(lti.beg_end_params(TOL).is_none());
}

#[test]
fn test_coplanar_crossing() {
    let (q0, q1, q2) = unit_triangle();
    let lti = LineTriangleIntersector::new(&p(-1.0, 0.25, 0.0), &p(2.0, 0.25, 0.0), &q0, &q1, &q2);
    assert!(lti.is_coplanar(TOL));
    assert!(lti.has_solution(TOL));
    let (a, b) = lti.beg_end_params(TOL).unwrap();
    assert!((a - 1.0 / 3.0).abs() < TOL);
    assert!((b - 1.75 / 3.0).abs() < TOL);
    let (pa, pb) = lti.beg_end_points(TOL).unwrap();
    assert!(pa.distance_to(&p(0.0, 0.25, 0.0)) < TOL);
    assert!(pb.distance_to(&p(0.75, 0.25, 0.0)) < TOL);
}

#[test]
fn test_coplanar_inside_and_outside() {
    let (q0, q1, q2) = unit_triangle();
    let inside = LineTriangleIntersector::new(&p(0.1, 0.1, 0.0), &p(0.3, 0.2, 0.0), &q0, &q1, &q2);
    assert_eq!(
        inside.intersect(TOL),
        LineTriangleIntersection::Overlapping {
            lam_beg: 0.0,
            lam_end: 1.0
        }
    );

    let outside = LineTriangleIntersector::new(&p(2.0, 2.0, 0.0), &p(3.0, 3.0, 0.0), &q0, &q1, &q2);
    assert!(!outside.has_solution(TOL));
    assert_eq!(outside.intersect(TOL), LineTriangleIntersection::None);
}

#[test]
fn test_coplanar_along_edge() {
    let (q0, q1, q2) = unit_triangle();
    let lti = LineTriangleIntersector::new(&p(-1.0, 0.0, 0.0), &p(2.0, 0.0, 0.0), &q0, &q1, &q2);
    let (a, b) = lti.beg_end_params(TOL).unwrap();
    assert!((a - 1.0 / 3.0).abs() < TOL);
    assert!((b - 2.0 / 3.0).abs() < TOL);
}

#[test]
fn test_coplanar_touching_vertex() {
    let (q0, q1, q2) = unit_triangle();
    // only touches the triangle at (1, 0)
    let lti = LineTriangleIntersector::new(&p(1.0, -1.0, 0.0), &p(1.0, 1.0, 0.0), &q0, &q1, &q2);
    assert!(lti.beg_end_params(TOL).is_none());
}

#[test]
fn test_triangle_param_location() {
    let q0 = p(1.0, 1.0, 1.0);
    let q1 = p(3.0, 1.0, 1.0);
    let q2 = p(1.0, 1.0, 5.0);
    let xi = triangle_param_location(&q0, &q1, &q2, &p(2.0, 1.0, 2.0)).unwrap();
    assert!((xi[0] - 0.5).abs() < TOL);
    assert!((xi[1] - 0.25).abs() < TOL);

    // collapsed triangle
    let flat = triangle_param_location(&q0, &q1, &p(5.0, 1.0, 1.0), &p(2.0, 1.0, 1.0));
    assert!(flat.is_none());
}

#[test]
fn test_random_hits_lie_on_segment_and_triangle() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut hits = 0;
    for _ in 0..500 {
        let mut pt = || {
            p(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            )
        };
        let (p0, p1, q0, q1, q2) = (pt(), pt(), pt(), pt(), pt());
        let lti = LineTriangleIntersector::new(&p0, &p1, &q0, &q1, &q2);
        if lti.det().abs() < 1e-3 {
            continue;
        }
        let LineTriangleIntersection::Point { lambda, xi } = lti.intersect(TOL) else {
            continue;
        };
        hits += 1;
        let on_segment = p0.lerp(&p1, lambda);
        let on_triangle = q0 + (q1 - q0) * xi[0] + (q2 - q0) * xi[1];
        assert!(on_segment.distance_to(&on_triangle) < 1e-8);
    }
    assert!(hits > 0);
}
