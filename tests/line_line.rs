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

use std::f64::consts::PI;

use edgeregrid::geometry::{LineLineIntersection, LineLineIntersector, Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-10;

fn p(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}

/// Component of `a - b` along the unit direction of `p0 -> p1`.
fn along(a: &Point2<f64>, b: &Point2<f64>, p0: &Point2<f64>, p1: &Point2<f64>) -> f64 {
    let u: Vector2<f64> = *p1 - *p0;
    (*a - *b).dot(&u) / u.norm()
}

#[test]
fn test_crossing_segments() {
    let lli = LineLineIntersector::new(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, -1.0), &p(1.0, 2.0));
    let [s, t] = lli.solution().unwrap();
    assert!((s - 0.5).abs() < TOL);
    assert!((t - 1.0 / 3.0).abs() < TOL);
    assert!(matches!(lli.intersect(TOL), LineLineIntersection::Point { .. }));
}

#[test]
fn test_degenerate_colinear() {
    let lli = LineLineIntersector::new(&p(0.0, 0.0), &p(2.0, 0.0), &p(0.0, 0.0), &p(1.0, 0.0));
    assert!(lli.det().abs() < TOL);
    assert!(lli.solution().is_none());
    assert!(lli.has_solution(TOL));
}

#[test]
fn test_parallel_no_solution() {
    let lli = LineLineIntersector::new(&p(0.0, 0.0), &p(2.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0));
    assert!(lli.det().abs() < TOL);
    assert!(!lli.has_solution(TOL));
    assert_eq!(lli.intersect(TOL), LineLineIntersection::None);
}

#[test]
fn test_no_overlap() {
    let lli = LineLineIntersector::new(&p(0.0, 0.0), &p(PI / 2.0, 0.0), &p(-2.0, 0.0), &p(-1.0, 0.0));
    assert!(lli.det().abs() < TOL);
    assert!(!lli.has_solution(TOL));

    let lli = LineLineIntersector::new(&p(PI / 2.0, 0.0), &p(0.0, 0.0), &p(-2.0, 0.0), &p(-1.0, 0.0));
    assert!(lli.det().abs() < TOL);
    assert!(!lli.has_solution(TOL));
}

#[test]
fn test_partial_overlap() {
    let (p0, p1, q0, q1) = (p(0.0, 0.0), p(PI / 2.0, 0.0), p(-2.0, 0.0), p(0.5, 0.0));
    let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
    assert!(lli.det().abs() < TOL);
    assert!(lli.has_solution(TOL));
    let (pa, pb) = lli.beg_end_points(TOL).unwrap();
    assert!(along(&pa, &p0, &p0, &p1).abs() < TOL);
    assert!(along(&pb, &q1, &p0, &p1).abs() < TOL);
}

#[test]
fn test_partial_overlap_2() {
    let (p0, p1, q0, q1) = (p(0.0, 0.0), p(PI / 2.0, 0.0), p(0.1, 0.0), p(PI, 0.0));
    let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
    assert!(lli.has_solution(TOL));
    let (pa, pb) = lli.beg_end_points(TOL).unwrap();
    assert!(along(&pa, &q0, &p0, &p1).abs() < TOL);
    assert!(along(&pb, &p1, &p0, &p1).abs() < TOL);
}

#[test]
fn test_partial_overlap_reversed() {
    let (p0, p1, q0, q1) = (p(PI / 2.0, 0.0), p(0.0, 0.0), p(0.1, 0.0), p(PI, 0.0));
    let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
    assert!(lli.det().abs() < TOL);
    assert!(lli.has_solution(TOL));
    let (pa, pb) = lli.beg_end_points(TOL).unwrap();
    assert!(along(&pa, &p0, &p0, &p1).abs() < TOL);
    assert!(along(&pb, &q0, &p0, &p1).abs() < TOL);
}

#[test]
fn test_q_inside_p() {
    let (p0, p1, q0, q1) = (p(0.0, 0.0), p(1.0, 0.0), p(0.1, 0.0), p(0.8, 0.0));
    let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
    assert!(lli.has_solution(TOL));
    let (pa, pb) = lli.beg_end_points(TOL).unwrap();
    assert!(along(&pa, &q0, &p0, &p1).abs() < TOL);
    assert!(along(&pb, &q1, &p0, &p1).abs() < TOL);
    match lli.intersect(TOL) {
        LineLineIntersection::Overlapping { s_beg, s_end } => {
            assert!((s_beg - 0.1).abs() < TOL);
            assert!((s_end - 0.8).abs() < TOL);
        }
        other => panic!("expected overlap, got {other:?}"),
    }
}

#[test]
fn test_p_inside_q() {
    let (p0, p1, q0, q1) = (p(0.1, 0.0), p(0.9, 0.0), p(0.0, 0.0), p(1.0, 0.0));
    let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
    assert!(lli.det().abs() < TOL);
    assert!(lli.has_solution(TOL));
    let (pa, pb) = lli.beg_end_points(TOL).unwrap();
    assert!(along(&pa, &p0, &p0, &p1).abs() < TOL);
    assert!(along(&pb, &p1, &p0, &p1).abs() < TOL);
}

#[test]
fn test_crossing_outside_segments() {
    // supporting lines cross at (3, 0), beyond both segments
    let lli = LineLineIntersector::new(&p(0.0, 0.0), &p(1.0, 0.0), &p(3.0, -1.0), &p(3.0, -0.5));
    assert!(lli.solution().is_some());
    assert_eq!(lli.intersect(TOL), LineLineIntersection::None);
}

#[test]
fn test_random_crossings_satisfy_both_lines() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let mut pt = || p(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        let (p0, p1, q0, q1) = (pt(), pt(), pt(), pt());
        let lli = LineLineIntersector::new(&p0, &p1, &q0, &q1);
        let Some([s, t]) = lli.solution() else {
            continue;
        };
        if s.abs() > 10.0 || t.abs() > 10.0 {
            continue;
        }
        let a = p0.lerp(&p1, s);
        let b = q0.lerp(&q1, t);
        let scale = 1.0 + s.abs().max(t.abs());
        assert!(a.distance_to(&b) < TOL * 10.0 * scale, "{a:?} vs {b:?}");
    }
}
