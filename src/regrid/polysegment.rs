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

use log::{trace, warn};

use crate::{
    geometry::{
        LineTriangleIntersection, LineTriangleIntersector, Point3,
        util::{EPS, cmp_scalar},
    },
    mesh::{cell::Cell, grid::Grid, locator::CellLocator},
};

fn overlap_of(sorted: &[SubSegment], tol: f64) -> f64 {
    let mut overlap = 0.0;
    let mut reach = f64::NEG_INFINITY;
    for (i, s) in sorted.iter().enumerate() {
        let duplicate = i > 0 && {
            let prev = &sorted[i - 1];
            (s.t_beg - prev.t_beg).abs() <= tol && (s.t_end - prev.t_end).abs() <= tol
        };
        if duplicate {
            continue;
        }
        if reach - s.t_beg > tol {
            overlap += reach.min(s.t_end) - s.t_beg;
        }
        reach = reach.max(s.t_end);
    }
    overlap
}

/// Ranges shorter than this (in line parameter) only touch a cell.
const MIN_EXTENT: f64 = 1e-12;

/// Piece of a destination edge attributed to one source cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSegment {
    pub cell_id: usize,
    pub t_beg: f64,
    pub t_end: f64,
    /// Parametric coordinates in the source cell at `t_beg` and `t_end`.
    pub xi_beg: [f64; 3],
    pub xi_end: [f64; 3],
    /// `1 / n` when `n` cells report the same range (shared boundaries).
    pub coefficient: f64,
}

impl SubSegment {
    pub fn xi_mid(&self) -> [f64; 3] {
        std::array::from_fn(|d| 0.5 * (self.xi_beg[d] + self.xi_end[d]))
    }

    pub fn dxi(&self) -> [f64; 3] {
        std::array::from_fn(|d| self.xi_end[d] - self.xi_beg[d])
    }

    pub fn extent(&self) -> f64 {
        self.t_end - self.t_beg
    }
}

/// Ordered decomposition of a segment `p0 -> p1` into sub-segments, each lying
/// in a single source cell.
///
/// Works both as a cursor (`reset`, `advance`, `cell_id`, ...) and as an
/// `Iterator<Item = SubSegment>`; the two share the same position.
#[derive(Debug, Clone, Default)]
pub struct PolysegmentIter {
    segments: Vec<SubSegment>,
    index: usize,
    total_t: f64,
    overlap_t: f64,
}

impl PolysegmentIter {
    pub fn new<L: CellLocator + ?Sized>(
        grid: &Grid,
        locator: &L,
        p0: &Point3<f64>,
        p1: &Point3<f64>,
    ) -> Self {
        let candidates = locator.candidate_cells(p0, p1);
        Self::with_candidates(grid, locator, p0, p1, &candidates, EPS)
    }

    /// Decompose against an explicit list of candidate cells.
    pub fn with_candidates<L: CellLocator + ?Sized>(
        grid: &Grid,
        locator: &L,
        p0: &Point3<f64>,
        p1: &Point3<f64>,
        candidates: &[usize],
        tol: f64,
    ) -> Self {
        let mut segments = Vec::new();
        collect_sub_segments(grid, locator, p0, p1, candidates, tol, &mut segments);
        Self::from_segments(segments, tol)
    }

    /// Sort the sub-segments by line parameter and assign the duplicity
    /// coefficients. Incoming coefficients are overwritten.
    pub fn from_segments(mut segments: Vec<SubSegment>, tol: f64) -> Self {
        segments.sort_by(|a, b| {
            cmp_scalar(&a.t_beg, &b.t_beg).then_with(|| cmp_scalar(&a.t_end, &b.t_end))
        });

        let n = segments.len();
        for i in 0..n {
            let (ta, tb) = (segments[i].t_beg, segments[i].t_end);
            let count = segments
                .iter()
                .filter(|s| (s.t_beg - ta).abs() <= tol && (s.t_end - tb).abs() <= tol)
                .count();
            segments[i].coefficient = 1.0 / count as f64;
        }

        let total_t = segments.iter().map(|s| s.coefficient * s.extent()).sum();
        let overlap_t = overlap_of(&segments, tol);
        if overlap_t > tol {
            warn!("sub-segments overlap by {overlap_t:e} in line parameter");
        }
        Self {
            segments,
            index: 0,
            total_t,
            overlap_t,
        }
    }

    /// Line parameter length covered by more than one distinct sub-segment.
    /// Duplicates on shared cell boundaries do not count; non-zero values
    /// mean the cell decomposition is inconsistent.
    pub fn overlap_param_coord(&self) -> f64 {
        self.overlap_t
    }

    /// Sum of the sub-segment extents weighted by their coefficients; `1` when
    /// the whole segment is covered by the source grid.
    pub fn integrated_param_coord(&self) -> f64 {
        self.total_t
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Move to the next sub-segment.
    pub fn advance(&mut self) {
        self.index += 1;
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.segments.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[SubSegment] {
        &self.segments
    }

    pub fn current(&self) -> Option<&SubSegment> {
        self.segments.get(self.index)
    }

    // The accessors below index the current sub-segment and panic once
    // `is_done()`.

    pub fn cell_id(&self) -> usize {
        self.segments[self.index].cell_id
    }

    pub fn beg_cell_param_coord(&self) -> &[f64; 3] {
        &self.segments[self.index].xi_beg
    }

    pub fn end_cell_param_coord(&self) -> &[f64; 3] {
        &self.segments[self.index].xi_end
    }

    pub fn beg_line_param_coord(&self) -> f64 {
        self.segments[self.index].t_beg
    }

    pub fn end_line_param_coord(&self) -> f64 {
        self.segments[self.index].t_end
    }

    pub fn coefficient(&self) -> f64 {
        self.segments[self.index].coefficient
    }
}

impl Iterator for PolysegmentIter {
    type Item = SubSegment;

    fn next(&mut self) -> Option<SubSegment> {
        let seg = self.segments.get(self.index).copied()?;
        self.index += 1;
        Some(seg)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.segments.len().saturating_sub(self.index);
        (n, Some(n))
    }
}

impl ExactSizeIterator for PolysegmentIter {}

/// Line parameter range `[lambda_min, lambda_max]` of `p0 -> p1` inside `cell`.
pub fn line_cell_range(cell: &Cell<'_>, p0: &Point3<f64>, p1: &Point3<f64>, tol: f64) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut push = |lam: f64| {
        lo = lo.min(lam);
        hi = hi.max(lam);
    };

    if cell.locate(p0, tol).is_some() {
        push(0.0);
    }
    if cell.locate(p1, tol).is_some() {
        push(1.0);
    }
    for [a, b, c] in cell.triangles() {
        match LineTriangleIntersector::new(p0, p1, a, b, c).intersect(tol) {
            LineTriangleIntersection::Point { lambda, .. } => push(lambda),
            LineTriangleIntersection::Overlapping { lam_beg, lam_end } => {
                push(lam_beg);
                push(lam_end);
            }
            LineTriangleIntersection::None => {}
        }
    }

    match (hi - lo).partial_cmp(&MIN_EXTENT) {
        Some(Ordering::Greater) => Some((lo, hi)),
        _ => None,
    }
}

/// Append the sub-segments of `p0 -> p1` found in `candidates`. Coefficients
/// are left at `1`; `PolysegmentIter::from_segments` assigns them.
pub fn collect_sub_segments<L: CellLocator + ?Sized>(
    grid: &Grid,
    locator: &L,
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    candidates: &[usize],
    tol: f64,
    out: &mut Vec<SubSegment>,
) {
    for &cell_id in candidates {
        let cell = grid.cell(cell_id);
        let Some((t_beg, t_end)) = line_cell_range(&cell, p0, p1, tol) else {
            continue;
        };
        let xi_beg = locator.local_coords(cell_id, &p0.lerp(p1, t_beg));
        let xi_end = locator.local_coords(cell_id, &p0.lerp(p1, t_end));
        match (xi_beg, xi_end) {
            (Some(xi_beg), Some(xi_end)) => out.push(SubSegment {
                cell_id,
                t_beg,
                t_end,
                xi_beg,
                xi_end,
                coefficient: 1.0,
            }),
            _ => trace!("cell {cell_id}: no local coordinates for t in [{t_beg}, {t_end}]"),
        }
    }
}
