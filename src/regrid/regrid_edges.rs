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

use std::{fmt, path::Path};

use log::{debug, trace, warn};

use crate::{
    config::RegridConfig,
    error::{RegridError, Result},
    io::weights::{self, WeightHeader},
    mesh::{cell::CellKind, grid::Grid},
    regrid::{lagrange::quad_edge_weight, source::SourceCells},
};

/// One interpolation weight between a source and a destination cell edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    pub dst_cell: usize,
    pub dst_edge: usize,
    pub src_cell: usize,
    pub src_edge: usize,
    pub weight: f64,
}

/// Conservative regridding weights for edge fields on quadrilateral grids.
///
/// Destination edges are broken into sub-segments lying in single source
/// cells; each sub-segment contributes to the four local edges of its source
/// cell through the integrals of the edge basis functions.
#[derive(Debug, Default)]
pub struct RegridEdges<'a> {
    src: Option<&'a Grid>,
    dst: Option<&'a Grid>,
    config: RegridConfig,
    num_src_cells: usize,
    num_dst_cells: usize,
    weights: Vec<WeightEntry>,
}

impl<'a> RegridEdges<'a> {
    const KIND: CellKind = CellKind::Quad;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegridConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RegridConfig {
        &self.config
    }

    pub fn set_src_grid(&mut self, grid: &'a Grid) -> Result<()> {
        check_kind(grid)?;
        self.src = Some(grid);
        Ok(())
    }

    pub fn set_dst_grid(&mut self, grid: &'a Grid) -> Result<()> {
        check_kind(grid)?;
        self.dst = Some(grid);
        Ok(())
    }

    /// Set both grids and build.
    pub fn build_for(&mut self, src: &'a Grid, dst: &'a Grid, cells_per_bucket: usize) -> Result<()> {
        self.set_src_grid(src)?;
        self.set_dst_grid(dst)?;
        self.build(cells_per_bucket)
    }

    /// Compute the weights, replacing any previously built or loaded table.
    pub fn build(&mut self, cells_per_bucket: usize) -> Result<()> {
        let src = self.src.ok_or(RegridError::MissingSourceGrid)?;
        let dst = self.dst.ok_or(RegridError::MissingDestinationGrid)?;
        let config = self.config.clone().with_cells_per_bucket(cells_per_bucket);
        let source = SourceCells::new(src, &config);
        let ne = Self::KIND.num_edges();
        let edge_mids: Vec<[f64; 3]> = (0..ne).map(|ie| Self::KIND.reference_edge_midpoint(ie)).collect();

        let mut weights = Vec::with_capacity(dst.num_cells() * ne * 8);
        let mut uncovered = 0usize;
        for dst_cell in 0..dst.num_cells() {
            for dst_edge in 0..ne {
                let (p0, p1) = dst.edge_points(dst_cell, dst_edge);
                let segments = source.polysegment(&p0, &p1);
                trace!(
                    "dst cell {dst_cell} edge {dst_edge}: {} sub-segments",
                    segments.num_segments()
                );

                for seg in segments.segments() {
                    let xi_mid = seg.xi_mid();
                    let dxi = seg.dxi();
                    for (src_edge, x) in edge_mids.iter().enumerate() {
                        let weight = quad_edge_weight(x, &xi_mid, &dxi) * seg.coefficient;
                        if weight.abs() > config.weight_threshold {
                            weights.push(WeightEntry {
                                dst_cell,
                                dst_edge,
                                src_cell: seg.cell_id,
                                src_edge,
                                weight,
                            });
                        }
                    }
                }

                let total_t = segments.integrated_param_coord();
                if (total_t - 1.0).abs() > config.tolerance {
                    uncovered += 1;
                    warn!(
                        "total t of segment: {total_t} != 1 (diff={:e}) dst cell {dst_cell} points {:?} -> {:?}",
                        total_t - 1.0,
                        p0.coords,
                        p1.coords
                    );
                }
            }
        }

        debug!(
            "built {} weights from {} src cells to {} dst cells ({} edges not fully covered)",
            weights.len(),
            src.num_cells(),
            dst.num_cells(),
            uncovered
        );
        self.num_src_cells = src.num_cells();
        self.num_dst_cells = dst.num_cells();
        self.weights = weights;
        Ok(())
    }

    /// `dst[edge + 4 * cell] = sum of w * src[edge + 4 * cell]` over cell-local
    /// edge fields.
    pub fn apply_cell_edge(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        let ne = self.num_edges_per_cell();
        check_len("source", self.num_src_cells * ne, src.len())?;
        check_len("destination", self.num_dst_cells * ne, dst.len())?;

        dst.fill(0.0);
        for w in &self.weights {
            dst[w.dst_edge + ne * w.dst_cell] += w.weight * src[w.src_edge + ne * w.src_cell];
        }
        Ok(())
    }

    /// Apply the weights to fields indexed by unique edge id. Orientation
    /// signs are taken from the grids' edge connectivity and contributions
    /// are normalised by the accumulated signed weights.
    pub fn apply_unique_edge(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        let src_grid = self.src.ok_or(RegridError::MissingSourceGrid)?;
        let dst_grid = self.dst.ok_or(RegridError::MissingDestinationGrid)?;
        if !src_grid.has_edge_connectivity() {
            return Err(RegridError::MissingConnectivity("source"));
        }
        if !dst_grid.has_edge_connectivity() {
            return Err(RegridError::MissingConnectivity("destination"));
        }
        check_cells("source", self.num_src_cells, src_grid)?;
        check_cells("destination", self.num_dst_cells, dst_grid)?;
        check_len("source", src_grid.num_unique_edges(), src.len())?;
        check_len("destination", dst_grid.num_unique_edges(), dst.len())?;

        let mut multiplicity = vec![0.0; dst.len()];
        dst.fill(0.0);
        for w in &self.weights {
            let Some((src_edge, src_sign)) = src_grid.edge_id(w.src_cell, w.src_edge) else {
                continue;
            };
            let Some((dst_edge, dst_sign)) = dst_grid.edge_id(w.dst_cell, w.dst_edge) else {
                continue;
            };
            let sw = src_sign * dst_sign * w.weight;
            dst[dst_edge] += sw * src[src_edge];
            multiplicity[dst_edge] += sw;
        }

        // edges that received no contribution stay at zero
        for (d, m) in dst.iter_mut().zip(&multiplicity) {
            if *m != 0.0 {
                *d /= m;
            }
        }
        Ok(())
    }

    pub fn dump_weights<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        weights::save_weights(path, &self.header(), &self.weights)
    }

    /// Replace the weight table with the one stored at `path`. The current
    /// table is left untouched on error.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (header, table) = weights::load_weights::<WeightEntry, _>(path)?;
        if let Some(e) = table.iter().find(|e| {
            e.dst_cell >= header.num_dst_cells
                || e.src_cell >= header.num_src_cells
                || e.dst_edge >= Self::KIND.num_edges()
                || e.src_edge >= Self::KIND.num_edges()
        }) {
            return Err(RegridError::MalformedWeightFile {
                line: 0,
                message: format!("weight entry {e:?} is out of range"),
            });
        }
        self.num_src_cells = header.num_src_cells;
        self.num_dst_cells = header.num_dst_cells;
        self.weights = table;
        Ok(())
    }

    fn header(&self) -> WeightHeader {
        WeightHeader {
            kind: Self::KIND,
            num_src_cells: self.num_src_cells,
            num_dst_cells: self.num_dst_cells,
        }
    }

    pub fn num_src_cells(&self) -> usize {
        self.num_src_cells
    }

    pub fn num_dst_cells(&self) -> usize {
        self.num_dst_cells
    }

    pub fn num_edges_per_cell(&self) -> usize {
        Self::KIND.num_edges()
    }

    /// Unique edge count of the source grid, if it carries edge connectivity.
    pub fn num_src_unique_edges(&self) -> Option<usize> {
        self.src
            .filter(|g| g.has_edge_connectivity())
            .map(Grid::num_unique_edges)
    }

    pub fn num_dst_unique_edges(&self) -> Option<usize> {
        self.dst
            .filter(|g| g.has_edge_connectivity())
            .map(Grid::num_unique_edges)
    }

    pub fn weights(&self) -> &[WeightEntry] {
        &self.weights
    }

    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }
}

impl fmt::Display for RegridEdges<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} weights, {} src cells, {} dst cells",
            self.weights.len(),
            self.num_src_cells,
            self.num_dst_cells
        )?;
        writeln!(f, "{:>8} {:>8} {:>8} {:>8} {:>24}", "dst", "dst_edge", "src", "src_edge", "weight")?;
        for w in &self.weights {
            writeln!(
                f,
                "{:>8} {:>8} {:>8} {:>8} {:>24.16e}",
                w.dst_cell, w.dst_edge, w.src_cell, w.src_edge, w.weight
            )?;
        }
        Ok(())
    }
}

fn check_kind(grid: &Grid) -> Result<()> {
    if grid.kind() != CellKind::Quad {
        return Err(RegridError::CellKindMismatch {
            expected: CellKind::Quad,
            found: grid.kind(),
        });
    }
    Ok(())
}

pub(crate) fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(RegridError::FieldSizeMismatch {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_cells(grid_name: &'static str, expected: usize, grid: &Grid) -> Result<()> {
    if grid.num_cells() != expected {
        return Err(RegridError::GridMismatch {
            grid: grid_name,
            expected,
            found: grid.num_cells(),
        });
    }
    Ok(())
}
