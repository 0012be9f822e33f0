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
    regrid::{
        accumulator::{CellPairWeights, WeightAccumulator},
        lagrange::hex_edge_weight,
        regrid_edges::check_len,
        source::SourceCells,
    },
};

/// Number of edges of a hexahedron.
pub const HEX_EDGES: usize = 12;

pub type HexPairWeights = CellPairWeights<HEX_EDGES>;

/// Regridding weights for edge fields on hexahedral grids.
///
/// Contributions of every destination edge of a cell are summed into one
/// dense 12-vector per (destination cell, source cell) pair, applied edge by
/// edge.
#[derive(Debug, Default)]
pub struct RegridEdges3d<'a> {
    src: Option<&'a Grid>,
    dst: Option<&'a Grid>,
    config: RegridConfig,
    num_src_cells: usize,
    num_dst_cells: usize,
    weights: Vec<HexPairWeights>,
}

impl<'a> RegridEdges3d<'a> {
    const KIND: CellKind = CellKind::Hex;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegridConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
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

    pub fn build(&mut self, cells_per_bucket: usize) -> Result<()> {
        let src = self.src.ok_or(RegridError::MissingSourceGrid)?;
        let dst = self.dst.ok_or(RegridError::MissingDestinationGrid)?;
        let config = self.config.clone().with_cells_per_bucket(cells_per_bucket);
        let source = SourceCells::new(src, &config);
        let edge_mids: [[f64; 3]; HEX_EDGES] =
            std::array::from_fn(|ie| Self::KIND.reference_edge_midpoint(ie));

        let mut acc = WeightAccumulator::<HEX_EDGES>::new();
        for dst_cell in 0..dst.num_cells() {
            acc.merge(self.cell_weights(&source, dst, dst_cell, &edge_mids));
        }

        let weights = acc.into_sorted(config.weight_threshold);
        debug!(
            "built {} cell pair weights from {} src cells to {} dst cells",
            weights.len(),
            src.num_cells(),
            dst.num_cells()
        );
        self.num_src_cells = src.num_cells();
        self.num_dst_cells = dst.num_cells();
        self.weights = weights;
        Ok(())
    }

    /// Weights contributed by the edges of one destination cell.
    fn cell_weights(
        &self,
        source: &SourceCells<'_>,
        dst: &Grid,
        dst_cell: usize,
        edge_mids: &[[f64; 3]; HEX_EDGES],
    ) -> WeightAccumulator<HEX_EDGES> {
        let mut acc = WeightAccumulator::new();
        for dst_edge in 0..HEX_EDGES {
            let (p0, p1) = dst.edge_points(dst_cell, dst_edge);
            let segments = source.polysegment(&p0, &p1);
            trace!(
                "dst cell {dst_cell} edge {dst_edge}: {} sub-segments",
                segments.num_segments()
            );

            for seg in segments.segments() {
                let xi_mid = seg.xi_mid();
                let dxi = seg.dxi();
                let ws: [f64; HEX_EDGES] = std::array::from_fn(|j| {
                    hex_edge_weight(&edge_mids[j], &xi_mid, &dxi) * seg.coefficient
                });
                acc.add(dst_cell, seg.cell_id, &ws);
            }

            let total_t = segments.integrated_param_coord();
            if (total_t - 1.0).abs() > self.config.tolerance {
                warn!(
                    "total t of segment: {total_t} != 1 (diff={:e}) dst cell {dst_cell} points {:?} -> {:?}",
                    total_t - 1.0,
                    p0.coords,
                    p1.coords
                );
            }
        }
        acc
    }

    /// `dst[12 * d + ie] += w[ie] * src[12 * s + ie]` for every stored pair.
    pub fn apply(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        check_len("source", self.num_src_cells * HEX_EDGES, src.len())?;
        check_len("destination", self.num_dst_cells * HEX_EDGES, dst.len())?;
        dst.fill(0.0);
        for pair in &self.weights {
            let kd = pair.dst_cell * HEX_EDGES;
            let ks = pair.src_cell * HEX_EDGES;
            for (ie, w) in pair.weights.iter().enumerate() {
                dst[kd + ie] += w * src[ks + ie];
            }
        }
        Ok(())
    }

    pub fn dump_weights<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let header = WeightHeader {
            kind: Self::KIND,
            num_src_cells: self.num_src_cells,
            num_dst_cells: self.num_dst_cells,
        };
        weights::save_weights(path, &header, &self.weights)
    }

    /// Replace the weight table with the one stored at `path`. Repeated
    /// (dst, src) pairs in the file are summed.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (header, table) = weights::load_weights::<HexPairWeights, _>(path)?;
        if let Some(p) = table
            .iter()
            .find(|p| p.dst_cell >= header.num_dst_cells || p.src_cell >= header.num_src_cells)
        {
            return Err(RegridError::MalformedWeightFile {
                line: 0,
                message: format!(
                    "cell pair ({}, {}) is out of range",
                    p.dst_cell, p.src_cell
                ),
            });
        }
        let mut acc = WeightAccumulator::new();
        for p in &table {
            acc.add(p.dst_cell, p.src_cell, &p.weights);
        }
        self.num_src_cells = header.num_src_cells;
        self.num_dst_cells = header.num_dst_cells;
        self.weights = acc.into_sorted(0.0);
        Ok(())
    }

    pub fn num_src_cells(&self) -> usize {
        self.num_src_cells
    }

    pub fn num_dst_cells(&self) -> usize {
        self.num_dst_cells
    }

    pub fn num_edges_per_cell(&self) -> usize {
        HEX_EDGES
    }

    pub fn weights(&self) -> &[HexPairWeights] {
        &self.weights
    }

    /// Weight vector of a (destination cell, source cell) pair.
    pub fn pair_weights(&self, dst_cell: usize, src_cell: usize) -> Option<&[f64; HEX_EDGES]> {
        self.weights
            .binary_search_by_key(&(dst_cell, src_cell), |p| (p.dst_cell, p.src_cell))
            .ok()
            .map(|i| &self.weights[i].weights)
    }

    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }
}

impl fmt::Display for RegridEdges3d<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} cell pairs, {} src cells, {} dst cells",
            self.weights.len(),
            self.num_src_cells,
            self.num_dst_cells
        )?;
        for p in &self.weights {
            write!(f, "{:>8} {:>8}", p.dst_cell, p.src_cell)?;
            for w in &p.weights {
                write!(f, " {w:>12.5e}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_kind(grid: &Grid) -> Result<()> {
    if grid.kind() != CellKind::Hex {
        return Err(RegridError::CellKindMismatch {
            expected: CellKind::Hex,
            found: grid.kind(),
        });
    }
    Ok(())
}
