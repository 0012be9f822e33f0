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

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::{
    error::{RegridError, Result},
    geometry::{Aabb, Point3},
    mesh::cell::{Cell, CellKind},
};

/// Quadrilateral or hexahedral grid with per-cell vertex storage.
///
/// Vertices are stored flat, `kind.num_vertices()` per cell, so neighbouring
/// cells may disagree on a shared vertex (e.g. after the longitude fix-up).
/// The optional node and edge connectivity identifies the unique edges shared
/// between cells.
#[derive(Debug, Clone)]
pub struct Grid {
    kind: CellKind,
    points: Vec<Point3<f64>>,
    face_nodes: Vec<usize>,
    face_edges: Vec<usize>,
    edge_nodes: Vec<[usize; 2]>,
}

impl Grid {
    /// Grid from per-cell vertices, no connectivity.
    pub fn new(kind: CellKind, points: Vec<Point3<f64>>) -> Result<Self> {
        let nv = kind.num_vertices();
        if points.len() % nv != 0 {
            return Err(RegridError::InvalidGrid(format!(
                "{} vertices is not a multiple of {} vertices per cell",
                points.len(),
                nv
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(RegridError::InvalidGrid(format!("vertex {i} is not finite")));
        }
        Ok(Self {
            kind,
            points,
            face_nodes: Vec::new(),
            face_edges: Vec::new(),
            edge_nodes: Vec::new(),
        })
    }

    /// Grid from a flat `x, y, z` coordinate array.
    pub fn from_flat(kind: CellKind, coords: &[f64]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(RegridError::InvalidGrid(format!(
                "{} coordinates is not a multiple of 3",
                coords.len()
            )));
        }
        let points = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(kind, points)
    }

    /// Grid from shared nodes and cell-to-node connectivity. The unique edge
    /// connectivity is derived from the node ids.
    pub fn from_nodes(kind: CellKind, nodes: &[Point3<f64>], face_nodes: Vec<usize>) -> Result<Self> {
        check_face_nodes(kind, nodes.len(), &face_nodes)?;
        let points = face_nodes.iter().map(|&n| nodes[n]).collect();
        let mut grid = Self::new(kind, points)?;
        grid.face_nodes = face_nodes;
        grid.build_edge_connectivity();
        Ok(grid)
    }

    /// 2D grid on the sphere from node longitudes and latitudes (degrees).
    ///
    /// Per cell, each vertex longitude is shifted by -360, 0 or +360 to be
    /// closest to the cell's first vertex. A vertex on a pole takes the mean
    /// longitude of the cell's other vertices.
    pub fn from_lon_lat(lons: &[f64], lats: &[f64], face_nodes: Vec<usize>) -> Result<Self> {
        if lons.len() != lats.len() {
            return Err(RegridError::InvalidGrid(format!(
                "{} longitudes but {} latitudes",
                lons.len(),
                lats.len()
            )));
        }
        let kind = CellKind::Quad;
        check_face_nodes(kind, lons.len(), &face_nodes)?;
        let nv = kind.num_vertices();

        let mut points = Vec::with_capacity(face_nodes.len());
        for cell in face_nodes.chunks_exact(nv) {
            let lon_base = lons[cell[0]];
            let mut pole: Option<usize> = None;
            let mut cell_lons: SmallVec<[f64; 8]> = SmallVec::new();
            for (local, &k) in cell.iter().enumerate() {
                let diff = lons[k] - lon_base;
                let shift = [-360.0, 0.0, 360.0]
                    .into_iter()
                    .min_by(|a, b| (diff + a).abs().total_cmp(&(diff + b).abs()))
                    .unwrap_or(0.0);
                cell_lons.push(lons[k] + shift);
                if lats[k].abs() == 90.0 {
                    pole = Some(local);
                }
            }
            if let Some(p) = pole {
                let others: f64 = (0..nv).filter(|&i| i != p).map(|i| cell_lons[i]).sum();
                cell_lons[p] = others / (nv - 1) as f64;
            }
            for (local, &k) in cell.iter().enumerate() {
                points.push(Point3::new(cell_lons[local], lats[k], 0.0));
            }
        }

        let mut grid = Self::new(kind, points)?;
        grid.face_nodes = face_nodes;
        grid.build_edge_connectivity();
        Ok(grid)
    }

    /// Attach explicit unique-edge connectivity (UGRID `face_edge` and
    /// `edge_node` tables). Requires node connectivity.
    pub fn with_edge_connectivity(
        mut self,
        face_edges: Vec<usize>,
        edge_nodes: Vec<[usize; 2]>,
    ) -> Result<Self> {
        if self.face_nodes.is_empty() {
            return Err(RegridError::InvalidGrid(
                "edge connectivity requires node connectivity".into(),
            ));
        }
        if face_edges.len() != self.num_cells() * self.kind.num_edges() {
            return Err(RegridError::InvalidGrid(format!(
                "face-edge table has {} entries, expected {}",
                face_edges.len(),
                self.num_cells() * self.kind.num_edges()
            )));
        }
        if let Some(&e) = face_edges.iter().find(|&&e| e >= edge_nodes.len()) {
            return Err(RegridError::InvalidGrid(format!("edge id {e} out of range")));
        }
        self.face_edges = face_edges;
        self.edge_nodes = edge_nodes;
        Ok(self)
    }

    /// Derive unique edges from the node connectivity. An edge keeps the
    /// orientation of the first cell that references it.
    fn build_edge_connectivity(&mut self) {
        let ne = self.kind.num_edges();
        let mut index: AHashMap<(usize, usize), usize> = AHashMap::default();
        self.edge_nodes.clear();
        self.face_edges = Vec::with_capacity(self.num_cells() * ne);
        for cell in 0..self.num_cells() {
            for ie in 0..ne {
                let [n0, n1] = self.local_edge_nodes(cell, ie);
                let key = (n0.min(n1), n0.max(n1));
                let next = self.edge_nodes.len();
                let id = *index.entry(key).or_insert(next);
                if id == next {
                    self.edge_nodes.push([n0, n1]);
                }
                self.face_edges.push(id);
            }
        }
    }

    fn local_edge_nodes(&self, cell: usize, ie: usize) -> [usize; 2] {
        let nv = self.kind.num_vertices();
        let [i0, i1] = self.kind.edge_vertices()[ie];
        [self.face_nodes[cell * nv + i0], self.face_nodes[cell * nv + i1]]
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn num_cells(&self) -> usize {
        self.points.len() / self.kind.num_vertices()
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn cell_points(&self, cell: usize) -> &[Point3<f64>] {
        let nv = self.kind.num_vertices();
        &self.points[cell * nv..(cell + 1) * nv]
    }

    pub fn cell(&self, cell: usize) -> Cell<'_> {
        Cell::new(self.kind, self.cell_points(cell))
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..self.num_cells()).map(move |c| self.cell(c))
    }

    /// Physical end points of local edge `ie` of `cell`.
    pub fn edge_points(&self, cell: usize, ie: usize) -> (Point3<f64>, Point3<f64>) {
        let seg = self.cell(cell).edge(ie);
        (seg.a, seg.b)
    }

    pub fn bounds(&self) -> Option<Aabb<f64, 3>> {
        Aabb::enclosing(&self.points)
    }

    pub fn has_edge_connectivity(&self) -> bool {
        !self.face_edges.is_empty()
    }

    pub fn num_unique_edges(&self) -> usize {
        self.edge_nodes.len()
    }

    /// Node ids of local edge `ie`, in local edge orientation.
    pub fn edge_node_ids(&self, cell: usize, ie: usize) -> Option<[usize; 2]> {
        let nv = self.kind.num_vertices();
        if ie >= self.kind.num_edges() || (cell + 1) * nv > self.face_nodes.len() {
            return None;
        }
        Some(self.local_edge_nodes(cell, ie))
    }

    /// Unique edge id of local edge `ie` and its orientation: `1.0` if the
    /// unique edge runs the same way as the local edge, `-1.0` otherwise.
    pub fn edge_id(&self, cell: usize, ie: usize) -> Option<(usize, f64)> {
        let [n0, n1] = self.edge_node_ids(cell, ie)?;
        let ne = self.kind.num_edges();
        self.face_edges
            .get(cell * ne..(cell + 1) * ne)?
            .iter()
            .find_map(|&e| match self.edge_nodes[e] {
                [a, b] if a == n0 && b == n1 => Some((e, 1.0)),
                [a, b] if a == n1 && b == n0 => Some((e, -1.0)),
                _ => None,
            })
    }
}

fn check_face_nodes(kind: CellKind, num_nodes: usize, face_nodes: &[usize]) -> Result<()> {
    if face_nodes.len() % kind.num_vertices() != 0 {
        return Err(RegridError::InvalidGrid(format!(
            "{} face-node entries is not a multiple of {}",
            face_nodes.len(),
            kind.num_vertices()
        )));
    }
    if let Some(&n) = face_nodes.iter().find(|&&n| n >= num_nodes) {
        return Err(RegridError::InvalidGrid(format!(
            "node id {n} out of range ({num_nodes} nodes)"
        )));
    }
    Ok(())
}
