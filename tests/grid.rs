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

mod support;

use edgeregrid::geometry::Point3;
use edgeregrid::{CellKind, Grid, RegridError};
use support::{assert_close, quad_grid};

#[test]
fn test_grid_from_flat_coordinates() {
    let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
    let grid = Grid::from_flat(CellKind::Quad, &coords).unwrap();
    assert_eq!(grid.num_cells(), 1);
    assert_eq!(grid.cell_points(0)[2], Point3::new(1.0, 1.0, 0.0));
    assert!(!grid.has_edge_connectivity());
    assert!(grid.edge_id(0, 0).is_none());

    let (a, b) = grid.edge_points(0, 2);
    assert_eq!(a, Point3::new(0.0, 1.0, 0.0));
    assert_eq!(b, Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_invalid_grids_are_rejected() {
    let five = vec![Point3::new(0.0, 0.0, 0.0); 5];
    assert!(matches!(Grid::new(CellKind::Quad, five), Err(RegridError::InvalidGrid(_))));

    let nan = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(f64::NAN, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    assert!(matches!(Grid::new(CellKind::Quad, nan), Err(RegridError::InvalidGrid(_))));

    assert!(Grid::from_flat(CellKind::Quad, &[0.0; 7]).is_err());

    let nodes = [Point3::new(0.0, 0.0, 0.0); 3];
    let err = Grid::from_nodes(CellKind::Quad, &nodes, vec![0, 1, 2, 3]).unwrap_err();
    assert!(matches!(err, RegridError::InvalidGrid(_)));
}

#[test]
fn test_unique_edges_of_structured_grid() {
    let (nx, ny) = (3, 2);
    let grid = quad_grid(nx, ny, [0.0, 0.0], [3.0, 2.0]);
    assert!(grid.has_edge_connectivity());
    assert_eq!(grid.num_unique_edges(), nx * (ny + 1) + ny * (nx + 1));

    // right edge of cell 0 is the left edge of cell 1
    let (e01, s01) = grid.edge_id(0, 1).unwrap();
    let (e13, s13) = grid.edge_id(1, 3).unwrap();
    assert_eq!(e01, e13);
    assert_eq!(s01, s13);

    // top edge of cell 0 is the bottom edge of cell 3
    assert_eq!(grid.edge_id(0, 2).unwrap().0, grid.edge_id(3, 0).unwrap().0);
    assert_ne!(grid.edge_id(0, 0).unwrap().0, grid.edge_id(0, 2).unwrap().0);
}

#[test]
fn test_explicit_edge_connectivity_signs() {
    let nodes = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let grid = Grid::from_nodes(CellKind::Quad, &nodes, vec![0, 1, 2, 3])
        .unwrap()
        .with_edge_connectivity(vec![0, 1, 2, 3], vec![[1, 0], [1, 2], [3, 2], [0, 3]])
        .unwrap();
    assert_eq!(grid.edge_id(0, 0), Some((0, -1.0)));
    assert_eq!(grid.edge_id(0, 1), Some((1, 1.0)));
    assert_eq!(grid.edge_node_ids(0, 3), Some([0, 3]));

    let bad = Grid::from_nodes(CellKind::Quad, &nodes, vec![0, 1, 2, 3])
        .unwrap()
        .with_edge_connectivity(vec![0, 1, 2, 7], vec![[0, 1], [1, 2], [3, 2], [0, 3]]);
    assert!(matches!(bad, Err(RegridError::InvalidGrid(_))));
}

#[test]
fn test_lon_lat_dateline_fix() {
    let lons = [350.0, 10.0, 10.0, 350.0];
    let lats = [0.0, 0.0, 10.0, 10.0];
    let grid = Grid::from_lon_lat(&lons, &lats, vec![0, 1, 2, 3]).unwrap();
    let pts = grid.cell_points(0);
    assert_close(pts[0][0], 350.0, 0.0);
    assert_close(pts[1][0], 370.0, 0.0);
    assert_close(pts[2][0], 370.0, 0.0);
    assert_close(pts[3][0], 350.0, 0.0);
    assert_close(pts[2][1], 10.0, 0.0);
}

#[test]
fn test_lon_lat_pole_fix() {
    let lons = [0.0, 90.0, 45.0, 170.0];
    let lats = [80.0, 80.0, 90.0, 80.0];
    let grid = Grid::from_lon_lat(&lons, &lats, vec![0, 1, 2, 3]).unwrap();
    let pts = grid.cell_points(0);
    assert_close(pts[2][0], (0.0 + 90.0 + 170.0) / 3.0, 1e-12);
    assert_close(pts[2][1], 90.0, 0.0);

    assert!(Grid::from_lon_lat(&lons, &lats[..3], vec![0, 1, 2, 3]).is_err());
}

#[test]
fn test_bounds() {
    let grid = quad_grid(2, 2, [-1.0, 2.0], [3.0, 5.0]);
    let bb = grid.bounds().unwrap();
    assert_eq!(bb.min, Point3::new(-1.0, 2.0, 0.0));
    assert_eq!(bb.max, Point3::new(3.0, 5.0, 0.0));
    assert_eq!(grid.cells().count(), 4);
}

#[test]
fn test_edge_id_out_of_range() {
    let grid = quad_grid(2, 1, [0.0, 0.0], [2.0, 1.0]);
    assert!(grid.edge_id(1, 3).is_some());
    assert_eq!(grid.edge_id(2, 0), None);
    assert_eq!(grid.edge_id(0, 4), None);
    assert_eq!(grid.edge_node_ids(5, 0), None);
}
