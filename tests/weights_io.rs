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

use edgeregrid::io::{WeightHeader, read_weights, write_weights};
use edgeregrid::regrid::HexPairWeights;
use edgeregrid::{CellKind, RegridError, WeightEntry};

fn quad_header() -> WeightHeader {
    WeightHeader {
        kind: CellKind::Quad,
        num_src_cells: 3,
        num_dst_cells: 2,
    }
}

fn quad_entries() -> Vec<WeightEntry> {
    vec![
        WeightEntry {
            dst_cell: 0,
            dst_edge: 1,
            src_cell: 2,
            src_edge: 3,
            weight: 0.1,
        },
        WeightEntry {
            dst_cell: 1,
            dst_edge: 0,
            src_cell: 0,
            src_edge: 0,
            weight: -1.0 / 3.0,
        },
    ]
}

fn quad_text() -> String {
    let mut buf = Vec::new();
    write_weights(&mut buf, &quad_header(), &quad_entries()).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_quad_table_round_trip() {
    let text = quad_text();
    assert!(text.starts_with("edgeregrid-weights 1\nkind quad\n"));
    assert!(text.contains("edge 0 0.0 0.0 0.0 1.0 0.0 0.0\n"));

    let (header, entries) = read_weights::<WeightEntry, _>(text.as_bytes()).unwrap();
    assert_eq!(header, quad_header());
    assert_eq!(entries, quad_entries());
}

#[test]
fn test_hex_table_round_trip() {
    let header = WeightHeader {
        kind: CellKind::Hex,
        num_src_cells: 1,
        num_dst_cells: 1,
    };
    let pairs = vec![HexPairWeights {
        dst_cell: 0,
        src_cell: 0,
        weights: std::array::from_fn(|i| 0.125 * i as f64),
    }];
    let mut buf = Vec::new();
    write_weights(&mut buf, &header, &pairs).unwrap();
    let (h, p) = read_weights::<HexPairWeights, _>(buf.as_slice()).unwrap();
    assert_eq!(h, header);
    assert_eq!(p, pairs);
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let text = quad_text().replace("kind quad\n", "\n# written by a test\nkind quad\n\n");
    let (_, entries) = read_weights::<WeightEntry, _>(text.as_bytes()).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_wrong_kind() {
    let err = read_weights::<HexPairWeights, _>(quad_text().as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        RegridError::CellKindMismatch {
            expected: CellKind::Hex,
            found: CellKind::Quad
        }
    ));
}

#[test]
fn test_edge_layout_is_checked() {
    let text = quad_text().replace("edge 2 0.0 1.0 0.0 1.0 1.0 0.0", "edge 2 1.0 1.0 0.0 0.0 1.0 0.0");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::EdgeLayoutMismatch(CellKind::Quad))
    ));

    let text = quad_text().replace("num_edges_per_cell 4", "num_edges_per_cell 3");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::EdgeLayoutMismatch(CellKind::Quad))
    ));
}

#[test]
fn test_malformed_files() {
    assert!(matches!(
        read_weights::<WeightEntry, _>("".as_bytes()),
        Err(RegridError::MissingSection(_))
    ));
    assert!(matches!(
        read_weights::<WeightEntry, _>("not-a-weight-file 1\n".as_bytes()),
        Err(RegridError::MalformedWeightFile { line: 1, .. })
    ));
    assert!(matches!(
        read_weights::<WeightEntry, _>("edgeregrid-weights 2\n".as_bytes()),
        Err(RegridError::MalformedWeightFile { .. })
    ));

    let text = quad_text().replace("num_src_cells 3", "num_cells 3");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::MissingSection("num_src_cells"))
    ));

    let text = quad_text().replace("num_weights 2", "num_weights 3");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::MalformedWeightFile { .. })
    ));

    let text = quad_text().replace("num_weights 2", "num_weights 1");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::MalformedWeightFile { .. })
    ));

    let text = quad_text().replace("0 1 2 3 0.1", "0 1 two 3 0.1");
    assert!(matches!(
        read_weights::<WeightEntry, _>(text.as_bytes()),
        Err(RegridError::MalformedWeightFile { .. })
    ));
}
