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

//! Plain-text weight tables.
//!
//! ```text
//! edgeregrid-weights 1
//! kind quad
//! num_src_cells 4
//! num_dst_cells 9
//! num_edges_per_cell 4
//! edge 0 0.0 0.0 0.0 1.0 0.0 0.0
//! ...
//! num_weights 42
//! 0 0 3 1 0.25
//! ...
//! ```
//!
//! One `edge` line per local edge gives its reference parametric end points;
//! they are checked on load. Blank lines and `#` comments are ignored.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{RegridError, Result},
    mesh::cell::CellKind,
    regrid::{accumulator::CellPairWeights, regrid_edges::WeightEntry},
};

const MAGIC: &str = "edgeregrid-weights";
const VERSION: u32 = 1;

/// Sizes stored ahead of the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightHeader {
    pub kind: CellKind,
    pub num_src_cells: usize,
    pub num_dst_cells: usize,
}

/// One line of the weight section.
pub trait WeightRecord: Sized {
    const KIND: CellKind;

    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()>;

    fn parse_record(fields: &[&str]) -> std::result::Result<Self, String>;
}

impl WeightRecord for WeightEntry {
    const KIND: CellKind = CellKind::Quad;

    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} {} {} {} {:?}",
            self.dst_cell, self.dst_edge, self.src_cell, self.src_edge, self.weight
        )
    }

    fn parse_record(fields: &[&str]) -> std::result::Result<Self, String> {
        let [dst_cell, dst_edge, src_cell, src_edge, weight] = fields else {
            return Err(format!("expected 5 fields, found {}", fields.len()));
        };
        Ok(WeightEntry {
            dst_cell: parse_field(dst_cell)?,
            dst_edge: parse_field(dst_edge)?,
            src_cell: parse_field(src_cell)?,
            src_edge: parse_field(src_edge)?,
            weight: parse_field(weight)?,
        })
    }
}

impl WeightRecord for CellPairWeights<12> {
    const KIND: CellKind = CellKind::Hex;

    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{} {}", self.dst_cell, self.src_cell)?;
        for w in &self.weights {
            write!(out, " {:?}", w)?;
        }
        writeln!(out)
    }

    fn parse_record(fields: &[&str]) -> std::result::Result<Self, String> {
        if fields.len() != 14 {
            return Err(format!("expected 14 fields, found {}", fields.len()));
        }
        let mut weights = [0.0; 12];
        for (w, f) in weights.iter_mut().zip(&fields[2..]) {
            *w = parse_field(f)?;
        }
        Ok(CellPairWeights {
            dst_cell: parse_field(fields[0])?,
            src_cell: parse_field(fields[1])?,
            weights,
        })
    }
}

fn parse_field<F: FromStr>(s: &str) -> std::result::Result<F, String> {
    s.parse().map_err(|_| format!("cannot parse `{s}`"))
}

fn kind_name(kind: CellKind) -> &'static str {
    match kind {
        CellKind::Quad => "quad",
        CellKind::Hex => "hex",
    }
}

pub fn write_weights<R: WeightRecord, W: Write>(
    mut out: W,
    header: &WeightHeader,
    records: &[R],
) -> io::Result<()> {
    let kind = header.kind;
    writeln!(out, "{MAGIC} {VERSION}")?;
    writeln!(out, "kind {}", kind_name(kind))?;
    writeln!(out, "num_src_cells {}", header.num_src_cells)?;
    writeln!(out, "num_dst_cells {}", header.num_dst_cells)?;
    writeln!(out, "num_edges_per_cell {}", kind.num_edges())?;
    for ie in 0..kind.num_edges() {
        let (a, b) = kind.reference_edge(ie);
        writeln!(
            out,
            "edge {ie} {:?} {:?} {:?} {:?} {:?} {:?}",
            a[0], a[1], a[2], b[0], b[1], b[2]
        )?;
    }
    writeln!(out, "num_weights {}", records.len())?;
    for r in records {
        r.write_record(&mut out)?;
    }
    out.flush()
}

pub fn save_weights<R: WeightRecord, P: AsRef<Path>>(
    path: P,
    header: &WeightHeader,
    records: &[R],
) -> Result<()> {
    let file = File::create(path)?;
    write_weights(BufWriter::new(file), header, records)?;
    Ok(())
}

pub fn load_weights<R: WeightRecord, P: AsRef<Path>>(path: P) -> Result<(WeightHeader, Vec<R>)> {
    let file = File::open(path)?;
    read_weights(BufReader::new(file))
}

/// Line source skipping blanks and comments, tracking 1-based line numbers.
struct Lines<B> {
    inner: io::Lines<B>,
    line: usize,
}

impl<B: BufRead> Lines<B> {
    fn next_line(&mut self) -> Result<Option<String>> {
        for l in self.inner.by_ref() {
            let l = l?;
            self.line += 1;
            let t = l.trim();
            if !t.is_empty() && !t.starts_with('#') {
                return Ok(Some(t.to_string()));
            }
        }
        Ok(None)
    }

    fn malformed(&self, message: impl Into<String>) -> RegridError {
        RegridError::MalformedWeightFile {
            line: self.line,
            message: message.into(),
        }
    }

    /// Read `key value` and parse the value.
    fn keyed<F: FromStr>(&mut self, key: &'static str) -> Result<F> {
        let Some(l) = self.next_line()? else {
            return Err(RegridError::MissingSection(key));
        };
        let mut parts = l.split_whitespace();
        if parts.next() != Some(key) {
            return Err(RegridError::MissingSection(key));
        }
        let value = parts.next().ok_or_else(|| self.malformed(format!("`{key}` has no value")))?;
        parse_field(value).map_err(|m| self.malformed(m))
    }
}

pub fn read_weights<R: WeightRecord, B: BufRead>(input: B) -> Result<(WeightHeader, Vec<R>)> {
    let mut lines = Lines {
        inner: input.lines(),
        line: 0,
    };

    let magic = lines.next_line()?.ok_or(RegridError::MissingSection(MAGIC))?;
    let mut parts = magic.split_whitespace();
    if parts.next() != Some(MAGIC) {
        return Err(lines.malformed(format!("expected `{MAGIC}` header")));
    }
    let version: u32 = parts
        .next()
        .ok_or_else(|| lines.malformed("missing format version"))
        .and_then(|v| parse_field(v).map_err(|m| lines.malformed(m)))?;
    if version != VERSION {
        return Err(lines.malformed(format!("unsupported format version {version}")));
    }

    let kind_str: String = lines.keyed("kind")?;
    let kind = match kind_str.as_str() {
        "quad" => CellKind::Quad,
        "hex" => CellKind::Hex,
        other => return Err(lines.malformed(format!("unknown cell kind `{other}`"))),
    };
    if kind != R::KIND {
        return Err(RegridError::CellKindMismatch {
            expected: R::KIND,
            found: kind,
        });
    }
    let num_src_cells: usize = lines.keyed("num_src_cells")?;
    let num_dst_cells: usize = lines.keyed("num_dst_cells")?;
    let num_edges: usize = lines.keyed("num_edges_per_cell")?;
    if num_edges != kind.num_edges() {
        return Err(RegridError::EdgeLayoutMismatch(kind));
    }

    for ie in 0..num_edges {
        let l = lines.next_line()?.ok_or(RegridError::MissingSection("edge"))?;
        let fields: Vec<&str> = l.split_whitespace().collect();
        if fields.first() != Some(&"edge") {
            return Err(RegridError::MissingSection("edge"));
        }
        if fields.len() != 8 {
            return Err(lines.malformed(format!("expected 8 fields, found {}", fields.len())));
        }
        let id: usize = parse_field(fields[1]).map_err(|m| lines.malformed(m))?;
        let mut coords = [0.0; 6];
        for (c, f) in coords.iter_mut().zip(&fields[2..]) {
            *c = parse_field(f).map_err(|m| lines.malformed(m))?;
        }
        let (a, b) = kind.reference_edge(ie);
        let expected = [a[0], a[1], a[2], b[0], b[1], b[2]];
        if id != ie || coords != expected {
            return Err(RegridError::EdgeLayoutMismatch(kind));
        }
    }

    let num_weights: usize = lines.keyed("num_weights")?;
    let mut records = Vec::with_capacity(num_weights);
    for _ in 0..num_weights {
        let Some(l) = lines.next_line()? else {
            return Err(lines.malformed(format!(
                "expected {num_weights} weights, found {}",
                records.len()
            )));
        };
        let fields: Vec<&str> = l.split_whitespace().collect();
        records.push(R::parse_record(&fields).map_err(|m| lines.malformed(m))?);
    }
    if lines.next_line()?.is_some() {
        return Err(lines.malformed("trailing data after the last weight"));
    }

    Ok((
        WeightHeader {
            kind,
            num_src_cells,
            num_dst_cells,
        },
        records,
    ))
}
