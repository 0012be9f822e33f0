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

use std::io;

use thiserror::Error;

use crate::mesh::cell::CellKind;

#[derive(Debug, Error)]
pub enum RegridError {
    #[error("source grid has not been set")]
    MissingSourceGrid,
    #[error("destination grid has not been set")]
    MissingDestinationGrid,
    #[error("expected {expected:?} cells, found {found:?}")]
    CellKindMismatch { expected: CellKind, found: CellKind },
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("{0} grid has no unique edge connectivity")]
    MissingConnectivity(&'static str),
    #[error("weights were computed for {expected} {grid} cells, grid has {found}")]
    GridMismatch {
        grid: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{field} field has {found} values, expected {expected}")]
    FieldSizeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed weight file at line {line}: {message}")]
    MalformedWeightFile { line: usize, message: String },
    #[error("weight file is missing the `{0}` section")]
    MissingSection(&'static str),
    #[error("weight file edge layout does not match {0:?} cells")]
    EdgeLayoutMismatch(CellKind),
}

pub type Result<T> = std::result::Result<T, RegridError>;
