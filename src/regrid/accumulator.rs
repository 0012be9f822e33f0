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

/// Dense weight vector of one (destination cell, source cell) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPairWeights<const E: usize> {
    pub dst_cell: usize,
    pub src_cell: usize,
    pub weights: [f64; E],
}

/// Additive accumulation of weight vectors keyed by `(dst_cell, src_cell)`.
///
/// Entries keep their first-insertion order; `merge` combines accumulators
/// built over disjoint sets of destination cells (or overlapping ones, in
/// which case matching keys are summed).
#[derive(Debug, Clone, Default)]
pub struct WeightAccumulator<const E: usize> {
    index: AHashMap<(usize, usize), usize>,
    entries: Vec<CellPairWeights<E>>,
}

impl<const E: usize> WeightAccumulator<E> {
    pub fn new() -> Self {
        Self {
            index: AHashMap::default(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, dst_cell: usize, src_cell: usize, weights: &[f64; E]) {
        let next = self.entries.len();
        let slot = *self.index.entry((dst_cell, src_cell)).or_insert(next);
        if slot == next {
            self.entries.push(CellPairWeights {
                dst_cell,
                src_cell,
                weights: *weights,
            });
        } else {
            let acc = &mut self.entries[slot].weights;
            for (a, w) in acc.iter_mut().zip(weights) {
                *a += w;
            }
        }
    }

    pub fn merge(&mut self, other: WeightAccumulator<E>) {
        for e in other.entries {
            self.add(e.dst_cell, e.src_cell, &e.weights);
        }
    }

    pub fn get(&self, dst_cell: usize, src_cell: usize) -> Option<&[f64; E]> {
        self.index
            .get(&(dst_cell, src_cell))
            .map(|&i| &self.entries[i].weights)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellPairWeights<E>> + '_ {
        self.entries.iter()
    }

    /// Entries sorted by `(dst_cell, src_cell)`, dropping vectors whose
    /// components are all within `threshold` of zero.
    pub fn into_sorted(self, threshold: f64) -> Vec<CellPairWeights<E>> {
        let mut out: Vec<_> = self
            .entries
            .into_iter()
            .filter(|e| e.weights.iter().any(|w| w.abs() > threshold))
            .collect();
        out.sort_unstable_by_key(|e| (e.dst_cell, e.src_cell));
        out
    }
}
