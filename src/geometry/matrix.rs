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

use std::{
    array,
    ops::{Index, IndexMut, Mul},
};

use crate::numeric::scalar::Scalar;

/// Generic row-major matrix R x C
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<T: Scalar, const R: usize, const C: usize>(pub [[T; C]; R]);

// ---------- Basics ----------
impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    #[inline]
    pub fn zero() -> Self {
        Matrix([[T::zero(); C]; R])
    }

    /// Build from columns.
    #[inline]
    pub fn from_cols(cols: [[T; R]; C]) -> Self {
        Matrix(array::from_fn(|i| array::from_fn(|j| cols[j][i])))
    }

    /// Transpose into C x R.
    #[inline]
    pub fn transpose(&self) -> Matrix<T, C, R> {
        Matrix(array::from_fn(|j| array::from_fn(|i| self.0[i][j])))
    }

    /// Matrix-vector product.
    #[inline]
    pub fn mul_vec(&self, v: &[T; C]) -> [T; R] {
        array::from_fn(|i| {
            (0..C).fold(T::zero(), |acc, j| acc + self.0[i][j] * v[j])
        })
    }
}

impl<T: Scalar> Matrix<T, 2, 2> {
    #[inline]
    pub fn det(&self) -> T {
        let m = &self.0;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Inverse times determinant, defined even when singular.
    #[inline]
    pub fn adjugate(&self) -> Self {
        let m = &self.0;
        Matrix([[m[1][1], -m[0][1]], [-m[1][0], m[0][0]]])
    }
}

impl<T: Scalar> Matrix<T, 3, 3> {
    #[inline]
    pub fn det(&self) -> T {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse times determinant (transposed cofactor matrix).
    pub fn adjugate(&self) -> Self {
        let m = &self.0;
        Matrix([
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ])
    }
}

/// Square systems solved through the adjugate.
pub trait SquareMatrix<T: Scalar, const N: usize> {
    fn determinant(&self) -> T;

    /// `A^-1 rhs`, `None` when `A` is singular.
    fn solve(&self, rhs: &[T; N]) -> Option<[T; N]>;
}

macro_rules! impl_square_matrix {
    ($n:literal) => {
        impl<T: Scalar> SquareMatrix<T, $n> for Matrix<T, $n, $n> {
            #[inline]
            fn determinant(&self) -> T {
                self.det()
            }

            fn solve(&self, rhs: &[T; $n]) -> Option<[T; $n]> {
                let det = self.det();
                if det.is_zero() || !det.is_finite() {
                    return None;
                }
                Some(self.adjugate().mul_vec(rhs).map(|x| x / det))
            }
        }
    };
}

impl_square_matrix!(2);
impl_square_matrix!(3);

// ---------- Indexing ----------
impl<T: Scalar, const R: usize, const C: usize> Index<usize> for Matrix<T, R, C> {
    type Output = [T; C];
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}
impl<T: Scalar, const R: usize, const C: usize> IndexMut<usize> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

// ---------- Product ----------
impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<Matrix<T, K, C>>
    for Matrix<T, R, K>
{
    type Output = Matrix<T, R, C>;
    #[inline]
    fn mul(self, rhs: Matrix<T, K, C>) -> Self::Output {
        Matrix(array::from_fn(|i| {
            array::from_fn(|j| (0..K).fold(T::zero(), |acc, k| acc + self.0[i][k] * rhs.0[k][j]))
        }))
    }
}
