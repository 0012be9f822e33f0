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
    ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub},
};

use crate::numeric::scalar::Scalar;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T: Scalar, const N: usize> {
    pub coords: [T; N],
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Vector {
            coords: [T::zero(); N],
        }
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    #[inline]
    pub fn from_coords(coords: [T; N]) -> Self {
        Vector { coords }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(T::zero(), |acc, (a, b)| acc + *a * *b)
    }

    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Unit vector, `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Self> {
        let n = self.norm();
        if n.is_zero() { None } else { Some(*self / n) }
    }

    pub fn is_zero(&self) -> bool {
        self.coords.iter().all(|c| c.is_zero())
    }
}

impl<T: Scalar> Vector<T, 2> {
    pub fn new(x: T, y: T) -> Self {
        Vector { coords: [x, y] }
    }

    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(&self, other: &Self) -> T {
        self.coords[0] * other.coords[1] - self.coords[1] * other.coords[0]
    }
}

impl<T: Scalar> Vector<T, 3> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Vector { coords: [x, y, z] }
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.coords;
        let [bx, by, bz] = other.coords;
        Vector {
            coords: [ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx],
        }
    }
}

impl<T: Scalar, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        &self.coords[i]
    }
}

impl<T: Scalar, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.coords[i]
    }
}

impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vector {
            coords: array::from_fn(|i| self.coords[i] + rhs.coords[i]),
        }
    }
}

impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vector {
            coords: array::from_fn(|i| self.coords[i] - rhs.coords[i]),
        }
    }
}

impl<T: Scalar, const N: usize> Neg for Vector<T, N> {
    type Output = Self;
    fn neg(self) -> Self {
        Vector {
            coords: self.coords.map(|c| -c),
        }
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;
    fn mul(self, s: T) -> Self {
        Vector {
            coords: self.coords.map(|c| c * s),
        }
    }
}

impl<T: Scalar, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;
    fn div(self, s: T) -> Self {
        Vector {
            coords: self.coords.map(|c| c / s),
        }
    }
}

pub type Vector2<T> = Vector<T, 2>;
pub type Vector3<T> = Vector<T, 3>;
