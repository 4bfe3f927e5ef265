// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Grid vertices on a triod.
//!
//! A vertex is `(arm, dist)` where `dist` counts segments out from the branch
//! point. Every `dist == 0` vertex is the branch point, whatever its arm: the
//! constructors store it as `(0, 0)`, so the derived equality, hashing and
//! ordering all see a single branch point.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Point, Shape};

/// A vertex of a subdivided triod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Vertex {
    arm: usize,
    dist: usize,
}

impl Vertex {
    /// The branch point.
    pub const fn branch() -> Self {
        Self { arm: 0, dist: 0 }
    }

    /// Build a vertex without a bounds check.
    ///
    /// Used for literal coordinates whose triod is implied by context; anything
    /// read from outside goes through [`Vertex::new`].
    pub const fn at(arm: usize, dist: usize) -> Self {
        if dist == 0 {
            Self::branch()
        } else {
            Self { arm, dist }
        }
    }

    /// Build a vertex on `shape`, failing with `OutOfRange` if it is not on it.
    pub fn new(shape: &Shape, arm: usize, dist: usize) -> Result<Self> {
        shape.check(arm, dist)?;
        Ok(Self::at(arm, dist))
    }

    pub fn arm(&self) -> usize {
        self.arm
    }

    pub fn dist(&self) -> usize {
        self.dist
    }

    pub fn is_branch(&self) -> bool {
        self.dist == 0
    }

    /// Railway distance: same arm `|d1 - d2|`, different arms `d1 + d2`.
    pub fn distance(&self, other: &Vertex) -> usize {
        if self.arm == other.arm {
            self.dist.abs_diff(other.dist)
        } else {
            self.dist + other.dist
        }
    }

    /// Equal or one segment apart.
    pub fn is_adjacent(&self, other: &Vertex) -> bool {
        self.distance(other) <= 1
    }

    /// This vertex and its tree neighbours in search order.
    ///
    /// For an interior vertex: itself, the neighbour toward the branch point,
    /// then the neighbour away from it (absent at an endpoint). For the branch
    /// point: itself, then the first vertex of every arm in ascending arm order.
    /// Completion enumeration relies on this order.
    pub fn adjacent(&self, shape: &Shape) -> Vec<Vertex> {
        if self.is_branch() {
            let mut out = Vec::with_capacity(shape.legs() + 1);
            out.push(*self);
            out.extend((0..shape.legs()).map(|arm| Vertex::at(arm, 1)));
            return out;
        }
        let mut out = Vec::with_capacity(3);
        out.push(*self);
        out.push(Vertex::at(self.arm, self.dist - 1));
        if self.dist < shape.length() {
            out.push(Vertex::at(self.arm, self.dist + 1));
        }
        out
    }

    /// The neighbour one step closer to `target`, or `None` at the target.
    pub fn toward(&self, target: &Vertex) -> Option<Vertex> {
        if self == target {
            None
        } else if self.is_branch() {
            Some(Vertex::at(target.arm, 1))
        } else if self.arm != target.arm || target.dist < self.dist {
            Some(Vertex::at(self.arm, self.dist - 1))
        } else {
            Some(Vertex::at(self.arm, self.dist + 1))
        }
    }

    /// Index form: `0` for the branch point, `arm * length + dist` otherwise.
    pub fn to_index(&self, shape: &Shape) -> usize {
        if self.is_branch() {
            0
        } else {
            self.arm * shape.length() + self.dist
        }
    }

    /// Inverse of [`Vertex::to_index`].
    pub fn from_index(shape: &Shape, index: usize) -> Result<Self> {
        if index == 0 {
            return Ok(Self::branch());
        }
        let arm = (index - 1) / shape.length();
        let dist = (index - 1) % shape.length() + 1;
        Self::new(shape, arm, dist)
    }

    /// Normalized form, with `dist` scaled into `[0, 1]`.
    pub fn to_point(&self, shape: &Shape) -> Point {
        Point::at(self.arm, self.dist as f64 / shape.length() as f64)
    }
}

impl Sub for Vertex {
    type Output = usize;

    fn sub(self, other: Vertex) -> usize {
        self.distance(&other)
    }
}

impl From<(usize, usize)> for Vertex {
    fn from((arm, dist): (usize, usize)) -> Self {
        Vertex::at(arm, dist)
    }
}

impl From<Vertex> for (usize, usize) {
    fn from(v: Vertex) -> Self {
        (v.arm, v.dist)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v({}, {})", self.arm, self.dist)
    }
}
