// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The size of one triod: how many legs, and how many segments per leg.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriodError};
use crate::geometry::Vertex;

/// A triod with `legs` legs, each subdivided into `length` equal segments.
///
/// The domain of a search uses `length = N`, the codomain `length = M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    legs: usize,
    length: usize,
}

impl Shape {
    pub fn new(legs: usize, length: usize) -> Self {
        Self { legs, length }
    }

    pub fn legs(&self) -> usize {
        self.legs
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of vertices, counting the branch point once.
    pub fn vertex_count(&self) -> usize {
        1 + self.legs * self.length
    }

    /// Fail with `OutOfRange` unless `(arm, dist)` lies on this triod.
    pub fn check(&self, arm: usize, dist: usize) -> Result<()> {
        if arm >= self.legs || dist > self.length {
            return Err(TriodError::OutOfRange {
                arm,
                dist: dist.to_string(),
                legs: self.legs,
                length: self.length,
            });
        }
        Ok(())
    }

    pub fn contains(&self, vertex: &Vertex) -> bool {
        vertex.arm() < self.legs && vertex.dist() <= self.length
    }

    /// The far end of `arm`.
    pub fn endpoint(&self, arm: usize) -> Vertex {
        Vertex::at(arm, self.length)
    }

    /// Far ends of every arm, in arm order.
    pub fn endpoints(self) -> impl Iterator<Item = Vertex> {
        (0..self.legs).map(move |arm| self.endpoint(arm))
    }

    /// Every vertex: the branch point, then arm 0 outward, arm 1 outward, ...
    pub fn vertices(self) -> impl Iterator<Item = Vertex> {
        let length = self.length;
        std::iter::once(Vertex::branch()).chain(
            (0..self.legs).flat_map(move |arm| (1..=length).map(move |dist| Vertex::at(arm, dist))),
        )
    }
}
