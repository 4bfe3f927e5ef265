// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Normalized positions on a triod.
//!
//! A point is `(arm, t)` with `t` in `[0, 1]` measured from the branch point.
//! Normalizing puts the domain (N segments per leg) and the codomain
//! (M segments per leg) in one coordinate space, so maps can be composed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriodError};
use crate::geometry::Shape;

/// A normalized position on a triod. All `t == 0` points are the branch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    arm: usize,
    t: f64,
}

impl Point {
    pub const fn branch() -> Self {
        Self { arm: 0, t: 0.0 }
    }

    /// Build a point without a bounds check.
    pub fn at(arm: usize, t: f64) -> Self {
        if t == 0.0 {
            Self::branch()
        } else {
            Self { arm, t }
        }
    }

    /// Build a point on a triod with `legs` legs, checking `arm` and `t`.
    pub fn new(legs: usize, arm: usize, t: f64) -> Result<Self> {
        if arm >= legs || !(0.0..=1.0).contains(&t) {
            return Err(TriodError::OutOfRange {
                arm,
                dist: t.to_string(),
                legs,
                length: 1,
            });
        }
        Ok(Self::at(arm, t))
    }

    pub fn arm(&self) -> usize {
        self.arm
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// Railway distance in normalized units.
    pub fn distance(&self, other: &Point) -> f64 {
        if self.arm == other.arm {
            (self.t - other.t).abs()
        } else {
            self.t + other.t
        }
    }

    /// Tuple form on `shape`: `t` scaled to `[0, length]`.
    pub fn scaled(&self, shape: &Shape) -> (usize, f64) {
        (self.arm, self.t * shape.length() as f64)
    }

    /// Inverse of [`Point::scaled`].
    pub fn from_scaled(shape: &Shape, arm: usize, s: f64) -> Result<Self> {
        Self::new(shape.legs(), arm, s / shape.length() as f64)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p({}, {:.4})", self.arm, self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    #[test]
    fn test_zero_collapse() {
        assert_eq!(Point::at(2, 0.0), Point::branch());
        assert_eq!(Point::at(1, 0.0), Point::at(0, 0.0));
        assert_ne!(Point::at(1, 0.5), Point::at(0, 0.5));
    }

    #[test]
    fn test_out_of_range() {
        assert!(Point::new(3, 3, 0.5).is_err());
        assert!(Point::new(3, 0, 1.5).is_err());
        assert!(Point::new(3, 0, -0.1).is_err());
        assert!(Point::new(3, 2, 1.0).is_ok());
    }

    #[test]
    fn test_distance() {
        assert!((Point::at(0, 0.75).distance(&Point::at(0, 0.25)) - 0.5).abs() < 1e-12);
        assert!((Point::at(0, 0.75).distance(&Point::at(2, 0.25)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_round_trip() {
        let shape = Shape::new(3, 4);
        let p = Vertex::at(1, 3).to_point(&shape);
        assert_eq!(p, Point::at(1, 0.75));
        assert_eq!(p.scaled(&shape), (1, 3.0));
        assert_eq!(Point::from_scaled(&shape, 1, 3.0).unwrap(), p);
    }
}
