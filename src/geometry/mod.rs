// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Coordinates on triods.
//!
//! - Shape: legs and segments per leg of one triod
//! - Vertex: integer grid point `(arm, dist)`
//! - Point: normalized position `(arm, t)` used for interpolation and sampling
//!
//! Both coordinate types use the railway metric and treat every
//! zero-distance coordinate as the single branch point.

pub mod point;
pub mod shape;
pub mod vertex;

pub use point::Point;
pub use shape::Shape;
pub use vertex::Vertex;
