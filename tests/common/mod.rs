// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use triod_search::geometry::{Point, Vertex};
use triod_search::{Mapping, TriodConfig};

pub fn config(n: usize, m: usize, t: usize) -> TriodConfig {
    TriodConfig::new(n, m, t).unwrap()
}

/// Build a mapping from `(arm, dist)` pairs, one list per leg.
pub fn mapping(config: TriodConfig, basepoint: (usize, usize), legs: &[&[(usize, usize)]]) -> Mapping {
    let legs = legs
        .iter()
        .map(|leg| leg.iter().map(|&(arm, dist)| Vertex::at(arm, dist)).collect())
        .collect();
    Mapping::from_legs(config, Vertex::at(basepoint.0, basepoint.1), legs).unwrap()
}

/// Leg `k` onto leg `(k + shift) mod T`, with `N == M`.
pub fn rotation(config: TriodConfig, shift: usize) -> Mapping {
    let t = config.t();
    let legs = (0..t)
        .map(|arm| (1..=config.n()).map(|d| Vertex::at((arm + shift) % t, d)).collect())
        .collect();
    Mapping::from_legs(config, Vertex::branch(), legs).unwrap()
}

pub fn identity(config: TriodConfig) -> Mapping {
    rotation(config, 0)
}

/// Every mapping sends the whole domain to `image`.
pub fn constant(config: TriodConfig, image: Vertex) -> Mapping {
    let legs = vec![vec![image; config.n()]; config.t()];
    Mapping::from_legs(config, image, legs).unwrap()
}

/// `steps + 1` evenly spaced points on every arm.
pub fn sample_points(legs: usize, steps: usize) -> Vec<Point> {
    (0..legs)
        .flat_map(|arm| (0..=steps).map(move |k| Point::at(arm, k as f64 / steps as f64)))
        .collect()
}

pub fn close(a: &Point, b: &Point) -> bool {
    a.distance(b) < 1e-9
}
