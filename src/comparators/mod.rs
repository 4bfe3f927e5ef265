// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tests applied to mappings and mapping pairs.
//!
//! - [`check_surjectivity`]: every codomain endpoint is an image
//! - [`check_disjointness`]: the two mappings never touch or cross
//! - [`check_commutativity`]: sampled distance between `f∘g` and `g∘f`

use crate::error::{Result, TriodError};
use crate::geometry::Point;
use crate::mapping::Mapping;

/// True iff every codomain endpoint appears among the defined images.
pub fn check_surjectivity(mapping: &Mapping) -> bool {
    let codomain = mapping.config().codomain();
    codomain
        .endpoints()
        .all(|endpoint| mapping.images().any(|image| image == endpoint))
}

/// Disjointness margin of two mappings, in codomain steps.
///
/// Returns 0 if the mappings share a basepoint, or if on some leg their
/// images coincide or swap places between consecutive steps. Otherwise
/// returns the smallest distance between images of the same domain vertex,
/// basepoints included. Only entries defined in both mappings are compared.
pub fn check_disjointness(a: &Mapping, b: &Mapping) -> usize {
    let base_a = a.basepoint();
    let base_b = b.basepoint();
    if base_a == base_b {
        return 0;
    }

    let mut margin = base_a.distance(&base_b);
    for arm in 0..a.config().t() {
        let mut prev_a = base_a;
        let mut prev_b = base_b;
        for (cur_a, cur_b) in a.leg(arm).iter().zip(b.leg(arm)) {
            if cur_a == cur_b || (*cur_a == prev_b && *cur_b == prev_a) {
                return 0;
            }
            margin = margin.min(cur_a.distance(cur_b));
            prev_a = *cur_a;
            prev_b = *cur_b;
        }
    }
    margin
}

/// Largest sampled railway distance between `a∘b` and `b∘a`.
///
/// Samples `⌈N²/M⌉ + 1` evenly spaced points on every arm. Both mappings
/// must be complete.
pub fn check_commutativity(a: &Mapping, b: &Mapping) -> Result<f64> {
    for (name, mapping) in [("first", a), ("second", b)] {
        if !mapping.is_complete() {
            return Err(TriodError::IncompleteMapping(format!(
                "{} mapping {} has undefined entries",
                name, mapping
            )));
        }
    }

    let config = a.config();
    let divisions = config.sample_divisions();
    let mut worst: f64 = 0.0;
    for arm in 0..config.t() {
        for k in 0..=divisions {
            let p = Point::at(arm, k as f64 / divisions as f64);
            let ab = compose(a, b, &p)?;
            let ba = compose(b, a, &p)?;
            worst = worst.max(ab.distance(&ba));
        }
    }
    Ok(worst)
}

/// Whether a commutativity error counts as commuting for this triod.
pub fn is_commuting(a: &Mapping, error: f64) -> bool {
    error < a.config().commutativity_tolerance()
}

fn compose(outer: &Mapping, inner: &Mapping, p: &Point) -> Result<Point> {
    inner
        .evaluate(p)
        .and_then(|q| outer.evaluate(&q))
        .ok_or_else(|| TriodError::IncompleteMapping(format!("composite undefined at {}", p)))
}
