// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Endpoint maps: which domain vertex goes to which codomain endpoint.
//!
//! Entry `i` names the domain vertex whose image must be the far end of
//! codomain arm `i`. Fixing these up front lets the completion enumerator
//! steer every leg toward its targets and drop branches that can no longer
//! reach them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TriodConfig;
use crate::error::{Result, TriodError};
use crate::geometry::Vertex;
use crate::mapping::Mapping;

/// An assignment of T domain vertices to the T codomain endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointMap {
    targets: Vec<Vertex>,
}

/// An unresolved endpoint target on the leg being extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTarget {
    /// Codomain arm whose endpoint the target must reach.
    pub endpoint: usize,
    /// Domain vertex that must map onto that endpoint.
    pub preimage: Vertex,
}

impl EndpointMap {
    /// Check and build an endpoint map.
    ///
    /// Any two entries must be at least `2M` apart: their images are two
    /// codomain endpoints, `2M` segments apart, and a continuous map moves at
    /// most one segment per domain segment.
    pub fn new(config: &TriodConfig, targets: Vec<Vertex>) -> Result<Self> {
        if targets.len() != config.t() {
            return Err(TriodError::InvalidEndpointMap(format!(
                "expected {} targets, got {}",
                config.t(),
                targets.len()
            )));
        }
        let domain = config.domain();
        for target in &targets {
            domain.check(target.arm(), target.dist())?;
        }
        let separation = 2 * config.m();
        for (i, a) in targets.iter().enumerate() {
            for b in &targets[i + 1..] {
                if a.distance(b) < separation {
                    return Err(TriodError::InvalidEndpointMap(format!(
                        "{} and {} are closer than {}",
                        a, b, separation
                    )));
                }
            }
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[Vertex] {
        &self.targets
    }

    /// Domain vertex mapped to the endpoint of codomain arm `endpoint`.
    pub fn target(&self, endpoint: usize) -> Vertex {
        self.targets[endpoint]
    }

    /// Whether a completion starting from `basepoint` can honour this map.
    ///
    /// A branch-point entry is only allowed for the endpoint the basepoint
    /// already sits on, and the endpoint the basepoint sits on must take the
    /// branch-point entry. Every other endpoint must be reachable: the
    /// codomain distance from the basepoint to it may not exceed the domain
    /// distance from the branch point to its preimage.
    pub fn admits_basepoint(&self, config: &TriodConfig, basepoint: &Vertex) -> bool {
        let codomain = config.codomain();
        self.targets.iter().enumerate().all(|(arm, target)| {
            let endpoint = codomain.endpoint(arm);
            let at_endpoint = *basepoint == endpoint;
            if target.is_branch() != at_endpoint {
                return false;
            }
            basepoint.distance(&endpoint) <= target.dist()
        })
    }

    /// The nearest target on `arm` whose preimage lies beyond the first
    /// `filled` vertices of that leg.
    pub fn active_target(&self, arm: usize, filled: usize) -> Option<ActiveTarget> {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_branch() && t.arm() == arm && t.dist() > filled)
            .min_by_key(|(_, t)| t.dist())
            .map(|(endpoint, preimage)| ActiveTarget {
                endpoint,
                preimage: *preimage,
            })
    }

    /// Whether domain vertex `domain` may take `image` under this map.
    ///
    /// A completion belongs to the map that names, for every endpoint, the
    /// first domain vertex (in [`Shape::vertices`] order) reaching it. So an
    /// endpoint may not be reached before its own entry.
    ///
    /// [`Shape::vertices`]: crate::geometry::Shape::vertices
    pub fn allows(&self, config: &TriodConfig, domain: &Vertex, image: &Vertex) -> bool {
        if image.is_branch() || *image != config.codomain().endpoint(image.arm()) {
            return true;
        }
        let shape = config.domain();
        domain.to_index(&shape) >= self.targets[image.arm()].to_index(&shape)
    }

    /// The map a surjective mapping belongs to: the first preimage of every
    /// endpoint, or None if some endpoint is not reached yet.
    pub fn canonical(mapping: &Mapping) -> Option<EndpointMap> {
        let config = mapping.config();
        let targets = config
            .codomain()
            .endpoints()
            .map(|endpoint| {
                config
                    .domain()
                    .vertices()
                    .find(|v| mapping.image(v) == Some(endpoint))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { targets })
    }

    /// Every endpoint map that admits `basepoint`, in lexicographic order of
    /// domain vertices (branch point first, then arm by arm outward).
    pub fn enumerate(config: &TriodConfig, basepoint: &Vertex) -> Vec<EndpointMap> {
        let points: Vec<Vertex> = config.domain().vertices().collect();
        let mut out = Vec::new();
        let mut current = Vec::with_capacity(config.t());
        extend_targets(config, basepoint, &points, &mut current, &mut out);
        out
    }
}

fn extend_targets(
    config: &TriodConfig,
    basepoint: &Vertex,
    points: &[Vertex],
    current: &mut Vec<Vertex>,
    out: &mut Vec<EndpointMap>,
) {
    if current.len() == config.t() {
        let map = EndpointMap {
            targets: current.clone(),
        };
        if map.admits_basepoint(config, basepoint) {
            out.push(map);
        }
        return;
    }
    let separation = 2 * config.m();
    for point in points {
        if current.iter().all(|placed| placed.distance(point) >= separation) {
            current.push(*point);
            extend_targets(config, basepoint, points, current, out);
            current.pop();
        }
    }
}

impl fmt::Display for EndpointMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, target) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", target)?;
        }
        write!(f, "]")
    }
}
