// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Completion enumerator.
//!
//! [`Completions`] extends a partial mapping leg by leg until every leg has a
//! target length, yielding each valid completion once. Completions are
//! produced lazily by a suspended [`SearchEngine`], so memory stays bounded by
//! the mapping size regardless of how many completions exist.
//!
//! Candidate order on every step is the adjacency order of the codomain
//! (stay, toward the branch point, away from it), which fixes the order of the
//! whole sequence.
//!
//! # Example
//!
//! ```
//! use triod_search::completion::{CompletionStrategy, Completions};
//! use triod_search::config::TriodConfig;
//! use triod_search::geometry::Vertex;
//! use triod_search::mapping::Mapping;
//!
//! let config = TriodConfig::new(1, 1, 3).unwrap();
//! let start = Mapping::new(config, Vertex::branch()).unwrap();
//! let all = Completions::new(start, CompletionStrategy::Plain, 1).unwrap();
//! assert_eq!(all.count(), 64);
//! ```

pub mod candidates;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::context::CompletionContext;
use crate::engine::{EngineBuilder, SearchEngine};
use crate::error::{Result, TriodError};
use crate::mapping::{EndpointMap, Mapping};
use crate::predicates::{ExtendLegPredicate, SuspendPredicate};

/// How candidate images are chosen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompletionStrategy {
    /// Every continuous extension.
    Plain,
    /// Only extensions that can still reach the endpoint-map targets.
    Surjective,
}

/// Lazy sequence of the completions of one partial mapping.
///
/// With [`CompletionStrategy::Surjective`] and no endpoint map attached to
/// the start mapping, each endpoint map the basepoint admits is tried in turn
/// and attached to the completions it produces. A completion is only produced
/// under the map naming the first preimage of every endpoint, so complete
/// mappings appear once. Shorter prefixes appear once per map that can still
/// claim them.
#[derive(Debug)]
pub struct Completions {
    start: Mapping,
    strategy: CompletionStrategy,
    length: usize,
    stop_at: Option<Mapping>,
    /// Endpoint maps not yet searched.
    pending: std::vec::IntoIter<EndpointMap>,
    ctx: Option<CompletionContext>,
    engine: Option<SearchEngine>,
    finished: bool,
}

impl Completions {
    /// Enumerate completions of `start` with every leg at least `length` long.
    pub fn new(start: Mapping, strategy: CompletionStrategy, length: usize) -> Result<Self> {
        let n = start.config().n();
        if length > n {
            return Err(TriodError::InvalidConfig(format!(
                "completion length {} exceeds N={}",
                length, n
            )));
        }

        let pending = match (strategy, start.endpoint_map()) {
            (CompletionStrategy::Surjective, None) => {
                EndpointMap::enumerate(start.config(), &start.basepoint())
            }
            _ => Vec::new(),
        };
        let mut completions = Self {
            start,
            strategy,
            length,
            stop_at: None,
            pending: pending.into_iter(),
            ctx: None,
            engine: None,
            finished: false,
        };
        if strategy == CompletionStrategy::Plain || completions.start.endpoint_map().is_some() {
            completions.begin(completions.start.clone());
        }
        Ok(completions)
    }

    /// End the sequence right after yielding `last`.
    pub fn with_stop_at(mut self, last: Mapping) -> Self {
        self.stop_at = Some(last);
        self
    }

    pub fn strategy(&self) -> CompletionStrategy {
        self.strategy
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn begin(&mut self, mapping: Mapping) {
        self.ctx = Some(CompletionContext::new(mapping));
        self.engine = Some(
            EngineBuilder::new()
                .add(Box::new(ExtendLegPredicate::new(self.length, self.strategy)))
                .terminal(Box::new(SuspendPredicate))
                .build(),
        );
    }

    /// Start the search for the next endpoint map. Returns false when none remain.
    fn begin_next_endpoint_map(&mut self) -> bool {
        for map in self.pending.by_ref() {
            match self.start.clone().with_endpoint_map(map) {
                Ok(mapping) => {
                    self.begin(mapping);
                    return true;
                }
                Err(err) => tracing::debug!(%err, "skipping endpoint map"),
            }
        }
        false
    }
}

impl Iterator for Completions {
    type Item = Mapping;

    fn next(&mut self) -> Option<Mapping> {
        while !self.finished {
            if let (Some(engine), Some(ctx)) = (self.engine.take(), self.ctx.as_mut()) {
                if let Some(engine) = engine.search(ctx) {
                    self.engine = Some(engine);
                    let found = ctx.mapping.clone();
                    if self.stop_at.as_ref() == Some(&found) {
                        self.finished = true;
                    }
                    return Some(found);
                }
            }
            if !self.begin_next_endpoint_map() {
                self.finished = true;
            }
        }
        None
    }
}
