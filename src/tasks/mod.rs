// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pair/task generation.
//!
//! The search universe is every unordered pair of start mappings. A start
//! mapping fixes a basepoint image and, for surjective searches, an endpoint
//! map. Pairs whose start mappings already touch are dropped. With a prefix
//! length, each surviving pair is split further into one task per disjoint
//! pair of prefix completions.
//!
//! Task ids count every task in generation order, starting at 1, so skipped
//! tasks keep their numbers.

use std::collections::VecDeque;

use tracing::debug;

use crate::comparators::check_disjointness;
use crate::completion::{CompletionStrategy, Completions};
use crate::config::{SearchConfig, TriodConfig};
use crate::error::{Result, TriodError};
use crate::geometry::Vertex;
use crate::mapping::{EndpointMap, Mapping, MappingPair};

/// Every codomain vertex, branch point first: the candidate basepoint images.
pub fn basepoints(config: &TriodConfig) -> Vec<Vertex> {
    config.codomain().vertices().collect()
}

/// Empty mappings that start each search.
///
/// Plain searches get one per basepoint. Surjective searches get one per
/// basepoint and admissible endpoint map, with the map attached.
pub fn start_mappings(config: &TriodConfig, strategy: CompletionStrategy) -> Result<Vec<Mapping>> {
    let mut out = Vec::new();
    for basepoint in basepoints(config) {
        let empty = Mapping::new(*config, basepoint)?;
        match strategy {
            CompletionStrategy::Plain => out.push(empty),
            CompletionStrategy::Surjective => {
                for map in EndpointMap::enumerate(config, &basepoint) {
                    out.push(empty.clone().with_endpoint_map(map)?);
                }
            }
        }
    }
    Ok(out)
}

/// Lazy sequence of the tasks handed to workers.
#[derive(Debug)]
pub struct TaskGenerator {
    strategy: CompletionStrategy,
    prefix_length: usize,
    starts: Vec<Mapping>,
    /// Next unordered pair of `starts` to consider, as (i, j) with i < j.
    i: usize,
    j: usize,
    /// Prefix-completed pairs waiting to be issued.
    ready: VecDeque<(Mapping, Mapping)>,
    issued: u64,
    /// Set when expanding a pair fails; the sequence ends there.
    error: Option<TriodError>,
}

impl TaskGenerator {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let starts = start_mappings(&config.triod, config.strategy)?;
        debug!(start_mappings = starts.len(), "task universe built");
        let mut generator = Self {
            strategy: config.strategy,
            prefix_length: config.prefix_length,
            starts,
            i: 0,
            j: 1,
            ready: VecDeque::new(),
            issued: 0,
            error: None,
        };
        for _ in 0..config.pair_skip {
            if generator.next().is_none() {
                break;
            }
        }
        match generator.error.take() {
            Some(err) => Err(err),
            None => Ok(generator),
        }
    }

    /// The error that ended the sequence early, if any.
    ///
    /// A `None` from [`Iterator::next`] means the universe is exhausted only
    /// when this is also `None`.
    pub fn take_error(&mut self) -> Option<TriodError> {
        self.error.take()
    }

    /// Number of start mappings the pairs are drawn from.
    pub fn start_count(&self) -> usize {
        self.starts.len()
    }

    /// Next unordered pair of start mappings that do not touch.
    fn next_start_pair(&mut self) -> Option<(Mapping, Mapping)> {
        while self.i < self.starts.len() {
            if self.j >= self.starts.len() {
                self.i += 1;
                self.j = self.i + 1;
                continue;
            }
            let (a, b) = (&self.starts[self.i], &self.starts[self.j]);
            self.j += 1;
            if check_disjointness(a, b) > 0 {
                return Some((a.clone(), b.clone()));
            }
        }
        None
    }

    fn expand(&self, first: Mapping, second: Mapping) -> Result<VecDeque<(Mapping, Mapping)>> {
        let mut out = VecDeque::new();
        if self.prefix_length == 0 {
            out.push_back((first, second));
            return Ok(out);
        }
        let seconds: Vec<Mapping> = Completions::new(second, self.strategy, self.prefix_length)?.collect();
        for a in Completions::new(first, self.strategy, self.prefix_length)? {
            for b in &seconds {
                if check_disjointness(&a, b) > 0 {
                    out.push_back((a.clone(), b.clone()));
                }
            }
        }
        Ok(out)
    }
}

impl Iterator for TaskGenerator {
    type Item = MappingPair;

    fn next(&mut self) -> Option<MappingPair> {
        while self.error.is_none() {
            if let Some((first, second)) = self.ready.pop_front() {
                self.issued += 1;
                return Some(MappingPair::new(self.issued, first, second));
            }
            let (first, second) = self.next_start_pair()?;
            match self.expand(first, second) {
                Ok(ready) => self.ready = ready,
                Err(err) => {
                    tracing::error!(%err, "task expansion failed");
                    self.error = Some(err);
                }
            }
        }
        None
    }
}
