// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search parameters.
//!
//! [`TriodConfig`] carries N (domain subdivisions per leg), M (codomain
//! subdivisions per leg) and T (number of legs). It is `Copy` and immutable,
//! and every mapping, enumerator and comparator is handed one explicitly.
//!
//! [`SearchConfig`] adds the run parameters used by the coordinator and the
//! workers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::completion::CompletionStrategy;
use crate::error::{Result, TriodError};
use crate::geometry::Shape;

/// Default number of evaluations between worker status reports.
pub const DEFAULT_REPORT_INTERVAL: u64 = 50_000;

/// The sizes of the domain and codomain triods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriodConfig {
    n: usize,
    m: usize,
    t: usize,
}

impl TriodConfig {
    /// Create a configuration, rejecting empty triods.
    pub fn new(n: usize, m: usize, t: usize) -> Result<Self> {
        if n == 0 || m == 0 || t == 0 {
            return Err(TriodError::InvalidConfig(format!(
                "N, M and T must all be positive (got N={}, M={}, T={})",
                n, m, t
            )));
        }
        Ok(Self { n, m, t })
    }

    /// Domain subdivisions per leg.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Codomain subdivisions per leg.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of legs.
    pub fn t(&self) -> usize {
        self.t
    }

    /// The domain triod: T legs of N segments.
    pub fn domain(&self) -> Shape {
        Shape::new(self.t, self.n)
    }

    /// The codomain triod: T legs of M segments.
    pub fn codomain(&self) -> Shape {
        Shape::new(self.t, self.m)
    }

    /// Sampling divisions per arm for the commutativity test, `ceil(N^2 / M)`.
    pub fn sample_divisions(&self) -> usize {
        (self.n * self.n).div_ceil(self.m)
    }

    /// Composite error below which a pair is treated as commuting, `1 / (2NM)`.
    pub fn commutativity_tolerance(&self) -> f64 {
        1.0 / (2.0 * self.n as f64 * self.m as f64)
    }
}

/// Parameters for one distributed search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub triod: TriodConfig,
    /// Number of worker threads.
    pub workers: usize,
    /// Evaluations between status reports from a worker.
    pub report_interval: u64,
    /// Append-only event log. `None` sends events to tracing only.
    pub log_file: Option<PathBuf>,
    pub strategy: CompletionStrategy,
    /// Drop complete mappings that miss a codomain endpoint.
    pub check_surjectivity: bool,
    /// Tasks to skip before the first assignment.
    pub pair_skip: u64,
    /// Length both mappings of a task are completed to before distribution.
    pub prefix_length: usize,
    /// Report every disjoint pair, not only commuting ones.
    pub report_all: bool,
}

impl SearchConfig {
    /// Defaults for everything but the triod sizes.
    pub fn new(triod: TriodConfig) -> Self {
        Self {
            triod,
            workers: 1,
            report_interval: DEFAULT_REPORT_INTERVAL,
            log_file: None,
            strategy: CompletionStrategy::Surjective,
            check_surjectivity: true,
            pair_skip: 0,
            prefix_length: 0,
            report_all: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TriodError::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        if self.report_interval == 0 {
            return Err(TriodError::InvalidConfig(
                "report interval must be positive".to_string(),
            ));
        }
        if self.prefix_length > self.triod.n() {
            return Err(TriodError::InvalidConfig(format!(
                "prefix length {} exceeds N={}",
                self.prefix_length,
                self.triod.n()
            )));
        }
        Ok(())
    }

    /// Length both mappings are completed to before the mid-way disjointness check.
    pub fn half_length(&self) -> usize {
        self.prefix_length + (self.triod.n() - self.prefix_length) / 2
    }
}
