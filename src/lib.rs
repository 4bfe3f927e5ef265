// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search for pairs of piecewise-linear triod maps that are surjective,
//! disjoint and commute.
//!
//! A triod is a tree with one branch point and `T` equal legs. Maps send a
//! domain triod with `N` subdivisions per leg onto a codomain triod with `M`
//! subdivisions per leg, and are represented by the image of every domain
//! vertex.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`geometry`]: vertices, normalized points and the railway metric
//! - [`mapping`]: partial mappings with continuity checks, endpoint maps
//!   and mapping pairs
//!
//! ## Enumeration
//!
//! Completions are enumerated by a backtracking engine:
//! - Trail - records every leg extension for O(1) backtracking
//! - [`engine`] - runs predicates, suspending once per completion
//! - [`completion`] - the lazy [`Completions`] sequence, plain or
//!   surjectivity-aware
//!
//! ## Search
//!
//! - [`comparators`]: surjectivity, disjointness and commutativity tests
//! - [`tasks`]: the universe of start-mapping pairs
//! - [`protocol`]: coordinator and worker threads that search every pair
//!
//! # Example
//!
//! ```
//! use triod_search::completion::CompletionStrategy;
//! use triod_search::config::{SearchConfig, TriodConfig};
//! use triod_search::protocol::run_search;
//!
//! let mut config = SearchConfig::new(TriodConfig::new(1, 1, 3).unwrap());
//! config.strategy = CompletionStrategy::Plain;
//! config.workers = 2;
//! let report = run_search(&config).unwrap();
//! assert_eq!(report.summary.pairs_done, 6);
//! ```

pub mod comparators;
pub mod completion;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod predicates;
pub mod protocol;
pub mod statistics;
pub mod tasks;
pub mod trail;

// Re-export commonly used types
pub use completion::{CompletionStrategy, Completions};
pub use config::{SearchConfig, TriodConfig};
pub use context::CompletionContext;
pub use engine::{Predicate, PredicateResult, SearchEngine};
pub use error::{Result, TriodError};
pub use geometry::{Point, Vertex};
pub use mapping::{EndpointMap, Mapping, MappingPair};
pub use trail::Trail;
