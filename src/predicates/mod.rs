// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! A completion program is `ExtendLegPredicate` followed by a terminal
//! predicate: `SuspendPredicate` to hand each completion to the caller, or
//! `FailPredicate` to walk the whole tree for side effects only.

pub mod extend;

pub use extend::ExtendLegPredicate;

use crate::context::CompletionContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};

/// Built-in fail predicate (Prolog's `fail.`).
///
/// This predicate always fails, forcing backtracking.
///
/// # Example
///
/// ```
/// use triod_search::completion::CompletionStrategy;
/// use triod_search::config::TriodConfig;
/// use triod_search::context::CompletionContext;
/// use triod_search::engine::EngineBuilder;
/// use triod_search::geometry::Vertex;
/// use triod_search::mapping::Mapping;
/// use triod_search::predicates::{ExtendLegPredicate, FailPredicate};
///
/// let config = TriodConfig::new(1, 1, 3).unwrap();
/// let mut ctx = CompletionContext::new(Mapping::new(config, Vertex::branch()).unwrap());
/// let engine = EngineBuilder::new()
///     .add(Box::new(ExtendLegPredicate::new(1, CompletionStrategy::Plain)))
///     .terminal(Box::new(FailPredicate))
///     .build();
///
/// // Every completion is visited, then the engine is consumed.
/// assert!(engine.search(&mut ctx).is_none());
/// assert!(ctx.trail.is_empty());
/// ```
#[derive(Debug)]
pub struct FailPredicate;

impl Predicate for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut CompletionContext, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    fn retry_pred(
        &mut self,
        _ctx: &mut CompletionContext,
        _round: usize,
        _choice: usize,
    ) -> PredicateResult {
        PredicateResult::Failure
    }

    fn name(&self) -> &str {
        "Fail"
    }
}

impl TerminalPredicate for FailPredicate {}

/// Suspends the engine so the caller can read the completed mapping.
#[derive(Debug)]
pub struct SuspendPredicate;

impl Predicate for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut CompletionContext, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }

    fn name(&self) -> &str {
        "Suspend"
    }
}

impl TerminalPredicate for SuspendPredicate {}
