// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predicate trait for the backtracking engine.
//!
//! The engine works by trying predicates in sequence. Each predicate is a
//! choice point: it can succeed, fail, offer a number of alternatives, or
//! suspend the search so the caller can look at the current state.
//!
//! # Example
//!
//! ```
//! use triod_search::context::CompletionContext;
//! use triod_search::engine::{Predicate, PredicateResult};
//!
//! #[derive(Debug)]
//! struct TwoWays;
//!
//! impl Predicate for TwoWays {
//!     fn try_pred(&mut self, _ctx: &mut CompletionContext, _round: usize) -> PredicateResult {
//!         PredicateResult::Choices(2)
//!     }
//!
//!     fn retry_pred(&mut self, _ctx: &mut CompletionContext, _round: usize, _choice: usize) -> PredicateResult {
//!         PredicateResult::Success
//!     }
//!
//!     fn name(&self) -> &str {
//!         "TwoWays"
//!     }
//! }
//! ```

use std::fmt::Debug;

use crate::context::CompletionContext;

/// Result of attempting a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
    /// Predicate succeeded. Move to next predicate in sequence.
    Success,

    /// Predicate succeeded but stay at same predicate with next round.
    /// Lets one predicate run once per appended image.
    SuccessSamePredicate,

    /// Predicate has no (more) valid choices. Backtrack to previous choice point.
    Failure,

    /// Predicate has multiple choices to explore.
    /// Engine will call retry_pred(round, choice) for each choice in 0..n.
    Choices(usize),

    /// Suspend execution. Engine returns control with state preserved.
    Suspend,
}

/// A predicate that can end a program: it fails or suspends, never succeeds.
pub trait TerminalPredicate: Predicate {}

/// A step of a backtracking search over a [`CompletionContext`].
///
/// # Lifecycle
///
/// 1. Engine calls `try_pred` when first reaching the predicate
/// 2. If Success: engine advances to next predicate
/// 3. If Choices(n): engine calls `retry_pred` for choices 0..n in turn,
///    rewinding the trail before each one
/// 4. If Failure: engine backtracks to the most recent open choice
pub trait Predicate: Debug {
    /// Try this predicate for a given round.
    ///
    /// The round starts at 0 and increments each time the predicate returns
    /// `SuccessSamePredicate`.
    fn try_pred(&mut self, ctx: &mut CompletionContext, round: usize) -> PredicateResult;

    /// Retry this predicate with a specific choice.
    ///
    /// Called after try_pred returns Choices(n), for each choice in 0..n. May
    /// return Success, SuccessSamePredicate or Failure.
    #[allow(unused)]
    fn retry_pred(
        &mut self,
        ctx: &mut CompletionContext,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        // Predicates that return Choices must implement this.
        panic!("{}::retry_pred should never be called", self.name());
    }

    /// Name for debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
