// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking search engine.
//!
//! The engine runs a sequence of predicates over a [`CompletionContext`] and
//! uses the context's trail to restore the mapping on backtracking.
//!
//! # Architecture
//!
//! The engine maintains a stack of predicate execution states. Each entry tracks:
//! - Which predicate is executing
//! - Current round number (for predicates that execute multiple times)
//! - Choice mode state (whether we're trying alternatives)
//! - Current choice index (when in choice mode)
//!
//! Execution model:
//! 1. Call try_pred(round) on each predicate
//! 2. If Success: advance to next predicate
//! 3. If SuccessSamePredicate: increment round, stay at same predicate
//! 4. If Choices(n): enter choice mode, call retry_pred(round, 0..n-1)
//! 5. If Failure: backtrack to the most recent entry with choices left
//! 6. If Suspend: pause and return control to caller
//!
//! A suspended engine resumes by backtracking out of the suspension point, so
//! repeated calls to [`SearchEngine::search`] walk every solution once.

pub mod predicate;

pub use predicate::{Predicate, PredicateResult, TerminalPredicate};

use crate::context::CompletionContext;

/// Initial capacity of the predicate stack.
const STACK_CAPACITY: usize = 64;

/// Stack entry tracking the state of one predicate execution.
#[derive(Debug)]
struct StackEntry {
    /// Index of the predicate in the predicates list.
    predicate_index: usize,

    /// Current round number (incremented by SuccessSamePredicate).
    round: usize,

    /// Whether we're in choice mode (exploring alternatives).
    in_choice_mode: bool,

    /// Current choice being tried (when in_choice_mode is true).
    current_choice: usize,

    /// Total number of choices (when in_choice_mode is true).
    num_choices: usize,

    /// Trail length to rewind to before running this entry.
    trail_checkpoint: usize,
}

/// Search engine that coordinates predicate execution and backtracking.
#[derive(Debug)]
pub struct SearchEngine {
    /// List of predicates to execute in sequence.
    predicates: Vec<Box<dyn Predicate>>,

    /// Stack of predicate execution states.
    stack: Vec<StackEntry>,

    /// Whether the first search call has happened.
    started: bool,

    /// Trail length when the search started; restored on exhaustion.
    base_checkpoint: usize,

    /// Statistics: number of try_pred calls.
    try_count: u64,

    /// Statistics: number of retry_pred calls (backtracks).
    retry_count: u64,
}

impl SearchEngine {
    /// Create a new search engine with the given predicates.
    ///
    /// The last predicate should be terminal (fail or suspend);
    /// [`EngineBuilder`] enforces this.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            predicates,
            stack: Vec::with_capacity(STACK_CAPACITY),
            started: false,
            base_checkpoint: 0,
            try_count: 0,
            retry_count: 0,
        }
    }

    /// Run the search to the next suspension.
    ///
    /// Consumes the engine and returns:
    /// - `Some(engine)` if suspended - call search() again for the next solution
    /// - `None` if exhausted - the search is complete
    ///
    /// Solutions are reported through the state of `ctx` at suspension time.
    ///
    /// # Panics
    ///
    /// Panics if the predicate sequence runs off its end, which means the last
    /// predicate was not terminal.
    pub fn search(mut self, ctx: &mut CompletionContext) -> Option<Self> {
        if !self.started {
            self.started = true;
            self.base_checkpoint = ctx.trail.len();
            if self.predicates.is_empty() {
                return None;
            }
            self.stack.push(StackEntry {
                predicate_index: 0,
                round: 0,
                in_choice_mode: false,
                current_choice: 0,
                num_choices: 0,
                trail_checkpoint: ctx.trail.len(),
            });
        } else {
            // Resume: the suspended entry has no alternatives of its own.
            self.backtrack();
        }

        loop {
            let Some(entry) = self.stack.last_mut() else {
                ctx.rewind_to(self.base_checkpoint);
                return None;
            };

            ctx.rewind_to(entry.trail_checkpoint);

            if !entry.in_choice_mode {
                let pred_idx = entry.predicate_index;
                let round = entry.round;
                self.try_count += 1;
                let result = self.predicates[pred_idx].try_pred(ctx, round);

                match result {
                    PredicateResult::Success => self.push_next_predicate(ctx),
                    PredicateResult::SuccessSamePredicate => self.push_same_predicate(ctx),
                    PredicateResult::Failure => self.backtrack(),
                    PredicateResult::Choices(n) => {
                        if let Some(entry) = self.stack.last_mut() {
                            entry.in_choice_mode = true;
                            entry.current_choice = 0;
                            entry.num_choices = n;
                            entry.trail_checkpoint = ctx.trail.len();
                        }
                    }
                    PredicateResult::Suspend => return Some(self),
                }
            } else {
                if entry.current_choice >= entry.num_choices {
                    self.backtrack();
                    continue;
                }

                let pred_idx = entry.predicate_index;
                let round = entry.round;
                let choice = entry.current_choice;
                entry.current_choice += 1;
                self.retry_count += 1;
                let result = self.predicates[pred_idx].retry_pred(ctx, round, choice);

                match result {
                    PredicateResult::Success => self.push_next_predicate(ctx),
                    PredicateResult::SuccessSamePredicate => self.push_same_predicate(ctx),
                    PredicateResult::Failure => {
                        // Try next choice (loop continues)
                    }
                    PredicateResult::Choices(_) | PredicateResult::Suspend => {
                        panic!("retry_pred returned invalid result: {:?}", result);
                    }
                }
            }
        }
    }

    /// Pop the current entry, then every entry above the most recent one that
    /// still has choices to try. Entries that succeeded in call mode have no
    /// alternatives, so backtracking passes straight through them.
    fn backtrack(&mut self) {
        self.stack.pop();
        while let Some(entry) = self.stack.last() {
            if entry.in_choice_mode {
                break;
            }
            self.stack.pop();
        }
    }

    /// Push a new stack entry for the next predicate in sequence.
    fn push_next_predicate(&mut self, ctx: &CompletionContext) {
        let Some(current) = self.stack.last() else {
            return;
        };
        let next_index = current.predicate_index + 1;

        if next_index >= self.predicates.len() {
            panic!(
                "Invalid predicate sequence: reached end without FAIL or SUSPEND. \
                 Programs must terminate with a FAIL or SUSPEND predicate."
            );
        }

        self.stack.push(StackEntry {
            predicate_index: next_index,
            round: 0,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            trail_checkpoint: ctx.trail.len(),
        });
    }

    /// Push a new stack entry for the same predicate with incremented round.
    fn push_same_predicate(&mut self, ctx: &CompletionContext) {
        let Some(current) = self.stack.last() else {
            return;
        };
        let next_round = current.round + 1;
        let pred_index = current.predicate_index;

        self.stack.push(StackEntry {
            predicate_index: pred_index,
            round: next_round,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            trail_checkpoint: ctx.trail.len(),
        });
    }

    /// Returns (try_count, retry_count) over the engine's lifetime.
    pub fn statistics(&self) -> (u64, u64) {
        (self.try_count, self.retry_count)
    }
}

/// Builds an engine whose last predicate is terminal.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

/// A builder that has been given its terminal predicate.
#[derive(Debug)]
pub struct TerminatedBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, predicate: Box<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn terminal<P: TerminalPredicate + 'static>(mut self, predicate: Box<P>) -> TerminatedBuilder {
        self.predicates.push(predicate);
        TerminatedBuilder {
            predicates: self.predicates,
        }
    }
}

impl TerminatedBuilder {
    pub fn build(self) -> SearchEngine {
        SearchEngine::new(self.predicates)
    }
}
