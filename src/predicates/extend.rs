// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! ExtendLegPredicate - grows a mapping one image at a time.
//!
//! Each round finds the first leg shorter than the target length and offers
//! its candidate images as choices. Accepting a choice appends the image and
//! moves on to the next round; once every leg is long enough the predicate
//! succeeds and the program reaches its terminal predicate.

use crate::completion::{candidates, CompletionStrategy};
use crate::context::CompletionContext;
use crate::engine::{Predicate, PredicateResult};
use crate::geometry::Vertex;

/// Choices computed by `try_pred` for one round.
#[derive(Debug)]
struct Round {
    leg: usize,
    images: Vec<Vertex>,
}

#[derive(Debug)]
pub struct ExtendLegPredicate {
    length: usize,
    strategy: CompletionStrategy,
    /// Indexed by round; deeper rounds are dropped when an earlier one is retried.
    rounds: Vec<Round>,
}

impl ExtendLegPredicate {
    pub fn new(length: usize, strategy: CompletionStrategy) -> Self {
        Self {
            length,
            strategy,
            rounds: Vec::new(),
        }
    }
}

impl Predicate for ExtendLegPredicate {
    fn try_pred(&mut self, ctx: &mut CompletionContext, round: usize) -> PredicateResult {
        let Some(leg) = ctx.mapping.first_short_leg(self.length) else {
            return PredicateResult::Success;
        };
        let images = candidates::next_images(&ctx.mapping, leg, self.strategy);
        let count = images.len();
        self.rounds.truncate(round);
        self.rounds.push(Round { leg, images });
        if count == 0 {
            PredicateResult::Failure
        } else {
            PredicateResult::Choices(count)
        }
    }

    fn retry_pred(&mut self, ctx: &mut CompletionContext, round: usize, choice: usize) -> PredicateResult {
        let Some(Round { leg, images }) = self.rounds.get(round) else {
            return PredicateResult::Failure;
        };
        let Some(image) = images.get(choice) else {
            return PredicateResult::Failure;
        };
        match ctx.extend(*leg, *image) {
            Ok(()) => PredicateResult::SuccessSamePredicate,
            Err(err) => {
                tracing::trace!(%err, leg, "candidate rejected");
                PredicateResult::Failure
            }
        }
    }

    fn name(&self) -> &str {
        "ExtendLeg"
    }
}
