// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context for one completion enumeration.
//!
//! The context owns the mapping under construction and the trail that undoes
//! its extensions. Each enumerator owns its own context, so nested
//! enumerations (half-length, then full-length) never share state.

use crate::error::Result;
use crate::geometry::Vertex;
use crate::mapping::Mapping;
use crate::trail::Trail;

/// Mutable state threaded through the completion predicates.
#[derive(Debug)]
pub struct CompletionContext {
    /// The mapping being extended. Only the trail may shrink it.
    pub mapping: Mapping,
    /// Undo log for `mapping`.
    pub trail: Trail,
}

impl CompletionContext {
    pub fn new(mapping: Mapping) -> Self {
        let config = mapping.config();
        let trail = Trail::with_capacity(config.t() * config.n());
        Self { mapping, trail }
    }

    /// Append `image` to `leg`, recording it on the trail.
    ///
    /// A continuity violation leaves both the mapping and the trail untouched.
    pub fn extend(&mut self, leg: usize, image: Vertex) -> Result<()> {
        self.mapping.push(leg, image)?;
        self.trail.record_push(leg);
        Ok(())
    }

    /// Undo every extension made since the trail held `checkpoint` entries.
    pub fn rewind_to(&mut self, checkpoint: usize) {
        self.trail.rewind_to(checkpoint, &mut self.mapping);
    }
}
