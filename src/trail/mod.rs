// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for completion search.
//!
//! Mappings only grow during completion: each step appends one image to one
//! leg. The trail records which leg each append went to, so rewinding to a
//! checkpoint is a matter of popping those legs again in reverse order.

use crate::mapping::Mapping;

/// Undo log of leg extensions.
#[derive(Debug)]
pub struct Trail {
    /// Leg index of every append, oldest first.
    entries: Vec<usize>,
}

impl Trail {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// A trail with room for `capacity` appends. A completion appends at most
    /// `T * N` images.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Undo every append recorded after `checkpoint`.
    pub fn rewind_to(&mut self, checkpoint: usize, mapping: &mut Mapping) {
        while self.entries.len() > checkpoint {
            if let Some(leg) = self.entries.pop() {
                mapping.pop(leg);
            }
        }
    }

    /// Record that one image was appended to `leg`.
    pub(crate) fn record_push(&mut self, leg: usize) {
        self.entries.push(leg);
    }

    /// Get the current number of entries in the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriodConfig;
    use crate::geometry::Vertex;

    fn mapping() -> Mapping {
        Mapping::new(TriodConfig::new(3, 3, 3).unwrap(), Vertex::branch()).unwrap()
    }

    fn push(trail: &mut Trail, mapping: &mut Mapping, leg: usize, image: Vertex) {
        mapping.push(leg, image).unwrap();
        trail.record_push(leg);
    }

    #[test]
    fn test_trail_new() {
        let trail = Trail::new();
        assert_eq!(trail.len(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_rewind_to() {
        let mut trail = Trail::new();
        let mut m = mapping();
        push(&mut trail, &mut m, 2, Vertex::at(2, 1));
        push(&mut trail, &mut m, 2, Vertex::at(2, 2));
        push(&mut trail, &mut m, 1, Vertex::at(1, 1));
        trail.rewind_to(1, &mut m);
        assert_eq!(trail.len(), 1);
        assert_eq!(m.leg(2), &[Vertex::at(2, 1)]);
        assert_eq!(m.leg_len(1), 0);
    }

    #[test]
    fn test_nested_rewinds() {
        let mut trail = Trail::new();
        let mut m = mapping();

        push(&mut trail, &mut m, 0, Vertex::at(0, 1));
        let outer = trail.len();
        push(&mut trail, &mut m, 0, Vertex::at(0, 2));
        let inner = trail.len();
        push(&mut trail, &mut m, 1, Vertex::branch());
        push(&mut trail, &mut m, 0, Vertex::at(0, 3));

        trail.rewind_to(inner, &mut m);
        assert_eq!(m.leg(0), &[Vertex::at(0, 1), Vertex::at(0, 2)]);
        assert_eq!(m.leg_len(1), 0);

        trail.rewind_to(outer, &mut m);
        assert_eq!(m.leg(0), &[Vertex::at(0, 1)]);

        // Rewinding forward is a no-op.
        trail.rewind_to(5, &mut m);
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_long_leg_rewinds() {
        let n = 20_000;
        let mut m = Mapping::new(TriodConfig::new(n, 1, 1).unwrap(), Vertex::branch()).unwrap();
        let mut trail = Trail::with_capacity(n);
        for _ in 0..n {
            push(&mut trail, &mut m, 0, Vertex::branch());
        }
        assert_eq!(trail.len(), n);
        assert!(m.is_complete());
        trail.rewind_to(0, &mut m);
        assert!(trail.is_empty());
        assert_eq!(m.leg_len(0), 0);
    }
}
