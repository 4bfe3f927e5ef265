// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for the triod search.
//!
//! Coordinate and model errors are resolved close to where they occur: the
//! completion enumerator absorbs `ContinuityViolation` as "this candidate has
//! no completions". Precondition errors (`IncompleteMapping`) and protocol
//! errors end the run.

use std::io;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TriodError>;

/// Errors raised by the coordinate model, the mapping model, the comparators
/// and the coordinator/worker protocol.
#[derive(Debug, Error)]
pub enum TriodError {
    /// A coordinate was built outside its triod.
    #[error("coordinate ({arm}, {dist}) is outside a triod with {legs} legs of length {length}")]
    OutOfRange {
        arm: usize,
        dist: String,
        legs: usize,
        length: usize,
    },

    /// Setting an image would break adjacency with an already-defined neighbour.
    #[error("image {image} of domain vertex {domain} is not adjacent to neighbour image {neighbour}")]
    ContinuityViolation {
        domain: String,
        image: String,
        neighbour: String,
    },

    /// A leg entry was set before the entries between it and the branch point.
    #[error("leg {arm} has {filled} entries; cannot set position {dist}")]
    NonContiguous { arm: usize, dist: usize, filled: usize },

    /// An endpoint map that can never drive a surjective completion.
    #[error("invalid endpoint map: {0}")]
    InvalidEndpointMap(String),

    /// A comparison that needs every image was handed a partial mapping.
    #[error("mapping is not complete: {0}")]
    IncompleteMapping(String),

    /// A peer sent a message that is not valid in the receiver's state.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A peer hung up before the protocol finished.
    #[error("channel to {0} closed")]
    Disconnected(String),

    /// A worker stopped on an error or a panic.
    #[error("worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },

    /// Bad run or triod parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Event log I/O.
    #[error("event log: {0}")]
    Io(#[from] io::Error),
}

impl TriodError {
    /// True for errors the completion search treats as a pruned branch rather than a failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TriodError::ContinuityViolation { .. } | TriodError::NonContiguous { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_out_of_range() {
        let err = TriodError::OutOfRange {
            arm: 3,
            dist: "1".to_string(),
            legs: 3,
            length: 2,
        };
        assert_eq!(
            err.to_string(),
            "coordinate (3, 1) is outside a triod with 3 legs of length 2"
        );
    }

    #[test]
    fn test_recoverable() {
        let continuity = TriodError::ContinuityViolation {
            domain: "v(0, 1)".into(),
            image: "v(1, 2)".into(),
            neighbour: "v(0, 0)".into(),
        };
        assert!(continuity.is_recoverable());
        assert!(!TriodError::ProtocolViolation("x".into()).is_recoverable());
        assert!(!TriodError::IncompleteMapping("x".into()).is_recoverable());
    }
}
