// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Per-worker counters of evaluated pairs, broken down by the test that
//! rejected them.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Why a fully completed pair was not reported.
#[derive(Debug, EnumCountMacro, EnumIter, Display, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rejection {
    /// The two mappings touch or cross.
    Disjointness,
    /// One of the mappings misses a codomain endpoint.
    Surjectivity,
    /// The composites differ by at least the tolerance.
    Commutativity,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCounters {
    evaluated: u64,
    found: u64,
    rejected: [u64; Rejection::COUNT],
}

impl WorkerCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one evaluated pair that passed every test.
    pub fn record_found(&mut self) {
        self.evaluated += 1;
        self.found += 1;
    }

    /// Count one evaluated pair rejected for `reason`.
    pub fn record_rejection(&mut self, reason: Rejection) {
        self.evaluated += 1;
        self.rejected[reason as usize] += 1;
    }

    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }

    pub fn found(&self) -> u64 {
        self.found
    }

    pub fn rejected(&self, reason: Rejection) -> u64 {
        self.rejected[reason as usize]
    }

    pub fn total_rejected(&self) -> u64 {
        self.rejected.iter().sum()
    }
}

impl AddAssign for WorkerCounters {
    fn add_assign(&mut self, other: Self) {
        self.evaluated += other.evaluated;
        self.found += other.found;
        for (mine, theirs) in self.rejected.iter_mut().zip(other.rejected) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for WorkerCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evaluated={} found={}", self.evaluated, self.found)?;
        for reason in Rejection::iter() {
            write!(f, " {}={}", reason, self.rejected(reason))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut counters = WorkerCounters::new();
        counters.record_rejection(Rejection::Disjointness);
        counters.record_rejection(Rejection::Disjointness);
        counters.record_rejection(Rejection::Commutativity);
        counters.record_found();
        assert_eq!(counters.evaluated(), 4);
        assert_eq!(counters.found(), 1);
        assert_eq!(counters.rejected(Rejection::Disjointness), 2);
        assert_eq!(counters.rejected(Rejection::Surjectivity), 0);
        assert_eq!(counters.total_rejected(), 3);
    }

    #[test]
    fn test_add_assign() {
        let mut a = WorkerCounters::new();
        a.record_found();
        let mut b = WorkerCounters::new();
        b.record_rejection(Rejection::Surjectivity);
        a += b;
        assert_eq!(a.evaluated(), 2);
        assert_eq!(a.rejected(Rejection::Surjectivity), 1);
    }

    #[test]
    fn test_display() {
        let mut counters = WorkerCounters::new();
        counters.record_rejection(Rejection::Commutativity);
        assert_eq!(
            counters.to_string(),
            "evaluated=1 found=0 Disjointness=0 Surjectivity=0 Commutativity=1"
        );
    }
}
