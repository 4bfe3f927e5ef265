// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The unit of work handed to a worker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mapping::Mapping;

/// Two (usually partial) mappings searched together, plus a task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPair {
    id: u64,
    first: Mapping,
    second: Mapping,
}

impl MappingPair {
    pub fn new(id: u64, first: Mapping, second: Mapping) -> Self {
        Self { id, first, second }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn first(&self) -> &Mapping {
        &self.first
    }

    pub fn second(&self) -> &Mapping {
        &self.second
    }

    pub fn into_parts(self) -> (u64, Mapping, Mapping) {
        (self.id, self.first, self.second)
    }
}

impl fmt::Display for MappingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: ({}) & ({})", self.id, self.first, self.second)
    }
}
