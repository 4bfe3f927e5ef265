// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Messages exchanged between the coordinator and its workers.

use serde::{Deserialize, Serialize};

use crate::mapping::{Mapping, MappingPair};
use crate::statistics::WorkerCounters;

/// Worker ids run from 1 to the number of workers.
pub type WorkerId = usize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// Coordinator to worker: search this pair.
    AssignTask { pair: MappingPair },
    /// Coordinator to worker: leave the receive loop.
    StopWorker,
    /// Worker to coordinator: the assigned pair is exhausted.
    WorkerDone {
        worker_id: WorkerId,
        total_evaluated: u64,
        total_rejected: u64,
    },
    /// Worker to coordinator: progress on the current pair.
    WorkerStatus {
        worker_id: WorkerId,
        counters: WorkerCounters,
    },
    /// Worker to coordinator: a disjoint pair, with how well it commutes.
    PairFound {
        worker_id: WorkerId,
        first: Mapping,
        second: Mapping,
        disjointness_margin: usize,
        commutativity_error: f64,
    },
    /// Worker to coordinator: the worker gave up and is leaving.
    WorkerFailed { worker_id: WorkerId, reason: String },
}

impl Message {
    /// Short variant name for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::AssignTask { .. } => "AssignTask",
            Message::StopWorker => "StopWorker",
            Message::WorkerDone { .. } => "WorkerDone",
            Message::WorkerStatus { .. } => "WorkerStatus",
            Message::PairFound { .. } => "PairFound",
            Message::WorkerFailed { .. } => "WorkerFailed",
        }
    }
}
