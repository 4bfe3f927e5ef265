// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Distributed search: one coordinator and a fixed pool of workers.
//!
//! Workers are threads with private state. They talk to the coordinator only
//! through channels: one command channel per worker and one shared report
//! channel. Tasks are pulled, so each worker holds at most one. The whole
//! group meets at a barrier before work starts and again after every worker
//! has stopped.

pub mod coordinator;
pub mod log;
pub mod message;
pub mod worker;

pub use coordinator::{Coordinator, WorkerState};
pub use log::EventLog;
pub use message::{Message, WorkerId};
pub use worker::{Worker, WorkerSettings};

use std::sync::Barrier;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::mapping::Mapping;
use crate::tasks::TaskGenerator;

/// Run totals kept by the coordinator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pairs_sent: u64,
    pub pairs_done: u64,
    pub total_evaluated: u64,
    pub total_rejected: u64,
    pub pairs_found: u64,
}

/// A pair reported by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundPair {
    pub worker_id: WorkerId,
    pub first: Mapping,
    pub second: Mapping,
    pub disjointness_margin: usize,
    pub commutativity_error: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub found: Vec<FoundPair>,
}

/// Search the whole task universe of `config` with `config.workers` workers.
pub fn run_search(config: &SearchConfig) -> Result<RunReport> {
    config.validate()?;
    let mut tasks = TaskGenerator::new(config)?;
    let mut log = EventLog::open(config.log_file.as_deref())?;
    log.run_started(config)?;

    let settings = WorkerSettings::from(config);
    let barrier = Barrier::new(config.workers + 1);
    let (report_tx, report_rx) = unbounded();

    let (outcome, worker_results) = thread::scope(|scope| {
        let mut commands = Vec::with_capacity(config.workers);
        let mut handles = Vec::with_capacity(config.workers);
        for id in 1..=config.workers {
            let (command_tx, command_rx) = bounded(1);
            commands.push(command_tx);
            let worker = Worker::new(id, settings, command_rx, report_tx.clone(), &barrier);
            handles.push(scope.spawn(move || worker.run()));
        }
        // Only workers may hold report senders, so the coordinator sees a
        // disconnect once they have all gone.
        drop(report_tx);

        let outcome = Coordinator::new(tasks.by_ref(), commands, report_rx, log, &barrier).run();
        let worker_results: Vec<Result<()>> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect();
        (outcome, worker_results)
    });

    let (summary, found) = outcome?;
    for result in worker_results {
        result?;
    }
    if let Some(err) = tasks.take_error() {
        return Err(err);
    }
    info!(pairs_found = summary.pairs_found, "search complete");
    Ok(RunReport { summary, found })
}
