// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Worker loop.
//!
//! A worker waits for commands, searches each assigned pair to exhaustion and
//! reports back. Its enumerators and counters are private to its thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Barrier;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::comparators::{check_commutativity, check_disjointness, check_surjectivity, is_commuting};
use crate::completion::{CompletionStrategy, Completions};
use crate::config::SearchConfig;
use crate::error::{Result, TriodError};
use crate::mapping::{Mapping, MappingPair};
use crate::protocol::message::{Message, WorkerId};
use crate::statistics::{Rejection, WorkerCounters};

/// Per-worker search settings, copied out of the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    pub strategy: CompletionStrategy,
    pub check_surjectivity: bool,
    pub report_all: bool,
    pub report_interval: u64,
    pub half_length: usize,
}

impl From<&SearchConfig> for WorkerSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            strategy: config.strategy,
            check_surjectivity: config.check_surjectivity,
            report_all: config.report_all,
            report_interval: config.report_interval,
            half_length: config.half_length(),
        }
    }
}

pub struct Worker<'a> {
    id: WorkerId,
    settings: WorkerSettings,
    commands: Receiver<Message>,
    reports: Sender<Message>,
    barrier: &'a Barrier,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: WorkerId,
        settings: WorkerSettings,
        commands: Receiver<Message>,
        reports: Sender<Message>,
        barrier: &'a Barrier,
    ) -> Self {
        Self {
            id,
            settings,
            commands,
            reports,
            barrier,
        }
    }

    /// Run between the start and finish barriers.
    ///
    /// The worker always reaches the finish barrier, even after an error or
    /// a panic, so the rest of the group is never left waiting.
    pub fn run(self) -> Result<()> {
        let Worker {
            id,
            settings,
            commands,
            reports,
            barrier,
        } = self;
        attend(id, barrier, reports, |reports| serve(id, &settings, &commands, reports))
    }
}

/// Run `body` between the two barrier waits.
///
/// A panic in `body` becomes [`TriodError::WorkerFailed`]. On any failure the
/// coordinator is told before the report sender is dropped.
fn attend<F>(id: WorkerId, barrier: &Barrier, reports: Sender<Message>, body: F) -> Result<()>
where
    F: FnOnce(&Sender<Message>) -> Result<()>,
{
    barrier.wait();
    debug!(worker = id, "worker started");
    let result = panic::catch_unwind(AssertUnwindSafe(|| body(&reports))).unwrap_or_else(|payload| {
        Err(TriodError::WorkerFailed {
            worker: id,
            reason: panic_message(payload.as_ref()),
        })
    });
    if let Err(err) = &result {
        warn!(worker = id, %err, "worker failed");
        // The coordinator may already be gone.
        let reason = match err {
            TriodError::WorkerFailed { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        let _ = reports.send(Message::WorkerFailed { worker_id: id, reason });
    }
    drop(reports);
    barrier.wait();
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

fn serve(
    id: WorkerId,
    settings: &WorkerSettings,
    commands: &Receiver<Message>,
    reports: &Sender<Message>,
) -> Result<()> {
    loop {
        let command = commands
            .recv()
            .map_err(|_| TriodError::Disconnected("coordinator".to_string()))?;
        match command {
            Message::StopWorker => return Ok(()),
            Message::AssignTask { pair } => {
                debug!(worker = id, pair = pair.id(), "task received");
                let counters = process_pair(id, settings, pair, reports)?;
                send(
                    reports,
                    Message::WorkerDone {
                        worker_id: id,
                        total_evaluated: counters.evaluated(),
                        total_rejected: counters.total_rejected(),
                    },
                )?;
            }
            other => {
                return Err(TriodError::ProtocolViolation(format!(
                    "worker {} received {}",
                    id,
                    other.kind()
                )))
            }
        }
    }
}

fn send(reports: &Sender<Message>, message: Message) -> Result<()> {
    reports
        .send(message)
        .map_err(|_| TriodError::Disconnected("coordinator".to_string()))
}

/// Search every completion pair of `pair`, reporting as it goes.
///
/// Both mappings are first completed to half length; half pairs that already
/// touch are counted once and skipped.
pub fn process_pair(
    id: WorkerId,
    settings: &WorkerSettings,
    pair: MappingPair,
    reports: &Sender<Message>,
) -> Result<WorkerCounters> {
    let (_, first, second) = pair.into_parts();
    let mut state = PairSearch {
        id,
        settings,
        reports,
        counters: WorkerCounters::new(),
    };

    for half_first in Completions::new(first, settings.strategy, settings.half_length)? {
        for half_second in Completions::new(second.clone(), settings.strategy, settings.half_length)? {
            if check_disjointness(&half_first, &half_second) == 0 {
                state.reject(Rejection::Disjointness)?;
                continue;
            }
            state.complete(&half_first, &half_second)?;
        }
    }

    send(
        reports,
        Message::WorkerStatus {
            worker_id: id,
            counters: state.counters,
        },
    )?;
    Ok(state.counters)
}

struct PairSearch<'a> {
    id: WorkerId,
    settings: &'a WorkerSettings,
    reports: &'a Sender<Message>,
    counters: WorkerCounters,
}

impl PairSearch<'_> {
    fn complete(&mut self, half_first: &Mapping, half_second: &Mapping) -> Result<()> {
        let n = half_first.config().n();
        let strategy = self.settings.strategy;
        for first in Completions::new(half_first.clone(), strategy, n)? {
            if !self.is_surjective(&first) {
                self.reject(Rejection::Surjectivity)?;
                continue;
            }
            for second in Completions::new(half_second.clone(), strategy, n)? {
                if !self.is_surjective(&second) {
                    self.reject(Rejection::Surjectivity)?;
                    continue;
                }
                self.evaluate(&first, &second)?;
            }
        }
        Ok(())
    }

    fn is_surjective(&self, mapping: &Mapping) -> bool {
        !self.settings.check_surjectivity || check_surjectivity(mapping)
    }

    fn evaluate(&mut self, first: &Mapping, second: &Mapping) -> Result<()> {
        let margin = check_disjointness(first, second);
        if margin == 0 {
            return self.reject(Rejection::Disjointness);
        }
        let error = check_commutativity(first, second)?;
        let commutes = is_commuting(first, error);
        if commutes || self.settings.report_all {
            send(
                self.reports,
                Message::PairFound {
                    worker_id: self.id,
                    first: first.clone(),
                    second: second.clone(),
                    disjointness_margin: margin,
                    commutativity_error: error,
                },
            )?;
        }
        if commutes {
            self.counters.record_found();
            self.maybe_report()
        } else {
            self.reject(Rejection::Commutativity)
        }
    }

    fn reject(&mut self, reason: Rejection) -> Result<()> {
        self.counters.record_rejection(reason);
        self.maybe_report()
    }

    fn maybe_report(&mut self) -> Result<()> {
        let evaluated = self.counters.evaluated();
        if evaluated > 0 && evaluated % self.settings.report_interval == 0 {
            send(
                self.reports,
                Message::WorkerStatus {
                    worker_id: self.id,
                    counters: self.counters,
                },
            )?;
        }
        Ok(())
    }
}
