// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Coordinator loop.
//!
//! The coordinator hands one task at a time to each worker and refills a
//! worker only after it reports the task done. When the task stream runs dry
//! a worker is told to stop instead. The loop ends once every worker is
//! stopped.

use std::sync::Barrier;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::error::{Result, TriodError};
use crate::mapping::MappingPair;
use crate::protocol::log::EventLog;
use crate::protocol::message::{Message, WorkerId};
use crate::protocol::{FoundPair, RunSummary};

/// A worker as seen by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Assigned,
    ReportedDone,
    Stopped,
}

pub struct Coordinator<'a, I> {
    tasks: I,
    /// Command channel of worker `id` is at index `id - 1`.
    commands: Vec<Sender<Message>>,
    reports: Receiver<Message>,
    states: Vec<WorkerState>,
    log: EventLog,
    summary: RunSummary,
    found: Vec<FoundPair>,
    barrier: &'a Barrier,
}

impl<'a, I> Coordinator<'a, I>
where
    I: Iterator<Item = MappingPair>,
{
    pub fn new(
        tasks: I,
        commands: Vec<Sender<Message>>,
        reports: Receiver<Message>,
        log: EventLog,
        barrier: &'a Barrier,
    ) -> Self {
        let workers = commands.len();
        Self {
            tasks,
            commands,
            reports,
            states: vec![WorkerState::Idle; workers],
            log,
            summary: RunSummary::default(),
            found: Vec::new(),
            barrier,
        }
    }

    /// Run between the start and finish barriers.
    ///
    /// On error the channels are closed before the finish barrier, which
    /// releases every worker still waiting on a command or sending a report.
    pub fn run(mut self) -> Result<(RunSummary, Vec<FoundPair>)> {
        self.barrier.wait();
        let result = self.dispatch();
        let Coordinator {
            commands,
            reports,
            mut log,
            summary,
            found,
            barrier,
            ..
        } = self;
        drop(commands);
        drop(reports);
        if let Err(err) = &result {
            warn!(%err, "coordinator failed");
        }
        barrier.wait();
        result?;
        log.run_finished(&summary)?;
        Ok((summary, found))
    }

    fn dispatch(&mut self) -> Result<()> {
        for id in 1..=self.commands.len() {
            self.assign_next(id)?;
        }
        while self.states.iter().any(|s| *s != WorkerState::Stopped) {
            let message = self
                .reports
                .recv()
                .map_err(|_| TriodError::Disconnected("workers".to_string()))?;
            self.handle(message)?;
        }
        Ok(())
    }

    fn handle(&mut self, message: Message) -> Result<()> {
        match message {
            Message::WorkerStatus { worker_id, counters } => {
                self.state(worker_id)?;
                self.log.status(worker_id, &counters)
            }
            Message::PairFound {
                worker_id,
                first,
                second,
                disjointness_margin,
                commutativity_error,
            } => {
                self.state(worker_id)?;
                self.log.pair_found(
                    worker_id,
                    &first,
                    &second,
                    disjointness_margin,
                    commutativity_error,
                )?;
                self.summary.pairs_found += 1;
                self.found.push(FoundPair {
                    worker_id,
                    first,
                    second,
                    disjointness_margin,
                    commutativity_error,
                });
                Ok(())
            }
            Message::WorkerDone {
                worker_id,
                total_evaluated,
                total_rejected,
            } => {
                let state = self.state(worker_id)?;
                if state != WorkerState::Assigned {
                    return Err(TriodError::ProtocolViolation(format!(
                        "worker {} reported done while {:?}",
                        worker_id, state
                    )));
                }
                self.states[worker_id - 1] = WorkerState::ReportedDone;
                self.summary.pairs_done += 1;
                self.summary.total_evaluated += total_evaluated;
                self.summary.total_rejected += total_rejected;
                self.log.worker_done(worker_id, total_evaluated, total_rejected)?;
                self.assign_next(worker_id)
            }
            Message::WorkerFailed { worker_id, reason } => {
                self.state(worker_id)?;
                Err(TriodError::WorkerFailed {
                    worker: worker_id,
                    reason,
                })
            }
            other @ (Message::AssignTask { .. } | Message::StopWorker) => Err(
                TriodError::ProtocolViolation(format!("coordinator received {}", other.kind())),
            ),
        }
    }

    fn state(&self, worker_id: WorkerId) -> Result<WorkerState> {
        worker_id
            .checked_sub(1)
            .and_then(|index| self.states.get(index))
            .copied()
            .ok_or_else(|| TriodError::ProtocolViolation(format!("unknown worker {}", worker_id)))
    }

    /// Give worker `id` the next task, or stop it if there are none left.
    fn assign_next(&mut self, id: WorkerId) -> Result<()> {
        let command = match self.tasks.next() {
            Some(pair) => {
                self.log.task_assigned(id, &pair)?;
                self.states[id - 1] = WorkerState::Assigned;
                self.summary.pairs_sent += 1;
                Message::AssignTask { pair }
            }
            None => {
                self.log.worker_stopped(id)?;
                self.states[id - 1] = WorkerState::Stopped;
                Message::StopWorker
            }
        };
        debug!(worker = id, command = command.kind(), "sending");
        self.commands[id - 1]
            .send(command)
            .map_err(|_| TriodError::Disconnected(format!("worker {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriodConfig;
    use crate::geometry::Vertex;
    use crate::mapping::Mapping;
    use crate::statistics::WorkerCounters;
    use crossbeam_channel::{bounded, unbounded};
    use std::thread;

    fn task(id: u64) -> MappingPair {
        let config = TriodConfig::new(1, 1, 3).unwrap();
        MappingPair::new(
            id,
            Mapping::new(config, Vertex::branch()).unwrap(),
            Mapping::new(config, Vertex::at(1, 1)).unwrap(),
        )
    }

    #[test]
    fn test_refills_until_exhausted() {
        let barrier = Barrier::new(2);
        let (cmd_tx, cmd_rx) = bounded(1);
        let (report_tx, report_rx) = unbounded();
        thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                let mut seen = Vec::new();
                while let Ok(Message::AssignTask { pair }) = cmd_rx.recv() {
                    seen.push(pair.id());
                    report_tx
                        .send(Message::WorkerStatus {
                            worker_id: 1,
                            counters: WorkerCounters::new(),
                        })
                        .unwrap();
                    report_tx
                        .send(Message::WorkerDone {
                            worker_id: 1,
                            total_evaluated: 5,
                            total_rejected: 4,
                        })
                        .unwrap();
                }
                drop(report_tx);
                barrier.wait();
                assert_eq!(seen, vec![1, 2, 3]);
            });

            let coordinator = Coordinator::new(
                (1..=3).map(task),
                vec![cmd_tx],
                report_rx,
                EventLog::default(),
                &barrier,
            );
            let (summary, found) = coordinator.run().unwrap();
            assert_eq!(summary.pairs_sent, 3);
            assert_eq!(summary.pairs_done, 3);
            assert_eq!(summary.total_evaluated, 15);
            assert_eq!(summary.total_rejected, 12);
            assert!(found.is_empty());
        });
    }

    #[test]
    fn test_unexpected_message_is_fatal() {
        let barrier = Barrier::new(2);
        let (cmd_tx, cmd_rx) = bounded(1);
        let (report_tx, report_rx) = unbounded();
        thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                let _ = cmd_rx.recv();
                report_tx.send(Message::StopWorker).unwrap();
                drop(report_tx);
                // Released once the coordinator closes the command channel.
                while cmd_rx.recv().is_ok() {}
                barrier.wait();
            });

            let coordinator = Coordinator::new(
                (1..=3).map(task),
                vec![cmd_tx],
                report_rx,
                EventLog::default(),
                &barrier,
            );
            let err = coordinator.run().unwrap_err();
            assert!(matches!(err, TriodError::ProtocolViolation(_)));
        });
    }

    #[test]
    fn test_worker_failure_ends_run() {
        let barrier = Barrier::new(2);
        let (cmd_tx, cmd_rx) = bounded(1);
        let (report_tx, report_rx) = unbounded();
        thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                let _ = cmd_rx.recv();
                report_tx
                    .send(Message::WorkerFailed {
                        worker_id: 1,
                        reason: "out of memory".to_string(),
                    })
                    .unwrap();
                drop(report_tx);
                while cmd_rx.recv().is_ok() {}
                barrier.wait();
            });

            let coordinator = Coordinator::new(
                (1..=3).map(task),
                vec![cmd_tx],
                report_rx,
                EventLog::default(),
                &barrier,
            );
            match coordinator.run() {
                Err(TriodError::WorkerFailed { worker: 1, reason }) => assert_eq!(reason, "out of memory"),
                other => panic!("expected worker failure, got {:?}", other.map(|(summary, _)| summary)),
            }
        });
    }

    #[test]
    fn test_done_from_stopped_worker_is_fatal() {
        let barrier = Barrier::new(3);
        let barrier = &barrier;
        let (cmd_tx1, cmd_rx1) = bounded(1);
        let (cmd_tx2, cmd_rx2) = bounded(1);
        let (report_tx, report_rx) = unbounded();
        let report_tx2 = report_tx.clone();
        thread::scope(|scope| {
            scope.spawn(move || {
                barrier.wait();
                while cmd_rx1.recv().is_ok() {}
                drop(report_tx);
                barrier.wait();
            });
            scope.spawn(move || {
                barrier.wait();
                // Stopped straight away, but claims a finished task.
                let _ = cmd_rx2.recv();
                let _ = report_tx2.send(Message::WorkerDone {
                    worker_id: 2,
                    total_evaluated: 0,
                    total_rejected: 0,
                });
                drop(report_tx2);
                while cmd_rx2.recv().is_ok() {}
                barrier.wait();
            });

            // One task: worker 1 gets it, worker 2 is stopped at once.
            let coordinator = Coordinator::new(
                (1..=1).map(task),
                vec![cmd_tx1, cmd_tx2],
                report_rx,
                EventLog::default(),
                barrier,
            );
            let err = coordinator.run().unwrap_err();
            assert!(matches!(err, TriodError::ProtocolViolation(_)));
        });
    }
}
