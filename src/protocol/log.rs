// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Append-only event log of a search run.
//!
//! Every event is traced; when a log file is configured it is also appended
//! to that file as one timestamped line and flushed straight away, so the
//! file stays useful if the run is killed.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::mapping::{Mapping, MappingPair};
use crate::protocol::message::WorkerId;
use crate::protocol::RunSummary;
use crate::statistics::WorkerCounters;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Default)]
pub struct EventLog {
    file: Option<File>,
}

impl EventLog {
    /// Open `path` for appending, or log to tracing only if `path` is None.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };
        Ok(Self { file })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{} {}", Local::now().format(TIMESTAMP_FORMAT), line)?;
            file.flush()?;
        }
        Ok(())
    }

    pub fn run_started(&mut self, config: &SearchConfig) -> Result<()> {
        let settings = serde_json::to_string(config).unwrap_or_else(|err| err.to_string());
        info!(
            n = config.triod.n(),
            m = config.triod.m(),
            t = config.triod.t(),
            workers = config.workers,
            "run started"
        );
        self.write_line(&format!("RUN STARTED {}", settings))
    }

    pub fn task_assigned(&mut self, worker: WorkerId, pair: &MappingPair) -> Result<()> {
        info!(worker, pair = pair.id(), "task assigned");
        self.write_line(&format!("ASSIGN worker#{:02} pair {}", worker, pair))?;
        for mapping in [pair.first(), pair.second()] {
            if let Some(map) = mapping.endpoint_map() {
                self.write_line(&format!("\tendpoint map {}", map))?;
            }
        }
        Ok(())
    }

    pub fn status(&mut self, worker: WorkerId, counters: &WorkerCounters) -> Result<()> {
        info!(worker, evaluated = counters.evaluated(), found = counters.found(), "status");
        self.write_line(&format!("STATUS worker#{:02} {}", worker, counters))
    }

    pub fn worker_done(&mut self, worker: WorkerId, evaluated: u64, rejected: u64) -> Result<()> {
        info!(worker, evaluated, rejected, "pair done");
        self.write_line(&format!(
            "DONE worker#{:02} total:{} rejected:{}",
            worker, evaluated, rejected
        ))
    }

    pub fn pair_found(
        &mut self,
        worker: WorkerId,
        first: &Mapping,
        second: &Mapping,
        disjointness_margin: usize,
        commutativity_error: f64,
    ) -> Result<()> {
        info!(worker, disjointness_margin, commutativity_error, "pair found");
        self.write_line(&format!("FOUND worker#{:02}", worker))?;
        self.write_line(&format!("\tfirst: {}", first))?;
        self.write_line(&format!("\tsecond: {}", second))?;
        self.write_line(&format!(
            "\tdisjointness margin: {} commutativity error: {:.6}",
            disjointness_margin, commutativity_error
        ))
    }

    pub fn worker_stopped(&mut self, worker: WorkerId) -> Result<()> {
        info!(worker, "worker stopped");
        self.write_line(&format!("STOP worker#{:02}", worker))
    }

    pub fn run_finished(&mut self, summary: &RunSummary) -> Result<()> {
        let json = serde_json::to_string(summary).unwrap_or_else(|err| err.to_string());
        info!(
            pairs_sent = summary.pairs_sent,
            pairs_found = summary.pairs_found,
            "run finished"
        );
        self.write_line(&format!("RUN FINISHED {}", json))
    }
}
