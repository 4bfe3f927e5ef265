// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line front end: runs one search and prints its summary as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use triod_search::completion::CompletionStrategy;
use triod_search::config::{SearchConfig, TriodConfig, DEFAULT_REPORT_INTERVAL};
use triod_search::protocol::run_search;

/// Search for disjoint, commuting pairs of triod maps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subdivisions per leg of the domain
    #[arg(short)]
    n: usize,

    /// Subdivisions per leg of the codomain
    #[arg(short)]
    m: usize,

    /// Number of legs
    #[arg(short, default_value_t = 3)]
    t: usize,

    /// Worker threads
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Completion strategy
    #[arg(long, value_enum, default_value_t = CompletionStrategy::Surjective)]
    strategy: CompletionStrategy,

    /// Append events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Send worker status every this many evaluated pairs
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL)]
    report_interval: u64,

    /// Skip this many leading tasks
    #[arg(long, default_value_t = 0)]
    pair_skip: u64,

    /// Complete start mappings to this length before handing them out
    #[arg(long, default_value_t = 0)]
    prefix_length: usize,

    /// Keep mappings that miss a codomain endpoint
    #[arg(long)]
    no_check_surjectivity: bool,

    /// Report every disjoint pair, commuting or not
    #[arg(long)]
    report_all: bool,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    let subscriber = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let triod = TriodConfig::new(args.n, args.m, args.t)?;
    let mut config = SearchConfig::new(triod);
    config.workers = args.workers;
    config.strategy = args.strategy;
    config.log_file = args.log_file;
    config.report_interval = args.report_interval;
    config.pair_skip = args.pair_skip;
    config.prefix_length = args.prefix_length;
    config.check_surjectivity = !args.no_check_surjectivity;
    config.report_all = args.report_all;

    let report = run_search(&config).context("search failed")?;
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    Ok(())
}
