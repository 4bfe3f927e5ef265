// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the backtracking engine driving leg extension.

mod common;

use common::config;
use triod_search::completion::CompletionStrategy;
use triod_search::engine::EngineBuilder;
use triod_search::geometry::Vertex;
use triod_search::predicates::{ExtendLegPredicate, FailPredicate, SuspendPredicate};
use triod_search::{CompletionContext, Mapping};

fn context(n: usize, m: usize, basepoint: Vertex) -> CompletionContext {
    CompletionContext::new(Mapping::new(config(n, m, 3), basepoint).unwrap())
}

#[test]
fn test_suspends_once_per_completion() {
    let mut ctx = context(2, 1, Vertex::at(1, 1));
    let mut engine = Some(
        EngineBuilder::new()
            .add(Box::new(ExtendLegPredicate::new(2, CompletionStrategy::Plain)))
            .terminal(Box::new(SuspendPredicate))
            .build(),
    );
    let mut seen = Vec::new();
    while let Some(e) = engine.take() {
        if let Some(next) = e.search(&mut ctx) {
            assert!(ctx.mapping.is_complete());
            seen.push(ctx.mapping.clone());
            engine = Some(next);
        }
    }
    // Each leg stays on v(1, 1) then has 2 choices, or drops to the branch then has 4.
    assert_eq!(seen.len(), 6usize.pow(3));
    assert!(ctx.trail.is_empty());
    assert_eq!(ctx.mapping.leg_len(0), 0);
}

#[test]
fn test_fail_terminal_explores_everything_once() {
    let mut ctx = context(1, 1, Vertex::branch());
    let engine = EngineBuilder::new()
        .add(Box::new(ExtendLegPredicate::new(1, CompletionStrategy::Plain)))
        .terminal(Box::new(FailPredicate))
        .build();
    assert!(engine.search(&mut ctx).is_none());
    assert!(ctx.trail.is_empty());
    assert!(!ctx.mapping.is_complete());
}

#[test]
fn test_statistics_grow_with_search() {
    let mut ctx = context(1, 1, Vertex::branch());
    let engine = EngineBuilder::new()
        .add(Box::new(ExtendLegPredicate::new(1, CompletionStrategy::Plain)))
        .terminal(Box::new(SuspendPredicate))
        .build();
    let engine = engine.search(&mut ctx).unwrap();
    let (tries, retries) = engine.statistics();
    assert!(tries >= 4);
    assert!(retries >= 3);
}
