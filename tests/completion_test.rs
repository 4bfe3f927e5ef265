// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for completion enumeration.

mod common;

use std::collections::HashSet;

use common::config;
use triod_search::comparators::check_surjectivity;
use triod_search::completion::{CompletionStrategy, Completions};
use triod_search::geometry::Vertex;
use triod_search::tasks::start_mappings;
use triod_search::{EndpointMap, Mapping};

fn start(n: usize, m: usize, t: usize, basepoint: Vertex) -> Mapping {
    Mapping::new(config(n, m, t), basepoint).unwrap()
}

fn leg_signature(mapping: &Mapping) -> Vec<Vec<Vertex>> {
    (0..mapping.config().t()).map(|arm| mapping.leg(arm).to_vec()).collect()
}

#[test]
fn test_length_one_count_is_four_to_the_t() {
    let all: Vec<Mapping> = Completions::new(
        start(1, 1, 3, Vertex::branch()),
        CompletionStrategy::Plain,
        1,
    )
    .unwrap()
    .collect();
    assert_eq!(all.len(), 4usize.pow(3));
    let distinct: HashSet<_> = all.iter().map(leg_signature).collect();
    assert_eq!(distinct.len(), all.len());
}

#[test]
fn test_plain_completions_are_continuous_and_distinct() {
    let all: Vec<Mapping> = Completions::new(
        start(3, 2, 3, Vertex::at(1, 1)),
        CompletionStrategy::Plain,
        3,
    )
    .unwrap()
    .collect();
    assert!(!all.is_empty());
    let distinct: HashSet<_> = all.iter().map(leg_signature).collect();
    assert_eq!(distinct.len(), all.len());
    for mapping in &all {
        assert!(mapping.is_complete());
        // Rebuilding from the legs re-checks continuity.
        Mapping::from_legs(*mapping.config(), mapping.basepoint(), leg_signature(mapping)).unwrap();
    }
}

#[test]
fn test_first_completion_stays_put() {
    let basepoint = Vertex::at(2, 1);
    let first = Completions::new(start(2, 2, 3, basepoint), CompletionStrategy::Plain, 2)
        .unwrap()
        .next()
        .unwrap();
    for arm in 0..3 {
        assert_eq!(first.leg(arm), &[basepoint, basepoint]);
    }
}

#[test]
fn test_partial_start_is_preserved() {
    let mut partial = start(3, 3, 3, Vertex::branch());
    partial.push(0, Vertex::at(0, 1)).unwrap();
    partial.push(0, Vertex::at(0, 2)).unwrap();
    for mapping in Completions::new(partial, CompletionStrategy::Plain, 2).unwrap() {
        assert_eq!(mapping.leg(0), &[Vertex::at(0, 1), Vertex::at(0, 2)]);
        assert_eq!(mapping.leg_len(2), 2);
    }
}

#[test]
fn test_surjective_is_subset_of_plain() {
    let base = start(4, 2, 3, Vertex::branch());
    let plain: HashSet<_> = Completions::new(base.clone(), CompletionStrategy::Plain, 4)
        .unwrap()
        .map(|m| leg_signature(&m))
        .collect();
    let surjective: Vec<Mapping> = Completions::new(base, CompletionStrategy::Surjective, 4)
        .unwrap()
        .collect();
    assert!(!surjective.is_empty());
    for mapping in &surjective {
        assert!(check_surjectivity(mapping), "{}", mapping);
        assert!(plain.contains(&leg_signature(mapping)));
    }
    // Every surjective plain completion is found exactly once.
    let found: HashSet<_> = surjective.iter().map(leg_signature).collect();
    assert_eq!(surjective.len(), found.len());
    let plain_surjective = Completions::new(start(4, 2, 3, Vertex::branch()), CompletionStrategy::Plain, 4)
        .unwrap()
        .filter(check_surjectivity)
        .count();
    assert_eq!(surjective.len(), plain_surjective);
    for mapping in &surjective {
        assert_eq!(mapping.endpoint_map(), EndpointMap::canonical(mapping).as_ref());
    }
}

#[test]
fn test_start_mappings_split_surjective_completions() {
    // Completions of all start mappings cover each surjective mapping once.
    let config = config(3, 1, 3);
    let mut seen = HashSet::new();
    let mut total = 0;
    for start in start_mappings(&config, CompletionStrategy::Surjective).unwrap() {
        for mapping in Completions::new(start, CompletionStrategy::Surjective, 3).unwrap() {
            total += 1;
            seen.insert((mapping.basepoint(), leg_signature(&mapping)));
        }
    }
    let plain: usize = start_mappings(&config, CompletionStrategy::Plain)
        .unwrap()
        .into_iter()
        .map(|start| {
            Completions::new(start, CompletionStrategy::Plain, 3)
                .unwrap()
                .filter(check_surjectivity)
                .count()
        })
        .sum();
    assert_eq!(total, seen.len());
    assert_eq!(total, plain);
}

#[test]
fn test_long_domain_completes() {
    let n = 17_000;
    let first = Completions::new(start(n, 1, 1, Vertex::branch()), CompletionStrategy::Plain, n)
        .unwrap()
        .next()
        .unwrap();
    assert!(first.is_complete());
    assert!(first.leg(0).iter().all(|v| v.is_branch()));
}

#[test]
fn test_infeasible_endpoint_map_yields_nothing() {
    // The target on leg 0 is one domain step away but three codomain steps.
    let config = config(2, 2, 3);
    let map = EndpointMap::new(
        &config,
        vec![Vertex::at(0, 2), Vertex::at(1, 2), Vertex::at(2, 2)],
    )
    .unwrap();
    let mut partial = Mapping::new(config, Vertex::branch()).unwrap();
    partial.push(0, Vertex::at(1, 1)).unwrap();
    let partial = partial.with_endpoint_map(map).unwrap();
    assert_eq!(
        Completions::new(partial, CompletionStrategy::Surjective, 2)
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn test_half_then_full_matches_direct() {
    let base = start(4, 2, 3, Vertex::at(0, 2));
    let direct = Completions::new(base.clone(), CompletionStrategy::Surjective, 4)
        .unwrap()
        .count();
    let nested: usize = Completions::new(base, CompletionStrategy::Surjective, 2)
        .unwrap()
        .map(|half| {
            Completions::new(half, CompletionStrategy::Surjective, 4)
                .unwrap()
                .count()
        })
        .sum();
    assert_eq!(nested, direct);
}

#[test]
fn test_stop_at_ends_sequence() {
    let base = start(2, 1, 3, Vertex::branch());
    let all: Vec<Mapping> = Completions::new(base.clone(), CompletionStrategy::Plain, 2)
        .unwrap()
        .collect();
    let stop = all[all.len() / 2].clone();
    let head: Vec<Mapping> = Completions::new(base, CompletionStrategy::Plain, 2)
        .unwrap()
        .with_stop_at(stop.clone())
        .collect();
    assert_eq!(head.len(), all.len() / 2 + 1);
    assert_eq!(head.last(), Some(&stop));
}
