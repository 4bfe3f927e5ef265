// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Candidate images for the next entry of a leg.
//!
//! Plain completion offers every codomain neighbour of the leg's last image.
//! Surjective completion first looks for an endpoint-map target on the leg
//! and narrows the candidates so the target can still be reached:
//!
//! | X vs Y            | candidates                 |
//! |-------------------|----------------------------|
//! | X < Y             | none (infeasible)          |
//! | X == 1, Y == 0    | stay                       |
//! | X == Y            | step toward the endpoint   |
//! | X == Y + 1        | stay, step toward          |
//! | otherwise         | every neighbour            |
//!
//! X is the number of domain steps left before the target preimage, Y the
//! codomain distance from the current image to the target endpoint.

use crate::completion::CompletionStrategy;
use crate::geometry::{Shape, Vertex};
use crate::mapping::Mapping;

/// Candidates for the next image on `leg`, in search order.
///
/// Under an endpoint map, images that would reach an endpoint ahead of its
/// entry are dropped, so each surjective completion belongs to one map.
/// An empty result means the branch cannot be completed.
pub fn next_images(mapping: &Mapping, leg: usize, strategy: CompletionStrategy) -> Vec<Vertex> {
    let config = mapping.config();
    let codomain = config.codomain();
    let current = mapping.last_image(leg);
    let filled = mapping.leg_len(leg);

    let map = match (strategy, mapping.endpoint_map()) {
        (CompletionStrategy::Surjective, Some(map)) => map,
        _ => return current.adjacent(&codomain),
    };
    let mut images = match map.active_target(leg, filled) {
        Some(target) => {
            let endpoint = codomain.endpoint(target.endpoint);
            let x = target.preimage.dist() - filled;
            let y = current.distance(&endpoint);
            toward_target(x, y, current, endpoint, &codomain)
        }
        None => current.adjacent(&codomain),
    };
    let domain = Vertex::at(leg, filled + 1);
    images.retain(|image| map.allows(config, &domain, image));
    images
}

/// The surjectivity decision table for one step.
pub fn toward_target(x: usize, y: usize, current: Vertex, endpoint: Vertex, shape: &Shape) -> Vec<Vertex> {
    if x < y {
        return Vec::new();
    }
    if x == 1 && y == 0 {
        return vec![current];
    }
    match current.toward(&endpoint) {
        Some(next) if x == y => vec![next],
        Some(next) if x == y + 1 => vec![current, next],
        _ => current.adjacent(shape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriodConfig;
    use crate::mapping::EndpointMap;

    fn shape() -> Shape {
        Shape::new(3, 3)
    }

    #[test]
    fn test_infeasible() {
        assert!(toward_target(1, 3, Vertex::at(1, 1), Vertex::at(0, 3), &shape()).is_empty());
    }

    #[test]
    fn test_no_room_to_wiggle() {
        let end = Vertex::at(2, 3);
        assert_eq!(toward_target(1, 0, end, end, &shape()), vec![end]);
    }

    #[test]
    fn test_direct_path() {
        let end = Vertex::at(2, 3);
        assert_eq!(
            toward_target(3, 3, Vertex::branch(), end, &shape()),
            vec![Vertex::at(2, 1)]
        );
        assert_eq!(
            toward_target(4, 4, Vertex::at(0, 1), end, &shape()),
            vec![Vertex::branch()]
        );
        assert_eq!(
            toward_target(1, 1, Vertex::at(2, 2), end, &shape()),
            vec![end]
        );
    }

    #[test]
    fn test_one_spare_step() {
        let end = Vertex::at(1, 3);
        assert_eq!(
            toward_target(3, 2, Vertex::at(1, 1), end, &shape()),
            vec![Vertex::at(1, 1), Vertex::at(1, 2)]
        );
    }

    #[test]
    fn test_room_to_wiggle() {
        let end = Vertex::at(1, 3);
        let current = Vertex::at(1, 1);
        assert_eq!(
            toward_target(5, 2, current, end, &shape()),
            current.adjacent(&shape())
        );
        // Already at the endpoint with steps to spare.
        assert_eq!(toward_target(3, 0, end, end, &shape()), end.adjacent(&shape()));
    }

    #[test]
    fn test_next_images_uses_nearest_target() {
        let config = TriodConfig::new(4, 1, 3).unwrap();
        let map = EndpointMap::new(
            &config,
            vec![Vertex::at(0, 3), Vertex::at(0, 1), Vertex::at(1, 1)],
        )
        .unwrap();
        let mapping = Mapping::new(config, Vertex::branch())
            .unwrap()
            .with_endpoint_map(map)
            .unwrap();
        // Endpoint 1 must be hit at domain (0, 1): one step, one away.
        assert_eq!(
            next_images(&mapping, 0, CompletionStrategy::Surjective),
            vec![Vertex::at(1, 1)]
        );
        assert_eq!(next_images(&mapping, 0, CompletionStrategy::Plain).len(), 4);
        // Leg 2 carries no target.
        assert_eq!(next_images(&mapping, 2, CompletionStrategy::Surjective).len(), 4);
    }

    #[test]
    fn test_next_images_skips_early_endpoints() {
        let config = TriodConfig::new(3, 1, 3).unwrap();
        let map = EndpointMap::new(
            &config,
            vec![Vertex::at(1, 1), Vertex::at(0, 1), Vertex::at(2, 1)],
        )
        .unwrap();
        let mut mapping = Mapping::new(config, Vertex::branch())
            .unwrap()
            .with_endpoint_map(map)
            .unwrap();
        mapping.push(0, Vertex::at(1, 1)).unwrap();
        mapping.push(0, Vertex::branch()).unwrap();
        // Endpoints 0 and 2 belong to domain (1, 1) and (2, 1), which come after (0, 3).
        assert_eq!(
            next_images(&mapping, 0, CompletionStrategy::Surjective),
            vec![Vertex::branch(), Vertex::at(1, 1)]
        );
        assert_eq!(next_images(&mapping, 0, CompletionStrategy::Plain).len(), 4);
    }
}
