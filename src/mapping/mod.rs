// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Continuous piecewise-linear maps between triods.
//!
//! A [`Mapping`] stores the image of every domain vertex: the image of the
//! branch point (the basepoint) and, per leg, the images of `(arm, 1)`,
//! `(arm, 2)`, ... in order. Legs may be partially filled; the completion
//! enumerator grows them one entry at a time.
//!
//! Continuity is enforced on every mutation: the images of adjacent domain
//! vertices must be equal or adjacent in the codomain.

pub mod endpoint_map;
pub mod pair;

pub use endpoint_map::EndpointMap;
pub use pair::MappingPair;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TriodConfig;
use crate::error::{Result, TriodError};
use crate::geometry::{Point, Vertex};

/// A (possibly partial) map from the domain triod to the codomain triod.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    config: TriodConfig,
    basepoint: Vertex,
    legs: Vec<Vec<Vertex>>,
    endpoint_map: Option<EndpointMap>,
}

impl Mapping {
    /// An empty mapping: only the image of the branch point is defined.
    pub fn new(config: TriodConfig, basepoint: Vertex) -> Result<Self> {
        let codomain = config.codomain();
        codomain.check(basepoint.arm(), basepoint.dist())?;
        Ok(Self {
            config,
            basepoint,
            legs: vec![Vec::with_capacity(config.n()); config.t()],
            endpoint_map: None,
        })
    }

    /// Build a mapping from explicit leg images, checking continuity entry by entry.
    pub fn from_legs(config: TriodConfig, basepoint: Vertex, legs: Vec<Vec<Vertex>>) -> Result<Self> {
        if legs.len() != config.t() {
            return Err(TriodError::InvalidConfig(format!(
                "expected {} legs, got {}",
                config.t(),
                legs.len()
            )));
        }
        let mut mapping = Self::new(config, basepoint)?;
        for (arm, leg) in legs.into_iter().enumerate() {
            for image in leg {
                mapping.push(arm, image)?;
            }
        }
        Ok(mapping)
    }

    /// Attach the endpoint map that drives surjective completion.
    ///
    /// An endpoint map can be attached once; it must admit this basepoint.
    pub fn with_endpoint_map(mut self, endpoint_map: EndpointMap) -> Result<Self> {
        if self.endpoint_map.is_some() {
            return Err(TriodError::InvalidEndpointMap(
                "mapping already carries an endpoint map".to_string(),
            ));
        }
        if !endpoint_map.admits_basepoint(&self.config, &self.basepoint) {
            return Err(TriodError::InvalidEndpointMap(format!(
                "{} cannot start from basepoint {}",
                endpoint_map, self.basepoint
            )));
        }
        self.endpoint_map = Some(endpoint_map);
        Ok(self)
    }

    pub fn config(&self) -> &TriodConfig {
        &self.config
    }

    pub fn basepoint(&self) -> Vertex {
        self.basepoint
    }

    pub fn endpoint_map(&self) -> Option<&EndpointMap> {
        self.endpoint_map.as_ref()
    }

    /// Images of `(arm, 1)`, `(arm, 2)`, ... defined so far.
    pub fn leg(&self, arm: usize) -> &[Vertex] {
        &self.legs[arm]
    }

    pub fn leg_len(&self, arm: usize) -> usize {
        self.legs[arm].len()
    }

    /// Image of the outermost defined vertex on `arm` (the basepoint if the leg is empty).
    pub fn last_image(&self, arm: usize) -> Vertex {
        self.legs[arm].last().copied().unwrap_or(self.basepoint)
    }

    /// First leg holding fewer than `length` images.
    pub fn first_short_leg(&self, length: usize) -> Option<usize> {
        self.legs.iter().position(|leg| leg.len() < length)
    }

    /// Every leg holds `length` images or more.
    pub fn is_filled_to(&self, length: usize) -> bool {
        self.first_short_leg(length).is_none()
    }

    /// Every domain vertex has an image.
    pub fn is_complete(&self) -> bool {
        self.is_filled_to(self.config.n())
    }

    /// The basepoint followed by every defined leg image.
    pub fn images(&self) -> impl Iterator<Item = Vertex> + '_ {
        std::iter::once(self.basepoint).chain(self.legs.iter().flatten().copied())
    }

    /// Image of a domain vertex, or `None` while it is undefined.
    pub fn image(&self, domain: &Vertex) -> Option<Vertex> {
        if domain.is_branch() {
            Some(self.basepoint)
        } else {
            self.legs.get(domain.arm())?.get(domain.dist() - 1).copied()
        }
    }

    /// Evaluate the map at a normalized domain point.
    ///
    /// The point is placed between its two bracketing domain vertices and the
    /// fraction is carried along the codomain edge joining their images. The
    /// edge may run toward or away from the branch point, and may start or end
    /// at it. Returns `None` if a bracketing vertex has no image yet.
    pub fn evaluate(&self, point: &Point) -> Option<Point> {
        let domain = self.config.domain();
        let codomain = self.config.codomain();
        let (arm, s) = point.scaled(&domain);
        let low = s.floor() as usize;
        if low >= domain.length() {
            return self
                .image(&Vertex::at(arm, domain.length()))
                .map(|v| v.to_point(&codomain));
        }
        let frac = s - low as f64;
        let from = self.image(&Vertex::at(arm, low))?;
        if frac == 0.0 {
            return Some(from.to_point(&codomain));
        }
        let to = self.image(&Vertex::at(arm, low + 1))?;
        if from == to {
            return Some(from.to_point(&codomain));
        }
        let image_arm = if from.is_branch() { to.arm() } else { from.arm() };
        let position = from.dist() as f64 + frac * (to.dist() as f64 - from.dist() as f64);
        Some(Point::at(image_arm, position / codomain.length() as f64))
    }

    /// Set the image of one domain vertex.
    ///
    /// Fails with `ContinuityViolation` if the new image is not adjacent to the
    /// image of an already-defined neighbour. Changing the basepoint is checked
    /// against the first image of every leg. Leg entries must be filled in
    /// order, so at most one past the last defined entry may be set.
    pub fn set(&mut self, domain: Vertex, image: Vertex) -> Result<()> {
        self.config.domain().check(domain.arm(), domain.dist())?;
        self.config.codomain().check(image.arm(), image.dist())?;

        if domain.is_branch() {
            for leg in &self.legs {
                if let Some(first) = leg.first() {
                    check_adjacent(domain, image, *first)?;
                }
            }
            self.basepoint = image;
            return Ok(());
        }

        let arm = domain.arm();
        let index = domain.dist() - 1;
        let filled = self.legs[arm].len();
        if index > filled {
            return Err(TriodError::NonContiguous {
                arm,
                dist: domain.dist(),
                filled,
            });
        }
        let inner = if index == 0 {
            self.basepoint
        } else {
            self.legs[arm][index - 1]
        };
        check_adjacent(domain, image, inner)?;
        if let Some(outer) = self.legs[arm].get(index + 1) {
            check_adjacent(domain, image, *outer)?;
        }

        if index == filled {
            self.legs[arm].push(image);
        } else {
            self.legs[arm][index] = image;
        }
        Ok(())
    }

    /// Append the image of the next undefined vertex on `arm`.
    pub fn push(&mut self, arm: usize, image: Vertex) -> Result<()> {
        if arm >= self.config.t() {
            return Err(TriodError::OutOfRange {
                arm,
                dist: "0".to_string(),
                legs: self.config.t(),
                length: self.config.n(),
            });
        }
        let next = self.legs[arm].len() + 1;
        self.set(Vertex::at(arm, next), image)
    }

    /// Remove the outermost image on `arm`.
    pub fn pop(&mut self, arm: usize) -> Option<Vertex> {
        self.legs.get_mut(arm)?.pop()
    }
}

fn check_adjacent(domain: Vertex, image: Vertex, neighbour: Vertex) -> Result<()> {
    if image.is_adjacent(&neighbour) {
        Ok(())
    } else {
        Err(TriodError::ContinuityViolation {
            domain: domain.to_string(),
            image: image.to_string(),
            neighbour: neighbour.to_string(),
        })
    }
}

/// Mappings are equal when they define the same images; the attached
/// endpoint map is bookkeeping and does not take part.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.basepoint == other.basepoint && self.legs == other.legs
    }
}

impl Eq for Mapping {}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.basepoint)?;
        for leg in &self.legs {
            write!(f, " |")?;
            for image in leg {
                write!(f, " {}", image)?;
            }
        }
        Ok(())
    }
}
