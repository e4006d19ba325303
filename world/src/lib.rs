#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze geometry for the Rat Maze simulation.
//!
//! The world owns the immutable wall list built from a [`MazeConfig`] and
//! answers the three questions navigation needs: is this position legal, is
//! this step legal, and where is a random legal position. Walls are directed
//! segments with an inward-facing normal; each one carries its own proximity
//! and crossing predicates. Rendering layers read wall geometry through the
//! [`query`] module and never mutate it.

mod builder;

use std::{collections::BTreeMap, io, path::PathBuf};

use glam::Vec2;
use rand::Rng;
use rat_maze_core::{MazeConfig, MazeSpecError, TextureId, WorldLimits};
use thiserror::Error;

/// Upper bound on rejection-sampling attempts in [`World::random_position`].
///
/// The cap keeps sampling from looping forever on mazes whose walkable
/// area is a sliver of their bounding box.
pub const RANDOM_POSITION_ATTEMPTS: u32 = 10_000;

/// Treat crossing-solver denominators below this magnitude as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Squared segment length below which wall endpoints count as coincident.
const MIN_WALL_EXTENT_SQUARED: f32 = 1e-12;

/// Directed boundary segment with a derived inward-facing normal.
///
/// `from` and `to` are the left and right ends when facing the walkable
/// side. The normal is computed once at construction and points toward the
/// side considered "in front of" the wall. Walls are immutable and owned
/// exclusively by the [`World`] that built them.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    from: Vec2,
    to: Vec2,
    height: f32,
    normal: Vec2,
    texture: TextureId,
    approach_offset: f32,
}

impl Wall {
    pub(crate) fn new(
        from: Vec2,
        to: Vec2,
        height: f32,
        texture: TextureId,
        approach_offset: f32,
    ) -> Result<Self, WorldBuildError> {
        let along = to - from;
        if along.length_squared() < MIN_WALL_EXTENT_SQUARED {
            return Err(WorldBuildError::DegenerateWall { from, to });
        }
        let normal = Vec2::new(along.y, -along.x).normalize();
        Ok(Self {
            from,
            to,
            height,
            normal,
            texture,
            approach_offset,
        })
    }

    /// Left endpoint of the wall when facing its walkable side.
    #[must_use]
    pub const fn from(&self) -> Vec2 {
        self.from
    }

    /// Right endpoint of the wall when facing its walkable side.
    #[must_use]
    pub const fn to(&self) -> Vec2 {
        self.to
    }

    /// Wall height; render metadata, never consulted by collision logic.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Unit normal pointing toward the walkable side of the wall.
    #[must_use]
    pub const fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Texture handle carried for rendering layers.
    #[must_use]
    pub const fn texture(&self) -> TextureId {
        self.texture
    }

    /// Minimum clearance enforced around the wall segment.
    #[must_use]
    pub const fn approach_offset(&self) -> f32 {
        self.approach_offset
    }

    fn midpoint(&self) -> Vec2 {
        self.from + 0.5 * (self.to - self.from)
    }

    /// Classifies which side of the wall the point lies on.
    ///
    /// True iff the point lies on the walkable side of the segment
    /// midpoint, i.e. along the normal direction.
    #[must_use]
    pub fn facing_front(&self, point: Vec2) -> bool {
        (point - self.midpoint()).dot(self.normal) >= 0.0
    }

    /// Reports whether the point violates the wall's minimum clearance.
    ///
    /// Projects the point onto the segment, clamps the projection parameter
    /// to the segment bounds, and compares the distance to the nearest
    /// point against the approach offset. Fires from either side of the
    /// wall.
    #[must_use]
    pub fn proximity_alert(&self, point: Vec2) -> bool {
        let along = self.to - self.from;
        let mu = (point - self.from).dot(along) / along.length_squared();
        let nearest = self.from + along * mu.clamp(0.0, 1.0);
        point.distance(nearest) < self.approach_offset
    }

    /// Reports whether the step from `pos_old` to `pos_new` crosses the wall.
    ///
    /// The front/behind pre-check requires the two positions strictly on
    /// opposite sides of the wall, so the predicate is symmetric under step
    /// reversal; only then is the two-segment intersection solved. Steps
    /// parallel to the wall are rejected by the pre-check or the
    /// denominator guard, never producing NaN.
    #[must_use]
    pub fn crossed_by(&self, pos_old: Vec2, pos_new: Vec2) -> bool {
        let midpoint = self.midpoint();
        let old_side = (pos_old - midpoint).dot(self.normal);
        let new_side = (pos_new - midpoint).dot(self.normal);
        if old_side * new_side >= 0.0 {
            return false;
        }

        let along = self.to - self.from;
        let step = pos_new - pos_old;
        let denominator = along.perp_dot(step);
        if denominator.abs() < PARALLEL_EPSILON {
            return false;
        }

        let offset = pos_old - self.from;
        let lambda = offset.perp_dot(step) / denominator;
        let mu = offset.perp_dot(along) / denominator;
        (0.0..=1.0).contains(&lambda) && (0.0..=1.0).contains(&mu)
    }
}

/// Immutable maze world: the wall collection and its derived limits.
#[derive(Clone, Debug)]
pub struct World {
    walls: Vec<Wall>,
    limits: WorldLimits,
    floor_texture: Option<TextureId>,
    texture_names: BTreeMap<String, TextureId>,
}

impl World {
    /// Builds a world from a validated maze configuration.
    ///
    /// Constructs the archetype walls, appends four walls per obstacle
    /// rectangle, and derives the bounding limits from the final wall
    /// list. Configuration problems (degenerate walls, unreadable or
    /// malformed maze files) fail here, before any navigation starts.
    pub fn build(config: &MazeConfig) -> Result<Self, WorldBuildError> {
        config.spec.validate()?;
        let blueprint = builder::construct(config)?;

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for wall in &blueprint.walls {
            min = min.min(wall.from()).min(wall.to());
            max = max.max(wall.from()).max(wall.to());
        }

        Ok(Self {
            walls: blueprint.walls,
            limits: WorldLimits::from_min_max(min, max),
            floor_texture: blueprint.floor_texture,
            texture_names: blueprint.texture_names,
        })
    }

    /// Axis-aligned bounding box of every wall endpoint.
    #[must_use]
    pub const fn limits(&self) -> WorldLimits {
        self.limits
    }

    /// Reports whether the position is legal for the rat to occupy.
    ///
    /// A position is rejected when any wall's proximity alert fires;
    /// otherwise an even-odd ray cast over the wall list decides
    /// containment.
    ///
    /// The containment test treats the walls as edges of a single closed
    /// polygon. That precondition holds for the built-in archetypes; for
    /// worlds with disjoint obstacle quads or open custom wall sets the
    /// answer is best-effort, not a guarantee.
    #[must_use]
    pub fn valid_position(&self, position: Vec2) -> bool {
        let mut odd_nodes = false;
        for wall in &self.walls {
            if wall.proximity_alert(position) {
                return false;
            }
            let from = wall.from();
            let to = wall.to();
            let straddles = (from.y < position.y && to.y >= position.y)
                || (to.y < position.y && from.y >= position.y);
            if straddles
                && from.x + (position.y - from.y) / (to.y - from.y) * (to.x - from.x) < position.x
            {
                odd_nodes = !odd_nodes;
            }
        }
        odd_nodes
    }

    /// Reports whether a step between two positions is legal.
    ///
    /// The destination must be a valid position and the step segment must
    /// not cross any wall.
    #[must_use]
    pub fn valid_step(&self, pos_old: Vec2, pos_new: Vec2) -> bool {
        if !self.valid_position(pos_new) {
            return false;
        }
        self.walls
            .iter()
            .all(|wall| !wall.crossed_by(pos_old, pos_new))
    }

    /// Samples a uniformly random valid position within the world limits.
    ///
    /// Rejection-samples integer coordinates inside the bounding box until
    /// [`World::valid_position`] accepts one, giving up after
    /// [`RANDOM_POSITION_ATTEMPTS`] draws so pathological mazes cannot
    /// loop forever.
    pub fn random_position<R>(&self, rng: &mut R) -> Result<Vec2, WorldError>
    where
        R: Rng + ?Sized,
    {
        let min_x = self.limits.min().x.ceil() as i32;
        let min_y = self.limits.min().y.ceil() as i32;
        let max_x = self.limits.max().x.floor() as i32;
        let max_y = self.limits.max().y.floor() as i32;
        if min_x >= max_x || min_y >= max_y {
            return Err(WorldError::DegenerateLimits {
                limits: self.limits,
            });
        }

        for _ in 0..RANDOM_POSITION_ATTEMPTS {
            let candidate = Vec2::new(
                rng.gen_range(min_x..max_x) as f32,
                rng.gen_range(min_y..max_y) as f32,
            );
            if self.valid_position(candidate) {
                return Ok(candidate);
            }
        }

        Err(WorldError::RandomPositionExhausted {
            attempts: RANDOM_POSITION_ATTEMPTS,
        })
    }
}

/// Reasons world construction may fail.
#[derive(Debug, Error)]
pub enum WorldBuildError {
    /// The maze archetype parameters were rejected.
    #[error(transparent)]
    InvalidSpec(#[from] MazeSpecError),
    /// A wall was specified with coincident endpoints, so its normal is
    /// undefined.
    #[error("degenerate wall from {from} to {to}")]
    DegenerateWall {
        /// Left endpoint of the rejected wall.
        from: Vec2,
        /// Right endpoint of the rejected wall.
        to: Vec2,
    },
    /// The custom maze file could not be read.
    #[error("failed to read maze file {path:?}")]
    MazeFile {
        /// Location of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line in the custom maze file did not parse as a wall or floor
    /// directive.
    #[error("malformed line {line} in maze file {path:?}: {content:?}")]
    MalformedMazeLine {
        /// Location of the offending file.
        path: PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// Content of the offending line.
        content: String,
    },
    /// The custom maze file contained no walls before the terminating
    /// blank line.
    #[error("maze file {path:?} defines no walls")]
    EmptyMazeFile {
        /// Location of the empty maze description.
        path: PathBuf,
    },
}

/// Runtime failures surfaced by world queries.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Rejection sampling failed to find a valid position within the
    /// attempt budget.
    #[error("no valid position found in {attempts} attempts")]
    RandomPositionExhausted {
        /// Number of draws that were attempted.
        attempts: u32,
    },
    /// The world limits span less than one integer coordinate per axis,
    /// so there is nothing to sample.
    #[error("world limits {limits:?} enclose no sampleable interior")]
    DegenerateLimits {
        /// Limits of the degenerate world.
        limits: WorldLimits,
    },
}

/// Read-only queries exposed for rendering and recording layers.
pub mod query {
    use super::{TextureId, Wall, World, WorldLimits};

    /// Walls composing the maze, in construction order.
    #[must_use]
    pub fn walls(world: &World) -> &[Wall] {
        &world.walls
    }

    /// Axis-aligned bounding box of the maze.
    #[must_use]
    pub fn limits(world: &World) -> WorldLimits {
        world.limits()
    }

    /// Floor texture override selected by a custom maze file, if any.
    #[must_use]
    pub fn floor_texture(world: &World) -> Option<TextureId> {
        world.floor_texture
    }

    /// Resolves a texture name from a custom maze file to its handle.
    #[must_use]
    pub fn texture_id(world: &World, name: &str) -> Option<TextureId> {
        world.texture_names.get(name).copied()
    }

    /// Iterates over all interned texture names with their handles.
    pub fn texture_names(world: &World) -> impl Iterator<Item = (&str, TextureId)> {
        world
            .texture_names
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }
}
