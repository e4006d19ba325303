#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stochastic step generation for the virtual rat.
//!
//! The [`RatBot`] produces one trajectory sample per call in one of two
//! mutually exclusive modes fixed at construction: free exploration, a
//! momentum-and-noise random walk validated against the world's walls, or
//! waypoint following, which chases a route loaded from a file and trusts
//! the route author instead of checking collisions. The visited-position
//! path doubles as the externally consumable trajectory.

use std::{fs, io, path::Path, path::PathBuf};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::UnitCircle;
use rat_maze_core::NavigationTuning;
use rat_maze_world::World;
use thiserror::Error;

/// Upper bound on redraws of a rejected free-exploration step.
///
/// When the budget is exhausted the rat holds its position for the frame
/// and reports a zero step, so a caller's loop always makes progress.
pub const STEP_ATTEMPTS: u32 = 64;

/// Vectors shorter than this are treated as zero-length before normalizing.
const MIN_VECTOR_LENGTH: f32 = 1e-6;

/// Per-step stochastic motion generator for one simulated rat.
///
/// Owns the append-only path history and a seeded RNG; borrows the world
/// it navigates. One call to [`RatBot::next_step`] appends exactly one
/// position before returning.
#[derive(Debug)]
pub struct RatBot<'world> {
    world: &'world World,
    tuning: NavigationTuning,
    rng: ChaCha8Rng,
    path: Vec<Vec2>,
    route: Option<Route>,
}

#[derive(Debug)]
struct Route {
    waypoints: Vec<Vec2>,
    index: usize,
}

impl<'world> RatBot<'world> {
    /// Creates a free-exploration rat starting at the provided position.
    ///
    /// The starting position is trusted to be valid; pair this with
    /// [`World::random_position`] when no explicit start is configured.
    #[must_use]
    pub fn explorer(world: &'world World, tuning: NavigationTuning, start: Vec2, seed: u64) -> Self {
        Self {
            world,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            path: vec![start],
            route: None,
        }
    }

    /// Creates a waypoint-following rat from a route description file.
    ///
    /// The file holds one whitespace-separated `x y` pair per line; at
    /// least two waypoints are required. The rat's starting position is
    /// overridden to the first waypoint.
    pub fn follower(
        world: &'world World,
        tuning: NavigationTuning,
        waypoint_file: &Path,
        seed: u64,
    ) -> Result<Self, NavigationError> {
        let waypoints = parse_waypoints(waypoint_file)?;
        let start = waypoints[0];
        Ok(Self {
            world,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            path: vec![start],
            route: Some(Route {
                waypoints,
                index: 1,
            }),
        })
    }

    /// Trajectory recorded so far, starting position included.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Position the rat currently occupies.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.path.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// World the rat navigates.
    #[must_use]
    pub fn world(&self) -> &'world World {
        self.world
    }

    /// Generates the next step and returns the new position and the step
    /// vector that produced it.
    pub fn next_step(&mut self) -> (Vec2, Vec2) {
        if self.route.is_some() {
            self.follow_route_step()
        } else {
            self.explore_step()
        }
    }

    fn explore_step(&mut self) -> (Vec2, Vec2) {
        let position = self.position();
        let mut velocity = if self.path.len() > 1 {
            position - self.path[self.path.len() - 2]
        } else {
            unit_direction(&mut self.rng)
        };

        for _ in 0..STEP_ATTEMPTS {
            let noise = self.heading_noise(velocity);
            let momentum = self.tuning.momentum;
            let blended = velocity * momentum + noise * (1.0 - momentum);
            let length = blended.length();
            let mut step = if length < MIN_VECTOR_LENGTH {
                // Momentum and noise cancelled out; draw a fresh direction
                // instead of dividing toward NaN.
                unit_direction(&mut self.rng)
            } else {
                blended / length
            };
            step *= self.tuning.speed;

            let bias = self.tuning.bias;
            if self.tuning.bias_strength != 0.0 && bias != Vec2::ZERO {
                // Directional speed-up: squared and sign-preserving, so
                // motion aligned with the bias axis is accentuated
                // asymmetrically.
                let along = bias.dot(step);
                step += bias * along * along * along.signum() * self.tuning.bias_strength;
            }

            let next = position + step;
            if self.world.valid_step(position, next) {
                self.path.push(next);
                return (next, next - position);
            }
            // Rejected: halve the velocity magnitude and redraw.
            velocity *= 0.5;
        }

        // Attempt budget exhausted; hold position for this frame.
        self.path.push(position);
        (position, Vec2::ZERO)
    }

    fn heading_noise(&mut self, velocity: Vec2) -> Vec2 {
        let arc = self.tuning.arc;
        if arc >= 360.0 || velocity.length() < MIN_VECTOR_LENGTH {
            return unit_direction(&mut self.rng);
        }
        let heading = velocity.y.atan2(velocity.x).to_degrees();
        let degrees = heading - arc / 2.0 + self.rng.gen::<f32>() * arc;
        let radians = degrees.to_radians();
        Vec2::new(radians.cos(), radians.sin())
    }

    fn follow_route_step(&mut self) -> (Vec2, Vec2) {
        let position = self.position();
        let speed = self.tuning.speed;
        let deviation = self.tuning.path_deviation;
        let path_loop = self.tuning.path_loop;

        let Some(route) = self.route.as_mut() else {
            return (position, Vec2::ZERO);
        };

        if position.distance(route.waypoints[route.index]) < speed {
            route.index = (route.index + 1) % route.waypoints.len();
            if route.index == 0 && !path_loop {
                // End of a non-looping route: teleport back to the start
                // and report the heading of the first leg.
                let start = route.waypoints[0];
                let heading = (route.waypoints[1] - start).normalize();
                self.path.push(start);
                return (start, heading);
            }
        }

        let target = route.waypoints[route.index];
        let toward = target - position;
        let length = toward.length();
        let direct = if length < MIN_VECTOR_LENGTH {
            unit_direction(&mut self.rng)
        } else {
            toward / length
        };

        // Lateral rummaging noise, left or right with equal probability.
        // No collision check in this mode: the route author is trusted.
        let side = if self.rng.gen_bool(0.5) {
            direct.perp()
        } else {
            -direct.perp()
        };
        let step = (direct + side * deviation) * speed;

        let next = position + step;
        self.path.push(next);
        (next, step)
    }
}

/// Samples a uniformly distributed unit direction.
fn unit_direction(rng: &mut ChaCha8Rng) -> Vec2 {
    let [x, y]: [f32; 2] = rng.sample(UnitCircle);
    Vec2::new(x, y)
}

fn parse_waypoints(file: &Path) -> Result<Vec<Vec2>, NavigationError> {
    let text = fs::read_to_string(file).map_err(|source| NavigationError::WaypointFile {
        path: file.to_path_buf(),
        source,
    })?;

    let mut waypoints = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let malformed = || NavigationError::MalformedWaypoint {
            path: file.to_path_buf(),
            line: index + 1,
            content: line.to_owned(),
        };

        let mut fields = trimmed.split_whitespace();
        let x: f32 = fields
            .next()
            .ok_or_else(malformed)?
            .parse()
            .map_err(|_| malformed())?;
        let y: f32 = fields
            .next()
            .ok_or_else(malformed)?
            .parse()
            .map_err(|_| malformed())?;
        if fields.next().is_some() {
            return Err(malformed());
        }
        waypoints.push(Vec2::new(x, y));
    }

    if waypoints.len() < 2 {
        return Err(NavigationError::TooFewWaypoints {
            path: file.to_path_buf(),
            count: waypoints.len(),
        });
    }
    Ok(waypoints)
}

/// Reasons waypoint-following construction may fail.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The waypoint file could not be read.
    #[error("failed to read waypoint file {path:?}")]
    WaypointFile {
        /// Location of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line in the waypoint file did not parse as an `x y` pair.
    #[error("malformed line {line} in waypoint file {path:?}: {content:?}")]
    MalformedWaypoint {
        /// Location of the offending file.
        path: PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// Content of the offending line.
        content: String,
    },
    /// A route needs at least two waypoints to define a direction.
    #[error("waypoint file {path:?} holds {count} waypoints, need at least 2")]
    TooFewWaypoints {
        /// Location of the offending file.
        path: PathBuf,
        /// Number of waypoints that were parsed.
        count: usize,
    },
}
