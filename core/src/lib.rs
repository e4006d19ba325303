#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rat Maze simulation engine.
//!
//! This crate defines the configuration surface consumed by the world
//! builder and the navigation system: maze archetype descriptions, obstacle
//! placements, navigator tuning knobs, and the opaque handles rendering
//! layers need to display walls. Everything here is a plain value type;
//! geometry and motion live in the `world` and `systems` crates.

use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default clearance kept between the rat and every wall, in world units.
pub const DEFAULT_WALL_OFFSET: f32 = 5.0;

/// Wall height assigned to walls read from a custom maze file.
pub const DEFAULT_CUSTOM_WALL_HEIGHT: f32 = 12.0;

/// Wall height assigned to rectangular obstacle quads.
pub const DEFAULT_OBSTACLE_HEIGHT: f32 = 60.0;

/// Opaque handle identifying a wall or floor texture.
///
/// The navigation core never interprets the handle; it is carried on each
/// wall so rendering layers can texture the matching quad.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TextureId(u32);

impl TextureId {
    /// Creates a new texture handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tagged description of one maze archetype.
///
/// Validated once by [`MazeSpec::validate`] before the world builder turns
/// it into a wall list; an invalid spec never reaches geometry code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MazeSpec {
    /// Rectangular box spanning `(0,0)` to `(length,width)`.
    Box {
        /// Extent of the box along the x axis.
        length: f32,
        /// Extent of the box along the y axis.
        width: f32,
        /// Height of the four surrounding walls.
        height: f32,
    },
    /// Radial maze with corridors extending from a shared inner polygon.
    Star {
        /// Number of corridors radiating outward.
        arms: u32,
        /// Width of each corridor.
        arm_width: f32,
        /// Length of each corridor measured from the inner polygon.
        arm_length: f32,
        /// Height of every corridor wall.
        arm_height: f32,
    },
    /// T-shaped maze composed of a vertical stem and a horizontal bar.
    TMaze {
        /// Length of the vertical stem.
        vertical_length: f32,
        /// Width of the vertical stem.
        vertical_width: f32,
        /// Length of the horizontal bar.
        horizontal_length: f32,
        /// Width of the horizontal bar.
        horizontal_width: f32,
        /// Height shared by all eight walls.
        wall_height: f32,
    },
    /// Circular arena approximated by equal angular wall chords.
    Circle {
        /// Radius of the circle the chords inscribe.
        radius: f32,
        /// Number of chord segments forming the perimeter.
        segments: u32,
        /// Height of every chord wall.
        wall_height: f32,
    },
    /// Custom maze read from a wall-per-line description file.
    FromFile {
        /// Location of the maze description file.
        path: PathBuf,
    },
}

impl MazeSpec {
    /// Checks the archetype parameters and rejects degenerate geometry.
    ///
    /// Dimensions must be strictly positive and finite; radial archetypes
    /// need at least three arms or segments to enclose any interior.
    /// File-based mazes are validated later, while parsing the file itself.
    pub fn validate(&self) -> Result<(), MazeSpecError> {
        match *self {
            Self::Box {
                length,
                width,
                height,
            } => {
                check_dimension("box", "length", length)?;
                check_dimension("box", "width", width)?;
                check_dimension("box", "height", height)
            }
            Self::Star {
                arms,
                arm_width,
                arm_length,
                arm_height,
            } => {
                if arms < 3 {
                    return Err(MazeSpecError::TooFewArms { arms });
                }
                check_dimension("star", "arm_width", arm_width)?;
                check_dimension("star", "arm_length", arm_length)?;
                check_dimension("star", "arm_height", arm_height)
            }
            Self::TMaze {
                vertical_length,
                vertical_width,
                horizontal_length,
                horizontal_width,
                wall_height,
            } => {
                check_dimension("T", "vertical_length", vertical_length)?;
                check_dimension("T", "vertical_width", vertical_width)?;
                check_dimension("T", "horizontal_length", horizontal_length)?;
                check_dimension("T", "horizontal_width", horizontal_width)?;
                check_dimension("T", "wall_height", wall_height)
            }
            Self::Circle {
                radius,
                segments,
                wall_height,
            } => {
                if segments < 3 {
                    return Err(MazeSpecError::TooFewSegments { segments });
                }
                check_dimension("circle", "radius", radius)?;
                check_dimension("circle", "wall_height", wall_height)
            }
            Self::FromFile { .. } => Ok(()),
        }
    }
}

fn check_dimension(
    archetype: &'static str,
    dimension: &'static str,
    value: f32,
) -> Result<(), MazeSpecError> {
    if !value.is_finite() {
        return Err(MazeSpecError::NonFiniteDimension {
            archetype,
            dimension,
            value,
        });
    }
    if value <= 0.0 {
        return Err(MazeSpecError::NonPositiveDimension {
            archetype,
            dimension,
            value,
        });
    }
    Ok(())
}

/// Reasons a maze archetype description may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MazeSpecError {
    /// A dimension was zero or negative, leaving no enclosed interior.
    #[error("{archetype} maze {dimension} must be positive, got {value}")]
    NonPositiveDimension {
        /// Archetype whose parameters failed validation.
        archetype: &'static str,
        /// Name of the offending dimension.
        dimension: &'static str,
        /// Value supplied by the caller.
        value: f32,
    },
    /// A dimension was NaN or infinite.
    #[error("{archetype} maze {dimension} must be finite, got {value}")]
    NonFiniteDimension {
        /// Archetype whose parameters failed validation.
        archetype: &'static str,
        /// Name of the offending dimension.
        dimension: &'static str,
        /// Value supplied by the caller.
        value: f32,
    },
    /// A star maze needs at least three arms to enclose an interior.
    #[error("star maze needs at least 3 arms, got {arms}")]
    TooFewArms {
        /// Arm count supplied by the caller.
        arms: u32,
    },
    /// A circular maze needs at least three chord segments.
    #[error("circle maze needs at least 3 segments, got {segments}")]
    TooFewSegments {
        /// Segment count supplied by the caller.
        segments: u32,
    },
}

/// Axis-aligned rectangular obstacle dropped into the walkable region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    lower_left: Vec2,
    upper_right: Vec2,
}

impl Obstacle {
    /// Creates an obstacle from its lower-left and upper-right corners.
    #[must_use]
    pub const fn from_corners(lower_left: Vec2, upper_right: Vec2) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Lower-left corner of the obstacle rectangle.
    #[must_use]
    pub const fn lower_left(&self) -> Vec2 {
        self.lower_left
    }

    /// Upper-right corner of the obstacle rectangle.
    #[must_use]
    pub const fn upper_right(&self) -> Vec2 {
        self.upper_right
    }
}

/// Axis-aligned bounding box of the constructed maze.
///
/// Derived once from the final wall list, obstacle walls included, and
/// immutable afterwards. The box tightly bounds every wall endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldLimits {
    min: Vec2,
    max: Vec2,
}

impl WorldLimits {
    /// Creates limits from explicit minimum and maximum corners.
    #[must_use]
    pub const fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Minimum corner of the bounding box.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner of the bounding box.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the point lies within the bounding box, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.x <= self.max.x
            && point.y <= self.max.y
    }
}

/// Complete description of one world to build.
///
/// This is the validated configuration record handed to the world builder;
/// outer layers persist it as part of the experiment setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Archetype and dimensions of the maze to construct.
    pub spec: MazeSpec,
    /// Rectangular obstacles placed inside the walkable region.
    pub obstacles: Vec<Obstacle>,
    /// Minimum clearance kept between the rat and every wall.
    pub wall_offset: f32,
    /// Height assigned to obstacle walls.
    pub obstacle_height: f32,
    /// Assigns a different wall texture per wall instead of a uniform one.
    pub wall_mix: bool,
    /// Assigns a different crate texture per obstacle instead of a uniform one.
    pub obstacle_mix: bool,
}

impl MazeConfig {
    /// Creates a configuration for the provided spec with default options.
    #[must_use]
    pub fn new(spec: MazeSpec) -> Self {
        Self {
            spec,
            obstacles: Vec::new(),
            wall_offset: DEFAULT_WALL_OFFSET,
            obstacle_height: DEFAULT_OBSTACLE_HEIGHT,
            wall_mix: false,
            obstacle_mix: false,
        }
    }
}

/// Tuning knobs controlling every adjustable aspect of rat locomotion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationTuning {
    /// Distance covered by one step; also the waypoint arrival threshold.
    pub speed: f32,
    /// Weight of the previous velocity in the next step, in `[0,1]`;
    /// higher values produce smoother, straighter paths.
    pub momentum: f32,
    /// Width in degrees of the sector the noise direction is drawn from,
    /// centered on the previous heading. `360` removes the restriction.
    pub arc: f32,
    /// Axis of an optional directional speed-up; zero disables the bias.
    pub bias: Vec2,
    /// Strength factor applied to the directional bias term.
    pub bias_strength: f32,
    /// Lateral deviation from the beeline while following a waypoint route.
    pub path_deviation: f32,
    /// Restart the waypoint route seamlessly instead of teleporting back.
    pub path_loop: bool,
}

impl Default for NavigationTuning {
    fn default() -> Self {
        Self {
            speed: 1.0,
            momentum: 0.55,
            arc: 320.0,
            bias: Vec2::ZERO,
            bias_strength: 0.0,
            path_deviation: 0.125,
            path_loop: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MazeConfig, MazeSpec, MazeSpecError, NavigationTuning, Obstacle, TextureId};
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn maze_spec_round_trips_through_bincode() {
        let spec = MazeSpec::Star {
            arms: 5,
            arm_width: 40.0,
            arm_length: 120.0,
            arm_height: 30.0,
        };
        assert_round_trip(&spec);
    }

    #[test]
    fn maze_config_round_trips_through_bincode() {
        let mut config = MazeConfig::new(MazeSpec::Box {
            length: 300.0,
            width: 200.0,
            height: 100.0,
        });
        config.obstacles.push(Obstacle::from_corners(
            Vec2::new(50.0, 50.0),
            Vec2::new(90.0, 80.0),
        ));
        assert_round_trip(&config);
    }

    #[test]
    fn navigation_tuning_round_trips_through_bincode() {
        assert_round_trip(&NavigationTuning::default());
    }

    #[test]
    fn texture_id_round_trips_through_bincode() {
        assert_round_trip(&TextureId::new(7));
    }

    #[test]
    fn box_spec_with_default_dimensions_validates() {
        let spec = MazeSpec::Box {
            length: 300.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn zero_width_box_is_rejected() {
        let spec = MazeSpec::Box {
            length: 300.0,
            width: 0.0,
            height: 100.0,
        };
        assert_eq!(
            spec.validate(),
            Err(MazeSpecError::NonPositiveDimension {
                archetype: "box",
                dimension: "width",
                value: 0.0,
            })
        );
    }

    #[test]
    fn nan_radius_is_rejected() {
        let spec = MazeSpec::Circle {
            radius: f32::NAN,
            segments: 32,
            wall_height: 20.0,
        };
        assert!(matches!(
            spec.validate(),
            Err(MazeSpecError::NonFiniteDimension { .. })
        ));
    }

    #[test]
    fn two_armed_star_is_rejected() {
        let spec = MazeSpec::Star {
            arms: 2,
            arm_width: 40.0,
            arm_length: 120.0,
            arm_height: 30.0,
        };
        assert_eq!(spec.validate(), Err(MazeSpecError::TooFewArms { arms: 2 }));
    }

    #[test]
    fn two_segment_circle_is_rejected() {
        let spec = MazeSpec::Circle {
            radius: 100.0,
            segments: 2,
            wall_height: 20.0,
        };
        assert_eq!(
            spec.validate(),
            Err(MazeSpecError::TooFewSegments { segments: 2 })
        );
    }

    #[test]
    fn tuning_defaults_match_documented_values() {
        let tuning = NavigationTuning::default();
        assert!((tuning.speed - 1.0).abs() < f32::EPSILON);
        assert!((tuning.momentum - 0.55).abs() < f32::EPSILON);
        assert!((tuning.arc - 320.0).abs() < f32::EPSILON);
        assert_eq!(tuning.bias, Vec2::ZERO);
        assert!(!tuning.path_loop);
    }
}
