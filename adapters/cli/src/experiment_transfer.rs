#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rat_maze_core::{MazeConfig, NavigationTuning};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "rat";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "rat:v1";
/// Delimiter used to separate the prefix, run header and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of one complete experiment: maze, locomotion tuning and run
/// parameters, self-contained enough to reproduce the trajectory elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ExperimentSnapshot {
    /// Number of simulation steps the run covers.
    pub steps: u32,
    /// Seed feeding the deterministic random number generator.
    pub seed: u64,
    /// Maze configuration the world is built from.
    pub config: MazeConfig,
    /// Locomotion tuning applied to the rat.
    pub tuning: NavigationTuning,
}

impl ExperimentSnapshot {
    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            config: self.config.clone(),
            tuning: self.tuning,
        };
        let json =
            serde_json::to_vec(&payload).expect("experiment snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.steps, self.seed)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ExperimentTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ExperimentTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ExperimentTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ExperimentTransferError::MissingVersion)?;
        let run = parts.next().ok_or(ExperimentTransferError::MissingRun)?;
        let payload = parts.next().ok_or(ExperimentTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(ExperimentTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(ExperimentTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let (steps, seed) = parse_run(run)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ExperimentTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(ExperimentTransferError::InvalidPayload)?;

        Ok(Self {
            steps,
            seed,
            config: decoded.config,
            tuning: decoded.tuning,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    config: MazeConfig,
    tuning: NavigationTuning,
}

/// Errors that can occur while decoding experiment transfer strings.
#[derive(Debug)]
pub(crate) enum ExperimentTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include the run header.
    MissingRun,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The run header could not be parsed from the encoded snapshot.
    InvalidRun(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ExperimentTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer payload was empty"),
            Self::MissingPrefix => write!(f, "experiment string is missing the prefix"),
            Self::MissingVersion => write!(f, "experiment string is missing the version"),
            Self::MissingRun => write!(f, "experiment string is missing the run header"),
            Self::MissingPayload => write!(f, "experiment string is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "experiment prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "experiment version '{version}' is not supported")
            }
            Self::InvalidRun(run) => {
                write!(f, "could not parse run header '{run}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode experiment payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse experiment payload: {error}")
            }
        }
    }
}

impl Error for ExperimentTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_run(run: &str) -> Result<(u32, u64), ExperimentTransferError> {
    let (steps, seed) = run
        .split_once(['x', 'X'])
        .ok_or_else(|| ExperimentTransferError::InvalidRun(run.to_owned()))?;

    let steps = steps
        .trim()
        .parse::<u32>()
        .map_err(|_| ExperimentTransferError::InvalidRun(run.to_owned()))?;
    let seed = seed
        .trim()
        .parse::<u64>()
        .map_err(|_| ExperimentTransferError::InvalidRun(run.to_owned()))?;

    if steps == 0 {
        return Err(ExperimentTransferError::InvalidRun(run.to_owned()));
    }

    Ok((steps, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rat_maze_core::{MazeSpec, Obstacle};

    #[test]
    fn round_trip_default_experiment() {
        let snapshot = ExperimentSnapshot {
            steps: 1_000,
            seed: 7,
            config: MazeConfig::new(MazeSpec::Box {
                length: 300.0,
                width: 200.0,
                height: 100.0,
            }),
            tuning: NavigationTuning::default(),
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:1000x7:")));

        let decoded = ExperimentSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_tuned_experiment_with_obstacles() {
        let mut config = MazeConfig::new(MazeSpec::Star {
            arms: 5,
            arm_width: 40.0,
            arm_length: 120.0,
            arm_height: 60.0,
        });
        config.obstacles.push(Obstacle::from_corners(
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 25.0),
        ));
        config.wall_mix = true;
        let snapshot = ExperimentSnapshot {
            steps: 50_000,
            seed: 0xDEAD_BEEF,
            config,
            tuning: NavigationTuning {
                momentum: 0.9,
                bias: Vec2::new(0.0, 1.0),
                bias_strength: 0.25,
                ..NavigationTuning::default()
            },
        };

        let encoded = snapshot.encode();
        let decoded = ExperimentSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        assert!(matches!(
            ExperimentSnapshot::decode("mouse:v1:10x1:e30"),
            Err(ExperimentTransferError::InvalidPrefix(prefix)) if prefix == "mouse"
        ));
    }

    #[test]
    fn zero_step_run_header_is_rejected() {
        assert!(matches!(
            ExperimentSnapshot::decode("rat:v1:0x1:e30"),
            Err(ExperimentTransferError::InvalidRun(_))
        ));
    }
}
