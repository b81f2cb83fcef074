//! Wanderbot - Reactive Maze Navigation Controller
//!
//! This library provides the closed-loop motion control and decision layer
//! for a wheeled robot with sonar range sensors and bumper switches:
//! rotation correction, sonar-based obstacle classification, a reactive
//! path-decision policy, and bumper-triggered recovery maneuvers.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod driver;
pub mod motion;
pub mod navigation;
pub mod sensing;

// Re-export commonly used items for easier access
pub use driver::RobotDriver;
pub use motion::{HeadingController, MotionPrimitives, RotationOutcome};
pub use navigation::{BumperRecovery, Navigator, PathDecisionEngine, Turn, WallFollower};
pub use sensing::{ObstacleClassifier, ObstacleMap, SensorAggregator};

use std::fs::File;
use std::path::Path;

/// Navigation strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Reactive sonar classification with randomized tie-breaking
    Reactive,
    /// Calibration-based right-hand wall following
    WallFollow,
}

/// Sonar channel indices for the four mounted sensors
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SonarChannels {
    /// Forward-facing sonar
    pub front: usize,
    /// Left-facing sonar
    pub left: usize,
    /// Right-facing sonar
    pub right: usize,
    /// Northeast sonar (45 degrees to the right of front)
    pub northeast: usize,
}

/// Main configuration structure for the controller
///
/// Two built-in profiles exist: [`WanderConfig::simulator`] with the
/// simulator-calibrated constant set and [`WanderConfig::hardware`] with a
/// slower, wider-margin set for real deployments. Either can be overridden
/// from a YAML file via [`WanderConfig::load`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WanderConfig {
    /// Active navigation strategy
    pub strategy: Strategy,
    /// Sonar channel assignment
    pub sonar: SonarChannels,
    /// Maximum averaged distance still classified as blocked
    pub obstacle_threshold: f64,
    /// Maximum usable sonar range
    pub range_max: f64,
    /// Settle pause after motion and rotation commands, in milliseconds
    pub settle_ms: u64,
    /// Rotation tolerance in degrees
    pub rotation_tolerance: f64,
    /// Corrective rotations attempted before giving up
    pub max_correction_attempts: u32,
    /// Sonar polls allowed per drive leg in the wall-follow strategy
    pub max_drive_polls: u32,
    /// Raw readings averaged per distance estimate
    pub sonar_samples: u32,
    /// Forward/backward velocity of a step
    pub step_velocity: f64,
    /// Duration of one forward step, in milliseconds
    pub step_ms: u64,
    /// Nominal distance covered by one step (used by calibration)
    pub step_distance: f64,
    /// Seed for randomized tie-breaking; 0 draws from entropy
    pub rng_seed: u64,
}

impl WanderConfig {
    /// Constant set calibrated against the simulator
    pub fn simulator() -> Self {
        WanderConfig {
            strategy: Strategy::Reactive,
            sonar: SonarChannels {
                front: 3,
                left: 0,
                right: 6,
                northeast: 4,
            },
            obstacle_threshold: 0.1875,
            range_max: 2.0,
            settle_ms: 2000,
            rotation_tolerance: 4.0,
            max_correction_attempts: 20,
            max_drive_polls: 20_000,
            sonar_samples: 15,
            step_velocity: 1.0,
            step_ms: 1000,
            step_distance: 0.125,
            rng_seed: 0,
        }
    }

    /// Constant set for a real robot, in meters, with wider safety margins
    pub fn hardware() -> Self {
        WanderConfig {
            strategy: Strategy::Reactive,
            sonar: SonarChannels {
                front: 3,
                left: 0,
                right: 6,
                northeast: 4,
            },
            obstacle_threshold: 0.35,
            range_max: 4.0,
            settle_ms: 1200,
            rotation_tolerance: 4.0,
            max_correction_attempts: 20,
            max_drive_polls: 20_000,
            sonar_samples: 15,
            step_velocity: 0.4,
            step_ms: 500,
            step_distance: 0.25,
            rng_seed: 0,
        }
    }

    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WanderError> {
        let file = File::open(path.as_ref())
            .map_err(|e| WanderError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        let config: WanderConfig = serde_yaml::from_reader(file)
            .map_err(|e| WanderError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(config)
    }
}

impl Default for WanderConfig {
    fn default() -> Self {
        WanderConfig::simulator()
    }
}

/// Controller error types
#[derive(Debug)]
pub enum WanderError {
    /// The driver refused the connection
    ConnectionFailed,
    /// Configuration could not be read or parsed
    Config(String),
    /// Step-duration calibration found no usable wall
    CalibrationFailed(String),
}

impl std::fmt::Display for WanderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WanderError::ConnectionFailed => write!(f, "could not connect to robot"),
            WanderError::Config(msg) => write!(f, "configuration error: {}", msg),
            WanderError::CalibrationFailed(msg) => write!(f, "calibration failed: {}", msg),
        }
    }
}

impl std::error::Error for WanderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulator_profile_matches_calibrated_constants() {
        let config = WanderConfig::simulator();
        assert_eq!(config.sonar.front, 3);
        assert_eq!(config.sonar.left, 0);
        assert_eq!(config.sonar.right, 6);
        assert_eq!(config.sonar.northeast, 4);
        assert_eq!(config.settle_ms, 2000);
        assert_eq!(config.sonar_samples, 15);
        assert!((config.obstacle_threshold - 1.5 * config.step_distance).abs() < 1e-9);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let config = WanderConfig::hardware();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: WanderConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.strategy, Strategy::Reactive);
        assert_eq!(parsed.settle_ms, config.settle_ms);
        assert_eq!(parsed.sonar.northeast, config.sonar.northeast);
    }

    #[test]
    fn strategy_parses_kebab_case() {
        let s: Strategy = serde_yaml::from_str("wall-follow").unwrap();
        assert_eq!(s, Strategy::WallFollow);
    }
}
