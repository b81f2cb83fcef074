//! Closed-loop rotation with drift correction
//!
//! Rotation commands are imprecise: the achieved angle can miss the
//! commanded one by several degrees. The controller reads the heading
//! back after every command and keeps issuing corrective rotations until
//! the achieved delta is inside the tolerance band, up to a configured
//! attempt cap. Bumpers are monitored between corrections so a rotation
//! against an obstacle turns into a small escape step instead of grinding
//! against the wall.

use log::{debug, warn};

use super::{normalize_angle, MotionPrimitives};
use crate::driver::{
    RobotDriver, BUMPER_FRONT_LEFT, BUMPER_FRONT_RIGHT, BUMPER_REAR_LEFT, BUMPER_REAR_RIGHT,
};
use crate::WanderConfig;

/// Result of a closed-loop rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationOutcome {
    /// Achieved delta is within tolerance of the target
    Converged {
        /// Corrective rotations that were needed after the initial command
        attempts: u32,
    },
    /// The attempt cap was reached before convergence
    GaveUp {
        /// Corrective rotations issued before giving up
        attempts: u32,
        /// Remaining angular error in degrees, normalized
        residual: f64,
    },
}

impl RotationOutcome {
    /// True when the rotation landed inside the tolerance band
    pub fn converged(&self) -> bool {
        matches!(self, RotationOutcome::Converged { .. })
    }
}

/// Issues a rotation and iteratively corrects the residual error
#[derive(Debug, Clone)]
pub struct HeadingController {
    tolerance: f64,
    settle_ms: u64,
    max_attempts: u32,
}

impl HeadingController {
    /// Create a controller from the active configuration
    pub fn new(config: &WanderConfig) -> Self {
        HeadingController {
            tolerance: config.rotation_tolerance,
            settle_ms: config.settle_ms,
            max_attempts: config.max_correction_attempts,
        }
    }

    /// Normalized current heading
    pub fn heading<D: RobotDriver>(&self, driver: &mut D) -> f64 {
        normalize_angle(driver.get_theta())
    }

    /// Rotate by `target` degrees, correcting until the achieved delta is
    /// within tolerance or the attempt cap is hit
    pub fn rotate<D: RobotDriver>(
        &self,
        driver: &mut D,
        motion: &MotionPrimitives,
        target: f64,
    ) -> RotationOutcome {
        let start = self.heading(driver);

        driver.rotate(target);
        driver.sleep_ms(self.settle_ms);

        let mut achieved = normalize_angle(start - self.heading(driver));
        let mut attempts = 0;

        while achieved > target + self.tolerance || achieved < target - self.tolerance {
            if attempts >= self.max_attempts {
                let residual = normalize_angle(target - achieved);
                warn!(
                    "rotation to {:.1} gave up after {} corrections, {:.1} degrees short",
                    target, attempts, residual
                );
                return RotationOutcome::GaveUp { attempts, residual };
            }

            // A blocked chassis cannot rotate; nudge it off the obstacle
            // before the next correction
            if driver.get_bumper(BUMPER_FRONT_LEFT) || driver.get_bumper(BUMPER_FRONT_RIGHT) {
                warn!("front bumper contact during rotation, backing off");
                motion.back_step(driver);
            }
            if driver.get_bumper(BUMPER_REAR_LEFT) || driver.get_bumper(BUMPER_REAR_RIGHT) {
                warn!("rear bumper contact during rotation, nudging forward");
                motion.half_step(driver);
            }

            let correction = normalize_angle(target - achieved);
            debug!(
                "rotation correction {}: achieved {:.1}, issuing {:.1}",
                attempts + 1,
                achieved,
                correction
            );
            driver.rotate(correction);
            driver.sleep_ms(self.settle_ms);

            achieved = normalize_angle(start - self.heading(driver));
            attempts += 1;
        }

        debug!(
            "rotation to {:.1} converged after {} corrections",
            target, attempts
        );
        RotationOutcome::Converged { attempts }
    }
}
