//! Bumper-triggered recovery maneuver
//!
//! Runs once per control-loop iteration, after the forward step. A front
//! contact means the sonar classification missed something; the robot
//! halts, backs off one step, and - when exactly one front bumper fired -
//! displaces itself laterally away from the touched side before the next
//! decision. A simultaneous press of both front bumpers is a head-on
//! collision with no preferable side, so only the backward recovery runs.

use log::{debug, warn};

use crate::driver::{
    RobotDriver, BUMPER_FRONT_LEFT, BUMPER_FRONT_RIGHT, BUMPER_REAR_LEFT, BUMPER_REAR_RIGHT,
};
use crate::motion::{HeadingController, MotionPrimitives};
use crate::WanderConfig;

/// Post-step contact check and escape maneuver
#[derive(Debug, Clone)]
pub struct BumperRecovery {
    settle_ms: u64,
}

impl BumperRecovery {
    /// Create a recovery handler from the active configuration
    pub fn new(config: &WanderConfig) -> Self {
        BumperRecovery {
            settle_ms: config.settle_ms,
        }
    }

    /// Read all four bumpers and recover from any front contact
    ///
    /// Returns true if a recovery maneuver ran.
    pub fn check_bumpers<D: RobotDriver>(
        &self,
        driver: &mut D,
        motion: &MotionPrimitives,
        heading: &HeadingController,
    ) -> bool {
        let front_left = driver.get_bumper(BUMPER_FRONT_LEFT);
        let front_right = driver.get_bumper(BUMPER_FRONT_RIGHT);
        let rear_left = driver.get_bumper(BUMPER_REAR_LEFT);
        let rear_right = driver.get_bumper(BUMPER_REAR_RIGHT);

        if rear_left || rear_right {
            debug!("rear bumper contact noted (no recovery at this point)");
        }
        if !front_left && !front_right {
            return false;
        }

        warn!(
            "front bumper contact (left: {}, right: {}), recovering",
            front_left, front_right
        );
        driver.stop();
        driver.sleep_ms(self.settle_ms);
        motion.back_step(driver);

        if front_left != front_right {
            // Obstacle on one side only: rotate toward the open side,
            // advance half a step, rotate back onto the original heading
            let away = if front_left { 90.0 } else { -90.0 };
            debug!("lateral displacement, rotating {:.0}", away);
            heading.rotate(driver, motion, away);
            motion.half_step(driver);
            heading.rotate(driver, motion, -away);
        }

        true
    }
}
