//! Motion primitives and angle arithmetic
//!
//! All movement is built from three fixed-duration shapes: a forward
//! step, a half-length forward step, and a backward step. Each one is
//! "set velocity, hold, stop, settle" - sonar and bumper readings taken
//! while the chassis is still moving are unreliable, so every primitive
//! ends with a settle pause that lets residual momentum dissipate.

mod heading;

pub use heading::{HeadingController, RotationOutcome};

use log::debug;

use crate::driver::RobotDriver;
use crate::WanderConfig;

/// Map an angle into the (-180, 180] degree range
///
/// This is the single source of truth for angle comparisons: every
/// heading and every rotation delta in the controller goes through it
/// before being compared to anything else. Idempotent for any input.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a > 180.0 {
        a -= 360.0;
    }
    while a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Fixed-duration, fixed-velocity motion shapes
#[derive(Debug, Clone)]
pub struct MotionPrimitives {
    velocity: f64,
    step_ms: u64,
    settle_ms: u64,
}

impl MotionPrimitives {
    /// Create the primitives from the active configuration
    pub fn new(config: &WanderConfig) -> Self {
        MotionPrimitives {
            velocity: config.step_velocity,
            step_ms: config.step_ms,
            settle_ms: config.settle_ms,
        }
    }

    /// One forward step
    pub fn step<D: RobotDriver>(&self, driver: &mut D) {
        debug!("step forward {} ms", self.step_ms);
        self.timed_move(driver, self.velocity, self.step_ms);
    }

    /// Half-length forward step
    pub fn half_step<D: RobotDriver>(&self, driver: &mut D) {
        debug!("half step forward {} ms", self.step_ms / 2);
        self.timed_move(driver, self.velocity, self.step_ms / 2);
    }

    /// One backward step
    pub fn back_step<D: RobotDriver>(&self, driver: &mut D) {
        debug!("step backward {} ms", self.step_ms);
        self.timed_move(driver, -self.velocity, self.step_ms);
    }

    /// Forward step of an explicit duration (used by the wall-follow
    /// strategy after calibration)
    pub fn step_for<D: RobotDriver>(&self, driver: &mut D, duration_ms: u64) {
        debug!("step forward {} ms (explicit)", duration_ms);
        self.timed_move(driver, self.velocity, duration_ms);
    }

    fn timed_move<D: RobotDriver>(&self, driver: &mut D, velocity: f64, duration_ms: u64) {
        driver.set_velocity(velocity);
        driver.sleep_ms(duration_ms);
        driver.stop();
        driver.sleep_ms(self.settle_ms);
    }
}
