//! Calibration-based right-hand wall following
//!
//! The alternate strategy: keep a wall on the right-hand side and follow
//! it. A startup calibration empirically measures how long one step takes
//! by timing the closure of the front sonar distance at step velocity,
//! instead of trusting a fixed duration. Drive legs poll the sonars while
//! moving and stop on a front wall, on a right-side event, or when the
//! poll budget runs out.

use log::{debug, info, warn};

use crate::driver::RobotDriver;
use crate::motion::{HeadingController, MotionPrimitives};
use crate::{WanderConfig, WanderError};

/// Delay between sonar polls while driving, in milliseconds
const POLL_MS: u64 = 10;

/// What the right-hand sonar is watched for during a drive leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RightWatch {
    /// A sustained wall appearing on the right
    Wall,
    /// A sustained gap opening on the right
    Gap,
}

/// Why a drive leg ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriveStop {
    /// A wall came within threshold ahead
    FrontWall,
    /// The watched right-side event fired
    RightEvent,
    /// The poll budget ran out before anything happened
    PollBudget,
}

/// Right-hand wall follower over an owned driver
pub struct WallFollower<D: RobotDriver> {
    driver: D,
    config: WanderConfig,
    motion: MotionPrimitives,
    heading: HeadingController,
    /// Calibrated duration of one step, in milliseconds
    step_ms: u64,
}

impl<D: RobotDriver> WallFollower<D> {
    /// Build the follower around a connected driver
    pub fn new(driver: D, config: &WanderConfig) -> Self {
        WallFollower {
            driver,
            config: config.clone(),
            motion: MotionPrimitives::new(config),
            heading: HeadingController::new(config),
            step_ms: config.step_ms,
        }
    }

    /// Measure how long one step of `step_distance` takes at step velocity
    ///
    /// Turns left up to four times looking for a facing wall that is
    /// neither too close nor out of sonar range, then times the closure of
    /// the front distance while driving at it, and backs up to where it
    /// started. Fails when no usable wall faces the robot in any of the
    /// four directions.
    pub fn calibrate(&mut self) -> Result<u64, WanderError> {
        let front = self.config.sonar.front;
        let near = 2.0 * self.config.step_distance;

        let mut found = false;
        for _ in 0..4 {
            let d = self.driver.get_sonar(front);
            if d <= near || d >= self.config.range_max {
                self.heading.rotate(&mut self.driver, &self.motion, -90.0);
                continue;
            }
            found = true;
            break;
        }
        if !found {
            return Err(WanderError::CalibrationFailed(
                "no usable wall within sonar range in any direction".into(),
            ));
        }

        let d0 = self.driver.get_sonar(front);
        let target = d0 - self.config.step_distance;

        self.driver.set_velocity(self.config.step_velocity);
        let mut polls: u32 = 0;
        while self.driver.get_sonar(front) > target {
            if polls >= self.config.max_drive_polls {
                self.driver.stop();
                self.driver.sleep_ms(self.config.settle_ms);
                return Err(WanderError::CalibrationFailed(format!(
                    "front distance never closed by {:.3}",
                    self.config.step_distance
                )));
            }
            self.driver.sleep_ms(POLL_MS);
            polls += 1;
        }
        self.driver.stop();
        self.driver.sleep_ms(self.config.settle_ms);

        let dt = u64::from(polls) * POLL_MS;

        // Return to the starting position
        self.driver.set_velocity(-self.config.step_velocity);
        self.driver.sleep_ms(dt);
        self.driver.stop();
        self.driver.sleep_ms(self.config.settle_ms);

        info!("calibrated step duration: {} ms", dt);
        self.step_ms = dt.max(POLL_MS);
        Ok(self.step_ms)
    }

    /// Single-reading front clearance check
    fn front_clear(&mut self) -> bool {
        self.driver.get_sonar(self.config.sonar.front) > self.config.obstacle_threshold
    }

    /// Sustained wall on the right: every one of `sonar_samples`
    /// consecutive readings within threshold
    fn wall_on_right(&mut self) -> bool {
        for _ in 0..self.config.sonar_samples {
            if self.driver.get_sonar(self.config.sonar.right) > self.config.obstacle_threshold {
                return false;
            }
            self.driver.sleep_ms(POLL_MS);
        }
        true
    }

    /// Sustained gap on the right: every consecutive reading beyond
    /// threshold
    fn gap_on_right(&mut self) -> bool {
        for _ in 0..self.config.sonar_samples {
            if self.driver.get_sonar(self.config.sonar.right) <= self.config.obstacle_threshold {
                return false;
            }
        }
        true
    }

    /// Drive forward until a front wall, the watched right-side event, or
    /// the poll budget
    fn drive_until(&mut self, watch: RightWatch) -> DriveStop {
        if !self.front_clear() {
            return DriveStop::FrontWall;
        }

        self.driver.set_velocity(self.config.step_velocity);
        let mut polls: u32 = 0;
        while self.front_clear() {
            let event = match watch {
                RightWatch::Wall => self.wall_on_right(),
                RightWatch::Gap => self.gap_on_right(),
            };
            if event {
                self.driver.stop();
                self.driver.sleep_ms(self.config.settle_ms);
                return DriveStop::RightEvent;
            }
            if polls >= self.config.max_drive_polls {
                self.driver.stop();
                self.driver.sleep_ms(self.config.settle_ms);
                warn!("drive leg exhausted its poll budget");
                return DriveStop::PollBudget;
            }
            self.driver.sleep_ms(POLL_MS);
            polls += 1;
        }

        self.driver.stop();
        self.driver.sleep_ms(self.config.settle_ms);
        DriveStop::FrontWall
    }

    /// Acquire a wall on the right-hand side
    fn find_wall(&mut self) {
        if self.wall_on_right() {
            return;
        }
        debug!("no wall on the right, searching");
        if self.drive_until(RightWatch::Wall) == DriveStop::FrontWall {
            // A wall ahead becomes the wall on the right after a left turn
            self.heading.rotate(&mut self.driver, &self.motion, -90.0);
        }
    }

    /// Cross a gap in the followed wall and reacquire it
    ///
    /// Sizes the crossing step from the northeast sonar: the further the
    /// far edge, the longer the step.
    fn clear_path(&mut self) {
        self.heading.rotate(&mut self.driver, &self.motion, 90.0);
        let d = self.driver.get_sonar(self.config.sonar.northeast);
        self.heading.rotate(&mut self.driver, &self.motion, -90.0);

        let duration = (self.step_ms as f64 * d / self.config.step_distance) as u64;
        debug!("crossing gap, {} ms step", duration);
        self.motion.step_for(&mut self.driver, duration);

        self.heading.rotate(&mut self.driver, &self.motion, 90.0);
    }

    /// Follow the right-hand wall, forever or for `legs` drive legs
    pub fn follow(&mut self, legs: Option<u64>) {
        info!("starting right-hand wall following");
        let mut completed: u64 = 0;
        loop {
            if let Some(limit) = legs {
                if completed >= limit {
                    info!("leg limit {} reached", limit);
                    return;
                }
            }

            self.find_wall();

            match self.drive_until(RightWatch::Gap) {
                DriveStop::FrontWall => {
                    debug!("wall ahead, turning left");
                    self.heading.rotate(&mut self.driver, &self.motion, -90.0);
                }
                DriveStop::RightEvent => {
                    debug!("gap on the right, crossing");
                    self.clear_path();
                }
                DriveStop::PollBudget => {}
            }
            completed += 1;
        }
    }

    /// Calibrate if possible, then follow
    ///
    /// A failed calibration falls back to the configured fixed step
    /// duration rather than aborting the run.
    pub fn run(&mut self, legs: Option<u64>) {
        match self.calibrate() {
            Ok(dt) => info!("using calibrated step of {} ms", dt),
            Err(e) => {
                warn!("{}, falling back to {} ms steps", e, self.config.step_ms);
                self.step_ms = self.config.step_ms;
            }
        }
        self.follow(legs);
    }

    /// Give the driver back, e.g. to disconnect it
    pub fn into_driver(self) -> D {
        self.driver
    }
}
