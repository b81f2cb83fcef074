//! Main control loop
//!
//! One steady-state cycle with no terminal state:
//! decide -> settle -> step forward -> check bumpers -> repeat.
//! Single-threaded and fully blocking; the driver handle is exclusively
//! owned for the lifetime of the loop.

use log::{info, warn};

use super::decision::{PathDecisionEngine, Turn};
use super::recovery::BumperRecovery;
use crate::driver::RobotDriver;
use crate::motion::{HeadingController, MotionPrimitives, RotationOutcome};
use crate::sensing::ObstacleClassifier;
use crate::WanderConfig;

/// Reactive navigation loop over an owned driver
pub struct Navigator<D: RobotDriver> {
    driver: D,
    settle_ms: u64,
    classifier: ObstacleClassifier,
    decision: PathDecisionEngine,
    motion: MotionPrimitives,
    heading: HeadingController,
    recovery: BumperRecovery,
    cycles_run: u64,
}

impl<D: RobotDriver> Navigator<D> {
    /// Build the full controller stack around a connected driver
    pub fn new(driver: D, config: &WanderConfig) -> Self {
        Navigator {
            driver,
            settle_ms: config.settle_ms,
            classifier: ObstacleClassifier::new(config),
            decision: PathDecisionEngine::new(config.rng_seed),
            motion: MotionPrimitives::new(config),
            heading: HeadingController::new(config),
            recovery: BumperRecovery::new(config),
            cycles_run: 0,
        }
    }

    /// One full control cycle: classify, decide, turn, step, recover
    pub fn run_cycle(&mut self) -> Turn {
        let map = self.classifier.classify(&mut self.driver);
        let turn = self.decision.decide(&map);
        info!("cycle {}: map {:?}, turn {:?}", self.cycles_run, map, turn);

        if let Some(delta) = turn.delta() {
            if let RotationOutcome::GaveUp { residual, .. } =
                self.heading.rotate(&mut self.driver, &self.motion, delta)
            {
                warn!(
                    "turn did not converge, continuing {:.1} degrees off course",
                    residual
                );
            }
        }

        self.driver.sleep_ms(self.settle_ms);
        self.motion.step(&mut self.driver);
        self.recovery
            .check_bumpers(&mut self.driver, &self.motion, &self.heading);

        self.cycles_run += 1;
        turn
    }

    /// Run the loop forever, or for `cycles` iterations when given
    pub fn run(&mut self, cycles: Option<u64>) {
        info!("starting reactive navigation");
        loop {
            if let Some(limit) = cycles {
                if self.cycles_run >= limit {
                    info!("cycle limit {} reached", limit);
                    return;
                }
            }
            self.run_cycle();
        }
    }

    /// Number of cycles completed so far
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    /// Give the driver back, e.g. to disconnect it
    pub fn into_driver(self) -> D {
        self.driver
    }
}
