//! Command-trace tests for the bumper recovery maneuver.

mod common;

use common::{Command, ScriptedDriver};
use wanderbot::{BumperRecovery, HeadingController, MotionPrimitives, WanderConfig};

const FRONT_LEFT: usize = 0;
const FRONT_RIGHT: usize = 1;

fn handlers() -> (BumperRecovery, MotionPrimitives, HeadingController) {
    let config = WanderConfig::simulator();
    (
        BumperRecovery::new(&config),
        MotionPrimitives::new(&config),
        HeadingController::new(&config),
    )
}

#[test]
fn left_bumper_press_backs_off_and_displaces_right() {
    let (recovery, motion, heading) = handlers();
    let mut driver = ScriptedDriver::new().with_bumper(FRONT_LEFT);

    assert!(recovery.check_bumpers(&mut driver, &motion, &heading));

    // Simulator profile: WAIT 2000, DT_STEP 1000, VEL 1.0
    assert_eq!(
        driver.commands,
        vec![
            // halt and settle
            Command::Stop,
            Command::Sleep(2000),
            // back step
            Command::SetVelocity(-1.0),
            Command::Sleep(1000),
            Command::Stop,
            Command::Sleep(2000),
            // rotate toward the open (right) side
            Command::Rotate(90.0),
            Command::Sleep(2000),
            // half step
            Command::SetVelocity(1.0),
            Command::Sleep(500),
            Command::Stop,
            Command::Sleep(2000),
            // rotate back onto the original heading
            Command::Rotate(-90.0),
            Command::Sleep(2000),
        ]
    );
}

#[test]
fn right_bumper_press_displaces_left() {
    let (recovery, motion, heading) = handlers();
    let mut driver = ScriptedDriver::new().with_bumper(FRONT_RIGHT);

    assert!(recovery.check_bumpers(&mut driver, &motion, &heading));
    assert_eq!(driver.rotations(), vec![-90.0, 90.0]);
}

#[test]
fn head_on_collision_only_backs_off() {
    let (recovery, motion, heading) = handlers();
    let mut driver = ScriptedDriver::new()
        .with_bumper(FRONT_LEFT)
        .with_bumper(FRONT_RIGHT);

    assert!(recovery.check_bumpers(&mut driver, &motion, &heading));

    // Backward recovery only, no lateral displacement
    assert_eq!(
        driver.commands,
        vec![
            Command::Stop,
            Command::Sleep(2000),
            Command::SetVelocity(-1.0),
            Command::Sleep(1000),
            Command::Stop,
            Command::Sleep(2000),
        ]
    );
    assert!(driver.rotations().is_empty());
}

#[test]
fn no_contact_means_no_commands() {
    let (recovery, motion, heading) = handlers();
    let mut driver = ScriptedDriver::new();

    assert!(!recovery.check_bumpers(&mut driver, &motion, &heading));
    assert!(driver.commands.is_empty());
}
