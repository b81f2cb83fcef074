//! Integration tests for the reactive control loop.

mod common;

use common::{Command, ScriptedDriver};
use wanderbot::driver::SimDriver;
use wanderbot::{Navigator, RobotDriver, Turn, WanderConfig};

/// Simulator-profile channel indices
const FRONT: usize = 3;
const LEFT: usize = 0;
const RIGHT: usize = 6;

#[test]
fn dead_end_emits_exactly_one_180_rotation() {
    let config = WanderConfig::simulator();
    let driver = ScriptedDriver::new()
        .with_sonar(FRONT, 0.1)
        .with_sonar(LEFT, 0.1)
        .with_sonar(RIGHT, 0.1);

    let mut navigator = Navigator::new(driver, &config);
    let turn = navigator.run_cycle();

    assert_eq!(turn, Turn::Around);
    assert_eq!(navigator.into_driver().rotations(), vec![180.0]);
}

#[test]
fn open_corridor_goes_straight_without_rotating() {
    let config = WanderConfig::simulator();
    let driver = ScriptedDriver::new()
        .with_sonar(FRONT, 1.5)
        .with_sonar(LEFT, 0.1)
        .with_sonar(RIGHT, 0.1);

    let mut navigator = Navigator::new(driver, &config);
    let turn = navigator.run_cycle();
    assert_eq!(turn, Turn::Straight);

    let driver = navigator.into_driver();
    assert!(driver.rotations().is_empty());

    // The cycle still settles and takes its forward step
    assert_eq!(
        driver.commands,
        vec![
            Command::Sleep(2000),
            Command::SetVelocity(1.0),
            Command::Sleep(1000),
            Command::Stop,
            Command::Sleep(2000),
        ]
    );
}

#[test]
fn single_free_side_turns_toward_it() {
    let config = WanderConfig::simulator();
    // Only the left is free
    let driver = ScriptedDriver::new()
        .with_sonar(FRONT, 0.1)
        .with_sonar(LEFT, 1.5)
        .with_sonar(RIGHT, 0.1);

    let mut navigator = Navigator::new(driver, &config);
    assert_eq!(navigator.run_cycle(), Turn::Left);
    assert_eq!(navigator.into_driver().rotations(), vec![-90.0]);
}

#[test]
fn seeded_runs_make_identical_decision_sequences() {
    let mut config = WanderConfig::simulator();
    config.rng_seed = 99;

    let free = || ScriptedDriver::new().with_sonar(FRONT, 1.5).with_sonar(LEFT, 1.5).with_sonar(RIGHT, 1.5);

    let mut a = Navigator::new(free(), &config);
    let mut b = Navigator::new(free(), &config);
    for _ in 0..10 {
        assert_eq!(a.run_cycle(), b.run_cycle());
    }
}

#[test]
fn closed_loop_in_the_simulator_stays_inside_the_room() {
    let mut config = WanderConfig::simulator();
    config.rng_seed = 11;
    config.settle_ms = 50; // keep the simulated clock small

    // Imprecise actuator, so the correction loop does real work
    let mut driver = SimDriver::room(2.0, 2.0, 11).with_rotation_bias(6.0);
    assert!(driver.connect());

    let mut navigator = Navigator::new(driver, &config);
    navigator.run(Some(8));
    assert_eq!(navigator.cycles_run(), 8);

    let driver = navigator.into_driver();
    let (x, y) = driver.position();
    assert!(x > 0.0 && x < 2.0, "x = {}", x);
    assert!(y > 0.0 && y < 2.0, "y = {}", y);
}

#[test]
fn refused_connection_is_reported() {
    let mut driver = SimDriver::room(2.0, 2.0, 1).refusing_connection();
    assert!(!driver.connect());
}
