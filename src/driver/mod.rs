//! Actuator/sensor driver interface
//!
//! The controller never talks to hardware directly. Everything it needs
//! from the robot goes through the [`RobotDriver`] trait, so the real
//! transport, the in-process simulator, and test stubs are
//! interchangeable.

pub mod sim;

pub use sim::SimDriver;

/// Front-left contact switch
pub const BUMPER_FRONT_LEFT: usize = 0;
/// Front-right contact switch
pub const BUMPER_FRONT_RIGHT: usize = 1;
/// Rear-left contact switch
pub const BUMPER_REAR_LEFT: usize = 2;
/// Rear-right contact switch
pub const BUMPER_REAR_RIGHT: usize = 3;

/// Number of bumper switches on the chassis
pub const BUMPER_COUNT: usize = 4;

/// Minimal contract of the robot's actuators and sensors
///
/// Commands are "set and move on": `set_velocity` and `rotate` return as
/// soon as the command is issued, and the caller is responsible for the
/// settle pauses that let motion complete. All calls block the single
/// control thread; there is no concurrency at this layer.
#[cfg_attr(test, mockall::automock)]
pub trait RobotDriver {
    /// Establish the connection; false means the robot is unreachable
    fn connect(&mut self) -> bool;

    /// Release the connection
    fn disconnect(&mut self);

    /// Raw range reading of one sonar channel; larger means more clearance
    fn get_sonar(&mut self, channel: usize) -> f64;

    /// State of one bumper switch, true while touching an obstacle
    fn get_bumper(&mut self, index: usize) -> bool;

    /// Robot heading in degrees, arbitrary zero, not pre-normalized
    fn get_theta(&mut self) -> f64;

    /// Command a linear velocity; negative values drive backward
    fn set_velocity(&mut self, velocity: f64);

    /// Halt linear motion
    fn stop(&mut self);

    /// Command a relative rotation in degrees
    fn rotate(&mut self, delta_degrees: f64);

    /// Blocking real-time delay
    fn sleep_ms(&mut self, ms: u64);
}
