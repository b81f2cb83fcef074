//! Shared scripted driver stub for integration tests.
//!
//! Records every actuator command in order so tests can assert exact
//! command traces. The heading responds perfectly to rotation commands;
//! sonar channels return scripted constants.

use std::collections::HashMap;

use wanderbot::RobotDriver;

/// One recorded actuator command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetVelocity(f64),
    Stop,
    Rotate(f64),
    Sleep(u64),
}

/// Driver stub with scripted sensors and a perfect rotation actuator
pub struct ScriptedDriver {
    sonar: HashMap<usize, f64>,
    default_sonar: f64,
    pub bumpers: [bool; 4],
    theta: f64,
    pub commands: Vec<Command>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        ScriptedDriver {
            sonar: HashMap::new(),
            default_sonar: 2.0,
            bumpers: [false; 4],
            theta: 0.0,
            commands: Vec::new(),
        }
    }

    /// Fix the reading of one sonar channel
    pub fn with_sonar(mut self, channel: usize, reading: f64) -> Self {
        self.sonar.insert(channel, reading);
        self
    }

    /// Press one bumper
    pub fn with_bumper(mut self, index: usize) -> Self {
        self.bumpers[index] = true;
        self
    }

    /// All recorded rotation commands, in order
    pub fn rotations(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Rotate(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl RobotDriver for ScriptedDriver {
    fn connect(&mut self) -> bool {
        true
    }

    fn disconnect(&mut self) {}

    fn get_sonar(&mut self, channel: usize) -> f64 {
        self.sonar.get(&channel).copied().unwrap_or(self.default_sonar)
    }

    fn get_bumper(&mut self, index: usize) -> bool {
        self.bumpers[index]
    }

    fn get_theta(&mut self) -> f64 {
        self.theta
    }

    fn set_velocity(&mut self, velocity: f64) {
        self.commands.push(Command::SetVelocity(velocity));
    }

    fn stop(&mut self) {
        self.commands.push(Command::Stop);
    }

    fn rotate(&mut self, delta_degrees: f64) {
        self.commands.push(Command::Rotate(delta_degrees));
        self.theta -= delta_degrees;
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.commands.push(Command::Sleep(ms));
    }
}
