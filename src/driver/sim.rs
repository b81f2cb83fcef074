//! In-process room simulator
//!
//! A small kinematic simulation of a differential-drive robot in a
//! rectangular room with optional interior walls. Motion is integrated
//! inside `sleep_ms`, sonar readings are ray-casts against the wall
//! segments, and wall contact raises the corresponding bumper switches.
//! With a nonzero rotation bias the simulated actuator over- or
//! under-rotates by a seeded random amount, which is what the heading
//! correction loop exists to fix.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{RobotDriver, BUMPER_COUNT};

/// Integration tick for motion during `sleep_ms`
const TICK_MS: u64 = 5;

/// Distance covered per second at unit velocity
const SPEED_SCALE: f64 = 0.125;

/// Axis-aligned wall segment in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct Wall {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Wall {
    /// Closest point on the segment to `(px, py)`
    fn closest_point(&self, px: f64, py: f64) -> (f64, f64) {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return (self.x1, self.y1);
        }
        let t = (((px - self.x1) * dx + (py - self.y1) * dy) / len_sq).clamp(0.0, 1.0);
        (self.x1 + t * dx, self.y1 + t * dy)
    }

    /// Ray intersection distance, if the ray from `(px, py)` along
    /// `(dirx, diry)` hits this segment
    fn raycast(&self, px: f64, py: f64, dirx: f64, diry: f64) -> Option<f64> {
        if (self.x1 - self.x2).abs() < f64::EPSILON {
            // Vertical wall
            if dirx.abs() < f64::EPSILON {
                return None;
            }
            let t = (self.x1 - px) / dirx;
            if t <= 1e-9 {
                return None;
            }
            let y_hit = py + t * diry;
            let (lo, hi) = (self.y1.min(self.y2), self.y1.max(self.y2));
            (y_hit >= lo && y_hit <= hi).then_some(t)
        } else {
            // Horizontal wall
            if diry.abs() < f64::EPSILON {
                return None;
            }
            let t = (self.y1 - py) / diry;
            if t <= 1e-9 {
                return None;
            }
            let x_hit = px + t * dirx;
            let (lo, hi) = (self.x1.min(self.x2), self.x1.max(self.x2));
            (x_hit >= lo && x_hit <= hi).then_some(t)
        }
    }
}

/// Simulated robot driver in a walled room
pub struct SimDriver {
    x: f64,
    y: f64,
    /// Heading in degrees, counterclockwise positive, never normalized
    theta: f64,
    velocity: f64,
    connected: bool,
    refuse_connection: bool,
    bumpers: [bool; BUMPER_COUNT],
    walls: Vec<Wall>,
    range_max: f64,
    robot_radius: f64,
    rotation_bias: f64,
    rng: SmallRng,
    clock_ms: u64,
}

impl SimDriver {
    /// Create a rectangular room of the given size with the robot at its
    /// center, facing along +X
    ///
    /// Seed 0 draws from entropy; any other value gives a reproducible
    /// actuator error sequence.
    pub fn room(width: f64, height: f64, seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        SimDriver {
            x: width / 2.0,
            y: height / 2.0,
            theta: 0.0,
            velocity: 0.0,
            connected: false,
            refuse_connection: false,
            bumpers: [false; BUMPER_COUNT],
            walls: vec![
                Wall { x1: 0.0, y1: 0.0, x2: width, y2: 0.0 },
                Wall { x1: 0.0, y1: height, x2: width, y2: height },
                Wall { x1: 0.0, y1: 0.0, x2: 0.0, y2: height },
                Wall { x1: width, y1: 0.0, x2: width, y2: height },
            ],
            range_max: 2.0,
            robot_radius: 0.05,
            rotation_bias: 0.0,
            rng,
            clock_ms: 0,
        }
    }

    /// Add an interior axis-aligned wall segment
    pub fn with_wall(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.walls.push(Wall { x1, y1, x2, y2 });
        self
    }

    /// Override the robot pose
    pub fn place(mut self, x: f64, y: f64, theta: f64) -> Self {
        self.x = x;
        self.y = y;
        self.theta = theta;
        self
    }

    /// Maximum actuator error per rotation command, in degrees
    pub fn with_rotation_bias(mut self, bias: f64) -> Self {
        self.rotation_bias = bias;
        self
    }

    /// Sonar range cap
    pub fn with_range_max(mut self, range_max: f64) -> Self {
        self.range_max = range_max;
        self
    }

    /// Make `connect` fail
    pub fn refusing_connection(mut self) -> Self {
        self.refuse_connection = true;
        self
    }

    /// Simulated time elapsed since construction
    pub fn elapsed_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Current world position (for assertions in tests)
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Direction of travel for a sonar channel, relative to the heading
    ///
    /// Channel layout matches the standard mounting: 0 left, 3 front,
    /// 4 northeast, 6 right.
    fn channel_offset(channel: usize) -> Option<f64> {
        match channel {
            0 => Some(90.0),
            3 => Some(0.0),
            4 => Some(-45.0),
            6 => Some(-90.0),
            _ => None,
        }
    }

    fn raycast(&self, offset_deg: f64) -> f64 {
        let angle = (self.theta + offset_deg).to_radians();
        let (dirx, diry) = (angle.cos(), angle.sin());
        let mut dist = self.range_max;
        for wall in &self.walls {
            if let Some(t) = wall.raycast(self.x, self.y, dirx, diry) {
                dist = dist.min(t);
            }
        }
        dist
    }

    /// Advance one integration tick; returns true if the robot moved
    fn tick(&mut self) -> bool {
        if self.velocity.abs() < f64::EPSILON {
            return false;
        }
        let angle = self.theta.to_radians();
        let ds = self.velocity * SPEED_SCALE * (TICK_MS as f64 / 1000.0);
        let nx = self.x + angle.cos() * ds;
        let ny = self.y + angle.sin() * ds;

        for i in 0..self.walls.len() {
            let wall = self.walls[i];
            let (px, py) = wall.closest_point(nx, ny);
            let dx = px - nx;
            let dy = py - ny;
            if (dx * dx + dy * dy).sqrt() < self.robot_radius {
                self.touch(wall, nx, ny);
                return false;
            }
        }

        self.x = nx;
        self.y = ny;
        self.bumpers = [false; BUMPER_COUNT];
        true
    }

    /// Raise the bumpers matching the side of contact
    fn touch(&mut self, wall: Wall, nx: f64, ny: f64) {
        let angle = self.theta.to_radians();
        let (dirx, diry) = (angle.cos(), angle.sin());
        let (px, py) = wall.closest_point(nx, ny);
        let cross = dirx * (py - self.y) - diry * (px - self.x);

        // Contact is on the leading side of travel
        let (left, right) = if self.velocity >= 0.0 {
            (super::BUMPER_FRONT_LEFT, super::BUMPER_FRONT_RIGHT)
        } else {
            (super::BUMPER_REAR_RIGHT, super::BUMPER_REAR_LEFT)
        };

        if cross > 0.01 {
            self.bumpers[left] = true;
        } else if cross < -0.01 {
            self.bumpers[right] = true;
        } else {
            self.bumpers[left] = true;
            self.bumpers[right] = true;
        }
    }
}

impl RobotDriver for SimDriver {
    fn connect(&mut self) -> bool {
        if self.refuse_connection {
            return false;
        }
        self.connected = true;
        true
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn get_sonar(&mut self, channel: usize) -> f64 {
        match Self::channel_offset(channel) {
            Some(offset) => self.raycast(offset),
            None => self.range_max,
        }
    }

    fn get_bumper(&mut self, index: usize) -> bool {
        self.bumpers.get(index).copied().unwrap_or(false)
    }

    fn get_theta(&mut self) -> f64 {
        self.theta
    }

    fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    fn stop(&mut self) {
        self.velocity = 0.0;
    }

    fn rotate(&mut self, delta_degrees: f64) {
        let error = if self.rotation_bias > 0.0 {
            self.rng.gen_range(-self.rotation_bias..=self.rotation_bias)
        } else {
            0.0
        };
        // get_theta decreases by the achieved rotation, so a positive
        // command shows up as a positive delta at the controller
        self.theta -= delta_degrees + error;
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.clock_ms += ms;
        let ticks = ms / TICK_MS;
        for _ in 0..ticks {
            self.tick();
        }
    }
}
