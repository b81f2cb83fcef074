//! Reactive path-decision policy
//!
//! A memoryless priority table over the eight blocked/free combinations
//! of {front, left, right}. It has no notion of explored territory and
//! can revisit cells or oscillate; that is an accepted property of a
//! purely reactive controller, not a bug.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::sensing::ObstacleMap;

/// Heading change selected for the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Keep the current heading
    Straight,
    /// Rotate -90 degrees
    Left,
    /// Rotate +90 degrees
    Right,
    /// Rotate 180 degrees (dead end)
    Around,
}

impl Turn {
    /// Rotation delta in degrees, or `None` for straight ahead
    pub fn delta(self) -> Option<f64> {
        match self {
            Turn::Straight => None,
            Turn::Left => Some(-90.0),
            Turn::Right => Some(90.0),
            Turn::Around => Some(180.0),
        }
    }
}

/// Chooses a turn from a fresh obstacle map
///
/// Random tie-breaks come from an owned, seedable generator so decision
/// sequences are reproducible under test.
#[derive(Debug)]
pub struct PathDecisionEngine {
    rng: SmallRng,
}

impl PathDecisionEngine {
    /// Create an engine; seed 0 draws from entropy, any other value gives
    /// a reproducible decision sequence
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        PathDecisionEngine { rng }
    }

    /// Select a turn for the given obstacle map
    pub fn decide(&mut self, map: &ObstacleMap) -> Turn {
        let turn = decide_with(map, &mut self.rng);
        debug!("decision for {:?}: {:?}", map, turn);
        turn
    }
}

/// The priority table itself, total over all eight combinations
///
/// First match wins:
/// 1. all blocked            -> turn around
/// 2. only front free        -> straight
/// 3. only left free         -> left
/// 4. only right free        -> right
/// 5. front and left free    -> straight or left, uniformly
/// 6. front and right free   -> straight or right, uniformly
/// 7. both sides free        -> left or right, uniformly
/// 8. all free               -> straight with probability 1/3, else a
///                              uniformly random side
pub fn decide_with<R: Rng>(map: &ObstacleMap, rng: &mut R) -> Turn {
    match (map.front, map.left, map.right) {
        (true, true, true) => Turn::Around,
        (false, true, true) => Turn::Straight,
        (true, false, true) => Turn::Left,
        (true, true, false) => Turn::Right,
        (false, false, true) => {
            if rng.gen_bool(0.5) {
                Turn::Straight
            } else {
                Turn::Left
            }
        }
        (false, true, false) => {
            if rng.gen_bool(0.5) {
                Turn::Straight
            } else {
                Turn::Right
            }
        }
        (true, false, false) => random_side(rng),
        (false, false, false) => {
            if rng.gen_range(0..3) == 0 {
                Turn::Straight
            } else {
                random_side(rng)
            }
        }
    }
}

fn random_side<R: Rng>(rng: &mut R) -> Turn {
    if rng.gen_bool(0.5) {
        Turn::Left
    } else {
        Turn::Right
    }
}
