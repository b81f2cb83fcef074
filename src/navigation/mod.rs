//! Navigation strategies and the main control loop
//!
//! Two strategies share the same driver contract: the reactive
//! sonar-classification policy (the default) and the calibration-based
//! right-hand wall follower. Both are purely reactive - no mapping, no
//! localization, no memory of explored territory.

mod decision;
mod navigator;
mod recovery;
mod wall_follow;

pub use decision::{decide_with, PathDecisionEngine, Turn};
pub use navigator::Navigator;
pub use recovery::BumperRecovery;
pub use wall_follow::WallFollower;
