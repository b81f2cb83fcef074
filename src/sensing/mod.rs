//! Sonar sampling and obstacle classification
//!
//! Single sonar readings spike; the aggregator trades latency for
//! robustness by averaging a fixed number of immediate re-reads instead of
//! keeping richer statistics. Out-of-range sentinel values are averaged in
//! as-is and resolved by the single distance threshold, never filtered.

use log::debug;

use crate::driver::RobotDriver;
use crate::{SonarChannels, WanderConfig};

/// Instantaneous blocked/free classification of the three travel directions
///
/// Valid only for the instant it was sampled; the environment and the
/// robot pose change continuously, so a fresh map is taken before every
/// decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleMap {
    /// Obstacle within threshold ahead
    pub front: bool,
    /// Obstacle within threshold on the left
    pub left: bool,
    /// Obstacle within threshold on the right
    pub right: bool,
}

/// Averaging sonar reader with a fixed blocked/free threshold
#[derive(Debug, Clone)]
pub struct SensorAggregator {
    samples: u32,
    threshold: f64,
}

impl SensorAggregator {
    /// Create an aggregator from the active configuration
    pub fn new(config: &WanderConfig) -> Self {
        SensorAggregator {
            samples: config.sonar_samples,
            threshold: config.obstacle_threshold,
        }
    }

    /// Mean of `sonar_samples` immediate readings of one channel
    pub fn average_distance<D: RobotDriver>(&self, driver: &mut D, channel: usize) -> f64 {
        let mut sum = 0.0;
        for _ in 0..self.samples {
            sum += driver.get_sonar(channel);
        }
        let mean = sum / self.samples as f64;
        debug!("sonar {}: averaged {:.4} over {} reads", channel, mean, self.samples);
        mean
    }

    /// Whether the averaged clearance on this channel is at or below the
    /// obstacle threshold
    pub fn is_blocked<D: RobotDriver>(&self, driver: &mut D, channel: usize) -> bool {
        self.average_distance(driver, channel) <= self.threshold
    }
}

/// Combines the three travel-direction channels into an [`ObstacleMap`]
#[derive(Debug, Clone)]
pub struct ObstacleClassifier {
    aggregator: SensorAggregator,
    channels: SonarChannels,
}

impl ObstacleClassifier {
    /// Create a classifier from the active configuration
    pub fn new(config: &WanderConfig) -> Self {
        ObstacleClassifier {
            aggregator: SensorAggregator::new(config),
            channels: config.sonar,
        }
    }

    /// Sample front, left, and right and classify each against the
    /// threshold; pure function of current sensor state, never cached
    pub fn classify<D: RobotDriver>(&self, driver: &mut D) -> ObstacleMap {
        let map = ObstacleMap {
            front: self.aggregator.is_blocked(driver, self.channels.front),
            left: self.aggregator.is_blocked(driver, self.channels.left),
            right: self.aggregator.is_blocked(driver, self.channels.right),
        };
        debug!("obstacle map: {:?}", map);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockRobotDriver;
    use rstest::rstest;

    fn aggregator() -> SensorAggregator {
        SensorAggregator::new(&WanderConfig::simulator())
    }

    #[test]
    fn average_consumes_exactly_the_configured_sample_count() {
        let mut driver = MockRobotDriver::new();
        driver
            .expect_get_sonar()
            .withf(|&channel| channel == 3)
            .times(15)
            .returning(|_| 1.0);
        assert!((aggregator().average_distance(&mut driver, 3) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn average_is_the_arithmetic_mean() {
        let mut driver = MockRobotDriver::new();
        let mut reading = 0.0;
        driver.expect_get_sonar().times(15).returning(move |_| {
            reading += 1.0;
            reading
        });
        // Mean of 1..=15
        assert!((aggregator().average_distance(&mut driver, 3) - 8.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.1875, true)] // exactly at the threshold is still blocked
    #[case(0.1876, false)] // infinitesimally above is free
    #[case(0.01, true)]
    #[case(1.5, false)]
    fn threshold_boundary_is_inclusive(#[case] reading: f64, #[case] blocked: bool) {
        let mut driver = MockRobotDriver::new();
        driver.expect_get_sonar().returning(move |_| reading);
        assert_eq!(aggregator().is_blocked(&mut driver, 3), blocked);
    }

    #[test]
    fn sentinel_values_are_averaged_in_unfiltered() {
        let mut driver = MockRobotDriver::new();
        let mut calls = 0;
        driver.expect_get_sonar().times(15).returning(move |_| {
            calls += 1;
            // One absurd spike among otherwise-blocked readings
            if calls == 8 {
                1000.0
            } else {
                0.05
            }
        });
        // The spike dominates the mean and flips the classification
        assert!(!aggregator().is_blocked(&mut driver, 3));
    }

    #[test]
    fn classify_reads_the_configured_channels() {
        let config = WanderConfig::simulator();
        let classifier = ObstacleClassifier::new(&config);
        let mut driver = MockRobotDriver::new();
        driver.expect_get_sonar().returning(|channel| match channel {
            3 => 0.1, // front blocked
            0 => 1.0, // left free
            6 => 0.1, // right blocked
            _ => panic!("unexpected channel {}", channel),
        });
        let map = classifier.classify(&mut driver);
        assert_eq!(
            map,
            ObstacleMap {
                front: true,
                left: false,
                right: true
            }
        );
    }
}
