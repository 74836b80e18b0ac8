//! Reward shaping
//!
//! Progress is measured as the drop in distance to the nearest goal,
//! normalized by the distance at reset, so a full run to the goal earns
//! `k_progress` in total regardless of track size.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_BASELINE_DISTANCE;
use crate::settings::RewardSettings;

/// Individual reward components for one step
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardTerms {
    pub progress: f64,
    pub time: f64,
    pub collision: f64,
    pub goal: f64,
}

impl RewardTerms {
    #[inline]
    pub fn total(&self) -> f64 {
        self.progress + self.time + self.collision + self.goal
    }
}

/// Shaped reward with a per-episode distance baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardShaper {
    coefficients: RewardSettings,
    dist_initial: f64,
}

impl RewardShaper {
    pub fn new(coefficients: RewardSettings) -> Self {
        Self {
            coefficients,
            dist_initial: 1.0,
        }
    }

    /// Capture the reset-time distance; call once per episode before stepping
    pub fn set_baseline(&mut self, dist_initial: f64) {
        self.dist_initial = dist_initial.max(MIN_BASELINE_DISTANCE);
    }

    pub fn baseline(&self) -> f64 {
        self.dist_initial
    }

    pub fn coefficients(&self) -> &RewardSettings {
        &self.coefficients
    }

    pub fn terms(&self, dist_prev: f64, dist_curr: f64, collided: bool, reached_goal: bool) -> RewardTerms {
        let k = &self.coefficients;
        RewardTerms {
            progress: k.k_progress * (dist_prev - dist_curr) / self.dist_initial,
            time: -k.k_time,
            collision: if collided { -k.k_collision } else { 0.0 },
            goal: if reached_goal { k.k_goal } else { 0.0 },
        }
    }

    /// Scalar reward for one step
    pub fn step(&self, dist_prev: f64, dist_curr: f64, collided: bool, reached_goal: bool) -> f64 {
        self.terms(dist_prev, dist_curr, collided, reached_goal).total()
    }
}

/// Euclidean distance to the nearest goal centre, 0 when there are none
pub fn distance_to_goal(pos: DVec2, goals: &[DVec2]) -> f64 {
    goals
        .iter()
        .map(|g| pos.distance(*g))
        .reduce(f64::min)
        .unwrap_or(0.0)
}
