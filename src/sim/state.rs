//! Episode state and core simulation types
//!
//! Everything needed to resume an episode bit-for-bit lives here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::heading::Heading;
use super::reward::RewardShaper;
use crate::consts::*;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Footprint touched a wall
    Collision,
    /// Footprint touched a goal cell
    GoalReached,
    /// Both in the same step; penalty and bonus are both applied
    CollisionAtGoal,
}

impl TerminationCause {
    pub fn from_flags(collision: bool, goal: bool) -> Option<Self> {
        match (collision, goal) {
            (true, true) => Some(TerminationCause::CollisionAtGoal),
            (true, false) => Some(TerminationCause::Collision),
            (false, true) => Some(TerminationCause::GoalReached),
            (false, false) => None,
        }
    }

    pub fn collided(&self) -> bool {
        matches!(self, TerminationCause::Collision | TerminationCause::CollisionAtGoal)
    }

    pub fn reached_goal(&self) -> bool {
        matches!(self, TerminationCause::GoalReached | TerminationCause::CollisionAtGoal)
    }
}

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Constructed but never reset
    #[default]
    AwaitingReset,
    /// Accepting steps
    Running,
    /// Absorbing until the next reset
    Terminated(TerminationCause),
}

/// Vehicle footprint in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprint {
    /// Extent along the heading
    pub length: f64,
    /// Lateral extent
    pub width: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            length: VEHICLE_LENGTH,
            width: VEHICLE_WIDTH,
        }
    }
}

impl Footprint {
    /// World-axis extent (x, y) for a heading
    pub fn extent(&self, heading: Heading) -> DVec2 {
        if heading.orientation().swaps_footprint {
            DVec2::new(self.width, self.length)
        } else {
            DVec2::new(self.length, self.width)
        }
    }

    /// Axis-aligned bounding box centred on `center`
    pub fn aabb(&self, center: DVec2, heading: Heading) -> Aabb {
        let half = self.extent(heading) / 2.0;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }
}

/// Continuous vehicle state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// Centre position (grid units)
    pub pos: DVec2,
    /// Speed along the heading, never negative
    pub speed: f64,
    pub heading: Heading,
    /// Remaining boosted steps
    pub boost_timer: u32,
}

impl VehicleState {
    /// Stationary vehicle facing east
    pub fn spawned_at(pos: DVec2) -> Self {
        Self {
            pos,
            speed: 0.0,
            heading: Heading::East,
            boost_timer: 0,
        }
    }
}

/// Complete per-episode state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub vehicle: VehicleState,
    pub phase: EpisodePhase,
    pub shaper: RewardShaper,
    /// Distance to the nearest goal after the last committed step
    pub dist_prev: f64,
    /// Steps taken since reset
    pub steps: u64,
    /// Sum of rewards since reset
    pub episode_return: f64,
}

impl EpisodeState {
    pub fn new(shaper: RewardShaper) -> Self {
        Self {
            vehicle: VehicleState::default(),
            phase: EpisodePhase::AwaitingReset,
            shaper,
            dist_prev: 0.0,
            steps: 0,
            episode_return: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == EpisodePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_swaps_on_vertical_headings() {
        let fp = Footprint {
            length: 4.0,
            width: 2.0,
        };
        assert_eq!(fp.extent(Heading::East), DVec2::new(4.0, 2.0));
        assert_eq!(fp.extent(Heading::West), DVec2::new(4.0, 2.0));
        assert_eq!(fp.extent(Heading::North), DVec2::new(2.0, 4.0));
        assert_eq!(fp.extent(Heading::South), DVec2::new(2.0, 4.0));
    }

    #[test]
    fn test_aabb() {
        let fp = Footprint {
            length: 4.0,
            width: 2.0,
        };
        let bb = fp.aabb(DVec2::new(5.0, 3.0), Heading::South);
        assert_eq!(bb.min, DVec2::new(4.0, 1.0));
        assert_eq!(bb.max, DVec2::new(6.0, 5.0));
    }

    #[test]
    fn test_termination_flags() {
        assert_eq!(TerminationCause::from_flags(false, false), None);
        assert_eq!(
            TerminationCause::from_flags(true, false),
            Some(TerminationCause::Collision)
        );
        assert_eq!(
            TerminationCause::from_flags(false, true),
            Some(TerminationCause::GoalReached)
        );
        let both = TerminationCause::from_flags(true, true).unwrap();
        assert!(both.collided() && both.reached_goal());
    }
}
