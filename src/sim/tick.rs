//! Per-step episode pipeline
//!
//! Advances an [`EpisodeState`] deterministically: decode action, turn,
//! dynamics, clamp, contacts, reward, commit.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contacts, clamp_to_track, detect_contacts};
use super::dynamics;
use super::reward::{RewardShaper, RewardTerms, distance_to_goal};
use super::state::{EpisodePhase, EpisodeState, TerminationCause, VehicleState};
use super::track::Track;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Number of discrete actions (3 steer x 3 throttle)
pub const ACTION_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Straight,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Throttle {
    Brake,
    Neutral,
    Accelerate,
}

impl Throttle {
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Throttle::Brake,
            1 => Throttle::Neutral,
            _ => Throttle::Accelerate,
        }
    }
}

/// Decoded action for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub steer: Steer,
    pub throttle: Throttle,
}

impl Action {
    /// `code mod 3` selects steer, `code div 3` selects throttle
    pub fn from_code(code: usize) -> Option<Self> {
        if code >= ACTION_COUNT {
            return None;
        }
        let steer = match code % 3 {
            0 => Steer::Left,
            1 => Steer::Straight,
            _ => Steer::Right,
        };
        Some(Self {
            steer,
            throttle: Throttle::from_index(code / 3),
        })
    }

    pub fn code(&self) -> usize {
        let steer = match self.steer {
            Steer::Left => 0,
            Steer::Straight => 1,
            Steer::Right => 2,
        };
        let throttle = match self.throttle {
            Throttle::Brake => 0,
            Throttle::Neutral => 1,
            Throttle::Accelerate => 2,
        };
        throttle * 3 + steer
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepOutcome {
    pub reward: f64,
    pub terms: RewardTerms,
    pub contacts: Contacts,
}

/// Fresh running episode at the track's spawn pose
pub fn reset_episode(
    track: &Track,
    goals: &[DVec2],
    settings: &Settings,
) -> Result<EpisodeState, ConfigError> {
    let spawn = track.spawn_pose(settings.footprint.length)?;
    let mut shaper = RewardShaper::new(settings.reward);
    let dist = distance_to_goal(spawn, goals);
    shaper.set_baseline(dist);

    let mut state = EpisodeState::new(shaper);
    state.vehicle = VehicleState::spawned_at(spawn);
    state.dist_prev = dist;
    state.phase = EpisodePhase::Running;
    Ok(state)
}

/// Advance a running episode by one step
///
/// The caller is responsible for only ticking running episodes. On contact
/// the phase becomes terminated.
pub fn tick(
    state: &mut EpisodeState,
    track: &Track,
    goals: &[DVec2],
    settings: &Settings,
    action: Action,
    dt: f64,
) -> StepOutcome {
    let mut vehicle = state.vehicle;

    // Turn first so this step's displacement uses the new heading
    vehicle.heading = match action.steer {
        Steer::Left => vehicle.heading.turned_left(),
        Steer::Straight => vehicle.heading,
        Steer::Right => vehicle.heading.turned_right(),
    };

    let surface = track.tile_under(vehicle.pos);
    let (speed, boost_timer) = dynamics::advance(
        &settings.dynamics,
        vehicle.speed,
        action.throttle,
        surface,
        vehicle.boost_timer,
        dt,
    );
    let moved = vehicle.pos + dynamics::displacement(vehicle.heading, speed, dt);
    let pos = clamp_to_track(moved, &settings.footprint, track);

    let bbox = settings.footprint.aabb(pos, vehicle.heading);
    let contacts = detect_contacts(track, &bbox);

    let dist = distance_to_goal(pos, goals);
    let terms = state
        .shaper
        .terms(state.dist_prev, dist, contacts.collision, contacts.goal);
    let reward = terms.total();

    vehicle.pos = pos;
    vehicle.speed = speed;
    vehicle.boost_timer = boost_timer;
    state.vehicle = vehicle;
    state.dist_prev = dist;
    state.steps += 1;
    state.episode_return += reward;

    if let Some(cause) = TerminationCause::from_flags(contacts.collision, contacts.goal) {
        log::debug!(
            "Episode terminated after {} steps: {:?} (return {:.3})",
            state.steps,
            cause,
            state.episode_return
        );
        state.phase = EpisodePhase::Terminated(cause);
    }

    StepOutcome {
        reward,
        terms,
        contacts,
    }
}
