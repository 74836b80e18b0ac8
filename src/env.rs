//! Policy-facing environment
//!
//! Wraps the deterministic simulation behind a reset/step interface: integer
//! actions in, egocentric observations, shaped rewards and per-step info out.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RenderError, StepError};
use crate::renderer::{Frame, Renderer};
use crate::settings::Settings;
use crate::sim::{
    ACTION_COUNT, Action, Contacts, EpisodePhase, EpisodeState, Heading, Observation,
    RewardShaper, RewardTerms, TILE_KIND_COUNT, Track, VehicleState, extract, reset_episode, tick,
};

/// Diagnostics returned with every observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub speed: f64,
    pub collision: bool,
    pub goal_reached: bool,
    pub heading: Heading,
    pub position: DVec2,
    pub boost_timer: u32,
    /// Steps since reset
    pub steps: u64,
    /// Sum of rewards since reset
    pub episode_return: f64,
    /// Breakdown of the last step's reward (zero after reset)
    pub reward_terms: RewardTerms,
}

/// Result of one step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f64,
    /// Collision or goal this step
    pub terminated: bool,
    /// Always false; time limits belong to the caller
    pub truncated: bool,
    pub info: StepInfo,
}

impl Transition {
    #[inline]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Discrete-action environment interface
pub trait Environment {
    /// Start a new episode
    fn reset(&mut self) -> Result<(Observation, StepInfo), ConfigError>;

    /// Advance by one action code in `[0, action_count())`
    fn step(&mut self, action: usize) -> Result<Transition, StepError>;

    fn action_count(&self) -> usize;

    /// `(height, width, channels)`
    fn observation_shape(&self) -> (usize, usize, usize);
}

/// Single-vehicle racing environment over a tile track
///
/// Owns its track, vehicle state and reward cache exclusively; independent
/// instances share nothing and can run on separate threads.
pub struct RacingEnv {
    track: Track,
    /// Cached goal centres (the track is immutable)
    goals: Vec<DVec2>,
    settings: Settings,
    state: EpisodeState,
    renderer: Option<Box<dyn Renderer + Send>>,
}

impl RacingEnv {
    /// Create an environment; spawn validity is only checked at reset
    pub fn new(track: Track, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let goals = track.goal_centers();
        let state = EpisodeState::new(RewardShaper::new(settings.reward));
        Ok(Self {
            track,
            goals,
            settings,
            state,
            renderer: None,
        })
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.state.vehicle
    }

    pub fn phase(&self) -> EpisodePhase {
        self.state.phase
    }

    /// Presentation-only slowdown; also shortens each step's motion
    pub fn set_time_scale(&mut self, scale: f64) {
        self.settings.set_time_scale(scale);
    }

    pub fn set_render_fps(&mut self, fps: u32) {
        self.settings.set_render_fps(fps);
    }

    /// Current observation at the committed pose
    pub fn observe(&self) -> Observation {
        let s = &self.settings.sensor;
        let v = &self.state.vehicle;
        extract(
            &self.track,
            v.pos,
            v.heading,
            s.patch_width,
            s.patch_height,
            s.back_margin,
        )
    }

    fn info(&self, contacts: Contacts, reward_terms: RewardTerms) -> StepInfo {
        let v = &self.state.vehicle;
        StepInfo {
            speed: v.speed,
            collision: contacts.collision,
            goal_reached: contacts.goal,
            heading: v.heading,
            position: v.pos,
            boost_timer: v.boost_timer,
            steps: self.state.steps,
            episode_return: self.state.episode_return,
            reward_terms,
        }
    }

    /// Copy of the full episode state
    pub fn snapshot(&self) -> EpisodeState {
        self.state.clone()
    }

    /// Resume from a snapshot taken on an environment with the same track
    ///
    /// The snapshot's phase is taken as-is: restoring an unreset or terminated
    /// episode leaves `step` refusing until the next reset. Snapshots shaped
    /// with different reward coefficients are rejected.
    pub fn restore(&mut self, state: EpisodeState) -> Result<(), ConfigError> {
        if *state.shaper.coefficients() != self.settings.reward {
            return Err(ConfigError::SnapshotCoefficients);
        }
        self.state = state;
        Ok(())
    }

    /// Attach a renderer; `step` will present after every committed step
    ///
    /// A failed present surfaces as [`StepError::Render`], which still carries
    /// the step's transition.
    pub fn attach_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        self.renderer = Some(renderer);
    }

    pub fn detach_renderer(&mut self) -> Option<Box<dyn Renderer + Send>> {
        self.renderer.take()
    }

    /// Present the current pose; a no-op without a renderer
    pub fn render(&mut self) -> Result<(), RenderError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let frame = Frame {
            track: &self.track,
            vehicle: self.state.vehicle,
            footprint: self.settings.footprint,
        };
        renderer.draw(&frame, self.settings.render_fps)
    }

    /// Release the renderer, if any
    pub fn close(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.close();
        }
    }
}

impl Environment for RacingEnv {
    fn reset(&mut self) -> Result<(Observation, StepInfo), ConfigError> {
        self.state = reset_episode(&self.track, &self.goals, &self.settings)?;
        let v = &self.state.vehicle;
        log::info!(
            "Episode reset at ({:.2}, {:.2}), distance to goal {:.3}",
            v.pos.x,
            v.pos.y,
            self.state.dist_prev
        );
        Ok((
            self.observe(),
            self.info(Contacts::default(), RewardTerms::default()),
        ))
    }

    fn step(&mut self, action: usize) -> Result<Transition, StepError> {
        match self.state.phase {
            EpisodePhase::AwaitingReset => return Err(StepError::NotReset),
            EpisodePhase::Terminated(cause) => return Err(StepError::EpisodeOver(cause)),
            EpisodePhase::Running => {}
        }
        let action = Action::from_code(action).ok_or(StepError::InvalidAction(action))?;

        let outcome = tick(
            &mut self.state,
            &self.track,
            &self.goals,
            &self.settings,
            action,
            self.settings.time_scale,
        );
        let transition = Transition {
            observation: self.observe(),
            reward: outcome.reward,
            terminated: outcome.contacts.any(),
            truncated: false,
            info: self.info(outcome.contacts, outcome.terms),
        };

        match self.render() {
            Ok(()) => Ok(transition),
            Err(source) => Err(StepError::Render {
                transition: Box::new(transition),
                source,
            }),
        }
    }

    fn action_count(&self) -> usize {
        ACTION_COUNT
    }

    fn observation_shape(&self) -> (usize, usize, usize) {
        let s = &self.settings.sensor;
        (s.patch_height, s.patch_width, TILE_KIND_COUNT)
    }
}

impl Drop for RacingEnv {
    fn drop(&mut self) {
        self.close();
    }
}
