//! Grid Racer - a tile-track racing environment for reinforcement learning
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track, dynamics, perception, reward, episode tick)
//! - `env`: Policy-facing environment (reset/step, observation and info)
//! - `renderer`: Presentation boundary and a text reference renderer
//! - `settings`: Runtime tuning
//! - `error`: Error types per failure domain

pub mod env;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use env::{Environment, RacingEnv, StepInfo, Transition};
pub use error::{ConfigError, FormatError, RenderError, SettingsError, StepError, TrackError};
pub use settings::Settings;

/// Default tuning constants
pub mod consts {
    /// Speed cap (grid units per step)
    pub const MAX_SPEED: f64 = 2.0;
    pub const ACCELERATION: f64 = 0.2;
    pub const BRAKING: f64 = 0.3;

    /// Surface speed multipliers
    pub const OIL_MULTIPLIER: f64 = 0.90;
    pub const DIRT_MULTIPLIER: f64 = 0.95;

    /// Boost: +5% per unit time for 10 steps after touching a boost tile
    pub const BOOST_FACTOR: f64 = 1.05;
    pub const BOOST_DURATION: u32 = 10;

    /// Reward coefficients
    pub const K_PROGRESS: f64 = 1.0;
    pub const K_TIME: f64 = 0.01;
    pub const K_COLLISION: f64 = 5.0;
    pub const K_GOAL: f64 = 20.0;

    /// Floor for the reset distance used to normalize progress
    pub const MIN_BASELINE_DISTANCE: f64 = 1e-6;

    /// Observation patch
    pub const PATCH_HEIGHT: usize = 13;
    pub const PATCH_WIDTH: usize = 13;
    pub const BACK_MARGIN: usize = 3;

    /// Vehicle footprint (grid units)
    pub const VEHICLE_LENGTH: f64 = 4.0;
    pub const VEHICLE_WIDTH: f64 = 2.0;

    /// Presentation
    pub const RENDER_FPS: u32 = 60;
    pub const MIN_TIME_SCALE: f64 = 0.05;
}
