//! Deterministic simulation module
//!
//! All episode logic lives here. This module must be pure and deterministic:
//! - No randomness and no wall-clock time
//! - Per-instance state only (no statics)
//! - Fixed update order within a step
//! - No rendering or platform dependencies

pub mod collision;
pub mod dynamics;
pub mod heading;
pub mod reward;
pub mod sensor;
pub mod state;
pub mod tick;
pub mod tile;
pub mod track;

pub use collision::{Aabb, Contacts, clamp_to_track, detect_contacts};
pub use heading::{Heading, ORIENTATIONS, Orientation};
pub use reward::{RewardShaper, RewardTerms, distance_to_goal};
pub use sensor::{Observation, extract};
pub use state::{EpisodePhase, EpisodeState, Footprint, TerminationCause, VehicleState};
pub use tick::{ACTION_COUNT, Action, Steer, StepOutcome, Throttle, reset_episode, tick};
pub use tile::{TILE_KIND_COUNT, TileKind};
pub use track::Track;
