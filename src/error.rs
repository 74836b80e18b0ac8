//! Error types
//!
//! One enum per failure domain. Spatial queries, dynamics and reward steps are
//! total and never produce these.

use thiserror::Error;

/// Malformed track source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("track has no rows")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized token {token:?} at row {row}, column {col}")]
    UnknownToken {
        row: usize,
        col: usize,
        token: String,
    },
}

/// Failure loading a track from disk
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("failed to read track: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Track or tuning values that cannot produce a valid episode
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("track needs exactly two start cells, found {found}")]
    StartCount { found: usize },
    #[error("start cells must share a column (found columns {first} and {second})")]
    StartColumnsDiffer { first: usize, second: usize },
    #[error("{field} must be {requirement} (got {value})")]
    InvalidParameter {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("snapshot reward coefficients differ from the environment's settings")]
    SnapshotCoefficients,
}

/// Failure loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Presentation failure, always surfaced to the caller
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("display surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("renderer was closed")]
    Closed,
    #[error("failed to present frame: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a step request is refused
#[derive(Error, Debug)]
pub enum StepError {
    #[error("action {0} is outside [0, 9)")]
    InvalidAction(usize),
    #[error("step called before reset")]
    NotReset,
    #[error("episode already terminated ({0:?}); call reset")]
    EpisodeOver(crate::sim::TerminationCause),
    /// The step was committed but could not be presented; carries its transition
    #[error("step completed but rendering failed: {source}")]
    Render {
        transition: Box<crate::env::Transition>,
        #[source]
        source: RenderError,
    },
}

impl StepError {
    /// The committed transition carried by a render failure
    pub fn into_transition(self) -> Option<crate::env::Transition> {
        match self {
            StepError::Render { transition, .. } => Some(*transition),
            _ => None,
        }
    }
}
