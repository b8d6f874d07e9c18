//! Error Module
//!
//! One error type for the whole engine. Circumpolar sun conditions are not
//! errors; they are returned as [`crate::daytime::DayBoundary`] variants.

use thiserror::Error;

/// Errors raised by configuration loading and yield calculations.
#[derive(Debug, Error)]
pub enum Error {
    /// The installation has not been bound to a calculation context.
    #[error("power plant is not bound to a calculation context")]
    Unbound,

    /// The installation has no roofs to sweep.
    #[error("power plant has no roofs")]
    NoRoofs,

    /// A roof without panels has no generator factor.
    #[error("roof '{roof}' has no panels")]
    NoPanels { roof: String },

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("invalid panel: {0}")]
    InvalidPanel(String),

    #[error("invalid roof: {0}")]
    InvalidRoof(String),

    /// A local wall-clock time that does not exist in the chosen time zone.
    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
