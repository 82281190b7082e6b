//! Error types for the Ripple engines.
//!
//! Two small enums, organized by phase: construction-time configuration
//! errors and registration-time registry errors. Everything that can go
//! wrong during a tick is a defined no-op instead (degenerate geometry,
//! invalid emissions), so `update()` itself is infallible.

use crate::id::{EnvironmentId, ObjectId};
use std::error::Error;
use std::fmt;

/// Errors from engine construction.
///
/// Returned when a config struct fails validation; the engine is never
/// built with out-of-range parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// Propagation speed must be finite and > 0.
    InvalidPropagationSpeed {
        /// The rejected value.
        value: f64,
    },
    /// Minimum detectable intensity must be finite and > 0.
    InvalidMinIntensity {
        /// The rejected value.
        value: f64,
    },
    /// Reception sphere radius must be finite and > 0.
    InvalidReceptionRadius {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPropagationSpeed { value } => {
                write!(f, "propagation speed must be finite and > 0, got {value}")
            }
            Self::InvalidMinIntensity { value } => {
                write!(f, "minimum intensity must be finite and > 0, got {value}")
            }
            Self::InvalidReceptionRadius { value } => {
                write!(f, "reception radius must be finite and > 0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from object registration.
///
/// Raised immediately at registration time, before any simulation tick
/// runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The object lives in a different physical space than the field's
    /// existing participants.
    EnvironmentMismatch {
        /// Environment shared by the already-registered objects.
        expected: EnvironmentId,
        /// Environment reported by the rejected object.
        found: EnvironmentId,
    },
    /// The referenced object is not registered in this field.
    UnknownObject {
        /// The id that failed to resolve.
        id: ObjectId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentMismatch { expected, found } => {
                write!(
                    f,
                    "object lives in environment {found}, field is bound to {expected}"
                )
            }
            Self::UnknownObject { id } => write!(f, "object {id} is not registered"),
        }
    }
}

impl Error for RegistryError {}
