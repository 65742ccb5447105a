//! Error types
//!
//! Configuration errors are ordinary recoverable failures. Invalid transitions
//! are contract violations inside the core: they trip an assertion in debug
//! builds and degrade to a logged no-op in release builds.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::{EntityId, LifePhase, SecretKind};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// A state change the core was asked to make that its contract forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("entity {0:?} is not live in the registry")]
    UnknownEntity(EntityId),

    #[error("hazard hit while player is {0:?}")]
    HitWhileNotAlive(LifePhase),

    #[error("death resolution while player is {0:?}")]
    ResolveWhileNotDying(LifePhase),

    #[error("secret {0:?} is not held")]
    SecretNotHeld(SecretKind),
}

/// Report a contract violation: panic in debug builds, log and continue otherwise.
#[track_caller]
pub(crate) fn contract_violation(err: InvalidTransition) {
    if cfg!(debug_assertions) {
        panic!("contract violation: {err}");
    }
    log::warn!("Ignoring invalid transition: {}", err);
}
