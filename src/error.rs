//! Simulation-specific error types.
//!
//! Nothing in the combat core is allowed to panic during normal play: missing
//! entities are skipped, refused spawns are dropped, and collaborator
//! failures (audio, HUD) are logged.  These types carry the recoverable
//! conditions between the pure helpers and the systems that drop them.

// Items are public API; dead_code lint is suppressed to avoid forcing premature wiring.
#![allow(dead_code)]
use std::fmt;

/// Top-level error enum for the combat simulation.
#[derive(Debug)]
pub enum GameError {
    /// A spawn request was refused.  Population caps and degenerate spawn
    /// parameters land here; the director drops these silently.
    SpawnRefused {
        /// Human-readable reason for the refusal.
        reason: &'static str,
    },

    /// An entity was referenced but could not be found in the world.
    /// Usually a despawn race between the destruction sequence and a hit system.
    EntityNotFound {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
    },

    /// Gameplay constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::SpawnRefused { reason } => {
                write!(f, "spawn refused: {}", reason)
            }
            GameError::EntityNotFound { context } => {
                write!(f, "entity not found during '{}'", context)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `difficulty` is not strictly positive.
///
/// The effective enemy spawn interval is `base / difficulty`; zero or negative
/// values would stall or invert the spawn clock.
pub fn validate_difficulty(value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name: "difficulty",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if a fire interval would allow unbounded projectile rates.
pub fn validate_fire_interval(value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name: "fire_interval",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}
