//! Crate error types.
//!
//! Nothing in the simulation core is fatal: every error surfaced here is
//! logged by the caller and the game degrades (defaults, in-memory storage,
//! silent no-op) instead of interrupting the frame loop.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::{ArcadeError, ArcadeResult};
//!
//! fn read_profile(path: &Path) -> ArcadeResult<String> {
//!     std::fs::read_to_string(path).map_err(|source| ArcadeError::Io {
//!         context: format!("reading {}", path.display()),
//!         source,
//!     })
//! }
//! ```

use std::fmt;

/// Top-level error enum for the arcade crate.
#[derive(Debug)]
pub enum ArcadeError {
    /// Filesystem access failed (profile directory missing, permissions, ...).
    Io {
        /// Human-readable description of the operation that failed.
        context: String,
        source: std::io::Error,
    },

    /// Stored data could not be decoded.
    Parse {
        context: String,
        message: String,
    },

    /// In-memory data could not be encoded for storage.
    Serialize {
        message: String,
    },

    /// An operation needed a user identity but none (or an unusable one) was given.
    UnknownUser,

    /// A configuration value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::Io { context, source } => write!(f, "{context}: {source}"),
            ArcadeError::Parse { context, message } => {
                write!(f, "failed to parse {context}: {message}")
            }
            ArcadeError::Serialize { message } => write!(f, "failed to serialize: {message}"),
            ArcadeError::UnknownUser => write!(f, "no usable user identity"),
            ArcadeError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArcadeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `ArcadeError` as the error type.
pub type ArcadeResult<T> = Result<T, ArcadeError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> ArcadeResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ArcadeError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is a probability in `[0, 1]`.
pub fn validate_probability(name: &'static str, value: f32) -> ArcadeResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ArcadeError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` lies in `(0, 1]`; used for per-tick friction.
pub fn validate_unit_factor(name: &'static str, value: f32) -> ArcadeResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ArcadeError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(validate_positive("x", 1.0).is_ok());
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", f32::NAN).is_err());
    }

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(validate_probability("p", 0.0).is_ok());
        assert!(validate_probability("p", 1.0).is_ok());
        assert!(validate_probability("p", 1.01).is_err());
    }

    #[test]
    fn unsafe_constant_message_names_the_key() {
        let err = validate_unit_factor("ship_friction", 1.5).unwrap_err();
        assert!(err.to_string().contains("ship_friction"));
    }
}
