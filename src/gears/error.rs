//! Error types for gear geometry computations.

use thiserror::Error;

/// Result type for gear geometry operations.
pub type GearResult<T> = Result<T, GearError>;

/// Errors that can occur while evaluating gear geometry.
///
/// Physically infeasible but expected outcomes (undercut, a negative
/// zero-backlash involute argument) are not errors; they are reported through
/// [`Feasibility`](crate::gears::outcome::Feasibility).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GearError {
    /// An argument lies outside the mathematical domain of a formula.
    #[error("Domain error in {operation}: {message}")]
    Domain {
        /// Name of the operation that rejected its input.
        operation: &'static str,
        /// Description of what's wrong.
        message: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },

    /// Specific sliding divides by a tangential velocity of zero.
    #[error("Specific sliding is undefined for gear {gear}: tangential velocity is zero at the contact point")]
    ZeroTangentialVelocity {
        /// Gear index within the pair (1 or 2).
        gear: u8,
    },
}

impl GearError {
    /// Creates a domain error.
    pub fn domain(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Domain {
            operation,
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
