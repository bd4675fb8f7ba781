//! Unified error types for the impact engine.
//!
//! Every calculator returns [`Result`]. Variants fall into a small taxonomy
//! (see [`ErrorCategory`]) so callers can tell malformed input apart from data
//! that simply has not been recorded yet.

use thiserror::Error;

/// Engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// A unit outside the accepted set, or a unit of the wrong kind
    #[error("Unsupported unit '{unit}' (expected {expected})")]
    UnsupportedUnit {
        /// The unit as declared by the caller
        unit: String,
        /// The units that would have been accepted
        expected: String,
    },

    /// A numeric input that is negative, NaN or infinite
    #[error("Invalid quantity for {field}: {value}")]
    InvalidQuantity {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: f64,
    },

    /// Total facility production volume is zero or negative
    #[error("Total production volume must be greater than zero (got {total_volume})")]
    ZeroVolume {
        /// The rejected total volume
        total_volume: f64,
    },

    /// Product volume outside `(0, total_volume]`
    #[error(
        "Product volume {product_volume} must be greater than zero and no more than the total production volume {total_volume}"
    )]
    InvalidAllocation {
        /// The product's production volume
        product_volume: f64,
        /// The facility's total production volume
        total_volume: f64,
    },

    /// Any other out-of-range or inconsistent input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// Required data (snapshot, factor, profile) has not been provided
    #[error("Missing data: {what}")]
    MissingData {
        /// What could not be found
        what: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// I/O failure in the binary harness
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or out-of-range input; never retried
    Validation,
    /// Data absent; the caller decides whether that is "no data yet"
    MissingData,
    /// Bad configuration
    Config,
    /// I/O in the surrounding harness
    Io,
}

impl Error {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedUnit { .. }
            | Self::InvalidQuantity { .. }
            | Self::ZeroVolume { .. }
            | Self::InvalidAllocation { .. }
            | Self::Validation { .. } => ErrorCategory::Validation,
            Self::MissingData { .. } => ErrorCategory::MissingData,
            Self::Config { .. } => ErrorCategory::Config,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Shorthand for building a [`Error::Validation`].
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Rejects negative, NaN and infinite values.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidQuantity {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let err = Error::ZeroVolume { total_volume: 0.0 };
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = Error::MissingData {
            what: "facility snapshot".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::MissingData);

        let err = Error::UnsupportedUnit {
            unit: "oz".to_string(),
            expected: "g or kg".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.to_string(), "Unsupported unit 'oz' (expected g or kg)");
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("quantity", 0.0).is_ok());
        assert!(ensure_non_negative("quantity", 12.5).is_ok());
        assert!(matches!(
            ensure_non_negative("quantity", -1.0),
            Err(Error::InvalidQuantity { .. })
        ));
        assert!(ensure_non_negative("quantity", f64::NAN).is_err());
        assert!(ensure_non_negative("quantity", f64::INFINITY).is_err());
    }
}
