//! Error types for lanewise.
//!
//! The typed API rejects invalid operations at compile time. These errors are
//! produced only by the runtime layer ([`dynamic`](crate::dynamic), shape
//! parsing), which checks the same rules before touching any bits.

use std::fmt;
use thiserror::Error;

use crate::types::Shape;

/// Error codes for runtime vector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed shape, wrong byte count or similar bad input.
    InvalidArgument,
    /// Reinterpretation between vectors of different total widths.
    SizeMismatch,
    /// No conversion is defined for the requested pair and rounding.
    UnsupportedConversion,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::SizeMismatch => write!(f, "SIZE_MISMATCH"),
            ErrorCode::UnsupportedConversion => write!(f, "UNSUPPORTED_CONVERSION"),
        }
    }
}

/// Main error type for lanewise operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SimdError {
    code: ErrorCode,
    message: String,
}

impl SimdError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    /// Create a size mismatch error for reinterpreting `from` as `to`.
    pub fn size_mismatch(from: Shape, to: Shape) -> Self {
        Self::new(
            ErrorCode::SizeMismatch,
            format!(
                "cannot reinterpret {} ({} bits) as {} ({} bits): vectors must be same size",
                from,
                from.bits(),
                to,
                to.bits()
            ),
        )
    }

    /// Create an unsupported conversion error.
    pub fn unsupported_conversion(from: Shape, to: Shape, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnsupportedConversion,
            format!("no conversion from {} to {} ({})", from, to, detail),
        )
    }
}

impl fmt::Display for SimdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result type alias for lanewise operations.
pub type Result<T> = std::result::Result<T, SimdError>;
