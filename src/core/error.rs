// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for fieldpack.
//!
//! Provides error types for bridge operations:
//! - Wire data reading (truncation, bad markers, bad UTF-8)
//! - Formatter resolution
//! - Field bag access inside reconstruction initializers
//! - Object reconstruction

use std::fmt;

/// Errors that can occur while encoding or decoding field bags.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Buffer too short for requested read
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// A marker byte did not match what the reader expected
    InvalidMarker {
        /// The marker byte found on the wire
        marker: u8,
        /// Position of the marker
        position: usize,
        /// What was expected at this position (e.g., "map header")
        expected: String,
    },

    /// String bytes were not valid UTF-8
    InvalidUtf8 {
        /// Position of the string payload
        position: usize,
    },

    /// The target type has no reconstruction initializer
    NotReconstructible {
        /// Target type name
        type_name: String,
    },

    /// No resolver in the chain provides a formatter for the type
    FormatterNotFound {
        /// Requested type name
        type_name: String,
    },

    /// A field requested by an initializer is absent from the bag
    MissingField {
        /// Type whose bag was searched
        type_name: String,
        /// Field name
        field: String,
    },

    /// A field value has a different type than requested
    TypeMismatch {
        /// Field name
        field: String,
        /// Requested type
        expected: String,
        /// Type found in the bag
        actual: String,
    },

    /// Nested values exceeded the configured depth
    DepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// Unsupported type or feature
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create an invalid marker error.
    pub fn invalid_marker(marker: u8, position: usize, expected: impl Into<String>) -> Self {
        CodecError::InvalidMarker {
            marker,
            position,
            expected: expected.into(),
        }
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(position: usize) -> Self {
        CodecError::InvalidUtf8 { position }
    }

    /// Create a "not reconstructible" error.
    pub fn not_reconstructible(type_name: impl Into<String>) -> Self {
        CodecError::NotReconstructible {
            type_name: type_name.into(),
        }
    }

    /// Create a "formatter not found" error.
    pub fn formatter_not_found(type_name: impl Into<String>) -> Self {
        CodecError::FormatterNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        CodecError::MissingField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        CodecError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a depth exceeded error.
    pub fn depth_exceeded(limit: usize) -> Self {
        CodecError::DepthExceeded { limit }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CodecError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Whether this error means the wire data itself is malformed.
    pub fn is_malformed_data(&self) -> bool {
        matches!(
            self,
            CodecError::BufferTooShort { .. }
                | CodecError::InvalidMarker { .. }
                | CodecError::InvalidUtf8 { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::InvalidMarker {
                marker,
                position,
                expected,
            } => vec![
                ("marker", format!("0x{marker:02x}")),
                ("position", position.to_string()),
                ("expected", expected.clone()),
            ],
            CodecError::InvalidUtf8 { position } => vec![("position", position.to_string())],
            CodecError::NotReconstructible { type_name } => vec![("type", type_name.clone())],
            CodecError::FormatterNotFound { type_name } => vec![("type", type_name.clone())],
            CodecError::MissingField { type_name, field } => {
                vec![("type", type_name.clone()), ("field", field.clone())]
            }
            CodecError::TypeMismatch {
                field,
                expected,
                actual,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.clone()),
                ("actual", actual.clone()),
            ],
            CodecError::DepthExceeded { limit } => vec![("limit", limit.to_string())],
            CodecError::Unsupported { feature } => vec![("feature", feature.clone())],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            CodecError::InvalidMarker {
                marker,
                position,
                expected,
            } => write!(
                f,
                "Invalid marker 0x{marker:02x} at position {position}, expected {expected}"
            ),
            CodecError::InvalidUtf8 { position } => {
                write!(f, "Invalid UTF-8 string at position {position}")
            }
            CodecError::NotReconstructible { type_name } => {
                write!(f, "Type '{type_name}' is not reconstructible from a field bag")
            }
            CodecError::FormatterNotFound { type_name } => {
                write!(f, "No formatter registered for type '{type_name}'")
            }
            CodecError::MissingField { type_name, field } => {
                write!(f, "Field '{field}' not found in bag for '{type_name}'")
            }
            CodecError::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Field '{field}' has type '{actual}', expected '{expected}'"
            ),
            CodecError::DepthExceeded { limit } => {
                write!(f, "Nesting depth exceeded limit of {limit}")
            }
            CodecError::Unsupported { feature } => {
                write!(f, "Unsupported feature: '{feature}'")
            }
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for fieldpack operations.
pub type Result<T> = std::result::Result<T, CodecError>;
