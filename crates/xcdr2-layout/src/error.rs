// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for layout computation.
//!
//! Every failure is local to one traversal: a failed computation leaves the
//! type registry untouched and the writer can be [`reset`] and reused.
//!
//! [`reset`]: crate::SerializedSizeWriter::reset

use thiserror::Error;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by schema lookup, traversal and configuration.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Registry lookup of an unknown type identity.
    #[error("type not found: {name}")]
    TypeNotFound { name: String },

    /// Malformed or incomplete schema, or a value whose shape does not match it.
    #[error("schema integrity error in {type_name}: {reason}")]
    SchemaIntegrity { type_name: String, reason: String },

    /// Value Writer Protocol operations invoked out of schema order.
    #[error("protocol misuse: {operation} {state}")]
    ProtocolMisuse {
        operation: &'static str,
        state: String,
    },

    /// Encoding version other than XCDR2 requested.
    #[error("unsupported encoding version: {version}")]
    UnsupportedEncoding { version: String },

    /// Malformed configuration document.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    pub(crate) fn integrity(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaIntegrity {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn misuse(operation: &'static str, state: impl Into<String>) -> Self {
        Self::ProtocolMisuse {
            operation,
            state: state.into(),
        }
    }

    /// Returns `true` for errors caused by the schema or the value rather than the caller.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::TypeNotFound { .. } | Self::SchemaIntegrity { .. }
        )
    }
}
