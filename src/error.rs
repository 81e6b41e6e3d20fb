//! Error types used by the listener registry and the diagnostic sink.
//!
//! This module defines two main error enums:
//!
//! - [`DiagnosticError`]: a failed assertion or a deprecation resolved to `RAISE`.
//! - [`ListenerError`]: a listener operation addressed a node that does not exist.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Advisory conditions (duplicate registration, removing an unknown listener) are
//! never errors; they go through [`warn`](crate::diagnostics::warn) instead.

use thiserror::Error;

use crate::listeners::NodeId;

/// # Errors produced by the diagnostic sink.
///
/// These are the only failures that abort a calling code path: an assertion whose
/// test is falsy, or a deprecation whose resolved level is
/// [`DeprecationLevel::Raise`](crate::DeprecationLevel::Raise).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticError {
    /// An `assert` call saw a falsy test.
    #[error("Assertion Failed: {message}")]
    AssertionFailed {
        /// The assertion description.
        message: String,
    },

    /// A `deprecate` call saw a falsy test while its level resolved to `RAISE`.
    #[error("{message}")]
    Deprecation {
        /// Full deprecation message (already suffixed with the id, if any).
        message: String,
        /// Deprecation id from the call options.
        id: Option<String>,
    },
}

impl DiagnosticError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use protolisten::DiagnosticError;
    ///
    /// let err = DiagnosticError::AssertionFailed { message: "boom".into() };
    /// assert_eq!(err.as_label(), "assertion_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DiagnosticError::AssertionFailed { .. } => "assertion_failed",
            DiagnosticError::Deprecation { .. } => "deprecation_raised",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DiagnosticError::AssertionFailed { message } => format!("assertion: {message}"),
            DiagnosticError::Deprecation { message, id: Some(id) } => {
                format!("deprecation ({id}): {message}")
            }
            DiagnosticError::Deprecation { message, id: None } => {
                format!("deprecation: {message}")
            }
        }
    }

    /// The deprecation id carried by this error, if any.
    pub fn deprecation_id(&self) -> Option<&str> {
        match self {
            DiagnosticError::Deprecation { id, .. } => id.as_deref(),
            DiagnosticError::AssertionFailed { .. } => None,
        }
    }
}

/// # Errors produced by listener table operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerError {
    /// The node handle is stale (destroyed) or was never issued by this registry.
    #[error("listener node {node:?} not found")]
    NodeNotFound {
        /// The offending handle.
        node: NodeId,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::NodeNotFound { .. } => "listener_node_not_found",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::NodeNotFound { node } => format!("unknown node: {node}"),
        }
    }
}
