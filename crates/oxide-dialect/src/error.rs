//! Error types for dialects and statement compilation.
//!
//! Failures coming from below this crate (native drivers, backend servers)
//! are normalized through [`Dialect::wrap_error`](crate::dialect::Dialect::wrap_error)
//! into [`Error::Backend`], which keeps the original error as its source.

use std::fmt;

/// A boxed native error, as handed to [`Dialect::wrap_error`](crate::dialect::Dialect::wrap_error).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a wrapped backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    /// Unclassified failure.
    #[default]
    Any,
    /// Error in the database interface rather than the database itself.
    Interface,
    /// Error reported by the database.
    Database,
    /// Problem with the processed data (division by zero, value out of range).
    Data,
    /// Error related to the database's operation (disconnect, out of memory).
    Operational,
    /// Relational integrity violated (foreign key check, unique constraint).
    Integrity,
    /// Internal database error (cursor no longer valid, transaction out of sync).
    Internal,
    /// Programming error (table not found, syntax error).
    Programming,
    /// Method or API not supported by the database.
    NotSupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "backend",
            Self::Interface => "interface",
            Self::Database => "database",
            Self::Data => "data",
            Self::Operational => "operational",
            Self::Integrity => "integrity",
            Self::Internal => "internal",
            Self::Programming => "programming",
            Self::NotSupported => "not supported",
        };
        f.write_str(name)
    }
}

/// Errors produced by dialects, the registry and compilers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A native backend error, normalized at the dialect boundary.
    #[error("{kind} error: {source}")]
    Backend {
        /// Classification of the failure.
        kind: ErrorKind,
        /// The original error.
        #[source]
        source: BoxError,
        /// Optional structured context (statement, table, ...).
        context: Option<String>,
    },

    /// No dialect is registered under the requested name.
    #[error("Dialect not found: '{0}'")]
    DialectNotFound(String),

    /// The dialect cannot represent the requested column type.
    #[error("Dialect '{dialect}' does not support type {type_name}")]
    UnsupportedType {
        /// Driver name of the dialect.
        dialect: String,
        /// Debug rendering of the rejected type.
        type_name: String,
    },

    /// The statement tree cannot be rendered.
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),
}

impl Error {
    /// Wraps a native error with the given classification.
    #[must_use]
    pub fn backend(kind: ErrorKind, source: BoxError) -> Self {
        Self::Backend {
            kind,
            source,
            context: None,
        }
    }

    /// Attaches context to a backend error. Other variants are returned unchanged.
    #[must_use]
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        match self {
            Self::Backend { kind, source, .. } => Self::Backend {
                kind,
                source,
                context: Some(ctx.into()),
            },
            other => other,
        }
    }

    /// Returns the original native error, if this error wraps one.
    #[must_use]
    pub fn orig(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Backend { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Returns the classification of a backend error.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Backend { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the context attached to a backend error.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Backend { context, .. } => context.as_deref(),
            _ => None,
        }
    }
}

/// Result type for dialect operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct ConnReset;

    #[test]
    fn test_backend_error_display() {
        let err = Error::backend(ErrorKind::Operational, Box::new(ConnReset));
        assert_eq!(err.to_string(), "operational error: connection reset");
        assert_eq!(err.kind(), Some(ErrorKind::Operational));
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let err = Error::backend(ErrorKind::Any, Box::new(ConnReset));
        let source = err.source().expect("source");
        assert!(source.downcast_ref::<ConnReset>().is_some());
        assert!(err.orig().and_then(|e| e.downcast_ref::<ConnReset>()).is_some());
    }

    #[test]
    fn test_with_context() {
        let err = Error::backend(ErrorKind::Integrity, Box::new(ConnReset))
            .with_context("INSERT INTO users");
        assert_eq!(err.context(), Some("INSERT INTO users"));

        let not_found = Error::DialectNotFound("mysql".into()).with_context("ignored");
        assert!(not_found.context().is_none());
        assert!(not_found.orig().is_none());
        assert_eq!(not_found.to_string(), "Dialect not found: 'mysql'");
    }
}
