//! Default dialect, for drivers without a dialect of their own.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::compiler::{Compiler, SqlCompiler};
use crate::error::{BoxError, Error, ErrorKind};
use crate::schema::{ColumnElem, TypeElem};

use super::{compile_type, escape_all, Dialect};

/// Conservative dialect with no backend-specific knowledge.
///
/// Assumes no unsigned types, quotes identifiers with back-ticks when
/// escaping is on (off by default), and spells auto-increment columns
/// `AUTO INCREMENT`.
#[derive(Debug, Default)]
pub struct DefaultDialect {
    escaping: AtomicBool,
}

impl DefaultDialect {
    /// Creates a default dialect with escaping disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_escaping(false)
    }

    /// Creates a default dialect with the given escaping flag.
    #[must_use]
    pub const fn with_escaping(escaping: bool) -> Self {
        Self {
            escaping: AtomicBool::new(escaping),
        }
    }
}

impl Dialect for DefaultDialect {
    fn compile_type(&self, type_elem: &TypeElem) -> String {
        compile_type(type_elem, self.supports_unsigned())
    }

    fn escape(&self, ident: &str) -> String {
        if self.escaping() {
            format!("`{ident}`")
        } else {
            String::from(ident)
        }
    }

    fn escape_all(&self, idents: &[&str]) -> Vec<String> {
        escape_all(self, idents)
    }

    fn set_escaping(&self, enabled: bool) {
        trace!(enabled, "default dialect escaping toggled");
        self.escaping.store(enabled, Ordering::Relaxed);
    }

    fn escaping(&self) -> bool {
        self.escaping.load(Ordering::Relaxed)
    }

    fn auto_increment(&self, column: &ColumnElem) -> String {
        let mut spec = self.compile_type(&column.type_elem);
        if column.options.primary_key {
            spec.push_str(" PRIMARY KEY");
        }
        spec.push_str(" AUTO INCREMENT");
        spec
    }

    fn supports_unsigned(&self) -> bool {
        false
    }

    fn driver(&self) -> &str {
        ""
    }

    fn compiler(&self) -> Box<dyn Compiler + '_> {
        Box::new(SqlCompiler::new(self))
    }

    fn wrap_error(&self, err: BoxError) -> Error {
        debug!(error = %err, "wrapping backend error");
        Error::backend(ErrorKind::Any, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk I/O error")]
    struct DiskError;

    #[test]
    fn test_default_dialect_capabilities() {
        let dialect = DefaultDialect::new();
        assert!(!dialect.supports_unsigned());
        assert_eq!(dialect.driver(), "");
        assert!(!dialect.escaping());
    }

    #[test]
    fn test_escape() {
        let dialect = DefaultDialect::new();
        assert_eq!(dialect.escape("users"), "users");

        dialect.set_escaping(true);
        assert!(dialect.escaping());
        assert_eq!(dialect.escape("users"), "`users`");
        assert_eq!(dialect.escape(""), "``");

        dialect.set_escaping(false);
        assert!(!dialect.escaping());
        assert_eq!(dialect.escape("users"), "users");
    }

    #[test]
    fn test_escape_all() {
        let dialect = DefaultDialect::with_escaping(true);
        let idents = ["id", "name", "email"];
        assert_eq!(dialect.escape_all(&idents), vec!["`id`", "`name`", "`email`"]);
        assert_eq!(idents, ["id", "name", "email"]);
        assert!(dialect.escape_all(&[]).is_empty());
    }

    #[test]
    fn test_compile_type_is_never_unsigned() {
        let dialect = DefaultDialect::new();
        assert_eq!(dialect.compile_type(&TypeElem::int()), "INT");
        assert_eq!(dialect.compile_type(&TypeElem::int().unsigned()), "BIGINT");
    }

    #[test]
    fn test_auto_increment() {
        let dialect = DefaultDialect::new();

        let id = ColumnElem::new("id", TypeElem::int()).primary_key();
        assert_eq!(dialect.auto_increment(&id), "INT PRIMARY KEY AUTO INCREMENT");

        let seq = ColumnElem::new("seq", TypeElem::big_int());
        assert_eq!(dialect.auto_increment(&seq), "BIGINT AUTO INCREMENT");
    }

    #[test]
    fn test_wrap_error() {
        let dialect = DefaultDialect::new();
        let err = dialect.wrap_error(Box::new(DiskError));
        assert_eq!(err.kind(), Some(ErrorKind::Any));
        assert!(err.orig().and_then(|e| e.downcast_ref::<DiskError>()).is_some());
        assert!(err.context().is_none());
    }

    #[test]
    fn test_compiler_is_bound_to_dialect() {
        let dialect = DefaultDialect::with_escaping(true);
        let compiler = dialect.compiler();
        assert_eq!(compiler.dialect().escape("t"), "`t`");
    }
}
