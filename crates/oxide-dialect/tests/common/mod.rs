#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use oxide_dialect::compiler::{Compiler, Query, SqlCompiler, Statement};
use oxide_dialect::dialect::{compile_type, escape_all, Dialect};
use oxide_dialect::error::{BoxError, Error, ErrorKind};
use oxide_dialect::schema::{ColumnElem, TypeElem};

/// Compiles a statement with the given dialect, panicking on failure.
pub fn compile(dialect: &dyn Dialect, stmt: impl Into<Statement>) -> Query {
    let stmt = stmt.into();
    dialect
        .compiler()
        .compile(&stmt)
        .unwrap_or_else(|e| panic!("Failed to compile {stmt:?}\nError: {e}"))
}

/// Compiles a statement expecting a failure.
pub fn compile_err(dialect: &dyn Dialect, stmt: impl Into<Statement>) -> Error {
    let stmt = stmt.into();
    dialect
        .compiler()
        .compile(&stmt)
        .expect_err(&format!("Expected compile error for {stmt:?}"))
}

/// A backend-style dialect: double-quote escaping, unsigned support and a
/// different auto-increment ordering, implemented from scratch.
#[derive(Debug, Default)]
pub struct QuotingDialect {
    escaping: AtomicBool,
}

#[derive(Debug, thiserror::Error)]
#[error("unique violation on {0}")]
pub struct UniqueViolation(pub String);

impl Dialect for QuotingDialect {
    fn compile_type(&self, type_elem: &TypeElem) -> String {
        compile_type(type_elem, self.supports_unsigned())
    }

    fn escape(&self, ident: &str) -> String {
        if self.escaping() {
            format!("\"{}\"", ident.replace('"', "\"\""))
        } else {
            String::from(ident)
        }
    }

    fn escape_all(&self, idents: &[&str]) -> Vec<String> {
        escape_all(self, idents)
    }

    fn set_escaping(&self, enabled: bool) {
        self.escaping.store(enabled, Ordering::Relaxed);
    }

    fn escaping(&self) -> bool {
        self.escaping.load(Ordering::Relaxed)
    }

    fn auto_increment(&self, column: &ColumnElem) -> String {
        let mut spec = format!("{} AUTO_INCREMENT", self.compile_type(&column.type_elem));
        if column.options.primary_key {
            spec.push_str(" PRIMARY KEY");
        }
        spec
    }

    fn supports_unsigned(&self) -> bool {
        true
    }

    fn driver(&self) -> &str {
        "quoting"
    }

    fn compiler(&self) -> Box<dyn Compiler + '_> {
        Box::new(SqlCompiler::new(self))
    }

    fn wrap_error(&self, err: BoxError) -> Error {
        let kind = if err.is::<UniqueViolation>() {
            ErrorKind::Integrity
        } else {
            ErrorKind::Database
        };
        Error::backend(kind, err).with_context(self.driver())
    }
}
