//! # oxide-dialect
//!
//! Pluggable SQL dialects for statement builders.
//!
//! A [`Dialect`] decides how SQL is spelled for one database: DDL type names,
//! identifier quoting and auto-increment columns. It hands out a
//! [`Compiler`] that renders statement trees with those rules, and it is the
//! single place where native backend errors are turned into [`Error`]s.
//!
//! [`DefaultDialect`] is the conservative reference dialect. Dialects are
//! resolved by name through an explicitly constructed [`DialectRegistry`]:
//!
//! ```rust
//! use oxide_dialect::prelude::*;
//!
//! let registry = DialectRegistry::with_defaults();
//! let dialect = registry.require("default").unwrap();
//!
//! let id = ColumnElem::new("id", TypeElem::int()).primary_key().auto_increment();
//! assert_eq!(dialect.auto_increment(&id), "INT PRIMARY KEY AUTO INCREMENT");
//!
//! dialect.set_escaping(true);
//! assert_eq!(dialect.escape("users"), "`users`");
//! ```

pub mod compiler;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod value;

pub use compiler::{Compiler, Query, SqlCompiler, Statement};
pub use dialect::{DefaultDialect, Dialect, DialectConfig, DialectRegistry};
pub use error::{Error, ErrorKind, Result};
pub use schema::{ColumnElem, SqlType, TableElem, TypeElem};
pub use value::{SqlValue, ToSqlValue};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compiler::{
        col, Compiler, CreateIndex, CreateTable, Delete, DropIndex, DropTable, Insert, JoinKind,
        Order, Query, Select, SqlCompiler, Statement, Update,
    };
    pub use crate::dialect::{
        compile_type, escape_all, DefaultDialect, Dialect, DialectConfig, DialectRegistry,
    };
    pub use crate::error::{BoxError, Error, ErrorKind, Result};
    pub use crate::schema::{
        ColumnElem, ColumnOptions, ReferentialAction, SqlType, TableConstraint, TableElem,
        TypeElem,
    };
    pub use crate::value::{SqlValue, ToSqlValue};
}
