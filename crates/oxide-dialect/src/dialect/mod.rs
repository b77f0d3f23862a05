//! SQL dialects.
//!
//! A dialect tells the rest of the crate how a particular database spells
//! things: DDL type names, identifier quoting and auto-increment columns. It
//! also hands out a [`Compiler`] that renders whole statements with those
//! rules, and turns native backend errors into [`Error`]s.
//!
//! [`DefaultDialect`] is the reference implementation, used when no
//! backend-specific dialect is available. Dialects are looked up by name
//! through a [`DialectRegistry`].

mod default;
mod registry;

pub use default::DefaultDialect;
pub use registry::{DialectConfig, DialectRegistry, DEFAULT_DIALECT};

use std::fmt::Debug;

use crate::compiler::Compiler;
use crate::error::{BoxError, Error};
use crate::schema::{ColumnElem, SqlType, TypeElem};

/// Database-specific SQL policy.
///
/// Every method is required: a backend dialect is a complete implementation
/// of its own. Shared behaviour lives in free functions such as
/// [`compile_type`] and [`escape_all`], which implementations may call.
///
/// Dialects are shared across threads, so the escaping toggle takes `&self`.
pub trait Dialect: Debug + Send + Sync {
    /// Returns the DDL type name for `type_elem`.
    fn compile_type(&self, type_elem: &TypeElem) -> String;

    /// Wraps an identifier in the dialect's quote characters when escaping is on.
    fn escape(&self, ident: &str) -> String;

    /// Escapes every identifier, preserving order.
    fn escape_all(&self, idents: &[&str]) -> Vec<String>;

    /// Turns identifier escaping on or off for subsequent calls.
    fn set_escaping(&self, enabled: bool);

    /// Returns whether identifier escaping is on.
    fn escaping(&self) -> bool;

    /// Returns the column spec of an auto-incrementing column: its type,
    /// `PRIMARY KEY` when the column is the primary key, then the dialect's
    /// auto-increment clause.
    fn auto_increment(&self, column: &ColumnElem) -> String;

    /// Returns whether the database has unsigned integer types.
    fn supports_unsigned(&self) -> bool;

    /// Returns the name of the driver this dialect targets.
    fn driver(&self) -> &str;

    /// Returns a statement compiler bound to this dialect.
    fn compiler(&self) -> Box<dyn Compiler + '_>;

    /// Normalizes a native backend error.
    fn wrap_error(&self, err: BoxError) -> Error;
}

/// Compiles a type into its DDL name.
///
/// When `supports_unsigned` is false, unsigned integer types are widened one
/// step so that the column can still hold the full unsigned range. Never fails:
/// a blank custom type name falls back to `TEXT`.
#[must_use]
pub fn compile_type(type_elem: &TypeElem, supports_unsigned: bool) -> String {
    let unsigned = type_elem.unsigned && type_elem.sql_type.is_integer();
    let widen = unsigned && !supports_unsigned;

    let name = match &type_elem.sql_type {
        SqlType::TinyInt if widen => String::from("SMALLINT"),
        SqlType::TinyInt => String::from("TINYINT"),
        SqlType::SmallInt if widen => String::from("INT"),
        SqlType::SmallInt => String::from("SMALLINT"),
        SqlType::Int if widen => String::from("BIGINT"),
        SqlType::Int => String::from("INT"),
        // Nothing wider to fall back to
        SqlType::BigInt => String::from("BIGINT"),
        SqlType::Float => String::from("FLOAT"),
        SqlType::Double => String::from("DOUBLE PRECISION"),
        SqlType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
        SqlType::Numeric(p, s) => format!("NUMERIC({p}, {s})"),
        SqlType::Char(Some(len)) => format!("CHAR({len})"),
        SqlType::Char(None) => String::from("CHAR"),
        SqlType::Varchar(Some(len)) => format!("VARCHAR({len})"),
        SqlType::Varchar(None) => String::from("VARCHAR(255)"),
        SqlType::Text | SqlType::Json => String::from("TEXT"),
        SqlType::Boolean => String::from("BOOLEAN"),
        SqlType::Date => String::from("DATE"),
        SqlType::Time => String::from("TIME"),
        SqlType::Timestamp => String::from("TIMESTAMP"),
        SqlType::Blob => String::from("BLOB"),
        SqlType::Uuid => String::from("CHAR(36)"),
        SqlType::Custom(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                String::from("TEXT")
            } else {
                String::from(raw)
            }
        }
    };

    if unsigned && supports_unsigned {
        format!("{name} UNSIGNED")
    } else {
        name
    }
}

/// Escapes every identifier through `dialect`, returning a new vector.
#[must_use]
pub fn escape_all<D: Dialect + ?Sized>(dialect: &D, idents: &[&str]) -> Vec<String> {
    idents.iter().map(|ident| dialect.escape(ident)).collect()
}
