//! Statement compilation.
//!
//! A [`Compiler`] renders [`Statement`] trees into SQL text plus bind values.
//! Compilers are obtained from a dialect through
//! [`Dialect::compiler`](crate::dialect::Dialect::compiler) and use that
//! dialect for every type name and identifier they emit.
//!
//! ```rust
//! use oxide_dialect::compiler::{col, Compiler, Select};
//! use oxide_dialect::dialect::{DefaultDialect, Dialect};
//!
//! let dialect = DefaultDialect::with_escaping(true);
//! let query = dialect
//!     .compiler()
//!     .compile(&Select::from("users").columns(&["id"]).filter(col("name").eq("alice")).into())
//!     .unwrap();
//! assert_eq!(query.sql, "SELECT `id` FROM `users` WHERE `name` = ?");
//! ```

mod sql;
mod statement;

pub use sql::SqlCompiler;
pub use statement::{
    col, ColumnRef, CompareOp, Condition, CreateIndex, CreateTable, Delete, DropIndex, DropTable,
    Insert, Join, JoinKind, Order, Select, Statement, Update,
};

use crate::dialect::Dialect;
use crate::error::Result;
use crate::value::SqlValue;

/// Rendered SQL and its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL text, without a trailing terminator.
    pub sql: String,
    /// Values for the `?` placeholders.
    pub bindings: Vec<SqlValue>,
}

impl Query {
    /// Creates a query with no bindings.
    #[must_use]
    pub const fn new(sql: String) -> Self {
        Self {
            sql,
            bindings: Vec::new(),
        }
    }
}

/// Renders statements for a dialect.
pub trait Compiler {
    /// Returns the dialect this compiler is bound to.
    fn dialect(&self) -> &dyn Dialect;

    /// Compiles any statement.
    fn compile(&self, statement: &Statement) -> Result<Query> {
        match statement {
            Statement::CreateTable(stmt) => self.create_table(stmt),
            Statement::DropTable(stmt) => self.drop_table(stmt),
            Statement::CreateIndex(stmt) => self.create_index(stmt),
            Statement::DropIndex(stmt) => self.drop_index(stmt),
            Statement::Select(stmt) => self.select(stmt),
            Statement::Insert(stmt) => self.insert(stmt),
            Statement::Update(stmt) => self.update(stmt),
            Statement::Delete(stmt) => self.delete(stmt),
        }
    }

    /// Compiles CREATE TABLE.
    fn create_table(&self, stmt: &CreateTable) -> Result<Query>;

    /// Compiles DROP TABLE.
    fn drop_table(&self, stmt: &DropTable) -> Result<Query>;

    /// Compiles CREATE INDEX.
    fn create_index(&self, stmt: &CreateIndex) -> Result<Query>;

    /// Compiles DROP INDEX.
    fn drop_index(&self, stmt: &DropIndex) -> Result<Query>;

    /// Compiles SELECT.
    fn select(&self, stmt: &Select) -> Result<Query>;

    /// Compiles INSERT.
    fn insert(&self, stmt: &Insert) -> Result<Query>;

    /// Compiles UPDATE.
    fn update(&self, stmt: &Update) -> Result<Query>;

    /// Compiles DELETE.
    fn delete(&self, stmt: &Delete) -> Result<Query>;
}
