//! Schema descriptors consumed by dialects and compilers.
//!
//! These types describe column types, columns and tables. Dialects read them
//! to produce DDL fragments; they never modify them.

use serde::{Deserialize, Serialize};

/// Logical SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Tiny integer (8-bit).
    TinyInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Integer (32-bit).
    Int,
    /// Big integer (64-bit).
    BigInt,
    /// Floating point (single precision).
    Float,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// Numeric with precision and scale.
    Numeric(u8, u8),
    /// Fixed-length character string.
    Char(Option<usize>),
    /// Variable-length character string.
    Varchar(Option<usize>),
    /// Unbounded text.
    Text,
    /// Boolean.
    Boolean,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
    /// Binary large object.
    Blob,
    /// UUID.
    Uuid,
    /// JSON document.
    Json,
    /// Backend-specific type name, emitted verbatim.
    Custom(String),
}

impl SqlType {
    /// Returns whether this is one of the integer types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt
        )
    }
}

/// A column type: the logical type plus its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeElem {
    /// Logical type.
    pub sql_type: SqlType,
    /// Whether the column only holds non-negative numbers.
    #[serde(default)]
    pub unsigned: bool,
}

impl TypeElem {
    /// Creates a type element from a logical type.
    #[must_use]
    pub const fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            unsigned: false,
        }
    }

    /// `TINYINT`
    #[must_use]
    pub const fn tiny_int() -> Self {
        Self::new(SqlType::TinyInt)
    }

    /// `SMALLINT`
    #[must_use]
    pub const fn small_int() -> Self {
        Self::new(SqlType::SmallInt)
    }

    /// `INT`
    #[must_use]
    pub const fn int() -> Self {
        Self::new(SqlType::Int)
    }

    /// `BIGINT`
    #[must_use]
    pub const fn big_int() -> Self {
        Self::new(SqlType::BigInt)
    }

    /// `FLOAT`
    #[must_use]
    pub const fn float() -> Self {
        Self::new(SqlType::Float)
    }

    /// Double precision float.
    #[must_use]
    pub const fn double() -> Self {
        Self::new(SqlType::Double)
    }

    /// `DECIMAL(precision, scale)`
    #[must_use]
    pub const fn decimal(precision: u8, scale: u8) -> Self {
        Self::new(SqlType::Decimal(precision, scale))
    }

    /// `NUMERIC(precision, scale)`
    #[must_use]
    pub const fn numeric(precision: u8, scale: u8) -> Self {
        Self::new(SqlType::Numeric(precision, scale))
    }

    /// `CHAR` without an explicit length.
    #[must_use]
    pub const fn char() -> Self {
        Self::new(SqlType::Char(None))
    }

    /// `VARCHAR(255)`; use [`size`](Self::size) for another length.
    #[must_use]
    pub const fn varchar() -> Self {
        Self::new(SqlType::Varchar(Some(255)))
    }

    /// `TEXT`
    #[must_use]
    pub const fn text() -> Self {
        Self::new(SqlType::Text)
    }

    /// `BOOLEAN`
    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(SqlType::Boolean)
    }

    /// `DATE`
    #[must_use]
    pub const fn date() -> Self {
        Self::new(SqlType::Date)
    }

    /// `TIME`
    #[must_use]
    pub const fn time() -> Self {
        Self::new(SqlType::Time)
    }

    /// `TIMESTAMP`
    #[must_use]
    pub const fn timestamp() -> Self {
        Self::new(SqlType::Timestamp)
    }

    /// `BLOB`
    #[must_use]
    pub const fn blob() -> Self {
        Self::new(SqlType::Blob)
    }

    /// UUID.
    #[must_use]
    pub const fn uuid() -> Self {
        Self::new(SqlType::Uuid)
    }

    /// JSON.
    #[must_use]
    pub const fn json() -> Self {
        Self::new(SqlType::Json)
    }

    /// A raw backend type name.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(SqlType::Custom(name.into()))
    }

    /// Marks the type as unsigned. Only meaningful for integer types.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Sets the length of a `CHAR` or `VARCHAR` type; ignored for other types.
    #[must_use]
    pub fn size(mut self, len: usize) -> Self {
        match &mut self.sql_type {
            SqlType::Char(size) | SqlType::Varchar(size) => *size = Some(len),
            _ => {}
        }
        self
    }
}

/// Column-level options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Whether the column rejects NULL.
    pub not_null: bool,
    /// Whether the column has a UNIQUE constraint.
    pub unique: bool,
    /// Default value as a raw SQL expression.
    pub default: Option<String>,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnElem {
    /// Column name.
    pub name: String,
    /// Column type.
    pub type_elem: TypeElem,
    /// Column options.
    #[serde(default)]
    pub options: ColumnOptions,
}

impl ColumnElem {
    /// Creates a nullable column with no options set.
    #[must_use]
    pub fn new(name: impl Into<String>, type_elem: TypeElem) -> Self {
        Self {
            name: name.into(),
            type_elem,
            options: ColumnOptions::default(),
        }
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.options.primary_key = true;
        self.options.not_null = true; // Primary keys are always NOT NULL
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.options.auto_increment = true;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.options.not_null = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.options.unique = true;
        self
    }

    /// Sets the default value expression (e.g. `CURRENT_TIMESTAMP`, `'n/a'`).
    #[must_use]
    pub fn default(mut self, expr: impl Into<String>) -> Self {
        self.options.default = Some(expr.into());
        self
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// No action.
    NoAction,
    /// Restrict.
    Restrict,
    /// Cascade to referencing rows.
    Cascade,
    /// Set referencing columns to NULL.
    SetNull,
    /// Set referencing columns to their default.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL keyword for this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Table-level constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableConstraint {
    /// Primary key over one or more columns.
    PrimaryKey(Vec<String>),
    /// Named unique constraint.
    Unique {
        /// Constraint name.
        name: String,
        /// Constrained columns.
        columns: Vec<String>,
    },
    /// Foreign key reference.
    ForeignKey {
        /// Referencing columns.
        columns: Vec<String>,
        /// Referenced table.
        ref_table: String,
        /// Referenced columns.
        ref_columns: Vec<String>,
        /// ON DELETE action.
        on_delete: Option<ReferentialAction>,
        /// ON UPDATE action.
        on_update: Option<ReferentialAction>,
    },
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableElem {
    /// Table name.
    pub name: String,
    /// Column definitions, in order.
    pub columns: Vec<ColumnElem>,
    /// Table-level constraints.
    #[serde(default)]
    pub constraints: Vec<TableConstraint>,
}

impl TableElem {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnElem) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a table constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds a primary key over the given columns.
    #[must_use]
    pub fn primary_key(self, columns: &[&str]) -> Self {
        self.constraint(TableConstraint::PrimaryKey(
            columns.iter().map(|c| String::from(*c)).collect(),
        ))
    }

    /// Adds a named unique constraint.
    #[must_use]
    pub fn unique(self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.constraint(TableConstraint::Unique {
            name: name.into(),
            columns: columns.iter().map(|c| String::from(*c)).collect(),
        })
    }

    /// Adds a foreign key without referential actions.
    #[must_use]
    pub fn foreign_key(self, columns: &[&str], ref_table: &str, ref_columns: &[&str]) -> Self {
        self.constraint(TableConstraint::ForeignKey {
            columns: columns.iter().map(|c| String::from(*c)).collect(),
            ref_table: String::from(ref_table),
            ref_columns: ref_columns.iter().map(|c| String::from(*c)).collect(),
            on_delete: None,
            on_update: None,
        })
    }

    /// Returns the column with the given name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnElem> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary key columns, from column options or a table constraint.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        let explicit = self.constraints.iter().find_map(|c| match c {
            TableConstraint::PrimaryKey(cols) => Some(cols),
            _ => None,
        });
        match explicit {
            Some(cols) => cols.iter().map(String::as_str).collect(),
            None => self
                .columns
                .iter()
                .filter(|c| c.options.primary_key)
                .map(|c| c.name.as_str())
                .collect(),
        }
    }
}
