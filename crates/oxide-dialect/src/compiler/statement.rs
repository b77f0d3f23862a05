//! Statement trees.
//!
//! Statements hold raw identifiers and values only. Quoting, type names and
//! placeholders are decided when a [`Compiler`](super::Compiler) renders them.

use crate::schema::TableElem;
use crate::value::{SqlValue, ToSqlValue};

/// Creates a column reference. `"users.id"` is split into table and column.
#[must_use]
pub fn col(name: &str) -> ColumnRef {
    ColumnRef::from(name)
}

/// A possibly table-qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name, or `*`.
    pub name: String,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    fn compare<T: ToSqlValue>(self, op: CompareOp, value: T) -> Condition {
        Condition::Compare {
            column: self,
            op,
            value: value.to_sql_value(),
        }
    }

    /// `column = value`
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::Eq, value)
    }

    /// `column != value`
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::NotEq, value)
    }

    /// `column < value`
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::Lt, value)
    }

    /// `column <= value`
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::LtEq, value)
    }

    /// `column > value`
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::Gt, value)
    }

    /// `column >= value`
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Condition {
        self.compare(CompareOp::GtEq, value)
    }

    /// `column LIKE pattern`
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Condition {
        self.compare(CompareOp::Like, pattern)
    }

    /// `column IN (...)`
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Condition {
        Condition::In {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (...)`
    #[must_use]
    pub fn not_in<T: ToSqlValue>(self, values: Vec<T>) -> Condition {
        Condition::In {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: true,
        }
    }

    /// `column IS NULL`
    #[must_use]
    pub const fn is_null(self) -> Condition {
        Condition::IsNull {
            column: self,
            negated: false,
        }
    }

    /// `column IS NOT NULL`
    #[must_use]
    pub const fn is_not_null(self) -> Condition {
        Condition::IsNull {
            column: self,
            negated: true,
        }
    }

    /// `column BETWEEN low AND high`
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Condition {
        Condition::Between {
            column: self,
            low: low.to_sql_value(),
            high: high.to_sql_value(),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        match name.split_once('.') {
            Some((table, column)) => Self::qualified(table, column),
            None => Self::new(name),
        }
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
}

impl CompareOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// A WHERE / HAVING condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> ?`
    Compare {
        /// Left-hand column.
        column: ColumnRef,
        /// Operator.
        op: CompareOp,
        /// Bound right-hand value.
        value: SqlValue,
    },
    /// `column [NOT] IN (?, ...)`
    In {
        /// Tested column.
        column: ColumnRef,
        /// Bound candidates.
        values: Vec<SqlValue>,
        /// `NOT IN` when true.
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    IsNull {
        /// Tested column.
        column: ColumnRef,
        /// `IS NOT NULL` when true.
        negated: bool,
    },
    /// `column BETWEEN ? AND ?`
    Between {
        /// Tested column.
        column: ColumnRef,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
    },
    /// Conjunction. Empty is always true.
    And(Vec<Condition>),
    /// Disjunction. Empty is always false.
    Or(Vec<Condition>),
    /// Negation.
    Not(Box<Condition>),
}

impl Condition {
    /// Combines with AND, flattening nested conjunctions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut conds) => {
                conds.push(other);
                Self::And(conds)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Combines with OR, flattening nested disjunctions.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut conds) => {
                conds.push(other);
                Self::Or(conds)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Negates the condition.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
}

/// A join on column equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join flavour.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// `left = right` pairs, combined with AND.
    pub on: Vec<(ColumnRef, ColumnRef)>,
}

/// `CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// Table definition.
    pub table: TableElem,
    /// Adds `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl CreateTable {
    /// Creates a CREATE TABLE statement.
    #[must_use]
    pub const fn new(table: TableElem) -> Self {
        Self {
            table,
            if_not_exists: false,
        }
    }

    /// Adds `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// `DROP TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    /// Table name.
    pub name: String,
    /// Adds `IF EXISTS`.
    pub if_exists: bool,
}

impl DropTable {
    /// Creates a DROP TABLE statement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    /// Adds `IF EXISTS`.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

/// `CREATE INDEX`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: String,
    /// Indexed columns.
    pub columns: Vec<String>,
    /// `CREATE UNIQUE INDEX` when true.
    pub unique: bool,
    /// Adds `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl CreateIndex {
    /// Creates a CREATE INDEX statement.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.iter().map(|c| String::from(*c)).collect(),
            unique: false,
            if_not_exists: false,
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds `IF NOT EXISTS`.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// `DROP INDEX`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndex {
    /// Index name.
    pub name: String,
    /// Adds `IF EXISTS`.
    pub if_exists: bool,
}

impl DropIndex {
    /// Creates a DROP INDEX statement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    /// Adds `IF EXISTS`.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

/// `SELECT`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Adds `DISTINCT`.
    pub distinct: bool,
    /// Selected columns; empty selects `*`.
    pub columns: Vec<ColumnRef>,
    /// Source table.
    pub from: String,
    /// Joins, in order.
    pub joins: Vec<Join>,
    /// WHERE condition.
    pub where_clause: Option<Condition>,
    /// GROUP BY columns.
    pub group_by: Vec<ColumnRef>,
    /// HAVING condition.
    pub having: Option<Condition>,
    /// ORDER BY terms.
    pub order_by: Vec<(ColumnRef, Order)>,
    /// LIMIT.
    pub limit: Option<u64>,
    /// OFFSET.
    pub offset: Option<u64>,
}

impl Select {
    /// Starts a SELECT over `table`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            distinct: false,
            columns: Vec::new(),
            from: table.into(),
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Sets the selected columns.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|c| ColumnRef::from(*c)).collect();
        self
    }

    /// Adds `DISTINCT`.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds an equality join.
    #[must_use]
    pub fn join(
        mut self,
        kind: JoinKind,
        table: impl Into<String>,
        left: &str,
        right: &str,
    ) -> Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on: vec![(ColumnRef::from(left), ColumnRef::from(right))],
        });
        self
    }

    /// Adds a WHERE condition, ANDed with any existing one.
    #[must_use]
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(cond),
            None => cond,
        });
        self
    }

    /// Sets the GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by = cols.iter().map(|c| ColumnRef::from(*c)).collect();
        self
    }

    /// Sets the HAVING condition.
    #[must_use]
    pub fn having(mut self, cond: Condition) -> Self {
        self.having = Some(cond);
        self
    }

    /// Adds an ORDER BY term.
    #[must_use]
    pub fn order_by(mut self, column: &str, order: Order) -> Self {
        self.order_by.push((ColumnRef::from(column), order));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

/// `INSERT`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target table.
    pub table: String,
    /// Target columns.
    pub columns: Vec<String>,
    /// Rows of values, one per column.
    pub rows: Vec<Vec<SqlValue>>,
}

impl Insert {
    /// Starts an INSERT into `table`.
    #[must_use]
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Sets the target columns.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Adds a row.
    #[must_use]
    pub fn values(mut self, row: Vec<SqlValue>) -> Self {
        self.rows.push(row);
        self
    }
}

/// `UPDATE`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Target table.
    pub table: String,
    /// `column = value` assignments.
    pub assignments: Vec<(String, SqlValue)>,
    /// WHERE condition.
    pub where_clause: Option<Condition>,
}

impl Update {
    /// Starts an UPDATE of `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            where_clause: None,
        }
    }

    /// Adds an assignment.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.assignments
            .push((String::from(column), value.to_sql_value()));
        self
    }

    /// Adds a WHERE condition, ANDed with any existing one.
    #[must_use]
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(cond),
            None => cond,
        });
        self
    }
}

/// `DELETE`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Target table.
    pub table: String,
    /// WHERE condition.
    pub where_clause: Option<Condition>,
}

impl Delete {
    /// Starts a DELETE from `table`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    /// Adds a WHERE condition, ANDed with any existing one.
    #[must_use]
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(cond),
            None => cond,
        });
        self
    }
}

/// Any statement a [`Compiler`](super::Compiler) can render.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `CREATE TABLE`
    CreateTable(CreateTable),
    /// `DROP TABLE`
    DropTable(DropTable),
    /// `CREATE INDEX`
    CreateIndex(CreateIndex),
    /// `DROP INDEX`
    DropIndex(DropIndex),
    /// `SELECT`
    Select(Select),
    /// `INSERT`
    Insert(Insert),
    /// `UPDATE`
    Update(Update),
    /// `DELETE`
    Delete(Delete),
}

macro_rules! impl_from_statement {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Statement {
                fn from(stmt: $variant) -> Self {
                    Self::$variant(stmt)
                }
            }
        )*
    };
}

impl_from_statement!(
    CreateTable,
    DropTable,
    CreateIndex,
    DropIndex,
    Select,
    Insert,
    Update,
    Delete
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_splits_qualifier() {
        assert_eq!(col("users.id"), ColumnRef::qualified("users", "id"));
        assert_eq!(col("id"), ColumnRef::new("id"));
    }

    #[test]
    fn test_condition_and_flattens() {
        let cond = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
        match cond {
            Condition::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("Expected AND, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_accumulates() {
        let select = Select::from("users")
            .filter(col("active").eq(true))
            .filter(col("age").gt(18));
        assert!(matches!(select.where_clause, Some(Condition::And(ref parts)) if parts.len() == 2));
    }

    #[test]
    fn test_statement_from() {
        let stmt: Statement = DropTable::new("users").if_exists().into();
        assert!(matches!(stmt, Statement::DropTable(DropTable { if_exists: true, .. })));
    }
}
