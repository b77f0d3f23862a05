//! Generic SQL compiler.

use tracing::trace;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::schema::{ColumnElem, TableConstraint, TableElem};
use crate::value::SqlValue;

use super::statement::{
    ColumnRef, Condition, CreateIndex, CreateTable, Delete, DropIndex, DropTable, Insert, JoinKind,
    Order, Select, Update,
};
use super::{Compiler, Query};

/// ANSI-style compiler with `?` placeholders.
///
/// Borrows its dialect for identifier escaping, type names and auto-increment
/// columns, so the dialect's escaping flag is read at compile time.
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> SqlCompiler<'a> {
    /// Creates a compiler bound to `dialect`.
    #[must_use]
    pub const fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    fn column_ref(&self, column: &ColumnRef) -> String {
        let name = if column.name == "*" {
            String::from("*")
        } else {
            self.dialect.escape(&column.name)
        };
        match &column.table {
            Some(table) => format!("{}.{name}", self.dialect.escape(table)),
            None => name,
        }
    }

    fn column_list(&self, columns: &[String]) -> String {
        let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.dialect.escape_all(&refs).join(", ")
    }

    /// Renders a column definition for CREATE TABLE.
    ///
    /// `inline_pk` is false when the primary key is emitted as a table
    /// constraint instead.
    fn column_definition(&self, column: &ColumnElem, inline_pk: bool) -> String {
        let name = self.dialect.escape(&column.name);
        let pk = column.options.primary_key && inline_pk;

        let mut parts = vec![name];
        if column.options.auto_increment {
            // The dialect's fragment carries the type and the inline PK
            if pk == column.options.primary_key {
                parts.push(self.dialect.auto_increment(column));
            } else {
                let mut plain = column.clone();
                plain.options.primary_key = false;
                parts.push(self.dialect.auto_increment(&plain));
            }
            if column.options.not_null && !pk {
                parts.push(String::from("NOT NULL"));
            }
        } else {
            parts.push(self.dialect.compile_type(&column.type_elem));
            if pk {
                parts.push(String::from("PRIMARY KEY"));
            } else if column.options.not_null {
                parts.push(String::from("NOT NULL"));
            }
        }
        if column.options.unique && !pk {
            parts.push(String::from("UNIQUE"));
        }
        if let Some(default) = &column.options.default {
            parts.push(format!("DEFAULT {default}"));
        }
        parts.join(" ")
    }

    fn table_constraint(&self, constraint: &TableConstraint) -> String {
        match constraint {
            TableConstraint::PrimaryKey(columns) => {
                format!("PRIMARY KEY ({})", self.column_list(columns))
            }
            TableConstraint::Unique { name, columns } => format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.dialect.escape(name),
                self.column_list(columns)
            ),
            TableConstraint::ForeignKey {
                columns,
                ref_table,
                ref_columns,
                on_delete,
                on_update,
            } => {
                let mut sql = format!(
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    self.column_list(columns),
                    self.dialect.escape(ref_table),
                    self.column_list(ref_columns)
                );
                if let Some(action) = on_delete {
                    sql.push_str(" ON DELETE ");
                    sql.push_str(action.as_sql());
                }
                if let Some(action) = on_update {
                    sql.push_str(" ON UPDATE ");
                    sql.push_str(action.as_sql());
                }
                sql
            }
        }
    }

    fn table_body(&self, table: &TableElem) -> Vec<String> {
        let explicit_pk = table
            .constraints
            .iter()
            .any(|c| matches!(c, TableConstraint::PrimaryKey(_)));
        let pk_columns = table.primary_key_columns();
        let inline_pk = !explicit_pk && pk_columns.len() == 1;

        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c, inline_pk))
            .collect();

        // Several columns flagged as primary key become one composite constraint
        if !explicit_pk && pk_columns.len() > 1 {
            let columns: Vec<String> = pk_columns.into_iter().map(String::from).collect();
            lines.push(self.table_constraint(&TableConstraint::PrimaryKey(columns)));
        }
        lines.extend(table.constraints.iter().map(|c| self.table_constraint(c)));
        lines
    }

    fn condition(&self, cond: &Condition, nested: bool, bindings: &mut Vec<SqlValue>) -> String {
        match cond {
            Condition::Compare { column, op, value } => {
                bindings.push(value.clone());
                format!("{} {} ?", self.column_ref(column), op.as_sql())
            }
            Condition::In {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    // IN () is not valid SQL
                    return String::from(if *negated { "1 = 1" } else { "1 = 0" });
                }
                bindings.extend(values.iter().cloned());
                let placeholders = vec!["?"; values.len()].join(", ");
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {op} ({placeholders})", self.column_ref(column))
            }
            Condition::IsNull { column, negated } => {
                let op = if *negated { "IS NOT NULL" } else { "IS NULL" };
                format!("{} {op}", self.column_ref(column))
            }
            Condition::Between { column, low, high } => {
                bindings.push(low.clone());
                bindings.push(high.clone());
                format!("{} BETWEEN ? AND ?", self.column_ref(column))
            }
            Condition::And(conds) => self.junction(conds, "AND", "1 = 1", nested, bindings),
            Condition::Or(conds) => self.junction(conds, "OR", "1 = 0", nested, bindings),
            Condition::Not(inner) => {
                format!("NOT ({})", self.condition(inner, false, bindings))
            }
        }
    }

    fn junction(
        &self,
        conds: &[Condition],
        keyword: &str,
        empty: &str,
        nested: bool,
        bindings: &mut Vec<SqlValue>,
    ) -> String {
        match conds {
            [] => String::from(empty),
            [single] => self.condition(single, nested, bindings),
            _ => {
                let parts: Vec<String> = conds
                    .iter()
                    .map(|c| self.condition(c, true, bindings))
                    .collect();
                let separator = format!(" {keyword} ");
                let joined = parts.join(separator.as_str());
                if nested {
                    format!("({joined})")
                } else {
                    joined
                }
            }
        }
    }

    fn where_clause(
        &self,
        cond: Option<&Condition>,
        sql: &mut String,
        bindings: &mut Vec<SqlValue>,
    ) {
        if let Some(cond) = cond {
            sql.push_str(" WHERE ");
            sql.push_str(&self.condition(cond, false, bindings));
        }
    }

    fn finish(sql: String, bindings: Vec<SqlValue>) -> Query {
        trace!(sql = %sql, bindings = bindings.len(), "compiled statement");
        Query { sql, bindings }
    }
}

impl Compiler for SqlCompiler<'_> {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    fn create_table(&self, stmt: &CreateTable) -> Result<Query> {
        if stmt.table.columns.is_empty() {
            return Err(Error::InvalidStatement(format!(
                "table '{}' has no columns",
                stmt.table.name
            )));
        }

        let mut sql = String::from("CREATE TABLE ");
        if stmt.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.dialect.escape(&stmt.table.name));
        sql.push_str(" (\n    ");
        sql.push_str(&self.table_body(&stmt.table).join(",\n    "));
        sql.push_str("\n)");
        Ok(Self::finish(sql, Vec::new()))
    }

    fn drop_table(&self, stmt: &DropTable) -> Result<Query> {
        let mut sql = String::from("DROP TABLE ");
        if stmt.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.dialect.escape(&stmt.name));
        Ok(Self::finish(sql, Vec::new()))
    }

    fn create_index(&self, stmt: &CreateIndex) -> Result<Query> {
        if stmt.columns.is_empty() {
            return Err(Error::InvalidStatement(format!(
                "index '{}' has no columns",
                stmt.name
            )));
        }

        let mut sql = String::from("CREATE ");
        if stmt.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        if stmt.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&format!(
            "{} ON {} ({})",
            self.dialect.escape(&stmt.name),
            self.dialect.escape(&stmt.table),
            self.column_list(&stmt.columns)
        ));
        Ok(Self::finish(sql, Vec::new()))
    }

    fn drop_index(&self, stmt: &DropIndex) -> Result<Query> {
        let mut sql = String::from("DROP INDEX ");
        if stmt.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.dialect.escape(&stmt.name));
        Ok(Self::finish(sql, Vec::new()))
    }

    fn select(&self, stmt: &Select) -> Result<Query> {
        let mut bindings = Vec::new();
        let mut sql = String::from("SELECT ");
        if stmt.distinct {
            sql.push_str("DISTINCT ");
        }

        if stmt.columns.is_empty() {
            sql.push('*');
        } else {
            let cols: Vec<String> = stmt.columns.iter().map(|c| self.column_ref(c)).collect();
            sql.push_str(&cols.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.dialect.escape(&stmt.from));

        for join in &stmt.joins {
            let keyword = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
                JoinKind::Right => "RIGHT JOIN",
            };
            let on: Vec<String> = join
                .on
                .iter()
                .map(|(left, right)| {
                    format!("{} = {}", self.column_ref(left), self.column_ref(right))
                })
                .collect();
            sql.push_str(&format!(
                " {keyword} {} ON {}",
                self.dialect.escape(&join.table),
                on.join(" AND ")
            ));
        }

        self.where_clause(stmt.where_clause.as_ref(), &mut sql, &mut bindings);

        if !stmt.group_by.is_empty() {
            let cols: Vec<String> = stmt.group_by.iter().map(|c| self.column_ref(c)).collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&cols.join(", "));
        }

        if let Some(having) = &stmt.having {
            sql.push_str(" HAVING ");
            sql.push_str(&self.condition(having, false, &mut bindings));
        }

        if !stmt.order_by.is_empty() {
            let terms: Vec<String> = stmt
                .order_by
                .iter()
                .map(|(column, order)| {
                    let dir = match order {
                        Order::Asc => "ASC",
                        Order::Desc => "DESC",
                    };
                    format!("{} {dir}", self.column_ref(column))
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(limit) = stmt.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = stmt.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(Self::finish(sql, bindings))
    }

    fn insert(&self, stmt: &Insert) -> Result<Query> {
        if stmt.rows.is_empty() {
            return Err(Error::InvalidStatement(format!(
                "insert into '{}' has no rows",
                stmt.table
            )));
        }
        let width = if stmt.columns.is_empty() {
            stmt.rows[0].len()
        } else {
            stmt.columns.len()
        };
        if width == 0 {
            return Err(Error::InvalidStatement(format!(
                "insert into '{}' has no values",
                stmt.table
            )));
        }
        if let Some(bad) = stmt.rows.iter().find(|row| row.len() != width) {
            return Err(Error::InvalidStatement(format!(
                "insert into '{}' expects {width} values per row, got {}",
                stmt.table,
                bad.len()
            )));
        }

        let mut sql = String::from("INSERT INTO ");
        sql.push_str(&self.dialect.escape(&stmt.table));
        if !stmt.columns.is_empty() {
            sql.push_str(&format!(" ({})", self.column_list(&stmt.columns)));
        }

        let row = format!("({})", vec!["?"; width].join(", "));
        sql.push_str(" VALUES ");
        sql.push_str(&vec![row.as_str(); stmt.rows.len()].join(", "));

        let bindings = stmt.rows.iter().flatten().cloned().collect();
        Ok(Self::finish(sql, bindings))
    }

    fn update(&self, stmt: &Update) -> Result<Query> {
        if stmt.assignments.is_empty() {
            return Err(Error::InvalidStatement(format!(
                "update of '{}' has no assignments",
                stmt.table
            )));
        }

        let mut bindings = Vec::with_capacity(stmt.assignments.len());
        let sets: Vec<String> = stmt
            .assignments
            .iter()
            .map(|(column, value)| {
                bindings.push(value.clone());
                format!("{} = ?", self.dialect.escape(column))
            })
            .collect();

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.dialect.escape(&stmt.table),
            sets.join(", ")
        );
        self.where_clause(stmt.where_clause.as_ref(), &mut sql, &mut bindings);
        Ok(Self::finish(sql, bindings))
    }

    fn delete(&self, stmt: &Delete) -> Result<Query> {
        let mut bindings = Vec::new();
        let mut sql = format!("DELETE FROM {}", self.dialect.escape(&stmt.table));
        self.where_clause(stmt.where_clause.as_ref(), &mut sql, &mut bindings);
        Ok(Self::finish(sql, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::col;
    use crate::dialect::DefaultDialect;

    #[test]
    fn test_nested_conditions_are_parenthesized() {
        let dialect = DefaultDialect::new();
        let compiler = SqlCompiler::new(&dialect);
        let cond = col("a")
            .eq(1)
            .and(col("b").eq(2).or(col("c").eq(3)));
        let mut bindings = Vec::new();
        let sql = compiler.condition(&cond, false, &mut bindings);
        assert_eq!(sql, "a = ? AND (b = ? OR c = ?)");
        assert_eq!(
            bindings,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_empty_junctions() {
        let dialect = DefaultDialect::new();
        let compiler = SqlCompiler::new(&dialect);
        let mut bindings = Vec::new();
        assert_eq!(
            compiler.condition(&Condition::And(vec![]), false, &mut bindings),
            "1 = 1"
        );
        assert_eq!(
            compiler.condition(&Condition::Or(vec![]), false, &mut bindings),
            "1 = 0"
        );
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_star_is_never_escaped() {
        let dialect = DefaultDialect::with_escaping(true);
        let compiler = SqlCompiler::new(&dialect);
        assert_eq!(compiler.column_ref(&col("*")), "*");
        assert_eq!(compiler.column_ref(&col("u.*")), "`u`.*");
        assert_eq!(compiler.column_ref(&col("u.id")), "`u`.`id`");
    }

    #[test]
    fn test_column_definition() {
        let dialect = DefaultDialect::new();
        let compiler = SqlCompiler::new(&dialect);
        let email = ColumnElem::new("email", crate::schema::TypeElem::varchar())
            .not_null()
            .unique()
            .default("''");
        assert_eq!(
            compiler.column_definition(&email, true),
            "email VARCHAR(255) NOT NULL UNIQUE DEFAULT ''"
        );
    }

    #[test]
    fn test_auto_increment_column_keeps_options() {
        let dialect = DefaultDialect::new();
        let compiler = SqlCompiler::new(&dialect);
        let seq = ColumnElem::new("seq", crate::schema::TypeElem::int())
            .auto_increment()
            .not_null()
            .unique()
            .default("1");
        assert_eq!(
            compiler.column_definition(&seq, true),
            "seq INT AUTO INCREMENT NOT NULL UNIQUE DEFAULT 1"
        );

        let id = ColumnElem::new("id", crate::schema::TypeElem::int())
            .primary_key()
            .auto_increment()
            .unique();
        assert_eq!(
            compiler.column_definition(&id, true),
            "id INT PRIMARY KEY AUTO INCREMENT"
        );
        assert_eq!(
            compiler.column_definition(&id, false),
            "id INT AUTO INCREMENT NOT NULL UNIQUE"
        );
    }
}
