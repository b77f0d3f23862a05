//! DML rendering: SELECT, INSERT, UPDATE and DELETE with bind values.

mod common;
use common::*;

use oxide_dialect::prelude::*;

#[test]
fn select_star() {
    let dialect = DefaultDialect::new();
    let query = compile(&dialect, Select::from("users"));
    assert_eq!(query.sql, "SELECT * FROM users");
    assert!(query.bindings.is_empty());
}

#[test]
fn select_full() {
    let dialect = DefaultDialect::with_escaping(true);
    let select = Select::from("users")
        .distinct()
        .columns(&["users.id", "users.name", "p.title"])
        .join(JoinKind::Left, "posts", "p.author_id", "users.id")
        .filter(col("users.active").eq(true))
        .filter(col("p.title").like("%rust%"))
        .group_by(&["users.id"])
        .order_by("users.name", Order::Desc)
        .limit(10)
        .offset(20);
    let query = compile(&dialect, select);
    assert_eq!(
        query.sql,
        "SELECT DISTINCT `users`.`id`, `users`.`name`, `p`.`title` FROM `users` \
         LEFT JOIN `posts` ON `p`.`author_id` = `users`.`id` \
         WHERE `users`.`active` = ? AND `p`.`title` LIKE ? \
         GROUP BY `users`.`id` ORDER BY `users`.`name` DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        query.bindings,
        vec![SqlValue::Bool(true), SqlValue::Text(String::from("%rust%"))]
    );
}

#[test]
fn select_conditions() {
    let dialect = DefaultDialect::new();
    let select = Select::from("items").filter(
        col("price")
            .between(10, 20)
            .and(col("tag").in_list(vec!["a", "b"]))
            .and(col("deleted_at").is_null())
            .and(col("owner").eq(1).or(col("shared").eq(true)).not()),
    );
    let query = compile(&dialect, select);
    assert_eq!(
        query.sql,
        "SELECT * FROM items WHERE price BETWEEN ? AND ? AND tag IN (?, ?) \
         AND deleted_at IS NULL AND NOT (owner = ? OR shared = ?)"
    );
    assert_eq!(query.bindings.len(), 6);
    assert_eq!(query.bindings[0], SqlValue::Int(10));
    assert_eq!(query.bindings[5], SqlValue::Bool(true));
}

#[test]
fn select_empty_in_list() {
    let dialect = DefaultDialect::new();
    let empty: Vec<i64> = Vec::new();
    let query = compile(&dialect, Select::from("t").filter(col("id").in_list(empty.clone())));
    assert_eq!(query.sql, "SELECT * FROM t WHERE 1 = 0");
    let query = compile(&dialect, Select::from("t").filter(col("id").not_in(empty)));
    assert_eq!(query.sql, "SELECT * FROM t WHERE 1 = 1");
}

#[test]
fn select_having() {
    let dialect = DefaultDialect::new();
    let select = Select::from("orders")
        .columns(&["customer_id"])
        .group_by(&["customer_id"])
        .having(col("customer_id").is_not_null());
    assert_eq!(
        compile(&dialect, select).sql,
        "SELECT customer_id FROM orders GROUP BY customer_id HAVING customer_id IS NOT NULL"
    );
}

#[test]
fn insert_rows() {
    let dialect = DefaultDialect::with_escaping(true);
    let insert = Insert::into("users")
        .columns(&["name", "age"])
        .values(vec!["alice".to_sql_value(), 30_i64.to_sql_value()])
        .values(vec!["bob".to_sql_value(), SqlValue::Null]);
    let query = compile(&dialect, insert);
    assert_eq!(
        query.sql,
        "INSERT INTO `users` (`name`, `age`) VALUES (?, ?), (?, ?)"
    );
    assert_eq!(
        query.bindings,
        vec![
            SqlValue::Text(String::from("alice")),
            SqlValue::Int(30),
            SqlValue::Text(String::from("bob")),
            SqlValue::Null,
        ]
    );
}

#[test]
fn insert_arity_mismatch() {
    let dialect = DefaultDialect::new();
    let insert = Insert::into("users")
        .columns(&["name", "age"])
        .values(vec!["alice".to_sql_value()]);
    let err = compile_err(&dialect, insert);
    assert_eq!(
        err.to_string(),
        "Invalid statement: insert into 'users' expects 2 values per row, got 1"
    );
    assert!(matches!(
        compile_err(&dialect, Insert::into("users").columns(&["name"])),
        Error::InvalidStatement(_)
    ));

    let err = compile_err(&dialect, Insert::into("t").values(vec![]));
    assert_eq!(err.to_string(), "Invalid statement: insert into 't' has no values");
    assert!(matches!(
        compile_err(&dialect, Insert::into("t").values(vec![]).values(vec![])),
        Error::InvalidStatement(_)
    ));
}

#[test]
fn update_and_delete() {
    let dialect = DefaultDialect::new();
    let update = Update::table("users")
        .set("name", "carol")
        .set("age", 41)
        .filter(col("id").eq(7));
    let query = compile(&dialect, update);
    assert_eq!(query.sql, "UPDATE users SET name = ?, age = ? WHERE id = ?");
    assert_eq!(query.bindings.len(), 3);

    let delete = Delete::from("sessions").filter(col("expires_at").lt(1_700_000_000_i64));
    let query = compile(&dialect, delete);
    assert_eq!(query.sql, "DELETE FROM sessions WHERE expires_at < ?");
    assert_eq!(query.bindings, vec![SqlValue::Int(1_700_000_000)]);

    assert_eq!(compile(&dialect, Delete::from("sessions")).sql, "DELETE FROM sessions");
    assert!(matches!(
        compile_err(&dialect, Update::table("users")),
        Error::InvalidStatement(_)
    ));
}

#[test]
fn compiler_reads_escaping_at_compile_time() {
    let dialect = DefaultDialect::new();
    let compiler = dialect.compiler();
    let stmt: Statement = Select::from("users").columns(&["id"]).into();
    assert_eq!(compiler.compile(&stmt).expect("compile").sql, "SELECT id FROM users");
    dialect.set_escaping(true);
    assert_eq!(
        compiler.compile(&stmt).expect("compile").sql,
        "SELECT `id` FROM `users`"
    );
}
