//! Parameterized MySQL statements built from filters and patches.
//!
//! Identifiers are backtick-quoted and must already be validated against
//! the entity's column list; every value goes through a bind parameter.

use super::{FindQuery, Window};
use scaffold_core::{FieldValue, Filter, Patch};
use sqlx::{MySql, QueryBuilder};

pub(crate) type Sql = QueryBuilder<'static, MySql>;

/// Quotes a column or table name.
pub(crate) fn ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn push_value(builder: &mut Sql, value: &FieldValue) {
    match value {
        FieldValue::Null => builder.push_bind(None::<String>),
        FieldValue::Bool(b) => builder.push_bind(*b),
        FieldValue::Int(i) => builder.push_bind(*i),
        FieldValue::Float(f) => builder.push_bind(*f),
        FieldValue::Text(s) => builder.push_bind(s.clone()),
        FieldValue::Uuid(u) => builder.push_bind(u.hyphenated().to_string()),
        FieldValue::Timestamp(t) => builder.push_bind(*t),
    };
}

fn push_columns(builder: &mut Sql, fields: &[&str]) {
    let columns = fields.iter().map(|f| ident(f)).collect::<Vec<_>>().join(", ");
    builder.push(columns);
}

/// Appends the boolean expression for `filter`.
pub(crate) fn push_filter(builder: &mut Sql, filter: &Filter) {
    match filter {
        Filter::Equals { field, value } if value.is_null() => {
            builder.push(ident(field)).push(" IS NULL");
        }
        Filter::Equals { field, value } => {
            builder.push(ident(field)).push(" = ");
            push_value(builder, value);
        }
        Filter::OneOf { values, .. } if values.is_empty() => {
            builder.push("1=0");
        }
        Filter::OneOf { field, values } => {
            let (nulls, present): (Vec<&FieldValue>, Vec<&FieldValue>) =
                values.iter().partition(|v| v.is_null());
            let column = ident(field);

            if present.is_empty() {
                builder.push(column).push(" IS NULL");
                return;
            }
            if !nulls.is_empty() {
                builder.push("(");
            }
            builder.push(column.as_str()).push(" IN (");
            for (i, value) in present.into_iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, value);
            }
            builder.push(")");
            if !nulls.is_empty() {
                builder.push(" OR ").push(column).push(" IS NULL)");
            }
        }
        Filter::And(children) if children.is_empty() => {
            builder.push("1=1");
        }
        Filter::Or(children) if children.is_empty() => {
            builder.push("1=0");
        }
        Filter::And(children) => push_group(builder, children, " AND "),
        Filter::Or(children) => push_group(builder, children, " OR "),
    }
}

fn push_group(builder: &mut Sql, children: &[Filter], joiner: &str) {
    builder.push("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            builder.push(joiner);
        }
        push_filter(builder, child);
    }
    builder.push(")");
}

fn push_where(builder: &mut Sql, filter: &Filter) {
    builder.push(" WHERE ");
    push_filter(builder, filter);
}

fn push_window(builder: &mut Sql, window: Window) {
    builder.push(" LIMIT ");
    builder.push_bind(window.limit);
    builder.push(" OFFSET ");
    builder.push_bind(window.offset);
}

/// `SELECT <fields> FROM <table> WHERE <filter> ORDER BY .. [LIMIT .. OFFSET ..]`
pub(crate) fn select(table: &str, fields: &[&str], query: &FindQuery) -> Sql {
    let mut builder = Sql::new("SELECT ");
    push_columns(&mut builder, fields);
    builder.push(" FROM ").push(ident(table));
    push_where(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(ident(&query.sort_field))
        .push(" ")
        .push(query.order.as_sql());
    if let Some(window) = query.window {
        push_window(&mut builder, window);
    }
    builder
}

/// `SELECT <fields> FROM <table> WHERE <filter> LIMIT 1`
pub(crate) fn select_one(table: &str, fields: &[&str], filter: &Filter) -> Sql {
    let mut builder = Sql::new("SELECT ");
    push_columns(&mut builder, fields);
    builder.push(" FROM ").push(ident(table));
    push_where(&mut builder, filter);
    builder.push(" LIMIT 1");
    builder
}

/// `SELECT COUNT(*) FROM <table> WHERE <filter>`
pub(crate) fn count(table: &str, filter: &Filter) -> Sql {
    let mut builder = Sql::new("SELECT COUNT(*) FROM ");
    builder.push(ident(table));
    push_where(&mut builder, filter);
    builder
}

/// Multi-row `INSERT`; each row lists values in `fields` order.
pub(crate) fn insert(table: &str, fields: &[&str], rows: &[Vec<FieldValue>]) -> Sql {
    let mut builder = Sql::new("INSERT INTO ");
    builder.push(ident(table)).push(" (");
    push_columns(&mut builder, fields);
    builder.push(") VALUES ");
    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            builder.push(", ");
        }
        builder.push("(");
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, value);
        }
        builder.push(")");
    }
    builder
}

/// `UPDATE <table> SET .. WHERE <filter>`
pub(crate) fn update(table: &str, filter: &Filter, patch: &Patch) -> Sql {
    let mut builder = Sql::new("UPDATE ");
    builder.push(ident(table)).push(" SET ");
    for (i, (field, value)) in patch.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(ident(field)).push(" = ");
        push_value(&mut builder, value);
    }
    push_where(&mut builder, filter);
    builder
}

/// `DELETE FROM <table> WHERE <filter>`
pub(crate) fn delete(table: &str, filter: &Filter) -> Sql {
    let mut builder = Sql::new("DELETE FROM ");
    builder.push(ident(table));
    push_where(&mut builder, filter);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_core::SortOrder;

    fn where_clause(filter: &Filter) -> String {
        let mut builder = Sql::new("");
        push_filter(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn test_equality_and_null() {
        assert_eq!(where_clause(&Filter::eq("status", 1)), "`status` = ?");
        assert_eq!(where_clause(&Filter::eq("last_name", FieldValue::Null)), "`last_name` IS NULL");
    }

    #[test]
    fn test_one_of() {
        assert_eq!(where_clause(&Filter::one_of("status", [1, 2])), "`status` IN (?, ?)");
        assert_eq!(where_clause(&Filter::one_of("status", Vec::<i64>::new())), "1=0");
        assert_eq!(
            where_clause(&Filter::one_of("last_name", [FieldValue::from("a"), FieldValue::Null])),
            "(`last_name` IN (?) OR `last_name` IS NULL)"
        );
        assert_eq!(
            where_clause(&Filter::one_of("last_name", [FieldValue::Null])),
            "`last_name` IS NULL"
        );
    }

    #[test]
    fn test_nested_groups() {
        let filter = Filter::or(vec![
            Filter::and(vec![Filter::eq("status", 1), Filter::eq("username", "ada")]),
            Filter::one_of("status", [3]),
        ]);
        assert_eq!(
            where_clause(&filter),
            "((`status` = ? AND `username` = ?) OR `status` IN (?))"
        );
        assert_eq!(where_clause(&Filter::all()), "1=1");
        assert_eq!(where_clause(&Filter::or(Vec::new())), "1=0");
    }

    #[test]
    fn test_select_with_window() {
        let query = FindQuery {
            filter: Filter::one_of("status", [1, 2]),
            sort_field: "created_at".to_string(),
            order: SortOrder::Desc,
            window: Some(Window { offset: 10, limit: 10 }),
        };
        let builder = select("users", &["id", "status"], &query);
        assert_eq!(
            builder.sql(),
            "SELECT `id`, `status` FROM `users` WHERE `status` IN (?, ?) \
             ORDER BY `created_at` DESC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_select_without_window() {
        let query = FindQuery {
            filter: Filter::all(),
            sort_field: "username".to_string(),
            order: SortOrder::Asc,
            window: None,
        };
        assert_eq!(
            select("users", &["id"], &query).sql(),
            "SELECT `id` FROM `users` WHERE 1=1 ORDER BY `username` ASC"
        );
        assert_eq!(
            select_one("users", &["id"], &Filter::eq("id", "x")).sql(),
            "SELECT `id` FROM `users` WHERE `id` = ? LIMIT 1"
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(
            count("users", &Filter::eq("status", 1)).sql(),
            "SELECT COUNT(*) FROM `users` WHERE `status` = ?"
        );
    }

    #[test]
    fn test_insert_batch() {
        let rows = vec![
            vec![FieldValue::from("a"), FieldValue::Int(1)],
            vec![FieldValue::from("b"), FieldValue::Null],
        ];
        assert_eq!(
            insert("users", &["username", "status"], &rows).sql(),
            "INSERT INTO `users` (`username`, `status`) VALUES (?, ?), (?, ?)"
        );
    }

    #[test]
    fn test_update_and_delete() {
        let patch = Patch::new().set("status", 2).set("last_name", FieldValue::Null);
        assert_eq!(
            update("users", &Filter::eq("id", "x"), &patch).sql(),
            "UPDATE `users` SET `status` = ?, `last_name` = ? WHERE `id` = ?"
        );
        assert_eq!(
            delete("users", &Filter::one_of("id", ["x", "y"])).sql(),
            "DELETE FROM `users` WHERE `id` IN (?, ?)"
        );
    }

    #[test]
    fn test_ident_escapes_backticks() {
        assert_eq!(ident("we`ird"), "`we``ird`");
    }
}
