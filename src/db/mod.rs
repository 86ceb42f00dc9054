use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{query::ListQuery, EntityId};

pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Private in-memory database. A single connection that is never recycled,
/// otherwise every new connection would see an empty database.
pub async fn create_memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Run the migrations embedded in ./migrations/
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// `SELECT * FROM {table} WHERE 1 = 1`, ready for `AND ...` clauses.
pub fn select_from(table: &str) -> QueryBuilder<'static, Sqlite> {
    QueryBuilder::new(format!("SELECT * FROM {table} WHERE 1 = 1"))
}

/// Case-insensitive substring match on any of `columns`.
pub fn push_search(qb: &mut QueryBuilder<'static, Sqlite>, columns: &[&str], query: &ListQuery) {
    let Some(term) = query.search_term() else {
        return;
    };
    let pattern = format!("%{}%", term.to_lowercase());
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("LOWER({column}) LIKE "));
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Exact match of `column` against filter `key`, when set.
pub fn push_eq(qb: &mut QueryBuilder<'static, Sqlite>, column: &str, key: &str, query: &ListQuery) {
    if let Some(value) = query.filter(key) {
        qb.push(format!(" AND {column} = "));
        qb.push_bind(value.to_string());
    }
}

/// `YYYY-MM` match on a date column, when filter `key` is set.
pub fn push_month(qb: &mut QueryBuilder<'static, Sqlite>, column: &str, key: &str, query: &ListQuery) {
    if let Some(month) = query.filter(key) {
        qb.push(format!(" AND strftime('%Y-%m', {column}) = "));
        qb.push_bind(month.to_string());
    }
}

/// Newest first, then the requested page window.
pub fn push_order_and_window(qb: &mut QueryBuilder<'static, Sqlite>, query: &ListQuery) {
    qb.push(" ORDER BY id DESC");
    if let Some((limit, offset)) = query.window() {
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
    }
}

/// Returns whether a row was removed.
pub async fn delete_by_id(pool: &SqlitePool, table: &str, id: EntityId) -> anyhow::Result<bool> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
