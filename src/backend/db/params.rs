//! Statement parameters and result sets.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Executor, Postgres};
use std::fmt;
use uuid::Uuid;

/// A positional statement parameter (`$1`, `$2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// NULL typed as TEXT
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Uuid> for SqlParam {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Rows returned by a statement together with the affected/returned count
pub struct QueryResult {
    pub rows: Vec<PgRow>,
    pub row_count: u64,
}

impl QueryResult {
    pub fn first(&self) -> Option<&PgRow> {
        self.rows.first()
    }
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("rows", &self.rows.len())
            .field("row_count", &self.row_count)
            .finish()
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(sqlx::query(sql), |query, param| match param {
        SqlParam::Null => query.bind(None::<String>),
        SqlParam::Bool(value) => query.bind(*value),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Float(value) => query.bind(*value),
        SqlParam::Text(value) => query.bind(value.as_str()),
        SqlParam::Uuid(value) => query.bind(*value),
        SqlParam::Timestamp(value) => query.bind(*value),
    })
}

/// Run one statement on any executor.
///
/// Row-returning statements are fetched and counted; everything else is
/// executed for its affected-row count.
pub(crate) async fn run_statement<'c, E>(
    executor: E,
    sql: &str,
    params: &[SqlParam],
) -> Result<QueryResult, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = bind_params(sql, params);
    if returns_rows(sql) {
        let rows = query.fetch_all(executor).await?;
        let row_count = rows.len() as u64;
        Ok(QueryResult { rows, row_count })
    } else {
        let done = query.execute(executor).await?;
        Ok(QueryResult {
            rows: Vec::new(),
            row_count: done.rows_affected(),
        })
    }
}

/// Whether a statement produces a result set
fn returns_rows(sql: &str) -> bool {
    let mut words = sql
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty());
    let leading = words.next().map(str::to_ascii_lowercase);
    matches!(
        leading.as_deref(),
        Some("select" | "with" | "values" | "show" | "table" | "explain")
    ) || words.any(|word| word.eq_ignore_ascii_case("returning"))
}

/// Shorten a statement for log output
pub(crate) fn truncate_statement(sql: &str, max: usize) -> String {
    let collapsed: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        collapsed
    } else {
        let head: String = collapsed.chars().take(max).collect();
        format!("{}...", head)
    }
}
