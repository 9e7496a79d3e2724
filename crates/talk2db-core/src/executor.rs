use crate::errors::{Result, Talk2DbError};
use crate::model::ResultSet;
use crate::source::DataSource;
use std::time::Instant;

/// Run `sql` verbatim and materialize every row.
///
/// Failures carry the statement so the caller can show what was attempted.
pub fn execute(source: &dyn DataSource, sql: &str) -> Result<ResultSet> {
    let started = Instant::now();
    tracing::info!(event = "query_execute", sql = %sql);

    match source.query(sql) {
        Ok(rs) => {
            tracing::info!(
                event = "query_done",
                rows = rs.row_count(),
                columns = rs.columns.len(),
                duration_ms = started.elapsed().as_millis() as u64
            );
            Ok(rs)
        }
        Err(e) => {
            tracing::error!(event = "query_failed", sql = %sql, error = %e);
            Err(Talk2DbError::QueryExecution {
                statement: sql.to_string(),
                message: e.to_string(),
            })
        }
    }
}
