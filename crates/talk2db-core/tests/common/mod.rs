#![allow(dead_code)]

use std::sync::Mutex;
use talk2db_core::model::{ColumnInfo, ResultSet, SqlDialect};
use talk2db_core::{DataSource, DataSourceError};

/// In-memory catalog that answers every query with the same result set.
pub struct StubSource {
    pub tables: Vec<(String, Vec<String>)>,
    pub result: ResultSet,
    pub executed: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new(tables: &[(&str, &[&str])], result: ResultSet) -> Self {
        Self {
            tables: tables
                .iter()
                .map(|(t, cols)| (t.to_string(), cols.iter().map(|c| c.to_string()).collect()))
                .collect(),
            result,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl DataSource for StubSource {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Tsql
    }

    fn table_names(&self) -> Result<Vec<String>, DataSourceError> {
        Ok(self.tables.iter().map(|(t, _)| t.clone()).collect())
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DataSourceError> {
        self.tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, cols)| cols.iter().map(ColumnInfo::named).collect())
            .ok_or_else(|| DataSourceError::Backend(format!("unknown table {}", table)))
    }

    fn query(&self, sql: &str) -> Result<ResultSet, DataSourceError> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(self.result.clone())
    }
}
