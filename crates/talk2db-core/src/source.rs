use crate::errors::DataSourceError;
use crate::model::{ColumnInfo, ForeignKeyInfo, ProcedureInfo, ResultSet, SqlDialect};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// A relational database the pipeline can introspect and query.
///
/// Implementations own their connection; every call is one scoped session.
pub trait DataSource: Send + Sync {
    fn dialect(&self) -> SqlDialect;

    fn table_names(&self) -> Result<Vec<String>, DataSourceError>;

    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DataSourceError>;

    fn foreign_keys(&self, _table: &str) -> Result<Vec<ForeignKeyInfo>, DataSourceError> {
        Ok(Vec::new())
    }

    /// All stored procedures with their parameters, in one round trip.
    fn procedures(&self) -> Result<Vec<ProcedureInfo>, DataSourceError> {
        Ok(Vec::new())
    }

    fn query(&self, sql: &str) -> Result<ResultSet, DataSourceError>;
}

/// SQLite-backed data source.
#[derive(Clone)]
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self::from_connection(conn))
    }

    pub fn memory() -> Result<Self, DataSourceError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run setup statements (fixtures, migrations). Not used by the pipeline.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DataSourceError> {
        self.session()?.execute_batch(sql)?;
        Ok(())
    }

    fn session(&self) -> Result<MutexGuard<'_, Connection>, DataSourceError> {
        self.conn.lock().map_err(|_| DataSourceError::Poisoned)
    }
}

impl DataSource for SqliteSource {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn table_names(&self) -> Result<Vec<String>, DataSourceError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DataSourceError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk
             FROM pragma_table_info(?1)
             ORDER BY cid",
        )?;
        let cols = stmt
            .query_map(params![table], |row| {
                let not_null: i64 = row.get(2)?;
                let pk: i64 = row.get(4)?;
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                    nullable: not_null == 0,
                    default: row.get(3)?,
                    primary_key: pk > 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cols)
    }

    fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>, DataSourceError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT \"from\", \"table\", \"to\"
             FROM pragma_foreign_key_list(?1)
             ORDER BY id, seq",
        )?;
        let fks = stmt
            .query_map(params![table], |row| {
                Ok(ForeignKeyInfo {
                    column_name: row.get(0)?,
                    foreign_table_name: row.get(1)?,
                    // NULL "to" means the referenced table's primary key
                    foreign_column_name: row
                        .get::<_, Option<String>>(2)?
                        .unwrap_or_else(|| "rowid".to_string()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fks)
    }

    fn query(&self, sql: &str) -> Result<ResultSet, DataSourceError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(to_json(row.get_ref(idx)?));
            }
            rows.push(values);
        }

        Ok(ResultSet::new(columns, rows))
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(hex::encode(b)),
    }
}
