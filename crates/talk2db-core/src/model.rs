use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// SQL dialect the model is asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Transact-SQL (SQL Server)
    Tsql,
    Sqlite,
}

impl SqlDialect {
    /// Name used inside prompts ("Translate the question into TSQL code").
    pub fn label(&self) -> &'static str {
        match self {
            SqlDialect::Tsql => "TSQL",
            SqlDialect::Sqlite => "SQLite SQL",
        }
    }

    pub fn engine(&self) -> &'static str {
        match self {
            SqlDialect::Tsql => "SQL Server",
            SqlDialect::Sqlite => "SQLite",
        }
    }

    pub fn date_format_hint(&self) -> &'static str {
        match self {
            SqlDialect::Tsql => "FORMAT(<date>, 'dd/MM/yyyy')",
            SqlDialect::Sqlite => "strftime('%d/%m/%Y', <date>)",
        }
    }

    pub fn supports_procedures(&self) -> bool {
        matches!(self, SqlDialect::Tsql)
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsql" | "t-sql" | "mssql" | "sqlserver" => Ok(SqlDialect::Tsql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            other => Err(format!("unknown SQL dialect '{}' (expected tsql|sqlite)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

impl ColumnInfo {
    /// Column with only a name, as most test sources describe them.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: String::new(),
            nullable: true,
            default: None,
            primary_key: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyInfo {
    pub column_name: String,
    pub foreign_table_name: String,
    pub foreign_column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

/// A procedure parameter as reported by the source, marker prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
}

pub type Record = Map<String, Value>;

/// Tabular result of one statement, fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Record-oriented view: one ordered map per row.
    ///
    /// Later duplicates overwrite earlier ones, so callers should normalize first.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().chain(std::iter::repeat(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

/// Raw provider output plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub text: String,
    pub provider: &'static str,
    pub model: String,
}

/// What the pipeline hands back to its callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub question: String,
    pub sql_query: String,
    pub result: ResultSet,
}

impl Answer {
    pub fn records(&self) -> Vec<Record> {
        self.result.to_records()
    }
}
