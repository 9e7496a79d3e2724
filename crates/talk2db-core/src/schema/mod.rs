//! Schema context: what the model is told about the database.

use crate::model::{ProcedureInfo, TableData};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod exclusion;
pub mod formatter;
pub mod inspector;

pub use exclusion::{ExclusionPolicy, DEFAULT_EXCLUDED_TABLES};
pub use inspector::Inspector;

/// How the schema context is rendered to text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaStyle {
    /// `table (col1, col2)` per line
    #[default]
    Compact,
    /// compact, with primary and foreign key markers on columns
    Annotated,
    /// `CREATE TABLE` statements
    Ddl,
}

impl SchemaStyle {
    pub fn needs_foreign_keys(&self) -> bool {
        matches!(self, SchemaStyle::Annotated)
    }
}

impl FromStr for SchemaStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(SchemaStyle::Compact),
            "annotated" => Ok(SchemaStyle::Annotated),
            "ddl" => Ok(SchemaStyle::Ddl),
            other => Err(format!(
                "unknown schema style '{}' (expected compact|annotated|ddl)",
                other
            )),
        }
    }
}

/// Tables (exclusions already applied) and procedures, in catalog order.
///
/// Built fresh for every question and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContext {
    pub tables: Vec<TableData>,
    pub procedures: Vec<ProcedureInfo>,
}

impl SchemaContext {
    pub fn render(&self, style: SchemaStyle) -> String {
        match style {
            SchemaStyle::Compact => formatter::render_compact(self),
            SchemaStyle::Annotated => formatter::render_annotated(self),
            SchemaStyle::Ddl => formatter::render_ddl(self),
        }
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}
