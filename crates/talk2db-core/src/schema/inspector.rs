use super::{ExclusionPolicy, SchemaContext};
use crate::errors::{DataSourceError, Result, Talk2DbError};
use crate::model::{ParameterInfo, ProcedureInfo, TableData};
use crate::source::DataSource;

/// Characters that prefix parameter names in procedure catalogs (`@anno`).
const PARAMETER_MARKERS: &[char] = &['@', ':', '$'];

/// Reads table and procedure metadata from a source.
pub struct Inspector<'a> {
    source: &'a dyn DataSource,
    exclusions: &'a ExclusionPolicy,
    include_procedures: bool,
    foreign_keys: bool,
}

impl<'a> Inspector<'a> {
    pub fn new(source: &'a dyn DataSource, exclusions: &'a ExclusionPolicy) -> Self {
        Self {
            source,
            exclusions,
            include_procedures: true,
            foreign_keys: false,
        }
    }

    pub fn include_procedures(mut self, yes: bool) -> Self {
        self.include_procedures = yes;
        self
    }

    pub fn with_foreign_keys(mut self, yes: bool) -> Self {
        self.foreign_keys = yes;
        self
    }

    /// Full scan. Either every table and procedure is read or an error is returned.
    pub fn scan(&self) -> Result<SchemaContext> {
        self.try_scan()
            .map_err(|source| Talk2DbError::SchemaRetrieval { source })
            .inspect_err(|e| tracing::error!(event = "schema_scan_failed", error = %e))
    }

    fn try_scan(&self) -> std::result::Result<SchemaContext, DataSourceError> {
        let mut tables = Vec::new();
        let mut skipped = 0usize;

        for name in self.source.table_names()? {
            if self.exclusions.is_excluded(&name) {
                skipped += 1;
                continue;
            }

            let columns = self.source.columns(&name)?;
            let foreign_keys = if self.foreign_keys {
                self.source.foreign_keys(&name)?
            } else {
                Vec::new()
            };

            tables.push(TableData {
                name,
                columns,
                foreign_keys,
            });
        }

        let procedures = if self.include_procedures {
            self.source
                .procedures()?
                .into_iter()
                .map(strip_parameter_markers)
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            event = "schema_scanned",
            tables = tables.len(),
            excluded = skipped,
            procedures = procedures.len()
        );

        Ok(SchemaContext { tables, procedures })
    }
}

fn strip_parameter_markers(proc: ProcedureInfo) -> ProcedureInfo {
    ProcedureInfo {
        name: proc.name,
        parameters: proc
            .parameters
            .into_iter()
            .map(|p| ParameterInfo {
                name: p.name.trim_start_matches(PARAMETER_MARKERS).to_string(),
                data_type: p.data_type,
            })
            .collect(),
    }
}
