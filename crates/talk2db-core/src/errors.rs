use thiserror::Error;

/// Failures raised by a [`DataSource`](crate::source::DataSource) backend.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("data source connection lock poisoned")]
    Poisoned,

    #[error("{0}")]
    Backend(String),
}

/// Missing or invalid settings. Fatal at startup.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

/// Everything that can go wrong while answering one question.
#[derive(Debug, Error)]
pub enum Talk2DbError {
    #[error("schema retrieval failed: {source}")]
    SchemaRetrieval {
        #[source]
        source: DataSourceError,
    },

    #[error("{provider} provider call failed: {message}")]
    ProviderCall {
        provider: &'static str,
        message: String,
    },

    #[error("no SQL statement in provider output: {raw:?}")]
    SqlExtraction { raw: String },

    #[error("query execution failed: {message}\nstatement: {statement}")]
    QueryExecution { statement: String, message: String },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl Talk2DbError {
    pub(crate) fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderCall {
            provider,
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in logs and HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SchemaRetrieval { .. } => "schema_retrieval",
            Self::ProviderCall { .. } => "provider_call",
            Self::SqlExtraction { .. } => "sql_extraction",
            Self::QueryExecution { .. } => "query_execution",
            Self::Configuration(_) => "configuration",
        }
    }
}

pub type Result<T, E = Talk2DbError> = std::result::Result<T, E>;
