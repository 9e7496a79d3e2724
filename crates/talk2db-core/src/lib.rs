pub mod config;
pub mod errors;
pub mod executor;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod schema;
pub mod source;

pub use errors::{ConfigError, DataSourceError, Talk2DbError};
pub use extract::extract_sql;
pub use model::{Answer, ResultSet, SqlDialect};
pub use normalize::normalize;
pub use pipeline::{Pipeline, PipelineOptions};
pub use prompt::build_prompt;
pub use providers::{ProviderKind, TranslationProvider};
pub use schema::{ExclusionPolicy, SchemaContext, SchemaStyle};
pub use source::{DataSource, SqliteSource};
