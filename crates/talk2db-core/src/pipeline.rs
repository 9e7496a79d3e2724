use crate::config::Settings;
use crate::errors::{ConfigError, DataSourceError, Result, Talk2DbError};
use crate::executor;
use crate::extract::extract_sql;
use crate::model::{Answer, ResultSet, SqlDialect};
use crate::normalize::normalize;
use crate::prompt::PromptBuilder;
use crate::providers::{self, TranslationProvider};
use crate::schema::{ExclusionPolicy, Inspector, SchemaContext, SchemaStyle};
use crate::source::{DataSource, SqliteSource};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub schema_style: SchemaStyle,
    pub include_procedures: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            schema_style: SchemaStyle::Compact,
            include_procedures: true,
        }
    }
}

/// question → schema → provider → SQL → rows.
///
/// Holds no per-question state; safe to share behind an `Arc`. Data source
/// calls run on the blocking pool, so async callers never stall their runtime.
pub struct Pipeline {
    source: Arc<dyn DataSource>,
    exclusions: Arc<ExclusionPolicy>,
    provider: Arc<dyn TranslationProvider>,
    dialect: SqlDialect,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn DataSource>,
        exclusions: ExclusionPolicy,
        provider: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            dialect: source.dialect(),
            source,
            exclusions: Arc::new(exclusions),
            provider,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Dialect the prompts target, when it differs from the source's own.
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Open the configured database and provider.
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, ConfigError> {
        let path = settings.database.path();
        let source = SqliteSource::open(&path).map_err(|e| {
            ConfigError(format!("failed to open database {}: {}", path.display(), e))
        })?;
        tracing::info!(event = "database_opened", database = %path.display());

        let dialect = settings.dialect.unwrap_or_else(|| source.dialect());
        let provider = providers::from_settings(&settings.provider, PromptBuilder::new(dialect))?;

        Ok(Self::new(Arc::new(source), settings.schema.exclusions.clone(), provider)
            .with_dialect(dialect)
            .with_options(PipelineOptions {
                schema_style: settings.schema.style,
                include_procedures: settings.schema.include_procedures,
            }))
    }

    pub fn provider(&self) -> &dyn TranslationProvider {
        self.provider.as_ref()
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Fresh scan of the source, exclusions applied. Blocks the calling thread.
    pub fn schema_context(&self, style: SchemaStyle) -> Result<SchemaContext> {
        scan(
            self.source.as_ref(),
            &self.exclusions,
            self.options.include_procedures,
            style,
        )
    }

    pub fn render_schema(&self, style: SchemaStyle) -> Result<String> {
        Ok(self.schema_context(style)?.render(style))
    }

    /// [`render_schema`](Self::render_schema) on the blocking pool.
    pub async fn load_schema(&self, style: SchemaStyle) -> Result<String> {
        let source = Arc::clone(&self.source);
        let exclusions = Arc::clone(&self.exclusions);
        let include_procedures = self.options.include_procedures;

        tokio::task::spawn_blocking(move || {
            scan(source.as_ref(), &exclusions, include_procedures, style).map(|ctx| ctx.render(style))
        })
        .await
        .map_err(|e| Talk2DbError::SchemaRetrieval {
            source: DataSourceError::Backend(format!("schema task failed: {}", e)),
        })?
    }

    /// Raw model output → executable SQL, without running it.
    pub async fn translate(&self, question: &str, schema: &str) -> Result<String> {
        let started = Instant::now();
        let result = self.provider.translate(question, schema).await?;
        tracing::info!(
            event = "provider_done",
            provider = result.provider,
            model = %result.model,
            duration_ms = started.elapsed().as_millis() as u64
        );

        let sql = extract_sql(&result.text);
        if sql.is_empty() {
            return Err(Talk2DbError::SqlExtraction { raw: result.text });
        }
        tracing::info!(event = "sql_generated", question = %question, sql = %sql);
        Ok(sql)
    }

    /// Run `sql` on the blocking pool and materialize the rows.
    pub async fn execute(&self, sql: &str) -> Result<ResultSet> {
        let source = Arc::clone(&self.source);
        let statement = sql.to_string();

        tokio::task::spawn_blocking(move || executor::execute(source.as_ref(), &statement))
            .await
            .map_err(|e| Talk2DbError::QueryExecution {
                statement: sql.to_string(),
                message: format!("query task failed: {}", e),
            })?
    }

    /// Answer one question end to end.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        tracing::info!(event = "question_received", question = %question);

        let schema = self.load_schema(self.options.schema_style).await?;
        let sql = self.translate(question, &schema).await?;
        let rows = self.execute(&sql).await?;

        Ok(Answer {
            question: question.to_string(),
            sql_query: sql,
            result: normalize(rows),
        })
    }
}

fn scan(
    source: &dyn DataSource,
    exclusions: &ExclusionPolicy,
    include_procedures: bool,
    style: SchemaStyle,
) -> Result<SchemaContext> {
    Inspector::new(source, exclusions)
        .include_procedures(include_procedures)
        .with_foreign_keys(style.needs_foreign_keys())
        .scan()
}
