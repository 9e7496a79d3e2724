use crate::errors::ConfigError;
use crate::model::SqlDialect;
use crate::providers::openai::DEFAULT_CHAT_MODEL;
use crate::providers::ProviderKind;
use crate::schema::{ExclusionPolicy, SchemaStyle};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_DB_NAME: &str = "T2DB_DB_NAME";
pub const ENV_PROVIDER: &str = "T2DB_PROVIDER";
pub const ENV_HF_API_URL: &str = "T2DB_HF_API_URL";
pub const ENV_HF_API_TOKEN: &str = "T2DB_HF_API_TOKEN";
pub const ENV_OAI_API_TOKEN: &str = "T2DB_OAI_API_TOKEN";
pub const ENV_OAI_MODEL: &str = "T2DB_OAI_MODEL";
pub const ENV_OAI_BASE_URL: &str = "T2DB_OAI_BASE_URL";
pub const ENV_FAKE_REPLY: &str = "T2DB_FAKE_REPLY";
pub const ENV_SQL_DIALECT: &str = "T2DB_SQL_DIALECT";
pub const ENV_EXCLUDE_TABLES: &str = "T2DB_EXCLUDE_TABLES";
pub const ENV_SCHEMA_STYLE: &str = "T2DB_SCHEMA_STYLE";
pub const ENV_INCLUDE_PROCEDURES: &str = "T2DB_INCLUDE_PROCEDURES";
pub const ENV_LOG: &str = "T2DB_LOG";

/// Optional YAML file (`talk2db.yaml`). Secrets stay in the environment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    #[serde(default)]
    pub exclude_tables: Vec<String>,
    #[serde(default)]
    pub replace_default_exclusions: bool,
    pub dialect: Option<SqlDialect>,
    pub schema_style: Option<SchemaStyle>,
    pub include_procedures: Option<bool>,
    pub provider: Option<ProviderKind>,
    pub chat_model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// SQLite database path (or `file:` URI)
    pub name: String,
}

impl DatabaseSettings {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.name)
    }
}

#[derive(Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub hosted_url: Option<String>,
    pub hosted_token: Option<String>,
    pub chat_token: Option<String>,
    pub chat_model: String,
    pub chat_base_url: Option<String>,
    pub fake_reply: String,
}

// Tokens are never printed.
impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("hosted_url", &self.hosted_url)
            .field("hosted_token", &self.hosted_token.as_ref().map(|_| "***"))
            .field("chat_token", &self.chat_token.as_ref().map(|_| "***"))
            .field("chat_model", &self.chat_model)
            .field("chat_base_url", &self.chat_base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SchemaSettings {
    pub exclusions: ExclusionPolicy,
    pub style: SchemaStyle,
    pub include_procedures: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub provider: ProviderSettings,
    pub schema: SchemaSettings,
    /// Overrides the dialect reported by the data source.
    pub dialect: Option<SqlDialect>,
}

impl Settings {
    /// Defaults, then the YAML file, then `.env`, then the process environment.
    pub fn load(
        config_file: Option<&Path>,
        provider_override: Option<ProviderKind>,
    ) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = match config_file {
            Some(path) => load_file(path)?,
            None => FileSettings::default(),
        };
        Self::resolve(file, provider_override, |key| std::env::var(key).ok())
    }

    /// Build settings from a file and a variable lookup.
    ///
    /// Every missing required variable is reported in one error.
    pub fn resolve<F>(
        file: FileSettings,
        provider_override: Option<ProviderKind>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let kind = match provider_override {
            Some(kind) => kind,
            None => match get(ENV_PROVIDER) {
                Some(v) => parse_var(ENV_PROVIDER, &v)?,
                None => file.provider.unwrap_or_default(),
            },
        };

        let mut required = vec![ENV_DB_NAME];
        match kind {
            ProviderKind::Hosted => required.extend([ENV_HF_API_URL, ENV_HF_API_TOKEN]),
            ProviderKind::Chat => required.push(ENV_OAI_API_TOKEN),
            ProviderKind::Fake => {}
        }
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|&key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let dialect = match get(ENV_SQL_DIALECT) {
            Some(v) => Some(parse_var(ENV_SQL_DIALECT, &v)?),
            None => file.dialect,
        };
        let style = match get(ENV_SCHEMA_STYLE) {
            Some(v) => parse_var(ENV_SCHEMA_STYLE, &v)?,
            None => file.schema_style.unwrap_or_default(),
        };
        let include_procedures = match get(ENV_INCLUDE_PROCEDURES) {
            Some(v) => parse_bool(ENV_INCLUDE_PROCEDURES, &v)?,
            None => file.include_procedures.unwrap_or(true),
        };

        let mut extra = file.exclude_tables;
        if let Some(v) = get(ENV_EXCLUDE_TABLES) {
            extra.extend(
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }
        let exclusions = if file.replace_default_exclusions {
            ExclusionPolicy::new(extra)
        } else {
            ExclusionPolicy::with_defaults(extra)
        };

        Ok(Settings {
            database: DatabaseSettings {
                name: get(ENV_DB_NAME).unwrap_or_default(),
            },
            provider: ProviderSettings {
                kind,
                hosted_url: get(ENV_HF_API_URL),
                hosted_token: get(ENV_HF_API_TOKEN),
                chat_token: get(ENV_OAI_API_TOKEN),
                chat_model: get(ENV_OAI_MODEL)
                    .or(file.chat_model)
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                chat_base_url: get(ENV_OAI_BASE_URL),
                fake_reply: get(ENV_FAKE_REPLY).unwrap_or_else(|| "SELECT 1".to_string()),
            },
            schema: SchemaSettings {
                exclusions,
                style,
                include_procedures,
            },
            dialect,
        })
    }
}

pub fn load_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
}

fn parse_var<T: FromStr<Err = String>>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|e: String| ConfigError(format!("{}: {}", key, e)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError(format!("{}: expected a boolean, got '{}'", key, other))),
    }
}
