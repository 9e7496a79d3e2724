use std::env;
use talk2db_core::config::ENV_LOG;

pub const ENV_SERVER_ADDR: &str = "T2DB_SERVER_ADDR";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_SERVER_ADDR).filter(|v| !v.trim().is_empty()) {
            cfg.addr = v;
        }
        if let Some(v) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            cfg.log_level = v;
        }
        cfg
    }
}
