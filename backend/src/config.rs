use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub bind_addr: String,
    /// JSON snapshot loaded at start-up and written back on shutdown.
    pub snapshot: Option<PathBuf>,
    /// Start from the demo estate when there is no snapshot to load.
    pub seed_demo: bool,
}

impl BackendConfig {
    /// Reads `BIND_ADDR`, `ESTATE_SNAPSHOT` and `SEED_DEMO`. Outside of
    /// `ENV=prod` a `.env` file is honoured first.
    pub fn from_env() -> Result<Self> {
        if std::env::var("ENV").ok().as_deref() != Some("prod") {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let snapshot = lookup("ESTATE_SNAPSHOT")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let seed_demo = match lookup("SEED_DEMO") {
            Some(v) => parse_flag(&v).with_context(|| format!("SEED_DEMO={v}"))?,
            None => false,
        };
        Ok(Self {
            bind_addr,
            snapshot,
            seed_demo,
        })
    }
}

fn parse_flag(v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("not a boolean: {other}"),
    }
}
