use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/catalog.db".into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `server.toml`, then `APP__*` variables, then the bare
/// `SERVER_BIND` / `DATABASE_URL` / `RUST_LOG` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut legacy = Vec::new();
    for (var, key) in [
        ("SERVER_BIND", "server_bind"),
        ("DATABASE_URL", "database_url"),
        ("RUST_LOG", "log_filter"),
    ] {
        if let Ok(value) = env::var(var) {
            legacy.push((key, value));
        }
    }
    settings_from_sources(Path::new(SETTINGS_FILE), None, legacy)
}

pub(crate) fn settings_from_sources(
    file: &Path,
    app_env: Option<HashMap<String, String>>,
    overrides: Vec<(&str, String)>,
) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let mut builder = Config::builder()
        .set_default("server_bind", defaults.server_bind)?
        .set_default("database_url", defaults.database_url)?
        .set_default("log_filter", defaults.log_filter)?
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .source(app_env),
        );

    for (key, value) in overrides {
        builder = builder.set_override(key, value)?;
    }

    builder
        .build()
        .context("failed to assemble server settings")?
        .try_deserialize()
        .context("invalid server settings")
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
