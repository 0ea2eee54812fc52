use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "EXTCHECK_CONFIG";
pub const MANAGER_ENV: &str = "EXTENSIONS_MANAGER";
pub const PLUGINS_ENV: &str = "PLUGINS";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub extensions: ExtensionSettings,
    pub logging: LoggingConfig,
    /// User config file merged over the defaults, if one was found.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionSettings {
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config → environment.
    pub fn load() -> Result<Self> {
        let user_path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);

        Self::load_from(user_path.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn load_from(
        user_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut merged: toml::Value =
            toml::from_str(defaults).context("built-in default config is invalid")?;

        let source = user_path.filter(|path| path.exists());
        if let Some(path) = source {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let user: toml::Value = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            deep_merge(&mut merged, user);
        }

        let mut config: AppConfig = merged.try_into().context("invalid configuration")?;
        config.source = source.map(Path::to_path_buf);
        config.apply_env(env);
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(manager) = env(MANAGER_ENV) {
            self.extensions.manager = Some(manager);
        }

        if let Some(plugins) = env(PLUGINS_ENV) {
            self.extensions.plugins = split_list(&plugins);
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "extcheck")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Comma-separated list; items are trimmed but empty items are kept.
fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Merge `overlay` into `base`. Tables merge key by key; anything else replaces.
fn deep_merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
