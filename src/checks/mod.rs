//! Startup checks.
//!
//! Each check inspects the loaded configuration and registry and returns the
//! problems it found. Checks never fail themselves; the caller decides what
//! to do with the diagnostics.

pub mod extensions;

use thiserror::Error;

use crate::model::config::AppConfig;
use crate::plugin::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Settings should contain EXTENSIONS_MANAGER env")]
    MissingManagerConfig,
    #[error("Extension Manager path: {path} doesn't exist")]
    UnresolvableManager { path: String },
    #[error("Wrong plugin_path {path}")]
    EmptyPluginPath { path: String },
    #[error("Plugin with path: {path} doesn't exist")]
    UnresolvablePlugin { path: String },
    #[error("Missing field PLUGIN_NAME for plugin - {type_name}")]
    MissingPluginName { type_name: String },
}

pub struct CheckContext<'a> {
    pub config: &'a AppConfig,
    pub registry: &'a Registry,
}

pub type CheckFn = fn(&CheckContext<'_>) -> Vec<CheckError>;

#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<(&'static str, CheckFn)>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut checks = Self::new();
        checks.register("extensions", extensions::check);
        checks
    }

    pub fn register(&mut self, name: &'static str, check: CheckFn) {
        self.checks.push((name, check));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|(name, _)| *name).collect()
    }

    /// Run every check in registration order and concatenate the results.
    pub fn run(&self, ctx: &CheckContext<'_>) -> Vec<CheckError> {
        let mut errors = Vec::new();

        for (name, check) in &self.checks {
            let found = check(ctx);
            if found.is_empty() {
                tracing::debug!("check {name}: ok");
            } else {
                tracing::warn!("check {name}: {} problem(s)", found.len());
            }
            errors.extend(found);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(_: &CheckContext<'_>) -> Vec<CheckError> {
        vec![CheckError::MissingManagerConfig]
    }

    fn second(_: &CheckContext<'_>) -> Vec<CheckError> {
        vec![CheckError::EmptyPluginPath {
            path: String::new(),
        }]
    }

    fn clean(_: &CheckContext<'_>) -> Vec<CheckError> {
        Vec::new()
    }

    #[test]
    fn runs_checks_in_registration_order() {
        let config = AppConfig::load_from(None, |_| None).unwrap();
        let registry = Registry::new();
        let ctx = CheckContext {
            config: &config,
            registry: &registry,
        };

        let mut checks = CheckRegistry::new();
        checks.register("second", second);
        checks.register("clean", clean);
        checks.register("first", first);

        assert_eq!(checks.names(), ["second", "clean", "first"]);
        assert_eq!(
            checks.run(&ctx),
            [
                CheckError::EmptyPluginPath {
                    path: String::new()
                },
                CheckError::MissingManagerConfig,
            ]
        );
    }

    #[test]
    fn messages_match_startup_output() {
        assert_eq!(
            CheckError::UnresolvableManager {
                path: "a.B".into()
            }
            .to_string(),
            "Extension Manager path: a.B doesn't exist"
        );
        assert_eq!(
            CheckError::EmptyPluginPath {
                path: String::new()
            }
            .to_string(),
            "Wrong plugin_path "
        );
        assert_eq!(
            CheckError::MissingPluginName {
                type_name: "SandboxPlugin".into()
            }
            .to_string(),
            "Missing field PLUGIN_NAME for plugin - SandboxPlugin"
        );
    }

    #[test]
    fn defaults_include_extension_check() {
        assert_eq!(CheckRegistry::with_defaults().names(), ["extensions"]);
    }
}
