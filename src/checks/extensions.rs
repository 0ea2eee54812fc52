use crate::checks::{CheckContext, CheckError};
use crate::model::config::ExtensionSettings;
use crate::plugin::registry::{PluginClass, Registry};

pub fn check(ctx: &CheckContext<'_>) -> Vec<CheckError> {
    check_extensions(&ctx.config.extensions, ctx.registry)
}

/// Confirm the configured manager and plugins resolve.
pub fn check_extensions(settings: &ExtensionSettings, registry: &Registry) -> Vec<CheckError> {
    let mut errors = Vec::new();
    check_manager(settings.manager.as_deref(), registry, &mut errors);

    for plugin_path in &settings.plugins {
        check_single_plugin(plugin_path, registry, &mut errors);
    }

    errors
}

fn check_manager(manager: Option<&str>, registry: &Registry, errors: &mut Vec<CheckError>) {
    let Some(path) = manager.filter(|path| !path.is_empty()) else {
        errors.push(CheckError::MissingManagerConfig);
        return;
    };

    if let Err(err) = registry.resolve_manager(path) {
        tracing::debug!("manager {path}: {err}");
        errors.push(CheckError::UnresolvableManager {
            path: path.to_string(),
        });
    }
}

fn check_single_plugin(plugin_path: &str, registry: &Registry, errors: &mut Vec<CheckError>) {
    if plugin_path.is_empty() {
        errors.push(CheckError::EmptyPluginPath {
            path: plugin_path.to_string(),
        });
        return;
    }

    let class = match registry.resolve_plugin(plugin_path) {
        Ok(class) => class,
        Err(err) => {
            tracing::debug!("plugin {plugin_path}: {err}");
            errors.push(CheckError::UnresolvablePlugin {
                path: plugin_path.to_string(),
            });
            return;
        }
    };

    // Any earlier problem, even an unrelated one, skips the name check.
    if errors.is_empty() {
        check_plugin_name(class, errors);
    }
}

fn check_plugin_name(class: &PluginClass, errors: &mut Vec<CheckError>) {
    if !class.has_name() {
        errors.push(CheckError::MissingPluginName {
            type_name: class.type_name.to_string(),
        });
    }
}
