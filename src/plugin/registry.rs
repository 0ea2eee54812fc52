use std::collections::HashMap;

use thiserror::Error;

use crate::plugin::path::{DottedPath, PathError};

/// Capability every plugin type exposes. An empty name counts as missing.
pub trait Plugin: 'static {
    const PLUGIN_NAME: &'static str;
}

/// Marker for types that can be configured as the extensions manager.
pub trait ExtensionManager: 'static {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerClass {
    pub path: DottedPath,
    pub type_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginClass {
    pub path: DottedPath,
    pub type_name: &'static str,
    pub plugin_name: &'static str,
}

impl PluginClass {
    pub fn has_name(&self) -> bool {
        !self.plugin_name.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("{0} is already registered")]
    Duplicate(DottedPath),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("{0} is not registered")]
    NotFound(DottedPath),
}

/// Dotted path → type lookup, filled once at startup.
///
/// Managers and plugins share one namespace: a path can be registered only
/// once, but each `resolve_*` only finds entries of its own kind.
#[derive(Debug, Default)]
pub struct Registry {
    managers: HashMap<DottedPath, ManagerClass>,
    plugins: HashMap<DottedPath, PluginClass>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_manager<M: ExtensionManager>(
        &mut self,
        path: &str,
    ) -> Result<(), RegistryError> {
        let path = self.vacant(path)?;
        let class = ManagerClass {
            path: path.clone(),
            type_name: short_type_name::<M>(),
        };
        tracing::debug!("registered manager {} ({})", class.path, class.type_name);
        self.managers.insert(path, class);
        Ok(())
    }

    pub fn register_plugin<P: Plugin>(&mut self, path: &str) -> Result<(), RegistryError> {
        let path = self.vacant(path)?;
        let class = PluginClass {
            path: path.clone(),
            type_name: short_type_name::<P>(),
            plugin_name: P::PLUGIN_NAME,
        };
        tracing::debug!("registered plugin {} ({})", class.path, class.type_name);
        self.plugins.insert(path, class);
        Ok(())
    }

    pub fn resolve_manager(&self, raw: &str) -> Result<&ManagerClass, ResolveError> {
        let path = DottedPath::parse(raw)?;
        self.managers.get(&path).ok_or(ResolveError::NotFound(path))
    }

    pub fn resolve_plugin(&self, raw: &str) -> Result<&PluginClass, ResolveError> {
        let path = DottedPath::parse(raw)?;
        self.plugins.get(&path).ok_or(ResolveError::NotFound(path))
    }

    /// Registered managers, sorted by path.
    pub fn managers(&self) -> Vec<&ManagerClass> {
        let mut managers: Vec<_> = self.managers.values().collect();
        managers.sort_by(|a, b| a.path.cmp(&b.path));
        managers
    }

    /// Registered plugins, sorted by path.
    pub fn plugins(&self) -> Vec<&PluginClass> {
        let mut plugins: Vec<_> = self.plugins.values().collect();
        plugins.sort_by(|a, b| a.path.cmp(&b.path));
        plugins
    }

    fn vacant(&self, raw: &str) -> Result<DottedPath, RegistryError> {
        let path = DottedPath::parse(raw)?;
        if self.managers.contains_key(&path) || self.plugins.contains_key(&path) {
            return Err(RegistryError::Duplicate(path));
        }
        Ok(path)
    }
}

/// Last path segment of the type, without generic arguments.
fn short_type_name<T: 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
