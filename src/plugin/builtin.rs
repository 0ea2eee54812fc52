//! Manager and plugin types compiled into the binary.

use crate::plugin::registry::{ExtensionManager, Plugin, Registry, RegistryError};

pub const MANAGER_PATH: &str = "extensions.manager.PluginsManager";

#[derive(Debug, Default)]
pub struct PluginsManager;

impl ExtensionManager for PluginsManager {}

#[derive(Debug, Default)]
pub struct WebhookPlugin;

impl Plugin for WebhookPlugin {
    const PLUGIN_NAME: &'static str = "Webhooks";
}

#[derive(Debug, Default)]
pub struct InvoicingPlugin;

impl Plugin for InvoicingPlugin {
    const PLUGIN_NAME: &'static str = "Invoicing";
}

#[derive(Debug, Default)]
pub struct AdminEmailPlugin;

impl Plugin for AdminEmailPlugin {
    const PLUGIN_NAME: &'static str = "Admin emails";
}

/// Development stub; it has no name yet.
#[derive(Debug, Default)]
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    const PLUGIN_NAME: &'static str = "";
}

pub fn registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    registry.register_manager::<PluginsManager>(MANAGER_PATH)?;
    registry.register_plugin::<WebhookPlugin>("extensions.plugins.webhook.WebhookPlugin")?;
    registry.register_plugin::<InvoicingPlugin>("extensions.plugins.invoicing.InvoicingPlugin")?;
    registry
        .register_plugin::<AdminEmailPlugin>("extensions.plugins.admin_email.AdminEmailPlugin")?;
    registry.register_plugin::<SandboxPlugin>("extensions.plugins.sandbox.SandboxPlugin")?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_cleanly() {
        let registry = registry().unwrap();
        assert!(registry.resolve_manager(MANAGER_PATH).is_ok());
        assert_eq!(registry.plugins().len(), 4);

        let sandbox = registry
            .resolve_plugin("extensions.plugins.sandbox.SandboxPlugin")
            .unwrap();
        assert_eq!(sandbox.type_name, "SandboxPlugin");
        assert!(!sandbox.has_name());
    }
}
