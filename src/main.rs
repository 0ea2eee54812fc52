mod checks;
mod model;
mod plugin;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use checks::{CheckContext, CheckError, CheckRegistry};
use model::config::AppConfig;
use plugin::registry::Registry;

/// Startup integrity checks for plugin extension configuration.
#[derive(Parser)]
#[command(name = "extcheck")]
#[command(version)]
struct Cli {
    /// List registered managers and plugins instead of running the checks
    #[arg(long)]
    list: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let _guard = init_logging(&config)?;

    tracing::info!("extcheck starting");
    if let Some(source) = config.source.as_ref() {
        tracing::debug!("merged user config from {}", source.display());
    }

    let registry = plugin::builtin::registry().context("failed to register built-in types")?;

    if cli.list {
        list(&registry, &mut io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    let errors = run_checks(&config, &registry);
    report(&errors, &mut io::stderr().lock())?;
    Ok(ExitCode::from(exit_status(&errors)))
}

fn run_checks(config: &AppConfig, registry: &Registry) -> Vec<CheckError> {
    let ctx = CheckContext { config, registry };
    let checks = CheckRegistry::with_defaults();
    tracing::debug!("running checks: {}", checks.names().join(", "));
    let errors = checks.run(&ctx);

    tracing::info!("startup checks finished: {} problem(s)", errors.len());
    errors
}

fn report(errors: &[CheckError], out: &mut impl Write) -> io::Result<()> {
    for err in errors {
        writeln!(out, "ERROR: {err}")?;
    }
    Ok(())
}

/// 0 when the configuration is clean, 1 when any check reported a problem.
fn exit_status(errors: &[CheckError]) -> u8 {
    if errors.is_empty() { 0 } else { 1 }
}

fn list(registry: &Registry, out: &mut impl Write) -> io::Result<()> {
    for manager in registry.managers() {
        writeln!(out, "manager {} ({})", manager.path.as_str(), manager.type_name)?;
    }
    for plugin in registry.plugins() {
        let name = if plugin.has_name() {
            plugin.plugin_name
        } else {
            "<unnamed>"
        };
        writeln!(
            out,
            "plugin  {} ({}): {name}",
            plugin.path.as_str(),
            plugin.type_name
        )?;
    }
    Ok(())
}

/// Log to a daily file in the data dir, never stdout.
fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "extcheck")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid logging filter")?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "extcheck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn sandbox_config() -> AppConfig {
        AppConfig::load_from(None, |key| {
            (key == model::config::PLUGINS_ENV)
                .then(|| "extensions.plugins.sandbox.SandboxPlugin".to_string())
        })
        .unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_supported_arguments() {
        assert!(!Cli::try_parse_from(["extcheck"]).unwrap().list);
        assert!(Cli::try_parse_from(["extcheck", "--list"]).unwrap().list);
    }

    #[test]
    fn rejects_unknown_or_extra_arguments() {
        let err = Cli::try_parse_from(["extcheck", "--bogus"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["extcheck", "--list", "extra"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn default_config_passes_builtin_checks() {
        let registry = plugin::builtin::registry().unwrap();
        let config = AppConfig::load_from(None, |_| None).unwrap();

        let errors = run_checks(&config, &registry);
        assert!(errors.is_empty());
        assert_eq!(exit_status(&errors), 0);

        let mut out = Vec::new();
        report(&errors, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn nameless_plugin_fails_with_error_line() {
        let registry = plugin::builtin::registry().unwrap();
        let errors = run_checks(&sandbox_config(), &registry);
        assert_eq!(
            errors,
            [CheckError::MissingPluginName {
                type_name: "SandboxPlugin".to_string()
            }]
        );
        assert_eq!(exit_status(&errors), 1);

        let mut out = Vec::new();
        report(&errors, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ERROR: Missing field PLUGIN_NAME for plugin - SandboxPlugin\n"
        );
    }

    #[test]
    fn list_prints_managers_then_plugins() {
        let registry = plugin::builtin::registry().unwrap();
        let mut out = Vec::new();
        list(&registry, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "manager extensions.manager.PluginsManager (PluginsManager)"
        );
        assert!(lines.contains(
            &"plugin  extensions.plugins.sandbox.SandboxPlugin (SandboxPlugin): <unnamed>"
        ));
        assert!(lines.contains(
            &"plugin  extensions.plugins.webhook.WebhookPlugin (WebhookPlugin): Webhooks"
        ));
    }
}
