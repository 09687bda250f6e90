//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{NsAdminError, NsAdminResult};
use crate::ui::{self, UiContext};

const VALID_KEYS: [&str; 4] = [
    "general.log_format",
    "api.base_url",
    "api.namespaces_path",
    "api.timeout_secs",
];

/// Execute the config command.
///
/// `effective` is the loaded configuration with command-line overrides
/// applied; writes always start from the file on disk.
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    effective: &Config,
) -> NsAdminResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(effective)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut config = manager.load().await?;
            set_value(&mut config, &key, &value)?;
            manager.save(&config).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> NsAdminResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> NsAdminResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if manager.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(
        &ctx,
        &format!("Configuration initialized at {}", path.display()),
    );
    Ok(())
}

/// Apply one dot-separated key to `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> NsAdminResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => {
            config.general.log_format = value.parse().map_err(NsAdminError::User)?
        }
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "namespaces_path"] => config.api.namespaces_path = value.to_string(),
        ["api", "timeout_secs"] => config.api.timeout_secs = parse_timeout(value)?,
        _ => {
            return Err(NsAdminError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_timeout(value: &str) -> NsAdminResult<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(NsAdminError::User(format!(
            "Invalid timeout: {}. Use a positive number of seconds",
            value
        ))),
    }
}
