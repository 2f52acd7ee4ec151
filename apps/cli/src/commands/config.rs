//! `nearby config show|init`

use nearby_client::{ClientConfig, ClientError};
use tracing::info;

use super::print_json;
use crate::error::{CliError, ErrorCode};
use crate::{Cli, ConfigAction};

pub async fn run(action: ConfigAction, cli: &Cli) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => show(cli),
        ConfigAction::Init { force } => init(cli, force),
    }
}

fn show(cli: &Cli) -> Result<(), CliError> {
    let config = super::effective_config(cli)?;

    if cli.json {
        return print_json(&config);
    }

    let path = cli.config.clone().or_else(ClientConfig::default_config_path);
    if let Some(path) = path {
        println!("# {}", path.display());
    }
    let text = toml::to_string_pretty(&config).map_err(ClientError::from)?;
    print!("{}", text);
    Ok(())
}

fn init(cli: &Cli, force: bool) -> Result<(), CliError> {
    let path = cli
        .config
        .clone()
        .or_else(ClientConfig::default_config_path)
        .ok_or_else(|| CliError::new(ErrorCode::ConfigError, "No config path available"))?;

    if path.exists() && !force {
        return Err(CliError::new(
            ErrorCode::ConfigError,
            format!("{} already exists (use --force)", path.display()),
        ));
    }

    let mut config = ClientConfig::default();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }
    config.validate()?;
    config.save(Some(path.clone()))?;

    info!(path = %path.display(), "Config written");
    println!("{}", path.display());
    Ok(())
}
