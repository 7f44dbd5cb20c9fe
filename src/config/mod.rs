pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::template::Template;

/// Config file locations searched when no path is given, in order.
const DEFAULT_PATHS: &[&str] = &["./scenerename.toml", "~/.config/scenerename/config.toml"];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config.
///
/// Returns the path the config came from, or the path it would be saved to
/// when nothing was found.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<(Config, PathBuf)> {
    if let Some(path) = custom_path {
        if path.exists() {
            return Ok((load_config(path)?, path.to_path_buf()));
        }
        tracing::debug!("Config file {:?} does not exist yet, using defaults", path);
        return Ok((Config::default(), path.to_path_buf()));
    }

    for path_str in DEFAULT_PATHS {
        let path = PathBuf::from(shellexpand::tilde(path_str).as_ref());
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            return Ok((load_config(&path)?, path));
        }
    }

    Ok((Config::default(), default_config_path()))
}

/// Where a config is written when none exists yet.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.config/scenerename/config.toml").as_ref())
}

/// Validate configuration. Called once flags have been applied, before any
/// file is touched.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.conversion.format.trim().is_empty() {
        anyhow::bail!("Conversion format cannot be empty");
    }
    if config.conversion.converter.trim().is_empty() {
        anyhow::bail!("Converter cannot be empty");
    }

    if !config.default_service.is_empty()
        && !crate::services::KNOWN_SERVICES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&config.default_service))
    {
        anyhow::bail!(
            "Unknown default service '{}' (known: {})",
            config.default_service,
            crate::services::KNOWN_SERVICES.join(", ")
        );
    }

    let templates = [
        ("templates.movies", &config.templates.movies),
        ("templates.shows", &config.templates.shows),
        ("services.omdb.templates.movies", &config.services.omdb.templates.movies),
        ("services.omdb.templates.shows", &config.services.omdb.templates.shows),
        ("directories.movies", &config.directories.movies),
        ("directories.shows", &config.directories.shows),
        ("conversion.args_template", &config.conversion.args_template),
    ];
    for (key, template) in templates {
        Template::parse(template).with_context(|| format!("Invalid template in {key}"))?;
    }
    if let Some(dirs) = &config.services.omdb.directories {
        Template::parse(&dirs.movies)
            .with_context(|| "Invalid template in services.omdb.directories.movies")?;
        Template::parse(&dirs.shows)
            .with_context(|| "Invalid template in services.omdb.directories.shows")?;
    }

    Ok(())
}
