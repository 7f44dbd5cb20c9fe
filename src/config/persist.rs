//! Configuration persistence using toml_edit to preserve formatting and comments.

use crate::overrides::Overrides;
use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

/// Save the entire config to a TOML file, creating parent directories.
pub fn save_config(path: &Path, config: &super::Config) -> Result<()> {
    let new_content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    let new_doc: DocumentMut = new_content
        .parse()
        .with_context(|| "Failed to parse serialized config")?;

    ensure_parent(path)?;
    std::fs::write(path, new_doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Update just the overrides table of the config file.
///
/// The rest of the file, including comments, is left untouched. A missing
/// file is created holding only the overrides.
pub fn update_overrides(path: &Path, overrides: &Overrides) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let overrides_toml = toml::to_string(&OverridesWrapper {
        overrides: overrides.clone(),
    })
    .with_context(|| "Failed to serialize overrides")?;
    let overrides_doc: DocumentMut = overrides_toml
        .parse()
        .with_context(|| "Failed to parse serialized overrides")?;

    match overrides_doc.get("overrides") {
        Some(item) if !overrides.is_empty() => doc["overrides"] = item.clone(),
        _ => {
            doc.remove("overrides");
        }
    }

    ensure_parent(path)?;
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct OverridesWrapper {
    overrides: Overrides,
}
