//! Application configuration for Docflow.
//!
//! User config lives at `~/.docflow/docflow.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocflowError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docflow.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docflow";

// ---------------------------------------------------------------------------
// Config structs (matching docflow.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Parsing behavior.
    #[serde(default)]
    pub parsing: ParsingConfig,
}

/// `[parsing]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Coerce numeric-looking frontmatter scalars to numbers.
    ///
    /// Off by default: coercion corrupts version-like string ids such as
    /// `"1.0"` and breaks the serialize/parse round-trip for them.
    #[serde(default)]
    pub coerce_numeric_scalars: bool,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docflow/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocflowError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docflow/docflow.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocflowError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocflowError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocflowError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocflowError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocflowError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("coerce_numeric_scalars"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(!parsed.parsing.coerce_numeric_scalars);
    }

    #[test]
    fn empty_config_fills_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert!(!config.parsing.coerce_numeric_scalars);
    }

    #[test]
    fn parsing_section_overrides() {
        let toml_str = r#"
[parsing]
coerce_numeric_scalars = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.parsing.coerce_numeric_scalars);
    }
}
