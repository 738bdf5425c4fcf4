//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use folio_core::config::{CliConfigOverrides, LayeredConfig, CONFIG_FILE_NAME};
use std::path::Path;

use crate::cli::Cli;

/// Load layered configuration: defaults, file, environment, then flags
///
/// An explicit `--config` file must exist. Otherwise `./folio.toml` is read
/// when present.
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();
    let config = match &cli.config {
        Some(path) => config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => config
            .load_from_optional_file(CONFIG_FILE_NAME)
            .context("Failed to load folio.toml")?,
    };

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(cli));
    Ok(config)
}

/// Load the folio.toml in `dir` on top of defaults
pub fn load_from_dir(dir: &Path) -> Result<LayeredConfig> {
    LayeredConfig::with_defaults()
        .load_from_optional_file(dir.join(CONFIG_FILE_NAME))
        .context("Failed to load folio.toml")
}

fn overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        backend: cli.backend.map(Into::into),
        data_dir: cli.data_dir.clone(),
        database_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use folio_core::config::{BackendKind, ConfigSource};
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "backend = \"file\"\ndata_dir = \"from-file\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "folio",
            "--config",
            path.to_str().unwrap(),
            "--backend",
            "memory",
            "show",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.backend.value, BackendKind::Memory);
        assert_eq!(config.backend.source, ConfigSource::Cli);
        assert_eq!(config.data_dir.value, PathBuf::from("from-file"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let cli = Cli::try_parse_from(["folio", "--config", "/nonexistent/folio.toml", "show"])
            .unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from_dir(dir.path()).unwrap();
        assert_eq!(config.backend.source, ConfigSource::Default);
    }
}
