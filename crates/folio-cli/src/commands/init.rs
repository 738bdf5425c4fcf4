//! Init command implementation

use crate::cli::{Cli, InitArgs};
use crate::config_loader::load_from_dir;
use crate::interactive::{interactive_init, InitSettings};
use crate::output::OutputWriter;
use crate::output_types::InitOutput;
use crate::storage::Session;
use anyhow::{bail, Context, Result};
use folio_core::config::{BackendKind, CONFIG_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "# Folio configuration
#
# backend: memory, file, remote or postgres
# Environment variables (FOLIO_BACKEND, FOLIO_DATA_DIR, DATABASE_URL,
# FOLIO_REMOTE_URL, FOLIO_REMOTE_AUTH) override these values.

";

pub async fn execute(args: &InitArgs, cli: &Cli, output: &OutputWriter) -> Result<()> {
    let settings = if args.interactive {
        interactive_init()?
    } else {
        settings_from_flags(args, cli)
    };

    let config_path = settings.path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite",
            config_path.display()
        );
    }

    fs::create_dir_all(&settings.path)
        .with_context(|| format!("Failed to create {}", settings.path.display()))?;
    fs::write(&config_path, render(&settings)?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    // Initialize storage with what was just written
    let mut config = load_from_dir(&settings.path)?.load_from_env();
    config.data_dir.value = resolve(&settings.path, &config.data_dir.value);

    let mut initialized = true;
    match Session::open(&config).await {
        Ok(mut session) => {
            if let Err(e) = session.load().await {
                output.warning(format!("Storage is not ready yet: {}", e));
                initialized = false;
            }
        }
        Err(e) => {
            output.warning(format!("Storage is not ready yet: {}", e));
            initialized = false;
        }
    }

    if output.is_json() {
        output.result(InitOutput {
            config_path: config_path.display().to_string(),
            backend: config.backend.value.to_string(),
            data_dir: config.data_dir.value.display().to_string(),
        })?;
    } else {
        output.success(format!("Wrote {}", config_path.display()));

        output.section("Configuration");
        output.kv("Backend", config.backend.value);
        if config.backend.value == BackendKind::File {
            output.kv("Data Dir", config.data_dir.value.display());
        }
        if initialized {
            output.info("Storage initialized. Try: folio show");
        }
    }

    Ok(())
}

fn settings_from_flags(args: &InitArgs, cli: &Cli) -> InitSettings {
    let backend: BackendKind = cli.backend.map(Into::into).unwrap_or_default();
    let data_dir = (backend == BackendKind::File)
        .then(|| cli.data_dir.clone().unwrap_or_else(|| PathBuf::from(".folio")));

    InitSettings {
        path: args.path.clone(),
        backend,
        data_dir,
        database_url: None,
        remote_url: None,
        remote_auth: None,
    }
}

fn render(settings: &InitSettings) -> Result<String> {
    let body = toml::to_string(settings).context("Failed to serialize configuration")?;
    Ok(format!("{}{}", HEADER, body))
}

/// Relative data directories are relative to the folio.toml location
fn resolve(base: &Path, dir: &Path) -> PathBuf {
    if dir.is_relative() {
        base.join(dir)
    } else {
        dir.to_path_buf()
    }
}
