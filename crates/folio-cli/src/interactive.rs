use anyhow::{bail, Result};
use console::Term;
use dialoguer::{Confirm, Input, Password, Select};
use folio_core::config::BackendKind;
use serde::Serialize;
use std::path::PathBuf;

/// Ask before a destructive action unless `--yes` was given
///
/// Fails without a terminal to ask on.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !Term::stderr().is_term() {
        bail!("Refusing to continue without confirmation. Pass --yes to proceed.");
    }

    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Interactive storage setup for `folio init`
pub fn interactive_init() -> Result<InitSettings> {
    println!("\n📁 Folio Setup\n");

    let path: String = Input::new()
        .with_prompt("Directory for folio.toml")
        .default(".".to_string())
        .interact()?;

    let backend_options = vec![
        "File - JSON files in a local directory (recommended)",
        "PostgreSQL - Tables in a PostgreSQL database",
        "Remote - Hosted realtime database over REST",
        "Memory - Nothing persists (testing)",
    ];
    let backend_idx = Select::new()
        .with_prompt("Storage backend")
        .items(&backend_options)
        .default(0)
        .interact()?;
    let backend = match backend_idx {
        1 => BackendKind::Postgres,
        2 => BackendKind::Remote,
        3 => BackendKind::Memory,
        _ => BackendKind::File,
    };

    let mut result = InitSettings {
        path: PathBuf::from(path),
        backend,
        data_dir: None,
        database_url: None,
        remote_url: None,
        remote_auth: None,
    };

    match backend {
        BackendKind::File => {
            let dir: String = Input::new()
                .with_prompt("Data directory")
                .default(".folio".to_string())
                .interact()?;
            result.data_dir = Some(PathBuf::from(dir));
        }
        BackendKind::Postgres => {
            println!("\n📦 PostgreSQL Configuration\n");

            let host: String = Input::new()
                .with_prompt("PostgreSQL host")
                .default("localhost".to_string())
                .interact()?;

            let port: u16 = Input::new().with_prompt("PostgreSQL port").default(5432).interact()?;

            let database: String = Input::new()
                .with_prompt("Database name")
                .default("folio".to_string())
                .interact()?;

            let user: String = Input::new()
                .with_prompt("Username")
                .default("postgres".to_string())
                .interact()?;

            let password: String = Password::new()
                .with_prompt("Password (optional, press Enter to skip)")
                .allow_empty_password(true)
                .interact()?;

            let url = if password.is_empty() {
                format!("postgresql://{}@{}:{}/{}", user, host, port, database)
            } else {
                format!("postgresql://{}:{}@{}:{}/{}", user, password, host, port, database)
            };
            result.database_url = Some(url);
        }
        BackendKind::Remote => {
            let url: String = Input::new()
                .with_prompt("Database URL (e.g. https://my-site.firebaseio.com)")
                .interact()?;

            let auth: String = Password::new()
                .with_prompt("Auth token (optional, press Enter to skip)")
                .allow_empty_password(true)
                .interact()?;

            result.remote_url = Some(url);
            result.remote_auth = (!auth.is_empty()).then_some(auth);
        }
        BackendKind::Memory => {}
    }

    println!("\n📋 Configuration Summary\n");
    println!("  Path:           {}", result.path.display());
    println!("  Storage:        {}", result.backend);
    if let Some(ref dir) = result.data_dir {
        println!("  Data Dir:       {}", dir.display());
    }
    if let Some(ref url) = result.database_url {
        // Hide credentials in display
        let display_url = url.split('@').next_back().unwrap_or(url);
        println!("  Database:       {}", display_url);
    }
    if let Some(ref url) = result.remote_url {
        println!("  Remote:         {}", url);
    }
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Write folio.toml with these settings?")
        .default(true)
        .interact()?;

    if !confirmed {
        bail!("Setup cancelled");
    }

    Ok(result)
}

/// Settings written by `folio init`
#[derive(Debug, Serialize)]
pub struct InitSettings {
    /// Directory receiving folio.toml
    #[serde(skip)]
    pub path: PathBuf,
    pub backend: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_auth: Option<String>,
}
