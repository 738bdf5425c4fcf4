//! Command implementations

mod about;
mod bibtex;
mod inbox;
mod init;
mod records;
mod show;
mod transfer;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::errors;
use crate::output::OutputWriter;
use crate::storage::Session;
use anyhow::Result;
use folio_core::models::Section;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    // init writes the configuration, so it must not require a readable one
    if let Commands::Init(args) = &cli.command {
        return init::execute(args, &cli, &output).await;
    }

    let config = config_loader::load_config(&cli)?;
    let mut session = Session::open(&config).await?;

    match cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Show => show::execute(&mut session, &output).await,
        Commands::List(args) => records::list(args, &mut session, &output).await,
        Commands::Add(args) => records::add(args, &mut session, &output).await,
        Commands::Update(args) => records::update(args, &mut session, &output).await,
        Commands::Remove(args) => records::remove(args, &mut session, &output).await,
        Commands::About(args) => about::execute(args, &mut session, &output).await,
        Commands::Export(args) => transfer::export(args, &mut session, &output).await,
        Commands::Import(args) => transfer::import(args, &mut session, &output).await,
        Commands::Reset(args) => transfer::reset(args, &mut session, &output).await,
        Commands::Bibtex(args) => bibtex::execute(args, &mut session, &output).await,
        Commands::Applications { action } => inbox::applications(action, &session, &output).await,
        Commands::Messages { action } => inbox::messages(action, &session, &output).await,
    }
}

/// Resolve a section name that record commands may operate on
fn list_section(name: &str) -> Result<Section> {
    match name.parse::<Section>() {
        Ok(section) if section.is_list() => Ok(section),
        _ => Err(errors::unknown_section(name).into()),
    }
}
