//! Whole-document commands: export, import, reset

use crate::cli::{ConfirmArgs, ExportArgs, ImportArgs};
use crate::errors;
use crate::interactive::confirm;
use crate::output::OutputWriter;
use crate::progress::with_spinner;
use crate::storage::Session;
use anyhow::{Context, Result};
use std::fs;

pub async fn export(args: ExportArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let Some(path) = args.output else {
        // The export itself is the output
        let result = session.client.export_data().await;
        let text = result.map_err(|e| session.fail(e))?;
        println!("{}", text);
        return Ok(());
    };

    let hidden = output.is_json();
    let result = with_spinner("Exporting portal data...", "Exported portal data", hidden, async {
        session.client.export_data().await
    })
    .await;
    let text = result.map_err(|e| session.fail(e))?;

    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    output.success(format!("Exported portal data to {}", path.display()));
    Ok(())
}

pub async fn import(args: ImportArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    if !args.file.exists() {
        return Err(errors::file_not_found(&args.file.display().to_string()).into());
    }
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let prompt = format!("Replace all portal content with {}?", args.file.display());
    if !confirm(&prompt, args.confirm.yes)? {
        output.info("Nothing imported");
        return Ok(());
    }

    let hidden = output.is_json();
    let result = with_spinner("Importing portal data...", "Imported portal data", hidden, async {
        session.client.import_data(&text).await
    })
    .await;
    result.map_err(|e| session.fail(e))?;

    output.success(format!("Imported {}", args.file.display()));
    Ok(())
}

pub async fn reset(args: ConfirmArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    if !confirm("Replace all portal content with the defaults?", args.yes)? {
        output.info("Nothing reset");
        return Ok(());
    }

    let result = session.client.reset_data().await;
    result.map_err(|e| session.fail(e))?;

    output.success("Portal data reset to defaults");
    Ok(())
}
