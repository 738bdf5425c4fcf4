//! BibTeX import command implementation

use crate::cli::BibtexArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{BibtexOutput, RecordRow};
use crate::progress::with_spinner;
use crate::storage::Session;
use anyhow::{Context, Result};
use folio_core::bibtex::ACCEPTED_TYPES;
use folio_core::models::Section;
use std::fs;

pub async fn execute(args: BibtexArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    if !args.file.exists() {
        return Err(errors::file_not_found(&args.file.display().to_string()).into());
    }
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let hidden = output.is_json();
    let result = with_spinner("Importing BibTeX entries...", "Imported BibTeX entries", hidden, async {
        session.client.import_bibtex(&text).await
    })
    .await;
    let records = result.map_err(|e| session.fail(e))?;

    if output.is_json() {
        output.result(BibtexOutput {
            imported: records.len(),
            records,
        })?;
        return Ok(());
    }

    if records.is_empty() {
        output.warning(format!(
            "No importable entries found. Accepted types: {}",
            ACCEPTED_TYPES.join(", ")
        ));
        return Ok(());
    }

    output.success(format!("Imported {} papers", records.len()));
    let rows: Vec<RecordRow> = records
        .iter()
        .map(|record| RecordRow::from_record(Section::Research, record))
        .collect();
    output.table(rows);
    Ok(())
}
