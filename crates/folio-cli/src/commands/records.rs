//! Section record commands: list, add, update, remove

use super::list_section;
use crate::cli::{AddArgs, ListArgs, RemoveArgs, UpdateArgs};
use crate::errors;
use crate::fields;
use crate::interactive::confirm;
use crate::output::OutputWriter;
use crate::output_types::RecordRow;
use crate::storage::Session;
use anyhow::{bail, Context, Result};

pub async fn list(args: ListArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let section = list_section(&args.section)?;
    session.load().await?;
    let data = session.client.data().context("Portal data is not loaded")?;

    let records = data.records(section)?;
    let rows: Vec<RecordRow> = records
        .iter()
        .map(|record| RecordRow::from_record(section, record))
        .collect();
    output.records(&records, rows);
    Ok(())
}

pub async fn add(args: AddArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let section = list_section(&args.section)?;
    let fields = fields::collect(&args.fields)?;

    let result = session.client.create_item(section, fields).await;
    let record = result.map_err(|e| session.fail(e))?;

    if output.is_json() {
        output.result(&record)?;
    } else {
        let id = record["id"].as_str().unwrap_or_default();
        output.success(format!("Created {} record {}", section, id));
    }
    Ok(())
}

pub async fn update(args: UpdateArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let section = list_section(&args.section)?;
    let patch = fields::collect(&args.fields)?;
    if patch.is_empty() {
        bail!("Nothing to update. Pass fields as key=value or key:=json");
    }

    let result = session.client.update_item(section, &args.id, patch).await;
    let Some(record) = result.map_err(|e| session.fail(e))? else {
        return Err(errors::record_not_found(section, &args.id).into());
    };

    if output.is_json() {
        output.result(&record)?;
    } else {
        output.success(format!("Updated {} record {}", section, args.id));
    }
    Ok(())
}

pub async fn remove(args: RemoveArgs, session: &mut Session, output: &OutputWriter) -> Result<()> {
    let section = list_section(&args.section)?;

    let prompt = format!("Remove {} record {}?", section, args.id);
    if !confirm(&prompt, args.confirm.yes)? {
        output.info("Nothing removed");
        return Ok(());
    }

    let result = session.client.delete_item(section, &args.id).await;
    if !result.map_err(|e| session.fail(e))? {
        return Err(errors::record_not_found(section, &args.id).into());
    }

    output.success(format!("Removed {} record {}", section, args.id));
    Ok(())
}
