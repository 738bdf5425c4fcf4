//! Inbox review commands

use crate::cli::{ApplicationAction, MessageAction};
use crate::errors;
use crate::interactive::confirm;
use crate::output::OutputWriter;
use crate::output_types::{ApplicationRow, MessageRow};
use crate::storage::Session;
use anyhow::Result;
use folio_core::models::{ApplicationStatus, InboxRecord, MessageStatus};
use folio_store::ports::InboxStore;
use serde::Serialize;
use tabled::Tabled;

pub async fn applications(
    action: ApplicationAction,
    session: &Session,
    output: &OutputWriter,
) -> Result<()> {
    let inbox = session.applications().as_ref();

    match action {
        ApplicationAction::List => {
            let applications = inbox.list().await.map_err(|e| session.fail(e))?;
            let rows: Vec<ApplicationRow> = applications.iter().map(ApplicationRow::from).collect();
            print_list(&applications, rows, output)
        }
        ApplicationAction::Status { id, status } => {
            let status: ApplicationStatus = status.parse().map_err(|e| session.fail(e))?;
            set_status(inbox, &id, status, session, output).await
        }
        ApplicationAction::Delete { id, confirm: args } => {
            delete(inbox, &id, args.yes, session, output).await
        }
    }
}

pub async fn messages(action: MessageAction, session: &Session, output: &OutputWriter) -> Result<()> {
    let inbox = session.messages().as_ref();

    match action {
        MessageAction::List => {
            let messages = inbox.list().await.map_err(|e| session.fail(e))?;
            let rows: Vec<MessageRow> = messages.iter().map(MessageRow::from).collect();
            print_list(&messages, rows, output)
        }
        MessageAction::Read { id } => {
            set_status(inbox, &id, MessageStatus::Read, session, output).await
        }
        MessageAction::Delete { id, confirm: args } => {
            delete(inbox, &id, args.yes, session, output).await
        }
    }
}

fn print_list<R: Serialize, T: Tabled + Serialize>(
    records: &[R],
    rows: Vec<T>,
    output: &OutputWriter,
) -> Result<()> {
    if output.is_json() {
        output.result(records)?;
    } else {
        output.table(rows);
    }
    Ok(())
}

async fn set_status<R: InboxRecord>(
    inbox: &dyn InboxStore<R>,
    id: &str,
    status: R::Status,
    session: &Session,
    output: &OutputWriter,
) -> Result<()> {
    let updated = inbox.set_status(id, status).await.map_err(|e| session.fail(e))?;
    let Some(record) = updated else {
        return Err(errors::inbox_entry_not_found(R::KIND, id).into());
    };

    if output.is_json() {
        output.result(&record)?;
    } else {
        output.success(format!("{} {} is now {}", R::KIND, id, record.status()));
    }
    Ok(())
}

async fn delete<R: InboxRecord>(
    inbox: &dyn InboxStore<R>,
    id: &str,
    yes: bool,
    session: &Session,
    output: &OutputWriter,
) -> Result<()> {
    if !confirm(&format!("Delete {} {}?", R::KIND, id), yes)? {
        output.info("Nothing deleted");
        return Ok(());
    }

    if !inbox.delete(id).await.map_err(|e| session.fail(e))? {
        return Err(errors::inbox_entry_not_found(R::KIND, id).into());
    }

    output.success(format!("Deleted {} {}", R::KIND, id));
    Ok(())
}
