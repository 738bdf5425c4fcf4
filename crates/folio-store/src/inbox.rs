//! Inbox operations shared by the backends that hold records in a list

use chrono::Utc;
use folio_core::error::Result;
use folio_core::models::{transition, InboxRecord};
use folio_core::Fields;
use uuid::Uuid;

/// Build a fresh record from submitted fields
pub(crate) fn new_record<R: InboxRecord>(fields: Fields) -> Result<R> {
    R::from_submission(Uuid::new_v4().to_string(), Utc::now(), fields)
}

/// Sort records newest first
pub(crate) fn newest_first<R: InboxRecord>(records: &mut [R]) {
    records.sort_by_key(|record| std::cmp::Reverse(record.received_at()));
}

/// Apply a status change in place; `None` if no record has this id
pub(crate) fn apply_status<R: InboxRecord>(
    records: &mut [R],
    id: &str,
    status: R::Status,
) -> Result<Option<R>> {
    let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
        return Ok(None);
    };
    transition(record, status)?;
    Ok(Some(record.clone()))
}

/// Remove a record by id, reporting whether it existed
pub(crate) fn remove<R: InboxRecord>(records: &mut Vec<R>, id: &str) -> bool {
    let before = records.len();
    records.retain(|record| record.id() != id);
    records.len() != before
}
