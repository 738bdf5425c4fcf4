//! Show command implementation

use crate::output::OutputWriter;
use crate::output_types::SectionCount;
use crate::storage::Session;
use anyhow::{Context, Result};
use folio_core::models::Section;

pub async fn execute(session: &mut Session, output: &OutputWriter) -> Result<()> {
    session.load().await?;
    let data = session.client.data().context("Portal data is not loaded")?;

    let counts = Section::lists()
        .map(|section| {
            Ok(SectionCount {
                section: section.to_string(),
                count: data.section_len(section)?,
            })
        })
        .collect::<folio_core::Result<Vec<_>>>()?;

    if output.is_json() {
        output.result(serde_json::json!({
            "backend": session.backend.to_string(),
            "about": data.about,
            "sections": counts,
        }))?;
        return Ok(());
    }

    let about = &data.about;
    output.section("About");
    output.kv("Name", &about.name);
    if !about.title.is_empty() {
        output.kv("Title", &about.title);
    }
    if !about.email.is_empty() {
        output.kv("Email", &about.email);
    }
    if !about.location.is_empty() {
        output.kv("Location", &about.location);
    }

    output.section(format!("Sections ({} storage)", session.backend));
    output.table(counts);

    Ok(())
}
