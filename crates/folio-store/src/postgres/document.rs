//! DocumentBackend implementation for PostgreSQL

use async_trait::async_trait;
use folio_core::error::{FolioError, Result};
use folio_core::models::PortalData;
use serde_json::{Map, Value};

use super::{db_error, PostgresStore, BACKEND};
use crate::ports::DocumentBackend;

#[async_trait]
impl DocumentBackend for PostgresStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get_document(&self) -> Result<Option<PortalData>> {
        let rows: Vec<(String, Value)> =
            sqlx::query_as("SELECT section, content FROM portal_sections")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to read portal sections", e))?;

        from_section_rows(rows)
    }

    async fn put_document(&self, data: &PortalData) -> Result<()> {
        let sections = section_rows(data)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        for (section, content) in &sections {
            sqlx::query(
                r#"
                INSERT INTO portal_sections (section, content, updated_at)
                VALUES ($1, $2, now())
                ON CONFLICT (section)
                DO UPDATE SET content = EXCLUDED.content, updated_at = now()
                "#,
            )
            .bind(section)
            .bind(content)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error(&format!("Failed to write section '{}'", section), e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit portal document", e))?;

        tracing::debug!(sections = sections.len(), "Wrote portal document");
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        self.health_check().await
    }
}

/// One `portal_sections` row per top-level key of the document
fn section_rows(data: &PortalData) -> Result<Map<String, Value>> {
    match serde_json::to_value(data)? {
        Value::Object(sections) => Ok(sections),
        _ => Err(FolioError::Serialization(
            "portal document did not serialize to an object".to_string(),
        )),
    }
}

/// Reassemble the document from its rows; `None` when no row exists
fn from_section_rows(rows: Vec<(String, Value)>) -> Result<Option<PortalData>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let document: Map<String, Value> = rows.into_iter().collect();
    serde_json::from_value(Value::Object(document))
        .map(Some)
        .map_err(|e| db_error("Stored portal sections are invalid", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::defaults::default_portal;
    use folio_core::models::Section;
    use serde_json::json;

    #[test]
    fn test_one_row_per_section() {
        let rows = section_rows(&default_portal()).unwrap();

        assert_eq!(rows.len(), 10);
        assert!(rows["about"].is_object());
        for section in Section::lists() {
            assert!(rows[section.as_str()].is_array(), "{} is not a list row", section);
        }
    }

    #[test]
    fn test_rows_rebuild_the_document() {
        let data = default_portal();
        let rows: Vec<(String, Value)> = section_rows(&data).unwrap().into_iter().collect();

        assert_eq!(from_section_rows(rows).unwrap(), Some(data));
    }

    #[test]
    fn test_no_rows_is_no_document() {
        assert_eq!(from_section_rows(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_missing_section_rows_are_empty_lists() {
        let rows = vec![("about".to_string(), json!({"name": "Ada"}))];
        let data = from_section_rows(rows).unwrap().unwrap();

        assert_eq!(data.about.name, "Ada");
        assert!(data.research.is_empty());
    }

    #[test]
    fn test_corrupt_row_is_backend_error() {
        let rows = vec![
            ("about".to_string(), json!({"name": "Ada"})),
            ("projects".to_string(), json!("not a list")),
        ];
        let err = from_section_rows(rows).unwrap_err();
        assert!(matches!(err, FolioError::Backend { .. }));
    }
}
