use folio_core::models::{ApplicationData, ContactMessage, Section};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of `folio list`
#[derive(Debug, Serialize, Tabled)]
pub struct RecordRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Details")]
    pub details: String,
}

impl RecordRow {
    pub fn from_record(section: Section, record: &Value) -> Self {
        let title_key = match section {
            Section::Education => "degree",
            Section::Categories | Section::Certifications => "name",
            _ => "title",
        };
        let detail_keys: &[&str] = match section {
            Section::Education => &["institution", "year"],
            Section::Projects => &["technologies"],
            Section::Courses => &["code", "semester"],
            Section::Research => &["venue", "year"],
            Section::Openings => &["kind", "status"],
            Section::Blogs => &["publishedAt"],
            Section::Categories => &["description"],
            Section::Gallery => &["caption"],
            Section::Certifications => &["issuer", "date"],
            Section::About => &[],
        };

        let details = detail_keys
            .iter()
            .map(|key| text(&record[*key]))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");

        Self {
            id: text(&record["id"]),
            title: text(&record[title_key]),
            details: truncate(&details, 60),
        }
    }
}

/// One row of `folio show`
#[derive(Debug, Serialize, Tabled)]
pub struct SectionCount {
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "Records")]
    pub count: usize,
}

/// One row of `folio applications list`
#[derive(Debug, Serialize, Tabled)]
pub struct ApplicationRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Opening")]
    pub opening_id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Submitted")]
    pub submitted_at: String,
}

impl From<&ApplicationData> for ApplicationRow {
    fn from(application: &ApplicationData) -> Self {
        Self {
            id: application.id.clone(),
            opening_id: application.opening_id.clone(),
            name: application.name.clone(),
            email: application.email.clone(),
            status: application.status.to_string(),
            submitted_at: application.submitted_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// One row of `folio messages list`
#[derive(Debug, Serialize, Tabled)]
pub struct MessageRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "Subject")]
    pub subject: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Received")]
    pub received_at: String,
}

impl From<&ContactMessage> for MessageRow {
    fn from(message: &ContactMessage) -> Self {
        let subject = if message.subject.is_empty() {
            truncate(&message.message, 40)
        } else {
            message.subject.clone()
        };

        Self {
            id: message.id.clone(),
            from: format!("{} <{}>", message.name, message.email),
            subject,
            status: message.status.to_string(),
            received_at: message.received_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Output for init command
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub config_path: String,
    pub backend: String,
    pub data_dir: String,
}

/// Output for bibtex command
#[derive(Debug, Serialize)]
pub struct BibtexOutput {
    pub imported: usize,
    pub records: Vec<Value>,
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
