use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use crate::error::{FolioError, Result};
use crate::patch::{Fields, ID_KEY};

/// Status field of an inbox record. Transitions only move forward.
pub trait InboxStatus:
    Copy + Eq + Debug + Display + FromStr<Err = FolioError> + Serialize + DeserializeOwned + Send + Sync
{
    /// Status given to freshly submitted records
    fn initial() -> Self;

    /// Whether a record may move from `self` to `next`
    fn can_transition_to(self, next: Self) -> bool;
}

/// A record kept in one of the intake inboxes
pub trait InboxRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Status: InboxStatus;

    /// Singular kind name, also used as the storage key
    const KIND: &'static str;

    /// Field holding the arrival timestamp
    const TIMESTAMP_KEY: &'static str;

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    fn received_at(&self) -> DateTime<Utc>;

    /// Build a record from submitted fields, stamping identity, status and time
    fn from_submission(id: String, at: DateTime<Utc>, mut fields: Fields) -> Result<Self> {
        fields.insert(ID_KEY.to_string(), Value::String(id));
        fields.insert("status".to_string(), serde_json::to_value(Self::Status::initial())?);
        fields.insert(Self::TIMESTAMP_KEY.to_string(), serde_json::to_value(at)?);
        serde_json::from_value(Value::Object(fields)).map_err(|e| FolioError::InvalidSubmission {
            kind: Self::KIND.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Move `record` to `next`, rejecting backward transitions
///
/// Re-applying the current status succeeds without change.
pub fn transition<R: InboxRecord>(record: &mut R, next: R::Status) -> Result<()> {
    let current = record.status();
    if current == next {
        return Ok(());
    }
    if !current.can_transition_to(next) {
        return Err(FolioError::InvalidTransition {
            kind: R::KIND.to_string(),
            id: record.id().to_string(),
            from: current.to_string(),
            to: next.to_string(),
        });
    }
    record.set_status(next);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl InboxStatus for ApplicationStatus {
    fn initial() -> Self {
        ApplicationStatus::Pending
    }

    fn can_transition_to(self, next: Self) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Reviewed | Accepted | Rejected) | (Reviewed, Accepted | Rejected)
        )
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

impl FromStr for ApplicationStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(FolioError::UnknownStatus {
                kind: ApplicationData::KIND.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// An application submitted against an opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationData {
    pub id: String,
    /// Opening applied for. Not validated against the portal document.
    pub opening_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl InboxRecord for ApplicationData {
    type Status = ApplicationStatus;

    const KIND: &'static str = "application";
    const TIMESTAMP_KEY: &'static str = "submittedAt";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ApplicationStatus {
        self.status
    }

    fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
    }

    fn received_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Unread,
    Read,
}

impl InboxStatus for MessageStatus {
    fn initial() -> Self {
        MessageStatus::Unread
    }

    fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (MessageStatus::Unread, MessageStatus::Read))
    }
}

impl Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Unread => f.write_str("unread"),
            MessageStatus::Read => f.write_str("read"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            _ => Err(FolioError::UnknownStatus {
                kind: ContactMessage::KIND.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// A message left through the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub received_at: DateTime<Utc>,
}

impl InboxRecord for ContactMessage {
    type Status = MessageStatus;

    const KIND: &'static str = "message";
    const TIMESTAMP_KEY: &'static str = "receivedAt";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> MessageStatus {
        self.status
    }

    fn set_status(&mut self, status: MessageStatus) {
        self.status = status;
    }

    fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> Fields {
        json!({
            "openingId": "job-1",
            "name": "Grace",
            "email": "grace@example.com",
            "status": "accepted",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_submission_stamps_initial_status() {
        let at = Utc::now();
        let app = ApplicationData::from_submission("a1".to_string(), at, submission()).unwrap();
        assert_eq!(app.id, "a1");
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.submitted_at, at);
    }

    #[test]
    fn test_submission_missing_fields_rejected() {
        let err = ContactMessage::from_submission("m".to_string(), Utc::now(), Fields::new())
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidSubmission { .. }));
    }

    #[test]
    fn test_application_transitions_forward_only() {
        let mut app =
            ApplicationData::from_submission("a".to_string(), Utc::now(), submission()).unwrap();

        transition(&mut app, ApplicationStatus::Reviewed).unwrap();
        transition(&mut app, ApplicationStatus::Accepted).unwrap();
        assert!(transition(&mut app, ApplicationStatus::Pending).is_err());
        assert!(transition(&mut app, ApplicationStatus::Rejected).is_err());
        assert_eq!(app.status, ApplicationStatus::Accepted);
    }

    #[test]
    fn test_message_cannot_be_unread() {
        let fields = json!({"name": "A", "email": "a@b.c", "message": "hi"});
        let mut msg = ContactMessage::from_submission(
            "m".to_string(),
            Utc::now(),
            fields.as_object().cloned().unwrap(),
        )
        .unwrap();

        transition(&mut msg, MessageStatus::Read).unwrap();
        transition(&mut msg, MessageStatus::Read).unwrap();
        let err = transition(&mut msg, MessageStatus::Unread).unwrap_err();
        assert!(matches!(err, FolioError::InvalidTransition { .. }));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("Reviewed".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Reviewed);
        assert!("archived".parse::<MessageStatus>().is_err());
    }
}
