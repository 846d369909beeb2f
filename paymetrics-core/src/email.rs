//! Raw email records as handed over by the mailbox collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the `body` of a [`RawEmail`] should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeHint {
    PlainText,
    Html,
    /// Sniff the body for markup
    #[default]
    Unknown,
}

impl MimeHint {
    pub fn from_mime_type(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "text/plain" => MimeHint::PlainText,
            "text/html" => MimeHint::Html,
            _ => MimeHint::Unknown,
        }
    }
}

/// One MIME part of a message (text/plain, text/html, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub mime_type: String,
    pub content: String,
}

impl BodyPart {
    pub fn new(mime_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    pub fn hint(&self) -> MimeHint {
        MimeHint::from_mime_type(&self.mime_type)
    }
}

/// An email exactly as fetched from the mailbox. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmail {
    /// Opaque message id, unique per mailbox
    pub id: String,
    pub sender: String,
    pub subject: String,
    /// Raw payload; may be markup
    pub body: String,
    /// When the mailbox received the message, if the collaborator knows
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mime_hint: MimeHint,
    /// Individual MIME parts, when exposed separately from `body`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<BodyPart>,
}

impl RawEmail {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            subject: subject.into(),
            body: body.into(),
            received_at: None,
            mime_hint: MimeHint::Unknown,
            parts: Vec::new(),
        }
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    pub fn with_hint(mut self, hint: MimeHint) -> Self {
        self.mime_hint = hint;
        self
    }

    pub fn with_part(mut self, part: BodyPart) -> Self {
        self.parts.push(part);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "id": "m-1",
            "sender": "alerts@hdfcbank.net",
            "subject": "Transaction Alert",
            "body": "Rs.10.00 has been debited"
        }"#;
        let email: RawEmail = serde_json::from_str(json).unwrap();
        assert_eq!(email.id, "m-1");
        assert_eq!(email.received_at, None);
        assert_eq!(email.mime_hint, MimeHint::Unknown);
        assert!(email.parts.is_empty());
    }

    #[test]
    fn test_mime_hint_from_type() {
        assert_eq!(MimeHint::from_mime_type("TEXT/HTML"), MimeHint::Html);
        assert_eq!(MimeHint::from_mime_type("text/plain"), MimeHint::PlainText);
        assert_eq!(MimeHint::from_mime_type("image/png"), MimeHint::Unknown);
    }
}
