//! Outbound email capability.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{Result, SourceError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl EmailPayload {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            text: text.into(),
            html: None,
            reply_to: None,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.to.iter().all(|to| to.trim().is_empty()) {
            return Err(ValidationError::NoRecipients);
        }
        if self.subject.trim().is_empty() {
            return Err(roster_model::ModelError::MissingField("subject").into());
        }
        Ok(())
    }
}

/// Identifier assigned by the mail service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Mailer {
    fn send_email(&self, payload: &EmailPayload)
    -> impl Future<Output = Result<MessageId>> + Send;
}

/// Records every sent message in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<(MessageId, EmailPayload)>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(MessageId, EmailPayload)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Mailer for MemoryMailer {
    async fn send_email(&self, payload: &EmailPayload) -> Result<MessageId> {
        payload.validate()?;
        let id = MessageId::generate();
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), payload.clone()));
        Ok(id)
    }
}

#[derive(Debug, Serialize)]
struct OutboxLine<'a> {
    id: &'a MessageId,
    queued_at: DateTime<Utc>,
    #[serde(flatten)]
    payload: &'a EmailPayload,
}

/// Appends each message as one JSON line to an outbox file for a relay to pick up.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    path: PathBuf,
}

impl OutboxMailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Mailer for OutboxMailer {
    async fn send_email(&self, payload: &EmailPayload) -> Result<MessageId> {
        payload.validate()?;
        let id = MessageId::generate();
        let line = OutboxLine {
            id: &id,
            queued_at: Utc::now(),
            payload,
        };
        let mut json = serde_json::to_string(&line).map_err(|source| SourceError::Decode {
            table: "outbox".to_string(),
            source,
        })?;
        json.push('\n');

        let io_err = |operation: &'static str| {
            let path = self.path.clone();
            move |source| SourceError::Io {
                operation,
                path,
                source,
            }
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_err("create directory for"))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err("open"))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(io_err("append to"))?;
        file.flush().await.map_err(io_err("flush"))?;
        info!(id = %id, recipients = payload.to.len(), "queued email");
        Ok(id)
    }
}
