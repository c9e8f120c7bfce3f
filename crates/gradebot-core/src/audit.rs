use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{errors::Error, Result};

const AUDIT_MAX_TEXT: usize = 500;

/// RFC3339 timestamp in UTC.
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    fn new(event: &str) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            user_id: None,
            username: None,
            chat_id: None,
            message_id: None,
            content: None,
            result: None,
            error: None,
        }
    }

    pub fn start(user_id: i64, username: Option<&str>) -> Self {
        Self {
            user_id: Some(user_id),
            username: username.map(|s| s.to_string()),
            ..Self::new("start")
        }
    }

    /// Terminal calculator outcome (`summer_course`, `needed`, or a tier name).
    pub fn calc_result(user_id: i64, username: Option<&str>, result: &str) -> Self {
        Self {
            user_id: Some(user_id),
            username: username.map(|s| s.to_string()),
            result: Some(result.to_string()),
            ..Self::new("calc_result")
        }
    }

    pub fn bug_report(
        user_id: i64,
        username: Option<&str>,
        group_message_id: i32,
        content: &str,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            username: username.map(|s| s.to_string()),
            message_id: Some(group_message_id),
            content: Some(content.to_string()),
            ..Self::new("bug_report")
        }
    }

    pub fn relay(staff_user_id: i64, origin_chat: i64, content: &str) -> Self {
        Self {
            user_id: Some(staff_user_id),
            chat_id: Some(origin_chat),
            content: Some(content.to_string()),
            ..Self::new("relay")
        }
    }

    pub fn relay_failed(staff_user_id: i64, origin_chat: i64, error: &str) -> Self {
        Self {
            user_id: Some(staff_user_id),
            chat_id: Some(origin_chat),
            error: Some(error.to_string()),
            ..Self::new("relay_failed")
        }
    }
}

/// Append-only audit trail, plain text blocks or JSON lines.
#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        if let Some(s) = &event.content {
            event.content = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            match v {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }

    /// Write and log instead of failing; the audit trail never blocks a reply.
    pub fn record(&self, event: AuditEvent) {
        let name = event.event.clone();
        if let Err(e) = self.write(event) {
            tracing::warn!(event = %name, error = %e, "failed to write audit event");
        }
    }
}

pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out = s.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}
