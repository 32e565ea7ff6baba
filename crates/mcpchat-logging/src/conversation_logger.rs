use chrono::{DateTime, Utc};
use serde::Serialize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use mcpchat_models::Message;

#[derive(Serialize)]
struct ToolCallInfo {
    id: String,
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct LogEntry {
    timestamp: String, // ISO‑8601 UTC
    session_id: String,
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCallInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Append-only JSONL record of every message of a session
pub struct ConversationLogger {
    file_path: PathBuf,
    session_id: Uuid,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger in `logs_dir`; the file name is based on the current UTC time.
    pub async fn new(logs_dir: &Path) -> Result<Self> {
        fs::create_dir_all(logs_dir).await?;

        let now: DateTime<Utc> = Utc::now();
        let filename = format!("mcpchat-{}.jsonl", now.format("%Y-%m-%d-%H%M%S"));
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;

        Ok(Self {
            file_path,
            session_id: Uuid::new_v4(),
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Append a single message.
    pub async fn log(&mut self, message: &Message, model: Option<&str>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            session_id: self.session_id.to_string(),
            role: message.role.clone(),
            content: message.content.clone(),
            model: model.map(|s| s.to_string()),
            tool_calls: message.tool_calls.as_ref().map(|calls| {
                calls.iter().map(|call| ToolCallInfo {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                }).collect()
            }),
            tool_call_id: message.tool_call_id.clone(),
            name: message.name.clone(),
        };

        if let Some(file) = &mut self.file {
            if let Ok(mut json) = serde_json::to_string(&entry) {
                json.push('\n');
                if let Err(e) = file.write_all(json.as_bytes()).await {
                    eprintln!("[Logging error] {}", e);
                }
            }
        }
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
