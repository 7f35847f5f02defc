//! JSON-lines transcript of every stage exchange with the model

use super::stage::Stage;
use crate::report::RecordId;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Serialize)]
struct TranscriptEntry<'a> {
    stage: Stage,
    record_id: RecordId,
    attempt: u32,
    system_prompt: &'a str,
    user_message: &'a str,
    raw_response: &'a str,
    sanitized: &'a str,
    latency_ms: u64,
    timestamp: String,
}

/// One completed model call, as handed to [`TranscriptLogger::log_exchange`]
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub stage: Stage,
    pub record_id: RecordId,
    pub attempt: u32,
    pub system_prompt: &'a str,
    pub user_message: &'a str,
    pub raw_response: &'a str,
    pub sanitized: &'a str,
    pub latency_ms: u64,
}

pub struct TranscriptLogger {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl TranscriptLogger {
    /// Appends to `log_file`; a file that cannot be opened disables the logger
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let writer = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Mutex::new(BufWriter::new(file))),
                Err(e) => {
                    warn!("Failed to open transcript file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn log_exchange(&self, exchange: &Exchange<'_>) {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = TranscriptEntry {
            stage: exchange.stage,
            record_id: exchange.record_id,
            attempt: exchange.attempt,
            system_prompt: exchange.system_prompt,
            user_message: exchange.user_message,
            raw_response: exchange.raw_response,
            sanitized: exchange.sanitized,
            latency_ms: exchange.latency_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize transcript entry for {}: {}", exchange.stage, e);
                return;
            }
        };

        if let Ok(mut writer) = writer.lock() {
            if let Err(e) = writeln!(writer, "{}", json) {
                warn!("Failed to write transcript entry: {}", e);
            }
            if let Err(e) = writer.flush() {
                warn!("Failed to flush transcript: {}", e);
            }
        }

        debug!(
            stage = %exchange.stage,
            record_id = %exchange.record_id,
            latency_ms = exchange.latency_ms,
            "Transcript entry written"
        );
    }
}

impl Default for TranscriptLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for TranscriptLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptLogger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
