//! Append-only audit trail of manager dispatch decisions.
//!
//! Events are written as JSON lines so they can be tailed and grepped.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors from the audit logger.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("audit sink lock poisoned")]
    LockError,
}

/// An audit log event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    /// Kind of event (e.g. "manager_call").
    pub event_type: String,
    /// Structured details about the event.
    pub details: serde_json::Value,
    /// Outcome (e.g. "forwarded", "denied", "reverted").
    pub outcome: String,
}

impl AuditEvent {
    /// Create a new audit event stamped with the current time.
    pub fn new(
        event_type: impl Into<String>,
        details: serde_json::Value,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            details,
            outcome: outcome.into(),
        }
    }
}

/// Destination for audit events.
pub trait AuditSink: Send {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError>;
}

/// JSONL file sink.
pub struct AuditLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLogger {
    /// Create or open an audit log file for appending.
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for AuditLogger {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&event)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps events in memory. Clones share the same buffer, so a handle kept
/// by the caller sees events recorded through the one given away.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .map_err(|_| AuditError::LockError)?
            .push(event);
        Ok(())
    }
}
