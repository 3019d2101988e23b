use crate::domain::constants::VALIDATION_EVENT_TYPE;
use crate::domain::models::ValidationEvent;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Append-only validation event log, one JSON object per line.
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn record(&self, event: &ValidationEvent) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = format!("{}\n", serde_json::to_string(event)?);
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        f.write_all(line.as_bytes())?;
        Ok(())
    }
}

pub fn validation_event(
    file_uuid: &str,
    detail: String,
    outcome: Option<String>,
    outcome_detail_note: Option<String>,
) -> ValidationEvent {
    ValidationEvent {
        event_id: Uuid::new_v4(),
        file_uuid: file_uuid.to_string(),
        event_type: VALIDATION_EVENT_TYPE.to_string(),
        detail,
        outcome,
        outcome_detail_note,
        recorded_at: unix_now(),
    }
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
