//! Persistence seam for performed sets.
//!
//! The remote store is a collaborator hidden behind the [`SessionStore`]
//! trait; the coordinator never sees a transport. Timeouts and retries are
//! the transport's problem, not enforced here.
//!
//! [`JsonlStore`] is the bundled concrete store: one JSON line per save
//! payload, appended under an exclusive lock so concurrent writers cannot
//! interleave.

use crate::error::Result;
use crate::types::WeightUnit;
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One performed set inside a save payload
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformedSet {
    pub set_number: u32,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub weight_unit: WeightUnit,
}

/// Outbound write for one exercise: every save-eligible set it contains
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub schedule_id: String,
    pub performed_sets: Vec<PerformedSet>,
}

/// Store seam the save coordinator writes through
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist one exercise's performed sets. One call per exercise per save.
    async fn save_performed_sets(&self, payload: &SavePayload) -> Result<()>;
}

/// JSON-Lines backed store with file locking
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Create a store appending to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn append(&self, payload: &SavePayload) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(payload)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            schedule_id = %payload.schedule_id,
            sets = payload.performed_sets.len(),
            "Appended save payload"
        );
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonlStore {
    async fn save_performed_sets(&self, payload: &SavePayload) -> Result<()> {
        self.append(payload)
    }
}

/// Read back every payload in a JSONL store file.
///
/// Malformed lines are skipped with a warning rather than failing the read.
pub fn read_payloads(path: &Path) -> Result<Vec<SavePayload>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut payloads = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SavePayload>(&line) {
            Ok(payload) => payloads.push(payload),
            Err(e) => {
                tracing::warn!("Failed to parse payload at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    Ok(payloads)
}
