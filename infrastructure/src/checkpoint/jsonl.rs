//! JSONL file checkpoint store
//!
//! One append-only `<room>.checkpoints.jsonl` file per room: each commit
//! writes one JSON line and flushes, restore reads the last line, prune
//! rewrites the file keeping the newest tail. A line that fails to parse
//! on restore surfaces as [`CheckpointError::Corrupt`] and is never
//! discarded automatically.

use async_trait::async_trait;
use boardroom_application::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use boardroom_domain::{Checkpoint, DeliberationState, RoomId};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// File-backed checkpoint store
pub struct JsonlCheckpointStore {
    dir: PathBuf,
    /// Last known sequence per room, lazily recovered from disk
    sequences: Mutex<HashMap<RoomId, u64>>,
}

impl JsonlCheckpointStore {
    /// Create a store rooted at the given directory
    ///
    /// Creates the directory (and parents) if missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        Ok(Self {
            dir,
            sequences: Mutex::new(HashMap::new()),
        })
    }

    /// Path of a room's checkpoint file
    pub fn room_path(&self, room: &RoomId) -> PathBuf {
        // Keep filenames safe regardless of what ids the host hands us
        let safe: String = room
            .as_str()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.checkpoints.jsonl"))
    }

    fn read_lines(&self, room: &RoomId) -> Result<Vec<String>, CheckpointError> {
        let path = self.room_path(room);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file =
            File::open(&path).map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    fn sequence_cache(&self) -> Result<MutexGuard<'_, HashMap<RoomId, u64>>, CheckpointError> {
        self.sequences.lock().map_err(poison_err)
    }

    fn last_sequence(&self, room: &RoomId) -> Result<u64, CheckpointError> {
        if let Some(sequence) = self.sequence_cache()?.get(room) {
            return Ok(*sequence);
        }
        let sequence = match self.read_lines(room)?.last() {
            Some(line) => parse_line(room, line)?.sequence(),
            None => 0,
        };
        self.sequence_cache()?.insert(room.clone(), sequence);
        Ok(sequence)
    }
}

/// Converts a lock poison error to a store error.
fn poison_err<T>(_: PoisonError<T>) -> CheckpointError {
    CheckpointError::Unavailable("sequence cache lock poisoned".to_string())
}

fn parse_line(room: &RoomId, line: &str) -> Result<Checkpoint, CheckpointError> {
    serde_json::from_str(line).map_err(|e| CheckpointError::Corrupt {
        room: room.as_str().to_string(),
        detail: e.to_string(),
    })
}

#[async_trait]
impl CheckpointStore for JsonlCheckpointStore {
    async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError> {
        let room = state.room_id().clone();
        let sequence = self.last_sequence(&room)? + 1;
        let checkpoint = Checkpoint::new(state.clone(), sequence);
        let line = serde_json::to_string(&checkpoint)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.room_path(&room))
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        // Flush for crash safety before the caller acks anything
        file.sync_data()
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

        self.sequence_cache()?.insert(room.clone(), sequence);
        debug!(room = %room, sequence, "checkpoint appended");
        Ok(sequence)
    }

    async fn restore(&self, room: &RoomId) -> Result<Option<Checkpoint>, CheckpointError> {
        match self.read_lines(room)?.last() {
            Some(line) => Ok(Some(parse_line(room, line)?)),
            None => Ok(None),
        }
    }

    async fn prune(&self, room: &RoomId, keep_last: usize) -> Result<usize, CheckpointError> {
        let lines = self.read_lines(room)?;
        // Never remove the most recent checkpoint
        let keep = keep_last.max(1);
        if lines.len() <= keep {
            return Ok(0);
        }
        let removed = lines.len() - keep;
        let tail = &lines[removed..];

        // Rewrite atomically: temp file then rename
        let path = self.room_path(room);
        let tmp = path.with_extension("jsonl.tmp");
        let mut file =
            File::create(&tmp).map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        for line in tail {
            writeln!(file, "{line}")
                .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        }
        file.sync_data()
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
        Ok(removed)
    }
}
