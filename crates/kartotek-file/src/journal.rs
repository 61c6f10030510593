//! Append-only changelog for store mutations.
//!
//! Every create, update, and delete is journaled so an operator can audit
//! what changed in a local store. The journal is a JSON-lines file guarded
//! by a lock file, safe for concurrent writers on the same machine.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use kartotek_core::Result;
use kartotek_core::error::{Error, InvalidInputError, TransportError};

fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::Http {
        message: format!("IO error: {}", err),
    })
}

/// The kind of mutation a journal entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    /// A record was created.
    Create,
    /// A record's fields were merged.
    Update,
    /// A record was deleted.
    Delete,
}

/// One entry in the changelog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// The affected collection.
    pub collection: String,
    /// The affected record id.
    pub id: String,
    /// ISO 8601 timestamp of the mutation.
    pub time: String,
    /// The operation type.
    pub op: ChangeOp,
}

/// The changelog of a file store.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
    lock_path: PathBuf,
}

impl Journal {
    pub(crate) fn new(path: PathBuf, lock_path: PathBuf) -> Self {
        Self { path, lock_path }
    }

    /// Append an entry for a mutation.
    pub fn append(&self, collection: &str, id: &str, op: ChangeOp) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;

        let entry = ChangeEntry {
            collection: collection.to_string(),
            id: id.to_string(),
            time: Utc::now().to_rfc3339(),
            op,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(map_io)?;

        let line = serde_json::to_string(&entry).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        writeln!(file, "{}", line).map_err(map_io)?;
        file.sync_data().map_err(map_io)?;

        lock_file.unlock().map_err(map_io)?;

        Ok(())
    }

    /// Read all entries in append order.
    ///
    /// Lines that fail to parse are skipped.
    pub fn read(&self) -> Result<Vec<ChangeEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(map_io)?;
        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str::<ChangeEntry>(line).ok())
            .collect())
    }
}
