//! Filesystem storage for records.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use kartotek_core::error::{Error, InvalidInputError, StoreError, TransportError};
use kartotek_core::{
    CollectionName, FilterState, Predicate, Record, RecordFields, RecordId, Result, SchemaRegistry,
};

use crate::journal::{ChangeEntry, ChangeOp, Journal};

fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::Http {
        message: format!("IO error: {}", err),
    })
}

/// Filesystem-backed record store.
///
/// Records are stored one JSON file per record under
/// `<root>/collections/<collection>/<id>.json`. Ids embed a microsecond
/// timestamp, so directory order is creation order. All mutations are
/// journaled to `<root>/changelog.jsonl`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    registry: SchemaRegistry,
}

impl FileStore {
    /// Create a file store at the given root directory.
    pub fn new(root: impl AsRef<Path>, registry: SchemaRegistry) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            registry,
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The schema registry this store validates against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The mutation changelog.
    pub fn journal(&self) -> Journal {
        Journal::new(
            self.root.join("changelog.jsonl"),
            self.root.join("changelog.lock"),
        )
    }

    /// Read the mutation changelog in append order.
    pub fn read_changelog(&self) -> Result<Vec<ChangeEntry>> {
        self.journal().read()
    }

    /// Get the collections directory.
    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    /// Get the directory for a specific collection.
    fn collection_dir(&self, collection: &CollectionName) -> PathBuf {
        self.collections_dir().join(collection.as_str())
    }

    /// Get the path for a specific record.
    fn record_path(&self, collection: &CollectionName, id: &RecordId) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.json", id.as_str()))
    }

    /// Generate a new record id: hex microsecond timestamp plus a short
    /// random suffix for uniqueness within the same tick.
    fn generate_id(&self) -> Result<RecordId> {
        let micros = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros();
        let suffix = Uuid::new_v4().simple().to_string();
        RecordId::new(format!("{:x}-{}", micros, &suffix[..6]))
    }

    /// Write a record to its path atomically.
    fn write_record(&self, collection: &CollectionName, record: &Record) -> Result<()> {
        let path = self.record_path(collection, &record.id);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(map_io)?;
        fs::rename(&temp_path, &path).map_err(map_io)?;

        Ok(())
    }

    /// Load a record from its path.
    fn read_record(&self, path: &Path) -> Result<Record> {
        let content = fs::read_to_string(path).map_err(map_io)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })
    }

    fn not_found(collection: &CollectionName, id: &RecordId) -> Error {
        Error::Store(StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    // ========================================================================
    // Record Operations
    // ========================================================================

    #[instrument(skip(self, fields))]
    pub fn create(&self, collection: &CollectionName, fields: RecordFields) -> Result<Record> {
        let schema = self.registry.get(collection)?;
        schema.validate_fields(&fields)?;

        let now = Utc::now();
        let record = Record {
            id: self.generate_id()?,
            created_at: now,
            updated_at: now,
            fields,
        };

        self.write_record(collection, &record)?;
        self.journal()
            .append(collection.as_str(), record.id.as_str(), ChangeOp::Create)?;

        debug!(collection = %collection, id = %record.id, "Created record");

        Ok(record)
    }

    #[instrument(skip(self))]
    pub fn get(&self, collection: &CollectionName, id: &RecordId) -> Result<Option<Record>> {
        self.registry.get(collection)?;
        let path = self.record_path(collection, id);

        if !path.exists() {
            return Ok(None);
        }

        self.read_record(&path).map(Some)
    }

    #[instrument(skip(self))]
    pub fn list(
        &self,
        collection: &CollectionName,
        filter: Option<&FilterState>,
    ) -> Result<Vec<Record>> {
        let schema = self.registry.get(collection)?;
        let predicate = filter
            .map(|f| Predicate::build(schema, f))
            .transpose()?;

        let dir = self.collection_dir(collection);
        let mut records = Vec::new();

        if dir.exists() {
            for entry in fs::read_dir(&dir).map_err(map_io)? {
                let entry = entry.map_err(map_io)?;
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                // Skip files that are not valid records; a half-written
                // temp file must not break the listing.
                if let Ok(record) = self.read_record(&path) {
                    records.push(record);
                }
            }
        }

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });

        if let Some(predicate) = predicate {
            records.retain(|r| predicate.matches(r));
        }

        debug!(collection = %collection, count = records.len(), "Listed records");

        Ok(records)
    }

    #[instrument(skip(self, partial))]
    pub fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: RecordFields,
    ) -> Result<Record> {
        self.registry.get(collection)?;
        let path = self.record_path(collection, id);

        if !path.exists() {
            return Err(Self::not_found(collection, id));
        }

        let mut record = self.read_record(&path)?;
        record.fields = record.fields.merged(&partial);
        record.updated_at = Utc::now();

        self.write_record(collection, &record)?;
        self.journal()
            .append(collection.as_str(), id.as_str(), ChangeOp::Update)?;

        debug!(collection = %collection, %id, "Updated record");

        Ok(record)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        self.registry.get(collection)?;
        let path = self.record_path(collection, id);

        if !path.exists() {
            return Err(Self::not_found(collection, id));
        }

        fs::remove_file(&path).map_err(map_io)?;
        self.journal()
            .append(collection.as_str(), id.as_str(), ChangeOp::Delete)?;

        debug!(collection = %collection, %id, "Deleted record");

        Ok(())
    }
}
