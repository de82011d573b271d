//! Ordered record list, written through to a [`BlobStore`] on every change.
//!
//! Positions are the public handle. Every mutation serialises the whole list
//! as one JSON array under a single key. When that write fails the in-memory
//! change stays and [`RecordStoreError::Persist`] is returned.

use std::sync::Arc;

use sketchform_core::error::CoreError;
use sketchform_core::record::Record;
use sketchform_core::types::RecordId;

use crate::blob::BlobStore;
use crate::error::{RecordStoreError, StoreError};

/// Default key the record list is stored under.
pub const DEFAULT_RECORDS_KEY: &str = "records";

pub struct RecordStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
            records: Vec::new(),
        }
    }

    /// Replace the in-memory list with the stored one.
    ///
    /// A missing key, unreadable storage or undecodable data all yield an
    /// empty list. Returns the number of records loaded.
    pub async fn load(&mut self) -> usize {
        self.records = match self.blobs.get(&self.key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Record>>(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "Stored records are corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read stored records, starting empty");
                Vec::new()
            }
        };
        tracing::info!(count = self.records.len(), "Records loaded");
        self.records.len()
    }

    /// Write the whole list to storage.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&self.records)?;
        self.blobs.put(&self.key, &bytes).await
    }

    /// Append a record. Returns the new length.
    pub async fn create(&mut self, record: Record) -> Result<usize, RecordStoreError> {
        tracing::debug!(id = %record.id, "Record created");
        self.records.push(record);
        self.write_through().await?;
        Ok(self.records.len())
    }

    /// Replace the record at `index`. The slot keeps its id and creation
    /// time. Returns the stored record.
    pub async fn update_at(
        &mut self,
        index: usize,
        mut record: Record,
    ) -> Result<Record, RecordStoreError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(CoreError::OutOfBounds { index, len })?;

        record.id = slot.id;
        record.created_at = slot.created_at;
        *slot = record.clone();
        tracing::debug!(index, id = %record.id, "Record updated");

        self.write_through().await?;
        Ok(record)
    }

    /// Remove and return the record at `index`.
    pub async fn delete_at(&mut self, index: usize) -> Result<Record, RecordStoreError> {
        let len = self.records.len();
        if index >= len {
            return Err(CoreError::OutOfBounds { index, len }.into());
        }
        let removed = self.records.remove(index);
        tracing::debug!(index, id = %removed.id, "Record deleted");

        self.write_through().await?;
        Ok(removed)
    }

    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Result<&Record, CoreError> {
        self.records.get(index).ok_or(CoreError::OutOfBounds {
            index,
            len: self.records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current position of the record with `id`.
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    async fn write_through(&self) -> Result<(), RecordStoreError> {
        self.persist().await.map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to persist records");
            RecordStoreError::Persist(e)
        })
    }
}
