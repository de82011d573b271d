//! Edit-form binding: decides whether a submitted record creates a new
//! entry or replaces the one being edited.
//!
//! ```text
//! Idle --begin_edit(i)--> Editing{i}
//! Editing --begin_edit(j)--> Editing{j}
//! Editing --submit / cancel--> Idle
//! Idle --submit--> Idle            (creates)
//! ```
//!
//! The edited record is tracked by id as well as position, so deletes made
//! while editing do not redirect the update to a different record.

use serde::Serialize;
use sketchform_core::error::CoreError;
use sketchform_core::record::Record;
use sketchform_core::types::RecordId;

use crate::error::RecordStoreError;
use crate::records::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FormState {
    #[default]
    Idle,
    Editing { index: usize, id: RecordId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SubmitOutcome {
    Created { index: usize },
    Updated { index: usize },
}

#[derive(Debug, Default)]
pub struct FormBinding {
    state: FormState,
}

impl FormBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, FormState::Editing { .. })
    }

    /// Start editing the record at `index`, replacing any edit in progress.
    pub fn begin_edit<'a>(
        &mut self,
        store: &'a RecordStore,
        index: usize,
    ) -> Result<&'a Record, CoreError> {
        let record = store.get(index)?;
        self.state = FormState::Editing {
            index,
            id: record.id,
        };
        tracing::debug!(index, id = %record.id, "Edit started");
        Ok(record)
    }

    /// Leave edit mode. Returns whether an edit was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_editing = self.is_editing();
        self.state = FormState::Idle;
        was_editing
    }

    /// Create `record`, or update the record under edit. Always ends Idle.
    pub async fn submit(
        &mut self,
        store: &mut RecordStore,
        record: Record,
    ) -> Result<SubmitOutcome, RecordStoreError> {
        match std::mem::take(&mut self.state) {
            FormState::Idle => {
                let len = store.create(record).await?;
                Ok(SubmitOutcome::Created { index: len - 1 })
            }
            FormState::Editing { index, id } => {
                let position = store.position_of(id).ok_or(CoreError::OutOfBounds {
                    index,
                    len: store.len(),
                })?;
                store.update_at(position, record).await?;
                Ok(SubmitOutcome::Updated { index: position })
            }
        }
    }
}
