//! Edit session: which record the single form is editing, if any.
//!
//! The session stores the target's id, never its position or a snapshot of
//! its fields, and resolves it against the live collection on every read.

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::record::{AssignmentRecord, RecordFields};
use crate::store::RecordStore;
use crate::validation::validate;

/// What a save from the form will do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditIntent {
    /// Append a new record.
    #[default]
    Create,
    /// Overwrite the record with this id.
    Update(u64),
}

impl EditIntent {
    /// Target id, for an update.
    #[must_use]
    pub fn target(self) -> Option<u64> {
        match self {
            Self::Create => None,
            Self::Update(id) => Some(id),
        }
    }
}

/// Mediates between the form and the store.
///
/// `begin` moves to either state; `commit` and `cancel` always return to
/// [`EditIntent::Create`].
#[derive(Debug, Default)]
pub struct EditSession {
    intent: EditIntent,
}

impl EditSession {
    /// Create a session in the `Create` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form, for a new record or for editing `target`.
    pub fn begin(&mut self, target: Option<u64>) {
        self.intent = target.map_or(EditIntent::Create, EditIntent::Update);
        debug!(intent = ?self.intent, "Edit session started");
    }

    /// Current intent.
    #[must_use]
    pub fn intent(&self) -> EditIntent {
        self.intent
    }

    /// Whether the form is editing an existing record.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        matches!(self.intent, EditIntent::Update(_))
    }

    /// Resolve the target against the live collection.
    #[must_use]
    pub fn current_target<'a>(
        &self,
        records: &'a [AssignmentRecord],
    ) -> Option<&'a AssignmentRecord> {
        let id = self.intent.target()?;
        records.iter().find(|r| r.id == id)
    }

    /// Values the form is prefilled with: the target's current fields, or
    /// nothing for a new record.
    #[must_use]
    pub fn draft(&self, records: &[AssignmentRecord]) -> RecordFields {
        self.current_target(records)
            .map(AssignmentRecord::to_form)
            .unwrap_or_default()
    }

    /// Validate and save `fields`, then return to `Create`.
    ///
    /// On a validation failure nothing is written and the session keeps its
    /// state so the operator can correct the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for rejected input, or [`Error::NotFound`]
    /// if the target disappeared since `begin`; the latter also resets the
    /// session.
    pub fn commit(
        &mut self,
        store: &mut RecordStore,
        fields: &RecordFields,
    ) -> Result<AssignmentRecord> {
        validate(fields)?;

        let saved = match self.intent {
            EditIntent::Create => store.create(fields).cloned(),
            EditIntent::Update(id) => store.update(id, fields).cloned(),
        };
        self.intent = EditIntent::Create;

        if let Err(Error::NotFound { id }) = &saved {
            error!(id, "Edit target vanished before save");
        }
        saved
    }

    /// Close the form without touching the store.
    pub fn cancel(&mut self) {
        self.intent = EditIntent::Create;
        debug!("Edit session cancelled");
    }
}
