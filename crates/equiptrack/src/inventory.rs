//! The inventory controller: the one place the collection is owned.
//!
//! A presentation layer drives an [`Inventory`] through the `on_*` calls and
//! renders what the accessors expose. It never touches the store directly.

use tracing::{error, info, warn};

use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::filter::{apply, FilterCriteria, ViewStats};
use crate::loader::{load_seed, LoadState, SeedSource};
use crate::record::{AssignmentRecord, RecordFields};
use crate::session::{EditIntent, EditSession};
use crate::store::RecordStore;
use crate::validation::ValidationErrors;

/// Record store, edit session and filter state for one operator.
#[derive(Debug, Default)]
pub struct Inventory {
    store: RecordStore,
    session: EditSession,
    criteria: FilterCriteria,
    load_state: LoadState,
    field_errors: Option<ValidationErrors>,
}

impl Inventory {
    /// Create an inventory waiting for its seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the seed from `source` and load it.
    ///
    /// On failure the collection stays empty and the message is kept for
    /// [`Inventory::load_error`]. There is no retry.
    pub async fn load_from(&mut self, source: &dyn SeedSource) -> &LoadState {
        self.load_state = LoadState::Pending;
        let outcome = match load_seed(source).await {
            Ok(seed) => self.store.load(seed),
            Err(err) => Err(err),
        };
        self.finish_load(&source.describe(), outcome)
    }

    /// Load an already fetched seed document.
    pub fn seed(&mut self, seed: serde_json::Value) -> &LoadState {
        self.load_state = LoadState::Pending;
        let outcome = self.store.load(seed);
        self.finish_load("inline", outcome)
    }

    fn finish_load(&mut self, source: &str, outcome: Result<usize>) -> &LoadState {
        self.load_state = match outcome {
            Ok(count) => {
                info!(source, count, "Inventory ready");
                LoadState::Ready
            }
            Err(err) => {
                error!(source, error = %err, "Failed to load inventory");
                self.store.clear();
                LoadState::Failed(err.to_string())
            }
        };
        &self.load_state
    }

    // === Presentation → core ===

    /// Open the form for a new record.
    pub fn on_new(&mut self) {
        self.field_errors = None;
        self.session.begin(None);
    }

    /// Open the form on an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`; the session is left
    /// as it was.
    pub fn on_edit_request(&mut self, id: u64) -> Result<&AssignmentRecord> {
        let Some(record) = self.store.get(id) else {
            warn!(id, "Edit requested for unknown assignment");
            return Err(Error::not_found(id));
        };
        self.field_errors = None;
        self.session.begin(Some(id));
        Ok(record)
    }

    /// Close the form without saving.
    pub fn on_cancel(&mut self) {
        self.field_errors = None;
        self.session.cancel();
    }

    /// Save the form.
    ///
    /// `target` is what the form was opened on; if it disagrees with the
    /// session, the form wins and the session is re-targeted first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when input is rejected (the messages
    /// stay available from [`Inventory::field_errors`] and the form stays
    /// open), or [`Error::NotFound`] when the target no longer exists.
    pub fn on_save(
        &mut self,
        fields: &RecordFields,
        target: Option<u64>,
    ) -> Result<AssignmentRecord> {
        if self.session.intent().target() != target {
            warn!(
                session = ?self.session.intent(),
                form = ?target,
                "Form and edit session disagree on target"
            );
            self.session.begin(target);
        }

        match self.session.commit(&mut self.store, fields) {
            Ok(saved) => {
                self.field_errors = None;
                info!(id = saved.id, "Saved assignment");
                Ok(saved)
            }
            Err(Error::Validation(errors)) => {
                self.field_errors = Some(errors.clone());
                Err(Error::Validation(errors))
            }
            Err(err) => {
                self.field_errors = None;
                Err(err)
            }
        }
    }

    /// Delete a record once `confirm` approves.
    ///
    /// Returns `false` if the operator declined. Deleting the record the
    /// form is editing closes the form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`.
    pub fn on_delete(&mut self, id: u64, confirm: &mut impl Confirm) -> Result<bool> {
        if self.store.get(id).is_none() {
            error!(id, "Delete requested for unknown assignment");
            return Err(Error::not_found(id));
        }
        if !confirm.confirm(&format!("¿Eliminar la asignación {id}?")) {
            return Ok(false);
        }

        self.store.delete(id)?;
        if self.session.intent() == EditIntent::Update(id) {
            self.on_cancel();
        }
        info!(id, "Deleted assignment");
        Ok(true)
    }

    /// Replace the filter criteria.
    pub fn on_filter_change(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    // === Core → presentation ===

    /// The full collection.
    #[must_use]
    pub fn records(&self) -> &[AssignmentRecord] {
        self.store.list()
    }

    /// The collection under the current criteria.
    #[must_use]
    pub fn filtered_records(&self) -> Vec<&AssignmentRecord> {
        apply(self.store.list(), &self.criteria)
    }

    /// Whether the seed load is still running.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.load_state.is_pending()
    }

    /// Message of a failed seed load.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_state.error()
    }

    /// Outcome of the seed load.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// The record the form is editing, resolved against the live collection.
    #[must_use]
    pub fn edit_target(&self) -> Option<&AssignmentRecord> {
        self.session.current_target(self.store.list())
    }

    /// Values to prefill the form with.
    #[must_use]
    pub fn edit_draft(&self) -> RecordFields {
        self.session.draft(self.store.list())
    }

    /// Current edit intent.
    #[must_use]
    pub fn edit_intent(&self) -> EditIntent {
        self.session.intent()
    }

    /// Current filter criteria.
    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Total and filtered counts.
    #[must_use]
    pub fn stats(&self) -> ViewStats {
        ViewStats::compute(self.store.list(), &self.criteria)
    }

    /// Per-field messages from the last rejected save.
    #[must_use]
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }
}
