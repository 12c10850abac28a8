use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use hospital_models::{FormDraft, RecordId, Resource};
use serde_json::Value;

use super::{lock, Banner, BusyFlag, Confirmation, EditMode, LoadStatus};
use crate::api::ApiClient;
use crate::error::DashboardError;

/// Everything a list/create/edit/delete screen shows
#[derive(Debug, Clone)]
pub struct ScreenState<R: Resource> {
    pub status: LoadStatus,
    pub records: Vec<R>,
    pub draft: R::Form,
    pub mode: EditMode,
    pub banner: Option<Banner>,
    pub busy: bool,
}

impl<R: Resource> Default for ScreenState<R> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            records: Vec::new(),
            draft: R::Form::default(),
            mode: EditMode::None,
            banner: None,
            busy: false,
        }
    }
}

impl<R: Resource> ScreenState<R> {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|banner| banner.is_error())
            .map(Banner::message)
    }
}

/// Result of a submit. The backend only promises to echo the new id on
/// create, so the record itself is read back through the reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Created; carries the echoed id when the response had one
    Created(Option<RecordId>),
    Updated(RecordId),
    /// Another request was in flight; nothing was sent
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(RecordId),
    /// The user declined the confirmation
    Cancelled,
    /// Another request was in flight; nothing was sent
    Ignored,
}

/// View-model for one record type's management screen.
///
/// Cloning yields another handle to the same screen. The backend is the
/// source of truth: every successful mutation re-fetches the collection.
#[derive(Debug, Clone)]
pub struct EntityViewModel<R: Resource> {
    api: ApiClient,
    state: Arc<Mutex<ScreenState<R>>>,
    busy: BusyFlag,
    /// Bumped by every load; only the latest load may write the records
    generation: Arc<AtomicU64>,
}

impl<R: Resource> EntityViewModel<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ScreenState::default())),
            busy: BusyFlag::default(),
            generation: Arc::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ScreenState<R>> {
        lock(&self.state)
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> ScreenState<R> {
        let mut snapshot = self.state().clone();
        snapshot.busy = self.busy.is_set();
        snapshot
    }

    pub fn records(&self) -> Vec<R> {
        self.state().records.clone()
    }

    pub fn draft(&self) -> R::Form {
        self.state().draft.clone()
    }

    pub fn mode(&self) -> EditMode {
        self.state().mode
    }

    pub fn banner(&self) -> Option<Banner> {
        self.state().banner.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Loaded record with the given id
    pub fn find(&self, id: RecordId) -> Option<R> {
        self.state().records.iter().find(|record| record.id() == id).cloned()
    }

    /// Fetch the collection. On failure the previous records are kept.
    ///
    /// When loads overlap, a response that arrives after a newer load has
    /// started is dropped without touching the state.
    pub async fn load(&self) -> Result<usize, DashboardError> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        {
            let mut state = self.state();
            state.status = LoadStatus::Loading;
            if state.banner.as_ref().is_some_and(Banner::is_error) {
                state.banner = None;
            }
        }

        let result = self.api.get::<Vec<R>>(R::COLLECTION).await;
        let mut state = self.state();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(collection = R::COLLECTION, "discarding superseded load");
            return result.map(|records| records.len()).map_err(Into::into);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                tracing::debug!(collection = R::COLLECTION, count, "collection loaded");
                state.records = records;
                state.status = LoadStatus::Ready;
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(collection = R::COLLECTION, error = %err, "failed to load collection");
                state.status = LoadStatus::Failed(err.to_string());
                state.banner = Some(Banner::Error(format!(
                    "Failed to fetch {}: {err}",
                    R::COLLECTION
                )));
                Err(err.into())
            }
        }
    }

    pub fn begin_create(&self) {
        let mut state = self.state();
        state.draft = R::Form::default();
        state.mode = EditMode::Creating;
        state.banner = None;
    }

    pub fn begin_edit(&self, record: &R) {
        let mut state = self.state();
        state.draft = R::Form::from_record(record);
        state.mode = EditMode::Editing(record.id());
        state.banner = None;
    }

    pub fn cancel_edit(&self) {
        let mut state = self.state();
        state.draft = R::Form::default();
        state.mode = EditMode::None;
        state.banner = None;
    }

    /// Show an error banner, keeping one that is already up
    pub fn show_error(&self, message: impl Into<String>) {
        let mut state = self.state();
        if state.error().is_none() {
            state.banner = Some(Banner::Error(message.into()));
        }
    }

    /// Replace the draft as the user types
    pub fn set_draft(&self, draft: R::Form) {
        self.state().draft = draft;
    }

    /// Create or update from `draft` depending on the edit mode.
    ///
    /// Failures keep the draft and the mode so the user can retry.
    pub async fn submit(&self, draft: R::Form) -> Result<SubmitOutcome, DashboardError> {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!(collection = R::COLLECTION, "submit ignored, request in flight");
            return Ok(SubmitOutcome::Ignored);
        };

        let mode = {
            let mut state = self.state();
            state.draft = draft.clone();
            state.banner = None;
            state.mode
        };

        let payload = match draft.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.state().banner = Some(Banner::Error(err.to_string()));
                return Err(err.into());
            }
        };

        // Success is the 2xx status; the body is only mined for the new id
        let result = match mode {
            EditMode::Editing(id) => {
                let path = format!("{}/{id}", R::COLLECTION);
                self.api.put::<_, Value>(&path, &payload).await
            }
            EditMode::Creating | EditMode::None => {
                self.api.post::<_, Value>(R::COLLECTION, &payload).await
            }
        };

        let echo = match result {
            Ok(echo) => echo,
            Err(err) => {
                tracing::warn!(collection = R::COLLECTION, error = %err, "submit failed");
                self.state().banner = Some(Banner::Error(format!("Operation failed: {err}")));
                return Err(err.into());
            }
        };

        let (outcome, action) = match mode {
            EditMode::Editing(id) => (SubmitOutcome::Updated(id), "updated"),
            EditMode::Creating | EditMode::None => (
                SubmitOutcome::Created(echo.get("id").and_then(Value::as_i64)),
                "added",
            ),
        };
        let name = draft.display_name().to_string();

        {
            let mut state = self.state();
            state.draft = R::Form::default();
            state.mode = EditMode::None;
        }

        // A failed reload leaves its own error banner in place
        if self.load().await.is_ok() {
            self.state().banner = Some(Banner::Success(format!(
                "{} '{name}' {action} successfully!",
                R::LABEL
            )));
        }
        Ok(outcome)
    }

    /// Delete a record after the user confirms
    pub async fn remove(
        &self,
        id: RecordId,
        confirmation: &dyn Confirmation,
    ) -> Result<RemoveOutcome, DashboardError> {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!(collection = R::COLLECTION, id, "delete ignored, request in flight");
            return Ok(RemoveOutcome::Ignored);
        };

        let label = R::LABEL.to_lowercase();
        if !confirmation.confirm(&format!("Are you sure you want to delete this {label}?")) {
            return Ok(RemoveOutcome::Cancelled);
        }
        self.state().banner = None;

        let path = format!("{}/{id}", R::COLLECTION);
        if let Err(err) = self.api.del::<Value>(&path).await {
            tracing::warn!(collection = R::COLLECTION, id, error = %err, "delete failed");
            self.state().banner = Some(Banner::Error(format!("Failed to delete {label}: {err}")));
            return Err(err.into());
        }

        if self.load().await.is_ok() {
            self.state().banner = Some(Banner::Success(format!("{} deleted successfully!", R::LABEL)));
        }
        Ok(RemoveOutcome::Removed(id))
    }
}
