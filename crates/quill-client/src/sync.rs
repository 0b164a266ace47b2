//! Client sync controller.
//!
//! Owns the working set — the local mirror of the signed-in owner's notes —
//! and mediates every exchange with the server:
//!
//! - Title/content edits are applied locally at once and written back after
//!   a 1000ms quiet period; repeated edits replace the pending timer rather
//!   than stacking writes.
//! - Pin toggles and deletes are low-frequency, destructive actions: they
//!   go straight to the server and the working set changes only on
//!   confirmation.
//! - Responses are applied to the working set keyed by note id, never to
//!   "whatever is selected", and a per-note edit generation drops responses
//!   that a newer local edit has superseded.
//!
//! All state lives in this controller; there are no module-level globals.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use quill_core::{CreateNoteRequest, Error, Note, Result, UpdateNoteRequest};

use crate::api::NotesApi;
use crate::view::{self, NoteFilter, Projection};

/// Quiet period after the last edit before an autosave is issued.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Defaults for a freshly created note.
pub const DEFAULT_TITLE: &str = "Untitled Note";
pub const DEFAULT_CONTENT: &str = "<p>Start writing...</p>";

/// Per-note synchronization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Local entry matches the last server confirmation.
    Synced,
    /// A local edit is waiting for its debounce window.
    Unsynced,
    /// An autosave request is in flight.
    Syncing,
    /// The last autosave failed; the local text is kept.
    Failed,
}

/// A note in the working set together with its sync state.
#[derive(Debug, Clone)]
pub struct WorkingNote {
    pub note: Note,
    pub sync: SyncState,
    /// Bumped on every local edit; responses carrying a stale generation
    /// are not allowed to replace newer local text.
    generation: u64,
}

#[derive(Default)]
struct WorkingSet {
    notes: Vec<WorkingNote>,
    selected: Option<Uuid>,
    filter: NoteFilter,
    search_query: String,
    selected_tag: Option<String>,
    fetching: bool,
}

impl WorkingSet {
    fn entry_mut(&mut self, id: Uuid) -> Option<&mut WorkingNote> {
        self.notes.iter_mut().find(|w| w.note.id == id)
    }

    /// Note ids in display order (pinned first, then recency, then id).
    fn display_order(&self) -> Vec<Uuid> {
        let mut refs: Vec<&Note> = self.notes.iter().map(|w| &w.note).collect();
        refs.sort_by(|a, b| view::compare_display(a, b));
        refs.iter().map(|n| n.id).collect()
    }
}

/// Read-only snapshot of the working set for rendering.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub notes: Vec<WorkingNote>,
    pub selected: Option<Uuid>,
    pub is_syncing: bool,
}

/// The client sync controller. Cheap to clone; clones share state.
pub struct SyncController<A: NotesApi> {
    api: Arc<A>,
    state: Arc<Mutex<WorkingSet>>,
    timers: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
    debounce: Duration,
}

impl<A: NotesApi> Clone for SyncController<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            timers: Arc::clone(&self.timers),
            debounce: self.debounce,
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl<A: NotesApi> SyncController<A> {
    pub fn new(api: A) -> Self {
        Self::with_debounce(api, DEBOUNCE_WINDOW)
    }

    pub fn with_debounce(api: A, debounce: Duration) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(WorkingSet::default())),
            timers: Arc::new(Mutex::new(HashMap::new())),
            debounce,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WorkingSet> {
        self.state.lock().expect("working set lock poisoned")
    }

    fn cancel_timer(&self, id: Uuid) {
        if let Some(handle) = self.timers.lock().expect("timer lock poisoned").remove(&id) {
            handle.abort();
        }
    }

    fn cancel_all_timers(&self) {
        for (_, handle) in self.timers.lock().expect("timer lock poisoned").drain() {
            handle.abort();
        }
    }

    /// Discard and refetch the working set. Called on every identity
    /// change: login, logout→login, session restore.
    pub async fn refresh(&self) -> Result<()> {
        self.cancel_all_timers();
        {
            self.lock().fetching = true;
        }
        let result = self.api.list_notes().await;
        let mut state = self.lock();
        state.fetching = false;
        let notes = result?;

        debug!(
            subsystem = "client",
            component = "sync_controller",
            op = "refresh",
            result_count = notes.len(),
            "Working set refetched"
        );

        state.notes = notes
            .into_iter()
            .map(|note| WorkingNote {
                note,
                sync: SyncState::Synced,
                generation: 0,
            })
            .collect();

        // Keep the selection if the note survived the refetch, otherwise
        // fall back to the first note in display order.
        let order = state.display_order();
        state.selected = state
            .selected
            .filter(|id| order.contains(id))
            .or_else(|| order.first().copied());
        Ok(())
    }

    /// Drop the working set and all pending work. The caller clears the
    /// persisted credentials; a logged-out token stays valid until expiry.
    pub fn end_session(&self) {
        self.cancel_all_timers();
        let mut state = self.lock();
        *state = WorkingSet::default();
    }

    /// Create a note with defaults, confirmed by the server before it
    /// enters the working set, then select it.
    pub async fn create_note(&self) -> Result<Uuid> {
        let note = self
            .api
            .create_note(CreateNoteRequest {
                title: DEFAULT_TITLE.to_string(),
                content: DEFAULT_CONTENT.to_string(),
                tags: Vec::new(),
                pinned: false,
                last_modified: Some(now_millis()),
            })
            .await?;

        let id = note.id;
        let mut state = self.lock();
        state.notes.insert(
            0,
            WorkingNote {
                note,
                sync: SyncState::Synced,
                generation: 0,
            },
        );
        state.selected = Some(id);
        Ok(id)
    }

    /// Apply a title/content edit locally and (re)start the note's
    /// debounce timer. The previous timer for this note, if any, is
    /// aborted and replaced — never stacked.
    pub fn edit_note(&self, id: Uuid, title: &str, content: &str) -> Result<()> {
        let generation = {
            let mut state = self.lock();
            let entry = state.entry_mut(id).ok_or(Error::NoteNotFound(id))?;
            entry.note.title = title.to_string();
            entry.note.content = content.to_string();
            entry.sync = SyncState::Unsynced;
            entry.generation += 1;
            entry.generation
        };

        let controller = self.clone();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            controller.flush(id, generation).await;
        });
        if let Some(previous) = self
            .timers
            .lock()
            .expect("timer lock poisoned")
            .insert(id, handle)
        {
            previous.abort();
        }
        Ok(())
    }

    /// Issue the debounced autosave for `id`, if the edit that scheduled
    /// it is still the latest one.
    async fn flush(&self, id: Uuid, generation: u64) {
        let payload = {
            let mut state = self.lock();
            let entry = match state.entry_mut(id) {
                Some(entry) => entry,
                None => return, // deleted before the timer fired
            };
            if entry.generation != generation {
                return; // superseded; the newer edit owns the next flush
            }
            entry.sync = SyncState::Syncing;
            UpdateNoteRequest {
                title: Some(entry.note.title.clone()),
                content: Some(entry.note.content.clone()),
                last_modified: Some(now_millis()),
                ..Default::default()
            }
        };

        // The timer has fired and this task is now an in-flight request.
        // Its handle is still in `timers`; drop it so a later edit, select,
        // or delete cancels only pending timers, never a live request. The
        // generation check on the response handles staleness.
        self.timers.lock().expect("timer lock poisoned").remove(&id);

        match self.api.update_note(id, payload).await {
            Ok(server_note) => {
                let mut state = self.lock();
                if let Some(entry) = state.entry_mut(id) {
                    if entry.generation == generation {
                        // Server response is the source of truth for
                        // last_modified and any normalization.
                        entry.note = server_note;
                        entry.sync = SyncState::Synced;
                    }
                    // A newer local edit exists: keep it; its own flush is
                    // already scheduled.
                }
            }
            Err(e) => {
                warn!(
                    subsystem = "client",
                    component = "sync_controller",
                    op = "autosave",
                    note_id = %id,
                    error = %e,
                    "Autosave failed; keeping local edit"
                );
                let mut state = self.lock();
                if let Some(entry) = state.entry_mut(id) {
                    if entry.generation == generation {
                        entry.sync = SyncState::Failed;
                    }
                }
            }
        }
    }

    /// Toggle the pin flag. Not debounced and not optimistic: the working
    /// set reflects the change only after server confirmation.
    pub async fn toggle_pin(&self, id: Uuid) -> Result<bool> {
        let target = {
            let mut state = self.lock();
            let entry = state.entry_mut(id).ok_or(Error::NoteNotFound(id))?;
            !entry.note.pinned
        };

        let server_note = self
            .api
            .update_note(
                id,
                UpdateNoteRequest {
                    pinned: Some(target),
                    ..Default::default()
                },
            )
            .await?;

        let mut state = self.lock();
        if let Some(entry) = state.entry_mut(id) {
            if entry.sync == SyncState::Synced {
                entry.note = server_note.clone();
            } else {
                // A text edit is pending or failed: take only the fields
                // this operation touched, keep the local text.
                entry.note.pinned = server_note.pinned;
                entry.note.last_modified = server_note.last_modified;
            }
        }
        Ok(server_note.pinned)
    }

    /// Replace the tag set. Confirmed like pin toggles.
    pub async fn set_tags(&self, id: Uuid, tags: Vec<String>) -> Result<()> {
        {
            let mut state = self.lock();
            state.entry_mut(id).ok_or(Error::NoteNotFound(id))?;
        }
        let server_note = self
            .api
            .update_note(
                id,
                UpdateNoteRequest {
                    tags: Some(tags),
                    ..Default::default()
                },
            )
            .await?;

        let mut state = self.lock();
        if let Some(entry) = state.entry_mut(id) {
            if entry.sync == SyncState::Synced {
                entry.note = server_note;
            } else {
                entry.note.tags = server_note.tags;
                entry.note.last_modified = server_note.last_modified;
            }
        }
        Ok(())
    }

    /// Delete a note after server confirmation. Cancels its pending
    /// autosave, and if it was selected, advances the selection to the
    /// next note in display order (or clears it).
    pub async fn delete_note(&self, id: Uuid) -> Result<()> {
        self.cancel_timer(id);
        self.api.delete_note(id).await?;

        let mut state = self.lock();
        let order_before = state.display_order();
        let position = order_before.iter().position(|&n| n == id);
        state.notes.retain(|w| w.note.id != id);

        if state.selected == Some(id) {
            let order_after = state.display_order();
            state.selected = position
                .and_then(|pos| order_after.get(pos).copied())
                .or_else(|| order_after.last().copied());
        }
        Ok(())
    }

    /// Select a note. Navigating away cancels the previously selected
    /// note's pending autosave timer; its local edit stays in the working
    /// set, marked Unsynced.
    pub fn select_note(&self, id: Uuid) -> Result<()> {
        let previous = {
            let mut state = self.lock();
            state.entry_mut(id).ok_or(Error::NoteNotFound(id))?;
            state.selected.replace(id)
        };
        if let Some(previous) = previous {
            if previous != id {
                self.cancel_timer(previous);
            }
        }
        Ok(())
    }

    pub fn set_filter(&self, filter: NoteFilter) {
        self.lock().filter = filter;
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.lock().search_query = query.into();
    }

    pub fn set_selected_tag(&self, tag: Option<String>) {
        self.lock().selected_tag = tag;
    }

    /// Current working set, for rendering and assertions.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            notes: state.notes.clone(),
            selected: state.selected,
            is_syncing: state.fetching
                || state.notes.iter().any(|w| w.sync == SyncState::Syncing),
        }
    }

    /// Project the working set through the current search/filter/tag
    /// selection.
    pub fn project(&self, now_millis: i64) -> Projection {
        let state = self.lock();
        let notes: Vec<Note> = state.notes.iter().map(|w| w.note.clone()).collect();
        view::project(
            &notes,
            &state.search_query,
            state.filter,
            state.selected_tag.as_deref(),
            now_millis,
        )
    }
}
