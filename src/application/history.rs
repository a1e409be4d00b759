//! History service: per-identity assessment history with soft delete.
//!
//! Each record moves through `ACTIVE -> PENDING_DELETE -> REMOVED`, with
//! undo as the only back-transition. The pending state lives purely in
//! memory: a restart or identity switch abandons in-flight countdowns, and
//! the affected records come back as active on the next load.
//!
//! Persistence is best-effort throughout. A failing store degrades the view
//! to "no history" and is logged, never surfaced as an error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::application::AssessmentOutcome;
use crate::domain::{new_record_id, RiskLevel, StoredAssessment, UserId};
use crate::ports::{KeyValueStore, Scheduler, TaskHandle};

/// Records shown per page.
pub const PAGE_SIZE: usize = 8;

/// Grace window between delete confirmation and permanent removal.
pub const UNDO_WINDOW: Duration = Duration::from_secs(64);

const COLLECTION_PREFIX: &str = "assessments_";

fn storage_key(user: &UserId) -> String {
    format!("{COLLECTION_PREFIX}{}", user.sanitized())
}

/// Conjunctive filter over the history view.
///
/// Every populated criterion must match; categories are ANDed, never ORed.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Free-text term matched against the formatted timestamp, both risk
    /// bands and the serialized biometric input
    pub search: String,

    /// Band that either the heart or the neuro score must be in
    pub risk: Option<RiskLevel>,

    /// Earliest date (inclusive)
    pub date_start: Option<NaiveDate>,

    /// Latest date (inclusive through end of day)
    pub date_end: Option<NaiveDate>,
}

impl HistoryFilter {
    /// Whether a record passes every populated criterion.
    #[must_use]
    pub fn matches(&self, record: &StoredAssessment) -> bool {
        if let Some(band) = self.risk {
            let heart = record.assessment.heart_disease.risk;
            let neuro = record.assessment.neurological.risk;
            if heart != band && neuro != band {
                return false;
            }
        }

        let date = record.timestamp.date_naive();
        if let Some(start) = self.date_start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.date_end {
            if date > end {
                return false;
            }
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {} {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.assessment.heart_disease.risk,
            record.assessment.neurological.risk,
            serde_json::to_string(&record.data).unwrap_or_default()
        )
        .to_lowercase();
        haystack.contains(&term)
    }
}

/// One record in the history view, with its pending-delete state.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub record: StoredAssessment,

    /// When the countdown expires, if a soft delete is in flight
    pub expires_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Seconds left in the undo window, rounded up; `None` when no delete
    /// is pending. Used for the countdown display.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|expires| {
            let millis = (expires - now).num_milliseconds();
            (millis.max(0) + 999) / 1000
        })
    }
}

/// One page of the filtered history.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,

    /// Current page, 1-based, clamped into `[1, total_pages]`
    pub page: usize,

    pub total_pages: usize,

    /// Matching records across all pages
    pub total_matches: usize,
}

struct PendingDeletion<H> {
    handle: H,
    expires_at: DateTime<Utc>,
}

struct HistoryState<H> {
    user: Option<UserId>,
    records: Vec<StoredAssessment>,
    pending: HashMap<String, PendingDeletion<H>>,
}

impl<H> HistoryState<H> {
    fn empty() -> Self {
        Self {
            user: None,
            records: Vec::new(),
            pending: HashMap::new(),
        }
    }
}

/// Per-session assessment history.
///
/// All mutations happen through explicit calls or a fired countdown; the
/// `Mutex` guards the working set against the timer callback, which is the
/// only other writer.
pub struct HistoryService<S, C>
where
    S: KeyValueStore + 'static,
    C: Scheduler + 'static,
{
    store: Arc<S>,
    scheduler: Arc<C>,
    state: Arc<Mutex<HistoryState<C::Handle>>>,
}

impl<S, C> HistoryService<S, C>
where
    S: KeyValueStore + 'static,
    C: Scheduler + 'static,
{
    /// Create a history service with no active identity.
    pub fn new(store: Arc<S>, scheduler: Arc<C>) -> Self {
        Self {
            store,
            scheduler,
            state: Arc::new(Mutex::new(HistoryState::empty())),
        }
    }

    /// Switch the active identity (login, logout, account change).
    ///
    /// The previous identity's working set is discarded and its in-flight
    /// countdowns are cancelled without executing; those records resume as
    /// active on the next load. The new identity's collection is read from
    /// the store, newest first.
    pub fn set_identity(&self, user: Option<UserId>) {
        let mut state = self.lock_state();
        for (_, pending) in state.pending.drain() {
            pending.handle.cancel();
        }
        state.records.clear();
        state.user = user;

        if let Some(user) = state.user.clone() {
            state.records = load_records(self.store.as_ref(), &user);
            tracing::debug!(
                user = user.as_str(),
                count = state.records.len(),
                "Loaded assessment history"
            );
        }
    }

    /// Persist one assessment outcome as a new record, newest first.
    ///
    /// # Returns
    /// The stored record, or `None` when no identity is active or the
    /// record could not be built. Storage write failures are logged; the
    /// record remains visible for the rest of the session.
    pub fn save(&self, outcome: &AssessmentOutcome) -> Option<StoredAssessment> {
        let mut state = self.lock_state();
        let user = state.user.clone()?;

        let now = Utc::now();
        let mut id = new_record_id(now);
        while state.records.iter().any(|r| r.id == id) {
            id = new_record_id(now);
        }

        let record = StoredAssessment {
            id,
            timestamp: now,
            data: outcome.input,
            assessment: outcome.assessment,
            factors: outcome.factors.clone(),
            shap_values: outcome.shap_values,
        };

        state.records.insert(0, record.clone());
        persist_records(self.store.as_ref(), &user, &state.records);
        Some(record)
    }

    /// Start the soft-delete countdown for a record.
    ///
    /// Call after the user has confirmed; confirmation UI is the caller's
    /// concern. The record stays visible (marked pending) for the 64-second
    /// undo window, then is removed permanently. Idempotent while pending;
    /// a no-op for unknown ids or without an identity.
    pub fn request_delete(&self, id: &str) {
        let mut state = self.lock_state();
        let Some(user) = state.user.clone() else {
            return;
        };
        if state.pending.contains_key(id) {
            return;
        }
        if !state.records.iter().any(|r| r.id == id) {
            return;
        }

        let expires_at = Utc::now()
            + chrono::Duration::from_std(UNDO_WINDOW).unwrap_or_else(|_| chrono::Duration::zero());

        let task = {
            let store = Arc::clone(&self.store);
            let shared = Arc::clone(&self.state);
            let user = user.clone();
            let id = id.to_string();
            Box::new(move || {
                finish_removal(&shared, store.as_ref(), &user, &id);
            })
        };
        let handle = self.scheduler.schedule(UNDO_WINDOW, task);

        state
            .pending
            .insert(id.to_string(), PendingDeletion { handle, expires_at });
        tracing::info!(record = id, "Soft delete scheduled");
    }

    /// Cancel a pending soft delete, returning the record to active.
    ///
    /// A no-op when the record is not pending (already removed, never
    /// scheduled, or unknown).
    pub fn undo(&self, id: &str) {
        let mut state = self.lock_state();
        if let Some(pending) = state.pending.remove(id) {
            pending.handle.cancel();
            tracing::info!(record = id, "Soft delete undone");
        }
    }

    /// Remove every record for the active identity, immediately.
    ///
    /// Call after the user has confirmed. No grace window: pending
    /// countdowns are cancelled and the whole collection is removed from
    /// the store in one step. A no-op without an identity.
    pub fn clear_all(&self) {
        let mut state = self.lock_state();
        let Some(user) = state.user.clone() else {
            return;
        };

        for (_, pending) in state.pending.drain() {
            pending.handle.cancel();
        }
        state.records.clear();

        if let Err(e) = self.store.remove(&storage_key(&user)) {
            tracing::warn!("Failed to clear assessment history: {e}");
        }
        tracing::info!(user = user.as_str(), "Assessment history cleared");
    }

    /// Filter and paginate the working set.
    ///
    /// Pure recomputation over the current records; the requested page is
    /// clamped into `[1, total_pages]`. Records pending deletion stay in
    /// the view, carrying their countdown expiry.
    #[must_use]
    pub fn page(&self, filter: &HistoryFilter, page: usize) -> HistoryPage {
        let state = self.lock_state();
        let matching: Vec<&StoredAssessment> = state
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .collect();

        let total_matches = matching.len();
        let total_pages = std::cmp::max(1, total_matches.div_ceil(PAGE_SIZE));
        let page = page.clamp(1, total_pages);

        let entries = matching
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|record| HistoryEntry {
                expires_at: state.pending.get(&record.id).map(|p| p.expires_at),
                record: record.clone(),
            })
            .collect();

        HistoryPage {
            entries,
            page,
            total_pages,
            total_matches,
        }
    }

    /// Number of records in the working set, ignoring filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Countdown expiry for a record, if a soft delete is in flight.
    #[must_use]
    pub fn pending_expiry(&self, id: &str) -> Option<DateTime<Utc>> {
        self.lock_state().pending.get(id).map(|p| p.expires_at)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HistoryState<C::Handle>> {
        self.state.lock().expect("history state mutex poisoned")
    }
}

impl<S, C> Drop for HistoryService<S, C>
where
    S: KeyValueStore + 'static,
    C: Scheduler + 'static,
{
    /// Session teardown abandons in-flight countdowns rather than honoring
    /// them; the pending records resume as active on the next load.
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            for (_, pending) in state.pending.drain() {
                pending.handle.cancel();
            }
        }
    }
}

/// Countdown expiry: permanently remove the record. Not cancellable once
/// it runs.
fn finish_removal<S: KeyValueStore, H>(
    shared: &Mutex<HistoryState<H>>,
    store: &S,
    user: &UserId,
    id: &str,
) {
    let Ok(mut state) = shared.lock() else {
        return;
    };
    // A cancelled timer normally never gets here; the identity check guards
    // against a stale callback racing an identity switch.
    if state.user.as_ref() != Some(user) {
        return;
    }
    if state.pending.remove(id).is_none() {
        return;
    }
    state.records.retain(|r| r.id != id);
    persist_records(store, user, &state.records);
    tracing::info!(record = id, "Assessment permanently deleted");
}

fn load_records<S: KeyValueStore>(store: &S, user: &UserId) -> Vec<StoredAssessment> {
    match store.get(&storage_key(user)) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Stored assessment history is unreadable: {e}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to load assessment history: {e}");
            Vec::new()
        }
    }
}

fn persist_records<S: KeyValueStore>(store: &S, user: &UserId, records: &[StoredAssessment]) {
    match serde_json::to_value(records) {
        Ok(value) => {
            if let Err(e) = store.set(&storage_key(user), &value) {
                tracing::warn!("Failed to persist assessment history: {e}");
            }
        }
        Err(e) => tracing::warn!("Failed to serialize assessment history: {e}"),
    }
}
