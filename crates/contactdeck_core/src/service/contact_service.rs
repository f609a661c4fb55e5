//! Contact session service.
//!
//! # Responsibility
//! - Own the aggregate, the favorite overlay and the filters for one session.
//! - Expose the collaborator surface: load/refresh/load-more, favorite toggle,
//!   filter updates, and the derived views (visible batch, filtered view,
//!   stats).
//! - Keep stats and the filtered view recomputed on every state change.
//!
//! # Invariants
//! - No operation returns an error to collaborators; load failures land in
//!   `error`, preference write failures are logged.
//! - A failed load clears the aggregate.
//! - Batches from a superseded load never reach the current aggregate.

use crate::config::LoaderConfig;
use crate::ingest::normalize::normalize_all;
use crate::loader::{BatchTicket, IncrementalLoader, LoadError, LoadKind, LoadPhase, LoadTicket};
use crate::model::contact::{Contact, ContactId, ContactStats};
use crate::model::filters::{FiltersPatch, SearchFilters};
use crate::model::raw::RawContact;
use crate::repo::preference_repo::PreferenceRepository;
use crate::search::query::{annotate, QueryEngine};
use crate::store::aggregate::AggregateStore;
use crate::store::merge::merge_contacts;
use crate::store::stats::compute_stats;
use crate::sync::provider::{ContactProvider, ProviderError, ProviderResult};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Result of a top-level load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Completed {
        total: usize,
        released: usize,
        buffered: usize,
    },
    Failed,
    /// Another load was already in flight.
    Rejected,
    /// The ticket was superseded or cancelled before completion.
    Stale,
}

/// Session-scoped contact service.
pub struct ContactService<P: ContactProvider, R: PreferenceRepository> {
    provider: P,
    prefs: R,
    loader: IncrementalLoader,
    store: AggregateStore,
    engine: QueryEngine,
    favorites: HashSet<ContactId>,
    filters: SearchFilters,
    filtered: Vec<Contact>,
    stats: ContactStats,
    error: Option<LoadError>,
    last_sync_time: Option<i64>,
    has_permissions: bool,
    load_started_at: Option<Instant>,
}

impl<P: ContactProvider, R: PreferenceRepository> ContactService<P, R> {
    /// Creates an empty session, restoring persisted favorites, filters and
    /// last sync time. Unreadable preferences fall back to defaults.
    pub fn new(provider: P, prefs: R, config: LoaderConfig) -> Self {
        let favorites = prefs.load_favorites().unwrap_or_else(|err| {
            warn!("event=prefs_read module=service status=error key=favorites error={err}");
            HashSet::new()
        });
        let filters = match prefs.load_filters() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(err) => {
                warn!("event=prefs_read module=service status=error key=filters error={err}");
                SearchFilters::default()
            }
        };
        let last_sync_time = prefs.load_last_sync().unwrap_or_else(|err| {
            warn!("event=prefs_read module=service status=error key=last_sync error={err}");
            None
        });

        let mut service = Self {
            provider,
            prefs,
            loader: IncrementalLoader::new(config),
            store: AggregateStore::new(),
            engine: QueryEngine::new(),
            favorites,
            filters,
            filtered: Vec::new(),
            stats: ContactStats::default(),
            error: None,
            last_sync_time,
            has_permissions: false,
            load_started_at: None,
        };
        service.recompute_derived();
        service
    }

    /// Pulls the full record set and releases the first batch.
    pub fn load_contacts(&mut self) -> LoadOutcome {
        self.run_load(LoadKind::Initial)
    }

    /// Pulls again and delta-merges into the current aggregate.
    pub fn refresh_contacts(&mut self) -> LoadOutcome {
        self.run_load(LoadKind::Refresh)
    }

    /// Starts a load whose facility call the host performs itself.
    ///
    /// Returns `None` when a load is already in flight. Clears `error`.
    pub fn begin_load(&mut self, kind: LoadKind) -> Option<LoadTicket> {
        let Some(ticket) = self.loader.begin(kind) else {
            debug!(
                "event=contacts_load module=service status=skipped kind={} reason=in_flight",
                kind.as_str()
            );
            return None;
        };
        self.error = None;
        self.load_started_at = Some(Instant::now());
        info!(
            "event=contacts_load module=service status=start kind={} provider={}",
            kind.as_str(),
            self.provider.provider_id()
        );
        Some(ticket)
    }

    /// Applies the facility result for `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ProviderResult<Vec<RawContact>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            debug!(
                "event=contacts_load module=service status=skipped kind={} reason=stale_ticket",
                ticket.kind().as_str()
            );
            return LoadOutcome::Stale;
        }
        let duration_ms = self
            .load_started_at
            .take()
            .map_or(0, |started| started.elapsed().as_millis());

        match result {
            Ok(raw) => self.apply_pull(ticket, raw, duration_ms),
            Err(err) => {
                self.apply_failure(ticket, err, duration_ms);
                LoadOutcome::Failed
            }
        }
    }

    /// Next scheduled background batch, if any.
    pub fn pending_batch(&self) -> Option<BatchTicket> {
        self.loader.pending_batch()
    }

    /// Timer callback: releases one batch if `ticket` is still current.
    pub fn run_background_batch(&mut self, ticket: BatchTicket) -> bool {
        if !self.loader.accepts_batch(ticket) {
            debug!("event=contacts_batch module=service status=skipped reason=stale_ticket");
            return false;
        }
        self.release_batch(true);
        true
    }

    /// Explicit pagination; returns how many records became visible.
    pub fn load_more_contacts(&mut self) -> usize {
        if !self.loader.can_load_more() {
            return 0;
        }
        self.release_batch(false)
    }

    /// Runs scheduled batches until the buffer is empty or the schedule is
    /// cancelled, calling `sleep` with each batch delay first.
    pub fn drain_background(&mut self, mut sleep: impl FnMut(Duration)) -> usize {
        let mut drained = 0;
        while let Some(ticket) = self.pending_batch() {
            sleep(ticket.delay());
            if !self.run_background_batch(ticket) {
                break;
            }
            drained += 1;
        }
        drained
    }

    /// Ends the session's loading activity; outstanding tickets become stale.
    pub fn shutdown(&mut self) {
        self.loader.cancel();
        self.load_started_at = None;
        info!("event=session_end module=service status=ok");
    }

    /// Flips the favorite flag for `id` and returns the new state.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        };
        if let Err(err) = self.prefs.save_favorites(&self.favorites) {
            warn!("event=prefs_write module=service status=error key=favorites error={err}");
        }
        self.recompute_derived();
        debug!(
            "event=favorite_toggle module=service status=ok favorite={now_favorite} favorites={}",
            self.stats.favorites
        );
        now_favorite
    }

    /// Merges `patch` into the filters and recomputes the view immediately.
    pub fn update_filters(&mut self, patch: FiltersPatch) {
        self.filters.apply(patch);
        if let Err(err) = self.prefs.save_filters(&self.filters) {
            warn!("event=prefs_write module=service status=error key=filters error={err}");
        }
        self.recompute_view();
        debug!(
            "event=filters_update module=service status=ok matches={}",
            self.filtered.len()
        );
    }

    /// Visible batch annotated with the favorite overlay, aggregate order.
    pub fn contacts(&self) -> Vec<Contact> {
        self.store
            .visible()
            .iter()
            .map(|contact| annotate(contact, &self.favorites))
            .collect()
    }

    /// Filtered and sorted view over the visible batch.
    pub fn filtered_contacts(&self) -> &[Contact] {
        &self.filtered
    }

    pub fn stats(&self) -> &ContactStats {
        &self.stats
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.loader.phase()
    }

    pub fn loading(&self) -> bool {
        self.loader.phase() == LoadPhase::LoadingInitial
    }

    pub fn loading_more(&self) -> bool {
        self.loader.phase() == LoadPhase::BackgroundLoading
    }

    pub fn refreshing(&self) -> bool {
        self.loader.is_refreshing()
    }

    /// Epoch ms of the last successful load or refresh.
    pub fn last_sync_time(&self) -> Option<i64> {
        self.last_sync_time
    }

    pub fn has_permissions(&self) -> bool {
        self.has_permissions
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Visible plus not-yet-released record count.
    pub fn total_known(&self) -> usize {
        self.store.total_known()
    }

    pub fn preferences(&self) -> &R {
        &self.prefs
    }

    fn run_load(&mut self, kind: LoadKind) -> LoadOutcome {
        let Some(ticket) = self.begin_load(kind) else {
            return LoadOutcome::Rejected;
        };
        let result = self.provider.fetch_all();
        self.finish_load(ticket, result)
    }

    fn apply_pull(
        &mut self,
        ticket: LoadTicket,
        raw: Vec<RawContact>,
        duration_ms: u128,
    ) -> LoadOutcome {
        self.has_permissions = true;
        let incoming = normalize_all(&raw);
        let existing = self.store.take_all();
        let merge = merge_contacts(existing, incoming);
        debug!(
            "event=contacts_merge module=service status=ok replaced={} added={} kept={}",
            merge.replaced, merge.added, merge.kept
        );

        let total = merge.contacts.len();
        let released = self
            .store
            .replace(merge.contacts, self.loader.config().initial_batch);
        let buffered = self.store.buffered_len();
        self.engine.reindex(self.store.visible());
        self.loader.complete(buffered);

        let now = now_epoch_ms();
        self.last_sync_time = Some(now);
        if let Err(err) = self.prefs.save_last_sync(now) {
            warn!("event=prefs_write module=service status=error key=last_sync error={err}");
        }
        self.recompute_derived();

        info!(
            "event=contacts_load module=service status=ok kind={} total={total} released={released} buffered={buffered} duration_ms={duration_ms}",
            ticket.kind().as_str()
        );
        LoadOutcome::Completed {
            total,
            released,
            buffered,
        }
    }

    fn apply_failure(&mut self, ticket: LoadTicket, err: ProviderError, duration_ms: u128) {
        self.has_permissions = !matches!(err, ProviderError::PermissionDenied);
        self.store.clear();
        self.engine.clear();
        self.loader.fail();
        self.recompute_derived();
        error!(
            "event=contacts_load module=service status=error kind={} duration_ms={duration_ms} error_code={} error={err}",
            ticket.kind().as_str(),
            err.code()
        );
        self.error = Some(LoadError::from(err));
    }

    fn release_batch(&mut self, from_timer: bool) -> usize {
        let range = self.store.release_next(self.loader.config().batch_size);
        let released = range.len();
        self.engine.index_appended(&self.store.visible()[range]);
        let remaining = self.store.buffered_len();
        self.loader.batch_drained(remaining, from_timer);
        self.recompute_derived();
        debug!(
            "event=contacts_batch module=service status=ok source={} released={released} remaining={remaining}",
            if from_timer { "timer" } else { "explicit" }
        );
        released
    }

    fn recompute_derived(&mut self) {
        self.stats = compute_stats(self.store.visible(), &self.favorites);
        self.recompute_view();
    }

    fn recompute_view(&mut self) {
        self.filtered = self
            .engine
            .run(self.store.visible(), &self.favorites, &self.filters);
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
