//! Incremental loader state machine.
//!
//! # Responsibility
//! - Track the load lifecycle:
//!   `Idle -> LoadingInitial -> BackgroundLoading -> FullyLoaded`, plus
//!   `Failed` and the orthogonal `refreshing` flag.
//! - Issue tickets for top-level loads and background batches so results from
//!   a superseded load are rejected.
//!
//! # Invariants
//! - At most one top-level load is in flight; extra requests are rejected.
//! - Starting a load, failing, or cancelling invalidates every outstanding
//!   batch ticket.
//! - A batch ticket is accepted at most once.
//!
//! The loader holds no contact data; the service pairs it with the store.

use crate::config::LoaderConfig;
use crate::sync::provider::ProviderError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Public load lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    /// Waiting on the retrieval facility.
    LoadingInitial,
    /// First batch is visible; the rest drains in the background.
    BackgroundLoading,
    FullyLoaded,
    /// The last attempt failed; see the service's `error`.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Refresh,
}

impl LoadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Refresh => "refresh",
        }
    }
}

/// Handle for one in-flight top-level load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    kind: LoadKind,
}

impl LoadTicket {
    pub fn kind(&self) -> LoadKind {
        self.kind
    }
}

/// Handle for one scheduled background batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    generation: u64,
    sequence: u64,
    delay: Duration,
}

impl BatchTicket {
    /// How long the host should wait before running this batch.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Error surfaced to collaborators through the service `error` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    PermissionDenied,
    RetrievalFailure { detail: String },
}

impl LoadError {
    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Contact permissions are required.",
            Self::RetrievalFailure { .. } => "Failed to load contacts.",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => f.write_str(self.message()),
            Self::RetrievalFailure { detail } => write!(f, "{} ({detail})", self.message()),
        }
    }
}

impl Error for LoadError {}

impl From<ProviderError> for LoadError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::PermissionDenied => Self::PermissionDenied,
            ProviderError::RetrievalFailure { message } => {
                Self::RetrievalFailure { detail: message }
            }
        }
    }
}

/// Lifecycle bookkeeping for incremental loading.
#[derive(Debug)]
pub struct IncrementalLoader {
    config: LoaderConfig,
    phase: LoadPhase,
    refreshing: bool,
    generation: u64,
    next_sequence: u64,
    in_flight: Option<LoadTicket>,
    pending_batch: Option<BatchTicket>,
}

impl IncrementalLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            phase: LoadPhase::Idle,
            refreshing: false,
            generation: 0,
            next_sequence: 0,
            in_flight: None,
            pending_batch: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_batch(&self) -> Option<BatchTicket> {
        self.pending_batch
    }

    /// Starts a top-level load; `None` when one is already in flight.
    pub fn begin(&mut self, kind: LoadKind) -> Option<LoadTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        self.generation += 1;
        self.pending_batch = None;
        self.phase = LoadPhase::LoadingInitial;
        self.refreshing = kind == LoadKind::Refresh;
        let ticket = LoadTicket {
            generation: self.generation,
            kind,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Whether `ticket` is the load currently in flight.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Finishes the in-flight load with `buffered` records still hidden.
    pub fn complete(&mut self, buffered: usize) {
        self.in_flight = None;
        self.refreshing = false;
        if buffered > 0 {
            self.phase = LoadPhase::BackgroundLoading;
            self.schedule_next();
        } else {
            self.phase = LoadPhase::FullyLoaded;
            self.pending_batch = None;
        }
    }

    pub fn fail(&mut self) {
        self.in_flight = None;
        self.refreshing = false;
        self.pending_batch = None;
        self.phase = LoadPhase::Failed;
    }

    /// Whether a timer callback carrying `ticket` may drain a batch.
    pub fn accepts_batch(&self, ticket: BatchTicket) -> bool {
        self.in_flight.is_none() && self.pending_batch == Some(ticket)
    }

    /// Whether an explicit `load_more` may drain a batch now.
    pub fn can_load_more(&self) -> bool {
        self.in_flight.is_none() && self.phase == LoadPhase::BackgroundLoading
    }

    /// Records a drained batch.
    ///
    /// Timer-driven batches re-arm with a fresh ticket; explicit batches keep
    /// the already scheduled ticket so the host timer stays valid, and never
    /// arm one themselves.
    pub fn batch_drained(&mut self, buffered: usize, from_timer: bool) {
        if buffered == 0 {
            self.phase = LoadPhase::FullyLoaded;
            self.pending_batch = None;
        } else if from_timer {
            self.schedule_next();
        }
    }

    /// Invalidates the in-flight load and any scheduled batch.
    ///
    /// An interrupted load or background drain falls back to `Idle`; only a
    /// new `begin` resumes loading.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.refreshing = false;
        self.pending_batch = None;
        if matches!(
            self.phase,
            LoadPhase::LoadingInitial | LoadPhase::BackgroundLoading
        ) {
            self.phase = LoadPhase::Idle;
        }
    }

    fn schedule_next(&mut self) {
        self.next_sequence += 1;
        self.pending_batch = Some(BatchTicket {
            generation: self.generation,
            sequence: self.next_sequence,
            delay: self.config.background_delay,
        });
    }
}
