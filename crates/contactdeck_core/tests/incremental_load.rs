mod common;

use common::{loader_config, no_sleep, raw_batch, service, ScriptedProvider};
use contactdeck_core::db::open_db_in_memory;
use contactdeck_core::{LoadError, LoadKind, LoadOutcome, LoadPhase, ProviderError};
use std::time::Duration;

#[test]
fn initial_batch_is_visible_then_background_drains_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(120));
    let mut svc = service(&provider, &conn, loader_config(50, 50));
    svc.toggle_favorite("c010");
    svc.toggle_favorite("c100");

    let outcome = svc.load_contacts();

    assert_eq!(
        outcome,
        LoadOutcome::Completed {
            total: 120,
            released: 50,
            buffered: 70
        }
    );
    assert_eq!(svc.contacts().len(), 50);
    assert_eq!(svc.stats().total, 50);
    assert_eq!(svc.stats().favorites, 1);
    assert_eq!(svc.phase(), LoadPhase::BackgroundLoading);
    assert!(svc.loading_more());
    assert!(!svc.loading());

    let mut delays = Vec::new();
    let batches = svc.drain_background(|delay| delays.push(delay));

    assert_eq!(batches, 2);
    assert_eq!(delays, [Duration::from_millis(100); 2]);
    assert_eq!(svc.contacts().len(), 120);
    assert_eq!(svc.filtered_contacts().len(), 120);
    assert_eq!(svc.stats().total, 120);
    assert_eq!(svc.stats().favorites, 2);
    assert_eq!(svc.phase(), LoadPhase::FullyLoaded);
    assert!(svc.pending_batch().is_none());
    assert_eq!(provider.calls(), 1);
}

#[test]
fn visible_batch_grows_by_appending() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(25));
    let mut svc = service(&provider, &conn, loader_config(10, 10));
    svc.load_contacts();
    let before: Vec<_> = svc.contacts().into_iter().map(|c| c.id).collect();

    let ticket = svc.pending_batch().unwrap();
    assert!(svc.run_background_batch(ticket));
    let after: Vec<_> = svc.contacts().into_iter().map(|c| c.id).collect();

    assert_eq!(after.len(), 20);
    assert_eq!(&after[..10], before.as_slice());
    assert_eq!(after[10], "c010");
}

#[test]
fn small_pull_is_fully_loaded_immediately() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(3));
    let mut svc = service(&provider, &conn, loader_config(50, 50));

    svc.load_contacts();

    assert_eq!(svc.phase(), LoadPhase::FullyLoaded);
    assert!(svc.pending_batch().is_none());
    assert_eq!(svc.load_more_contacts(), 0);
    assert!(svc.last_sync_time().is_some());
    assert!(svc.has_permissions());
}

#[test]
fn load_more_releases_synchronously_and_keeps_timer_valid() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(35));
    let mut svc = service(&provider, &conn, loader_config(10, 10));
    svc.load_contacts();
    let timer = svc.pending_batch().unwrap();

    assert_eq!(svc.load_more_contacts(), 10);
    assert_eq!(svc.contacts().len(), 20);

    assert!(svc.run_background_batch(timer));
    assert_eq!(svc.contacts().len(), 30);

    assert_eq!(svc.load_more_contacts(), 5);
    assert_eq!(svc.phase(), LoadPhase::FullyLoaded);
    assert_eq!(svc.load_more_contacts(), 0);
}

#[test]
fn concurrent_load_is_rejected_not_queued() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(5));
    let mut svc = service(&provider, &conn, loader_config(50, 50));

    let ticket = svc.begin_load(LoadKind::Initial).unwrap();
    assert!(svc.loading());
    assert!(svc.begin_load(LoadKind::Refresh).is_none());
    assert_eq!(svc.refresh_contacts(), LoadOutcome::Rejected);
    assert_eq!(provider.calls(), 0);
    assert_eq!(svc.load_more_contacts(), 0);

    let outcome = svc.finish_load(ticket, Ok(raw_batch(5)));
    assert!(matches!(outcome, LoadOutcome::Completed { total: 5, .. }));
    assert!(!svc.loading());
}

#[test]
fn superseded_batches_never_reach_the_new_aggregate() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(40));
    let mut svc = service(&provider, &conn, loader_config(10, 10));
    svc.load_contacts();
    let stale = svc.pending_batch().unwrap();

    let refresh = svc.begin_load(LoadKind::Refresh).unwrap();
    assert!(svc.refreshing());
    assert!(!svc.run_background_batch(stale));
    assert_eq!(svc.contacts().len(), 10);

    svc.finish_load(refresh, Ok(raw_batch(40)));
    assert!(!svc.run_background_batch(stale));
    assert_eq!(svc.contacts().len(), 10);
    assert!(svc.pending_batch().is_some());
}

#[test]
fn shutdown_cancels_pending_batches_and_in_flight_load() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(40));
    let mut svc = service(&provider, &conn, loader_config(10, 10));
    svc.load_contacts();
    let pending = svc.pending_batch().unwrap();

    svc.shutdown();

    assert!(svc.pending_batch().is_none());
    assert!(!svc.run_background_batch(pending));
    assert_eq!(svc.drain_background(no_sleep), 0);
    assert_eq!(svc.contacts().len(), 10);
    assert_eq!(svc.phase(), LoadPhase::Idle);
    assert!(!svc.loading_more());

    assert_eq!(svc.load_more_contacts(), 0);
    assert!(svc.pending_batch().is_none());
    assert_eq!(svc.contacts().len(), 10);

    let ticket = svc.begin_load(LoadKind::Refresh).unwrap();
    svc.shutdown();
    assert_eq!(svc.finish_load(ticket, Ok(raw_batch(40))), LoadOutcome::Stale);
}

#[test]
fn permission_denied_clears_aggregate_and_sets_error() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::with_records(raw_batch(5));
    let mut svc = service(&provider, &conn, loader_config(50, 50));
    svc.load_contacts();
    assert_eq!(svc.contacts().len(), 5);

    provider.set_error(ProviderError::PermissionDenied);
    assert_eq!(svc.refresh_contacts(), LoadOutcome::Failed);

    assert!(svc.contacts().is_empty());
    assert!(svc.filtered_contacts().is_empty());
    assert_eq!(svc.stats().total, 0);
    assert_eq!(svc.error(), Some(&LoadError::PermissionDenied));
    assert_eq!(
        svc.error().unwrap().message(),
        "Contact permissions are required."
    );
    assert_eq!(svc.phase(), LoadPhase::Failed);
    assert!(!svc.has_permissions());
    assert!(!svc.refreshing());
}

#[test]
fn retry_after_retrieval_failure_clears_error() {
    let conn = open_db_in_memory().unwrap();
    let provider = ScriptedProvider::failing(ProviderError::retrieval("device busy"));
    let mut svc = service(&provider, &conn, loader_config(50, 50));

    assert_eq!(svc.load_contacts(), LoadOutcome::Failed);
    assert!(matches!(
        svc.error(),
        Some(LoadError::RetrievalFailure { detail }) if detail == "device busy"
    ));
    assert!(svc.last_sync_time().is_none());

    provider.set_records(raw_batch(2));
    svc.load_contacts();
    assert!(svc.error().is_none());
    assert_eq!(svc.contacts().len(), 2);
}
