//! Work-queue contract tests: upsert idempotence, lease exclusivity and
//! ordering, recovery sweep, hydration ordering.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use scholar_core::{PaperMetadata, PaperVersion};
use scholar_storage::MetadataStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_store() -> MetadataStore {
    MetadataStore::open_in_memory().expect("in-memory store")
}

fn paper(id: &str, abstract_text: &str) -> PaperMetadata {
    PaperMetadata {
        source: "arxiv".to_string(),
        id: id.to_string(),
        authors: "A. Author, B. Author".to_string(),
        title: format!("Paper {id}"),
        doi: None,
        license: Some("cc0".to_string()),
        abstract_text: abstract_text.to_string(),
        categories: BTreeSet::from(["cs.IR".to_string()]),
        journal_ref: None,
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        versions: vec![PaperVersion {
            version: "v1".to_string(),
            created: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }],
    }
}

// ---------------------------------------------------------------------------
// Upsert
// ---------------------------------------------------------------------------

#[test]
fn upsert_twice_keeps_one_row_with_second_payload() {
    let store = test_store();

    store.upsert_batch(&[paper("1", "first abstract")]).unwrap();
    store.upsert_batch(&[paper("1", "second abstract")]).unwrap();

    let rows = store.get_by_ids(&["arxiv/1".to_string()]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].abstract_text, "second abstract");
    assert_eq!(store.estimate_backlog().unwrap(), 1);
}

#[test]
fn upsert_requeues_an_already_indexed_record() {
    let store = test_store();
    store.upsert_batch(&[paper("1", "abs")]).unwrap();

    let leased = store.lease_batch(10).unwrap();
    store.mark_indexed(&leased).unwrap();
    assert_eq!(store.estimate_backlog().unwrap(), 0);

    // Re-upserting nulls indexed_at again: the record is back in the queue.
    store.upsert_batch(&[paper("1", "abs v2")]).unwrap();
    assert_eq!(store.estimate_backlog().unwrap(), 1);
    assert_eq!(store.lease_batch(10).unwrap().len(), 1);
}

#[test]
fn upsert_empty_input_is_a_noop() {
    let store = test_store();
    assert_eq!(store.upsert_batch(&[]).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

#[test]
fn lease_returns_shortest_abstract_first() {
    let store = test_store();
    store
        .upsert_batch(&[paper("long", "abcdefghijklmnopqrst"), paper("short", "abcdefghij")])
        .unwrap();

    let first = store.lease_batch(1).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "short");

    let second = store.lease_batch(1).unwrap();
    assert_eq!(second[0].id, "long");
}

#[test]
fn lease_on_empty_backlog_returns_empty_not_error() {
    let store = test_store();
    assert!(store.lease_batch(16).unwrap().is_empty());
}

#[test]
fn leased_rows_are_invisible_to_later_leases() {
    let store = test_store();
    store
        .upsert_batch(&[paper("1", "aa"), paper("2", "bb"), paper("3", "cc")])
        .unwrap();

    let first = store.lease_batch(2).unwrap();
    let second = store.lease_batch(2).unwrap();

    let first_ids: HashSet<String> = first.iter().map(PaperMetadata::fqn).collect();
    let second_ids: HashSet<String> = second.iter().map(PaperMetadata::fqn).collect();
    assert_eq!(first_ids.len(), 2);
    assert_eq!(second_ids.len(), 1);
    assert!(first_ids.is_disjoint(&second_ids));
}

#[test]
fn concurrent_leases_never_overlap() {
    const PAPERS: usize = 60;
    const WORKERS: usize = 4;
    const BATCH: usize = 7;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MetadataStore::open(&dir.path().join("queue.db")).unwrap());

    let seed: Vec<PaperMetadata> = (0..PAPERS)
        .map(|i| paper(&format!("p{i}"), &"x".repeat(10 + i)))
        .collect();
    store.upsert_batch(&seed).unwrap();

    let claimed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let store = Arc::clone(&store);
        let claimed = Arc::clone(&claimed);
        handles.push(std::thread::spawn(move || loop {
            let batch = store.lease_batch(BATCH).unwrap();
            if batch.is_empty() {
                break;
            }
            let mut all = claimed.lock().unwrap();
            all.extend(batch.iter().map(PaperMetadata::fqn));
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let all = claimed.lock().unwrap();
    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(all.len(), PAPERS, "every row leased exactly once");
    assert_eq!(unique.len(), PAPERS, "no row leased twice");
}

// ---------------------------------------------------------------------------
// Commit & recovery
// ---------------------------------------------------------------------------

#[test]
fn mark_indexed_reports_affected_rows_and_empties_queue() {
    let store = test_store();
    store.upsert_batch(&[paper("1", "aa"), paper("2", "bb")]).unwrap();

    let leased = store.lease_batch(10).unwrap();
    assert_eq!(store.mark_indexed(&leased).unwrap(), 2);
    assert_eq!(store.estimate_backlog().unwrap(), 0);
    assert!(store.lease_batch(10).unwrap().is_empty());
}

#[test]
fn recovery_sweep_requeues_reserved_rows_but_not_indexed_ones() {
    let store = test_store();
    store
        .upsert_batch(&[paper("done", "aa"), paper("stuck", "bbbb")])
        .unwrap();

    // "done" is leased and committed; "stuck" is leased and abandoned.
    let first = store.lease_batch(1).unwrap();
    assert_eq!(first[0].id, "done");
    store.mark_indexed(&first).unwrap();
    let abandoned = store.lease_batch(1).unwrap();
    assert_eq!(abandoned[0].id, "stuck");

    assert_eq!(store.estimate_backlog().unwrap(), 0);
    let cleared = store.clear_all_reservations().unwrap();
    assert_eq!(cleared, 1);

    // Only the abandoned row became eligible again.
    assert_eq!(store.estimate_backlog().unwrap(), 1);
    let requeued = store.lease_batch(10).unwrap();
    assert_eq!(requeued.len(), 1);
    assert_eq!(requeued[0].id, "stuck");
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

#[test]
fn get_by_ids_preserves_order_and_drops_missing() {
    let store = test_store();
    store.upsert_batch(&[paper("a", "aa"), paper("b", "bb")]).unwrap();

    let rows = store
        .get_by_ids(&[
            "arxiv/a".to_string(),
            "arxiv/missing".to_string(),
            "arxiv/b".to_string(),
        ])
        .unwrap();

    let ids: Vec<&str> = rows.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn get_by_ids_empty_input_returns_empty() {
    let store = test_store();
    assert!(store.get_by_ids(&[]).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Sync cursors
// ---------------------------------------------------------------------------

#[test]
fn cursor_round_trips_and_overwrites() {
    let store = test_store();
    assert_eq!(store.last_synced_for("arxiv").unwrap(), None);

    let first = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    store.set_last_synced("arxiv", Some(first)).unwrap();
    assert_eq!(store.last_synced_for("arxiv").unwrap(), Some(first));

    let later = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    store.set_last_synced("arxiv", Some(later)).unwrap();
    assert_eq!(store.last_synced_for("arxiv").unwrap(), Some(later));
}
