//! Integration test: uniqueness holds when registrations race.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use stackwell_core::{DocumentId, DocumentRecord, Identity};
use stackwell_integration_tests::{identity, registry, registry_on, submission, ADMIN};
use stackwell_registry::{IssuerAuthorization, MemoryStore, RecordStore, RegistryError};

/// Store whose write of document #1 pauses after meeting the test thread at
/// a barrier, so later registrations can finish first.
struct SlowFirstWrite {
    inner: MemoryStore,
    barrier: Arc<Barrier>,
    delay: Duration,
}

impl SlowFirstWrite {
    fn new(barrier: Arc<Barrier>) -> Self {
        Self {
            inner: MemoryStore::new(),
            barrier,
            delay: Duration::from_millis(300),
        }
    }
}

impl RecordStore for SlowFirstWrite {
    fn append_record(&self, record: &DocumentRecord) -> Result<(), RegistryError> {
        if record.id == DocumentId(1) {
            self.barrier.wait();
            thread::sleep(self.delay);
        }
        self.inner.append_record(record)
    }

    fn load_records(&self) -> Result<Vec<DocumentRecord>, RegistryError> {
        self.inner.load_records()
    }

    fn put_issuer(
        &self,
        identity: &Identity,
        authorization: &IssuerAuthorization,
    ) -> Result<(), RegistryError> {
        self.inner.put_issuer(identity, authorization)
    }

    fn load_issuers(&self) -> Result<Vec<(Identity, IssuerAuthorization)>, RegistryError> {
        self.inner.load_issuers()
    }
}

// =========================================================================
// Same content, many callers
// =========================================================================

#[test]
fn test_two_simultaneous_registrations_one_wins() {
    let registry = registry();
    let barrier = Arc::new(Barrier::new(2));
    let bytes = b"contested document".to_vec();

    let handles: Vec<_> = ["0xalice", "0xbob"]
        .into_iter()
        .map(|owner| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            let bytes = bytes.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.self_register(&identity(owner), submission(&bytes, "Deed", "Porto"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(RegistryError::DuplicateDocument { .. })))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(registry.len(), 1);
    let record = registry
        .find_by_hash(&stackwell_crypto::digest(&bytes))
        .expect("the winner's record must exist");
    assert_eq!(registry.documents_of(&record.owner).len(), 1);
}

#[test]
fn test_many_threads_mixed_registration_kinds() {
    const THREADS: usize = 16;

    let registry = registry();
    let admin = identity(ADMIN);
    let acme = identity("0xacme");
    registry
        .directory()
        .authorize(&admin, &acme, "Acme Registrar")
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            let acme = acme.clone();
            thread::spawn(move || {
                let owner = identity(&format!("0xowner{i}"));
                let sub = submission(b"one file to rule them all", "Diploma", "Lisbon");
                barrier.wait();
                if i % 2 == 0 {
                    registry.self_register(&owner, sub)
                } else {
                    registry.issue_official(&acme, &owner, sub, "")
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<DocumentId> = results.iter().filter_map(|r| r.clone().ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in &results {
        if let Err(err) = result {
            match err {
                RegistryError::DuplicateDocument { existing, .. } => {
                    assert_eq!(*existing, winners[0]);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }
    assert_eq!(registry.len(), 1);
}

// =========================================================================
// Distinct content, many callers
// =========================================================================

#[test]
fn test_distinct_documents_get_distinct_ids() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let registry = registry();
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let owner = identity(&format!("0xowner{t}"));
                barrier.wait();
                (0..PER_THREAD)
                    .map(|n| {
                        let bytes = format!("thread {t} document {n}");
                        registry
                            .self_register(&owner, submission(bytes.as_bytes(), "Receipt", "Lisbon"))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|id| id.value())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(registry.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        let owned = registry.documents_of(&identity(&format!("0xowner{t}")));
        assert_eq!(owned.len(), PER_THREAD);
        assert!(owned.windows(2).all(|w| w[0].id < w[1].id));
    }
}

// =========================================================================
// Slow store writes
// =========================================================================

#[test]
fn test_owner_order_matches_ids_when_writes_finish_out_of_order() {
    let barrier = Arc::new(Barrier::new(2));
    let store: Arc<dyn RecordStore> = Arc::new(SlowFirstWrite::new(barrier.clone()));
    let registry = registry_on(store.clone());
    let owner = identity("0xowner");

    let first = {
        let registry = registry.clone();
        let owner = owner.clone();
        thread::spawn(move || {
            registry.self_register(&owner, submission(b"alpha", "Diploma", "Lisbon"))
        })
    };

    // Document #1 is allocated and its write is stalled.
    barrier.wait();
    let second = registry
        .self_register(&owner, submission(b"beta", "Diploma", "Lisbon"))
        .unwrap();
    let first = first.join().unwrap().unwrap();
    assert_eq!(first, DocumentId(1));
    assert_eq!(second, DocumentId(2));

    let before: Vec<DocumentId> = registry.documents_of(&owner).iter().map(|r| r.id).collect();
    let reopened = registry_on(store);
    let after: Vec<DocumentId> = reopened.documents_of(&owner).iter().map(|r| r.id).collect();

    assert_eq!(before, vec![first, second]);
    assert_eq!(before, after);
}

#[test]
fn test_lookup_during_slow_write_sees_nothing_or_the_whole_record() {
    let barrier = Arc::new(Barrier::new(2));
    let registry = registry_on(Arc::new(SlowFirstWrite::new(barrier.clone())));
    let hash = stackwell_crypto::digest(b"slow write");

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            registry.self_register(&identity("0xowner"), submission(b"slow write", "Deed", "Porto"))
        })
    };

    barrier.wait();
    if let Some(record) = registry.find_by_hash(&hash) {
        assert_eq!(record.id, DocumentId(1));
        assert_eq!(record.document_type, "Deed");
    }

    writer.join().unwrap().unwrap();
    assert_eq!(registry.find_by_hash(&hash).unwrap().id, DocumentId(1));
}
