//! Integration test: a registry rebuilt from its store answers exactly as
//! before the restart.

use std::sync::Arc;

use stackwell_core::{DocumentId, RegistryConfig};
use stackwell_integration_tests::{identity, registry_on, submission, ADMIN};
use stackwell_registry::{
    DocumentRegistry, DocumentVerifier, IssuerDirectory, MemoryStore, RecordStore,
    RegistryError,
};

#[test]
fn test_restart_rebuilds_records_indices_and_directory() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let admin = identity(ADMIN);
    let acme = identity("0xacme");
    let owner = identity("0xowner");

    let (self_id, official_id) = {
        let registry = registry_on(store.clone());
        registry
            .directory()
            .authorize(&admin, &acme, "Acme Registrar")
            .unwrap();
        let self_id = registry
            .self_register(&owner, submission(b"self", "Diploma", "Lisbon"))
            .unwrap();
        let official_id = registry
            .issue_official(&acme, &owner, submission(b"official", "Diploma", "Lisbon"), "")
            .unwrap();
        (self_id, official_id)
    };

    let registry = registry_on(store);
    let verifier = DocumentVerifier::new(registry.clone());

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.verified_count(), 1);
    assert!(registry.directory().is_authorized(&acme));
    assert_eq!(
        registry
            .documents_of(&owner)
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>(),
        vec![self_id, official_id]
    );

    let official = verifier
        .verify(&stackwell_crypto::digest(b"official").to_hex())
        .unwrap();
    assert!(official.is_verified);
    assert_eq!(official.issuer_name, "Acme Registrar");

    // Uniqueness survives the restart.
    let err = registry
        .self_register(&identity("0xother"), submission(b"self", "Diploma", "Lisbon"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateDocument { existing, .. } if existing == self_id));

    // Ids are never reused.
    let next = registry
        .self_register(&owner, submission(b"after restart", "Diploma", "Lisbon"))
        .unwrap();
    assert!(next > official_id);
}

#[test]
fn test_bootstrap_issuers_reapplied_on_open() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let admin = identity(ADMIN);
    let official = identity("0xofficial");

    let config = RegistryConfig::with_admin(admin.clone())
        .with_issuer(official.clone(), "Stackwell Official");
    {
        let directory = IssuerDirectory::open(&config, store.clone()).unwrap();
        directory.revoke(&admin, &official).unwrap();
        assert!(!directory.is_authorized(&official));
    }

    let directory = Arc::new(IssuerDirectory::open(&config, store.clone()).unwrap());
    assert_eq!(
        directory.display_name(&official).as_deref(),
        Some("Stackwell Official")
    );

    let registry = DocumentRegistry::open(directory, store).unwrap();
    let id = registry
        .issue_official(
            &official,
            &identity("0xowner"),
            submission(b"bootstrap issued", "Diploma", "Lisbon"),
            "",
        )
        .unwrap();
    assert_eq!(id, DocumentId(1));
}
