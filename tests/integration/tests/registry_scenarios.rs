//! Integration test: registration, issuance and verification across crates.
//!
//! Drives the registry through stackwell-registry while hashing with
//! stackwell-crypto, the way a client and the node cooperate.

use stackwell_core::{DocumentId, VerificationStatus};
use stackwell_integration_tests::{identity, registry, submission, ADMIN};
use stackwell_registry::{DocumentVerifier, RegistryError};

// =========================================================================
// Self-registration
// =========================================================================

#[test]
fn test_self_registration_then_duplicate() {
    let registry = registry();
    let owner = identity("0xowner");
    let bytes = b"%PDF-1.7 bachelor of science diploma";

    let id = registry
        .self_register(&owner, submission(bytes, "Diploma", "Lisbon"))
        .expect("first registration should succeed");
    let record = registry.get_document(id).unwrap();
    assert!(!record.is_verified);
    assert_eq!(record.status(), VerificationStatus::Pending);
    assert_eq!(record.issuer, owner);
    assert!(record.issuer_name.is_empty());

    let err = registry
        .self_register(&owner, submission(bytes, "Diploma", "Lisbon"))
        .unwrap_err();
    match err {
        RegistryError::DuplicateDocument {
            content_hash,
            existing,
        } => {
            assert_eq!(content_hash, stackwell_crypto::digest(bytes));
            assert_eq!(existing, id);
        }
        other => panic!("expected DuplicateDocument, got {other:?}"),
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_rejected_across_owners_and_kinds() {
    let registry = registry();
    let admin = identity(ADMIN);
    let acme = identity("0xacme");
    registry
        .directory()
        .authorize(&admin, &acme, "Acme Registrar")
        .unwrap();

    let bytes = b"land deed 2291";
    registry
        .self_register(&identity("0xalice"), submission(bytes, "Deed", "Porto"))
        .unwrap();

    let err = registry
        .issue_official(
            &acme,
            &identity("0xbob"),
            submission(bytes, "Deed", "Porto"),
            "",
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateDocument { .. }));
    assert!(registry.documents_of(&identity("0xbob")).is_empty());
}

// =========================================================================
// Official issuance
// =========================================================================

#[test]
fn test_authorized_issuance_and_unauthorized_rejection() {
    let registry = registry();
    let admin = identity(ADMIN);
    let issuer = identity("0xacme");
    let owner = identity("0xowner");
    let stranger = identity("0xstranger");

    registry
        .directory()
        .authorize(&admin, &issuer, "Acme Registrar")
        .unwrap();

    let id = registry
        .issue_official(
            &issuer,
            &owner,
            submission(b"official transcript", "Transcript", "Lisbon"),
            "ignored label",
        )
        .unwrap();
    let record = registry.get_document(id).unwrap();
    assert!(record.is_verified);
    assert_eq!(record.issuer_name, "Acme Registrar");
    assert_eq!(record.issuer, issuer);
    assert_eq!(record.owner, owner);

    let h3 = stackwell_crypto::digest(b"forged certificate");
    let err = registry
        .issue_official(
            &stranger,
            &owner,
            submission(b"forged certificate", "Certificate", "Lisbon"),
            "Totally Real University",
        )
        .unwrap_err();
    assert_eq!(err, RegistryError::NotAuthorizedIssuer(stranger));
    assert!(registry.find_by_hash(&h3).is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_only_admin_manages_directory() {
    let registry = registry();
    let directory = registry.directory();
    let acme = identity("0xacme");

    let err = directory.authorize(&acme, &acme, "Acme").unwrap_err();
    assert!(matches!(err, RegistryError::PermissionDenied(_)));
    assert!(!directory.is_authorized(&acme));

    directory
        .authorize(&identity(ADMIN), &acme, "Acme")
        .unwrap();
    let err = directory.revoke(&acme, &acme).unwrap_err();
    assert!(matches!(err, RegistryError::PermissionDenied(_)));
    assert!(directory.is_authorized(&acme));
}

#[test]
fn test_authorization_is_idempotent() {
    let registry = registry();
    let directory = registry.directory();
    let admin = identity(ADMIN);
    let acme = identity("0xacme");

    directory.authorize(&admin, &acme, "Acme Registrar").unwrap();
    let before = directory.list();
    directory.authorize(&admin, &acme, "Acme Registrar").unwrap();

    assert_eq!(directory.list(), before);
    assert_eq!(directory.authorized_count(), 1);
    assert_eq!(
        directory.display_name(&acme).as_deref(),
        Some("Acme Registrar")
    );
}

// =========================================================================
// Verification lifecycle
// =========================================================================

#[test]
fn test_verification_is_monotonic_under_directory_changes() {
    let registry = registry();
    let verifier = DocumentVerifier::new(registry.clone());
    let directory = registry.directory();
    let admin = identity(ADMIN);
    let acme = identity("0xacme");

    directory.authorize(&admin, &acme, "Acme Registrar").unwrap();
    let bytes = b"notarized power of attorney";
    registry
        .issue_official(
            &acme,
            &identity("0xowner"),
            submission(bytes, "Power of Attorney", "Faro"),
            "",
        )
        .unwrap();
    let hash = stackwell_crypto::digest(bytes).to_hex();

    directory.authorize(&admin, &acme, "Acme Renamed").unwrap();
    directory.revoke(&admin, &acme).unwrap();

    let result = verifier.verify(&hash).unwrap();
    assert!(result.exists);
    assert!(result.is_verified);
    assert_eq!(result.issuer_name, "Acme Registrar");
    assert_eq!(result.status(), Some(VerificationStatus::Verified));

    let err = registry
        .issue_official(
            &acme,
            &identity("0xowner"),
            submission(b"after revocation", "Deed", "Faro"),
            "",
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotAuthorizedIssuer(_)));
}

#[test]
fn test_negative_lookup_is_not_an_error() {
    let registry = registry();
    let verifier = DocumentVerifier::new(registry);

    let result = verifier
        .verify(&stackwell_crypto::digest(b"never registered").to_hex())
        .unwrap();
    assert!(!result.exists);
    assert!(!result.is_verified);
    assert!(result.document_type.is_empty());
    assert!(result.timestamp.is_none());
    assert_eq!(result.status(), None);

    assert!(matches!(
        verifier.verify("0xnot-hex"),
        Err(RegistryError::InvalidHash(_))
    ));
}

#[test]
fn test_round_trip_by_id_hash_and_owner() {
    let registry = registry();
    let verifier = DocumentVerifier::new(registry.clone());
    let owner = identity("0xowner");

    let sub = submission(b"birth certificate", "Birth Certificate", "Braga")
        .with_aux_hash("QmPreviewImage")
        .with_metadata_uri("ipfs://QmMetadata");
    let id = registry.self_register(&owner, sub).unwrap();

    let by_id = verifier.document(id).unwrap();
    let by_hash = registry
        .find_by_hash(&stackwell_crypto::digest(b"birth certificate"))
        .unwrap();
    assert_eq!(by_id, by_hash);
    assert_eq!(by_id.aux_hash.as_deref(), Some("QmPreviewImage"));
    assert_eq!(by_id.metadata_uri, "ipfs://QmMetadata");
    assert_eq!(verifier.documents_of(&owner), vec![by_id]);

    assert_eq!(
        verifier.document(DocumentId(id.value() + 1)),
        Err(RegistryError::NotFound(DocumentId(id.value() + 1)))
    );
}

#[test]
fn test_hash_lookup_ignores_spelling() {
    let registry = registry();
    let verifier = DocumentVerifier::new(registry.clone());
    registry
        .self_register(
            &identity("0xowner"),
            submission(b"case test", "Diploma", "Lisbon"),
        )
        .unwrap();

    let canonical = stackwell_crypto::digest(b"case test").to_hex();
    let shouted = format!("  0X{}  ", canonical[2..].to_uppercase());
    assert!(verifier.verify(&canonical).unwrap().exists);
    assert!(verifier.verify(&shouted).unwrap().exists);
    assert!(verifier.verify(&canonical[2..]).unwrap().exists);
}

#[test]
fn test_verify_bytes_matches_registered_file() {
    let registry = registry();
    let verifier = DocumentVerifier::new(registry.clone());
    let bytes = b"exact file contents";
    registry
        .self_register(&identity("0xowner"), submission(bytes, "Diploma", "Lisbon"))
        .unwrap();

    assert!(verifier.verify_bytes(bytes).exists);
    assert!(!verifier.verify_bytes(b"exact file contents.").exists);
}

#[test]
fn test_owner_listing_keeps_insertion_order() {
    let registry = registry();
    let owner = identity("0xowner");
    let ids: Vec<DocumentId> = (0..5u8)
        .map(|i| {
            registry
                .self_register(&owner, submission(&[i; 16], "Receipt", "Lisbon"))
                .unwrap()
        })
        .collect();

    let listed: Vec<DocumentId> = registry.documents_of(&owner).iter().map(|r| r.id).collect();
    assert_eq!(listed, ids);
    assert!(registry.documents_of(&identity("0xnobody")).is_empty());
}

#[test]
fn test_record_serializes_with_canonical_hash() {
    let registry = registry();
    let id = registry
        .self_register(
            &identity("0xowner"),
            submission(b"json shape", "Diploma", "Lisbon"),
        )
        .unwrap();
    let json = serde_json::to_value(registry.get_document(id).unwrap()).unwrap();
    assert_eq!(
        json["content_hash"],
        stackwell_crypto::digest(b"json shape").to_hex()
    );
    assert_eq!(json["is_verified"], false);
    assert_eq!(json["owner"], "0xowner");
}
