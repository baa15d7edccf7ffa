mod common;

use std::io::Write;

use common::{Call, FakeKeyService, ScriptedVerifier, ANCHOR};
use digsig_keyring as dk;
use dk::{CertSource, Errno, KeyHandle, KeyType, KeyringError};

#[test]
fn unset_anchor_is_rejected() {
    let keys = FakeKeyService::new();
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::unset_anchor());

    let err = dv.load_x509_from_mem(b"certificate").unwrap_err();
    assert!(matches!(err, KeyringError::InvalidArgument(_)));
    assert_eq!(err.errno(), Errno::EINVAL);
    assert!(keys.calls().is_empty());
}

#[test]
fn empty_certificate_is_rejected() {
    let keys = FakeKeyService::new();
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::loaded_anchor());

    let err = dv.load_x509_from_mem(&[]).unwrap_err();
    assert_eq!(err.errno(), Errno::EINVAL);
    assert!(keys.calls().is_empty());
}

#[test]
fn certificate_is_added_as_asymmetric_key_and_released() {
    let keys = FakeKeyService::new();
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::loaded_anchor());

    dv.load_x509_from_mem(b"der-bytes").unwrap();
    assert_eq!(
        keys.calls(),
        vec![
            Call::Add {
                keyring: ANCHOR,
                key_type: KeyType::Asymmetric,
                payload: b"der-bytes".to_vec(),
            },
            Call::Put(KeyHandle(500)),
        ]
    );
}

#[test]
fn add_failure_keeps_raw_code() {
    let keys = FakeKeyService::new();
    keys.add_returns(Err(Errno::EBADMSG));
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::loaded_anchor());

    let err = dv.load_x509_from_mem(b"garbage").unwrap_err();
    assert!(matches!(err, KeyringError::Provision(Errno::EBADMSG)));
    assert!(keys.puts().is_empty());
}

#[test]
fn load_from_file_source() {
    let keys = FakeKeyService::new();
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::loaded_anchor());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signing_key.der");
    std::fs::File::create(&path)
        .and_then(|mut f| f.write_all(b"cert-from-file"))
        .unwrap();

    let source: CertSource = format!("file:{}", path.display()).parse().unwrap();
    dv.load_x509_from_source(&source).unwrap();
    assert!(matches!(
        &keys.calls()[0],
        Call::Add { payload, .. } if payload == b"cert-from-file"
    ));
}

#[test]
fn missing_file_source_is_io_error() {
    let keys = FakeKeyService::new();
    let v = ScriptedVerifier::returning(0);
    let dv = common::verifier_with(&keys, &v, common::loaded_anchor());

    let dir = tempfile::tempdir().unwrap();
    let source = CertSource::File(dir.path().join("absent.der"));
    let err = dv.load_x509_from_source(&source).unwrap_err();
    assert!(matches!(err, KeyringError::Io(_)));
    assert!(keys.calls().is_empty());
}

#[test]
fn env_source_reads_variable() {
    std::env::set_var("DK_TEST_TRUSTED_CERT", "pem-text");
    let source: CertSource = "env:DK_TEST_TRUSTED_CERT".parse().unwrap();
    assert_eq!(source.read().unwrap(), b"pem-text".to_vec());

    let missing = CertSource::Env("DK_TEST_DOES_NOT_EXIST".into());
    let err = missing.read().unwrap_err();
    assert!(err.to_string().contains("DK_TEST_DOES_NOT_EXIST"));
}
