use courtside::service::auth_service::{hash_password, verify_password};

#[test]
fn hash_then_verify_roundtrip() {
    let digest = hash_password("correct horse battery staple");
    assert!(verify_password("correct horse battery staple", &digest));
}

#[test]
fn wrong_password_is_rejected() {
    let digest = hash_password("correct horse battery staple");
    assert!(!verify_password("Correct horse battery staple", &digest));
    assert!(!verify_password("", &digest));
}

#[test]
fn salts_are_per_user() {
    let a = hash_password("same password");
    let b = hash_password("same password");
    assert_ne!(a, b);
    assert!(verify_password("same password", &a));
    assert!(verify_password("same password", &b));
}

#[test]
fn malformed_digests_never_verify() {
    assert!(!verify_password("anything", ""));
    assert!(!verify_password("anything", "no-separator"));
    assert!(!verify_password("anything", "!!!$not-base64"));
}
