use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::*;
use crate::store::MemoryStorage;

fn token(sub: Option<&str>, exp: Option<i64>) -> String {
    let mut payload = serde_json::Map::new();
    if let Some(sub) = sub {
        payload.insert("sub".into(), sub.into());
    }
    if let Some(exp) = exp {
        payload.insert("exp".into(), exp.into());
    }
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512"}"#),
        URL_SAFE_NO_PAD.encode(serde_json::Value::Object(payload).to_string())
    )
}

fn store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStorage::new()))
}

fn at(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).unwrap()
}

fn seed(s: &SessionStore) {
    s.add_user_to_cache(&User {
        user_name: "alice".into(),
        ..User::default()
    })
    .unwrap();
    s.storage().set_item(USERS_KEY, "[]").unwrap();
}

fn assert_cleared(s: &SessionStore) {
    assert_eq!(s.load_token().unwrap(), None);
    assert_eq!(s.user_from_cache().unwrap(), None);
    assert_eq!(s.storage().get_item(USERS_KEY).unwrap(), None);
}

#[test]
fn valid_unexpired_token_is_logged_in() {
    let s = store();
    s.save_token(&token(Some("alice"), Some(1_000))).unwrap();
    let session = s.current_at(at(999)).unwrap();
    assert_eq!(session.username, "alice");
    assert_eq!(session.expires_at, Some(at(1_000)));
    assert!(s.load_token().unwrap().is_some());
}

#[test]
fn missing_token_is_logged_out_and_clears_cache() {
    let s = store();
    seed(&s);
    assert!(!s.is_logged_in_at(at(0)));
    assert_cleared(&s);
}

#[test]
fn empty_token_is_logged_out() {
    let s = store();
    seed(&s);
    s.save_token("").unwrap();
    assert!(!s.is_logged_in_at(at(0)));
    assert_cleared(&s);
}

#[test]
fn undecodable_token_is_logged_out() {
    let s = store();
    seed(&s);
    s.save_token("garbage").unwrap();
    assert!(!s.is_logged_in_at(at(0)));
    assert_cleared(&s);
}

#[test]
fn token_without_subject_is_logged_out() {
    let s = store();
    seed(&s);
    s.save_token(&token(None, Some(1_000))).unwrap();
    assert!(!s.is_logged_in_at(at(0)));
    assert_cleared(&s);
}

#[test]
fn expired_token_is_logged_out() {
    let s = store();
    seed(&s);
    s.save_token(&token(Some("alice"), Some(1_000))).unwrap();
    assert!(!s.is_logged_in_at(at(1_000)));
    assert_cleared(&s);
}

#[test]
fn cached_user_round_trips() {
    let s = store();
    let user = User {
        user_id: "u-1".into(),
        first_name: "Alice".into(),
        user_name: "alice".into(),
        role: Some(crate::model::Role::Admin),
        active: true,
        ..User::default()
    };
    s.add_user_to_cache(&user).unwrap();
    assert_eq!(s.user_from_cache().unwrap(), Some(user));
}
