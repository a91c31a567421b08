use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::*;

fn token_with(payload: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.as_bytes())
    )
}

#[test]
fn decodes_subject_expiry_and_authorities() {
    let token = token_with(r#"{"sub":"alice","exp":2000000000,"authorities":["user:read"]}"#);
    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.subject(), Some("alice"));
    assert_eq!(claims.exp, Some(2_000_000_000));
    assert_eq!(claims.authorities, vec!["user:read".to_string()]);
}

#[test]
fn rejects_tokens_without_three_parts() {
    assert!(matches!(decode_claims("abc"), Err(TokenError::Malformed)));
    assert!(matches!(decode_claims("a.b.c.d"), Err(TokenError::Malformed)));
    assert!(matches!(decode_claims("a..c"), Err(TokenError::Malformed)));
}

#[test]
fn rejects_payload_that_is_not_json() {
    let token = token_with("plain text");
    assert!(matches!(decode_claims(&token), Err(TokenError::Payload(_))));
}

#[test]
fn rejects_payload_that_is_not_base64() {
    assert!(matches!(
        decode_claims("x.!!!!.y"),
        Err(TokenError::Encoding(_))
    ));
}

#[test]
fn blank_subject_is_treated_as_missing() {
    let claims = decode_claims(&token_with(r#"{"sub":"  "}"#)).unwrap();
    assert_eq!(claims.subject(), None);
}

#[test]
fn expiry_is_inclusive_of_the_exp_second() {
    let claims = decode_claims(&token_with(r#"{"sub":"a","exp":100}"#)).unwrap();
    let at = |s| OffsetDateTime::from_unix_timestamp(s).unwrap();
    assert!(!claims.is_expired_at(at(99)));
    assert!(claims.is_expired_at(at(100)));
    assert!(claims.is_expired_at(at(101)));
}

#[test]
fn missing_exp_never_expires() {
    let claims = decode_claims(&token_with(r#"{"sub":"a"}"#)).unwrap();
    assert!(!claims.is_expired_at(OffsetDateTime::now_utc()));
    assert_eq!(claims.expires_at(), None);
}
