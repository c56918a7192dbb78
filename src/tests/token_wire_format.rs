// Issued tokens are standard compact JWS with the expected claims.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use crate::auth::claims::UserIdentity;
use crate::auth::token_service::TokenService;
use crate::config::types::JwtConfig;
use crate::tests::common::test_jwt_config;
use crate::utils::constants::DEFAULT_DISPLAY_NAME;

fn decode_segment(segment: &str) -> Value {
    let bytes = URL_SAFE_NO_PAD.decode(segment).expect("segment must be base64url");
    serde_json::from_slice(&bytes).expect("segment must be JSON")
}

#[test]
fn token_has_three_segments_and_hs256_header() {
    let service = TokenService::new(test_jwt_config());
    let token = service
        .issue_token(&UserIdentity::new("u-1", "u1@example.com", None))
        .unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    assert!(!segments[2].is_empty());
    assert_eq!(decode_segment(segments[0])["alg"], "HS256");
}

#[test]
fn payload_carries_identity_and_configured_issuer_audience() {
    let config = test_jwt_config();
    let service = TokenService::new(config.clone());
    let token = service
        .issue_token(&UserIdentity::new("u-7", "seven@example.com", None))
        .unwrap();

    let payload = decode_segment(token.split('.').nth(1).unwrap());
    assert_eq!(payload["sub"], "u-7");
    assert_eq!(payload["email"], "seven@example.com");
    assert_eq!(payload["name"], DEFAULT_DISPLAY_NAME);
    assert_eq!(payload["iss"], config.issuer.unwrap().as_str());
    assert_eq!(payload["aud"], config.audience.unwrap().as_str());

    let iat = payload["iat"].as_i64().unwrap();
    let exp = payload["exp"].as_i64().unwrap();
    assert_eq!(exp - iat, 90 * 60);
}

#[test]
fn validation_without_secret_is_a_config_error_too() {
    let issuer = TokenService::new(test_jwt_config());
    let token = issuer
        .issue_token(&UserIdentity::new("u-1", "u1@example.com", None))
        .unwrap();

    let unprovisioned = TokenService::new(JwtConfig { key: None, ..test_jwt_config() });
    assert!(matches!(
        unprovisioned.validate(&token),
        Err(crate::auth::error::TokenError::MissingConfig(_))
    ));
}
