use std::collections::BTreeMap;

use chrono::TimeDelta;
use credsign_aliyun_rsa_key_pair::sign::string_to_sign;
use credsign_core::hash::base64_decode;
use credsign_core::time::parse_iso8601;
use credsign_core::{ErrorKind, ManualClock, Result};
use http::{Method, StatusCode, Uri};
use percent_encoding::percent_decode_str;
use pretty_assertions::assert_eq;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;
use test_case::test_case;

use super::*;

fn decoded_query(uri: &Uri) -> BTreeMap<String, String> {
    uri.query()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| {
            (
                percent_decode_str(k).decode_utf8_lossy().to_string(),
                percent_decode_str(v).decode_utf8_lossy().to_string(),
            )
        })
        .collect()
}

fn verify_signature(query: &BTreeMap<String, String>) -> bool {
    let public_key = RsaPublicKey::from_public_key_pem(PUBLIC_PEM).unwrap();
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);
    let signature = base64_decode(&query["Signature"]).unwrap();
    let signature = Signature::try_from(signature.as_slice()).unwrap();

    verifying_key
        .verify(string_to_sign(&Method::GET, query).as_bytes(), &signature)
        .is_ok()
}

#[tokio::test]
async fn test_refresh_with_duration_1800() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:00:00Z"),
    );
    let clock = ManualClock::new(t0() - TimeDelta::minutes(30));
    let cred = create_test_credential(http.clone(), clock, 1800);

    assert_eq!(cred.access_key_id().await?, "AKID1");
    assert_eq!(cred.access_key_secret().await?, "SECRET1");
    assert_eq!(cred.security_token(), "");
    assert_eq!(http.calls(), 1);

    let (uri, headers) = http.last_request().expect("request must be sent");
    assert_eq!(uri.scheme_str(), Some("https"));
    assert_eq!(uri.host(), Some("sts.aliyuncs.com"));
    assert_eq!(headers["host"], "sts.aliyuncs.com");
    assert_eq!(headers["accept-encoding"], "identity");

    let query = decoded_query(&uri);
    assert_eq!(query["DurationSeconds"], "1800");
    assert_eq!(query["AccessKeyId"], "KP-test");
    assert_eq!(query["Action"], "GenerateSessionAccessKey");
    assert_eq!(query["Timestamp"], "2029-12-31T23:30:00Z");
    assert!(verify_signature(&query));

    let state = cred.cache().refresh_state().expect("state must be committed");
    assert_eq!(state.validity_seconds, 1800);
    Ok(())
}

#[tokio::test]
async fn test_duration_out_of_range_never_sends() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:00:00Z"),
    );
    let cred = create_test_credential(http.clone(), ManualClock::new(t0()), 100);

    let err = cred.access_key_id().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(err.to_string().contains("15min - 1Hr"), "{err}");
    assert_eq!(http.calls(), 0);
}

#[test_case(0, "3600"; "default")]
#[test_case(900, "900"; "lower bound")]
#[test_case(2700, "2700"; "inside")]
#[test_case(3600, "3600"; "upper bound")]
#[tokio::test]
async fn test_duration_in_range(duration: u64, expected: &str) -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T01:00:00Z"),
    );
    let cred = create_test_credential(http.clone(), ManualClock::new(t0()), duration);

    cred.access_key_id().await?;

    let (uri, _) = http.last_request().expect("request must be sent");
    assert_eq!(decoded_query(&uri)["DurationSeconds"], expected);
    Ok(())
}

#[tokio::test]
async fn test_missing_expiration_keeps_cache() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:30:00Z"),
    );
    let clock = ManualClock::new(t0());
    let cred = create_test_credential(http.clone(), clock.clone(), 1800);
    assert_eq!(cred.access_key_id().await?, "AKID1");
    let before = cred.cache().peek();

    clock.advance(TimeDelta::minutes(29));
    http.respond(
        StatusCode::OK,
        r#"{"SessionAccessKey":{"SessionAccessKeyId":"AKID2","SessionAccessKeySecret":"SECRET2"}}"#,
    );
    let err = cred.access_key_id().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FieldMissing);
    assert!(err.to_string().starts_with("refresh KeyPair err"), "{err}");
    assert!(err.to_string().contains("Expiration"), "{err}");
    assert_eq!(cred.cache().peek(), before);
    assert_eq!(http.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_is_retried_by_next_read() -> Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "");
    http.fail_transport();
    let cred = create_test_credential(http.clone(), ManualClock::new(t0()), 0);

    let err = cred.access_key_secret().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RefreshTransport);
    assert!(err.is_temporary());
    assert!(err.message().starts_with("refresh KeyPair err"), "{err}");
    assert!(cred.cache().peek().is_none());

    http.respond(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T01:00:00Z"),
    );
    assert_eq!(cred.access_key_secret().await?, "SECRET1");
    assert_eq!(http.calls(), 2);
    Ok(())
}

#[test_case(StatusCode::OK, "<html>502 Bad Gateway</html>", ErrorKind::MalformedResponse; "not json")]
#[test_case(StatusCode::OK, r#"{"SessionAccessKey":{"SessionAccessKeyId":7,"SessionAccessKeySecret":"b","Expiration":"2030-01-01T01:00:00Z"}}"#, ErrorKind::MalformedResponse; "wrong type")]
#[test_case(StatusCode::OK, r#"{"SessionAccessKey":{"SessionAccessKeyId":"","SessionAccessKeySecret":"b","Expiration":"2030-01-01T01:00:00Z"}}"#, ErrorKind::MalformedResponse; "empty id")]
#[test_case(StatusCode::OK, r#"{"Code":"InvalidAccessKeyId.NotFound","Message":"Specified access key is not found."}"#, ErrorKind::FieldMissing; "error envelope")]
#[test_case(StatusCode::NOT_FOUND, r#"{"Code":"InvalidAccessKeyId.NotFound"}"#, ErrorKind::RefreshTransport; "not found status")]
#[test_case(StatusCode::SERVICE_UNAVAILABLE, "", ErrorKind::RefreshTransport; "unavailable status")]
#[tokio::test]
async fn test_refresh_errors(status: StatusCode, body: &str, expected: ErrorKind) {
    let http = MockHttpSend::new(status, body);
    let cred = create_test_credential(http.clone(), ManualClock::new(t0()), 0);

    let err = cred.access_key_id().await.unwrap_err();

    assert_eq!(err.kind(), expected);
    assert_eq!(err.is_response_error(), expected != ErrorKind::RefreshTransport);
    assert!(err.message().starts_with("refresh KeyPair err"), "{err}");
    assert!(cred.cache().peek().is_none());
}

#[tokio::test]
async fn test_bad_private_key_fails_before_sending() {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let provider = GenerateSessionAccessKeyProvider::new("KP-test", "not a key");
    let cred = RsaKeyPairCredential::new(
        create_test_context(http.clone(), ManualClock::new(t0())),
        provider,
    );

    let err = cred.access_key_id().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Signing);
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn test_staleness_follows_clock() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:30:00Z"),
    );
    let clock = ManualClock::new(t0());
    let cred = create_test_credential(http.clone(), clock.clone(), 1800);

    cred.access_key_id().await?;
    clock.advance(TimeDelta::seconds(1709));
    cred.access_key_id().await?;
    assert_eq!(http.calls(), 1);

    clock.advance(TimeDelta::seconds(1));
    http.respond(
        StatusCode::OK,
        session_body("AKID2", "SECRET2", "2030-01-01T01:00:00Z"),
    );
    assert_eq!(cred.access_key_id().await?, "AKID2");
    assert_eq!(http.calls(), 2);

    let state = cred.cache().refresh_state().expect("state must be committed");
    assert_eq!(
        state.last_refreshed_at,
        parse_iso8601("2030-01-01T00:28:30Z")?
    );
    assert_eq!(state.validity_seconds, 1890);
    Ok(())
}

#[tokio::test]
async fn test_credential_snapshot() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T01:00:00Z"),
    );
    let cred = create_test_credential(http.clone(), ManualClock::new(t0()), 0);

    let snapshot = cred.credential().await?;

    assert_eq!(snapshot.access_key_id, "AKID1");
    assert_eq!(snapshot.access_key_secret, "SECRET1");
    assert_eq!(snapshot.security_token, "");
    assert_eq!(snapshot.bearer_token, "");
    assert_eq!(snapshot.r#type, "rsa_key_pair");
    assert_eq!(cred.credential_type(), "rsa_key_pair");
    assert_eq!(http.calls(), 1);
    Ok(())
}
