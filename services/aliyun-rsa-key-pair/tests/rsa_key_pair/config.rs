use std::collections::HashMap;
use std::io::Write;

use credsign_aliyun_rsa_key_pair::{Config, RsaKeyPairCredential, Runtime};
use credsign_core::{ErrorKind, ManualClock, Result, StaticEnv};
use credsign_file_read_tokio::TokioFileRead;
use http::StatusCode;
use pretty_assertions::assert_eq;

use super::*;

fn static_env(envs: &[(&str, &str)], home_dir: Option<std::path::PathBuf>) -> StaticEnv {
    StaticEnv {
        home_dir,
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

#[tokio::test]
async fn test_from_env_with_private_key_file() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("private_key.pem");
    std::fs::File::create(&key_path)
        .and_then(|mut f| f.write_all(PKCS1_PEM.as_bytes()))
        .unwrap();

    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:30:00Z"),
    );
    let ctx = create_test_context(http.clone(), ManualClock::new(t0()))
        .with_file_read(TokioFileRead)
        .with_env(static_env(
            &[
                ("ALIBABA_CLOUD_PUBLIC_KEY_ID", "KP-env"),
                ("ALIBABA_CLOUD_PRIVATE_KEY_FILE", "~/private_key.pem"),
                ("ALIBABA_CLOUD_SESSION_EXPIRATION", "1800"),
                ("ALIBABA_CLOUD_STS_ENDPOINT", "sts.cn-hangzhou.aliyuncs.com"),
            ],
            Some(dir.path().to_path_buf()),
        ));

    let config = Config::default().from_env(&ctx);
    let cred = RsaKeyPairCredential::from_config(ctx, &config, None).await?;

    assert_eq!(cred.access_key_id().await?, "AKID1");
    let (uri, _) = http.last_request().expect("request must be sent");
    assert_eq!(uri.host(), Some("sts.cn-hangzhou.aliyuncs.com"));
    let query = uri.query().unwrap_or_default();
    assert!(query.contains("AccessKeyId=KP-env"), "{query}");
    assert!(query.contains("DurationSeconds=1800"), "{query}");
    Ok(())
}

#[tokio::test]
async fn test_inline_private_key_wins_over_file() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:30:00Z"),
    );
    // No file reader is configured, so reading the file would fail.
    let ctx = create_test_context(http.clone(), ManualClock::new(t0()));
    let config = Config::default()
        .with_public_key_id("KP-test")
        .with_private_key(PKCS1_PEM)
        .with_private_key_file("/not/exist/private_key.pem");

    let cred = RsaKeyPairCredential::from_config(ctx, &config, None).await?;

    assert_eq!(cred.access_key_secret().await?, "SECRET1");
    Ok(())
}

#[tokio::test]
async fn test_runtime_host_wins_over_config() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::OK,
        session_body("AKID1", "SECRET1", "2030-01-01T00:30:00Z"),
    );
    let ctx = create_test_context(http.clone(), ManualClock::new(t0()));
    let config = Config::default()
        .with_public_key_id("KP-test")
        .with_private_key(PKCS1_PEM)
        .with_sts_endpoint("sts.cn-hangzhou.aliyuncs.com");
    let runtime = Runtime::default().with_host("sts.ap-northeast-1.aliyuncs.com");

    let cred = RsaKeyPairCredential::from_config(ctx, &config, Some(&runtime)).await?;
    cred.access_key_id().await?;

    let (uri, headers) = http.last_request().expect("request must be sent");
    assert_eq!(uri.host(), Some("sts.ap-northeast-1.aliyuncs.com"));
    assert_eq!(headers["host"], "sts.ap-northeast-1.aliyuncs.com");
    Ok(())
}

#[tokio::test]
async fn test_missing_private_key_file() {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = create_test_context(http.clone(), ManualClock::new(t0()))
        .with_file_read(TokioFileRead);
    let config = Config::default()
        .with_public_key_id("KP-test")
        .with_private_key_file("/not/exist/private_key.pem");

    let err = RsaKeyPairCredential::from_config(ctx, &config, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(http.calls(), 0);
}
