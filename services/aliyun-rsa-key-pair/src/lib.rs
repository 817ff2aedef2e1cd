//! Alibaba Cloud RSA key pair credentials for credsign.
//!
//! This crate turns a long-lived RSA key pair into short-lived session
//! access keys by calling the STS `GenerateSessionAccessKey` action, and
//! keeps the latest session access key cached until it's about to expire.
//!
//! ## Overview
//!
//! - [`GenerateSessionAccessKeyProvider`] signs the STS request with
//!   `SHA256withRSA` and parses the response.
//! - [`CredentialCache`] decides staleness through an [`ExpirationTracker`]
//!   and makes sure concurrent stale reads share one refresh. With a
//!   spawner in the context, a refresh finishes even if its readers give up.
//! - [`RsaKeyPairCredential`] is the read surface on top of both.
//!
//! ## Quick Start
//!
//! ```no_run
//! use credsign_aliyun_rsa_key_pair::{Config, RsaKeyPairCredential};
//! use credsign_core::{Context, HttpSend, OsEnv};
//! use credsign_file_read_tokio::TokioFileRead;
//! use credsign_spawn_tokio::TokioSpawn;
//!
//! async fn example(http: impl HttpSend) -> credsign_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(http)
//!         .with_env(OsEnv)
//!         .with_spawn(TokioSpawn);
//!
//!     let config = Config::default().from_env(&ctx);
//!     let cred = RsaKeyPairCredential::from_config(ctx, &config, None).await?;
//!
//!     println!("access key id: {}", cred.access_key_id().await?);
//!     Ok(())
//! }
//! ```
//!
//! With the `reqwest` feature, [`Runtime::http_send`] builds a sender that
//! honors connect and read timeouts and a proxy.
//!
//! ## Environment Variables
//!
//! ```bash
//! export ALIBABA_CLOUD_PUBLIC_KEY_ID=KP-xxxx
//! export ALIBABA_CLOUD_PRIVATE_KEY_FILE=~/.aliyun/private_key.pem
//! export ALIBABA_CLOUD_SESSION_EXPIRATION=1800            # Optional, 900 to 3600
//! export ALIBABA_CLOUD_STS_ENDPOINT=sts.cn-hangzhou.aliyuncs.com  # Optional
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::{Config, Runtime};

mod credential;
pub use credential::{Credential, SessionCredential, CREDENTIAL_TYPE};

pub mod expiration;
pub use expiration::{ExpirationTracker, RefreshState};

pub mod response;
pub mod sign;

mod cache;
pub use cache::{CachedCredential, CredentialCache};

mod provide_credential;
pub use provide_credential::*;

mod rsa_key_pair;
pub use rsa_key_pair::RsaKeyPairCredential;
