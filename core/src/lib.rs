//! Core components for self-refreshing session credentials.
//!
//! This crate provides the foundational types and traits shared by the credsign
//! crates. It defines the seams that keep credential providers independent from
//! the runtime they are used in.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending,
//!   environment access and the current time
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and
//!   credential validation (`SigningCredential`)
//! - **SigningRequest**: An owned description of an outbound request (method, scheme,
//!   authority, path, query and headers) that is turned into an `http::Request`
//!
//! ## Example
//!
//! ```no_run
//! use credsign_core::{Context, ProvideCredential, Result, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! if let Some(cred) = MyLoader.provide_credential(&ctx).await? {
//!     assert!(cred.is_valid());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`FileRead`]: For asynchronous file reading
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access
//! - [`Clock`]: For reading the current time
//! - [`Spawn`]: For running background tasks
//! - [`ProvideCredential`]: For loading credentials from various sources
//! - [`SigningCredential`]: For validating credentials
//!
//! ## Utilities
//!
//! - [`hash`]: Base64 helpers
//! - [`time`]: Time formatting, parsing and clocks
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::FileRead;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopFileRead;
pub use context::NoopHttpSend;
pub use context::NoopSpawn;
pub use context::OsEnv;
pub use context::Spawn;
pub use context::StaticEnv;
pub use time::Clock;
pub use time::ManualClock;
pub use time::SystemClock;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SigningCredential};
mod request;
pub use request::SigningRequest;
