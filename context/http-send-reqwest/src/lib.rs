//! Reqwest-based HTTP sending implementation for credsign.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `credsign_core`.
//! It owns the connection lifecycle: timeouts and proxies are configured on
//! the underlying `reqwest::Client`, either directly or through
//! [`HttpOptions`].
//!
//! ## Example
//!
//! ```no_run
//! use credsign_core::Context;
//! use credsign_http_send_reqwest::{HttpOptions, ReqwestHttpSend};
//! use std::time::Duration;
//!
//! # fn example() -> credsign_core::Result<()> {
//! let http = ReqwestHttpSend::with_options(&HttpOptions {
//!     connect_timeout: Some(Duration::from_secs(5)),
//!     read_timeout: Some(Duration::from_secs(10)),
//!     proxy: None,
//! })?;
//! let ctx = Context::new().with_http_send(http);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use credsign_core::{Error, HttpSend, Result};
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};
use std::time::Duration;

/// Connection settings applied when building the reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Maximum time to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Maximum time for the whole request, from sending to the last body byte.
    pub read_timeout: Option<Duration>,
    /// Proxy url used for every scheme, for example `http://127.0.0.1:3128`.
    pub proxy: Option<String>,
}

/// HttpSend implementation backed by `reqwest::Client`.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from `opts`.
    pub fn with_options(opts: &HttpOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = opts.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = opts.read_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &opts.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
                Error::config_invalid(format!("invalid proxy url: {proxy}")).with_source(e)
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        debug!("sending {} {}", req.method(), req.uri().host().unwrap_or_default());

        let req = Request::try_from(req)
            .map_err(|e| Error::unexpected("failed to convert http request").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::refresh_transport("failed to send http request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::refresh_transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
