use std::time::Duration;

use credsign_core::utils::Redact;
use credsign_core::Context;
use log::warn;

use super::constants::*;

/// Config carries everything needed to build an [`crate::RsaKeyPairCredential`].
#[derive(Clone, Default)]
pub struct Config {
    /// `public_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_PUBLIC_KEY_ID`]
    pub public_key_id: Option<String>,
    /// `private_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_PRIVATE_KEY`]
    pub private_key: Option<String>,
    /// `private_key_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_PRIVATE_KEY_FILE`]
    ///
    /// Only used when `private_key` is not set.
    pub private_key_file: Option<String>,
    /// `session_expiration` in seconds will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_SESSION_EXPIRATION`]
    pub session_expiration: Option<u64>,
    /// `sts_endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_STS_ENDPOINT`]
    pub sts_endpoint: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("public_key_id", &self.public_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("private_key_file", &self.private_key_file)
            .field("session_expiration", &self.session_expiration)
            .field("sts_endpoint", &self.sts_endpoint)
            .finish()
    }
}

impl Config {
    /// Set the public key id.
    pub fn with_public_key_id(mut self, v: impl Into<String>) -> Self {
        self.public_key_id = Some(v.into());
        self
    }

    /// Set the private key content.
    pub fn with_private_key(mut self, v: impl Into<String>) -> Self {
        self.private_key = Some(v.into());
        self
    }

    /// Set the path of the private key file, `~` is expanded.
    pub fn with_private_key_file(mut self, v: impl Into<String>) -> Self {
        self.private_key_file = Some(v.into());
        self
    }

    /// Set the requested session duration in seconds.
    pub fn with_session_expiration(mut self, v: u64) -> Self {
        self.session_expiration = Some(v);
        self
    }

    /// Set the STS endpoint host.
    pub fn with_sts_endpoint(mut self, v: impl Into<String>) -> Self {
        self.sts_endpoint = Some(v.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_PUBLIC_KEY_ID) {
            self.public_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_PRIVATE_KEY) {
            self.private_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_PRIVATE_KEY_FILE) {
            self.private_key_file.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_SESSION_EXPIRATION) {
            match v.trim().parse::<u64>() {
                Ok(v) => {
                    self.session_expiration.get_or_insert(v);
                }
                Err(_) => warn!("ignoring invalid {ALIBABA_CLOUD_SESSION_EXPIRATION}: {v}"),
            }
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_STS_ENDPOINT) {
            self.sts_endpoint.get_or_insert(v);
        }

        self
    }
}

/// Runtime overrides for a single provider.
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    /// STS host, takes precedence over [`Config::sts_endpoint`].
    pub host: Option<String>,
    /// Maximum time to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Maximum time to wait for the whole response.
    pub read_timeout: Option<Duration>,
    /// Proxy url used for the STS request.
    pub proxy: Option<String>,
}

impl Runtime {
    /// Set the STS host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the proxy url.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build a reqwest based sender honoring the timeouts and proxy.
    ///
    /// Plug it into the context with [`Context::with_http_send`].
    #[cfg(feature = "reqwest")]
    pub fn http_send(&self) -> credsign_core::Result<credsign_http_send_reqwest::ReqwestHttpSend> {
        credsign_http_send_reqwest::ReqwestHttpSend::with_options(
            &credsign_http_send_reqwest::HttpOptions {
                connect_timeout: self.connect_timeout,
                read_timeout: self.read_timeout,
                proxy: self.proxy.clone(),
            },
        )
    }
}
