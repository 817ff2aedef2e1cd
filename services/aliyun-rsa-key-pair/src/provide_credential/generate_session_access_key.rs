use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use credsign_core::time::{format_iso8601, DateTime};
use credsign_core::utils::Redact;
use credsign_core::{Context, Error, ProvideCredential, Result, SigningCredential, SigningRequest};
use http::header::{ACCEPT_ENCODING, HOST};
use http::uri::Scheme;
use http::Method;
use log::debug;
use uuid::Uuid;

use crate::constants::*;
use crate::response::parse_session_response;
use crate::sign::{percent_encode, sign};
use crate::SessionCredential;

/// GenerateSessionAccessKeyProvider exchanges an RSA key pair for a session
/// access key by calling the STS `GenerateSessionAccessKey` action.
///
/// Every call performs one signed request. Caching and staleness are handled
/// by [`crate::CredentialCache`].
///
/// - [GenerateSessionAccessKey](https://www.alibabacloud.com/help/en/ram/developer-reference/api-sts-2015-04-01-generatesessionaccesskey)
#[derive(Clone)]
pub struct GenerateSessionAccessKeyProvider {
    public_key_id: String,
    private_key: String,
    duration_seconds: u64,
    host: String,
}

impl Debug for GenerateSessionAccessKeyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateSessionAccessKeyProvider")
            .field("public_key_id", &self.public_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("duration_seconds", &self.duration_seconds)
            .field("host", &self.host)
            .finish()
    }
}

impl GenerateSessionAccessKeyProvider {
    /// Create a provider for `public_key_id` signing with `private_key`.
    ///
    /// The private key is kept as given and parsed on every request.
    pub fn new(public_key_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key_id: public_key_id.into(),
            private_key: private_key.into(),
            duration_seconds: 0,
            host: DEFAULT_STS_HOST.to_string(),
        }
    }

    /// Set the requested session duration, `0` means the default of one hour.
    ///
    /// The value is checked when a request is built.
    pub fn with_duration_seconds(mut self, duration_seconds: u64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Override the STS host, for example `sts.cn-hangzhou.aliyuncs.com`.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.host = host
            .strip_prefix("https://")
            .unwrap_or(&host)
            .trim_end_matches('/')
            .to_string();
        self
    }

    /// Get the STS host requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve the duration to request, failing if it's out of range.
    pub fn duration_seconds(&self) -> Result<u64> {
        match self.duration_seconds {
            0 => Ok(DEFAULT_DURATION_SECONDS),
            v if (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&v) => Ok(v),
            v => Err(Error::invalid_parameter(format!(
                "Key Pair session duration should be in the range of 15min - 1Hr, got {v}s"
            ))),
        }
    }

    /// Build the signed request for `now` using `nonce` as `SignatureNonce`.
    pub fn build_request(&self, now: DateTime, nonce: &str) -> Result<SigningRequest> {
        let duration = self.duration_seconds()?;

        let params: BTreeMap<String, String> = [
            (PARAM_ACCESS_KEY_ID, self.public_key_id.clone()),
            (PARAM_ACTION, ACTION.to_string()),
            (PARAM_DURATION_SECONDS, duration.to_string()),
            (PARAM_FORMAT, FORMAT.to_string()),
            (PARAM_SIGNATURE_METHOD, SIGNATURE_METHOD.to_string()),
            (PARAM_SIGNATURE_NONCE, nonce.to_string()),
            (PARAM_SIGNATURE_TYPE, SIGNATURE_TYPE.to_string()),
            (PARAM_SIGNATURE_VERSION, SIGNATURE_VERSION.to_string()),
            (PARAM_TIMESTAMP, format_iso8601(now)),
            (PARAM_VERSION, API_VERSION.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        debug!("built {ACTION} params with duration {duration}s and nonce {nonce}");

        let signed = sign(&Method::GET, &params, &self.private_key)?;
        debug!("signed {ACTION} request");

        let mut req = SigningRequest::new(Method::GET, Scheme::HTTPS, &self.host)?;
        for (k, v) in &params {
            req.query_push(percent_encode(k), percent_encode(v));
        }
        // Signature goes in last and is never part of what got signed.
        req.query_push(PARAM_SIGNATURE, percent_encode(&signed.signature));
        req.header_insert(HOST, &self.host)?;
        req.header_insert(ACCEPT_ENCODING, "identity")?;

        Ok(req)
    }
}

#[async_trait]
impl ProvideCredential for GenerateSessionAccessKeyProvider {
    type Credential = SessionCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let nonce = Uuid::new_v4().to_string();
        let req = self.build_request(ctx.now(), &nonce)?.into_http_request()?;

        debug!("sending {ACTION} request to {}", self.host);
        let resp = ctx.http_send(req).await.map_err(|e| {
            Error::refresh_transport(format!("request to {} failed", self.host))
                .with_source(e)
                .with_context("refresh KeyPair err")
        })?;

        if !resp.status().is_success() {
            return Err(Error::refresh_transport(format!(
                "request to {} failed with status {}: {}",
                self.host,
                resp.status(),
                String::from_utf8_lossy(resp.body())
            ))
            .with_context("refresh KeyPair err"));
        }

        let key = parse_session_response(resp.body())
            .map_err(|e| e.with_context("refresh KeyPair err"))?;
        let cred = SessionCredential {
            access_key_id: key.access_key_id,
            access_key_secret: key.access_key_secret,
            expiration: key.expiration,
        };
        if !cred.is_valid() {
            return Err(Error::malformed_response(
                "refresh KeyPair err: session access key id or secret is empty",
            ));
        }

        debug!(
            "got session access key {} expiring at {}",
            Redact::from(&cred.access_key_id),
            format_iso8601(cred.expiration)
        );
        Ok(Some(cred))
    }
}
