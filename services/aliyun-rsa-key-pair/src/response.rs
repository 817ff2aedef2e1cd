//! Parser for the `GenerateSessionAccessKey` response body.
//!
//! A successful body looks like:
//!
//! ```json
//! {
//!   "RequestId": "E0F2B6A8-...",
//!   "SessionAccessKey": {
//!     "SessionAccessKeyId": "STS.NUgYrLnoC37mZZCNnAbez",
//!     "SessionAccessKeySecret": "CVwjCkNzTMupZ8NbTCxCBRq3K16jtcWFTJAyBEv2",
//!     "Expiration": "2030-01-01T00:30:00Z"
//!   }
//! }
//! ```

use credsign_core::time::{parse_iso8601, DateTime};
use credsign_core::{Error, Result};
use serde_json::Value;

/// Path of the session access key id.
pub const PATH_ACCESS_KEY_ID: &str = "SessionAccessKey.SessionAccessKeyId";
/// Path of the session access key secret.
pub const PATH_ACCESS_KEY_SECRET: &str = "SessionAccessKey.SessionAccessKeySecret";
/// Path of the absolute expiration.
pub const PATH_EXPIRATION: &str = "SessionAccessKey.Expiration";

/// The three values extracted from a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAccessKey {
    /// `SessionAccessKey.SessionAccessKeyId`
    pub access_key_id: String,
    /// `SessionAccessKey.SessionAccessKeySecret`
    pub access_key_secret: String,
    /// `SessionAccessKey.Expiration`
    pub expiration: DateTime,
}

/// Walk a dotted path one object key at a time.
///
/// Returns `None` when any segment is absent, which is different from a
/// present `null`.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

/// Describe an error body, if the service returned its usual `Code` and `Message`.
fn service_error(value: &Value) -> Option<String> {
    let code = value.get("Code").and_then(Value::as_str)?;
    match value.get("Message").and_then(Value::as_str) {
        Some(message) => Some(format!("{code}: {message}")),
        None => Some(code.to_string()),
    }
}

/// Parse raw response bytes.
pub fn parse_session_response(body: &[u8]) -> Result<SessionAccessKey> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        Error::malformed_response(format!(
            "response is not valid json: {}",
            String::from_utf8_lossy(body)
        ))
        .with_source(e)
    })?;

    parse_session_value(&value)
}

/// Extract the session access key from an already decoded document.
///
/// Absent or `null` fields are reported as [`credsign_core::ErrorKind::FieldMissing`]
/// naming the first one in `Id`, `Secret`, `Expiration` order. Fields that
/// are present but not strings are all listed in a single
/// [`credsign_core::ErrorKind::MalformedResponse`].
pub fn parse_session_value(value: &Value) -> Result<SessionAccessKey> {
    let paths = [PATH_ACCESS_KEY_ID, PATH_ACCESS_KEY_SECRET, PATH_EXPIRATION];

    let mut fields = Vec::with_capacity(paths.len());
    for path in paths {
        match lookup(value, path) {
            None | Some(Value::Null) => {
                let mut err = Error::field_missing(format!("missing field {path} in response"));
                if let Some(detail) = service_error(value) {
                    err = err.with_context(format!("service returned {detail}"));
                }
                return Err(err);
            }
            Some(v) => fields.push((path, v)),
        }
    }

    let unusable: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| !v.is_string())
        .map(|(path, _)| *path)
        .collect();
    if !unusable.is_empty() {
        return Err(Error::malformed_response(format!(
            "fields are not strings: {}",
            unusable.join(", ")
        )));
    }

    let text = |idx: usize| fields[idx].1.as_str().unwrap_or_default();
    let expiration = parse_iso8601(text(2)).map_err(|e| {
        Error::malformed_response(format!("invalid {PATH_EXPIRATION}: {}", text(2))).with_source(e)
    })?;

    Ok(SessionAccessKey {
        access_key_id: text(0).to_string(),
        access_key_secret: text(1).to_string(),
        expiration,
    })
}
