//! Canonical signer for the STS RPC signature with `SHA256withRSA`.
//!
//! - [Request signatures](https://www.alibabacloud.com/help/en/sdk/product-overview/rpc-mechanism#sectiondiv-y9b-x9s-wvp)

use std::collections::BTreeMap;

use credsign_core::hash::{base64_decode, base64_encode};
use credsign_core::{Error, Result};
use http::Method;
use log::debug;
use percent_encoding::utf8_percent_encode;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;

use crate::constants::{PARAM_SIGNATURE, STS_QUERY_ENCODE_SET};

/// Result of signing a parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedString {
    /// The exact bytes that were signed.
    pub string_to_sign: String,
    /// Base64 encoded PKCS#1 v1.5 signature over the SHA-256 digest.
    pub signature: String,
}

/// Percent encode `s` leaving only `A-Z a-z 0-9 - _ . ~` untouched.
///
/// Space becomes `%20`, never `+`.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, &STS_QUERY_ENCODE_SET).to_string()
}

/// Build `k1=v1&k2=v2` with percent encoded names and values, sorted by name.
///
/// A `Signature` entry is skipped: it is never part of what gets signed.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    let mut s = String::with_capacity(256);
    for (k, v) in params.iter().filter(|(k, _)| k.as_str() != PARAM_SIGNATURE) {
        if !s.is_empty() {
            s.push('&');
        }
        s.push_str(&percent_encode(k));
        s.push('=');
        s.push_str(&percent_encode(v));
    }
    s
}

/// Build `METHOD&%2F&<percent encoded canonical query>`.
pub fn string_to_sign(method: &Method, params: &BTreeMap<String, String>) -> String {
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode("/"),
        percent_encode(&canonical_query(params))
    )
}

/// Parse RSA private key material.
///
/// Accepted forms:
///
/// - PEM with `BEGIN RSA PRIVATE KEY` (PKCS#1)
/// - PEM with `BEGIN PRIVATE KEY` (PKCS#8)
/// - The base64 body of either one without PEM armour
pub fn parse_private_key(content: &str) -> Result<RsaPrivateKey> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::signing("private key is empty"));
    }

    if content.starts_with("-----BEGIN") {
        return RsaPrivateKey::from_pkcs1_pem(content)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(content))
            .map_err(|e| Error::signing("failed to parse pem private key").with_source(e));
    }

    let der = base64_decode(content)
        .map_err(|e| Error::signing("private key is neither pem nor base64").with_source(e))?;
    RsaPrivateKey::from_pkcs8_der(&der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
        .map_err(|e| Error::signing("failed to parse der private key").with_source(e))
}

/// Sign `content` with RSA PKCS#1 v1.5 over SHA-256 and base64 encode the result.
pub fn base64_sha256_with_rsa(private_key: &str, content: &str) -> Result<String> {
    let key = parse_private_key(private_key)?;
    let signing_key = SigningKey::<Sha256>::new(key);
    let signature = signing_key
        .try_sign(content.as_bytes())
        .map_err(|e| Error::signing("failed to sign string").with_source(e))?;

    Ok(base64_encode(&signature.to_bytes()))
}

/// Sign the parameter set for `method`.
///
/// Deterministic: the same key, method and parameters always produce the same
/// output, so nonce and timestamp must already be part of `params`.
pub fn sign(
    method: &Method,
    params: &BTreeMap<String, String>,
    private_key: &str,
) -> Result<SignedString> {
    let string_to_sign = string_to_sign(method, params);
    debug!("calculated string to sign: {string_to_sign}");

    let signature = base64_sha256_with_rsa(private_key, &string_to_sign)?;
    Ok(SignedString {
        string_to_sign,
        signature,
    })
}
