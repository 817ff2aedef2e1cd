use credsign_core::time::DateTime;
use credsign_core::utils::Redact;
use credsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Type name reported by [`crate::RsaKeyPairCredential::credential_type`].
pub const CREDENTIAL_TYPE: &str = "rsa_key_pair";

/// Session credential issued by `GenerateSessionAccessKey`.
///
/// A session credential is only ever created by a successful refresh and is
/// replaced as a whole by the next one.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    /// Access key id of the session.
    pub access_key_id: String,
    /// Access key secret of the session.
    pub access_key_secret: String,
    /// Absolute expiration reported by the service.
    pub expiration: DateTime,
}

impl SessionCredential {
    /// Session credentials never carry a security token.
    pub fn security_token(&self) -> &str {
        ""
    }
}

impl Debug for SessionCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl SigningCredential for SessionCredential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.access_key_secret.is_empty()
    }
}

/// Snapshot of every attribute a caller can read from the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Access key secret.
    pub access_key_secret: String,
    /// Always empty for this credential kind.
    pub security_token: String,
    /// Always empty for this credential kind.
    pub bearer_token: String,
    /// Always [`CREDENTIAL_TYPE`].
    pub r#type: String,
}

impl From<&SessionCredential> for Credential {
    fn from(cred: &SessionCredential) -> Self {
        Credential {
            access_key_id: cred.access_key_id.clone(),
            access_key_secret: cred.access_key_secret.clone(),
            security_token: cred.security_token().to_string(),
            bearer_token: String::new(),
            r#type: CREDENTIAL_TYPE.to_string(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .field("bearer_token", &Redact::from(&self.bearer_token))
            .field("type", &self.r#type)
            .finish()
    }
}
