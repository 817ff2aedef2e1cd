use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait implemented by every credential a provider hands out.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable.
    ///
    /// This only checks the shape of the credential. Freshness is tracked by
    /// the cache that owns the credential.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used by caches to load a fresh credential.
///
/// A provider performs exactly one attempt per call: it never retries and it
/// never caches. Returning `Ok(None)` means the provider is not configured to
/// produce a credential at all.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load a credential using the collaborators in `ctx`.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
