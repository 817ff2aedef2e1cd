use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use credsign_core::time::format_iso8601;
use credsign_core::utils::Redact;
use credsign_core::{Context, Error, ProvideCredential, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};

use crate::expiration::{ExpirationTracker, RefreshState};
use crate::SessionCredential;

/// A committed credential together with the state of the refresh that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    /// The session credential.
    pub credential: SessionCredential,
    /// When it was fetched and how long it's valid for.
    pub state: RefreshState,
}

type Provider = Arc<dyn ProvideCredential<Credential = SessionCredential>>;
type Slot = Arc<RwLock<Option<Arc<CachedCredential>>>>;
type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<CachedCredential>>>>;

/// CredentialCache holds the current session credential of one provider.
///
/// Reads of a fresh credential only take a shared lock. Stale reads join a
/// single in-flight refresh: at most one call to the provider runs at a
/// time and every waiter gets its outcome. A failed refresh leaves the
/// previous credential in place, but since that one is stale the next read
/// tries again.
///
/// Refreshes are handed to the context's spawner, so an attempt runs to
/// completion and commits even if all of its readers are cancelled. Without
/// a spawner the readers drive the attempt, and one left behind by all of
/// them is replaced by a new attempt on the next read.
#[derive(Clone)]
pub struct CredentialCache {
    inner: Arc<Inner>,
}

struct Inner {
    ctx: Context,
    provider: Provider,
    tracker: ExpirationTracker,

    current: Slot,
    inflight: Arc<Mutex<Option<Attempt>>>,
    next_attempt: AtomicU64,
}

struct Attempt {
    id: u64,
    future: RefreshFuture,
    detached: bool,
}

impl Attempt {
    /// Nothing but the in-flight slot holds this attempt anymore.
    fn is_abandoned(&self) -> bool {
        !self.detached && self.future.strong_count() == Some(1)
    }
}

/// A single refresh attempt.
///
/// Only a weak handle to the in-flight slot is kept, a pending attempt must
/// not keep its cache alive.
struct Refresh {
    id: u64,
    ctx: Context,
    provider: Provider,
    tracker: ExpirationTracker,
    current: Slot,
    inflight: Weak<Mutex<Option<Attempt>>>,
}

impl Debug for CredentialCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let current = self.peek();
        let refreshing = self.inner.inflight.lock().is_some();
        f.debug_struct("CredentialCache")
            .field("provider", &self.inner.provider)
            .field("tracker", &self.inner.tracker)
            .field("current", &current)
            .field("refreshing", &refreshing)
            .finish()
    }
}

impl CredentialCache {
    /// Create an empty cache in front of `provider`.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = SessionCredential>,
        tracker: ExpirationTracker,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                ctx,
                provider: Arc::new(provider),
                tracker,
                current: Arc::new(RwLock::new(None)),
                inflight: Arc::new(Mutex::new(None)),
                next_attempt: AtomicU64::new(0),
            }),
        }
    }

    /// Get a fresh credential, refreshing first if needed.
    pub async fn get(&self) -> Result<Arc<CachedCredential>> {
        if let Some(cached) = self.fresh() {
            return Ok(cached);
        }

        let refresh = {
            let mut inflight = self.inner.inflight.lock();
            // A refresh may have committed while we waited for the lock.
            if let Some(cached) = self.fresh() {
                return Ok(cached);
            }
            let running = inflight
                .as_ref()
                .filter(|attempt| !attempt.is_abandoned())
                .map(|attempt| attempt.future.clone());
            match running {
                Some(future) => future,
                None => {
                    if inflight.is_some() {
                        debug!("previous refresh was abandoned by its readers, starting over");
                    }
                    let attempt = self.start_refresh();
                    let future = attempt.future.clone();
                    *inflight = Some(attempt);
                    future
                }
            }
        };

        refresh.await
    }

    /// Get the current credential without checking staleness or refreshing.
    pub fn peek(&self) -> Option<Arc<CachedCredential>> {
        self.inner.current.read().clone()
    }

    /// Get the refresh state of the current credential.
    pub fn refresh_state(&self) -> Option<RefreshState> {
        self.inner.current.read().as_ref().map(|c| c.state)
    }

    fn fresh(&self) -> Option<Arc<CachedCredential>> {
        let current = self.inner.current.read();
        let cached = current.as_ref()?;
        if self
            .inner
            .tracker
            .is_stale(Some(&cached.state), self.inner.ctx.now())
        {
            return None;
        }
        Some(cached.clone())
    }

    /// Must be called with the in-flight slot locked.
    fn start_refresh(&self) -> Attempt {
        let id = self.inner.next_attempt.fetch_add(1, Ordering::Relaxed);
        let future = Refresh {
            id,
            ctx: self.inner.ctx.clone(),
            provider: self.inner.provider.clone(),
            tracker: self.inner.tracker,
            current: self.inner.current.clone(),
            inflight: Arc::downgrade(&self.inner.inflight),
        }
        .run()
        .boxed()
        .shared();

        let driver = future.clone();
        let detached = match self.inner.ctx.spawn(async move {
            let _ = driver.await;
        }) {
            Ok(()) => true,
            Err(err) => {
                debug!("refresh is driven by its readers: {}", err.message());
                false
            }
        };

        Attempt {
            id,
            future,
            detached,
        }
    }
}

impl Refresh {
    async fn run(self) -> Result<Arc<CachedCredential>> {
        debug!("credential is missing or stale, refreshing");

        let result = self.fetch().await;
        match &result {
            Ok(cached) => {
                *self.current.write() = Some(cached.clone());
                debug!(
                    "committed credential {} valid for {}s",
                    Redact::from(&cached.credential.access_key_id),
                    cached.state.validity_seconds
                );
            }
            Err(err) if err.is_response_error() => warn!(
                "refresh credential failed, service response rejected: {}",
                err.message()
            ),
            Err(err) => warn!("refresh credential failed: {} ({})", err, err.kind()),
        }

        if let Some(inflight) = self.inflight.upgrade() {
            let mut inflight = inflight.lock();
            if inflight.as_ref().is_some_and(|a| a.id == self.id) {
                *inflight = None;
            }
        }
        result
    }

    async fn fetch(&self) -> Result<Arc<CachedCredential>> {
        let credential = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::config_invalid("credential provider returned no credential"))?;

        let state = self
            .tracker
            .refresh_state(self.ctx.now(), credential.expiration);
        if state.validity_seconds < 0 {
            warn!(
                "credential already expired at {}, it will be refreshed on next read",
                format_iso8601(credential.expiration)
            );
        }

        Ok(Arc::new(CachedCredential { credential, state }))
    }
}
