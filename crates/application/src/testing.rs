//! In-memory test doubles for the ports.
//!
//! Used by this crate's unit tests and by the workspace integration tests
//! to exercise the refresh protocol and the cart service without real
//! network or filesystem access.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bazaar_domain::{ApiRequest, ApiResponse, Cart, TokenPair};

use crate::ports::{
    ApiError, AuthEvents, CartRepository, CartStoreError, CredentialError, CredentialStore,
    HttpClient,
};

/// Transport double that replays queued responses and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct RecordingHttpClient {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingHttpClient {
    /// Creates a client that will answer with the given responses in
    /// order.
    #[must_use]
    pub fn with_responses(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues one more response.
    pub fn push_response(&self, response: Result<ApiResponse, ApiError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Returns the requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.responses
            .lock()
            .map_err(|_| ApiError::Setup("poisoned response queue".to_owned()))?
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Setup("no queued response".to_owned())))
    }
}

/// Credential store double holding tokens in memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tokens: Mutex<(Option<String>, Option<String>)>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tokens<T>(
        &self,
        f: impl FnOnce(&mut (Option<String>, Option<String>)) -> T,
    ) -> Result<T, CredentialError> {
        self.tokens
            .lock()
            .map(|mut guard| f(&mut guard))
            .map_err(|_| CredentialError::Serialization("poisoned token store".to_owned()))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialError> {
        self.with_tokens(|t| t.0.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>, CredentialError> {
        self.with_tokens(|t| t.1.clone())
    }

    async fn store_pair(&self, pair: &TokenPair) -> Result<(), CredentialError> {
        self.with_tokens(|t| *t = (Some(pair.access.clone()), Some(pair.refresh.clone())))
    }

    async fn store_access(&self, access: &str) -> Result<(), CredentialError> {
        self.with_tokens(|t| t.0 = Some(access.to_owned()))
    }

    async fn store_refresh(&self, refresh: &str) -> Result<(), CredentialError> {
        self.with_tokens(|t| t.1 = Some(refresh.to_owned()))
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        self.with_tokens(|t| *t = (None, None))
    }
}

/// Cart repository double with injectable save failures.
#[derive(Debug, Default)]
pub struct MemoryCartRepository {
    snapshot: Mutex<Option<Cart>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryCartRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with a snapshot.
    #[must_use]
    pub fn with_snapshot(cart: Cart) -> Self {
        Self {
            snapshot: Mutex::new(Some(cart)),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful and failed save attempts so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The latest persisted snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Cart> {
        self.snapshot.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn load(&self) -> Result<Cart, CartStoreError> {
        Ok(self
            .snapshot
            .lock()
            .map(|s| s.clone())
            .map_err(|_| CartStoreError::Serialization("poisoned snapshot".to_owned()))?
            .unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CartStoreError::Io(std::io::Error::other("disk full")));
        }
        if let Ok(mut snapshot) = self.snapshot.lock() {
            *snapshot = Some(cart.clone());
        }
        Ok(())
    }
}

/// Event sink double counting `session_expired` invocations.
#[derive(Debug, Default)]
pub struct CountingAuthEvents {
    fired: AtomicUsize,
}

impl CountingAuthEvents {
    /// Creates a sink with a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the session expired.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }
}

impl AuthEvents for CountingAuthEvents {
    fn session_expired(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}
