//! Explicit login session shared by the API client and the views.
//!
//! The session holds at most one bearer credential. Views observe it through
//! [`Session::subscribe`]; a `401` from the backend clears it via
//! [`Session::invalidate`], which every subscriber sees as a change to `None`.

use std::fmt;

use tokio::sync::watch;

/// Bearer token issued by `/auth/login` or `/auth/signup`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

pub struct Session {
    state: watch::Sender<Option<Credential>>,
}

impl Session {
    /// A session with no credential.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        let session = Self::new();
        session.set_credential(credential);
        session
    }

    pub fn set_credential(&self, credential: Credential) {
        self.state.send_replace(Some(credential));
        tracing::debug!("session credential set");
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Drops the credential. Returns `true` if one was held.
    pub fn invalidate(&self) -> bool {
        let previous = self.state.send_replace(None);
        if previous.is_some() {
            tracing::info!("session invalidated; log in again to continue");
        }
        previous.is_some()
    }

    /// Watches the credential; a change to `None` is the invalidation event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.state.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
