//! Client route guard.
//!
//! Every mount of a protected view goes through [`RouteGuard::mount`]:
//!
//! ```text
//! Loading --(no stored token)----------------------------> Redirect(NoSession)
//! Loading --(server confirms required role)--------------> Authorized(identity)
//! Loading --(401 / network error / timeout / wrong role)--> Redirect(reason)
//! ```
//!
//! Each mount reaches exactly one terminal state. The identity check is issued
//! at most once per mount, is never retried, and its result is discarded if
//! the view unmounts first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use evendiona_core::identity::Identity;
use evendiona_core::roles::Role;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::{ClientConfig, DEFAULT_VERIFY_TIMEOUT};
use crate::error::ClientError;
use crate::session::SessionStore;

/// Where unauthenticated visitors are sent.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// The server-side identity check the guard relies on.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn fetch_identity(&self, token: &str) -> Result<Identity, ClientError>;
}

#[async_trait]
impl IdentityVerifier for ApiClient {
    async fn fetch_identity(&self, token: &str) -> Result<Identity, ClientError> {
        self.me(token).await
    }
}

/// Why the guard sent the visitor to the login view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// No token in the session store; no request was made.
    NoSession,
    /// The server rejected the token.
    Rejected(String),
    /// The token is valid but carries a different role.
    WrongRole(Role),
    /// The identity check failed for a transport or server reason.
    Unreachable(String),
    /// The identity check did not answer within the verify timeout.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized(Identity),
    Redirect(RedirectReason),
}

impl GuardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, GuardState::Loading)
    }
}

/// Decides whether a protected view may render.
#[derive(Clone)]
pub struct RouteGuard {
    verifier: Arc<dyn IdentityVerifier>,
    required_role: Role,
    timeout: Duration,
    login_path: String,
}

impl RouteGuard {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, required_role: Role) -> Self {
        Self {
            verifier,
            required_role,
            timeout: DEFAULT_VERIFY_TIMEOUT,
            login_path: ADMIN_LOGIN_PATH.to_string(),
        }
    }

    /// Build a guard whose identity check is bounded by
    /// `config.verify_timeout`.
    pub fn from_config(
        verifier: Arc<dyn IdentityVerifier>,
        required_role: Role,
        config: &ClientConfig,
    ) -> Self {
        Self::new(verifier, required_role).with_timeout(config.verify_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Evaluate the guard once and return its terminal state.
    pub async fn check(&self, session: &SessionStore) -> GuardState {
        match session.token() {
            None => {
                tracing::debug!("No stored session, redirecting to login");
                GuardState::Redirect(RedirectReason::NoSession)
            }
            Some(token) => self.verify(&token).await,
        }
    }

    /// Mount the guard for one render of a protected view.
    ///
    /// Returns immediately in `Loading` (or already in `Redirect` when no
    /// token is stored). The identity check runs on a spawned task, so this
    /// must be called inside a Tokio runtime.
    pub fn mount(&self, session: &SessionStore) -> GuardMount {
        let cancel = CancellationToken::new();

        let Some(token) = session.token() else {
            tracing::debug!("No stored session, redirecting to login");
            let (_tx, rx) = watch::channel(GuardState::Redirect(RedirectReason::NoSession));
            return GuardMount {
                state: rx,
                cancel,
                task: None,
            };
        };

        let (tx, rx) = watch::channel(GuardState::Loading);
        let guard = self.clone();
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_cancel.cancelled() => {
                    tracing::debug!("Guard unmounted before identity check completed");
                }
                outcome = guard.verify(&token) => {
                    if !task_cancel.is_cancelled() {
                        tx.send_replace(outcome);
                    }
                }
            }
        });

        GuardMount {
            state: rx,
            cancel,
            task: Some(task),
        }
    }

    async fn verify(&self, token: &str) -> GuardState {
        let outcome = tokio::time::timeout(self.timeout, self.verifier.fetch_identity(token)).await;

        match outcome {
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Identity check timed out");
                GuardState::Redirect(RedirectReason::TimedOut)
            }
            Ok(Ok(identity)) if identity.role == self.required_role => {
                tracing::debug!(username = %identity.username, "Session verified");
                GuardState::Authorized(identity)
            }
            Ok(Ok(identity)) => {
                tracing::debug!(
                    username = %identity.username,
                    role = %identity.role,
                    required = %self.required_role,
                    "Session has the wrong role"
                );
                GuardState::Redirect(RedirectReason::WrongRole(identity.role))
            }
            Ok(Err(ClientError::Unauthenticated(msg))) | Ok(Err(ClientError::Forbidden(msg))) => {
                tracing::debug!(error = %msg, "Session rejected by server");
                GuardState::Redirect(RedirectReason::Rejected(msg))
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Identity check failed");
                GuardState::Redirect(RedirectReason::Unreachable(e.to_string()))
            }
        }
    }
}

/// A live guard evaluation tied to one mounted view.
///
/// Dropping it (or calling [`unmount`](Self::unmount)) cancels the pending
/// identity check; its result is never published afterwards.
pub struct GuardMount {
    state: watch::Receiver<GuardState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl GuardMount {
    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// A receiver the view layer can poll or await for re-rendering.
    pub fn watch(&self) -> watch::Receiver<GuardState> {
        self.state.clone()
    }

    /// Wait for the terminal state.
    ///
    /// Returns `Loading` only if the check task went away without publishing,
    /// which happens when the mount was cancelled.
    pub async fn settled(&mut self) -> GuardState {
        loop {
            let current = self.state.borrow_and_update().clone();
            if !current.is_loading() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }

    pub fn unmount(self) {
        // Drop does the work.
    }
}

impl Drop for GuardMount {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
