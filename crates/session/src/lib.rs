//! Authenticated session state.
//!
//! The store is an explicitly constructed object, built once at startup and
//! passed to whoever needs it; navigation is an injected collaborator rather
//! than something the store reaches out to ambiently. The session holds an
//! identity exactly when it is authenticated, by construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use marketmate_api_client::ApiClient;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Views the shell can be sent to as a side effect of session changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Campaigns,
}

/// Outward navigation collaborator. The session store signals where the
/// shell should go; rendering the move is the shell's problem.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Who is logged in, and since when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub authenticated_at: DateTime<Utc>,
}

/// Normalized authentication failure. `message` is the server-supplied text
/// when one existed, otherwise the fixed per-operation default.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

/// Session store backed by the remote auth endpoints.
pub struct SessionStore {
    client: ApiClient,
    navigator: Arc<dyn Navigator>,
    identity: Mutex<Option<Identity>>,
}

impl SessionStore {
    /// Create an unauthenticated store.
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            client,
            navigator,
            identity: Mutex::new(None),
        }
    }

    /// Authenticate against `POST /login`. On success the session becomes
    /// authenticated and the shell is sent to the campaigns view. On failure
    /// the session stays (or becomes) unauthenticated and the normalized
    /// message is returned; nothing ever panics on a network error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.client.login(email, password).await {
            Ok(()) => {
                self.authenticate(email);
                info!(email, "login succeeded");
                self.navigator.navigate(Route::Campaigns);
                Ok(())
            }
            Err(err) => {
                warn!(email, error = %err, "login failed");
                *self.identity.lock() = None;
                Err(AuthError {
                    message: err.user_message("Login failed"),
                })
            }
        }
    }

    /// Register against `POST /signup`; identical contract to `login`.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.client.signup(email, password).await {
            Ok(()) => {
                self.authenticate(email);
                info!(email, "signup succeeded");
                self.navigator.navigate(Route::Campaigns);
                Ok(())
            }
            Err(err) => {
                warn!(email, error = %err, "signup failed");
                *self.identity.lock() = None;
                Err(AuthError {
                    message: err.user_message("Signup failed"),
                })
            }
        }
    }

    /// Clear the session unconditionally and send the shell back to the
    /// login view. No remote call is involved.
    pub fn logout(&self) {
        *self.identity.lock() = None;
        info!("logged out");
        self.navigator.navigate(Route::Login);
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.lock().is_some()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.lock().clone()
    }

    fn authenticate(&self, email: &str) {
        *self.identity.lock() = Some(Identity {
            email: email.to_string(),
            authenticated_at: Utc::now(),
        });
    }
}
