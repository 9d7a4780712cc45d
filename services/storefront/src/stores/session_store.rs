//! services/storefront/src/stores/session_store.rs
//!
//! Holds at most one authenticated session. The bearer token is persisted so
//! the session can be revalidated on the next start.

use std::sync::Arc;

use storefront_core::domain::{LoginCredentials, Notice, Session, User};
use storefront_core::ports::{AuthService, KeyValueStore, NotificationSink, PortResult};
use tracing::{error, info, warn};

use crate::stores::persisted::{CART_KEY, TOKEN_KEY};

pub struct SessionStore {
    session: Option<Session>,
    auth: Arc<dyn AuthService>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn NotificationSink>,
    token_ttl_mins: Option<u32>,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthService>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            session: None,
            auth,
            storage,
            notifier,
            token_ttl_mins: None,
        }
    }

    /// Token lifetime requested on login when the credentials do not name one.
    pub fn with_token_ttl(mut self, minutes: Option<u32>) -> Self {
        self.token_ttl_mins = minutes;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Startup reconciliation: revalidates a persisted token with one
    /// round trip. Any failure discards the token and leaves the store anonymous.
    pub async fn restore(&mut self) {
        let token = match self.storage.get(TOKEN_KEY).await {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return,
            Err(e) => {
                warn!("Could not read persisted token: {}", e);
                return;
            }
        };

        match self.auth.current_user(&token).await {
            Ok(user) => {
                info!("Restored session for user {}.", user.id);
                self.session = Some(Session { user, token });
            }
            Err(e) => {
                warn!("Persisted token rejected, continuing anonymously: {}", e);
                self.session = None;
                if let Err(e) = self.storage.remove(TOKEN_KEY).await {
                    warn!("Failed to remove rejected token: {}", e);
                }
            }
        }
    }

    /// Logs in and persists the token. Failure is returned so the caller can
    /// keep its login form open.
    pub async fn login(&mut self, credentials: LoginCredentials) -> PortResult<&Session> {
        let mut credentials = credentials;
        if credentials.expires_in_mins.is_none() {
            credentials.expires_in_mins = self.token_ttl_mins;
        }

        let (user, token) = match self.auth.login(&credentials).await {
            Ok(result) => result,
            Err(e) => {
                error!("Login failed for '{}': {}", credentials.username, e);
                self.notifier.notify(Notice::destructive(
                    "Login failed",
                    "Invalid username or password",
                ));
                return Err(e);
            }
        };

        if let Err(e) = self.storage.set(TOKEN_KEY, &token).await {
            warn!("Failed to persist token: {}", e);
        }

        info!("User {} logged in.", user.id);
        self.notifier.notify(Notice::new(
            "Welcome back!",
            format!("Hello {}!", user.first_name),
        ));

        Ok(self.session.insert(Session { user, token }))
    }

    /// Ends the session and erases the persisted token and cart.
    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("User {} logged out.", session.user.id);
        }

        for key in [TOKEN_KEY, CART_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!("Failed to remove '{}' on logout: {}", key, e);
            }
        }

        self.notifier.notify(Notice::new(
            "Logged out",
            "You have been successfully logged out",
        ));
    }
}
