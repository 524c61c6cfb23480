//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and identity-aware views to coordinate sign-in
//! redirects and identity-dependent rendering.
//!
//! DESIGN
//! ======
//! [`AuthContext`] is the only writer of the [`AuthState`]. Readers either
//! poll [`AuthContext::state`] or hold a `watch::Receiver` from
//! [`AuthContext::subscribe`] and re-render on every transition. The state
//! starts as `Initializing`; views must not assume it is resolved on their
//! first render.
//!
//! A stored credential alone never means "signed in": the profile has to be
//! fetched first. The user snapshot is replaced wholesale on every update,
//! never merged field by field.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tokio::sync::watch;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{AuthResponse, LoginData, ProfileResponse, ProfileUpdate, RegisterData, User};
use crate::session::SessionStore;

/// Current authentication state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// The stored credential has not been checked yet.
    Initializing,
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    /// True iff a user snapshot is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Initializing | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Initializing)
    }
}

/// Backend calls the auth context needs. Implemented by [`ApiClient`].
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Where the credential lives. Login and register write it.
    fn session(&self) -> &dyn SessionStore;

    async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError>;

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn fetch_profile(&self) -> Result<User, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError>;
}

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    fn session(&self) -> &dyn SessionStore {
        ApiClient::session(self).as_ref()
    }

    async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError> {
        ApiClient::login(self, data).await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        ApiClient::register(self, data).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        ApiClient::logout(self).await
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get_profile().await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        ApiClient::update_profile(self, update).await
    }
}

/// Single-owner container for the [`AuthState`].
pub struct AuthContext<B> {
    backend: B,
    state: watch::Sender<AuthState>,
}

impl<B: AuthBackend> AuthContext<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(AuthState::Initializing);
        Self { backend, state }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    fn is_initializing(&self) -> bool {
        self.state.borrow().is_loading()
    }

    fn transition(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    /// Resolve the initial state. Only the first call does any work.
    ///
    /// With no stored credential this signs out without a network call. A
    /// stored credential the backend will not accept is cleared silently.
    pub async fn initialize(&self) -> AuthState {
        if !self.is_initializing() {
            return self.state();
        }

        let next = if self.backend.session().is_present() {
            match self.backend.fetch_profile().await {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "session restored");
                    AuthState::SignedIn(user)
                }
                Err(error) => {
                    tracing::warn!(%error, code = error.error_code(), "stored session rejected; clearing");
                    self.clear_session();
                    AuthState::SignedOut
                }
            }
        } else {
            AuthState::SignedOut
        };

        self.transition(next.clone());
        next
    }

    /// Sign in. On failure the state is untouched and the error propagates.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError> {
        let response = self.backend.login(data).await?;
        tracing::info!(user_id = response.user.id, "signed in");
        self.transition(AuthState::SignedIn(response.user.clone()));
        Ok(response)
    }

    /// Create an account. The backend issues a credential, so success also
    /// signs in.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        let response = self.backend.register(data).await?;
        tracing::info!(user_id = response.user.id, "registered");
        self.transition(AuthState::SignedIn(response.user.clone()));
        Ok(response)
    }

    /// Sign out locally no matter what the backend answers.
    pub async fn logout(&self) {
        if let Err(error) = self.backend.logout().await {
            tracing::warn!(%error, "logout request failed; signing out locally");
        }
        self.clear_session();
        self.transition(AuthState::SignedOut);
        tracing::info!("signed out");
    }

    /// Send a profile edit and adopt the backend's returned user as-is.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the snapshot is unchanged.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let response = self.backend.update_profile(update).await?;
        self.transition(AuthState::SignedIn(response.user.clone()));
        Ok(response.user)
    }

    /// Replace the snapshot with one obtained elsewhere. No network call.
    pub fn update_user(&self, user: User) {
        self.transition(AuthState::SignedIn(user));
    }

    fn clear_session(&self) {
        if let Err(error) = self.backend.session().clear() {
            tracing::warn!(%error, "failed to clear stored session");
        }
    }
}
