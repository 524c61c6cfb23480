//! # blogfront
//!
//! Client for the blog platform's REST backend: the token-bearing API
//! client, the session store that persists the credential, the auth context
//! that owns the signed-in user snapshot, and the view models the pages
//! (feed, post detail, dashboard, categories, profile) are built on.
//!
//! The backend owns every business rule. This crate only carries requests
//! out and keeps the local state that follows from the responses.

pub mod config;
pub mod net;
pub mod session;
pub mod state;
pub mod util;

pub use config::ClientConfig;
pub use net::api::{ApiClient, BlogApi};
pub use net::error::ApiError;
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use state::auth::{AuthBackend, AuthContext, AuthState};
