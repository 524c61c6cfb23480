//! View models for each screen of the blog client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the signed-in identity. The remaining modules hold the state a
//! single screen renders from and the actions it can take; they talk to the
//! backend through [`crate::net::api::BlogApi`] and read identity from an
//! [`auth::AuthState`] snapshot passed in by the caller.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod feed;
pub mod load;
pub mod post;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_support;
