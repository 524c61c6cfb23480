//! Sign-in and confirmation gates for view actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views apply identical behavior before any call that needs identity or
//! destroys data: an unauthenticated action redirects to sign-in without
//! touching the backend, and a delete waits for an explicit yes. Neither is a
//! security boundary; the backend still decides.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::net::types::User;
use crate::state::auth::AuthState;

pub const DELETE_POST_PROMPT: &str = "Are you sure you want to delete this post?";
pub const DELETE_COMMENT_PROMPT: &str = "Are you sure you want to delete this comment?";
pub const DELETE_CATEGORY_PROMPT: &str = "Are you sure you want to delete this category?";

/// Result of checking auth before rendering an identity-only page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate<'a> {
    Allowed(&'a User),
    /// Auth has not resolved yet; render a neutral placeholder.
    Pending,
    SignInRequired,
}

#[must_use]
pub fn require_auth(state: &AuthState) -> Gate<'_> {
    match state {
        AuthState::SignedIn(user) => Gate::Allowed(user),
        AuthState::Initializing => Gate::Pending,
        AuthState::SignedOut => Gate::SignInRequired,
    }
}

/// Redirect to sign-in only once auth has resolved with no user.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.is_loading() && state.user().is_none()
}

/// What a gated action ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// Not signed in; no request was sent.
    SignInRequired,
    /// The user declined the confirmation; no request was sent.
    Cancelled,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Pre-approved confirmation, e.g. from a `--yes` flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Gate for an identity-requiring mutation: `Some` means stop with that
/// outcome, `None` means go ahead with the request.
#[must_use]
pub fn check_action<T>(state: &AuthState) -> Option<Outcome<T>> {
    (!state.is_authenticated()).then_some(Outcome::SignInRequired)
}

/// Like [`check_action`], then asks for confirmation. Sign-in is checked
/// first so a signed-out user is never prompted.
#[must_use]
pub fn check_destructive<T>(state: &AuthState, confirm: &dyn Confirm, prompt: &str) -> Option<Outcome<T>> {
    if let Some(outcome) = check_action(state) {
        return Some(outcome);
    }
    (!confirm.confirm(prompt)).then_some(Outcome::Cancelled)
}
