//! The signed-in author's own posts with summary totals.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use crate::net::api::BlogApi;
use crate::net::error::ApiError;
use crate::net::types::{BlogPost, PostQuery};
use crate::state::auth::AuthState;
use crate::state::load::LoadState;
use crate::util::guard::{self, Confirm, Gate, Outcome};

/// Totals across the loaded posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub posts: usize,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub posts: LoadState<Vec<BlogPost>>,
    /// Message from the last failed delete.
    pub error: Option<String>,
}

impl DashboardView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the author's posts, drafts included. Signed-out callers get
    /// [`Gate::SignInRequired`] and nothing is fetched.
    pub async fn load<'a>(&mut self, auth: &'a AuthState, api: &dyn BlogApi) -> Gate<'a> {
        let gate = guard::require_auth(auth);
        if let Gate::Allowed(user) = gate {
            self.posts = LoadState::Loading;
            self.posts = match api.my_posts(&PostQuery::default()).await {
                Ok(page) => LoadState::from_items(Ok(page.results)),
                Err(error) => {
                    tracing::warn!(%error, user_id = user.id, "failed to load own posts");
                    LoadState::Failed(error.message())
                }
            };
        }
        gate
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        let posts = self.posts.items();
        DashboardStats {
            posts: posts.len(),
            likes: posts.iter().map(|post| post.likes_count).sum(),
            comments: posts.iter().map(|post| post.comments_count).sum(),
        }
    }

    /// Delete one of the listed posts after confirmation and drop it locally.
    ///
    /// # Errors
    ///
    /// Returns the backend error, also kept in `error`.
    pub async fn delete_post(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        confirm: &dyn Confirm,
        slug: &str,
    ) -> Result<Outcome<()>, ApiError> {
        if let Some(outcome) = guard::check_destructive(auth, confirm, guard::DELETE_POST_PROMPT) {
            return Ok(outcome);
        }
        if let Err(error) = api.delete_post(slug).await {
            self.error = Some(error.message());
            return Err(error);
        }
        self.error = None;
        if let Some(posts) = self.posts.ready_mut() {
            posts.retain(|post| post.slug != slug);
            if posts.is_empty() {
                self.posts = LoadState::Empty;
            }
        }
        Ok(Outcome::Done(()))
    }
}
