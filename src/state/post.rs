//! Post detail: the post itself, its like toggle and its comment thread.
//!
//! DESIGN
//! ======
//! `liked` and `likes_count` are seeded from the fetched post and afterwards
//! only ever taken from a [`LikeResponse`]. Nothing is changed before the
//! backend answers, so there is nothing to roll back on failure.
//!
//! ERROR HANDLING
//! ==============
//! A missing post is a page-level failure held in [`PostView::post`]. A
//! comment list that fails to load is logged and shown as empty. Mutations
//! return the backend error to the caller and leave local state alone.

#[cfg(test)]
#[path = "post_test.rs"]
mod post_test;

use crate::net::api::BlogApi;
use crate::net::error::ApiError;
use crate::net::types::{BlogPost, Comment, CommentCreate, LikeResponse};
use crate::state::auth::AuthState;
use crate::state::load::LoadState;
use crate::util::guard::{self, Confirm, Outcome};

#[derive(Debug, Clone)]
pub struct PostView {
    slug: String,
    pub post: LoadState<BlogPost>,
    pub liked: bool,
    pub likes_count: u64,
    pub comments: Vec<Comment>,
    /// Message from the last failed comment submission.
    pub comment_error: Option<String>,
}

impl PostView {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            post: LoadState::Loading,
            liked: false,
            likes_count: 0,
            comments: Vec::new(),
            comment_error: None,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// True when the signed-in user wrote the loaded post.
    #[must_use]
    pub fn can_edit(&self, auth: &AuthState) -> bool {
        match (auth.user(), self.post.ready()) {
            (Some(user), Some(post)) => user.id == post.author.id,
            _ => false,
        }
    }

    pub async fn load(&mut self, api: &dyn BlogApi) {
        self.post = LoadState::Loading;
        self.post = LoadState::from_result(api.get_post(&self.slug).await);
        if let Some(post) = self.post.ready() {
            self.liked = post.is_liked.unwrap_or(false);
            self.likes_count = post.likes_count;
        }
    }

    pub async fn load_comments(&mut self, api: &dyn BlogApi) {
        self.comments = match api.list_comments(&self.slug).await {
            Ok(page) => page.results,
            Err(error) => {
                tracing::warn!(%error, slug = %self.slug, "failed to load comments");
                Vec::new()
            }
        };
    }

    /// Toggle the like. Signed-out users get [`Outcome::SignInRequired`]
    /// and no request is sent.
    ///
    /// # Errors
    ///
    /// Returns the backend error; `liked` and `likes_count` keep their values.
    pub async fn like(&mut self, auth: &AuthState, api: &dyn BlogApi) -> Result<Outcome<LikeResponse>, ApiError> {
        if let Some(outcome) = guard::check_action(auth) {
            return Ok(outcome);
        }
        let response = api.toggle_like(&self.slug).await?;
        self.liked = response.liked;
        self.likes_count = response.likes_count;
        Ok(Outcome::Done(response))
    }

    /// Post a comment or, with `parent` set, a reply. The created comment is
    /// appended to the list.
    ///
    /// # Errors
    ///
    /// Returns the backend error, also kept in `comment_error`.
    pub async fn add_comment(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        comment: &CommentCreate,
    ) -> Result<Outcome<Comment>, ApiError> {
        if let Some(outcome) = guard::check_action(auth) {
            return Ok(outcome);
        }
        self.comment_error = None;
        match api.create_comment(&self.slug, comment).await {
            Ok(created) => {
                self.comments.push(created.clone());
                Ok(Outcome::Done(created))
            }
            Err(error) => {
                self.comment_error = Some(error.message());
                Err(error)
            }
        }
    }

    /// Delete a comment after confirmation and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the comment stays listed.
    pub async fn remove_comment(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        confirm: &dyn Confirm,
        id: i64,
    ) -> Result<Outcome<()>, ApiError> {
        if let Some(outcome) = guard::check_destructive(auth, confirm, guard::DELETE_COMMENT_PROMPT) {
            return Ok(outcome);
        }
        api.delete_comment(id).await?;
        drop_comment(&mut self.comments, id);
        Ok(Outcome::Done(()))
    }

    /// Delete the post itself after confirmation.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn delete_post(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        confirm: &dyn Confirm,
    ) -> Result<Outcome<()>, ApiError> {
        if let Some(outcome) = guard::check_destructive(auth, confirm, guard::DELETE_POST_PROMPT) {
            return Ok(outcome);
        }
        api.delete_post(&self.slug).await?;
        tracing::info!(slug = %self.slug, "post deleted");
        self.post = LoadState::Empty;
        Ok(Outcome::Done(()))
    }
}

fn drop_comment(comments: &mut Vec<Comment>, id: i64) {
    comments.retain(|comment| comment.id != id);
    for comment in comments {
        drop_comment(&mut comment.replies, id);
    }
}
