//! REST client for the blog backend.
//!
//! DESIGN
//! ======
//! [`ApiClient`] is the only place that talks HTTP. Every request carries
//! `Authorization: <scheme> <token>` when the session store holds a
//! credential; requests that need identity are still sent without one and the
//! backend decides. A 401 never clears the session from here: only the auth
//! context's initialization invalidates a stored credential.
//!
//! Mutations are sent once. There is no retry layer.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    AuthResponse, BlogPost, BlogPostCreate, Category, CategoryCreate, Comment, CommentCreate, CommentEnvelope,
    LikeResponse, ListBody, LoginData, Paginated, PostEnvelope, PostQuery, ProfileResponse, ProfileUpdate,
    RegisterData, Upload, User,
};
use crate::config::ClientConfig;
use crate::session::SessionStore;

enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

impl Payload {
    fn json(body: &impl Serialize) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| ApiError::Unexpected { status: None, message: format!("request encode failed: {e}") })
    }

    /// Multipart when a file is attached, JSON otherwise.
    fn form_or_json(
        body: &impl Serialize,
        fields: Vec<(&'static str, String)>,
        file: Option<(&'static str, &Upload)>,
    ) -> Result<Self, ApiError> {
        let Some((file_field, upload)) = file else {
            return Self::json(body);
        };
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|e| ApiError::Unexpected { status: None, message: format!("invalid upload type: {e}") })?;
        Ok(Self::Multipart(form.part(file_field, part)))
    }
}

/// HTTP client bound to one backend and one session store.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_scheme: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::Unexpected { status: None, message: format!("HTTP client build failed: {e}") })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            auth_scheme: config.auth_scheme.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Whether a credential is stored. Says nothing about its validity.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.session.is_present()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorization(&self) -> Option<String> {
        self.session
            .get()
            .map(|token| format!("{} {}", self.auth_scheme, token))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Payload,
    ) -> Result<String, ApiError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(value) = self.authorization() {
            request = request.header(AUTHORIZATION, value);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };

        tracing::debug!(%method, path, "api request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        if !(200..300).contains(&status) {
            let error = ApiError::from_response(status, &text);
            tracing::debug!(%method, path, status, code = error.error_code(), "api request failed");
            return Err(error);
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let text = self.execute(Method::GET, path, query, Payload::Empty).await?;
        decode(&text)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Paginated<T>, ApiError> {
        let body: ListBody<T> = self.get_json(path, query).await?;
        Ok(body.into_page())
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/login/`. Persists the returned credential before returning.
    ///
    /// # Errors
    ///
    /// Returns the normalized backend error; nothing is stored on failure.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError> {
        let text = self
            .execute(Method::POST, "/auth/login/", &[], Payload::json(data)?)
            .await?;
        self.store_credential(&text)
    }

    /// `POST /auth/register/`. The new account is signed in on success.
    ///
    /// # Errors
    ///
    /// Returns the normalized backend error; nothing is stored on failure.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        let text = self
            .execute(Method::POST, "/auth/register/", &[], Payload::json(data)?)
            .await?;
        self.store_credential(&text)
    }

    fn store_credential(&self, text: &str) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = decode(text)?;
        self.session.set(&response.token)?;
        Ok(response)
    }

    /// `POST /auth/logout/`. Does not touch the session store.
    ///
    /// # Errors
    ///
    /// Returns the normalized backend error.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.execute(Method::POST, "/auth/logout/", &[], Payload::Empty)
            .await
            .map(drop)
    }

    /// `GET /auth/profile/`.
    ///
    /// # Errors
    ///
    /// Returns the normalized backend error.
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get_json("/auth/profile/", &[]).await
    }

    /// `PATCH /auth/profile/`, multipart when a picture is attached.
    ///
    /// # Errors
    ///
    /// Returns the normalized backend error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        let picture = update.profile_picture.as_ref().map(|p| ("profile_picture", p));
        let payload = Payload::form_or_json(update, update.text_fields(), picture)?;
        let text = self
            .execute(Method::PATCH, "/auth/profile/", &[], payload)
            .await?;
        decode(&text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(ApiError::unexpected_shape)
}

// =============================================================================
// BLOG API
// =============================================================================

/// Post, comment, like and category operations the views depend on.
#[async_trait::async_trait]
pub trait BlogApi: Send + Sync {
    /// `GET /blog/posts/` with filters. Published posts only.
    async fn list_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError>;

    /// `GET /blog/posts/{slug}/`.
    async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError>;

    /// `POST /blog/posts/create/`.
    async fn create_post(&self, post: &BlogPostCreate) -> Result<BlogPost, ApiError>;

    /// `PUT /blog/posts/{slug}/update/`.
    async fn update_post(&self, slug: &str, post: &BlogPostCreate) -> Result<BlogPost, ApiError>;

    /// `DELETE /blog/posts/{slug}/delete/`.
    async fn delete_post(&self, slug: &str) -> Result<(), ApiError>;

    /// `POST /blog/posts/{slug}/like/`. The backend flips the like.
    async fn toggle_like(&self, slug: &str) -> Result<LikeResponse, ApiError>;

    /// `GET /blog/my-posts/`, drafts included.
    async fn my_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError>;

    /// `GET /blog/posts/{slug}/comments/`. Top-level comments with replies nested.
    async fn list_comments(&self, slug: &str) -> Result<Paginated<Comment>, ApiError>;

    /// `POST /blog/posts/{slug}/comments/`.
    async fn create_comment(&self, slug: &str, comment: &CommentCreate) -> Result<Comment, ApiError>;

    /// `PATCH /blog/comments/{id}/`.
    async fn update_comment(&self, id: i64, comment: &CommentCreate) -> Result<Comment, ApiError>;

    /// `DELETE /blog/comments/{id}/`.
    async fn delete_comment(&self, id: i64) -> Result<(), ApiError>;

    /// `GET /blog/categories/`.
    async fn list_categories(&self) -> Result<Paginated<Category>, ApiError>;

    /// `GET /blog/categories/{slug}/`.
    async fn get_category(&self, slug: &str) -> Result<Category, ApiError>;

    /// `POST /blog/categories/`.
    async fn create_category(&self, category: &CategoryCreate) -> Result<Category, ApiError>;

    /// `DELETE /blog/categories/{slug}/`.
    async fn delete_category(&self, slug: &str) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl BlogApi for ApiClient {
    async fn list_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        self.get_list("/blog/posts/", &query.to_pairs()).await
    }

    async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.get_json(&format!("/blog/posts/{slug}/"), &[]).await
    }

    async fn create_post(&self, post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        let image = post.image.as_ref().map(|i| ("image", i));
        let payload = Payload::form_or_json(post, post.text_fields(), image)?;
        let text = self
            .execute(Method::POST, "/blog/posts/create/", &[], payload)
            .await?;
        decode::<PostEnvelope>(&text).map(|env| env.blog_post)
    }

    async fn update_post(&self, slug: &str, post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        let image = post.image.as_ref().map(|i| ("image", i));
        let payload = Payload::form_or_json(post, post.text_fields(), image)?;
        let text = self
            .execute(Method::PUT, &format!("/blog/posts/{slug}/update/"), &[], payload)
            .await?;
        decode::<PostEnvelope>(&text).map(|env| env.blog_post)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/blog/posts/{slug}/delete/"), &[], Payload::Empty)
            .await
            .map(drop)
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeResponse, ApiError> {
        let text = self
            .execute(Method::POST, &format!("/blog/posts/{slug}/like/"), &[], Payload::Empty)
            .await?;
        decode(&text)
    }

    async fn my_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        self.get_list("/blog/my-posts/", &query.to_pairs()).await
    }

    async fn list_comments(&self, slug: &str) -> Result<Paginated<Comment>, ApiError> {
        self.get_list(&format!("/blog/posts/{slug}/comments/"), &[]).await
    }

    async fn create_comment(&self, slug: &str, comment: &CommentCreate) -> Result<Comment, ApiError> {
        let text = self
            .execute(Method::POST, &format!("/blog/posts/{slug}/comments/"), &[], Payload::json(comment)?)
            .await?;
        decode::<CommentEnvelope>(&text).map(|env| env.comment)
    }

    async fn update_comment(&self, id: i64, comment: &CommentCreate) -> Result<Comment, ApiError> {
        let text = self
            .execute(Method::PATCH, &format!("/blog/comments/{id}/"), &[], Payload::json(comment)?)
            .await?;
        decode::<CommentEnvelope>(&text).map(|env| env.comment)
    }

    async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/blog/comments/{id}/"), &[], Payload::Empty)
            .await
            .map(drop)
    }

    async fn list_categories(&self) -> Result<Paginated<Category>, ApiError> {
        self.get_list("/blog/categories/", &[]).await
    }

    async fn get_category(&self, slug: &str) -> Result<Category, ApiError> {
        self.get_json(&format!("/blog/categories/{slug}/"), &[]).await
    }

    async fn create_category(&self, category: &CategoryCreate) -> Result<Category, ApiError> {
        let text = self
            .execute(Method::POST, "/blog/categories/", &[], Payload::json(category)?)
            .await?;
        decode(&text)
    }

    async fn delete_category(&self, slug: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/blog/categories/{slug}/"), &[], Payload::Empty)
            .await
            .map(drop)
    }
}
