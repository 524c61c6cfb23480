//! Wire schema for the blog backend.
//!
//! Every response body is decoded into one of these types; a body that does
//! not fit its schema is rejected rather than partially trusted.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::path::Path;

use serde::{Deserialize, Serialize};

// =============================================================================
// USERS & AUTH
// =============================================================================

/// Profile snapshot of a user. The backend holds the authoritative copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Full name when one is set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_owned() }
    }
}

/// Body returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub message: String,
}

/// Body returned by a profile update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Partial profile edit. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Sent as a multipart file part; forces a multipart request.
    #[serde(skip)]
    pub profile_picture: Option<Upload>,
}

impl ProfileUpdate {
    pub(crate) fn text_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("first_name", self.first_name.as_ref()),
            ("last_name", self.last_name.as_ref()),
            ("bio", self.bio.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v.clone())))
        .collect()
    }
}

// =============================================================================
// UPLOADS
// =============================================================================

/// Binary file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Read `path` into memory, guessing the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self { mime: guess_mime(&file_name).to_owned(), file_name, bytes })
    }
}

pub(crate) fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: String,
}

// =============================================================================
// POSTS
// =============================================================================

/// A blog post. `content` is only present on detail responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: User,
    pub category: Category,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating or replacing a post.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostCreate {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Category id.
    pub category: i64,
    pub is_published: bool,
    #[serde(skip)]
    pub image: Option<Upload>,
}

impl BlogPostCreate {
    pub(crate) fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("content", self.content.clone()),
            ("category", self.category.to_string()),
            ("is_published", self.is_published.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub message: String,
    pub liked: bool,
    pub likes_count: u64,
}

/// Listing filters. Empty strings are treated like `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Author username.
    pub author: Option<String>,
    /// Backend ordering field, e.g. `-created_at`.
    pub ordering: Option<String>,
}

impl PostQuery {
    /// Query-string pairs in a stable order, skipping unset filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        let text = [
            ("search", &self.search),
            ("category", &self.category),
            ("author", &self.author),
            ("ordering", &self.ordering),
        ];
        for (name, value) in text {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((name, value.to_owned()));
            }
        }
        pairs
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

/// A comment with its nested replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user: User,
    pub blog_post: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub replies: Vec<Comment>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentCreate {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Paginated list envelope, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Single page holding every item.
    #[must_use]
    pub fn from_items(results: Vec<T>) -> Self {
        Self { count: results.len() as u64, next: None, previous: None, results }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Some list endpoints answer with a bare array when pagination is off.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Page(Paginated<T>),
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub(crate) fn into_page(self) -> Paginated<T> {
        match self {
            Self::Page(page) => page,
            Self::Bare(items) => Paginated::from_items(items),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostEnvelope {
    pub blog_post: BlogPost,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentEnvelope {
    pub comment: Comment,
}
