//! Fixtures and a scripted [`BlogApi`] for view-model tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::net::api::BlogApi;
use crate::net::error::ApiError;
use crate::net::types::{
    BlogPost, BlogPostCreate, Category, CategoryCreate, Comment, CommentCreate, LikeResponse, Paginated, PostQuery,
    User,
};
use crate::state::auth::AuthState;

pub(crate) fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        bio: Some("writes".to_owned()),
        profile_picture: None,
        created_at: "2024-01-01T00:00:00Z".to_owned(),
        updated_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

pub(crate) fn signed_in() -> AuthState {
    AuthState::SignedIn(user(1, "a"))
}

pub(crate) fn category(id: i64, slug: &str) -> Category {
    Category {
        id,
        name: slug.to_uppercase(),
        slug: slug.to_owned(),
        description: String::new(),
        created_at: "2024-01-01T00:00:00Z".to_owned(),
        updated_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

pub(crate) fn post(id: i64, slug: &str) -> BlogPost {
    BlogPost {
        id,
        title: format!("Post {id}"),
        slug: slug.to_owned(),
        description: "desc".to_owned(),
        content: Some("body".to_owned()),
        image: None,
        author: user(1, "a"),
        category: category(1, "rust"),
        is_published: true,
        is_liked: None,
        likes_count: 0,
        comments_count: 0,
        created_at: "2024-03-05T10:00:00Z".to_owned(),
        updated_at: "2024-03-05T10:00:00Z".to_owned(),
    }
}

pub(crate) fn comment(id: i64, content: &str) -> Comment {
    Comment {
        id,
        user: user(1, "a"),
        blog_post: 1,
        content: content.to_owned(),
        parent: None,
        replies_count: 0,
        replies: Vec::new(),
        created_at: "2024-03-05T10:00:00Z".to_owned(),
        updated_at: "2024-03-05T10:00:00Z".to_owned(),
    }
}

pub(crate) fn server_error() -> ApiError {
    ApiError::from_response(500, "")
}

/// Scripted backend. Methods named in `failing` answer with a 500.
#[derive(Default)]
pub(crate) struct MockApi {
    pub posts: Vec<BlogPost>,
    /// Reported total; defaults to `posts.len()`.
    pub count: Option<u64>,
    pub comments: Vec<Comment>,
    pub categories: Vec<Category>,
    pub like: Option<LikeResponse>,
    pub failing: HashSet<&'static str>,
    pub calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<PostQuery>>,
}

impl MockApi {
    pub(crate) fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn queries(&self) -> Vec<PostQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, arg: impl std::fmt::Display) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("{method}:{arg}"));
        if self.failing.contains(method) {
            return Err(server_error());
        }
        Ok(())
    }

    fn post_page(&self, query: &PostQuery) -> Paginated<BlogPost> {
        self.queries.lock().unwrap().push(query.clone());
        Paginated {
            count: self.count.unwrap_or(self.posts.len() as u64),
            next: None,
            previous: None,
            results: self.posts.clone(),
        }
    }
}

#[async_trait::async_trait]
impl BlogApi for MockApi {
    async fn list_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        self.record("list_posts", query.page.unwrap_or(1))?;
        Ok(self.post_page(query))
    }

    async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.record("get_post", slug)?;
        self.posts
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::from_response(404, r#"{"detail": "Not found."}"#))
    }

    async fn create_post(&self, post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        self.record("create_post", &post.title)?;
        let mut created = self::post(99, "new-post");
        created.title.clone_from(&post.title);
        Ok(created)
    }

    async fn update_post(&self, slug: &str, post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        self.record("update_post", slug)?;
        let mut updated = self::post(1, slug);
        updated.title.clone_from(&post.title);
        Ok(updated)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), ApiError> {
        self.record("delete_post", slug)
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeResponse, ApiError> {
        self.record("toggle_like", slug)?;
        self.like.clone().ok_or_else(server_error)
    }

    async fn my_posts(&self, query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        self.record("my_posts", query.page.unwrap_or(1))?;
        Ok(self.post_page(query))
    }

    async fn list_comments(&self, slug: &str) -> Result<Paginated<Comment>, ApiError> {
        self.record("list_comments", slug)?;
        Ok(Paginated::from_items(self.comments.clone()))
    }

    async fn create_comment(&self, slug: &str, comment: &CommentCreate) -> Result<Comment, ApiError> {
        self.record("create_comment", slug)?;
        let mut created = self::comment(50, &comment.content);
        created.parent = comment.parent;
        Ok(created)
    }

    async fn update_comment(&self, id: i64, comment: &CommentCreate) -> Result<Comment, ApiError> {
        self.record("update_comment", id)?;
        Ok(self::comment(id, &comment.content))
    }

    async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.record("delete_comment", id)
    }

    async fn list_categories(&self) -> Result<Paginated<Category>, ApiError> {
        self.record("list_categories", "")?;
        Ok(Paginated::from_items(self.categories.clone()))
    }

    async fn get_category(&self, slug: &str) -> Result<Category, ApiError> {
        self.record("get_category", slug)?;
        self.categories
            .iter()
            .find(|category| category.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::from_response(404, ""))
    }

    async fn create_category(&self, category: &CategoryCreate) -> Result<Category, ApiError> {
        self.record("create_category", &category.name)?;
        let mut created = self::category(7, &category.name.to_lowercase());
        created.name.clone_from(&category.name);
        created.description.clone_from(&category.description);
        Ok(created)
    }

    async fn delete_category(&self, slug: &str) -> Result<(), ApiError> {
        self.record("delete_category", slug)
    }
}
