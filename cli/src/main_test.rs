use super::*;
use async_trait::async_trait;
use blogfront::net::types::{Category, Comment, LikeResponse, Paginated};
use serde_json::json;

// =============================================================
// Fixtures
// =============================================================

fn stored_post(slug: &str, content: Option<&str>, is_published: bool) -> BlogPost {
    let person = json!({
        "id": 1, "username": "a", "email": "a@example.com", "first_name": "", "last_name": "",
        "bio": null, "profile_picture": null,
        "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
    });
    serde_json::from_value(json!({
        "id": 10,
        "title": "Stored title",
        "slug": slug,
        "description": "stored description",
        "content": content,
        "author": person,
        "category": {
            "id": 3, "name": "Tech", "slug": "tech", "description": "",
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
        },
        "is_published": is_published,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    }))
    .unwrap()
}

/// Detail lookups see only published posts; `my_posts` lists the rest
/// without bodies, as the backend's list serializer does.
struct StoredPosts {
    published: Vec<BlogPost>,
    own: Vec<BlogPost>,
}

#[async_trait]
impl BlogApi for StoredPosts {
    async fn list_posts(&self, _query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        unimplemented!()
    }
    async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.published
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::from_response(404, r#"{"detail":"Not found."}"#))
    }
    async fn create_post(&self, _post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        unimplemented!()
    }
    async fn update_post(&self, _slug: &str, _post: &BlogPostCreate) -> Result<BlogPost, ApiError> {
        unimplemented!()
    }
    async fn delete_post(&self, _slug: &str) -> Result<(), ApiError> {
        unimplemented!()
    }
    async fn toggle_like(&self, _slug: &str) -> Result<LikeResponse, ApiError> {
        unimplemented!()
    }
    async fn my_posts(&self, _query: &PostQuery) -> Result<Paginated<BlogPost>, ApiError> {
        let results: Vec<BlogPost> = self
            .own
            .iter()
            .cloned()
            .map(|mut post| {
                post.content = None;
                post
            })
            .collect();
        Ok(Paginated { count: results.len() as u64, next: None, previous: None, results })
    }
    async fn list_comments(&self, _slug: &str) -> Result<Paginated<Comment>, ApiError> {
        unimplemented!()
    }
    async fn create_comment(&self, _slug: &str, _comment: &CommentCreate) -> Result<Comment, ApiError> {
        unimplemented!()
    }
    async fn update_comment(&self, _id: i64, _comment: &CommentCreate) -> Result<Comment, ApiError> {
        unimplemented!()
    }
    async fn delete_comment(&self, _id: i64) -> Result<(), ApiError> {
        unimplemented!()
    }
    async fn list_categories(&self) -> Result<Paginated<Category>, ApiError> {
        unimplemented!()
    }
    async fn get_category(&self, _slug: &str) -> Result<Category, ApiError> {
        unimplemented!()
    }
    async fn create_category(&self, _category: &CategoryCreate) -> Result<Category, ApiError> {
        unimplemented!()
    }
    async fn delete_category(&self, _slug: &str) -> Result<(), ApiError> {
        unimplemented!()
    }
}

fn stored() -> StoredPosts {
    StoredPosts {
        published: vec![stored_post("live", Some("live body"), true)],
        own: vec![stored_post("live", Some("live body"), true), stored_post("draft", Some("draft body"), false)],
    }
}

fn no_edits() -> PostEdits {
    PostEdits {
        title: None,
        description: None,
        content: None,
        category: None,
        draft: false,
        publish: false,
        image: None,
    }
}

// =============================================================
// posts update
// =============================================================

#[tokio::test]
async fn update_published_keeps_stored_content() {
    let edits = PostEdits { title: Some("New title".to_owned()), ..no_edits() };
    let body = update_body(&stored(), "live", edits).await.unwrap();

    assert_eq!(body.title, "New title");
    assert_eq!(body.description, "stored description");
    assert_eq!(body.content, "live body");
    assert_eq!(body.category, 3);
    assert!(body.is_published);
}

#[tokio::test]
async fn update_draft_without_content_is_refused() {
    let err = update_body(&stored(), "draft", no_edits()).await.unwrap_err();
    assert!(matches!(err, CliError::ContentRequired(ref slug) if slug == "draft"));
}

#[tokio::test]
async fn update_draft_with_content_uses_it() {
    let edits = PostEdits { content: Some("rewritten".to_owned()), publish: true, ..no_edits() };
    let body = update_body(&stored(), "draft", edits).await.unwrap();

    assert_eq!(body.content, "rewritten");
    assert_eq!(body.title, "Stored title");
    assert!(body.is_published);
}

#[tokio::test]
async fn update_unknown_post_is_not_found() {
    let err = update_body(&stored(), "ghost", no_edits()).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::NotFound { .. })));
}
