use super::*;
use crate::state::test_support::{MockApi, post, signed_in};
use crate::util::guard::AlwaysConfirm;

fn counted(id: i64, slug: &str, likes: u64, comments: u64) -> BlogPost {
    let mut p = post(id, slug);
    p.likes_count = likes;
    p.comments_count = comments;
    p
}

#[tokio::test]
async fn signed_out_load_fetches_nothing() {
    let api = MockApi { posts: vec![post(1, "a")], ..MockApi::default() };
    let mut view = DashboardView::new();
    let auth = AuthState::SignedOut;
    assert_eq!(view.load(&auth, &api).await, Gate::SignInRequired);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn initializing_load_waits() {
    let api = MockApi::default();
    let mut view = DashboardView::new();
    assert_eq!(view.load(&AuthState::Initializing, &api).await, Gate::Pending);
    assert!(view.posts.is_loading());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn stats_sum_over_posts() {
    let api = MockApi { posts: vec![counted(1, "a", 3, 1), counted(2, "b", 2, 5)], ..MockApi::default() };
    let mut view = DashboardView::new();
    let auth = signed_in();
    view.load(&auth, &api).await;
    assert_eq!(view.stats(), DashboardStats { posts: 2, likes: 5, comments: 6 });
}

#[tokio::test]
async fn delete_removes_post_locally() {
    let api = MockApi { posts: vec![post(1, "a"), post(2, "b")], ..MockApi::default() };
    let mut view = DashboardView::new();
    let auth = signed_in();
    view.load(&auth, &api).await;

    let outcome = view.delete_post(&auth, &api, &AlwaysConfirm, "a").await.unwrap();
    assert!(outcome.is_done());
    assert_eq!(view.posts.items().iter().map(|p| p.slug.as_str()).collect::<Vec<_>>(), vec!["b"]);
}

#[tokio::test]
async fn deleting_last_post_empties_view() {
    let api = MockApi { posts: vec![post(1, "a")], ..MockApi::default() };
    let mut view = DashboardView::new();
    let auth = signed_in();
    view.load(&auth, &api).await;
    view.delete_post(&auth, &api, &AlwaysConfirm, "a").await.unwrap();
    assert_eq!(view.posts, LoadState::Empty);
}

#[tokio::test]
async fn delete_failure_keeps_post_and_message() {
    let api = MockApi { posts: vec![post(1, "a")], ..MockApi::default() }.failing("delete_post");
    let mut view = DashboardView::new();
    let auth = signed_in();
    view.load(&auth, &api).await;

    assert!(view.delete_post(&auth, &api, &AlwaysConfirm, "a").await.is_err());
    assert_eq!(view.posts.items().len(), 1);
    assert!(view.error.is_some());
}
