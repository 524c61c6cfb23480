use super::*;
use crate::state::test_support::{MockApi, category, signed_in};
use crate::util::guard::AlwaysConfirm;

fn listed() -> MockApi {
    let mut tech = category(2, "tech");
    tech.description = "Gadgets and Rust".to_owned();
    MockApi { categories: vec![category(1, "food"), tech], ..MockApi::default() }
}

#[tokio::test]
async fn load_then_filter_ignores_case() {
    let api = listed();
    let mut view = CategoriesView::new();
    view.load(&api).await;

    view.search = "RUST".to_owned();
    assert_eq!(view.filtered().iter().map(|c| c.slug.as_str()).collect::<Vec<_>>(), vec!["tech"]);
    view.search = "food".to_owned();
    assert_eq!(view.filtered().len(), 1);
    view.search.clear();
    assert_eq!(view.filtered().len(), 2);
}

#[tokio::test]
async fn load_failure_is_failed_state() {
    let api = listed().failing("list_categories");
    let mut view = CategoriesView::new();
    view.load(&api).await;
    assert!(view.categories.error().is_some());
}

#[tokio::test]
async fn create_requires_sign_in() {
    let api = listed();
    let mut view = CategoriesView::new();
    let draft = CategoryCreate { name: "Travel".to_owned(), description: String::new() };
    let outcome = view.create(&AuthState::SignedOut, &api, &draft).await.unwrap();
    assert_eq!(outcome, Outcome::SignInRequired);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn create_into_empty_view_makes_it_ready() {
    let api = MockApi::default();
    let mut view = CategoriesView::new();
    view.load(&api).await;
    assert_eq!(view.categories, LoadState::Empty);

    let draft = CategoryCreate { name: "Travel".to_owned(), description: "trips".to_owned() };
    view.create(&signed_in(), &api, &draft).await.unwrap();
    assert_eq!(view.categories.items()[0].name, "Travel");
}

#[tokio::test]
async fn create_after_failed_load_keeps_error() {
    let api = listed().failing("list_categories");
    let mut view = CategoriesView::new();
    view.load(&api).await;

    let draft = CategoryCreate { name: "Travel".to_owned(), description: String::new() };
    let outcome = view.create(&signed_in(), &api, &draft).await.unwrap();
    assert!(matches!(outcome, Outcome::Done(ref created) if created.name == "Travel"));
    assert!(view.categories.error().is_some());
    assert!(view.categories.items().is_empty());
}

#[tokio::test]
async fn delete_declined_keeps_category() {
    let api = listed();
    let mut view = CategoriesView::new();
    view.load(&api).await;

    let decline = |_: &str| false;
    let outcome = view.delete(&signed_in(), &api, &decline, "food").await.unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(view.categories.items().len(), 2);
}

#[tokio::test]
async fn delete_confirmed_removes_category() {
    let api = listed();
    let mut view = CategoriesView::new();
    view.load(&api).await;

    view.delete(&signed_in(), &api, &AlwaysConfirm, "food").await.unwrap();
    assert_eq!(view.categories.items().len(), 1);
    assert!(api.calls().contains(&"delete_category:food".to_owned()));
}
