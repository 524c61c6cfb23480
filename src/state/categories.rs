//! Category listing with create and delete.

#[cfg(test)]
#[path = "categories_test.rs"]
mod categories_test;

use crate::net::api::BlogApi;
use crate::net::error::ApiError;
use crate::net::types::{Category, CategoryCreate};
use crate::state::auth::AuthState;
use crate::state::load::LoadState;
use crate::util::guard::{self, Confirm, Outcome};

#[derive(Debug, Clone, Default)]
pub struct CategoriesView {
    pub categories: LoadState<Vec<Category>>,
    /// Client-side filter over name and description.
    pub search: String,
}

impl CategoriesView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &dyn BlogApi) {
        self.categories = LoadState::Loading;
        self.categories = LoadState::from_items(api.list_categories().await.map(|page| page.results));
    }

    /// Categories whose name or description contains the search text,
    /// ignoring case.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Category> {
        let needle = self.search.trim().to_lowercase();
        self.categories
            .items()
            .iter()
            .filter(|category| {
                needle.is_empty()
                    || category.name.to_lowercase().contains(&needle)
                    || category.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns the backend error, e.g. a duplicate name.
    pub async fn create(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        category: &CategoryCreate,
    ) -> Result<Outcome<Category>, ApiError> {
        if let Some(outcome) = guard::check_action(auth) {
            return Ok(outcome);
        }
        let created = api.create_category(category).await?;
        // A failed or pending list keeps its state; reload to see the new entry.
        match &mut self.categories {
            LoadState::Ready(list) => list.push(created.clone()),
            state @ LoadState::Empty => *state = LoadState::Ready(vec![created.clone()]),
            LoadState::Failed(_) | LoadState::Loading => {}
        }
        Ok(Outcome::Done(created))
    }

    /// # Errors
    ///
    /// Returns the backend error; the category stays listed.
    pub async fn delete(
        &mut self,
        auth: &AuthState,
        api: &dyn BlogApi,
        confirm: &dyn Confirm,
        slug: &str,
    ) -> Result<Outcome<()>, ApiError> {
        if let Some(outcome) = guard::check_destructive(auth, confirm, guard::DELETE_CATEGORY_PROMPT) {
            return Ok(outcome);
        }
        api.delete_category(slug).await?;
        if let Some(list) = self.categories.ready_mut() {
            list.retain(|category| category.slug != slug);
            if list.is_empty() {
                self.categories = LoadState::Empty;
            }
        }
        Ok(Outcome::Done(()))
    }
}
