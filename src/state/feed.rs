//! Post listings: the filterable feed and the home page sections.
//!
//! DESIGN
//! ======
//! The backend pages at a fixed size of [`PAGE_SIZE`], so page counts are
//! derived from the reported total. Any change to a filter jumps back to
//! page 1.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use serde::Serialize;

use crate::net::api::BlogApi;
use crate::net::types::{BlogPost, Category, PostQuery};
use crate::state::load::LoadState;

/// Items per backend page.
pub const PAGE_SIZE: u64 = 10;

/// Posts in the home page's featured row.
pub const FEATURED_COUNT: usize = 3;

/// Posts in the home page's recent grid, after the featured row.
pub const RECENT_COUNT: usize = 6;

/// `ceil(count / PAGE_SIZE)`, never below 1.
#[must_use]
pub fn total_pages(count: u64) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// =============================================================================
// FEED
// =============================================================================

#[derive(Debug, Clone)]
pub struct FeedView {
    page: u32,
    search: String,
    category: String,
    author: String,
    ordering: String,
    pub posts: LoadState<Vec<BlogPost>>,
    pub total_posts: u64,
    pub total_pages: u32,
    /// Options for the category filter. Empty when they failed to load.
    pub categories: Vec<Category>,
}

impl Default for FeedView {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            category: String::new(),
            author: String::new(),
            ordering: String::new(),
            posts: LoadState::Loading,
            total_posts: 0,
            total_pages: 1,
            categories: Vec::new(),
        }
    }
}

impl FeedView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Filters for the next fetch. Blank filters are left out.
    #[must_use]
    pub fn query(&self) -> PostQuery {
        let non_blank = |value: &str| (!value.trim().is_empty()).then(|| value.trim().to_owned());
        PostQuery {
            page: Some(self.page),
            search: non_blank(&self.search),
            category: non_blank(&self.category),
            author: non_blank(&self.author),
            ordering: non_blank(&self.ordering),
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Filter by category slug; an empty slug means all categories.
    pub fn set_category(&mut self, slug: impl Into<String>) {
        self.category = slug.into();
        self.page = 1;
    }

    /// Filter by author username.
    pub fn set_author(&mut self, username: impl Into<String>) {
        self.author = username.into();
        self.page = 1;
    }

    /// Backend ordering field, `-` prefixed for descending.
    pub fn set_ordering(&mut self, ordering: impl Into<String>) {
        self.ordering = ordering.into();
        self.page = 1;
    }

    /// Pages are 1-based; 0 is treated as 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Fetch the current page with the current filters.
    pub async fn load(&mut self, api: &dyn BlogApi) {
        self.posts = LoadState::Loading;
        match api.list_posts(&self.query()).await {
            Ok(page) => {
                self.total_posts = page.count;
                self.total_pages = total_pages(page.count);
                self.posts = LoadState::from_items(Ok(page.results));
            }
            Err(error) => {
                tracing::warn!(%error, page = self.page, "failed to load posts");
                self.posts = LoadState::Failed(error.message());
            }
        }
    }

    /// Fetch filter options. A failure leaves the filter empty; the feed
    /// itself still works.
    pub async fn load_categories(&mut self, api: &dyn BlogApi) {
        self.categories = match api.list_categories().await {
            Ok(page) => page.results,
            Err(error) => {
                tracing::warn!(%error, "failed to load categories");
                Vec::new()
            }
        };
    }
}

// =============================================================================
// HOME
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HomeSections {
    pub featured: Vec<BlogPost>,
    pub recent: Vec<BlogPost>,
}

/// Split a newest-first listing into the featured row and the recent grid.
#[must_use]
pub fn home_sections(mut posts: Vec<BlogPost>) -> HomeSections {
    posts.truncate(FEATURED_COUNT + RECENT_COUNT);
    let recent = posts.split_off(posts.len().min(FEATURED_COUNT));
    HomeSections { featured: posts, recent }
}

/// Fetch the newest posts and split them for the home page.
pub async fn load_home(api: &dyn BlogApi) -> LoadState<HomeSections> {
    let query = PostQuery { ordering: Some("-created_at".to_owned()), ..PostQuery::default() };
    match api.list_posts(&query).await {
        Ok(page) if page.is_empty() => LoadState::Empty,
        Ok(page) => LoadState::Ready(home_sections(page.results)),
        Err(error) => {
            tracing::warn!(%error, "failed to load home page posts");
            LoadState::Failed(error.message())
        }
    }
}
