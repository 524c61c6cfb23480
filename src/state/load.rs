//! The four render states of a backend-driven view.

#[cfg(test)]
#[path = "load_test.rs"]
mod load_test;

use crate::net::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    /// Loaded fine, nothing to show.
    Empty,
    /// Load failed; holds the display message.
    Failed(String),
    Ready(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// Wrap a single-object fetch.
    #[must_use]
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error.message()),
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<T> LoadState<Vec<T>> {
    /// Wrap a list fetch; an empty list renders as [`LoadState::Empty`].
    #[must_use]
    pub fn from_items(result: Result<Vec<T>, ApiError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Ready(items),
            Err(error) => Self::Failed(error.message()),
        }
    }

    /// Items currently shown; empty unless ready.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.ready().map_or(&[], Vec::as_slice)
    }
}
