//! Networking modules for the blog REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `error` normalizes every failure into one
//! shape, and `types` defines the request/response schemas.

pub mod api;
pub mod error;
pub mod types;
