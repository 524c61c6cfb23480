//! Helpers shared across views.
//!
//! SYSTEM CONTEXT
//! ==============
//! `guard` holds the sign-in and confirmation gates every identity-requiring
//! or destructive action passes through; `format` holds display helpers.

pub mod format;
pub mod guard;
