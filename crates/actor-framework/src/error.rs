//! # Framework Errors
//!
//! This module defines the common error types used throughout the actor framework.
//! Every entity error type must implement `From<FrameworkError>`, so plumbing failures
//! (closed channels, timeouts, persistence faults) reach callers as the entity's own
//! error enum instead of an opaque string.

use crate::store::StoreError;
use std::time::Duration;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
