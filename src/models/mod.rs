//! Data models for the verification flow.
//!
//! This module contains the records persisted in client storage and the
//! transient values passed between the flow and the verification service.

/// Locally issued API key record
pub mod api_key;
/// Selected student ID image
pub mod upload;
/// Verification endpoint response
pub mod verification;
