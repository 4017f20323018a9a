//! Data models for the facebox similarity API.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes as reported by the server
//! - Gallery matches and per-face match lists
//! - The success/error envelope wrapping every response

pub mod envelope;
pub mod rect;
pub mod similar;

// Re-export common types
pub use envelope::{Envelope, EnvelopePayload, FacesPayload, SimilarPayload};
pub use rect::Rect;
pub use similar::{Similar, SimilarFace};

use serde::{Deserialize, Deserializer};

/// Decode `null` or a missing field as the type's zero value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
