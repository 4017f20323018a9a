//! Facebox similarity client.
//!
//! This crate provides:
//! - Legacy single-list lookups against `/facebox/similar`
//! - Per-face lookups against `/facebox/similars`
//! - Image submission by raw bytes, remote URL, Base64 string or gallery ID
//! - Typed errors separating configuration, transport, decode and
//!   server-reported failures

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;


pub use client::{effective_limit, FaceboxClient, DEFAULT_LIMIT};
pub use config::FaceboxConfig;
pub use error::{FaceboxError, FaceboxResult, ServerError};
pub use facebox_models::{Rect, Similar, SimilarFace};
