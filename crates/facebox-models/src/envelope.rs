//! The success/error envelope wrapping every facebox response.
//!
//! The legacy endpoint returns its matches under `similar`, the multi-face
//! endpoint under `faces`. Both share the `success`/`error` fields, so the
//! envelope is generic over the payload and each payload knows how to hand
//! back its result list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::similar::{Similar, SimilarFace};

/// Top-level response object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P> {
    #[serde(default, deserialize_with = "crate::nullable")]
    pub success: bool,
    /// Server-defined free text, set when `success` is false
    #[serde(default, deserialize_with = "crate::nullable")]
    pub error: String,
    #[serde(flatten)]
    pub payload: P,
}

/// A response payload that yields a list of results.
pub trait EnvelopePayload: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Payload of `/facebox/similar`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarPayload {
    #[serde(default, deserialize_with = "crate::nullable")]
    pub similar: Vec<Similar>,
}

impl EnvelopePayload for SimilarPayload {
    type Item = Similar;

    fn into_items(self) -> Vec<Similar> {
        self.similar
    }
}

/// Payload of `/facebox/similars`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacesPayload {
    #[serde(default, deserialize_with = "crate::nullable")]
    pub faces: Vec<SimilarFace>,
}

impl EnvelopePayload for FacesPayload {
    type Item = SimilarFace;

    fn into_items(self) -> Vec<SimilarFace> {
        self.faces
    }
}

impl<P: EnvelopePayload> Envelope<P> {
    /// Unwrap the payload, or return the server's error message when the
    /// envelope reports failure.
    pub fn into_result(self) -> Result<Vec<P::Item>, String> {
        if self.success {
            Ok(self.payload.into_items())
        } else {
            Err(self.error)
        }
    }
}
