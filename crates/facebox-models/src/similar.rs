//! Gallery match types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// A single gallery entry that resembles a detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Similar {
    /// Identifier of the gallery entry
    #[serde(default, deserialize_with = "crate::nullable")]
    pub id: String,
    /// Similarity score assigned by the server
    #[serde(default)]
    pub confidence: f64,
    /// Human-readable name of the gallery entry
    #[serde(default, deserialize_with = "crate::nullable")]
    pub name: String,
}

impl Similar {
    pub fn new(id: impl Into<String>, confidence: f64, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            confidence,
            name: name.into(),
        }
    }
}

/// A face detected in the submitted image together with its gallery matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarFace {
    #[serde(default)]
    pub rect: Rect,
    /// Matches in the order the server ranked them
    #[serde(default, deserialize_with = "crate::nullable")]
    pub similar_faces: Vec<Similar>,
}

impl SimilarFace {
    /// The match the server ranked first, if any.
    pub fn best_match(&self) -> Option<&Similar> {
        self.similar_faces.first()
    }
}
