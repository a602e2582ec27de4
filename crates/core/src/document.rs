//! Documents, retrieval results, and generation parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A text snippet held by the document store. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub filename: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
        }
    }
}

/// A retrieved document as returned to callers: a bounded excerpt, the
/// source file name, and the raw similarity score (not normalized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    pub excerpt: String,
    pub filename: String,
    pub score: f32,
}

/// Caller-supplied template values, keyed by placeholder name.
///
/// A `BTreeMap` so that every rendering walks keys in the same order.
pub type GenerationParameters = BTreeMap<String, serde_json::Value>;
