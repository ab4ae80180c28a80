//! Truthy/falsy word registry for boolean conversion

use crate::constants::DEFAULT_BOOLEAN_PAIRS;
use tracing::debug;

/// Ordered list of (falsy, truthy) word pairs
///
/// Conversion only needs the falsy side: any non-empty text that is not a
/// falsy word converts to `true`. The registry is append-only; registering
/// is the single mutation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanRegistry {
    pairs: Vec<(String, String)>,
}

impl Default for BooleanRegistry {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_BOOLEAN_PAIRS
                .iter()
                .map(|(falsy, truthy)| (falsy.to_string(), truthy.to_string()))
                .collect(),
        }
    }
}

impl BooleanRegistry {
    /// Registry with no word pairs at all
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Add a (falsy, truthy) pair, returning the new pair count
    pub fn register(&mut self, falsy: impl Into<String>, truthy: impl Into<String>) -> usize {
        let pair = (falsy.into(), truthy.into());
        debug!("Registering boolean pair ({}, {})", pair.0, pair.1);
        self.pairs.push(pair);
        self.pairs.len()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether `token` matches a falsy word (case-insensitive)
    pub fn is_falsy(&self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        self.pairs
            .iter()
            .any(|(falsy, _)| falsy.to_lowercase() == token)
    }

    /// Whether `token` matches a truthy word (case-insensitive)
    pub fn is_truthy(&self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        self.pairs
            .iter()
            .any(|(_, truthy)| truthy.to_lowercase() == token)
    }

    /// Whether `token` is one of the registered words
    pub fn is_boolean_token(&self, token: &str) -> bool {
        self.is_falsy(token) || self.is_truthy(token)
    }

    /// Convert text: empty and falsy words are `false`, anything else `true`
    ///
    /// Whitespace-only text is not empty and converts to `true`.
    pub fn convert(&self, raw: &str) -> bool {
        !raw.is_empty() && !self.is_falsy(raw)
    }
}
