//! Advisory layout hints from an external service.
//!
//! A hint never overrides geometry. The column detector consults it only to
//! break ties between borderline gutter candidates, and every hint failure
//! is treated exactly like the absence of a hint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::PageContent;

/// Confidence assigned to hints parsed from a service reply.
pub const DEFAULT_HINT_CONFIDENCE: f32 = 0.8;

/// A layout hint for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutHint {
    /// Suggested number of columns
    pub num_columns: usize,

    /// Tables, figures or sidebars are present
    #[serde(default)]
    pub has_complex_layout: bool,

    /// Confidence in `[0, 1]`
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    DEFAULT_HINT_CONFIDENCE
}

impl LayoutHint {
    /// Create a hint.
    pub fn new(num_columns: usize, confidence: f32) -> Self {
        Self {
            num_columns,
            has_complex_layout: false,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Parse a service reply.
    ///
    /// The reply is expected to be a JSON object with `num_columns` and
    /// `has_complex_layout`, possibly wrapped in a Markdown code fence.
    ///
    /// ```
    /// use relayout::hint::LayoutHint;
    ///
    /// let reply = "```json\n{\"num_columns\": 2, \"has_complex_layout\": false}\n```";
    /// let hint = LayoutHint::from_response(reply).unwrap();
    /// assert_eq!(hint.num_columns, 2);
    /// ```
    pub fn from_response(text: &str) -> Result<Self, HintError> {
        let body = strip_code_fence(text);
        let mut hint: LayoutHint =
            serde_json::from_str(body).map_err(|e| HintError::Malformed(e.to_string()))?;
        if hint.num_columns == 0 {
            return Err(HintError::Malformed("num_columns must be positive".into()));
        }
        hint.confidence = hint.confidence.clamp(0.0, 1.0);
        Ok(hint)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = body.rfind("```") {
            body = &body[..end];
        }
    }
    body.trim()
}

/// Failure of the hint service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HintError {
    /// The service did not answer in time.
    #[error("hint service timed out")]
    Timeout,

    /// The service is not reachable or not configured.
    #[error("hint service unavailable: {0}")]
    Unavailable(String),

    /// The reply could not be parsed.
    #[error("malformed hint reply: {0}")]
    Malformed(String),
}

/// Source of advisory layout hints.
pub trait HintProvider: Send + Sync {
    /// Produce a hint for a page, or `None` when the provider has no opinion.
    fn hint(&self, page: &PageContent) -> Result<Option<LayoutHint>, HintError>;
}

/// Ask a provider for a hint, treating every failure as no hint.
pub(crate) fn resolve(provider: Option<&dyn HintProvider>, page: &PageContent) -> Option<LayoutHint> {
    let provider = provider?;
    match provider.hint(page) {
        Ok(hint) => hint,
        Err(e) => {
            log::warn!("Page {}: ignoring layout hint: {}", page.number, e);
            None
        }
    }
}

/// A provider that returns the same hint for every page.
#[derive(Debug, Clone, Copy)]
pub struct FixedHint(pub LayoutHint);

impl HintProvider for FixedHint {
    fn hint(&self, _page: &PageContent) -> Result<Option<LayoutHint>, HintError> {
        Ok(Some(self.0))
    }
}
