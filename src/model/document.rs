//! Document-level types handed to the output writer.

use super::Margins;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Total number of source pages
    pub page_count: u32,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Stamp the creation date with the current time.
    pub fn stamped(mut self) -> Self {
        self.created = Some(Utc::now());
        self
    }
}

/// Parameters for creating the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSetup {
    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Page margins
    pub margins: Margins,

    /// Document metadata
    pub metadata: Metadata,
}

impl DocumentSetup {
    /// Create a setup for the given page size.
    pub fn new(page_width: f32, page_height: f32, margins: Margins) -> Self {
        Self {
            page_width,
            page_height,
            margins,
            metadata: Metadata::default(),
        }
    }

    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margins.left - self.margins.right).max(0.0)
    }

    /// Page width in twentieths of a point, the unit most word processors use.
    pub fn page_width_twips(&self) -> u32 {
        (self.page_width * 20.0).round() as u32
    }

    /// Page height in twentieths of a point.
    pub fn page_height_twips(&self) -> u32 {
        (self.page_height * 20.0).round() as u32
    }
}

impl Default for DocumentSetup {
    fn default() -> Self {
        Self::new(612.0, 792.0, Margins::uniform(36.0))
    }
}
