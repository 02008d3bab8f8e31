//! Source of positioned page content.

use crate::error::{Error, Result};
use crate::model::PageContent;

/// Extraction capability for a source document.
///
/// Implementations deliver every page's fragments with the origin at the
/// top-left corner, y increasing downward, in points. Pages may be
/// extracted concurrently.
pub trait PageSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the fragments of a page (0-indexed).
    fn extract_page(&self, index: u32) -> Result<PageContent>;
}

impl PageSource for [PageContent] {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn extract_page(&self, index: u32) -> Result<PageContent> {
        self.get(index as usize)
            .cloned()
            .ok_or(Error::PageOutOfRange(index + 1, self.page_count()))
    }
}

impl PageSource for Vec<PageContent> {
    fn page_count(&self) -> u32 {
        self.as_slice().page_count()
    }

    fn extract_page(&self, index: u32) -> Result<PageContent> {
        self.as_slice().extract_page(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source() {
        let pages = vec![PageContent::new(1, 612.0, 792.0), PageContent::new(2, 612.0, 792.0)];
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.extract_page(1).unwrap().number, 2);
        assert!(matches!(
            pages.extract_page(2),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }
}
