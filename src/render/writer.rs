//! Output writer capability and the calls made against it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CellItem, Container, DocumentSetup, ImagePlacement, Paragraph};

/// A paginated-document writer.
///
/// The writer owns serialization of the output format. Calls arrive in
/// reading order after [`OutputWriter::create_document`].
pub trait OutputWriter {
    /// Start a new document with the given page geometry and metadata.
    fn create_document(&mut self, setup: &DocumentSetup) -> Result<()>;

    /// Append a paragraph.
    fn add_paragraph(&mut self, paragraph: &Paragraph) -> Result<()>;

    /// Append a grid container (column layout or bordered table).
    fn add_container(&mut self, container: &Container) -> Result<()>;

    /// Append a standalone image.
    fn add_image(&mut self, image: &ImagePlacement) -> Result<()>;

    /// Start a new output page.
    fn add_page_break(&mut self) -> Result<()>;

    /// Persist the document.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// One call against an [`OutputWriter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum WriterCall {
    /// `create_document`
    CreateDocument(DocumentSetup),
    /// `add_paragraph`
    Paragraph(Paragraph),
    /// `add_container`
    Container(Container),
    /// `add_image`
    Image(ImagePlacement),
    /// `add_page_break`
    PageBreak,
}

impl WriterCall {
    /// Apply this call to a writer.
    pub fn apply(&self, writer: &mut dyn OutputWriter) -> Result<()> {
        match self {
            WriterCall::CreateDocument(setup) => writer.create_document(setup),
            WriterCall::Paragraph(p) => writer.add_paragraph(p),
            WriterCall::Container(c) => writer.add_container(c),
            WriterCall::Image(i) => writer.add_image(i),
            WriterCall::PageBreak => writer.add_page_break(),
        }
    }

    /// Text carried by this call, paragraphs separated by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            WriterCall::Paragraph(p) => p.plain_text(),
            WriterCall::Container(c) => c
                .rows
                .iter()
                .flat_map(|r| &r.cells)
                .flat_map(|cell| &cell.content)
                .filter_map(|item| match item {
                    CellItem::Paragraph(p) => Some(p.plain_text()),
                    CellItem::Image(_) => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }
}

/// Apply calls to a writer in order.
pub fn emit(calls: &[WriterCall], writer: &mut dyn OutputWriter) -> Result<()> {
    for call in calls {
        call.apply(writer)?;
    }
    Ok(())
}

/// A writer that records every call and saves them as JSON.
///
/// Image bytes are not part of the saved JSON.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    calls: Vec<WriterCall>,
    saved_to: Option<PathBuf>,
}

impl RecordingWriter {
    /// Create an empty recording writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[WriterCall] {
        &self.calls
    }

    /// Consume the writer and return its calls.
    pub fn into_calls(self) -> Vec<WriterCall> {
        self.calls
    }

    /// Path of the last successful save.
    pub fn saved_to(&self) -> Option<&Path> {
        self.saved_to.as_deref()
    }

    /// Load calls previously saved with [`OutputWriter::save`].
    pub fn load(path: &Path) -> Result<Vec<WriterCall>> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn record(&mut self, call: WriterCall) -> Result<()> {
        if self.calls.is_empty() && !matches!(call, WriterCall::CreateDocument(_)) {
            return Err(Error::Writer("no document created".into()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl OutputWriter for RecordingWriter {
    fn create_document(&mut self, setup: &DocumentSetup) -> Result<()> {
        if !self.calls.is_empty() {
            return Err(Error::Writer("document already created".into()));
        }
        self.calls.push(WriterCall::CreateDocument(setup.clone()));
        Ok(())
    }

    fn add_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.record(WriterCall::Paragraph(paragraph.clone()))
    }

    fn add_container(&mut self, container: &Container) -> Result<()> {
        if container.rows.iter().any(|r| r.cells.len() != container.column_count()) {
            return Err(Error::Writer(format!(
                "container row does not match its {} columns",
                container.column_count()
            )));
        }
        self.record(WriterCall::Container(container.clone()))
    }

    fn add_image(&mut self, image: &ImagePlacement) -> Result<()> {
        self.record(WriterCall::Image(image.clone()))
    }

    fn add_page_break(&mut self) -> Result<()> {
        self.record(WriterCall::PageBreak)
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        if self.calls.is_empty() {
            return Err(Error::Writer("no document created".into()));
        }
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, &self.calls)?;
        out.flush()?;
        self.saved_to = Some(path.to_path_buf());
        Ok(())
    }
}
