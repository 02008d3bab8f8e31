//! Output synthesis: turning analyzed pages into writer calls.

mod options;
mod result;
mod synthesizer;
mod text;
mod writer;

pub use options::{PageSelection, RenderOptions};
pub use result::{ConversionStats, PageReport, PageWarning, WarningKind};
pub use synthesizer::LayoutSynthesizer;
pub use text::{clean_font_name, is_hyphenated_break, join_lines, joins_without_space, should_flow};
pub use writer::{emit, OutputWriter, RecordingWriter, WriterCall};
