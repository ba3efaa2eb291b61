//! Immutable source buffers and the edits applied to them.

mod change;
mod source;

pub use change::{TextChange, TextChangeRange};
pub use line_index::LineCol;
pub use source::SourceText;
pub use text_size::{TextLen, TextRange, TextSize};
