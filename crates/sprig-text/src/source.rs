use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use line_index::{LineCol, LineIndex};
use text_size::{TextLen, TextRange, TextSize};

use crate::{TextChange, TextChangeRange};

/// An immutable, cheaply clonable piece of source code with its line table.
#[derive(Clone)]
pub struct SourceText {
    inner: Arc<SourceTextData>,
}

struct SourceTextData {
    path: Option<Utf8PathBuf>,
    text: Box<str>,
    line_index: LineIndex,
    line_count: u32,
}

impl SourceText {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        Self::build(None, text.into())
    }

    pub fn with_path(path: impl Into<Utf8PathBuf>, text: impl Into<Box<str>>) -> Self {
        Self::build(Some(path.into()), text.into())
    }

    fn build(path: Option<Utf8PathBuf>, text: Box<str>) -> Self {
        let line_index = LineIndex::new(&text);
        let line_count = line_index.line_col(text.text_len()).line + 1;
        Self { inner: Arc::new(SourceTextData { path, text, line_index, line_count }) }
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.inner.path.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.inner.text
    }

    pub fn len(&self) -> TextSize {
        self.inner.text.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.text.is_empty()
    }

    pub fn full_range(&self) -> TextRange {
        TextRange::up_to(self.len())
    }

    /// Zero-based line containing `offset`.
    #[track_caller]
    pub fn line_index(&self, offset: TextSize) -> u32 {
        self.line_col(offset).line
    }

    #[track_caller]
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        assert!(offset <= self.len(), "offset {offset:?} is past the end of the text");
        self.inner.line_index.line_col(offset)
    }

    pub fn line_count(&self) -> u32 {
        self.inner.line_count
    }

    /// Range of `line`, including its terminating line break.
    pub fn line_span(&self, line: u32) -> Option<TextRange> {
        if line >= self.line_count() {
            return None;
        }

        let start = self.inner.line_index.offset(LineCol { line, col: 0 })?;
        let end = if line + 1 == self.line_count() {
            self.len()
        } else {
            self.inner.line_index.offset(LineCol { line: line + 1, col: 0 })?
        };

        Some(TextRange::new(start, end))
    }

    pub fn slice(&self, range: TextRange) -> &str {
        &self.inner.text[range]
    }

    /// Applies ordered, non-overlapping changes expressed in this text's
    /// coordinates.
    #[track_caller]
    pub fn with_changes(&self, changes: &[TextChange]) -> Self {
        let mut text = String::with_capacity(self.inner.text.len());
        let mut last = TextSize::new(0);

        for change in changes {
            assert!(change.span.start() >= last, "text changes must be ordered and disjoint");
            text.push_str(self.slice(TextRange::new(last, change.span.start())));
            text.push_str(&change.new_text);
            last = change.span.end();
        }

        text.push_str(self.slice(TextRange::new(last, self.len())));
        Self::build(self.inner.path.clone(), text.into())
    }

    /// Describes how `old` became `self` as a single range bounded by the
    /// longest common prefix and suffix. Empty when the texts are identical.
    pub fn diff(&self, old: &Self) -> Vec<TextChangeRange> {
        let old_text = old.as_str();
        let new_text = self.as_str();

        if old_text == new_text {
            return Vec::new();
        }

        let prefix = common_prefix(old_text, new_text);
        let suffix = common_suffix(&old_text[prefix..], &new_text[prefix..]);

        let old_end = old_text.len() - suffix;
        let new_len = new_text.len() - suffix - prefix;
        let span = TextRange::new(offset(prefix), offset(old_end));

        vec![TextChangeRange::new(span, offset(new_len))]
    }
}

fn offset(len: usize) -> TextSize {
    TextSize::try_from(len).unwrap_or(TextSize::new(u32::MAX))
}

fn common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((index, _), _)| index)
}

fn common_suffix(a: &str, b: &str) -> usize {
    a.char_indices()
        .rev()
        .zip(b.chars().rev())
        .find(|&((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((index, x), _)| a.len() - index - x.len_utf8())
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.path == other.inner.path && self.inner.text == other.inner.text)
    }
}

impl Eq for SourceText {}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("path", &self.inner.path)
            .field("len", &self.len())
            .field("lines", &self.line_count())
            .finish()
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
