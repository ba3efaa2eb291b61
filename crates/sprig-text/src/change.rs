use text_size::{TextRange, TextSize};

/// A replacement of `span` in the old text with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextChange {
    pub span: TextRange,
    pub new_text: Box<str>,
}

impl TextChange {
    pub fn new(span: TextRange, new_text: impl Into<Box<str>>) -> Self {
        Self { span, new_text: new_text.into() }
    }

    pub fn insert(offset: TextSize, text: impl Into<Box<str>>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(span: TextRange) -> Self {
        Self::new(span, "")
    }

    /// Drops the inserted text, keeping only its length.
    pub fn to_range(&self) -> TextChangeRange {
        TextChangeRange::new(self.span, TextSize::of(&*self.new_text))
    }
}

/// The shape of an edit: `span` in old coordinates became `new_len` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextChangeRange {
    span: TextRange,
    new_len: TextSize,
}

impl TextChangeRange {
    pub const NO_CHANGE: Self =
        Self { span: TextRange::empty(TextSize::new(0)), new_len: TextSize::new(0) };

    pub const fn new(span: TextRange, new_len: TextSize) -> Self {
        Self { span, new_len }
    }

    pub fn span(&self) -> TextRange {
        self.span
    }

    pub fn new_len(&self) -> TextSize {
        self.new_len
    }

    /// End of the replacement in new-text coordinates.
    pub fn new_end(&self) -> TextSize {
        self.span.start() + self.new_len
    }

    /// Signed growth of the text caused by this change.
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_len)) - i64::from(u32::from(self.span.len()))
    }

    pub fn is_no_change(&self) -> bool {
        self.span.is_empty() && self.new_len == TextSize::new(0)
    }

    /// Folds ordered, non-overlapping changes (old coordinates) into one range
    /// that covers all of them.
    pub fn collapse(changes: &[Self]) -> Option<Self> {
        let (first, rest) = changes.split_first()?;

        let mut start = first.span.start();
        let mut end = first.span.end();
        let mut delta = first.delta();

        for change in rest {
            start = start.min(change.span.start());
            end = end.max(change.span.end());
            delta += change.delta();
        }

        let span = TextRange::new(start, end);
        let new_len = i64::from(u32::from(span.len())) + delta;
        let new_len = u32::try_from(new_len).unwrap_or(0);

        Some(Self::new(span, new_len.into()))
    }
}
