use std::collections::VecDeque;

use crate::{Diagnostic, Severity};

/// Diagnostics in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticQueue {
    items: VecDeque<Diagnostic>,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push_back(diagnostic);
    }

    /// Removes the oldest diagnostic.
    pub fn pop(&mut self) -> Option<Diagnostic> {
        self.items.pop_front()
    }

    /// Drains `other` into the back of this queue.
    pub fn move_from(&mut self, other: &mut Self) {
        self.items.append(&mut other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|diagnostic| diagnostic.severity().is_error())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Diagnostic> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|diagnostic| diagnostic.severity().is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|diagnostic| diagnostic.severity() == Severity::Warning)
    }

    /// Keeps only diagnostics at least as severe as `severity`.
    pub fn retain_at_least(&mut self, severity: Severity) {
        self.items.retain(|diagnostic| diagnostic.severity() <= severity);
    }

    /// Most severe first; discovery order is kept within a severity.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut items = Vec::from(self.items);
        items.sort_by_key(Diagnostic::severity);
        items
    }
}

impl Extend<Diagnostic> for DiagnosticQueue {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl FromIterator<Diagnostic> for DiagnosticQueue {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl IntoIterator for DiagnosticQueue {
    type Item = Diagnostic;
    type IntoIter = std::collections::vec_deque::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
