//! Hands out pieces of the previous tree that the parser can take over
//! unchanged.
//!
//! Every edit is collapsed into one change range. Old tokens and statements
//! are indexed by their old full start; the parser asks for a piece at a new
//! position and gets one back only if the text it was built from is known to
//! be identical and far enough from the edit that lookahead could not have
//! seen it.

use sprig_text::TextChangeRange;
use sprig_yellow::SyntaxKind::*;
use sprig_yellow::{ShapeNode, SyntaxSet};
use text_size::TextSize;

const STATEMENTS: SyntaxSet = SyntaxSet::new([
    BLOCK,
    VARIABLE_DECL,
    FUNCTION_DECL,
    IF_STMT,
    WHILE_STMT,
    RETURN_STMT,
    EXPR_STMT,
]);

/// Tokens of lookahead before the edit whose neighbors may change.
const LOOKAHEAD: usize = 2;

pub(crate) struct Blender {
    change: TextChangeRange,
    affected_start: TextSize,
    tokens: Vec<(TextSize, ShapeNode)>,
    statements: Vec<(TextSize, ShapeNode)>,
}

impl Blender {
    pub(crate) fn new(old_root: &ShapeNode, changes: &[TextChangeRange]) -> Option<Self> {
        let change = TextChangeRange::collapse(changes)?;

        let mut blender = Self {
            change,
            affected_start: TextSize::new(0),
            tokens: Vec::new(),
            statements: Vec::new(),
        };
        blender.collect(old_root, TextSize::new(0));

        let containing = blender
            .tokens
            .partition_point(|(start, token)| *start + token.full_width() <= change.span().start())
            .min(blender.tokens.len().saturating_sub(1));
        blender.affected_start = blender.lookahead_start(containing);

        tracing::trace!(
            affected_start = u32::from(blender.affected_start),
            tokens = blender.tokens.len(),
            statements = blender.statements.len(),
            "blender ready"
        );
        Some(blender)
    }

    /// Start of the token `LOOKAHEAD` non-empty tokens before `containing`.
    /// Missing tokens take no text, so they do not count.
    fn lookahead_start(&self, containing: usize) -> TextSize {
        let mut index = containing;
        let mut seen = 0;
        while index > 0 && seen < LOOKAHEAD {
            index -= 1;
            if self.tokens[index].1.full_width() > TextSize::new(0) {
                seen += 1;
            }
        }
        self.tokens.get(index).map_or(TextSize::new(0), |&(start, _)| start)
    }

    fn collect(&mut self, shape: &ShapeNode, start: TextSize) {
        if shape.is_token() {
            self.tokens.push((start, shape.clone()));
            return;
        }
        if STATEMENTS.contains(shape.kind()) {
            self.statements.push((start, shape.clone()));
        }

        let mut offset = start;
        for child in shape.slots().flatten() {
            self.collect(child, offset);
            offset += child.full_width();
        }
    }

    /// An old token whose full span starts at `position` in the new text.
    pub(crate) fn token_at(&self, position: TextSize) -> Option<ShapeNode> {
        self.take(&self.tokens, position)
    }

    /// An old statement whose full span starts at `position` in the new text.
    pub(crate) fn statement_at(&self, position: TextSize) -> Option<ShapeNode> {
        self.take(&self.statements, position)
    }

    fn take(&self, pieces: &[(TextSize, ShapeNode)], position: TextSize) -> Option<ShapeNode> {
        let old_start = self.old_position(position)?;
        let index = pieces.partition_point(|&(start, _)| start < old_start);

        pieces[index..]
            .iter()
            .take_while(|&&(start, _)| start == old_start)
            .map(|(_, shape)| shape)
            .find(|shape| {
                let old_end = old_start + shape.full_width();
                let unchanged = old_end <= self.affected_start
                    || old_start >= self.change.span().end();
                unchanged && is_reusable(shape)
            })
            .cloned()
    }

    /// Where `position` in the new text was in the old one, if that text
    /// survived the edit.
    fn old_position(&self, position: TextSize) -> Option<TextSize> {
        if position < self.affected_start {
            return Some(position);
        }

        let old = i64::from(u32::from(position)) - self.change.delta();
        let old = TextSize::new(u32::try_from(old).ok()?);
        (old >= self.change.span().end()).then_some(old)
    }
}

fn is_reusable(shape: &ShapeNode) -> bool {
    shape.full_width() > TextSize::new(0)
        && !shape.contains_skipped_text()
        && !shape.last_token().is_some_and(ShapeNode::is_missing)
}
