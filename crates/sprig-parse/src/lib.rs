//! Recursive descent parser building shape trees, with incremental reuse of
//! tokens and statements from a previous tree.

mod blender;
mod grammar;
mod parser;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use sprig_text::{SourceText, TextChangeRange};
use sprig_yellow::{Parsed, ShapeNode, SyntaxParser, SyntaxTree};

use crate::blender::Blender;
use crate::parser::Parser;

/// The parser for sprig source files.
#[derive(Clone, Copy, Debug, Default)]
pub struct SprigParser;

impl SyntaxParser for SprigParser {
    fn parse(&self, text: &SourceText) -> Parsed {
        run(text.as_str(), None)
    }

    fn reparse(
        &self,
        old_root: &ShapeNode,
        changes: &[TextChangeRange],
        text: &SourceText,
    ) -> Parsed {
        let blender = Blender::new(old_root, changes);
        if blender.is_none() {
            tracing::debug!("no change ranges, nothing to reuse");
        }
        run(text.as_str(), blender)
    }
}

fn run(text: &str, blender: Option<Blender>) -> Parsed {
    let mut parser = Parser::new(text, blender);
    let root = grammar::compilation_unit(&mut parser);
    parser.finish(root)
}

pub fn parse(text: &str) -> SyntaxTree {
    parse_text(SourceText::new(text))
}

pub fn parse_text(text: SourceText) -> SyntaxTree {
    SyntaxTree::parse(Arc::new(SprigParser), text)
}
