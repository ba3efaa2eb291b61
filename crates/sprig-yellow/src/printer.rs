//! Indented tree dump used by tests and the command line.
//!
//! ```text
//! └─COMPILATION_UNIT [0..6)
//!   ├─VARIABLE_DECL [0..6)
//!   │ ├─VAR_KW [0..3)
//!   │ ├─Trail: WHITESPACE [3..4)
//!   ...
//! ```
//!
//! Spans are trimmed spans; trivia is printed around the token that owns it
//! and list nodes are looked through.

use std::fmt;

use text_size::TextRange;

use crate::NodeOrToken;
use crate::view::{ViewElement, ViewNode};

impl ViewNode {
    pub fn write_to(&self, sink: &mut impl fmt::Write) -> fmt::Result {
        let mut printer = Printer { sink, indent: String::new() };
        printer.element(&NodeOrToken::Node(self.clone()), true)
    }

    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        _ = self.write_to(&mut out);
        out
    }
}

struct Printer<'a, W> {
    sink: &'a mut W,
    indent: String,
}

impl<W: fmt::Write> Printer<'_, W> {
    fn element(&mut self, element: &ViewElement, is_last: bool) -> fmt::Result {
        match element {
            NodeOrToken::Token(token) => {
                for trivia in token.leading_trivia() {
                    self.line("├─Lead: ", &trivia.kind(), trivia.span())?;
                }

                let trailing = token.trailing_trivia();
                let closes = is_last && token.shape().trailing_trivia().is_empty();
                let marker = if closes { "└─" } else { "├─" };
                write!(self.sink, "{}{marker}{:?}", self.indent, token.kind())?;
                if let Some(value) = token.value() {
                    write!(self.sink, " {value}")?;
                }
                if token.is_missing() {
                    self.sink.write_str(" missing")?;
                }
                writeln!(self.sink, " {}", Span(token.span()))?;

                let count = trailing.len();
                for (index, trivia) in trailing.enumerate() {
                    let marker = if is_last && index + 1 == count { "└─" } else { "├─" };
                    write!(self.sink, "{}{marker}", self.indent)?;
                    writeln!(self.sink, "Trail: {:?} {}", trivia.kind(), Span(trivia.span()))?;
                }
                Ok(())
            }
            NodeOrToken::Node(node) => {
                let marker = if is_last { "└─" } else { "├─" };
                self.line(marker, &node.kind(), node.span())?;

                let depth = self.indent.len();
                self.indent.push_str(if is_last { "  " } else { "│ " });

                let children = node.child_nodes_and_tokens();
                let count = children.len();
                for (index, child) in children.iter().enumerate() {
                    self.element(&child, index + 1 == count)?;
                }

                self.indent.truncate(depth);
                Ok(())
            }
        }
    }

    fn line(&mut self, prefix: &str, kind: &dyn fmt::Debug, span: TextRange) -> fmt::Result {
        writeln!(self.sink, "{}{prefix}{kind:?} {}", self.indent, Span(span))
    }
}

struct Span(TextRange);

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = u32::from(self.0.start());
        let end = u32::from(self.0.end());
        write!(f, "[{start}..{end})")
    }
}
