use std::sync::Arc;

use camino::Utf8PathBuf;
pub use sprig_errors::Diagnostic;
use sprig_errors::DiagnosticQueue;
use sprig_parse::SprigParser;
use sprig_text::SourceText;
use sprig_yellow::{ShapeNode, SyntaxParser, SyntaxTree};

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

/// The root shape of a file with its diagnostics resolved to locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFile {
    pub root: ShapeNode,
    pub diagnostics: Vec<Diagnostic>,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref))]
    pub fn source(self, db: &dyn salsa::Database) -> SourceText {
        SourceText::with_path(self.path(db).clone(), self.text(db))
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn parse(self, db: &dyn salsa::Database) -> ParsedFile {
        let source = self.source(db);
        let _span = tracing::debug_span!("parse_file", path = %self.path(db)).entered();

        let root = SprigParser.parse(source).into_root();
        let diagnostics = tree(source.clone(), root.clone()).diagnostics();
        ParsedFile { root, diagnostics }
    }
}

fn tree(source: SourceText, root: ShapeNode) -> SyntaxTree {
    SyntaxTree::from_root(Arc::new(SprigParser), source, root)
}

/// A navigable tree over the parsed shape of `file`. Trees are cheap to
/// build; the shape itself is shared with the database.
pub fn syntax_tree(db: &dyn salsa::Database, file: File) -> SyntaxTree {
    tree(file.source(db).clone(), file.parse(db).root.clone())
}

/// Every diagnostic of `file`, errors first.
#[salsa::tracked(returns(ref))]
pub fn check_file(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    let mut queue = DiagnosticQueue::new();
    queue.extend(file.parse(db).diagnostics.iter().cloned());
    queue.into_sorted()
}

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}
