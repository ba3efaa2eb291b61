mod code;
mod diagnostic;
mod queue;

pub use annotate_snippets::Renderer;
pub use code::{DiagnosticCode, Severity};
pub use diagnostic::{Diagnostic, Location, SyntaxDiagnostic};
pub use queue::DiagnosticQueue;
pub use text_size::{TextRange, TextSize};
