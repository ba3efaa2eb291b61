use std::collections::HashSet;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use sprig_db::{File, RootDatabase, check_file, syntax_tree};
use sprig_errors::{Diagnostic, Renderer};
use sprig_text::{TextChange, TextRange, TextSize};
use sprig_yellow::SyntaxTree;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Inspect sprig syntax trees")]
struct Options {
    /// Render diagnostics without colors.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Report syntax errors.
    Check { path: Utf8PathBuf },
    /// Print the syntax tree.
    Tree { path: Utf8PathBuf },
    /// Print every token with its trivia.
    Tokens { path: Utf8PathBuf },
    /// Apply one edit, reparse incrementally and report what was reused.
    Edit {
        path: Utf8PathBuf,
        #[arg(long)]
        at: u32,
        #[arg(long, default_value_t = 0)]
        delete: u32,
        #[arg(long, default_value = "")]
        insert: String,
        /// Print the new tree.
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("SPRIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = Options::parse();
    let renderer = if options.plain { Renderer::plain() } else { Renderer::styled() };
    let db = RootDatabase::default();

    match options.command {
        Command::Check { path } => {
            let file = load(&db, path)?;
            let diagnostics = check_file(&db, file);
            report(&renderer, file.path(&db).as_str(), file.text(&db), diagnostics);

            let errors = diagnostics.iter().filter(|d| d.severity().is_error()).count();
            if errors > 0 {
                bail!("{errors} error(s) in `{}`", file.path(&db));
            }
        }
        Command::Tree { path } => {
            let file = load(&db, path)?;
            print!("{}", syntax_tree(&db, file));
        }
        Command::Tokens { path } => {
            let file = load(&db, path)?;
            for token in syntax_tree(&db, file).tokens() {
                for trivia in token.leading_trivia() {
                    println!("  lead  {:?} {:?} {:?}", trivia.kind(), trivia.span(), trivia.text());
                }
                println!("{:?} {:?} {:?}", token.kind(), token.span(), token.text());
                for trivia in token.trailing_trivia() {
                    println!("  trail {:?} {:?} {:?}", trivia.kind(), trivia.span(), trivia.text());
                }
            }
        }
        Command::Edit { path, at, delete, insert, tree } => {
            let file = load(&db, path)?;
            let old = syntax_tree(&db, file);

            let span = edit_span(old.text().as_str(), at, delete)?;

            let new = old.with_text_changes(&[TextChange::new(span, insert)]);
            let (reused, total) = reused_tokens(&old, &new);
            tracing::info!(reused, total, "incremental reparse");
            println!("reused {reused} of {total} tokens");

            if tree {
                print!("{new}");
            }
            report(&renderer, file.path(&db).as_str(), new.text().as_str(), &new.diagnostics());
        }
    }

    Ok(())
}

fn load(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(db, path, text))
}

fn report(renderer: &Renderer, path: &str, text: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(renderer, path, text));
    }
}

/// The range `--at`/`--delete` select, checked against `text`.
fn edit_span(text: &str, at: u32, delete: u32) -> anyhow::Result<TextRange> {
    let Some(end) = at.checked_add(delete) else {
        bail!("edit at {at} deleting {delete} bytes overflows");
    };
    let span = TextRange::new(TextSize::new(at), TextSize::new(end));
    if span.end() > TextSize::of(text) {
        bail!("edit {span:?} is outside the file (length {})", text.len());
    }
    if !text.is_char_boundary(at as usize) || !text.is_char_boundary(end as usize) {
        bail!("edit {span:?} splits a character");
    }
    Ok(span)
}

/// How many token shapes of `new` were taken over from `old`, out of all of
/// `new`'s tokens.
fn reused_tokens(old: &SyntaxTree, new: &SyntaxTree) -> (usize, usize) {
    let old: HashSet<_> = old.shape().tokens().map(|token| token.as_ptr()).collect();
    let mut total = 0;
    let reused = new
        .shape()
        .tokens()
        .inspect(|_| total += 1)
        .filter(|token| old.contains(&token.as_ptr()))
        .count();
    (reused, total)
}
