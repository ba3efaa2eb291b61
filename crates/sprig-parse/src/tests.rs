use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use sprig_yellow::SyntaxKind::*;
use sprig_yellow::{ShapeNode, SyntaxTree};

use crate::parse;

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "sprig" {
                    let expected = path.with_extension("tree");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

fn dump(tree: &SyntaxTree) -> String {
    let diagnostics = tree
        .diagnostics()
        .iter()
        .map(|d| format!("  {:?} {}", d.range(), d.message()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{tree}\nErrors:\n{diagnostics}")
}

#[test]
fn parse_test_data() {
    let cases = TestCase::list();
    assert!(!cases.is_empty());

    for case in cases {
        let tree = parse(&case.text);
        assert_eq!(tree.full_text(), case.text, "{} is not lossless", case.input.display());
        expect_file![&case.expected].assert_eq(&dump(&tree));
    }
}

/// Renders an expression with explicit grouping.
fn grouped(shape: &ShapeNode) -> String {
    let slot = |index: usize| shape.slot(index).map_or(String::new(), grouped);
    match shape.kind() {
        NAME_EXPR | LITERAL_EXPR => shape.full_text().trim().to_owned(),
        PAREN_EXPR => slot(1),
        UNARY_EXPR => format!("({} {})", slot(0), slot(1)),
        BINARY_EXPR | ASSIGN_EXPR => format!("({} {} {})", slot(0), slot(1), slot(2)),
        CALL_EXPR => format!("{}{}", slot(0), slot(1)),
        ARG_LIST => {
            let args = shape.slot(1).map(|list| {
                let items: Vec<&ShapeNode> = if list.is_list() {
                    (0..list.slot_count()).filter_map(|i| list.slot(i)).collect()
                } else {
                    vec![list]
                };
                items
                    .into_iter()
                    .filter(|item| item.kind() != COMMA)
                    .map(grouped)
                    .collect::<Vec<_>>()
                    .join(", ")
            });
            format!("[{}]", args.unwrap_or_default())
        }
        _ => shape.full_text().trim().to_owned(),
    }
}

fn first_expr(text: &str) -> String {
    let tree = parse(text);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
    let statement = tree.shape().slot(0).unwrap();
    assert_eq!(statement.kind(), EXPR_STMT);
    grouped(statement.slot(0).unwrap())
}

#[test]
fn binary_precedence() {
    assert_eq!(first_expr("1 + 2 * 3;"), "(1 + (2 * 3))");
    assert_eq!(first_expr("1 - 2 - 3;"), "((1 - 2) - 3)");
    assert_eq!(first_expr("a || b && c == d < e;"), "(a || (b && (c == (d < e))))");
    assert_eq!(first_expr("a | b ^ c & d;"), "(a | (b ^ (c & d)))");
    assert_eq!(first_expr("(1 + 2) % 3;"), "((1 + 2) % 3)");
}

#[test]
fn unary_and_calls() {
    assert_eq!(first_expr("-f(1, x)(y);"), "(- f[1, x][y])");
    assert_eq!(first_expr("!~+a;"), "(! (~ (+ a)))");
    assert_eq!(first_expr("f();"), "f[]");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(first_expr("a = b = c + 1;"), "(a = (b = (c + 1)))");
}

#[test]
fn semicolon_is_optional_after_expressions() {
    let tree = parse("a b;\nc");
    assert!(tree.diagnostics().is_empty());
    assert_eq!(tree.shape().slot(0).map(ShapeNode::slot_count), Some(3));

    let tree = parse("var a = 1");
    let messages: Vec<_> =
        tree.diagnostics().iter().map(|d| d.message().to_owned()).collect();
    assert_eq!(messages, ["expected ';' at end of input"]);
}

#[test]
fn assignment_to_non_name_is_an_error() {
    let tree = parse("a + b = c;");
    let messages: Vec<_> =
        tree.diagnostics().iter().map(|d| d.message().to_owned()).collect();
    assert_eq!(messages, ["unexpected token '='"]);
    assert_eq!(tree.full_text(), "a + b = c;");
}

#[test]
fn missing_expression() {
    let tree = parse("var x = ;");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "expected expression");
    assert_eq!(diagnostics[0].range(), text_size::TextRange::new(8.into(), 9.into()));
}

#[test]
fn unclosed_block_reports_at_end_of_input() {
    let tree = parse("fn f() {\n  return 1;\n");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "expected '}' at end of input");
    assert_eq!(diagnostics[0].location().line, 2);
}

#[test]
fn missing_parameter_list_reports_once() {
    let tree = parse("fn f { }");
    let messages: Vec<_> =
        tree.diagnostics().iter().map(|d| d.message().to_owned()).collect();
    assert_eq!(messages, ["unexpected token '{', expected '('"]);
}

#[test]
fn empty_if_body() {
    let tree = parse("if (a) else b;");
    let messages: Vec<_> =
        tree.diagnostics().iter().map(|d| d.message().to_owned()).collect();
    assert_eq!(messages, ["expected statement"]);

    let statement = tree.shape().slot(0).unwrap();
    assert_eq!(statement.kind(), IF_STMT);
    assert_eq!(statement.slot(5).map(ShapeNode::kind), Some(ELSE_CLAUSE));
}

#[test]
fn bad_characters_become_skipped_trivia() {
    let tree = parse("a @ b;");
    let messages: Vec<_> =
        tree.diagnostics().iter().map(|d| d.message().to_owned()).collect();
    assert_eq!(messages, ["unknown character '@'"]);

    let name = tree.find_token(4.into());
    assert_eq!(name.text(), "b");
    assert_eq!(
        name.leading_trivia().map(|t| t.kind()).collect::<Vec<_>>(),
        [SKIPPED_TOKENS_TRIVIA]
    );
}

#[test]
fn lossless_on_garbage() {
    for text in ["", ")))", "fn (", "var", "if (", "{{{", "\"open", "/* x", "a,,b", "f(,)"] {
        let tree = parse(text);
        assert_eq!(tree.full_text(), text);
        assert_eq!(tree.tokens().last().map(|t| t.kind()), Some(EOF));
    }
}
