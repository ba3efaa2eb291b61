use salsa::Setter as _;
use sprig_db::{Diagnostic, File, RootDatabase, check_file, syntax_tree};
use sprig_yellow::SyntaxKind;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Expected {
    line: u32,
    message: String,
}

/// Collects `//~ ERROR message` annotations; the line is the one the
/// annotation sits on.
fn parse_expectations(fixture: &str) -> Vec<Expected> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("//~") else {
            continue;
        };
        let comment = comment.trim();
        let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
        if comment.is_empty() {
            continue;
        }
        let line = u32::try_from(idx).unwrap() + 1;
        expected.push(Expected { line, message: comment.to_owned() });
    }

    expected.sort();
    expected
}

fn collect_actual(diagnostics: &[Diagnostic]) -> Vec<Expected> {
    let mut actual = diagnostics
        .iter()
        .map(|d| Expected { line: d.location().line + 1, message: d.message().to_owned() })
        .collect::<Vec<_>>();
    actual.sort();
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.sprig".into(), fixture.to_owned());

    let actual = collect_actual(check_file(&db, file));
    let expected = parse_expectations(fixture);
    assert_eq!(actual, expected);
}

#[test]
fn clean_file() {
    check(
        r#"
fn fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}
var s = "fib";
"#,
    );
}

#[test]
fn syntax_errors() {
    check(
        r#"
var = 1; //~ ERROR unexpected token '=', expected identifier
fn f(a b) {} //~ ERROR unexpected token identifier, expected ','
var x = 0xFFFFFFFFFFFFFFFFFF; //~ ERROR '0xFFFFFFFFFFFFFFFFFF' is not a valid 'int'
$x = 2; //~ ERROR unknown character '$'
"#,
    );
}

#[test]
fn reparses_when_text_changes() {
    let mut db = RootDatabase::default();
    let file = File::new(&db, "edit.sprig".into(), "var x = ;".to_owned());
    assert_eq!(check_file(&db, file).len(), 1);

    file.set_text(&mut db).to("var x = 1;".to_owned());
    assert!(check_file(&db, file).is_empty());

    let tree = syntax_tree(&db, file);
    assert_eq!(tree.full_text(), "var x = 1;");
    assert_eq!(tree.text().path().map(|path| path.as_str()), Some("edit.sprig"));
    assert_eq!(tree.find_token(8.into()).kind(), SyntaxKind::NUMBER);
}

#[test]
fn shape_is_shared_between_trees() {
    let db = RootDatabase::default();
    let file = File::new(&db, "shared.sprig".into(), "a;".to_owned());

    let first = syntax_tree(&db, file);
    let second = syntax_tree(&db, file);
    assert!(first.shape().ptr_eq(second.shape()));
    assert!(file.parse(&db).root.ptr_eq(first.shape()));
}
