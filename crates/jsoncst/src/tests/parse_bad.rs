use alloc::{vec, vec::Vec};

use rstest::rstest;

use crate::error::ParseErrorKind;
use crate::parser::parse;
use crate::syntax::{SyntaxElement, SyntaxNode};

fn find_incomplete(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    if node.is_incomplete() {
        return Some(node);
    }
    node.children()
        .filter_map(|child| child.as_node())
        .find_map(find_incomplete)
}

#[rstest]
#[case(b"{" as &[u8], "(document (object))")]
#[case(b"[", "(document (array))")]
#[case(b"[1, 2", "(document (array (number) (number)))")]
#[case(b"{a: ", "(document (object (pair key: (bare_key))))")]
#[case(b"\"abc", "(document (string (quoted_string)))")]
#[case(b"'''half", "(document (string (multiline_string)))")]
fn truncated_input_keeps_the_construct(#[case] input: &[u8], #[case] sexp: &str) {
    let parse = parse(input);
    assert_eq!(parse.root().to_sexp(), sexp, "\n{}", parse.root().debug_dump(input));
    assert!(
        parse
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::Truncated)
    );
    assert!(find_incomplete(parse.root()).is_some());
    assert_eq!(parse.root().range(), 0..input.len());
}

#[test]
fn truncated_range_spans_the_open_construct() {
    let parse = parse(b"[1, 2");
    let errors = parse.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::Truncated);
    assert_eq!(errors[0].range, 0..5);
}

#[test]
fn nested_truncation_reports_inside_out() {
    let parse = parse(b"[{");
    let kinds: Vec<_> = parse.errors().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, [ParseErrorKind::Truncated, ParseErrorKind::Truncated]);
    assert_eq!(parse.errors()[0].range, 1..2);
    assert_eq!(parse.errors()[1].range, 0..2);
}

#[rstest]
#[case(
    b"{a: , b: 1}" as &[u8],
    "(document (object (pair key: (bare_key) (ERROR)) \
     (pair key: (bare_key) value: (number))))",
    ParseErrorKind::Syntax,
    4..5
)]
#[case(b"@", "(document (ERROR))", ParseErrorKind::Lex, 0..1)]
#[case(
    b"[,1]",
    "(document (array (ERROR) (number)))",
    ParseErrorKind::Syntax,
    1..2
)]
#[case(
    b"[1 : 2]",
    "(document (array (number) (ERROR) (number)))",
    ParseErrorKind::Syntax,
    3..4
)]
#[case(
    b"\"a\nb\"",
    "(document (string (quoted_string (ERROR))))",
    ParseErrorKind::Lex,
    2..3
)]
#[case(
    b"'a\"b'",
    "(document (string (quoted_string (ERROR))))",
    ParseErrorKind::Syntax,
    2..3
)]
#[case(
    b"\"a\\qb\"",
    "(document (string (quoted_string (ERROR))))",
    ParseErrorKind::Lex,
    2..3
)]
fn malformed_input_degrades_to_error_leaves(
    #[case] input: &[u8],
    #[case] sexp: &str,
    #[case] kind: ParseErrorKind,
    #[case] range: core::ops::Range<usize>,
) {
    let parse = parse(input);
    assert_eq!(parse.root().to_sexp(), sexp, "\n{}", parse.root().debug_dump(input));
    assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
    assert_eq!(parse.errors()[0].kind, kind);
    assert_eq!(parse.errors()[0].range, range);
    assert_eq!(parse.root().range(), 0..input.len());
}

#[test]
fn consecutive_separators_are_tolerated() {
    for input in [b"[1,,2]" as &[u8], b"[1 , , 2]", b"[1\n\n2]"] {
        let parse = parse(input);
        assert!(parse.ok(), "{input:?}: {:?}", parse.errors());
    }
}

#[rstest]
#[case(
    b"[1 2]" as &[u8],
    "(document (array (number) (number)))",
    3..4
)]
#[case(
    b"{a: 1 b: 2}",
    "(document (object (pair key: (bare_key) value: (number)) \
     (pair key: (bare_key) value: (number))))",
    6..7
)]
#[case(
    b"{a b}",
    "(document (object (pair key: (bare_key)) (pair key: (bare_key))))",
    3..4
)]
#[case(
    b"['a' 'b']",
    "(document (array (string (quoted_string)) (string (quoted_string))))",
    5..6
)]
fn missing_separator_keeps_the_shape_but_is_diagnosed(
    #[case] input: &[u8],
    #[case] sexp: &str,
    #[case] range: core::ops::Range<usize>,
) {
    // Both elements survive in the tree; the gap between them is the
    // diagnostic, pointing at the start of the second element.
    let parse = parse(input);
    assert_eq!(parse.root().to_sexp(), sexp, "\n{}", parse.root().debug_dump(input));
    assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
    assert_eq!(parse.errors()[0].kind, ParseErrorKind::Syntax);
    assert_eq!(parse.errors()[0].range, range);
}

#[test]
fn garbage_between_elements_stays_inside_the_array() {
    let input = b"[1, @@, 2]";
    let parse = parse(input);
    assert_eq!(
        parse.root().to_sexp(),
        "(document (array (number) (ERROR) (number)))"
    );
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].kind, ParseErrorKind::Lex);
    assert_eq!(parse.errors()[0].range, 4..6);
}

#[test]
fn error_leaves_still_tile_the_input() {
    let input = b"{a: , b: 1}";
    let parse = parse(input);
    let mut cursor = 0;
    let mut stack = vec![SyntaxElement::Node(parse.root())];
    let mut leaves = Vec::new();
    while let Some(element) = stack.pop() {
        match element {
            SyntaxElement::Node(node) => {
                let mut children: Vec<_> = node.children().collect();
                children.reverse();
                stack.extend(children);
            }
            SyntaxElement::Token(token) => leaves.push(token.range()),
        }
    }
    for range in leaves {
        assert_eq!(range.start, cursor);
        cursor = range.end;
    }
    assert_eq!(cursor, input.len());
}

#[test]
fn document_never_fails_to_materialize() {
    // A few shapes that historically trip tolerant parsers.
    for input in [
        b"}" as &[u8],
        b"]",
        b":",
        b",",
        b"{{{{",
        b"]]]]",
        b"''''",
        b"\\",
        b"{:},",
        b"[}",
    ] {
        let parse = parse(input);
        assert_eq!(parse.root().range(), 0..input.len(), "{input:?}");
    }
}
