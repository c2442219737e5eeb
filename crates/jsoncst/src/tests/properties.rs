use alloc::vec::Vec;

use quickcheck_macros::quickcheck;

use crate::edit::Edit;
use crate::error::{ParseError, ParseErrorKind};
use crate::green::{GreenElement, GreenNode};
use crate::kind::SyntaxKind;
use crate::parser::parse;

fn leaf_ranges(node: &GreenNode, offset: usize, out: &mut Vec<(usize, usize)>) {
    let mut cursor = offset;
    for child in &node.children {
        match child {
            GreenElement::Token(token) => out.push((cursor, cursor + token.len)),
            GreenElement::Node(inner) => leaf_ranges(inner, cursor, out),
        }
        cursor += child.len();
    }
}

fn has_error_leaf(node: &GreenNode) -> bool {
    node.children.iter().any(|child| match child {
        GreenElement::Token(token) => token.kind == SyntaxKind::Error,
        GreenElement::Node(inner) => has_error_leaf(inner),
    })
}

fn has_incomplete(node: &GreenNode) -> bool {
    node.incomplete
        || node.children.iter().any(|child| match child {
            GreenElement::Node(inner) => has_incomplete(inner),
            GreenElement::Token(_) => false,
        })
}

fn sorted_errors(errors: &[ParseError]) -> Vec<(usize, usize, u8)> {
    let mut out: Vec<_> = errors
        .iter()
        .map(|error| {
            let rank = match error.kind {
                ParseErrorKind::Lex => 0,
                ParseErrorKind::Syntax => 1,
                ParseErrorKind::Truncated => 2,
            };
            (error.range.start, error.range.end, rank)
        })
        .collect();
    out.sort_unstable();
    out
}

#[quickcheck]
fn every_input_yields_a_document_covering_it(input: Vec<u8>) -> bool {
    let parse = parse(&input);
    parse.root().range() == (0..input.len())
}

#[quickcheck]
fn leaves_tile_the_input(input: Vec<u8>) -> bool {
    let parse = parse(&input);
    let mut ranges = Vec::new();
    leaf_ranges(&parse.root, 0, &mut ranges);
    let mut cursor = 0;
    for (start, end) in ranges {
        if start != cursor || end < start {
            return false;
        }
        cursor = end;
    }
    // All-trivia input has no leaves; the document owns the bytes itself.
    cursor == input.len() || (cursor == 0 && parse.root.len == input.len())
}

#[quickcheck]
fn error_ranges_stay_in_bounds(input: Vec<u8>) -> bool {
    parse(&input)
        .errors()
        .iter()
        .all(|error| error.range.start <= error.range.end && error.range.end <= input.len())
}

#[quickcheck]
fn clean_parses_have_no_error_artifacts(input: Vec<u8>) -> bool {
    let parse = parse(&input);
    if !parse.ok() {
        return true;
    }
    !has_error_leaf(&parse.root) && !has_incomplete(&parse.root)
}

#[quickcheck]
fn parsing_is_deterministic(input: Vec<u8>) -> bool {
    let first = parse(&input);
    let second = parse(&input);
    *first.root == *second.root && first.errors() == second.errors()
}

#[quickcheck]
fn reparse_is_equivalent_to_a_full_parse(
    old: Vec<u8>,
    replacement: Vec<u8>,
    at: usize,
    span: usize,
) -> bool {
    let start = at % (old.len() + 1);
    let old_len = span % (old.len() - start + 1);
    let mut new = Vec::with_capacity(old.len() - old_len + replacement.len());
    new.extend_from_slice(&old[..start]);
    new.extend_from_slice(&replacement);
    new.extend_from_slice(&old[start + old_len..]);

    let edit = Edit {
        start,
        old_len,
        new_len: replacement.len(),
    };
    let incremental = parse(&old).reparse(&edit, &new);
    let full = parse(&new);
    *incremental.root == *full.root
        && sorted_errors(incremental.errors()) == sorted_errors(full.errors())
}
