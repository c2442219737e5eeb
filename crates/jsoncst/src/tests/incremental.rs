use alloc::sync::Arc;

use crate::edit::Edit;
use crate::error::ParseErrorKind;
use crate::green::{GreenElement, GreenNode};
use crate::parser::parse;

/// The green node at a child-index path from the root.
fn node_at(root: &Arc<GreenNode>, path: &[usize]) -> Arc<GreenNode> {
    let mut current = Arc::clone(root);
    for &index in path {
        let child = match &current.children[index] {
            GreenElement::Node(node) => Arc::clone(node),
            GreenElement::Token(token) => panic!("expected a node, found {:?}", token.kind),
        };
        current = child;
    }
    current
}

#[test]
fn edit_inside_an_array_reuses_sibling_pairs() {
    let old_text = b"{a: 1, b: [2, 3]}";
    let new_text = b"{a: 1, b: [20, 3]}";
    let old = parse(old_text);
    assert!(old.ok());

    let edit = Edit {
        start: 11,
        old_len: 1,
        new_len: 2,
    };
    let new = old.reparse(&edit, new_text);
    assert!(new.ok());
    assert_eq!(*new.root, *parse(new_text).root);

    // Document and object are on the rebuilt spine; the first pair is not
    // and must be the same allocation as before the edit.
    let old_pair = node_at(&old.root, &[0, 1]);
    let new_pair = node_at(&new.root, &[0, 1]);
    assert!(Arc::ptr_eq(&old_pair, &new_pair));

    // The edited pair's subtree was rebuilt.
    let old_edited = node_at(&old.root, &[0, 3]);
    let new_edited = node_at(&new.root, &[0, 3]);
    assert!(!Arc::ptr_eq(&old_edited, &new_edited));
}

#[test]
fn edit_inside_string_content_stays_local() {
    let old_text = b"[{x: 0}, 'hello', {y: 1}]";
    let new_text = b"[{x: 0}, 'help', {y: 1}]";
    let old = parse(old_text);
    // "hello" -> "help": replace "llo" with "lp".
    let edit = Edit {
        start: 12,
        old_len: 3,
        new_len: 2,
    };
    let new = old.reparse(&edit, new_text);
    assert_eq!(*new.root, *parse(new_text).root);

    // Both object elements survive by pointer.
    for path in [&[0, 1], &[0, 5]] {
        assert!(Arc::ptr_eq(
            &node_at(&old.root, path),
            &node_at(&new.root, path)
        ));
    }
}

#[test]
fn edit_that_fixes_an_error_discards_its_diagnostic() {
    let old_text = b"[1, @] 2";
    let new_text = b"[1, 5] 2";
    let old = parse(old_text);
    assert_eq!(old.errors().len(), 1);
    assert_eq!(old.errors()[0].kind, ParseErrorKind::Lex);

    let edit = Edit {
        start: 4,
        old_len: 1,
        new_len: 1,
    };
    let new = old.reparse(&edit, new_text);
    assert!(new.ok());
    assert_eq!(*new.root, *parse(new_text).root);
}

#[test]
fn diagnostics_after_the_edit_shift_with_it() {
    let old_text = b"[1] @";
    let new_text = b"[100] @";
    let old = parse(old_text);
    assert_eq!(old.errors()[0].range, 4..5);

    let edit = Edit {
        start: 1,
        old_len: 1,
        new_len: 3,
    };
    let new = old.reparse(&edit, new_text);
    assert_eq!(new.errors()[0].range, 6..7);
    assert_eq!(*new.root, *parse(new_text).root);
}

#[test]
fn diagnostics_on_the_opening_delimiter_survive_a_splice() {
    // The missing separator before the inner array is diagnosed at its
    // opening bracket. The fragment parse starts at that bracket and cannot
    // see the boundary, so the splice must keep the old diagnostic.
    let old_text = b"[{x: 0} [1, 2]]";
    let new_text = b"[{x: 0} [100, 2]]";
    let old = parse(old_text);
    assert_eq!(old.errors().len(), 1);
    assert_eq!(old.errors()[0].kind, ParseErrorKind::Syntax);
    assert_eq!(old.errors()[0].range, 8..9);

    let edit = Edit {
        start: 9,
        old_len: 1,
        new_len: 3,
    };
    let new = old.reparse(&edit, new_text);

    // The object sibling is shared, so this went through the splice.
    assert!(Arc::ptr_eq(
        &node_at(&old.root, &[0, 1]),
        &node_at(&new.root, &[0, 1])
    ));
    let full = parse(new_text);
    assert_eq!(*new.root, *full.root);
    assert_eq!(new.errors(), full.errors());
    assert_eq!(new.errors()[0].range, 8..9);
}

#[test]
fn edit_producing_a_dirty_fragment_falls_back_to_a_full_parse() {
    let old_text = b"[1, 2]";
    // Inserting an opening quote leaves the fragment unterminated, so the
    // incremental path must refuse it.
    let new_text = b"[1, \"2]";
    let old = parse(old_text);
    let edit = Edit {
        start: 4,
        old_len: 0,
        new_len: 1,
    };
    let new = old.reparse(&edit, new_text);
    let full = parse(new_text);
    assert_eq!(*new.root, *full.root);
    assert_eq!(new.errors(), full.errors());
    assert!(!new.ok());
}

#[test]
fn edit_touching_a_delimiter_falls_back_to_a_full_parse() {
    let old_text = b"[1, 2]";
    let new_text = b"[1, 2";
    let old = parse(old_text);
    let edit = Edit {
        start: 5,
        old_len: 1,
        new_len: 0,
    };
    let new = old.reparse(&edit, new_text);
    let full = parse(new_text);
    assert_eq!(*new.root, *full.root);
    assert_eq!(new.errors(), full.errors());
}

#[test]
fn inconsistent_edit_descriptors_are_ignored() {
    let old = parse(b"[1]");
    // old_len reaches past the old text; reparse must still return the
    // correct tree for the new text.
    let edit = Edit {
        start: 2,
        old_len: 10,
        new_len: 1,
    };
    let new = old.reparse(&edit, b"{}");
    assert_eq!(*new.root, *parse(b"{}").root);
}

#[test]
fn whole_document_edits_work_without_a_candidate() {
    let old = parse(b"1");
    let edit = Edit {
        start: 0,
        old_len: 1,
        new_len: 2,
    };
    let new = old.reparse(&edit, b"{}");
    assert_eq!(*new.root, *parse(b"{}").root);
}
