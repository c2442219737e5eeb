#![no_main]

use jsoncst::{SyntaxElement, parse};
use libfuzzer_sys::fuzz_target;

// Totality: any byte soup yields a document whose leaves tile it exactly
// and whose diagnostics stay in bounds.
fuzz_target!(|data: &[u8]| {
    let result = parse(data);
    let root = result.root();
    assert_eq!(root.range(), 0..data.len());

    let mut cursor = 0;
    let mut saw_leaf = false;
    let mut stack = vec![SyntaxElement::Node(root)];
    while let Some(element) = stack.pop() {
        match element {
            SyntaxElement::Node(node) => {
                let mut children: Vec<_> = node.children().collect();
                children.reverse();
                stack.extend(children);
            }
            SyntaxElement::Token(token) => {
                let range = token.range();
                assert_eq!(range.start, cursor);
                cursor = range.end;
                saw_leaf = true;
            }
        }
    }
    if saw_leaf {
        assert_eq!(cursor, data.len());
    }

    for error in result.errors() {
        assert!(error.range.start <= error.range.end);
        assert!(error.range.end <= data.len());
    }
});
