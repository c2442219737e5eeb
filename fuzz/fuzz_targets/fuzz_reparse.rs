#![no_main]

use arbitrary::Arbitrary;
use jsoncst::{Edit, parse};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Case {
    old: Vec<u8>,
    replacement: Vec<u8>,
    at: usize,
    span: usize,
}

// Incremental reparsing must be indistinguishable from a full parse of the
// edited text, whichever path it takes.
fuzz_target!(|case: Case| {
    let start = case.at % (case.old.len() + 1);
    let old_len = case.span % (case.old.len() - start + 1);
    let mut new = Vec::with_capacity(case.old.len() - old_len + case.replacement.len());
    new.extend_from_slice(&case.old[..start]);
    new.extend_from_slice(&case.replacement);
    new.extend_from_slice(&case.old[start + old_len..]);

    let edit = Edit {
        start,
        old_len,
        new_len: case.replacement.len(),
    };
    let incremental = parse(&case.old).reparse(&edit, &new);
    let full = parse(&new);

    assert_eq!(
        incremental.root().debug_dump(&new),
        full.root().debug_dump(&new)
    );
    assert_eq!(incremental.errors().len(), full.errors().len());
});
