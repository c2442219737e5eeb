//! A tolerant parser for a JSON superset, producing concrete syntax trees.
//!
//! The dialect extends JSON with line (`#`, `//`) and block (`/* */`)
//! comments, single- and triple-quoted strings, bare object keys, binary/
//! octal/hex integer literals, and newline-or-comma element separators with
//! an optional trailing separator.
//!
//! The parser is built for editor tooling rather than data loading:
//!
//! - **Totality.** [`parse`] returns a tree for *every* input, including
//!   empty buffers, truncated documents, and arbitrary garbage bytes.
//!   Malformed input degrades into error leaves; it never aborts the parse.
//! - **Concrete trees.** Every byte of the input is covered by exactly one
//!   leaf, so the tree round-trips to the source text and byte ranges are
//!   usable for position translation.
//! - **Field labels.** `pair` nodes label their children with `key` and
//!   `value` fields, looked up in O(1).
//! - **Incremental reparsing.** [`Parse::reparse`] accepts an [`Edit`]
//!   descriptor and re-parses only the narrowest enclosing node when the
//!   edit permits, splicing the result into the shared remainder.
//!
//! ```
//! use jsoncst::SyntaxKind;
//!
//! let parse = jsoncst::parse(b"{a, b: 0x1F} // flags");
//! let doc = parse.root();
//! assert_eq!(doc.kind(), SyntaxKind::Document);
//! assert_eq!(
//!     doc.to_sexp(),
//!     "(document (object (pair key: (bare_key)) \
//!      (pair key: (bare_key) value: (number))) (comment))"
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod edit;
mod error;
mod grammar;
mod green;
mod kind;
mod parser;
mod scanner;
mod syntax;

#[cfg(test)]
mod tests;

pub use edit::Edit;
pub use error::{ParseError, ParseErrorKind};
pub use kind::{Field, SyntaxKind};
pub use parser::{Parse, parse};
pub use syntax::{SyntaxElement, SyntaxNode, SyntaxToken};
