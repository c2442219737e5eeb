//! Position-aware view over the green tree.
//!
//! Green nodes store lengths; these cursors add the absolute byte offset
//! while walking down, so ranges cost nothing to store and everything
//! untouched by an edit can be shared. Cursors are `Copy` and borrow the
//! [`crate::parser::Parse`] they came from.

use alloc::string::String;
use core::fmt::Write as _;
use core::ops::Range;

use bstr::ByteSlice;

use crate::green::{GreenElement, GreenNode, GreenToken};
use crate::kind::{Field, SyntaxKind};

/// A node cursor: an interior node plus its absolute start offset.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxNode<'a> {
    green: &'a GreenNode,
    offset: usize,
}

/// A leaf cursor. Its range covers the token text plus the trivia that
/// preceded it, which is what makes sibling ranges tile the parent.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxToken<'a> {
    green: &'a GreenToken,
    offset: usize,
}

/// Either cursor.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxElement<'a> {
    Node(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

impl<'a> SyntaxNode<'a> {
    pub(crate) fn new_root(green: &'a GreenNode) -> SyntaxNode<'a> {
        SyntaxNode { green, offset: 0 }
    }

    pub(crate) fn green(&self) -> &'a GreenNode {
        self.green
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind
    }

    /// Absolute byte range of this node in the input.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.green.len
    }

    /// Whether input ended before this node's closing delimiter.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.green.incomplete
    }

    /// The covered bytes of `source`, surrounding trivia included.
    #[must_use]
    pub fn text<'s>(&self, source: &'s [u8]) -> &'s bstr::BStr {
        source.get(self.range()).unwrap_or_default().as_bstr()
    }

    /// All children, anonymous tokens included, in byte order.
    #[must_use]
    pub fn children(&self) -> Children<'a> {
        Children {
            inner: self.green.children.iter(),
            offset: self.offset,
        }
    }

    /// Children whose kind is named, skipping punctuation and delimiters.
    pub fn named_children(&self) -> impl Iterator<Item = SyntaxElement<'a>> {
        self.children().filter(|child| child.kind().is_named())
    }

    /// The child filling `field`, if the node has one. The slot index was
    /// resolved when the node was built, so only the preceding siblings'
    /// lengths are summed here.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<SyntaxElement<'a>> {
        let slot = match field {
            Field::Key => self.green.field_key,
            Field::Value => self.green.field_value,
        }? as usize;
        let child = self.green.children.get(slot)?;
        let offset = self.offset
            + self.green.children[..slot]
                .iter()
                .map(GreenElement::len)
                .sum::<usize>();
        Some(SyntaxElement::new(child, offset))
    }

    /// Renders the named skeleton of this subtree as an s-expression, with
    /// `key:`/`value:` prefixes on labelled children.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out, None);
        out
    }

    fn write_sexp(&self, out: &mut String, label: Option<&str>) {
        if !out.is_empty() {
            out.push(' ');
        }
        if let Some(label) = label {
            out.push_str(label);
            out.push(' ');
        }
        out.push('(');
        out.push_str(self.green.kind.name());
        for child in self.children() {
            let label = self.field_label(&child);
            match child {
                SyntaxElement::Node(node) => node.write_sexp(out, label),
                SyntaxElement::Token(token) => {
                    if token.kind().is_named() {
                        if let Some(label) = label {
                            let _ = write!(out, " {label}");
                        }
                        let _ = write!(out, " ({})", token.kind().name());
                    }
                }
            }
        }
        out.push(')');
    }

    fn field_label(&self, child: &SyntaxElement<'a>) -> Option<&'static str> {
        let start = child.range().start;
        for (field, label) in [(Field::Key, "key:"), (Field::Value, "value:")] {
            if let Some(slot) = self.field(field) {
                if slot.range().start == start {
                    return Some(label);
                }
            }
        }
        None
    }

    /// Renders the full tree, one element per line with kind, range, and
    /// (for leaves) the covered source bytes. Intended for test failures
    /// and debugging, not a stable format.
    #[must_use]
    pub fn debug_dump(&self, source: &[u8]) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, source, 0);
        out
    }

    fn dump_into(&self, out: &mut String, source: &[u8], depth: usize) {
        let range = self.range();
        let _ = writeln!(
            out,
            "{:indent$}{}@{}..{}{}",
            "",
            self.kind().name(),
            range.start,
            range.end,
            if self.is_incomplete() { " (incomplete)" } else { "" },
            indent = depth * 2,
        );
        for child in self.children() {
            match child {
                SyntaxElement::Node(node) => node.dump_into(out, source, depth + 1),
                SyntaxElement::Token(token) => {
                    let range = token.range();
                    let text = source
                        .get(range.clone())
                        .unwrap_or_default()
                        .as_bstr();
                    let _ = writeln!(
                        out,
                        "{:indent$}{}@{}..{} {:?}",
                        "",
                        token.kind().name(),
                        range.start,
                        range.end,
                        text,
                        indent = (depth + 1) * 2,
                    );
                }
            }
        }
    }
}

impl<'a> SyntaxToken<'a> {
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind
    }

    /// Absolute byte range, leading trivia included.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.green.len
    }

    /// The covered bytes of `source`, trivia included.
    #[must_use]
    pub fn text<'s>(&self, source: &'s [u8]) -> &'s bstr::BStr {
        source.get(self.range()).unwrap_or_default().as_bstr()
    }
}

impl<'a> SyntaxElement<'a> {
    fn new(green: &'a GreenElement, offset: usize) -> SyntaxElement<'a> {
        match green {
            GreenElement::Node(node) => SyntaxElement::Node(SyntaxNode {
                green: node,
                offset,
            }),
            GreenElement::Token(token) => SyntaxElement::Token(SyntaxToken {
                green: token,
                offset,
            }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(node) => node.kind(),
            SyntaxElement::Token(token) => token.kind(),
        }
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        match self {
            SyntaxElement::Node(node) => node.range(),
            SyntaxElement::Token(token) => token.range(),
        }
    }

    /// The node cursor, if this element is a node.
    #[must_use]
    pub fn as_node(&self) -> Option<SyntaxNode<'a>> {
        match self {
            SyntaxElement::Node(node) => Some(*node),
            SyntaxElement::Token(_) => None,
        }
    }
}

/// Iterator over a node's children with running offsets.
pub struct Children<'a> {
    inner: core::slice::Iter<'a, GreenElement>,
    offset: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = SyntaxElement<'a>;

    fn next(&mut self) -> Option<SyntaxElement<'a>> {
        let green = self.inner.next()?;
        let element = SyntaxElement::new(green, self.offset);
        self.offset += green.len();
        Some(element)
    }
}
