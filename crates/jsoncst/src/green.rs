//! Immutable length-based tree storage.
//!
//! Nodes store the byte length of their subtree rather than absolute
//! offsets, so an incremental splice can share every untouched subtree via
//! `Arc` and only rebuild the spine above the edit. Absolute ranges are
//! recomputed by the red view in [`crate::syntax`].

use alloc::{sync::Arc, vec::Vec};

use crate::kind::{Field, SyntaxKind};

/// A leaf: one token with the trivia that preceded it folded into its
/// length, so sibling lengths always tile the parent exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GreenToken {
    pub kind: SyntaxKind,
    pub len: usize,
}

/// A child of a green node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GreenElement {
    Node(Arc<GreenNode>),
    Token(GreenToken),
}

impl GreenElement {
    pub(crate) fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Node(n) => n.kind,
            GreenElement::Token(t) => t.kind,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            GreenElement::Node(n) => n.len,
            GreenElement::Token(t) => t.len,
        }
    }
}

/// An interior node, created only at reduce time and immutable afterwards.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct GreenNode {
    pub kind: SyntaxKind,
    pub len: usize,
    pub children: Vec<GreenElement>,
    /// Child index of the `key` field, resolved at build time.
    pub field_key: Option<u16>,
    /// Child index of the `value` field, resolved at build time.
    pub field_value: Option<u16>,
    /// Whether the closing delimiter is missing because input ended first.
    pub incomplete: bool,
}

impl GreenNode {
    /// Builds a node from ordered children, resolving the production's
    /// field map (symbol positions) to concrete child indices. Transparent
    /// leaves swept in by recovery do not count as symbol positions.
    pub(crate) fn new(
        kind: SyntaxKind,
        children: Vec<GreenElement>,
        fields: &[(u8, Field)],
        incomplete: bool,
    ) -> GreenNode {
        let len = children.iter().map(GreenElement::len).sum();
        let mut field_key = None;
        let mut field_value = None;
        if !fields.is_empty() {
            let mut sym = 0u8;
            for (index, child) in children.iter().enumerate() {
                if child.kind().is_transparent() {
                    continue;
                }
                for &(position, field) in fields {
                    if position == sym {
                        let slot = u16::try_from(index).ok();
                        match field {
                            Field::Key => field_key = slot,
                            Field::Value => field_value = slot,
                        }
                    }
                }
                sym += 1;
            }
        }
        GreenNode {
            kind,
            len,
            children,
            field_key,
            field_value,
            incomplete,
        }
    }
}

/// Extends the rightmost leaf under `children` by `extra` bytes, rebuilding
/// the spine of nodes above it. Used once per parse to attach trailing
/// trivia at end of input.
pub(crate) fn widen_last(children: &mut Vec<GreenElement>, extra: usize) -> bool {
    let Some(last) = children.last_mut() else {
        return false;
    };
    match last {
        GreenElement::Token(token) => {
            token.len += extra;
            true
        }
        GreenElement::Node(node) => {
            let mut widened = GreenNode {
                kind: node.kind,
                len: node.len,
                children: node.children.clone(),
                field_key: node.field_key,
                field_value: node.field_value,
                incomplete: node.incomplete,
            };
            if widen_last(&mut widened.children, extra) {
                widened.len += extra;
                *last = GreenElement::Node(Arc::new(widened));
                true
            } else {
                false
            }
        }
    }
}
