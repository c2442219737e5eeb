//! Incremental reparsing.
//!
//! An edit strictly inside an object, array, or string can be reparsed in
//! isolation: those constructs open with a delimiter that fixes the lexing
//! context of their interior, so a fragment parse starting fresh at the
//! opener sees exactly the tokens a full parse would. The reparsed subtree
//! is spliced over the old one and every sibling subtree is shared
//! untouched via `Arc`.
//!
//! The fragment result is validated before splicing; any mismatch (the
//! construct changed kind, spilled past its old footprint, was left
//! unterminated, or produced diagnostics) falls back to a full parse of
//! the new text. The fallback keeps `reparse` total and means the
//! incremental path never has to be correct for adversarial edits, only
//! detectably wrong.

use alloc::{sync::Arc, vec::Vec};
use core::ops::Range;

use crate::error::ParseError;
use crate::green::{GreenElement, GreenNode};
use crate::kind::SyntaxKind;
use crate::parser::{Parse, parse};

/// A byte-range replacement: `old_len` bytes at `start` in the old text
/// became `new_len` bytes in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset of the replaced range, identical in both texts.
    pub start: usize,
    /// Length of the replaced range in the old text.
    pub old_len: usize,
    /// Length of the replacement in the new text.
    pub new_len: usize,
}

impl Parse {
    /// Reparses after `edit` produced `new_text`, reusing unaffected
    /// subtrees of this parse where possible.
    ///
    /// The result is always equivalent to `parse(new_text)`; the edit
    /// descriptor only decides how much work that takes.
    #[must_use]
    pub fn reparse(&self, edit: &Edit, new_text: &[u8]) -> Parse {
        self.try_incremental(edit, new_text)
            .unwrap_or_else(|| parse(new_text))
    }

    fn try_incremental(&self, edit: &Edit, new_text: &[u8]) -> Option<Parse> {
        let old_text_len = self.root.len;
        let dirty = edit.start..edit.start.checked_add(edit.old_len)?;
        if dirty.end > old_text_len
            || new_text.len() != (old_text_len + edit.new_len).checked_sub(edit.old_len)?
        {
            return None;
        }

        let (path, node, offset) = find_candidate(&self.root, &dirty)?;
        let fragment_len = (node.len + edit.new_len).checked_sub(edit.old_len)?;
        let fragment = new_text.get(offset..offset + fragment_len)?;
        let fresh = parse(fragment);
        if !fresh.ok() {
            return None;
        }
        let replacement = sole_child(&fresh.root, node.kind, fragment.len())?;

        let root = splice(&self.root, &path, replacement);
        let node_old_end = offset + node.len;
        let opener_end = first_leaf_end(&node, offset);
        let shift = |pos: usize| {
            if pos >= node_old_end {
                (pos + edit.new_len) - edit.old_len
            } else {
                pos
            }
        };
        let mut errors = Vec::new();
        for error in &self.errors {
            // Diagnostics inside the old footprint are superseded by the
            // clean fragment; the rest keep their identity, shifted. Ones
            // ending on the opening delimiter stay: they describe the
            // boundary with the preceding sibling, which the fragment parse
            // cannot see.
            if offset <= error.range.start
                && error.range.end <= node_old_end
                && error.range.end > opener_end
            {
                continue;
            }
            errors.push(ParseError {
                kind: error.kind,
                range: shift(error.range.start)..shift(error.range.end),
            });
        }
        Some(Parse { root, errors })
    }
}

fn is_candidate(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Object | SyntaxKind::Array | SyntaxKind::String
    )
}

/// Descends from the root to the deepest candidate node that contains the
/// dirty range strictly inside its delimited interior: after the opening
/// delimiter's text and before the node's end. Bytes at or past the end
/// boundary can re-lex under the surrounding context, so they disqualify.
fn find_candidate(
    root: &Arc<GreenNode>,
    dirty: &Range<usize>,
) -> Option<(Vec<usize>, Arc<GreenNode>, usize)> {
    let mut best = None;
    let mut path = Vec::new();
    let mut current = Arc::clone(root);
    let mut offset = 0;
    loop {
        let mut next = None;
        let mut child_offset = offset;
        for (index, child) in current.children.iter().enumerate() {
            let end = child_offset + child.len();
            if child_offset <= dirty.start && dirty.end < end {
                if let GreenElement::Node(inner) = child {
                    next = Some((index, Arc::clone(inner), child_offset));
                }
                break;
            }
            child_offset = end;
        }
        let Some((index, inner, inner_offset)) = next else {
            return best;
        };
        path.push(index);
        if is_candidate(inner.kind) && first_leaf_end(&inner, inner_offset) <= dirty.start {
            best = Some((path.clone(), Arc::clone(&inner), inner_offset));
        }
        current = inner;
        offset = inner_offset;
    }
}

/// End offset of the leftmost leaf, i.e. of the opening delimiter's text.
fn first_leaf_end(node: &GreenNode, offset: usize) -> usize {
    match node.children.first() {
        Some(GreenElement::Token(token)) => offset + token.len,
        Some(GreenElement::Node(inner)) => first_leaf_end(inner, offset),
        None => offset + node.len,
    }
}

/// The fragment must have parsed as exactly the construct it replaces:
/// one document child of the same kind, complete, covering every byte.
fn sole_child(root: &GreenNode, kind: SyntaxKind, len: usize) -> Option<Arc<GreenNode>> {
    if root.children.len() != 1 {
        return None;
    }
    match root.children.first()? {
        GreenElement::Node(node) if node.kind == kind && node.len == len && !node.incomplete => {
            Some(Arc::clone(node))
        }
        _ => None,
    }
}

/// Rebuilds the spine above the replaced subtree; all off-spine children
/// are shared with the old tree.
fn splice(node: &GreenNode, path: &[usize], replacement: Arc<GreenNode>) -> Arc<GreenNode> {
    let Some((&index, rest)) = path.split_first() else {
        return replacement;
    };
    let mut children = node.children.clone();
    let spliced = match children.get(index) {
        Some(GreenElement::Node(child)) => Some(splice(child, rest, replacement)),
        _ => None,
    };
    if let Some(child) = spliced {
        children[index] = GreenElement::Node(child);
    }
    let len = children.iter().map(GreenElement::len).sum();
    Arc::new(GreenNode {
        kind: node.kind,
        len,
        children,
        field_key: node.field_key,
        field_value: node.field_value,
        incomplete: node.incomplete,
    })
}
