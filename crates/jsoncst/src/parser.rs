//! The parse engine.
//!
//! A single loop drives the table in [`crate::grammar`]: scan one token
//! under the lexing context of the current state, then shift or reduce per
//! the action row. Two things make the engine total:
//!
//! - Scanner failures and missing table entries both become *transparent*
//!   stack entries: error leaves that keep their bytes but do not count as
//!   grammar symbols and do not change the state. Reduces sweep them into
//!   the children of whatever node closes over them.
//! - End of input drains the stack through per-state reductions that close
//!   every open construct, so there is always a document to return.
//!
//! The engine allocates green nodes only at reduce time and never revisits
//! consumed input, so a parse is one left-to-right pass.

use alloc::{sync::Arc, vec, vec::Vec};

use crate::error::{ParseError, ParseErrorKind};
use crate::grammar::{Action, Build, EofAction, GrammarTable, PRODUCTIONS, state};
use crate::green::{GreenElement, GreenNode, GreenToken, widen_last};
use crate::kind::SyntaxKind;
use crate::scanner::{Scan, Token, next_token};
use crate::syntax::SyntaxNode;

/// The result of a parse: a tree covering the whole input plus the
/// diagnostics recorded along the way.
///
/// There is no failure variant. Malformed input shows up as error leaves
/// and incomplete nodes in the tree, with one [`ParseError`] per incident.
#[derive(Debug, Clone)]
pub struct Parse {
    pub(crate) root: Arc<GreenNode>,
    pub(crate) errors: Vec<ParseError>,
}

impl Parse {
    /// The root document node.
    #[must_use]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new_root(&self.root)
    }

    /// Diagnostics in input order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether the input parsed without any diagnostic.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses `input` into a concrete syntax tree. Total: every byte sequence
/// yields a document whose leaves tile the input exactly.
#[must_use]
pub fn parse(input: &[u8]) -> Parse {
    Engine::new(input).run()
}

enum StackItem {
    Token(GreenToken),
    Node(Arc<GreenNode>),
    /// An in-place list fold; spliced into its parent's children when the
    /// construct closes.
    List(Vec<GreenElement>),
}

struct Entry {
    /// The automaton state after this entry was pushed. Transparent
    /// entries copy the state beneath them so they are invisible to
    /// lookups.
    state: u8,
    transparent: bool,
    item: StackItem,
}

struct Engine<'a> {
    input: &'a [u8],
    table: &'static GrammarTable,
    stack: Vec<Entry>,
    errors: Vec<ParseError>,
    /// Bytes consumed so far; also the start of the next token's leading
    /// trivia.
    consumed: usize,
    /// Whether a separator was consumed since the last element ended.
    /// Consulted by element-start shifts in body states; error leaves count
    /// as separation so an already-diagnosed stretch is not reported twice.
    separated: bool,
}

impl<'a> Engine<'a> {
    fn new(input: &'a [u8]) -> Engine<'a> {
        Engine {
            input,
            table: GrammarTable::get(),
            // The document item list is seeded at the bottom of the stack,
            // so top-level values append to it like any other list fold.
            stack: vec![Entry {
                state: state::DOC,
                transparent: false,
                item: StackItem::List(Vec::new()),
            }],
            errors: Vec::new(),
            consumed: 0,
            separated: true,
        }
    }

    fn run(mut self) -> Parse {
        loop {
            let context = self.table.state(self.top_state()).context;
            match next_token(self.input, self.consumed, context) {
                Scan::Eof { .. } => break,
                Scan::Failure {
                    start,
                    text_start,
                    end,
                } => {
                    self.errors.push(ParseError {
                        kind: ParseErrorKind::Lex,
                        range: text_start..end,
                    });
                    self.push_transparent(SyntaxKind::Error, end - start);
                    self.consumed = end;
                    self.separated = true;
                }
                Scan::Token(token) => {
                    self.consumed = token.end;
                    self.dispatch(token);
                }
            }
        }
        self.finish()
    }

    fn top_state(&self) -> u8 {
        self.stack.last().map_or(state::DOC, |entry| entry.state)
    }

    fn push_transparent(&mut self, kind: SyntaxKind, len: usize) {
        let current = self.top_state();
        self.stack.push(Entry {
            state: current,
            transparent: true,
            item: StackItem::Token(GreenToken { kind, len }),
        });
    }

    /// Runs the action loop for one token. A `Reduce` action keeps the
    /// token as held lookahead and re-dispatches it against the state the
    /// goto lands in; recovery consumes it as a transparent error leaf.
    fn dispatch(&mut self, token: Token) {
        let len = token.end - token.start;
        if token.kind == SyntaxKind::Comment {
            self.push_transparent(SyntaxKind::Comment, len);
            return;
        }
        loop {
            match self.table.action(self.top_state(), token.kind) {
                action @ (Action::Shift(target) | Action::ShiftElement(target)) => {
                    if matches!(action, Action::ShiftElement(_)) && !self.separated {
                        // The tree keeps its shape; only the diagnostic
                        // records that the separator is missing.
                        self.errors.push(ParseError {
                            kind: ParseErrorKind::Syntax,
                            range: token.text_start..token.end,
                        });
                    }
                    self.stack.push(Entry {
                        state: target,
                        transparent: false,
                        item: StackItem::Token(GreenToken {
                            kind: token.kind,
                            len,
                        }),
                    });
                    self.separated = token.kind == SyntaxKind::Separator;
                    self.drain_entry_reduces();
                    return;
                }
                Action::Reduce(production) => {
                    self.reduce(production);
                    self.drain_entry_reduces();
                }
                Action::Fail => {
                    self.errors.push(ParseError {
                        kind: ParseErrorKind::Syntax,
                        range: token.text_start..token.end,
                    });
                    self.push_transparent(SyntaxKind::Error, len);
                    self.separated = true;
                    return;
                }
            }
        }
    }

    fn drain_entry_reduces(&mut self) {
        while let Some(production) = self.table.state(self.top_state()).entry_reduce {
            self.reduce(production);
        }
    }

    /// Pops the production's symbols (sweeping transparent leaves along in
    /// byte order), builds the result, and pushes it at its goto state.
    fn reduce(&mut self, production: u8) {
        let production = &PRODUCTIONS[production as usize];
        let mut collected = Vec::new();
        let mut symbols = 0;
        while symbols < production.arity {
            let Some(entry) = self.stack.pop() else { break };
            if !entry.transparent {
                symbols += 1;
            }
            collected.push(entry);
        }
        collected.reverse();

        // List slots splice inline, so children come out flat and in byte
        // order no matter how many transparent leaves were swept.
        let mut children = Vec::new();
        for entry in collected {
            match entry.item {
                StackItem::Token(token) => children.push(GreenElement::Token(token)),
                StackItem::Node(node) => children.push(GreenElement::Node(node)),
                StackItem::List(mut items) => children.append(&mut items),
            }
        }

        let item = match production.build {
            Build::ListFirst | Build::ListAppend => StackItem::List(children),
            Build::Node => {
                let node =
                    GreenNode::new(production.lhs, children, production.fields, production.truncated);
                if production.truncated {
                    self.errors.push(ParseError {
                        kind: ParseErrorKind::Truncated,
                        range: self.consumed.saturating_sub(node.len)..self.consumed,
                    });
                }
                StackItem::Node(Arc::new(node))
            }
        };

        let under = self.top_state();
        let target = self.table.goto(under, production.lhs).unwrap_or(under);
        self.stack.push(Entry {
            state: target,
            transparent: false,
            item,
        });
    }

    /// Closes every open construct, attaches trailing trivia, and builds
    /// the document.
    fn finish(mut self) -> Parse {
        loop {
            match self.table.state(self.top_state()).eof {
                EofAction::Accept => break,
                EofAction::Reduce(production) => {
                    self.reduce(production);
                    self.drain_entry_reduces();
                }
            }
        }

        let mut children = Vec::new();
        for entry in self.stack.drain(..) {
            match entry.item {
                StackItem::Token(token) => children.push(GreenElement::Token(token)),
                StackItem::Node(node) => children.push(GreenElement::Node(node)),
                StackItem::List(mut items) => children.append(&mut items),
            }
        }

        let trailing = self.input.len() - self.consumed;
        if trailing > 0 {
            widen_last(&mut children, trailing);
        }
        let mut root = GreenNode::new(SyntaxKind::Document, children, &[], false);
        if root.children.is_empty() {
            // Empty or all-trivia input: the document owns the bytes.
            root.len = self.input.len();
        }
        Parse {
            root: Arc::new(root),
            errors: self.errors,
        }
    }
}
