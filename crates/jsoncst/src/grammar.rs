//! The shift-reduce table.
//!
//! The automaton has two tiers of states. *Persistent* states survive
//! between tokens and carry a [`LexContext`]; their action rows live in a
//! dense matrix indexed by `[state][terminal]`. *Transient* states exist
//! only as goto/shift targets that reduce immediately on entry, before any
//! further lookahead; they need no action row.
//!
//! Lists (document items, object members, array elements, string content)
//! are not right-recursive productions. Each is a single stack slot that is
//! folded in place: `ListFirst` wraps the first item, `ListAppend` pushes
//! one more, and the closing production splices the accumulated children
//! into the parent node. Stack depth therefore tracks nesting depth, not
//! sequence length.
//!
//! Missing entries are not dead ends. A terminal with no action in the
//! current row becomes a transparent error leaf and the state is left
//! unchanged, so the table only describes the happy paths and recovery
//! falls out of the lookup failing.

use alloc::{boxed::Box, collections::BTreeMap};

use once_cell::race::OnceBox;

use crate::kind::{Field, LOOKAHEAD_KINDS, SyntaxKind};
use crate::scanner::LexContext;

/// Persistent states, in dense-row order.
pub(crate) mod state {
    /// Top level, between document items.
    pub const DOC: u8 = 0;
    /// Directly after `{`.
    pub const OBJ_FIRST: u8 = 1;
    /// Inside an object body, between members.
    pub const OBJ_REST: u8 = 2;
    /// After an object key, before `:` is known to exist.
    pub const PAIR_KEY: u8 = 3;
    /// After `key :`, expecting a value.
    pub const PAIR_VALUE: u8 = 4;
    /// Directly after `[`.
    pub const ARR_FIRST: u8 = 5;
    /// Inside an array body, between elements.
    pub const ARR_REST: u8 = 6;
    /// Directly after an opening `"`.
    pub const QS_FIRST_D: u8 = 7;
    /// Inside a `"…"` body.
    pub const QS_REST_D: u8 = 8;
    /// Directly after an opening `'`.
    pub const QS_FIRST_S: u8 = 9;
    /// Inside a `'…'` body.
    pub const QS_REST_S: u8 = 10;
    /// Directly after an opening `'''`.
    pub const ML_FIRST: u8 = 11;
    /// Inside a `'''…'''` body.
    pub const ML_REST: u8 = 12;

    // Transient states: each reduces the named production on entry.
    pub const T_DOC_APPEND: u8 = 13;
    pub const T_OBJ_LIST_FIRST: u8 = 14;
    pub const T_OBJ_APPEND: u8 = 15;
    pub const T_OBJ_EMPTY: u8 = 16;
    pub const T_OBJ_CLOSE: u8 = 17;
    pub const T_ARR_LIST_FIRST: u8 = 18;
    pub const T_ARR_APPEND: u8 = 19;
    pub const T_ARR_EMPTY: u8 = 20;
    pub const T_ARR_CLOSE: u8 = 21;
    pub const T_QS_LIST_FIRST: u8 = 22;
    pub const T_QS_APPEND: u8 = 23;
    pub const T_QS_EMPTY: u8 = 24;
    pub const T_QS_CLOSE: u8 = 25;
    pub const T_ML_LIST_FIRST: u8 = 26;
    pub const T_ML_APPEND: u8 = 27;
    pub const T_ML_EMPTY: u8 = 28;
    pub const T_ML_CLOSE: u8 = 29;
    pub const T_STR_Q: u8 = 30;
    pub const T_STR_ML: u8 = 31;
    pub const T_BOOL: u8 = 32;
    pub const T_PAIR_DONE: u8 = 33;
}

pub(crate) const DENSE_STATES: usize = 13;
pub(crate) const STATE_COUNT: usize = 34;

/// Production ids, indexing [`PRODUCTIONS`].
pub(crate) mod prod {
    pub const OBJ_EMPTY: u8 = 0;
    pub const OBJ_FULL: u8 = 1;
    pub const OBJ_OPEN_EOF: u8 = 2;
    pub const OBJ_BODY_EOF: u8 = 3;
    pub const ARR_EMPTY: u8 = 4;
    pub const ARR_FULL: u8 = 5;
    pub const ARR_OPEN_EOF: u8 = 6;
    pub const ARR_BODY_EOF: u8 = 7;
    pub const QS_EMPTY: u8 = 8;
    pub const QS_FULL: u8 = 9;
    pub const QS_OPEN_EOF: u8 = 10;
    pub const QS_BODY_EOF: u8 = 11;
    pub const ML_EMPTY: u8 = 12;
    pub const ML_FULL: u8 = 13;
    pub const ML_OPEN_EOF: u8 = 14;
    pub const ML_BODY_EOF: u8 = 15;
    pub const STR_Q: u8 = 16;
    pub const STR_ML: u8 = 17;
    pub const BOOL: u8 = 18;
    pub const PAIR_KEY: u8 = 19;
    pub const PAIR_COLON: u8 = 20;
    pub const PAIR_FULL: u8 = 21;
    pub const DOC_APPEND: u8 = 22;
    pub const OBJ_LIST_FIRST: u8 = 23;
    pub const OBJ_APPEND: u8 = 24;
    pub const ARR_LIST_FIRST: u8 = 25;
    pub const ARR_APPEND: u8 = 26;
    pub const QS_LIST_FIRST: u8 = 27;
    pub const QS_APPEND: u8 = 28;
    pub const ML_LIST_FIRST: u8 = 29;
    pub const ML_APPEND: u8 = 30;
}

/// What a reduce does with the popped symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Build {
    /// Build a node of the production's kind, splicing any popped list slot
    /// into the child sequence.
    Node,
    /// Start a list slot containing the single popped symbol.
    ListFirst,
    /// Fold the popped symbol into the popped list slot.
    ListAppend,
}

#[derive(Debug)]
pub(crate) struct Production {
    pub lhs: SyntaxKind,
    /// Number of grammar symbols popped; transparent leaves between them
    /// are swept along for free.
    pub arity: u8,
    pub build: Build,
    /// `(symbol position, field)` assignments, resolved to child indices at
    /// node build time.
    pub fields: &'static [(u8, Field)],
    /// Fired only at end of input; records a truncation diagnostic and
    /// marks the node incomplete.
    pub truncated: bool,
}

const fn node(lhs: SyntaxKind, arity: u8) -> Production {
    Production {
        lhs,
        arity,
        build: Build::Node,
        fields: &[],
        truncated: false,
    }
}

const fn truncated(lhs: SyntaxKind, arity: u8) -> Production {
    Production {
        lhs,
        arity,
        build: Build::Node,
        fields: &[],
        truncated: true,
    }
}

const fn list(lhs: SyntaxKind, build: Build) -> Production {
    Production {
        lhs,
        arity: match build {
            Build::ListFirst => 1,
            _ => 2,
        },
        build,
        fields: &[],
        truncated: false,
    }
}

pub(crate) static PRODUCTIONS: [Production; 31] = [
    node(SyntaxKind::Object, 2),
    node(SyntaxKind::Object, 3),
    truncated(SyntaxKind::Object, 1),
    truncated(SyntaxKind::Object, 2),
    node(SyntaxKind::Array, 2),
    node(SyntaxKind::Array, 3),
    truncated(SyntaxKind::Array, 1),
    truncated(SyntaxKind::Array, 2),
    node(SyntaxKind::QuotedString, 2),
    node(SyntaxKind::QuotedString, 3),
    truncated(SyntaxKind::QuotedString, 1),
    truncated(SyntaxKind::QuotedString, 2),
    node(SyntaxKind::MultilineString, 2),
    node(SyntaxKind::MultilineString, 3),
    truncated(SyntaxKind::MultilineString, 1),
    truncated(SyntaxKind::MultilineString, 2),
    node(SyntaxKind::String, 1),
    node(SyntaxKind::String, 1),
    node(SyntaxKind::Bool, 1),
    Production {
        lhs: SyntaxKind::Pair,
        arity: 1,
        build: Build::Node,
        fields: &[(0, Field::Key)],
        truncated: false,
    },
    Production {
        lhs: SyntaxKind::Pair,
        arity: 2,
        build: Build::Node,
        fields: &[(0, Field::Key)],
        truncated: false,
    },
    Production {
        lhs: SyntaxKind::Pair,
        arity: 3,
        build: Build::Node,
        fields: &[(0, Field::Key), (2, Field::Value)],
        truncated: false,
    },
    list(SyntaxKind::DocumentRepeat, Build::ListAppend),
    list(SyntaxKind::ObjectRepeat, Build::ListFirst),
    list(SyntaxKind::ObjectRepeat, Build::ListAppend),
    list(SyntaxKind::ArrayRepeat, Build::ListFirst),
    list(SyntaxKind::ArrayRepeat, Build::ListAppend),
    list(SyntaxKind::QuotedContentRepeat, Build::ListFirst),
    list(SyntaxKind::QuotedContentRepeat, Build::ListAppend),
    list(SyntaxKind::MultilineRepeat, Build::ListFirst),
    list(SyntaxKind::MultilineRepeat, Build::ListAppend),
];

/// Action for one `(state, terminal)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Shift(u8),
    /// Shift that begins a new list element inside a delimited body. The
    /// engine diagnoses a missing separator when nothing separated it from
    /// the previous element, then shifts normally.
    ShiftElement(u8),
    /// Reduce while holding the terminal as lookahead; it is re-dispatched
    /// against the state the goto lands in.
    Reduce(u8),
    /// No entry: the terminal becomes a transparent error leaf.
    Fail,
}

/// Action at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EofAction {
    Accept,
    Reduce(u8),
}

#[derive(Debug)]
pub(crate) struct StateData {
    /// Lexing rules for the next token requested in this state.
    pub context: LexContext,
    /// For transient states, the production reduced immediately on entry.
    pub entry_reduce: Option<u8>,
    /// Applied repeatedly at end of input until [`EofAction::Accept`].
    pub eof: EofAction,
}

pub(crate) struct GrammarTable {
    actions: [[Action; LOOKAHEAD_KINDS]; DENSE_STATES],
    gotos: BTreeMap<(u8, u16), u8>,
    states: [StateData; STATE_COUNT],
}

impl GrammarTable {
    /// The table is deterministic and input-independent; it is built once
    /// and shared by every parse on every thread.
    pub(crate) fn get() -> &'static GrammarTable {
        static TABLE: OnceBox<GrammarTable> = OnceBox::new();
        TABLE.get_or_init(|| Box::new(build()))
    }

    pub(crate) fn action(&self, state: u8, kind: SyntaxKind) -> Action {
        debug_assert!((state as usize) < DENSE_STATES);
        self.actions[state as usize][kind as usize]
    }

    pub(crate) fn goto(&self, state: u8, kind: SyntaxKind) -> Option<u8> {
        self.gotos.get(&(state, kind as u16)).copied()
    }

    pub(crate) fn state(&self, state: u8) -> &StateData {
        &self.states[state as usize]
    }
}

fn build() -> GrammarTable {
    use Action::{Reduce, Shift, ShiftElement};
    use SyntaxKind as K;
    use state as s;

    let mut actions = [[Action::Fail; LOOKAHEAD_KINDS]; DENSE_STATES];
    let mut set = |st: u8, kinds: &[K], action: Action| {
        for &kind in kinds {
            actions[st as usize][kind as usize] = action;
        }
    };

    let value_openers: &[(K, u8)] = &[
        (K::LBrace, s::OBJ_FIRST),
        (K::LBracket, s::ARR_FIRST),
        (K::DoubleQuote, s::QS_FIRST_D),
        (K::SingleQuote, s::QS_FIRST_S),
        (K::TripleQuote, s::ML_FIRST),
    ];

    // DOC: between top-level items. The document is separator-insensitive,
    // so stray separators fold into the item list instead of erroring.
    for &(kind, target) in value_openers {
        set(s::DOC, &[kind], Shift(target));
    }
    set(s::DOC, &[K::Number, K::Null, K::Separator], Shift(s::T_DOC_APPEND));
    set(s::DOC, &[K::True, K::False], Shift(s::T_BOOL));

    // OBJ_FIRST / OBJ_REST: key position. Keywords and numbers are valid
    // keys here, so `{true: 1}` keeps its literal spelling as the key. In
    // the body state a key start is an element start: every member after
    // the first must be preceded by a separator.
    let key_starts = &[K::BareKey, K::Number, K::True, K::False, K::Null];
    set(s::OBJ_FIRST, key_starts, Shift(s::PAIR_KEY));
    set(s::OBJ_FIRST, &[K::DoubleQuote], Shift(s::QS_FIRST_D));
    set(s::OBJ_FIRST, &[K::SingleQuote], Shift(s::QS_FIRST_S));
    set(s::OBJ_FIRST, &[K::TripleQuote], Shift(s::ML_FIRST));
    set(s::OBJ_REST, key_starts, ShiftElement(s::PAIR_KEY));
    set(s::OBJ_REST, &[K::DoubleQuote], ShiftElement(s::QS_FIRST_D));
    set(s::OBJ_REST, &[K::SingleQuote], ShiftElement(s::QS_FIRST_S));
    set(s::OBJ_REST, &[K::TripleQuote], ShiftElement(s::ML_FIRST));
    set(s::OBJ_FIRST, &[K::RBrace], Shift(s::T_OBJ_EMPTY));
    set(s::OBJ_REST, &[K::RBrace], Shift(s::T_OBJ_CLOSE));
    set(s::OBJ_REST, &[K::Separator], Shift(s::T_OBJ_APPEND));

    // PAIR_KEY: a colon extends the pair; anything that could start the
    // next member or close the object finishes it as a bare-key pair.
    set(s::PAIR_KEY, &[K::Colon], Shift(s::PAIR_VALUE));
    set(
        s::PAIR_KEY,
        &[
            K::Separator,
            K::RBrace,
            K::BareKey,
            K::Number,
            K::True,
            K::False,
            K::Null,
            K::DoubleQuote,
            K::SingleQuote,
            K::TripleQuote,
        ],
        Reduce(prod::PAIR_KEY),
    );

    // PAIR_VALUE: after `key :`. A would-be key or `}` means the value is
    // absent and the pair closes early; a separator here is an error leaf
    // so the missing value is visible in the tree.
    for &(kind, target) in value_openers {
        set(s::PAIR_VALUE, &[kind], Shift(target));
    }
    set(s::PAIR_VALUE, &[K::Number, K::Null], Shift(s::T_PAIR_DONE));
    set(s::PAIR_VALUE, &[K::True, K::False], Shift(s::T_BOOL));
    set(
        s::PAIR_VALUE,
        &[K::BareKey, K::RBrace],
        Reduce(prod::PAIR_COLON),
    );

    // ARR_FIRST: a leading separator has no element before it and stays an
    // error; ARR_REST folds separators into the element list, and an
    // element start there must have one before it.
    for &(kind, target) in value_openers {
        set(s::ARR_FIRST, &[kind], Shift(target));
        set(s::ARR_REST, &[kind], ShiftElement(target));
    }
    set(s::ARR_FIRST, &[K::True, K::False], Shift(s::T_BOOL));
    set(s::ARR_REST, &[K::True, K::False], ShiftElement(s::T_BOOL));
    set(s::ARR_FIRST, &[K::Number, K::Null], Shift(s::T_ARR_LIST_FIRST));
    set(s::ARR_FIRST, &[K::RBracket], Shift(s::T_ARR_EMPTY));
    set(
        s::ARR_REST,
        &[K::Number, K::Null],
        ShiftElement(s::T_ARR_APPEND),
    );
    set(s::ARR_REST, &[K::Separator], Shift(s::T_ARR_APPEND));
    set(s::ARR_REST, &[K::RBracket], Shift(s::T_ARR_CLOSE));

    // String bodies. The wrong quote kind has no action and recovers as an
    // error leaf, so `"a'b"` keeps `'` as an error inside the string.
    let content = &[K::StringContent, K::EscapeSequence];
    set(s::QS_FIRST_D, content, Shift(s::T_QS_LIST_FIRST));
    set(s::QS_FIRST_D, &[K::DoubleQuote], Shift(s::T_QS_EMPTY));
    set(s::QS_REST_D, content, Shift(s::T_QS_APPEND));
    set(s::QS_REST_D, &[K::DoubleQuote], Shift(s::T_QS_CLOSE));
    set(s::QS_FIRST_S, content, Shift(s::T_QS_LIST_FIRST));
    set(s::QS_FIRST_S, &[K::SingleQuote], Shift(s::T_QS_EMPTY));
    set(s::QS_REST_S, content, Shift(s::T_QS_APPEND));
    set(s::QS_REST_S, &[K::SingleQuote], Shift(s::T_QS_CLOSE));
    set(s::ML_FIRST, content, Shift(s::T_ML_LIST_FIRST));
    set(s::ML_FIRST, &[K::TripleQuote], Shift(s::T_ML_EMPTY));
    set(s::ML_REST, content, Shift(s::T_ML_APPEND));
    set(s::ML_REST, &[K::TripleQuote], Shift(s::T_ML_CLOSE));

    let mut gotos = BTreeMap::new();
    let mut goto = |st: u8, kind: K, target: u8| {
        gotos.insert((st, kind as u16), target);
    };

    // Completed values route through per-position transient states.
    for (st, target) in [
        (s::DOC, s::T_DOC_APPEND),
        (s::PAIR_VALUE, s::T_PAIR_DONE),
        (s::ARR_FIRST, s::T_ARR_LIST_FIRST),
        (s::ARR_REST, s::T_ARR_APPEND),
    ] {
        for kind in [K::Object, K::Array, K::String, K::Bool] {
            goto(st, kind, target);
        }
    }
    for st in [
        s::DOC,
        s::OBJ_FIRST,
        s::OBJ_REST,
        s::PAIR_VALUE,
        s::ARR_FIRST,
        s::ARR_REST,
    ] {
        goto(st, K::QuotedString, s::T_STR_Q);
        goto(st, K::MultilineString, s::T_STR_ML);
    }
    // In key position a completed string becomes a pair key.
    goto(s::OBJ_FIRST, K::String, s::PAIR_KEY);
    goto(s::OBJ_REST, K::String, s::PAIR_KEY);
    goto(s::OBJ_FIRST, K::Pair, s::T_OBJ_LIST_FIRST);
    goto(s::OBJ_REST, K::Pair, s::T_OBJ_APPEND);

    // List slots return to the body state of their construct.
    goto(s::DOC, K::DocumentRepeat, s::DOC);
    goto(s::OBJ_FIRST, K::ObjectRepeat, s::OBJ_REST);
    goto(s::ARR_FIRST, K::ArrayRepeat, s::ARR_REST);
    goto(s::QS_FIRST_D, K::QuotedContentRepeat, s::QS_REST_D);
    goto(s::QS_FIRST_S, K::QuotedContentRepeat, s::QS_REST_S);
    goto(s::ML_FIRST, K::MultilineRepeat, s::ML_REST);

    let persistent = |context, eof| StateData {
        context,
        entry_reduce: None,
        eof,
    };
    let transient = |production| StateData {
        // Entry reduces fire before any token is requested, so the context
        // and EOF action of a transient state are never consulted.
        context: LexContext::Value,
        entry_reduce: Some(production),
        eof: EofAction::Accept,
    };

    let states = [
        persistent(LexContext::Value, EofAction::Accept),
        persistent(LexContext::ObjectFirst, EofAction::Reduce(prod::OBJ_OPEN_EOF)),
        persistent(LexContext::ObjectBody, EofAction::Reduce(prod::OBJ_BODY_EOF)),
        persistent(LexContext::ObjectBody, EofAction::Reduce(prod::PAIR_KEY)),
        persistent(LexContext::ObjectBody, EofAction::Reduce(prod::PAIR_COLON)),
        persistent(LexContext::Value, EofAction::Reduce(prod::ARR_OPEN_EOF)),
        persistent(LexContext::ValueInBody, EofAction::Reduce(prod::ARR_BODY_EOF)),
        persistent(LexContext::QuotedDouble, EofAction::Reduce(prod::QS_OPEN_EOF)),
        persistent(LexContext::QuotedDouble, EofAction::Reduce(prod::QS_BODY_EOF)),
        persistent(LexContext::QuotedSingle, EofAction::Reduce(prod::QS_OPEN_EOF)),
        persistent(LexContext::QuotedSingle, EofAction::Reduce(prod::QS_BODY_EOF)),
        persistent(LexContext::Multiline, EofAction::Reduce(prod::ML_OPEN_EOF)),
        persistent(LexContext::Multiline, EofAction::Reduce(prod::ML_BODY_EOF)),
        transient(prod::DOC_APPEND),
        transient(prod::OBJ_LIST_FIRST),
        transient(prod::OBJ_APPEND),
        transient(prod::OBJ_EMPTY),
        transient(prod::OBJ_FULL),
        transient(prod::ARR_LIST_FIRST),
        transient(prod::ARR_APPEND),
        transient(prod::ARR_EMPTY),
        transient(prod::ARR_FULL),
        transient(prod::QS_LIST_FIRST),
        transient(prod::QS_APPEND),
        transient(prod::QS_EMPTY),
        transient(prod::QS_FULL),
        transient(prod::ML_LIST_FIRST),
        transient(prod::ML_APPEND),
        transient(prod::ML_EMPTY),
        transient(prod::ML_FULL),
        transient(prod::STR_Q),
        transient(prod::STR_ML),
        transient(prod::BOOL),
        transient(prod::PAIR_FULL),
    ];

    GrammarTable {
        actions,
        gotos,
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_rows_cover_every_persistent_state() {
        let table = GrammarTable::get();
        for st in 0..DENSE_STATES as u8 {
            assert!(table.state(st).entry_reduce.is_none());
        }
        for st in DENSE_STATES as u8..STATE_COUNT as u8 {
            assert!(table.state(st).entry_reduce.is_some());
        }
    }

    #[test]
    fn shift_targets_and_gotos_stay_in_range() {
        let table = GrammarTable::get();
        for row in &table.actions {
            for action in row {
                match *action {
                    Action::Shift(target) | Action::ShiftElement(target) => {
                        assert!((target as usize) < STATE_COUNT);
                    }
                    Action::Reduce(p) => assert!((p as usize) < PRODUCTIONS.len()),
                    Action::Fail => {}
                }
            }
        }
        for (&(st, _), &target) in &table.gotos {
            assert!((st as usize) < DENSE_STATES);
            assert!((target as usize) < STATE_COUNT);
        }
    }

    #[test]
    fn element_starts_are_marked_only_in_body_states() {
        // Separator checking only makes sense between elements, and a
        // separator can never itself be an element start.
        let table = GrammarTable::get();
        for (st, row) in table.actions.iter().enumerate() {
            for (kind, action) in row.iter().enumerate() {
                if matches!(action, Action::ShiftElement(_)) {
                    assert!(
                        st == state::OBJ_REST as usize || st == state::ARR_REST as usize,
                        "state {st}"
                    );
                    assert_ne!(kind, SyntaxKind::Separator as usize);
                }
            }
        }
    }

    #[test]
    fn eof_reductions_shrink_the_stack() {
        // Every EOF reduce must consume at least one symbol so the drain
        // loop at end of input terminates.
        let table = GrammarTable::get();
        for st in 0..DENSE_STATES as u8 {
            if let EofAction::Reduce(p) = table.state(st).eof {
                assert!(PRODUCTIONS[p as usize].arity >= 1);
            }
        }
    }

    #[test]
    fn truncated_productions_build_incomplete_nodes() {
        for production in &PRODUCTIONS {
            if production.truncated {
                assert_eq!(production.build, Build::Node);
            }
        }
    }
}
