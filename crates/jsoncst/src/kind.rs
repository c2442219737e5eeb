//! Grammar symbols shared by the scanner, the parse table, and the tree.

/// The kind of a token or syntax node.
///
/// Terminals and nonterminals share one flat enumeration, mirroring the
/// symbol table of the original grammar. Kinds are *named* when they are
/// semantically visible to consumers (structural navigation, highlighting)
/// and *anonymous* when they are punctuation or helper symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// End of input. Never stored in a tree.
    Eof = 0,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// One logical element separator: a run of `,` and/or newlines.
    Separator,
    /// A numeric literal in any supported base.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// An unquoted object key.
    BareKey,
    /// A line (`#`, `//`) or block (`/* */`) comment.
    Comment,
    /// `"`
    DoubleQuote,
    /// `'`
    SingleQuote,
    /// `'''`
    TripleQuote,
    /// A run of literal string content.
    StringContent,
    /// `\` followed by one of `" / \ b f n r t u`.
    EscapeSequence,
    /// A leaf covering bytes that matched no rule or no parse action.
    Error,

    /// The root node: a sequence of top-level values.
    Document,
    /// `{ … }`
    Object,
    /// One object entry: a key, optionally `:` and a value.
    Pair,
    /// `[ … ]`
    Array,
    /// Any string form.
    String,
    /// `"…"` or `'…'`
    QuotedString,
    /// `'''…'''`
    MultilineString,
    /// `true` or `false` wrapped as a value.
    Bool,

    // Hidden list symbols. They only exist as goto keys in the parse table;
    // their children are spliced into the enclosing node at reduce time.
    #[doc(hidden)]
    DocumentRepeat,
    #[doc(hidden)]
    ObjectRepeat,
    #[doc(hidden)]
    ArrayRepeat,
    #[doc(hidden)]
    QuotedContentRepeat,
    #[doc(hidden)]
    MultilineRepeat,
}

/// Number of terminal kinds that can appear as parser lookahead, used to
/// size the dense tier of the action table.
pub(crate) const LOOKAHEAD_KINDS: usize = SyntaxKind::Error as usize;

impl SyntaxKind {
    /// Whether this kind is visible to named-tree consumers.
    #[must_use]
    pub fn is_named(self) -> bool {
        matches!(
            self,
            SyntaxKind::Number
                | SyntaxKind::Null
                | SyntaxKind::BareKey
                | SyntaxKind::Comment
                | SyntaxKind::EscapeSequence
                | SyntaxKind::Error
                | SyntaxKind::Document
                | SyntaxKind::Object
                | SyntaxKind::Pair
                | SyntaxKind::Array
                | SyntaxKind::String
                | SyntaxKind::QuotedString
                | SyntaxKind::MultilineString
                | SyntaxKind::Bool
        )
    }

    /// The stable display name of this kind.
    ///
    /// Named kinds use identifier-style names; anonymous tokens use their
    /// literal spelling. These names are part of the public contract and
    /// never change between releases.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::Eof => "end",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Colon => ":",
            SyntaxKind::Separator => "separator",
            SyntaxKind::Number => "number",
            SyntaxKind::True => "true",
            SyntaxKind::False => "false",
            SyntaxKind::Null => "null",
            SyntaxKind::BareKey => "bare_key",
            SyntaxKind::Comment => "comment",
            SyntaxKind::DoubleQuote => "\"",
            SyntaxKind::SingleQuote => "'",
            SyntaxKind::TripleQuote => "'''",
            SyntaxKind::StringContent => "string_content",
            SyntaxKind::EscapeSequence => "escape_sequence",
            SyntaxKind::Error => "ERROR",
            SyntaxKind::Document => "document",
            SyntaxKind::Object => "object",
            SyntaxKind::Pair => "pair",
            SyntaxKind::Array => "array",
            SyntaxKind::String => "string",
            SyntaxKind::QuotedString => "quoted_string",
            SyntaxKind::MultilineString => "multiline_string",
            SyntaxKind::Bool => "bool",
            SyntaxKind::DocumentRepeat => "document_repeat",
            SyntaxKind::ObjectRepeat => "object_repeat",
            SyntaxKind::ArrayRepeat => "array_repeat",
            SyntaxKind::QuotedContentRepeat => "quoted_string_content_repeat",
            SyntaxKind::MultilineRepeat => "multiline_string_repeat",
        }
    }

    /// Error and comment leaves attach to the parse stack without counting
    /// toward production arity; reduces sweep them into children in byte
    /// order.
    pub(crate) fn is_transparent(self) -> bool {
        matches!(self, SyntaxKind::Error | SyntaxKind::Comment)
    }
}

/// A named child slot on a [`SyntaxKind::Pair`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The key of an object entry: its first grammar child.
    Key,
    /// The value of an object entry: the grammar child after `:`, when
    /// present.
    Value,
}
