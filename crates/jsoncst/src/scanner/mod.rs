//! Context-sensitive tokenizer.
//!
//! [`next_token`] is a pure function of the remaining input and the lexing
//! context of the parser state that requested the token; no token is ever
//! lexed against more than one context. Contexts differ in three ways:
//!
//! - whether a newline is trivia or may start a separator run,
//! - whether unquoted atom runs may classify as bare keys,
//! - whether the scanner is inside quoted or triple-quoted string content.
//!
//! Trivia is never emitted as a token. Instead the bytes skipped before a
//! token are folded into that token's range as leading padding, which is
//! what makes leaf ranges tile the input exactly.
//!
//! Comments are scanned in *every* context, including string content: a
//! content run stops at `#`, `//` or `/*` rather than swallowing the
//! comment as literal text. This matches the original grammar, where
//! comments are valid extras everywhere.
//!
//! A position matching no rule yields [`Scan::Failure`] for the caller's
//! recovery path; the scanner itself never fails hard.

use crate::kind::SyntaxKind;


/// The token rules active at a parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexContext {
    /// Value position at the top level or directly after `[`. Newline is
    /// trivia.
    Value,
    /// Element position inside an array body. Newline may start a
    /// separator.
    ValueInBody,
    /// Key position directly after `{`. Bare keys; newline is trivia.
    ObjectFirst,
    /// Inside an object body after a key, `:`, pair, or separator. Bare
    /// keys; newline may start a separator.
    ObjectBody,
    /// Inside a `"…"` string.
    QuotedDouble,
    /// Inside a `'…'` string.
    QuotedSingle,
    /// Inside a `'''…'''` string. Newlines are trivia so the literal can
    /// span lines.
    Multiline,
}

impl LexContext {
    fn newline_is_separator(self) -> bool {
        matches!(self, LexContext::ValueInBody | LexContext::ObjectBody)
    }

    fn bare_keys(self) -> bool {
        matches!(self, LexContext::ObjectFirst | LexContext::ObjectBody)
    }
}

/// A classified token. `start..end` includes leading trivia;
/// `text_start..end` is the token text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: SyntaxKind,
    pub start: usize,
    pub text_start: usize,
    pub end: usize,
}

/// One scanning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    Token(Token),
    /// No rule matched at `text_start`. The range is kept as an error leaf
    /// and scanning resumes at `end`.
    Failure {
        start: usize,
        text_start: usize,
        end: usize,
    },
    /// End of input, with `start` marking where any trailing trivia began.
    Eof { start: usize },
}

const ESCAPABLE: &[u8] = b"\"/\\bfnrtu";

/// Returns the next token of `input` at `pos` under `ctx`.
pub(crate) fn next_token(input: &[u8], pos: usize, ctx: LexContext) -> Scan {
    match ctx {
        LexContext::QuotedDouble | LexContext::QuotedSingle => scan_quoted(input, pos),
        LexContext::Multiline => scan_multiline(input, pos),
        _ => scan_structural(input, pos, ctx),
    }
}

fn scan_structural(input: &[u8], start: usize, ctx: LexContext) -> Scan {
    let mut p = start;
    while p < input.len() {
        match input[p] {
            b' ' | b'\t' | b'\r' => p += 1,
            b'\n' if !ctx.newline_is_separator() => p += 1,
            _ => break,
        }
    }
    if p == input.len() {
        return Scan::Eof { start };
    }
    let token = |kind, end| {
        Scan::Token(Token {
            kind,
            start,
            text_start: p,
            end,
        })
    };
    match input[p] {
        b'{' => token(SyntaxKind::LBrace, p + 1),
        b'}' => token(SyntaxKind::RBrace, p + 1),
        b'[' => token(SyntaxKind::LBracket, p + 1),
        b']' => token(SyntaxKind::RBracket, p + 1),
        b':' => token(SyntaxKind::Colon, p + 1),
        b',' | b'\n' => token(SyntaxKind::Separator, separator_end(input, p)),
        b'"' => token(SyntaxKind::DoubleQuote, p + 1),
        b'\'' => {
            if input[p..].starts_with(b"'''") {
                token(SyntaxKind::TripleQuote, p + 3)
            } else {
                token(SyntaxKind::SingleQuote, p + 1)
            }
        }
        b'#' => token(SyntaxKind::Comment, line_comment_end(input, p)),
        b'/' => match input.get(p + 1) {
            Some(b'/') => token(SyntaxKind::Comment, line_comment_end(input, p)),
            Some(b'*') => token(SyntaxKind::Comment, block_comment_end(input, p)),
            _ => Scan::Failure {
                start,
                text_start: p,
                end: p + 1,
            },
        },
        b'\\' => Scan::Failure {
            start,
            text_start: p,
            end: p + 1,
        },
        _ => {
            let end = atom_end(input, p);
            match classify_atom(&input[p..end], ctx) {
                Some(kind) => token(kind, end),
                None => Scan::Failure {
                    start,
                    text_start: p,
                    end,
                },
            }
        }
    }
}

fn scan_quoted(input: &[u8], start: usize) -> Scan {
    let p = start;
    if p == input.len() {
        return Scan::Eof { start };
    }
    let token = |kind, end| {
        Scan::Token(Token {
            kind,
            start,
            text_start: p,
            end,
        })
    };
    match input[p] {
        b'"' => token(SyntaxKind::DoubleQuote, p + 1),
        b'\'' => token(SyntaxKind::SingleQuote, p + 1),
        b'\\' => scan_escape(input, start, p),
        b'#' => token(SyntaxKind::Comment, line_comment_end(input, p)),
        b'/' if matches!(input.get(p + 1), Some(b'/')) => {
            token(SyntaxKind::Comment, line_comment_end(input, p))
        }
        b'/' if matches!(input.get(p + 1), Some(b'*')) => {
            token(SyntaxKind::Comment, block_comment_end(input, p))
        }
        b'\n' => Scan::Failure {
            start,
            text_start: p,
            end: p + 1,
        },
        _ => {
            let mut q = p;
            while q < input.len() {
                match input[q] {
                    b'"' | b'\'' | b'\\' | b'\n' | b'#' => break,
                    b'/' if matches!(input.get(q + 1), Some(b'/' | b'*')) => break,
                    _ => q += 1,
                }
            }
            token(SyntaxKind::StringContent, q)
        }
    }
}

fn scan_multiline(input: &[u8], start: usize) -> Scan {
    let mut p = start;
    while p < input.len() && matches!(input[p], b'\n' | b'\r') {
        p += 1;
    }
    if p == input.len() {
        return Scan::Eof { start };
    }
    let token = |kind, end| {
        Scan::Token(Token {
            kind,
            start,
            text_start: p,
            end,
        })
    };
    match input[p] {
        b'\'' => {
            if input[p..].starts_with(b"'''") {
                token(SyntaxKind::TripleQuote, p + 3)
            } else {
                // A lone quote (or two) is not content and not a closer.
                let mut q = p + 1;
                while q < input.len() && input[q] == b'\'' {
                    q += 1;
                }
                Scan::Failure {
                    start,
                    text_start: p,
                    end: q,
                }
            }
        }
        b'"' => Scan::Failure {
            start,
            text_start: p,
            end: p + 1,
        },
        b'\\' => scan_escape(input, start, p),
        b'#' => token(SyntaxKind::Comment, line_comment_end(input, p)),
        b'/' if matches!(input.get(p + 1), Some(b'/')) => {
            token(SyntaxKind::Comment, line_comment_end(input, p))
        }
        b'/' if matches!(input.get(p + 1), Some(b'*')) => {
            token(SyntaxKind::Comment, block_comment_end(input, p))
        }
        _ => {
            let mut q = p;
            while q < input.len() {
                match input[q] {
                    b'\'' | b'"' | b'\\' | b'\n' | b'\r' | b'#' => break,
                    b'/' if matches!(input.get(q + 1), Some(b'/' | b'*')) => break,
                    _ => q += 1,
                }
            }
            token(SyntaxKind::StringContent, q)
        }
    }
}

/// `\` plus exactly one escapable character. Any other byte after the
/// backslash matches no rule at all; the failure lands on the backslash
/// byte, which is deliberate and load-bearing for recovery.
fn scan_escape(input: &[u8], start: usize, p: usize) -> Scan {
    match input.get(p + 1) {
        Some(c) if ESCAPABLE.contains(c) => Scan::Token(Token {
            kind: SyntaxKind::EscapeSequence,
            start,
            text_start: p,
            end: p + 2,
        }),
        _ => Scan::Failure {
            start,
            text_start: p,
            end: p + 1,
        },
    }
}

/// A separator is one maximal run of `,` and/or newlines; blank space
/// between run members is absorbed so `", \n"` stays a single token.
fn separator_end(input: &[u8], p: usize) -> usize {
    let mut end = p + 1;
    loop {
        let mut q = end;
        while q < input.len() && matches!(input[q], b' ' | b'\t' | b'\r') {
            q += 1;
        }
        if q < input.len() && matches!(input[q], b',' | b'\n') {
            end = q + 1;
        } else {
            return end;
        }
    }
}

fn line_comment_end(input: &[u8], p: usize) -> usize {
    let mut q = p;
    while q < input.len() && input[q] != b'\n' {
        q += 1;
    }
    q
}

/// Block comments are accepted up to end of input when the closing `*/` is
/// missing; truncation here is not an error.
fn block_comment_end(input: &[u8], p: usize) -> usize {
    let mut q = p + 2;
    while q + 1 < input.len() {
        if input[q] == b'*' && input[q + 1] == b'/' {
            return q + 2;
        }
        q += 1;
    }
    input.len()
}

/// A maximal run of bytes that are not structural. Longest match: the whole
/// run is classified at once, so `truex` is a bare key rather than `true`
/// followed by garbage, and `0x1.5` is never a number.
fn atom_end(input: &[u8], p: usize) -> usize {
    let mut q = p;
    while q < input.len() {
        match input[q] {
            b' ' | b'\t' | b'\r' | b'\n' | b'{' | b'}' | b'[' | b']' | b':' | b',' | b'"'
            | b'\'' | b'#' | b'/' | b'\\' => break,
            _ => q += 1,
        }
    }
    q
}

fn classify_atom(run: &[u8], ctx: LexContext) -> Option<SyntaxKind> {
    match run {
        b"true" => Some(SyntaxKind::True),
        b"false" => Some(SyntaxKind::False),
        b"null" => Some(SyntaxKind::Null),
        _ if is_number(run) => Some(SyntaxKind::Number),
        _ if ctx.bare_keys() => Some(SyntaxKind::BareKey),
        _ => None,
    }
}

fn is_number(run: &[u8]) -> bool {
    let digits = run.strip_prefix(b"-").unwrap_or(run);
    if digits.is_empty() {
        return false;
    }
    if digits.len() > 2 && digits[0] == b'0' {
        // Alternate bases never combine with a fraction or exponent.
        match digits[1] {
            b'b' => return digits[2..].iter().all(|b| matches!(b, b'0' | b'1')),
            b'o' => return digits[2..].iter().all(|b| matches!(b, b'0'..=b'7')),
            b'x' => return digits[2..].iter().all(u8::is_ascii_hexdigit),
            _ => {}
        }
    }
    is_decimal(digits)
}

fn is_decimal(digits: &[u8]) -> bool {
    let mut i = 0;
    let n = digits.len();
    while i < n && digits[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 {
        return false;
    }
    if i < n && digits[i] == b'.' {
        i += 1;
        let fraction = i;
        while i < n && digits[i].is_ascii_digit() {
            i += 1;
        }
        if i == fraction {
            return false;
        }
    }
    if i < n && matches!(digits[i], b'e' | b'E') {
        i += 1;
        if i < n && matches!(digits[i], b'+' | b'-') {
            i += 1;
        }
        let exponent = i;
        while i < n && digits[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent {
            return false;
        }
    }
    i == n
}
