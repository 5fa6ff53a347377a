//! # Lexer - Tokenizing Template Source
//!
//! This module provides the first stage of parsing: breaking a template into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! which is what lets the CST round-trip:
//!
//! ```
//! use fmtmark_syntax::lexer::lex;
//!
//! let input = "Hello **%@**!\n\nBye";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer has no idea whether a `**` opens or
//! closes bold, or whether a `)` ends a link target - that's the parser's job.
//!
//! Star runs are split by length: `*`, `**` and `***` are delimiters, while
//! four or more stars in a row are plain text. Characters that only matter in
//! pairs (`~`, `]`, `%`) fall back to `TEXT` when they appear alone, and a
//! single line ending is `TEXT` too; only a blank line is a paragraph break.
//!
//! Placeholder specifiers are validated here: `%3$@` is a
//! `POSITIONAL_PLACEHOLDER`, while `%0$@` or `%3$x` are just text.

use logos::{Lexer, Logos};

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Several variants collapse to `TEXT` in [`SyntaxKind`].
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Four or more stars, never a delimiter
    #[regex(r"\*\*\*\*+")]
    StarRun,

    #[token("***")]
    Star3,

    #[token("**")]
    Star2,

    #[token("*")]
    Star,

    #[token("~~")]
    Tilde2,

    /// A lone tilde
    #[token("~")]
    Tilde,

    #[token("`")]
    Backtick,

    #[token("[")]
    LBracket,

    #[token("](")]
    LinkMiddle,

    /// A `]` not followed by `(`
    #[token("]")]
    RBracket,

    #[token(")")]
    RParen,

    /// Blank line: two or more line endings
    #[regex(r"\r?\n(\r?\n)+")]
    ParagraphBreak,

    /// A single line ending
    #[regex(r"\r?\n")]
    Newline,

    #[token("%@")]
    Placeholder,

    /// `%n$@`, carrying the 1-based position
    #[regex(r"%[0-9]+\$@", positional)]
    PositionalPlaceholder(usize),

    /// A `%` that doesn't start a placeholder
    #[token("%")]
    Percent,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^*~`\[\])%\r\n]+")]
    Text,
}

fn positional(lex: &mut Lexer<'_, TokenKind>) -> Option<usize> {
    explicit_position(lex.slice())
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Star3 => SyntaxKind::STAR3,
            TokenKind::Star2 => SyntaxKind::STAR2,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Tilde2 => SyntaxKind::TILDE2,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::LinkMiddle => SyntaxKind::LINK_MIDDLE,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::ParagraphBreak => SyntaxKind::PARAGRAPH_BREAK,
            TokenKind::Placeholder => SyntaxKind::PLACEHOLDER,
            TokenKind::PositionalPlaceholder(_) => SyntaxKind::POSITIONAL_PLACEHOLDER,
            TokenKind::StarRun
            | TokenKind::Tilde
            | TokenKind::RBracket
            | TokenKind::Newline
            | TokenKind::Percent
            | TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// Parse the 1-based position out of a `%n$@` specifier.
///
/// Returns `None` for anything that isn't a well-formed positional
/// placeholder, including position zero and positions that overflow `usize`.
pub fn explicit_position(text: &str) -> Option<usize> {
    let digits = text.strip_prefix('%')?.strip_suffix("$@")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&position| position > 0)
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Malformed specifiers such as `%0$@` end up here
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    log::trace!("lexed {} bytes into {} tokens", input.len(), tokens.len());
    tokens
}
