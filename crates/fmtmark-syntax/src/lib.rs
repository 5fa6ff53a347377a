//! # fmtmark-syntax
//!
//! A lossless syntax tree for format templates (text with inline markdown and
//! `%@` / `%n$@` placeholders) using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Tokenizes input into a flat sequence of tokens. Every character becomes
//! part of some token - nothing is discarded.
//!
//! ```text
//! "**Hi** %@" → [STAR2, TEXT("Hi"), STAR2, TEXT(" "), PLACEHOLDER]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Consumes tokens and emits **events** (Start, Token, Finish). Open spans
//! live on an explicit stack; delimiters that never close end up in UNKNOWN
//! nodes instead of failing the parse.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! Builds the Rowan green tree from the events.
//!
//! ## Module Structure
//!
//! ```text
//! fmtmark-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── debug.rs         # Indented tree dump
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root parsing
//!         ├── block.rs # Paragraphs
//!         └── inline.rs# Spans, code, links, placeholders
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use fmtmark_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("Hello **%@**");
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "Hello **%@**");
//!
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let paragraph = tree.children().next().unwrap();
//! assert_eq!(paragraph.kind(), SyntaxKind::PARAGRAPH);
//! ```
//!
//! Turning this tree into formatted nodes with resolved argument indexes is
//! the job of `fmtmark-engine`.

pub mod debug;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use debug::format_tree;
pub use parser::parse;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TemplateLang};
