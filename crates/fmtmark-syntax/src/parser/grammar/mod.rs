//! # Grammar Rules
//!
//! Grammar functions take a `&mut Parser` and use its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`)
//! 2. Consume tokens (`p.bump()`, `p.bump_as()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! ## Module Structure
//!
//! - [`block`] - Paragraphs and the blank lines between them
//! - [`inline`] - Formatting spans, code spans, links and placeholders
//!
//! ## Error Recovery
//!
//! Grammar functions never fail. A delimiter that doesn't find its partner is
//! wrapped in an UNKNOWN node on its own and parsing carries on as if it were
//! text. The goal is a valid tree that preserves all input bytes.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root template.
///
/// ROOT holds PARAGRAPH nodes with the PARAGRAPH_BREAK tokens between them.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        if p.at(SyntaxKind::PARAGRAPH_BREAK) {
            p.bump();
        } else {
            block::paragraph(p);
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
