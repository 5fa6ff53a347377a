//! Block-level grammar rules.
//!
//! Templates only have one block kind: the paragraph, running until a blank
//! line or the end of input.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// Parse a paragraph: inline content up to the next PARAGRAPH_BREAK.
pub fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();
    inline::inline_until_break(p);
    m.complete(p, SyntaxKind::PARAGRAPH);
}
