//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. Instead of building the tree directly, the parser emits a **flat
//! sequence** of events that describe the tree structure.
//!
//! ```text
//! Start(BOLD)        ← Begin a BOLD node
//!   Token(STAR2)     ← Add the opening `**`
//!   Token(TEXT)
//!   Token(STAR2)
//! Finish             ← End the BOLD node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.
//!
//! ## Late Decisions
//!
//! Whether a `**` opens a BOLD node or is a stray delimiter is only known once
//! the parser finds (or fails to find) the closing `**`. The parser reserves
//! `Placeholder` slots when it opens a span and rewrites them later: into a
//! `Start`/`Finish` pair around the whole span, or into an UNKNOWN node around
//! just the opening delimiter.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
///
/// Events form a flat representation of the tree that the [`Sink`](super::sink::Sink)
/// converts into an actual Rowan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// The `forward_parent` field is used for the "precede" pattern:
    /// if set, it points to another `Start` event that should become
    /// this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add the next raw token to the current node.
    ///
    /// The `kind` is usually the lexer's kind, but the parser may remap it,
    /// e.g. a `**` inside a code span is stored as TEXT.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    Finish,

    /// A reserved slot that will be replaced, or ignored by the Sink.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
