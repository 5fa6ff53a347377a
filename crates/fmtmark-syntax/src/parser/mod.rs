//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! Instead of building nodes directly, the parser emits a flat list of
//! [`Event`]s and the [`Sink`] builds the Rowan tree from them. This matters
//! for templates because whether a delimiter opens a span is only known once
//! its partner is found: the parser keeps a placeholder for the span and fills
//! it in later, without backtracking over already-built nodes.
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`]. A marker **must** be either:
//!
//! - Completed with `marker.complete(parser, KIND)` → emits Start+Finish
//! - Completed around its opening delimiter only, with
//!   `marker.complete_opener(parser, KIND, opener_end)`
//! - Abandoned with `marker.abandon(parser)` → removes the placeholder
//!
//! Dropping a marker without doing either panics.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::PARAGRAPH);
//! ```
//!
//! ## Forward Parent Links
//!
//! `CompletedMarker::precede()` wraps an already-completed node in a new
//! parent. A `***` span is completed as ITALIC and then preceded by BOLD.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to Rowan tree
//! - `grammar` - Grammar rules (root, paragraph, inline spans)
//!
//! ## Public API
//!
//! ```
//! use fmtmark_syntax::parse;
//!
//! let tree = parse("**Hello** %@\n");
//! assert_eq!(tree.text().to_string(), "**Hello** %@\n");
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_as()`
/// - Look for a closing token: `has_before_break()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    /// Per kind, the token index up to which a lookahead already failed
    misses: Vec<(SyntaxKind, usize)>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            misses: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        log::trace!(
            "parsed {} tokens into {} events",
            self.tokens.len(),
            self.events.len()
        );
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Consume the current token, recording it under a different kind.
    ///
    /// Used where a delimiter has no meaning, e.g. `**` inside a code span
    /// or a `)` outside any link.
    pub fn bump_as(&mut self, kind: SyntaxKind) {
        if !self.at_end() {
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Whether a `kind` token follows the current one before the next
    /// paragraph break (or end of input).
    ///
    /// Failed scans are remembered so that a run of unmatched openers in one
    /// paragraph is not rescanned for each opener.
    pub fn has_before_break(&mut self, kind: SyntaxKind) -> bool {
        let pos = self.pos;
        if self
            .misses
            .iter()
            .any(|&(missed, until)| missed == kind && pos < until)
        {
            return false;
        }

        let mut i = pos + 1;
        while let Some(token) = self.tokens.get(i) {
            if token.kind == kind {
                return true;
            }
            if token.kind == SyntaxKind::PARAGRAPH_BREAK {
                break;
            }
            i += 1;
        }

        match self.misses.iter_mut().find(|(missed, _)| *missed == kind) {
            Some(entry) => entry.1 = i,
            None => self.misses.push((kind, i)),
        }
        false
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it.
///
/// ## The Must-Use Contract
///
/// Every marker is either:
///
/// - **Completed** via `marker.complete(parser, KIND)`, wrapping everything
///   consumed since `start()`
/// - **Completed around its opener** via `marker.complete_opener(..)`,
///   wrapping only the tokens consumed before a second reserved slot
/// - **Abandoned** via `marker.abandon(parser)` - removes the placeholder
///   (only works if nothing was pushed after it)
///
/// Dropping a marker without doing either panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    ///
    /// This:
    /// 1. Replaces the `Placeholder` at our position with `Start { kind, ... }`
    /// 2. Pushes a `Finish` event
    /// 3. Returns a `CompletedMarker` for potential `precede()` calls
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Complete this marker as a node that ends where `opener_end` was
    /// started, instead of at the current position.
    ///
    /// A span opener reserves `opener_end` right after bumping its
    /// delimiter. If the span never closes, the delimiter alone becomes the
    /// node and everything parsed after it stays outside as siblings.
    pub fn complete_opener(
        mut self,
        p: &mut Parser<'_, '_>,
        kind: SyntaxKind,
        mut opener_end: Marker,
    ) -> CompletedMarker {
        assert!(self.pos < opener_end.pos);
        self.completed = true;
        opener_end.completed = true;

        let start = &mut p.events[self.pos];
        assert!(matches!(start, Event::Placeholder));
        *start = Event::start(kind);

        let end = &mut p.events[opener_end.pos];
        assert!(matches!(end, Event::Placeholder));
        *end = Event::Finish;

        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// **Note**: This only removes the placeholder if it's the last event.
    /// If other events were pushed after `start()`, the placeholder becomes
    /// inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// A `CompletedMarker` can be wrapped in a new parent with `precede()`, and
/// that parent can be dropped again with `abandon_parent()`.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    ///
    /// Returns a new `Marker` that, when completed, will become the parent
    /// of the node at `self.pos`.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }

    /// Undo `precede()`: unlink `parent` from this node and abandon it.
    pub fn abandon_parent(self, p: &mut Parser<'_, '_>, parent: Marker) {
        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            debug_assert_eq!(*forward_parent, Some(parent.pos));
            *forward_parent = None;
        }
        parent.abandon(p);
    }
}

/// Parse template source into a lossless syntax tree.
///
/// Never fails: unmatched delimiters end up in UNKNOWN nodes and every byte
/// of `source` is preserved.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}
