//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within a paragraph: bold, italic,
//! strikethrough, code spans, links and placeholders.
//!
//! ## Dispatch Logic
//!
//! | Token | Possible Element |
//! |-------|-----------------|
//! | `*` `**` `~~` | Italic, bold, strikethrough (open or close) |
//! | `***` | Bold wrapping italic, or closes a bold + italic pair |
//!
//! A `**` or `*` that meets an open `***` closes one half of it: `***a** b*`
//! is an italic span holding a bold span. The other half stays open as its
//! own frame.
//! | `` ` `` | Code span |
//! | `[` `](` `)` | Link |
//! | (other) | Text or placeholder |
//!
//! ## The Span Stack
//!
//! Spans are tracked on an explicit [`SpanStack`] rather than the call stack,
//! so deeply nested or adversarial input can't overflow it. A delimiter closes
//! the innermost open frame of its own family; frames opened after that one
//! can no longer close properly and degrade on the spot. Frames never reach
//! outside the link they were opened in, so a family is open at most once per
//! link scope.
//!
//! ## Error Tolerance
//!
//! - An opener without a partner becomes an UNKNOWN node holding only the
//!   delimiter; what followed it stays in the paragraph as siblings
//! - A backtick only opens a code span when another backtick follows in the
//!   same paragraph
//! - `[` inside link text, a stray `](` and a stray `)` are text
//!
//! Placeholders are plain tokens everywhere, including code spans and link
//! targets, so they are always visible to the interpolation pass.

use crate::parser::{CompletedMarker, Marker, Parser};
use crate::syntax_kind::SyntaxKind;

/// Parse inline content until a paragraph break or EOF.
pub fn inline_until_break(p: &mut Parser<'_, '_>) {
    let mut spans = SpanStack::default();
    while !p.at_end() && !p.at(SyntaxKind::PARAGRAPH_BREAK) {
        inline_element(p, &mut spans);
    }
    spans.unwind(p);
}

/// Parse a single inline element.
fn inline_element(p: &mut Parser<'_, '_>, spans: &mut SpanStack) {
    match p.current() {
        SyntaxKind::STAR => spans.delimiter(p, Span::Italic),
        SyntaxKind::STAR2 => spans.delimiter(p, Span::Bold),
        SyntaxKind::TILDE2 => spans.delimiter(p, Span::Strikethrough),
        SyntaxKind::STAR3 => spans.bold_italic(p),
        SyntaxKind::BACKTICK => code_span(p),
        SyntaxKind::LBRACKET => {
            if spans.find_link().is_some() {
                // No nested links
                p.bump_as(SyntaxKind::TEXT);
            } else {
                spans.open(p, Span::Link);
            }
        }
        SyntaxKind::LINK_MIDDLE => spans.link_target(p),
        SyntaxKind::RPAREN => p.bump_as(SyntaxKind::TEXT),
        _ => p.bump(),
    }
}

/// Consume one token of a raw zone (code span or link target).
///
/// Placeholders keep their kind, everything else is text.
fn raw_token(p: &mut Parser<'_, '_>) {
    if p.current().is_placeholder() {
        p.bump();
    } else {
        p.bump_as(SyntaxKind::TEXT);
    }
}

/// Parse a code span `` `code` ``.
///
/// Code spans are raw zones: delimiters inside are text, placeholders are not.
fn code_span(p: &mut Parser<'_, '_>) {
    debug_assert!(p.at(SyntaxKind::BACKTICK));
    let m = p.start();

    if !p.has_before_break(SyntaxKind::BACKTICK) {
        log::debug!("unterminated code span degraded to literal backtick");
        p.bump();
        m.complete(p, SyntaxKind::UNKNOWN);
        return;
    }

    p.bump(); // `
    while !p.at_end() && !p.at(SyntaxKind::BACKTICK) {
        raw_token(p);
    }
    p.bump(); // `

    m.complete(p, SyntaxKind::CODE);
}

/// The span kinds that can be open on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Bold,
    Italic,
    /// Opened by `***`, completes as BOLD wrapping ITALIC
    BoldItalic,
    Strikethrough,
    Link,
}

/// Where a frame's opening delimiter is.
enum Opener {
    /// Reserved right after the delimiter, see `Marker::complete_opener`
    Delimiter(Marker),
    /// The frame is what's left of a `***` after one half closed; the
    /// delimiter sits in this already completed span.
    Split(CompletedMarker),
}

/// An open span waiting for its closing delimiter.
struct Frame {
    span: Span,
    /// Wraps the whole span once closed
    marker: Marker,
    opener: Opener,
    /// LINK_TEXT marker, only for links
    link_text: Option<Marker>,
}

impl Frame {
    /// Turn the opener into an UNKNOWN node; the span's content stays put.
    fn degrade(self, p: &mut Parser<'_, '_>) {
        log::debug!("unclosed {:?} span degraded to literal delimiter", self.span);
        if let Some(link_text) = self.link_text {
            link_text.abandon(p);
        }
        match self.opener {
            Opener::Delimiter(opener_end) => {
                self.marker
                    .complete_opener(p, SyntaxKind::UNKNOWN, opener_end);
            }
            // The closed half keeps the whole `***`
            Opener::Split(closed) => closed.abandon_parent(p, self.marker),
        }
    }
}

/// A frame that matched its closing delimiter.
struct Closing {
    span: Span,
    marker: Marker,
}

impl Closing {
    fn complete(self, p: &mut Parser<'_, '_>) {
        match self.span {
            Span::Bold => {
                self.marker.complete(p, SyntaxKind::BOLD);
            }
            Span::Italic => {
                self.marker.complete(p, SyntaxKind::ITALIC);
            }
            Span::Strikethrough => {
                self.marker.complete(p, SyntaxKind::STRIKETHROUGH);
            }
            Span::BoldItalic => {
                let italic = self.marker.complete(p, SyntaxKind::ITALIC);
                italic.precede(p).complete(p, SyntaxKind::BOLD);
            }
            Span::Link => {
                self.marker.complete(p, SyntaxKind::LINK);
            }
        }
    }
}

/// Explicit stack of open spans for one paragraph.
#[derive(Default)]
struct SpanStack {
    frames: Vec<Frame>,
}

impl SpanStack {
    /// Index of the first frame inside the innermost open link.
    fn scope_start(&self) -> usize {
        self.find_link().map_or(0, |idx| idx + 1)
    }

    fn find_link(&self) -> Option<usize> {
        self.frames.iter().rposition(|f| f.span == Span::Link)
    }

    /// Innermost frame of `span` in the current link scope.
    fn find(&self, span: Span) -> Option<usize> {
        let scope = self.scope_start();
        self.frames[scope..]
            .iter()
            .rposition(|f| f.span == span)
            .map(|idx| scope + idx)
    }

    /// Open a new frame with the current delimiter.
    fn open(&mut self, p: &mut Parser<'_, '_>, span: Span) {
        let marker = p.start();
        p.bump();
        let opener = Opener::Delimiter(p.start());
        let link_text = (span == Span::Link).then(|| p.start());
        self.frames.push(Frame {
            span,
            marker,
            opener,
            link_text,
        });
    }

    /// Degrade every frame above `idx`.
    fn degrade_above(&mut self, p: &mut Parser<'_, '_>, idx: usize) {
        while self.frames.len() > idx + 1 {
            if let Some(frame) = self.frames.pop() {
                frame.degrade(p);
            }
        }
    }

    /// Pop the frame at `idx` for closing, degrading everything above it.
    fn take(&mut self, p: &mut Parser<'_, '_>, idx: usize) -> Option<Closing> {
        self.degrade_above(p, idx);
        let frame = self.frames.pop()?;
        if let Opener::Delimiter(opener_end) = frame.opener {
            opener_end.abandon(p);
        }
        if let Some(link_text) = frame.link_text {
            link_text.complete(p, SyntaxKind::LINK_TEXT);
        }
        Some(Closing {
            span: frame.span,
            marker: frame.marker,
        })
    }

    /// `*`, `**` or `~~`: close the matching frame or open a new one.
    ///
    /// `*` and `**` may instead close half of a `***` frame opened more
    /// recently than any frame of their own.
    fn delimiter(&mut self, p: &mut Parser<'_, '_>, span: Span) {
        let fused = match span {
            Span::Bold | Span::Italic => self.find(Span::BoldItalic),
            _ => None,
        };

        match (self.find(span), fused) {
            (Some(own), Some(fused)) if fused > own => self.split(p, fused, span),
            (None, Some(fused)) => self.split(p, fused, span),
            (Some(own), _) => self.close_one(p, own),
            (None, None) => self.open(p, span),
        }
    }

    /// Close the `span` half of the `***` frame at `idx` and keep the other
    /// half open, wrapping the closed one.
    fn split(&mut self, p: &mut Parser<'_, '_>, idx: usize, span: Span) {
        let closing = self.take(p, idx);
        p.bump();
        let Some(closing) = closing else {
            return;
        };

        let (kind, rest) = match span {
            Span::Bold => (SyntaxKind::BOLD, Span::Italic),
            _ => (SyntaxKind::ITALIC, Span::Bold),
        };
        log::trace!("`***` split, {rest:?} half still open");
        let closed = closing.marker.complete(p, kind);
        let marker = closed.precede(p);
        self.frames.push(Frame {
            span: rest,
            marker,
            opener: Opener::Split(closed),
            link_text: None,
        });
    }

    /// `***`: close a bold-italic frame or a bold + italic pair, whichever is
    /// innermost, or open a bold-italic frame.
    fn bold_italic(&mut self, p: &mut Parser<'_, '_>) {
        let fused = self.find(Span::BoldItalic);
        let pair = match (self.find(Span::Bold), self.find(Span::Italic)) {
            (Some(bold), Some(italic)) => Some((bold.min(italic), bold.max(italic))),
            _ => None,
        };

        match (fused, pair) {
            (Some(fused), Some((_, inner))) if fused > inner => self.close_one(p, fused),
            (_, Some((outer, inner))) => {
                let inner = self.take(p, inner);
                let outer = self.take(p, outer);
                p.bump();
                if let Some(inner) = inner {
                    inner.complete(p);
                }
                if let Some(outer) = outer {
                    outer.complete(p);
                }
            }
            (Some(fused), None) => self.close_one(p, fused),
            (None, None) => self.open(p, Span::BoldItalic),
        }
    }

    fn close_one(&mut self, p: &mut Parser<'_, '_>, idx: usize) {
        let closing = self.take(p, idx);
        p.bump();
        if let Some(closing) = closing {
            closing.complete(p);
        }
    }

    /// `](`: finish the link text and read the target up to `)`.
    fn link_target(&mut self, p: &mut Parser<'_, '_>) {
        let Some(idx) = self.find_link() else {
            p.bump_as(SyntaxKind::TEXT);
            return;
        };

        if !p.has_before_break(SyntaxKind::RPAREN) {
            let frame = self.frames.remove(idx);
            frame.degrade(p);
            p.bump_as(SyntaxKind::TEXT);
            return;
        }

        let closing = self.take(p, idx);
        p.bump(); // ](
        let target = p.start();
        while !p.at_end() && !p.at(SyntaxKind::RPAREN) {
            raw_token(p);
        }
        target.complete(p, SyntaxKind::LINK_TARGET);
        p.bump(); // )
        if let Some(closing) = closing {
            closing.complete(p);
        }
    }

    /// Degrade everything still open at the end of a paragraph.
    fn unwind(mut self, p: &mut Parser<'_, '_>) {
        while let Some(frame) = self.frames.pop() {
            frame.degrade(p);
        }
    }
}
