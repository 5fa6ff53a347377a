//! # Tree Builder
//!
//! Turns the lossless syntax tree from `fmtmark-syntax` into the [`Node`]
//! tree renderers consume, resolving every placeholder to an argument index
//! on the way.
//!
//! ## Walk
//!
//! The syntax tree is visited once in document order with
//! `preorder_with_tokens`. Partially built containers live on an explicit
//! stack and at most one leaf is being accumulated at a time:
//!
//! | Syntax node | Becomes |
//! |-------------|---------|
//! | ROOT, PARAGRAPH, BOLD, ITALIC, STRIKETHROUGH, LINK | container |
//! | LINK_TEXT | nothing, its content becomes the link's children |
//! | LINK_TARGET | the link's literal |
//! | CODE, UNKNOWN | leaf |
//! | runs of TEXT and placeholder tokens | `Text` leaf |
//!
//! Delimiter tokens are structure and are skipped, except inside UNKNOWN
//! where the delimiter is the literal.

use fmtmark_syntax::lexer::explicit_position;
use fmtmark_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::{NodeOrToken, WalkEvent};

use crate::node::{Node, NodeKind, PLACEHOLDER_MARKER};

/// Hands out argument indexes for the placeholders of one template.
///
/// `%@` takes the next implicit index, starting at 0. `%n$@` resolves to
/// `n - 1` and leaves the implicit counter alone.
#[derive(Debug, Default)]
pub struct InterpolationContext {
    next_implicit_index: usize,
}

impl InterpolationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index the next `%@` will receive.
    pub fn next_implicit_index(&self) -> usize {
        self.next_implicit_index
    }

    /// Resolve a placeholder token to its argument index.
    ///
    /// Returns `None` for anything that isn't a well-formed placeholder.
    pub fn resolve(&mut self, kind: SyntaxKind, text: &str) -> Option<usize> {
        match kind {
            SyntaxKind::PLACEHOLDER => {
                let index = self.next_implicit_index;
                self.next_implicit_index += 1;
                Some(index)
            }
            SyntaxKind::POSITIONAL_PLACEHOLDER => explicit_position(text).map(|pos| pos - 1),
            _ => None,
        }
    }
}

/// Build the node tree for a ROOT syntax node.
///
/// Always yields a `Root` node; paragraphs without content are left out.
pub fn build(syntax: &SyntaxNode, ctx: &mut InterpolationContext) -> Node {
    let mut builder = TreeBuilder::new(ctx);

    for event in syntax.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(NodeOrToken::Node(node)) => builder.enter(&node),
            WalkEvent::Enter(NodeOrToken::Token(token)) => builder.token(&token),
            WalkEvent::Leave(NodeOrToken::Node(node)) => builder.leave(node.kind()),
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }

    builder.finish()
}

/// Whether rendering `root` would reproduce the template text unchanged.
///
/// True for a tree without paragraphs, or with a single paragraph made only
/// of text leaves that reference no arguments. A degraded delimiter keeps the
/// tree so callers can still validate it.
pub fn is_plain(root: &Node) -> bool {
    match root.children.as_slice() {
        [] => true,
        [paragraph] => paragraph.children.iter().all(|child| {
            child.kind == NodeKind::Text && child.interpolation_indexes.is_empty()
        }),
        _ => false,
    }
}

/// The half of a `***` opener left over when only one of its two spans
/// closed, for the outermost span the opener belongs to.
///
/// `***a** b` parses as a BOLD node that starts with `***`; the stray `*`
/// is reported as an unknown leaf in front of it.
fn split_remainder(node: &SyntaxNode) -> Option<&'static str> {
    let is_emphasis = |n: &SyntaxNode| matches!(n.kind(), SyntaxKind::BOLD | SyntaxKind::ITALIC);
    let opener = node.first_token()?;
    if !is_emphasis(node) || opener.kind() != SyntaxKind::STAR3 {
        return None;
    }

    let start = node.text_range().start();
    let starts_here = |n: &SyntaxNode| is_emphasis(n) && n.text_range().start() == start;
    if node.parent().is_some_and(|parent| starts_here(&parent)) {
        return None;
    }

    let (mut bold, mut italic) = (false, false);
    let mut current = Some(node.clone());
    while let Some(span) = current.filter(|n| starts_here(n)) {
        match span.kind() {
            SyntaxKind::BOLD => bold = true,
            _ => italic = true,
        }
        current = span.first_child();
    }

    match (bold, italic) {
        (true, false) => Some("*"),
        (false, true) => Some("**"),
        _ => None,
    }
}

fn container_kind(kind: SyntaxKind) -> Option<NodeKind> {
    match kind {
        SyntaxKind::ROOT => Some(NodeKind::Root),
        SyntaxKind::PARAGRAPH => Some(NodeKind::Paragraph),
        SyntaxKind::BOLD => Some(NodeKind::Bold),
        SyntaxKind::ITALIC => Some(NodeKind::Italic),
        SyntaxKind::STRIKETHROUGH => Some(NodeKind::Strikethrough),
        SyntaxKind::LINK => Some(NodeKind::Link),
        _ => None,
    }
}

/// A leaf literal being accumulated.
struct Leaf {
    kind: NodeKind,
    literal: String,
    indexes: Vec<usize>,
}

impl Leaf {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            literal: String::new(),
            indexes: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.contains(PLACEHOLDER_MARKER) {
            log::debug!("literal U+FFFC in template text replaced with U+FFFD");
            self.literal
                .push_str(&text.replace(PLACEHOLDER_MARKER, "\u{FFFD}"));
        } else {
            self.literal.push_str(text);
        }
    }

    fn push_argument(&mut self, index: usize) {
        self.literal.push(PLACEHOLDER_MARKER);
        self.indexes.push(index);
    }

    fn finish(self) -> Node {
        Node::leaf(self.kind, self.literal, self.indexes)
    }
}

/// A container waiting for its children.
struct Container {
    kind: NodeKind,
    children: Vec<Node>,
    /// Link target, only for links
    target: Option<Leaf>,
}

impl Container {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            target: None,
        }
    }

    fn finish(self) -> Node {
        let mut node = Node::container(self.kind, self.children);
        if self.kind == NodeKind::Link {
            let target = self.target.unwrap_or_else(|| Leaf::new(NodeKind::Link));
            node.literal = Some(target.literal);
            node.interpolation_indexes = target.indexes;
        }
        node
    }
}

struct TreeBuilder<'c> {
    ctx: &'c mut InterpolationContext,
    containers: Vec<Container>,
    leaf: Option<Leaf>,
    root: Option<Node>,
}

impl<'c> TreeBuilder<'c> {
    fn new(ctx: &'c mut InterpolationContext) -> Self {
        Self {
            ctx,
            containers: Vec::new(),
            leaf: None,
            root: None,
        }
    }

    fn enter(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::LINK_TEXT => self.flush_leaf(),
            SyntaxKind::LINK_TARGET => self.open_leaf(NodeKind::Link),
            SyntaxKind::CODE => self.open_leaf(NodeKind::Code),
            SyntaxKind::UNKNOWN => self.open_leaf(NodeKind::Unknown),
            kind => {
                if let Some(kind) = container_kind(kind) {
                    self.flush_leaf();
                    if let Some(remainder) = split_remainder(node) {
                        log::debug!("unmatched `{remainder}` of `***` kept as unknown");
                        if let Some(parent) = self.containers.last_mut() {
                            parent.children.push(Node::leaf(NodeKind::Unknown, remainder, Vec::new()));
                        }
                    }
                    self.containers.push(Container::new(kind));
                }
            }
        }
    }

    fn token(&mut self, token: &SyntaxToken) {
        let kind = token.kind();

        if kind.is_placeholder() {
            match self.ctx.resolve(kind, token.text()) {
                Some(index) => self.current_leaf().push_argument(index),
                None => self.current_leaf().push_text(token.text()),
            }
            return;
        }

        let in_unknown = token
            .parent()
            .is_some_and(|parent| parent.kind() == SyntaxKind::UNKNOWN);
        if kind == SyntaxKind::TEXT || in_unknown {
            self.current_leaf().push_text(token.text());
        }
        // Anything else is a delimiter or a paragraph break
    }

    fn leave(&mut self, kind: SyntaxKind) {
        match kind {
            SyntaxKind::LINK_TEXT | SyntaxKind::CODE | SyntaxKind::UNKNOWN => self.flush_leaf(),
            SyntaxKind::LINK_TARGET => {
                let target = self.leaf.take();
                if let Some(link) = self.containers.last_mut() {
                    link.target = target;
                }
            }
            kind => {
                if container_kind(kind).is_some() {
                    self.flush_leaf();
                    self.close_container();
                }
            }
        }
    }

    fn finish(self) -> Node {
        self.root
            .unwrap_or_else(|| Node::container(NodeKind::Root, Vec::new()))
    }

    /// The open leaf, starting a `Text` leaf if there is none.
    fn current_leaf(&mut self) -> &mut Leaf {
        self.leaf.get_or_insert_with(|| Leaf::new(NodeKind::Text))
    }

    fn open_leaf(&mut self, kind: NodeKind) {
        self.flush_leaf();
        self.leaf = Some(Leaf::new(kind));
    }

    fn flush_leaf(&mut self) {
        if let Some(leaf) = self.leaf.take() {
            if let Some(container) = self.containers.last_mut() {
                container.children.push(leaf.finish());
            }
        }
    }

    fn close_container(&mut self) {
        let Some(container) = self.containers.pop() else {
            return;
        };
        let node = container.finish();

        if node.kind == NodeKind::Paragraph && node.children.is_empty() {
            log::trace!("dropping empty paragraph");
            return;
        }

        match self.containers.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn build_str(input: &str) -> Node {
        let syntax = fmtmark_syntax::parse(input);
        build(&syntax, &mut InterpolationContext::new())
    }

    #[test]
    fn implicit_indexes_count_up() {
        let mut ctx = InterpolationContext::new();
        assert_eq!(ctx.resolve(SyntaxKind::PLACEHOLDER, "%@"), Some(0));
        assert_eq!(ctx.resolve(SyntaxKind::PLACEHOLDER, "%@"), Some(1));
        assert_eq!(ctx.next_implicit_index(), 2);
    }

    #[test]
    fn explicit_indexes_leave_counter_alone() {
        let mut ctx = InterpolationContext::new();
        assert_eq!(
            ctx.resolve(SyntaxKind::POSITIONAL_PLACEHOLDER, "%3$@"),
            Some(2)
        );
        assert_eq!(ctx.next_implicit_index(), 0);
        assert_eq!(ctx.resolve(SyntaxKind::PLACEHOLDER, "%@"), Some(0));
    }

    #[test]
    fn non_placeholders_do_not_resolve() {
        let mut ctx = InterpolationContext::new();
        assert_eq!(ctx.resolve(SyntaxKind::TEXT, "%@"), None);
        assert_eq!(
            ctx.resolve(SyntaxKind::POSITIONAL_PLACEHOLDER, "%0$@"),
            None
        );
        assert_eq!(ctx.next_implicit_index(), 0);
    }

    #[test]
    fn bold_text() {
        assert_snapshot!(build_str("**bold**"), @r#"
        root
          paragraph
            bold
              text "bold"
        "#);
    }

    #[test]
    fn bold_italic_nests() {
        assert_snapshot!(build_str("***bold italic***"), @r#"
        root
          paragraph
            bold
              italic
                text "bold italic"
        "#);
    }

    #[test]
    fn mixed_placeholders_inside_spans() {
        let tree = build_str("This is %2$@ **bold *%1$@*** text %@");
        assert_snapshot!(tree, @r#"
        root
          paragraph
            text "This is {1} "
            bold
              text "bold "
              italic
                text "{0}"
            text " text {2}"
        "#);
        assert_eq!(tree.interpolation_indexes_in_order(), vec![1, 0, 2]);
    }

    #[test]
    fn link_keeps_target_as_literal() {
        let tree = build_str("[*link*](http://x.com)");
        assert_snapshot!(tree, @r#"
        root
          paragraph
            link "http://x.com"
              italic
                text "link"
        "#);
    }

    #[test]
    fn link_target_placeholders_follow_display_text() {
        let tree = build_str("[go %@](https://x/%1$@?q=%@)");
        assert_snapshot!(tree, @r#"
        root
          paragraph
            link "https://x/{0}?q={1}"
              text "go {0}"
        "#);
        assert_eq!(tree.interpolation_indexes_in_order(), vec![0, 0, 1]);
    }

    #[test]
    fn empty_link_target_is_empty_literal() {
        let tree = build_str("[a]()");
        let link = &tree.children[0].children[0];
        assert_eq!(link.kind, NodeKind::Link);
        assert_eq!(link.literal.as_deref(), Some(""));
    }

    #[test]
    fn code_span_is_raw() {
        assert_snapshot!(build_str("Use `a **b** %@` here"), @r#"
        root
          paragraph
            text "Use "
            code "a **b** {0}"
            text " here"
        "#);
    }

    #[test]
    fn degraded_delimiters_become_unknown_leaves() {
        assert_snapshot!(build_str("a **b"), @r#"
        root
          paragraph
            text "a "
            unknown "**"
            text "b"
        "#);
    }

    #[test]
    fn half_closed_triple_star_nests_spans() {
        assert_snapshot!(build_str("***a** b*"), @r#"
        root
          paragraph
            italic
              bold
                text "a"
              text " b"
        "#);
        assert_snapshot!(build_str("***%@* b**"), @r#"
        root
          paragraph
            bold
              italic
                text "{0}"
              text " b"
        "#);
    }

    #[test]
    fn unclosed_half_of_triple_star_is_unknown() {
        let tree = build_str("***a** b");
        assert_snapshot!(tree, @r#"
        root
          paragraph
            unknown "*"
            bold
              text "a"
            text " b"
        "#);
        assert_eq!(tree.plain_text(), "*a b");
    }

    #[test]
    fn degraded_link_keeps_rest_as_text() {
        assert_snapshot!(build_str("[a](b"), @r#"
        root
          paragraph
            unknown "["
            text "a](b"
        "#);
    }

    #[test]
    fn consecutive_text_forms_one_leaf() {
        let tree = build_str("a %@ b %@ c");
        let paragraph = &tree.children[0];
        assert_eq!(
            paragraph.children,
            vec![Node::leaf(
                NodeKind::Text,
                "a \u{FFFC} b \u{FFFC} c",
                vec![0, 1]
            )]
        );
    }

    #[test]
    fn paragraph_breaks_split_paragraphs() {
        assert_snapshot!(build_str("\n\none\n\n~~%@~~ `x`\n\n"), @r#"
        root
          paragraph
            text "one"
          paragraph
            strikethrough
              text "{0}"
            text " "
            code "x"
        "#);
    }

    #[test]
    fn literal_object_replacement_char_is_not_a_marker() {
        let tree = build_str("a\u{FFFC}b %@");
        let leaf = &tree.children[0].children[0];
        assert_eq!(leaf.literal.as_deref(), Some("a\u{FFFD}b \u{FFFC}"));
        assert_eq!(leaf.interpolation_indexes, vec![0]);
    }

    #[rstest]
    #[case("", true)]
    #[case("plain text", true)]
    #[case("\n\nplain\n\n", true)]
    #[case("a **b", false)]
    #[case("a ~~b", false)]
    #[case("a\nb", true)]
    #[case("%@", false)]
    #[case("**b**", false)]
    #[case("`c`", false)]
    #[case("one\n\ntwo", false)]
    fn plain_detection(#[case] input: &str, #[case] plain: bool) {
        assert_eq!(is_plain(&build_str(input)), plain);
    }

    #[rstest]
    #[case("**a** *b* ~~c~~", "a b c")]
    #[case("[x *y*](z)", "x yz")]
    #[case("`**raw**`", "**raw**")]
    #[case("%@ and %1$@", " and ")]
    #[case("one\n\ntwo", "onetwo")]
    fn plain_text_strips_structure(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(build_str(input).plain_text(), expected);
    }
}
