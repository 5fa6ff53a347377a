//! Human-readable dump of a syntax tree.

use rowan::{NodeOrToken, WalkEvent};

use crate::syntax_kind::SyntaxNode;

/// Format a syntax tree as an indented outline, one element per line.
///
/// ```text
/// ROOT@0..8
///   PARAGRAPH@0..8
///     BOLD@0..8
///       STAR2@0..2 "**"
/// ```
pub fn format_tree(node: &SyntaxNode) -> String {
    let mut result = String::new();
    let mut depth = 0usize;

    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(NodeOrToken::Node(n)) => {
                let prefix = "  ".repeat(depth);
                result.push_str(&format!(
                    "{}{:?}@{:?}\n",
                    prefix,
                    n.kind(),
                    n.text_range()
                ));
                depth += 1;
            }
            WalkEvent::Enter(NodeOrToken::Token(t)) => {
                let prefix = "  ".repeat(depth);
                result.push_str(&format!(
                    "{}{:?}@{:?} {:?}\n",
                    prefix,
                    t.kind(),
                    t.text_range(),
                    t.text()
                ));
            }
            WalkEvent::Leave(NodeOrToken::Node(_)) => depth -= 1,
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tree_is_just_root() {
        assert_eq!(format_tree(&parse("")), "ROOT@0..0\n");
    }

    #[test]
    fn tokens_are_indented_under_their_node() {
        let dump = format_tree(&parse("*a*"));
        assert_eq!(
            dump,
            "ROOT@0..3\n  PARAGRAPH@0..3\n    ITALIC@0..3\n      STAR@0..1 \"*\"\n      TEXT@1..2 \"a\"\n      STAR@2..3 \"*\"\n"
        );
    }
}
