//! # fmtmark-engine
//!
//! Parses format templates into a [`Node`] tree with resolved argument
//! indexes.
//!
//! ```
//! use fmtmark_engine::{NodeKind, parse};
//!
//! let tree = parse("Hello **%@**").unwrap();
//! assert_eq!(tree.kind, NodeKind::Root);
//! assert_eq!(tree.interpolation_indexes_in_order(), vec![0]);
//!
//! // Templates that need no formatting don't produce a tree
//! assert!(parse("Hello world").is_none());
//! ```

pub mod builder;
mod node;
pub mod validate;

pub use builder::InterpolationContext;
pub use fmtmark_syntax::SyntaxNode;
pub use node::{Node, NodeKind, PLACEHOLDER_MARKER, Segment};
pub use validate::{ValidationError, validate, validate_all};

/// Parse a template into a node tree.
///
/// Returns `None` when the template can be used as it is: it is empty, or it
/// is a single paragraph of plain text without placeholders.
pub fn parse(template: &str) -> Option<Node> {
    parse_with_syntax(template).1
}

/// Like [`parse`], also returning the lossless syntax tree the nodes were
/// built from.
pub fn parse_with_syntax(template: &str) -> (SyntaxNode, Option<Node>) {
    let syntax = fmtmark_syntax::parse(template);
    let mut ctx = InterpolationContext::new();
    let root = builder::build(&syntax, &mut ctx);

    if builder::is_plain(&root) {
        log::debug!("template is plain text, no tree needed");
        return (syntax, None);
    }

    log::debug!(
        "built tree with {} paragraph(s) and {} implicit argument(s)",
        root.children.len(),
        ctx.next_implicit_index()
    );
    (syntax, Some(root))
}
