//! The formatted node tree handed to renderers.

use std::fmt;

use serde::Serialize;

/// Stands in for a placeholder inside a leaf's literal.
///
/// Each occurrence pairs, left to right, with one entry of the leaf's
/// `interpolation_indexes`.
pub const PLACEHOLDER_MARKER: char = '\u{FFFC}';

/// What a [`Node`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Paragraph,
    Bold,
    Italic,
    Strikethrough,
    Code,
    /// Display text as children, target as the literal
    Link,
    Text,
    /// Formatting syntax that never found its partner, kept verbatim
    Unknown,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Bold => "bold",
            NodeKind::Italic => "italic",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::Code => "code",
            NodeKind::Link => "link",
            NodeKind::Text => "text",
            NodeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of a leaf literal, see [`Node::segments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Zero-based index of the argument to substitute
    Argument(usize),
}

/// A node of a parsed template.
///
/// Containers (`Root`, `Paragraph`, `Bold`, `Italic`, `Strikethrough`,
/// `Link`) hold children. Leaves (`Text`, `Code`, `Unknown`) and links hold a
/// literal in which every placeholder is a [`PLACEHOLDER_MARKER`], with the
/// resolved argument indexes in `interpolation_indexes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interpolation_indexes: Vec<usize>,
}

impl Node {
    pub fn container(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            literal: None,
            interpolation_indexes: Vec::new(),
        }
    }

    pub fn leaf(
        kind: NodeKind,
        literal: impl Into<String>,
        interpolation_indexes: Vec<usize>,
    ) -> Self {
        Self {
            kind,
            children: Vec::new(),
            literal: Some(literal.into()),
            interpolation_indexes,
        }
    }

    /// Every node carrying a literal, in document order.
    ///
    /// A link comes after its display text, since its literal is the target.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut leaves = Vec::new();
        // (node, children already scheduled)
        let mut stack = vec![(self, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded || (node.literal.is_some() && node.children.is_empty()) {
                leaves.push(node);
                continue;
            }
            if node.literal.is_some() {
                stack.push((node, true));
            }
            stack.extend(node.children.iter().rev().map(|child| (child, false)));
        }

        leaves
    }

    /// All argument indexes referenced by the tree, in document order.
    pub fn interpolation_indexes_in_order(&self) -> Vec<usize> {
        self.leaves()
            .into_iter()
            .flat_map(|leaf| leaf.interpolation_indexes.iter().copied())
            .collect()
    }

    /// How many arguments a caller has to supply: the highest referenced
    /// index plus one.
    pub fn argument_count(&self) -> usize {
        self.interpolation_indexes_in_order()
            .into_iter()
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Split this node's literal into text and argument pieces.
    ///
    /// Empty for nodes without a literal.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let Some(literal) = self.literal.as_deref() else {
            return Vec::new();
        };

        let mut segments = Vec::new();
        let mut indexes = self.interpolation_indexes.iter();
        for (i, piece) in literal.split(PLACEHOLDER_MARKER).enumerate() {
            if i > 0 {
                if let Some(&index) = indexes.next() {
                    segments.push(Segment::Argument(index));
                }
            }
            if !piece.is_empty() {
                segments.push(Segment::Text(piece));
            }
        }
        segments
    }

    /// The literal text of the whole tree without any placeholders.
    pub fn plain_text(&self) -> String {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| leaf.literal.as_deref())
            .flat_map(|literal| literal.split(PLACEHOLDER_MARKER))
            .collect()
    }
}

/// Indented outline, one node per line, arguments shown as `{index}`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            write!(f, "{}{}", "  ".repeat(depth), node.kind)?;
            if node.literal.is_some() {
                let rendered: String = node
                    .segments()
                    .into_iter()
                    .map(|segment| match segment {
                        Segment::Text(text) => text.to_string(),
                        Segment::Argument(index) => format!("{{{index}}}"),
                    })
                    .collect();
                write!(f, " {rendered:?}")?;
            }
            writeln!(f)?;
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(())
    }
}
