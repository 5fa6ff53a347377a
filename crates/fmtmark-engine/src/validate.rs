//! Strict checks on a parsed template.
//!
//! Parsing never fails, so a template with a stray `**` or a gap in its
//! positional arguments still produces a tree. Callers that want to reject
//! such templates run these checks on the result.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::node::{Node, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unmatched `{delimiter}` is rendered as literal text")]
    DegradedSpan { delimiter: String },

    /// Indexes `start..end` are below the highest referenced index but
    /// never used.
    #[error(
        "arguments {start}..{end} are never referenced (expected as %{first}$@ to %{last}$@)",
        first = .start + 1,
        last = .end
    )]
    MissingArguments { start: usize, end: usize },
}

/// Check a tree, stopping at the first problem.
pub fn validate(node: &Node) -> Result<(), ValidationError> {
    match validate_all(node).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Every problem in a tree: degraded spans in document order, then each run
/// of missing arguments by index.
pub fn validate_all(node: &Node) -> Vec<ValidationError> {
    let leaves = node.leaves();

    let mut errors: Vec<ValidationError> = leaves
        .iter()
        .filter(|leaf| leaf.kind == NodeKind::Unknown)
        .map(|leaf| ValidationError::DegradedSpan {
            delimiter: leaf.literal.clone().unwrap_or_default(),
        })
        .collect();

    let referenced: BTreeSet<usize> = leaves
        .iter()
        .flat_map(|leaf| leaf.interpolation_indexes.iter().copied())
        .collect();
    let mut expected = 0usize;
    for &index in &referenced {
        if index > expected {
            errors.push(ValidationError::MissingArguments {
                start: expected,
                end: index,
            });
        }
        expected = index.saturating_add(1);
    }

    if !errors.is_empty() {
        log::debug!("template has {} validation problem(s)", errors.len());
    }
    errors
}
