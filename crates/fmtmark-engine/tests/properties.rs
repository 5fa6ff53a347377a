//! Property-based tests for template parsing.

use fmtmark_engine::parse;
use proptest::prelude::*;

/// Templates built from text, delimiters, paragraph breaks and `%@`.
fn template_strategy() -> impl Strategy<Value = String> {
    let delimiters = prop::sample::select(vec![
        "*", "**", "***", "~~", "`", "[", "](", ")", "\n", "\n\n",
    ])
    .prop_map(str::to_string);

    prop::collection::vec(
        prop_oneof![
            3 => "[a-z ]{1,6}",
            2 => Just("%@".to_string()),
            3 => delimiters,
        ],
        0..40,
    )
    .prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn syntax_tree_is_lossless(input in any::<String>()) {
        let tree = fmtmark_syntax::parse(&input);
        prop_assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn syntax_tree_is_lossless_for_templates(input in template_strategy()) {
        let tree = fmtmark_syntax::parse(&input);
        prop_assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn plain_text_needs_no_tree(input in "[a-zA-Z0-9 ,.!?'\"-]{0,60}") {
        prop_assert!(parse(&input).is_none());
    }

    #[test]
    fn implicit_indexes_follow_document_order(input in template_strategy()) {
        let expected: Vec<usize> = (0..input.matches("%@").count()).collect();
        let actual = parse(&input)
            .map(|tree| tree.interpolation_indexes_in_order())
            .unwrap_or_default();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn markers_match_indexes(input in template_strategy()) {
        if let Some(tree) = parse(&input) {
            for leaf in tree.leaves() {
                let markers = leaf
                    .literal
                    .as_deref()
                    .map_or(0, |l| l.matches(fmtmark_engine::PLACEHOLDER_MARKER).count());
                prop_assert_eq!(markers, leaf.interpolation_indexes.len());
            }
        }
    }
}
