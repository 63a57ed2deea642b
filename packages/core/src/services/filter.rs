//! Filter Predicate Evaluator
//!
//! Pure, stateless evaluation of one advanced-filter rule against one node.
//! Polarity (`inverted`) is applied by the derivation stage that partitions
//! rules; this evaluator only answers whether the rule's value matches.

use crate::models::{FilterKind, FilterRule, GraphNode, NodeKind};

/// Whether `rule` matches `node`, ignoring the rule's polarity.
///
/// - Empty or whitespace-only values never match.
/// - `path` rules match a case-insensitive substring of the node id and
///   never match tag nodes.
/// - `tag` rules match against the node's tag list, case-insensitive, with
///   a leading `#` on the rule value stripped.
pub fn rule_matches(node: &GraphNode, rule: &FilterRule) -> bool {
    let value = rule.value.trim();
    if value.is_empty() {
        return false;
    }
    match rule.kind {
        FilterKind::Path => {
            if node.kind == NodeKind::Tag {
                return false;
            }
            node.id.to_lowercase().contains(&value.to_lowercase())
        }
        FilterKind::Tag => {
            let wanted = value.trim_start_matches('#').to_lowercase();
            node.tags.iter().any(|tag| tag.to_lowercase() == wanted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterRule;

    fn doc(id: &str, tags: &[&str]) -> GraphNode {
        GraphNode::document(
            id,
            id.trim_end_matches(".md"),
            tags.iter().map(|t| t.to_string()).collect(),
            None,
        )
    }

    #[test]
    fn path_rule_matches_substring_case_insensitive() {
        let node = doc("Projects/Plan.md", &[]);
        assert!(rule_matches(&node, &FilterRule::path("projects/")));
        assert!(rule_matches(&node, &FilterRule::path("PLAN")));
        assert!(!rule_matches(&node, &FilterRule::path("archive/")));
    }

    #[test]
    fn path_rule_never_matches_tag_nodes() {
        let tag = GraphNode::tag("project");
        assert!(!rule_matches(&tag, &FilterRule::path("tag:")));
        assert!(!rule_matches(&tag, &FilterRule::path("project")));
    }

    #[test]
    fn tag_rule_strips_marker_and_ignores_case() {
        let node = doc("a.md", &["Project"]);
        assert!(rule_matches(&node, &FilterRule::tag("#project")));
        assert!(rule_matches(&node, &FilterRule::tag("PROJECT")));
        assert!(!rule_matches(&node, &FilterRule::tag("#other")));
    }

    #[test]
    fn tag_rule_inspects_tags_not_kind() {
        // a tag node carries no tags attribute, so tag rules never match it
        let tag = GraphNode::tag("project");
        assert!(!rule_matches(&tag, &FilterRule::tag("#project")));
    }

    #[test]
    fn empty_value_matches_nothing() {
        let node = doc("a.md", &["x"]);
        assert!(!rule_matches(&node, &FilterRule::path("")));
        assert!(!rule_matches(&node, &FilterRule::tag("   ")));
    }
}
