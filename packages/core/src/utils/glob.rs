//! Glob matching for `file:` color-group queries
//!
//! Translates a `*` wildcard pattern into an anchored, case-insensitive
//! regex. Everything except `*` is matched literally.

use regex::Regex;

/// Whether `text` matches the `*`-glob `pattern`, case-insensitively.
///
/// A pattern without wildcards degenerates to a case-insensitive equality
/// check. A pattern the regex engine rejects (cannot happen for escaped
/// input, but the contract is total) matches nothing.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern.eq_ignore_ascii_case(text);
    }
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    let pattern = format!("(?i)^{}$", escaped.join(".*"));
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_is_equality() {
        assert!(glob_match("plan.md", "plan.md"));
        assert!(glob_match("PLAN.MD", "plan.md"));
        assert!(!glob_match("plan.md", "plan2.md"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(glob_match("*.png", "cover.png"));
        assert!(glob_match("draft-*", "draft-2024.md"));
        assert!(glob_match("*plan*", "the-plan.md"));
        assert!(!glob_match("*.png", "cover.jpg"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(glob_match("a+b.md", "a+b.md"));
        assert!(!glob_match("a+b.md", "aab.md"));
    }
}
