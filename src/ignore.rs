//! `.gitignore` pattern parsing and the layered (scoped then absolute)
//! ignore resolution in §4.9.

use std::collections::HashMap;
use std::path::Path;

use glob::Pattern;

use crate::error::{GitError, Result};

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: Pattern,
    /// `true` = ignore, `false` = un-ignore (negation).
    pub ignore: bool,
}

impl IgnoreRule {
    fn matches(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }
}

/// Parses one `.gitignore`-format line. Blank lines and lines starting
/// with `#` yield `None`. A leading `!` negates (un-ignores). A leading
/// `\` escapes a literal first character (so a pattern can itself start
/// with `!` or `#`).
pub fn parse_line(line: &str) -> Option<IgnoreRule> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (body, ignore) = if let Some(rest) = trimmed.strip_prefix('!') {
        (rest, false)
    } else {
        (trimmed, true)
    };
    let body = if let Some(rest) = body.strip_prefix('\\') {
        rest
    } else {
        body
    };
    Pattern::new(body).ok().map(|pattern| IgnoreRule { pattern, ignore })
}

pub fn parse_rules(content: &str) -> Vec<IgnoreRule> {
    content.lines().filter_map(parse_line).collect()
}

/// The full ruleset: absolute sources (global config, then
/// `.git/info/exclude`, each a flat rule list) and scoped sources
/// (one rule list per directory that carries a `.gitignore`, sourced
/// from the index rather than disk per spec).
#[derive(Debug, Clone, Default)]
pub struct GitIgnore {
    pub absolute: Vec<Vec<IgnoreRule>>,
    pub scoped: HashMap<String, Vec<IgnoreRule>>,
}

impl GitIgnore {
    pub fn new() -> GitIgnore {
        GitIgnore::default()
    }

    pub fn add_absolute(&mut self, content: &str) {
        self.absolute.push(parse_rules(content));
    }

    pub fn add_scoped(&mut self, dir: &str, content: &str) {
        self.scoped.insert(dir.to_string(), parse_rules(content));
    }

    /// Evaluates whether `path` (relative to the worktree, using `/`
    /// separators) is ignored. Absolute input paths are a usage error.
    pub fn check(&self, path: &str) -> Result<bool> {
        if Path::new(path).is_absolute() {
            return Err(GitError::UsageError(format!(
                "check_ignore requires a relative path, got {path}"
            )));
        }

        if let Some(decision) = self.check_scoped(path) {
            return Ok(decision);
        }
        if let Some(decision) = self.check_absolute(path) {
            return Ok(decision);
        }
        Ok(false)
    }

    fn check_scoped(&self, path: &str) -> Option<bool> {
        let mut dir = parent_dir(path);
        loop {
            if let Some(rules) = self.scoped.get(&dir) {
                if let Some(decision) = last_match(rules, path) {
                    return Some(decision);
                }
            }
            if dir.is_empty() {
                return None;
            }
            dir = parent_dir(&dir);
        }
    }

    fn check_absolute(&self, path: &str) -> Option<bool> {
        for ruleset in &self.absolute {
            if let Some(decision) = last_match(ruleset, path) {
                return Some(decision);
            }
        }
        None
    }
}

fn last_match(rules: &[IgnoreRule], path: &str) -> Option<bool> {
    rules
        .iter()
        .filter(|r| r.matches(path))
        .last()
        .map(|r| r.ignore)
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_unignores() {
        let mut gi = GitIgnore::new();
        gi.add_scoped("", "*.log\n!keep.log\n");
        assert!(gi.check("foo.log").unwrap());
        assert!(!gi.check("keep.log").unwrap());
    }

    #[test]
    fn comment_and_blank_lines_skipped() {
        let rules = parse_rules("# comment\n\n*.tmp\n");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn scoped_overrides_absolute() {
        let mut gi = GitIgnore::new();
        gi.add_absolute("*.log\n");
        gi.add_scoped("", "!important.log\n");
        assert!(gi.check("other.log").unwrap());
        assert!(!gi.check("important.log").unwrap());
    }

    #[test]
    fn later_ruleset_match_wins_within_absolute_precedence() {
        let mut gi = GitIgnore::new();
        gi.add_absolute("*.log\n");
        gi.add_absolute("!keep.log\n");
        // First ruleset that produces *any* match wins; "*.log" matches
        // every .log file including keep.log, so the first ruleset
        // (global) decides before info/exclude is consulted.
        assert!(gi.check("keep.log").unwrap());
    }

    #[test]
    fn absolute_path_is_usage_error() {
        let gi = GitIgnore::new();
        assert!(gi.check("/abs/path").is_err());
    }

    #[test]
    fn escaped_leading_char_is_literal() {
        let rule = parse_line("\\!important").unwrap();
        assert!(rule.ignore);
        assert!(rule.matches("!important"));
    }
}
