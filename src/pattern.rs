//! glob and ignore-rule matching over tree-relative paths
//!
//! globs follow shell semantics: `*` and `?` never cross a `/`, and a leading
//! dot is matched like any other character. a run of stars is a single `*`.

use std::borrow::Cow;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// a set of compiled globs, tried in order
#[derive(Debug, Clone)]
pub struct GlobSet {
    patterns: Vec<Pattern>,
}

impl GlobSet {
    /// compile every pattern, failing on the first malformed one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// index of the first pattern matching `path`
    pub fn first_match(&self, path: &str) -> Option<usize> {
        self.patterns
            .iter()
            .position(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    /// does any pattern match `path`
    pub fn is_match(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// match a single glob against a path
pub fn match_path(pattern: &str, path: &str) -> Result<bool> {
    Ok(compile(pattern)?.matches_with(path, MATCH_OPTIONS))
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(&collapse_stars(pattern)).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// fold `**` (and longer runs) into `*` so no wildcard reaches across `/`.
/// character classes are copied untouched, `[*]` stays a literal star.
fn collapse_stars(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains("**") {
        return Cow::Borrowed(pattern);
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => {
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                // a leading `]` is part of the class
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                match chars[j..].iter().position(|&c| c == ']') {
                    Some(k) => {
                        out.extend(&chars[i..=j + k]);
                        i = j + k + 1;
                    }
                    None => {
                        // unterminated, left for the glob parser to reject
                        out.extend(&chars[i..]);
                        break;
                    }
                }
            }
            '*' => {
                out.push('*');
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Cow::Owned(out)
}

/// gitignore-style rules compiled from the lines of an ignore file
#[derive(Debug)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    /// compile rules; blank lines and `#` comments are skipped by the matcher
    pub fn compile<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new("");
        for line in lines {
            let line = line.as_ref().trim_end_matches('\r');
            builder.add_line(None, line).map_err(|e| Error::Pattern {
                pattern: line.to_string(),
                message: e.to_string(),
            })?;
        }
        let matcher = builder.build().map_err(|e| Error::Pattern {
            pattern: "<ignore rules>".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { matcher })
    }

    /// compile rules from raw ignore file contents
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(data);
        let lines: Vec<&str> = text.split('\n').collect();
        Self::compile(&lines)
    }

    /// is the tree-relative `path` ignored
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        self.matcher.matched(Path::new(path), is_dir).is_ignore()
    }

    /// number of rules
    pub fn len(&self) -> usize {
        self.matcher.num_ignores() as usize + self.matcher.num_whitelists() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}
