//! Scene path algebra: immutable hierarchical node identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unicode_normalization::UnicodeNormalization;

use crate::error::PathError;

/// Immutable hierarchical path identifying a scene graph node.
///
/// A path is an ordered sequence of name tokens, either absolute (anchored at
/// the root `/`) or relative. Paths are value types: equality, ordering and
/// hashing are structural. The default path is the empty relative path, which
/// serves as the "no path" sentinel and is distinct from the root `/`.
///
/// All prefix operations work on the token sequence, never on path text, so
/// `/AB/C` does not have prefix `/A`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScenePath {
    absolute: bool,
    tokens: Vec<String>,
}

impl ScenePath {
    /// The absolute root path `/`.
    pub fn root() -> Self {
        Self {
            absolute: true,
            tokens: Vec::new(),
        }
    }

    /// Parse a path from its text form.
    ///
    /// A leading `/` makes the path absolute; the empty string parses to the
    /// empty relative path. One trailing `/` is tolerated and dropped. Tokens
    /// are normalized to Unicode NFC so that equal-looking paths compare
    /// equal.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Ok(Self::default());
        }
        if text.contains("//") {
            return Err(PathError::EmptyElement(text.to_string()));
        }

        let absolute = text.starts_with('/');
        let body = text.strip_prefix('/').unwrap_or(text);
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut tokens = Vec::new();
        if !body.is_empty() {
            for raw in body.split('/') {
                if raw == "." || raw == ".." {
                    return Err(PathError::InvalidElement {
                        text: text.to_string(),
                        element: raw.to_string(),
                    });
                }
                tokens.push(raw.nfc().collect());
            }
        }

        Ok(Self { absolute, tokens })
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// True for the empty relative path (the "no path" sentinel).
    pub fn is_empty(&self) -> bool {
        !self.absolute && self.tokens.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.tokens.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn elements(&self) -> &[String] {
        &self.tokens
    }

    /// The last name token, if any.
    pub fn name(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// The path with the last token removed. `None` when there is no token to
    /// remove (root or empty path).
    pub fn parent(&self) -> Option<ScenePath> {
        if self.tokens.is_empty() {
            return None;
        }
        Some(Self {
            absolute: self.absolute,
            tokens: self.tokens[..self.tokens.len() - 1].to_vec(),
        })
    }

    /// Token-sequence prefix test. Anchoring must match: a relative path never
    /// has an absolute prefix and vice versa. Every path is a prefix of
    /// itself, and root is a prefix of every absolute path.
    pub fn has_prefix(&self, prefix: &ScenePath) -> bool {
        self.absolute == prefix.absolute
            && self.tokens.len() >= prefix.tokens.len()
            && self.tokens[..prefix.tokens.len()] == prefix.tokens[..]
    }

    /// Substitute the leading token run `old` with `new`. A no-op (returns
    /// self unchanged) when `old` is not a prefix of this path.
    pub fn replace_prefix(&self, old: &ScenePath, new: &ScenePath) -> ScenePath {
        if !self.has_prefix(old) {
            return self.clone();
        }
        let mut tokens = new.tokens.clone();
        tokens.extend_from_slice(&self.tokens[old.tokens.len()..]);
        ScenePath {
            absolute: new.absolute,
            tokens,
        }
    }

    /// The relative path from `base` to this path. Returns self unchanged when
    /// `base` is not a prefix.
    pub fn make_relative(&self, base: &ScenePath) -> ScenePath {
        if !self.has_prefix(base) {
            return self.clone();
        }
        ScenePath {
            absolute: false,
            tokens: self.tokens[base.tokens.len()..].to_vec(),
        }
    }

    /// Append the tokens of `suffix`, keeping this path's anchoring.
    pub fn append(&self, suffix: &ScenePath) -> ScenePath {
        let mut tokens = self.tokens.clone();
        tokens.extend_from_slice(&suffix.tokens);
        ScenePath {
            absolute: self.absolute,
            tokens,
        }
    }

    /// Append a single child token.
    pub fn append_child(&self, name: &str) -> ScenePath {
        let mut tokens = self.tokens.clone();
        tokens.push(name.nfc().collect());
        ScenePath {
            absolute: self.absolute,
            tokens,
        }
    }

    /// All ancestor paths from the first element down to self inclusive; root
    /// is not included. `/A/B/C` yields `[/A, /A/B, /A/B/C]`, so indexing by
    /// an ancestor's `element_count()` gives the next element on the chain
    /// toward self.
    pub fn prefixes(&self) -> Vec<ScenePath> {
        (1..=self.tokens.len())
            .map(|n| ScenePath {
                absolute: self.absolute,
                tokens: self.tokens[..n].to_vec(),
            })
            .collect()
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        f.write_str(&self.tokens.join("/"))
    }
}

impl FromStr for ScenePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ScenePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScenePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ScenePath::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for text in ["/", "", "/A/B/C", "Foo/Bar", "/world"] {
            assert_eq!(p(text).to_string(), text);
        }
    }

    #[test]
    fn test_root_and_empty_are_distinct() {
        assert!(ScenePath::root().is_root());
        assert!(!ScenePath::root().is_empty());
        assert!(ScenePath::default().is_empty());
        assert_ne!(ScenePath::root(), ScenePath::default());
    }

    #[test]
    fn test_parse_rejects_empty_elements() {
        assert!(ScenePath::parse("/A//B").is_err());
        assert!(ScenePath::parse("//").is_err());
    }

    #[test]
    fn test_parse_rejects_dot_elements() {
        assert!(ScenePath::parse("/A/./B").is_err());
        assert!(ScenePath::parse("../B").is_err());
    }

    #[test]
    fn test_parse_drops_single_trailing_slash() {
        assert_eq!(p("/A/B/"), p("/A/B"));
    }

    #[test]
    fn test_unicode_normalization() {
        // NFC: precomposed and combining forms compare equal
        let composed = p("/caf\u{e9}");
        let decomposed = p("/cafe\u{301}");
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn test_has_prefix_is_token_wise() {
        assert!(p("/A/B/C").has_prefix(&p("/A/B")));
        assert!(p("/A/B").has_prefix(&p("/A/B")));
        assert!(p("/A/B").has_prefix(&ScenePath::root()));
        // not a substring test
        assert!(!p("/AB/C").has_prefix(&p("/A")));
    }

    #[test]
    fn test_has_prefix_requires_matching_anchor() {
        assert!(!p("A/B").has_prefix(&p("/A")));
        assert!(!p("/A/B").has_prefix(&p("A")));
        assert!(!p("A/B").has_prefix(&ScenePath::root()));
    }

    #[test]
    fn test_replace_prefix() {
        assert_eq!(p("/A/B/C").replace_prefix(&p("/A"), &p("/X")), p("/X/B/C"));
        assert_eq!(
            p("/Foo/Bar").replace_prefix(&ScenePath::root(), &p("/A/B")),
            p("/A/B/Foo/Bar")
        );
        // no-op when old is not a prefix
        assert_eq!(p("/A/B").replace_prefix(&p("/X"), &p("/Y")), p("/A/B"));
    }

    #[test]
    fn test_make_relative() {
        assert_eq!(p("/A/B/C").make_relative(&p("/A")), p("B/C"));
        assert_eq!(p("/A/B").make_relative(&ScenePath::root()), p("A/B"));
        assert_eq!(p("/A/B").make_relative(&p("/X")), p("/A/B"));
    }

    #[test]
    fn test_append() {
        assert_eq!(p("/A").append(&p("B/C")), p("/A/B/C"));
        assert_eq!(p("/A").append_child("B"), p("/A/B"));
        assert_eq!(ScenePath::root().append(&p("A")), p("/A"));
    }

    #[test]
    fn test_prefixes_excludes_root() {
        assert_eq!(p("/A/B/C").prefixes(), vec![p("/A"), p("/A/B"), p("/A/B/C")]);
        assert!(ScenePath::root().prefixes().is_empty());
    }

    #[test]
    fn test_prefixes_indexing_gives_next_element() {
        let prefix = p("/A/B/C/D");
        assert_eq!(prefix.prefixes()[p("/A/B").element_count()], p("/A/B/C"));
        assert_eq!(prefix.prefixes()[0], p("/A"));
    }

    #[test]
    fn test_parent_and_name() {
        assert_eq!(p("/A/B").parent(), Some(p("/A")));
        assert_eq!(p("/A").parent(), Some(ScenePath::root()));
        assert_eq!(ScenePath::root().parent(), None);
        assert_eq!(p("/A/B").name(), Some("B"));
    }

    #[test]
    fn test_serde_round_trip() {
        let path = p("/A/B/C");
        let serialized = serde_json::to_string(&path).unwrap();
        assert_eq!(serialized, "\"/A/B/C\"");
        let parsed: ScenePath = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn test_ordering_groups_children_after_parent() {
        let mut paths = vec![p("/A/D"), p("/A/B/C"), p("/A/B")];
        paths.sort();
        assert_eq!(paths, vec![p("/A/B"), p("/A/B/C"), p("/A/D")]);
    }
}
