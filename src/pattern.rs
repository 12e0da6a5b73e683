//! Path pattern compiler.
//!
//! A pattern is a `/`-separated path template. A segment that starts with `:`
//! binds whatever non-empty request segment sits at that position to a name;
//! every other segment must match that request segment, ignoring ASCII case.
//!
//! ```text
//! pattern        /users/:id/posts/:post
//! request path   /users/7/posts/19
//! captures       ["7", "19"]   names  ["id", "post"]
//! ```
//!
//! Matching is strict: the request must have exactly as many segments as the
//! pattern, so `/users/7/` does not match `/users/:id`. Literals compare
//! without regard to ASCII case, while captured values keep the case the
//! client sent. There are no wildcards and no optional segments.
//!
//! Patterns are compiled once, when a route is registered. A malformed
//! pattern is a [`PatternError`] at that point and never surfaces while
//! serving.

use thiserror::Error;

/// Characters a literal segment may not contain: they either cannot appear in
/// a request path (`?`, `#`) or would silently mean something else to users
/// coming from wildcard/regex routers (`*`, `(`, `)`).
const RESERVED: [char; 5] = ['?', '#', '*', '(', ')'];

/// A malformed route pattern.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PatternError {
    #[error("invalid pattern `{pattern}`: parameter in segment {segment} has no name")]
    EmptyName { pattern: String, segment: usize },

    #[error("invalid pattern `{pattern}`: parameter name `{name}` may only contain [A-Za-z0-9_]")]
    InvalidName { pattern: String, name: String },

    #[error("invalid pattern `{pattern}`: parameter `{name}` is bound more than once")]
    DuplicateName { pattern: String, name: String },

    #[error("invalid pattern `{pattern}`: reserved character `{ch}` in segment `{segment}`")]
    ReservedChar { pattern: String, segment: String, ch: char },
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Param,
}

/// A compiled path pattern: a matcher plus the ordered parameter names.
///
/// `names()[i]` always labels `captures(path)?[i]`.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
    names: Vec<String>,
}

impl Pattern {
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for (index, raw) in source.split('/').enumerate() {
            let Some(name) = raw.strip_prefix(':') else {
                if let Some(ch) = raw.chars().find(|c| RESERVED.contains(c)) {
                    return Err(PatternError::ReservedChar {
                        pattern: source.to_owned(),
                        segment: raw.to_owned(),
                        ch,
                    });
                }
                segments.push(Segment::Literal(raw.to_owned()));
                continue;
            };

            if name.is_empty() {
                return Err(PatternError::EmptyName { pattern: source.to_owned(), segment: index });
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidName {
                    pattern: source.to_owned(),
                    name: name.to_owned(),
                });
            }
            if names.iter().any(|n| n == name) {
                return Err(PatternError::DuplicateName {
                    pattern: source.to_owned(),
                    name: name.to_owned(),
                });
            }

            names.push(name.to_owned());
            segments.push(Segment::Param);
        }

        Ok(Self { source: source.to_owned(), segments, names })
    }

    /// Matches `path` and returns the captured values in [`names`](Self::names)
    /// order, or `None` when the path does not fit the pattern.
    ///
    /// `path` is the request path only; strip the query string first.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let mut parts = path.split('/');
        let mut captures = Vec::with_capacity(self.names.len());

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal.eq_ignore_ascii_case(part) => {}
                Segment::Literal(_) => return None,
                Segment::Param if part.is_empty() => return None,
                Segment::Param => captures.push(part.to_owned()),
            }
        }

        // Leftover request segments mean the path is longer than the pattern.
        if parts.next().is_some() {
            return None;
        }
        Some(captures)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Parameter names in the order they appear in the pattern.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(pattern: &str, path: &str) -> Option<Vec<String>> {
        Pattern::compile(pattern).unwrap().captures(path)
    }

    #[test]
    fn static_pattern_yields_zero_captures() {
        let pattern = Pattern::compile("/health/live").unwrap();
        assert!(pattern.names().is_empty());
        assert_eq!(pattern.captures("/health/live"), Some(vec![]));
        assert_eq!(pattern.captures("/health"), None);
        assert_eq!(pattern.captures("/health/live/extra"), None);
    }

    #[test]
    fn named_segments_capture_in_pattern_order() {
        let pattern = Pattern::compile("/users/:user_id/posts/:post").unwrap();
        assert_eq!(pattern.names(), ["user_id", "post"]);
        assert_eq!(
            pattern.captures("/users/7/posts/19"),
            Some(vec!["7".to_owned(), "19".to_owned()]),
        );
    }

    #[test]
    fn parameter_never_matches_an_empty_segment() {
        assert_eq!(caps("/user/:id", "/user/"), None);
        assert_eq!(caps("/user/:id/edit", "/user//edit"), None);
    }

    #[test]
    fn no_trailing_slash_leniency() {
        assert_eq!(caps("/user", "/user/"), None);
        assert_eq!(caps("/user/", "/user"), None);
        assert_eq!(caps("/user/", "/user/"), Some(vec![]));
    }

    #[test]
    fn literals_ignore_ascii_case() {
        assert_eq!(caps("/Users", "/users"), Some(vec![]));
        assert_eq!(caps("/user/:id", "/USER/AbC"), Some(vec!["AbC".to_owned()]));
        assert_eq!(caps("/user/:id", "/usr/AbC"), None);
    }

    #[test]
    fn double_slash_is_kept_literally() {
        // base "/v1/" + "/user" concatenates to a pattern with an empty segment
        assert_eq!(caps("/v1//user", "/v1//user"), Some(vec![]));
        assert_eq!(caps("/v1//user", "/v1/user"), None);
    }

    #[test]
    fn colon_inside_a_segment_is_literal() {
        assert_eq!(caps("/time/12:30", "/time/12:30"), Some(vec![]));
    }

    #[test]
    fn captured_values_are_not_decoded() {
        assert_eq!(caps("/files/:name", "/files/a%20b"), Some(vec!["a%20b".to_owned()]));
    }

    #[test]
    fn root_and_empty_patterns() {
        assert_eq!(caps("/", "/"), Some(vec![]));
        assert_eq!(caps("/", "/x"), None);
        // An empty pattern only matches an empty path, which no request has.
        assert_eq!(caps("", "/"), None);
    }

    #[test]
    fn bare_colon_is_rejected() {
        let err = Pattern::compile("/user/:").unwrap_err();
        assert_eq!(err, PatternError::EmptyName { pattern: "/user/:".into(), segment: 2 });
    }

    #[test]
    fn modifiers_and_regex_groups_are_rejected() {
        for bad in ["/user/:id?", "/user/:id(\\d+)", "/user/:id-name", "/user/:id+"] {
            assert!(
                matches!(Pattern::compile(bad), Err(PatternError::InvalidName { .. })),
                "{bad} should be rejected",
            );
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Pattern::compile("/a/:id/b/:id").unwrap_err();
        assert_eq!(err, PatternError::DuplicateName { pattern: "/a/:id/b/:id".into(), name: "id".into() });
    }

    #[test]
    fn reserved_characters_in_literals_are_rejected() {
        assert!(matches!(
            Pattern::compile("/files/*"),
            Err(PatternError::ReservedChar { ch: '*', .. })
        ));
        assert!(matches!(
            Pattern::compile("/search?q"),
            Err(PatternError::ReservedChar { ch: '?', .. })
        ));
    }

    #[test]
    fn error_message_names_the_pattern() {
        let err = Pattern::compile("/x/:").unwrap_err();
        assert!(err.to_string().contains("`/x/:`"));
    }
}
