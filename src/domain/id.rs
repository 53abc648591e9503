use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Serialize};

/// Minimum number of digits in a formatted identifier.
///
/// Counters wider than this are printed in full (`BUG-12345`).
pub const DIGITS: usize = 4;

/// Identifier of an issue.
///
/// Format: `BUG-{ID}`, where `ID` is a positive, non-zero counter padded with
/// leading zeros to [`DIGITS`] digits.
///
/// # Examples
///
/// ```
/// use bugtrack::IssueId;
///
/// let id: IssueId = "BUG-0042".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "BUG-0042");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct IssueId(NonZeroUsize);

/// Identifier of a comment.
///
/// Format: `COMMENT-{ID}`. Comment counters are shared by all issues, so two
/// comments never carry the same identifier even on different issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CommentId(NonZeroUsize);

impl IssueId {
    /// The textual prefix of every issue identifier.
    pub const PREFIX: &'static str = "BUG";

    /// Create an issue identifier from a counter value.
    #[must_use]
    pub const fn new(id: NonZeroUsize) -> Self {
        Self(id)
    }

    /// Returns the numeric counter value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl CommentId {
    /// The textual prefix of every comment identifier.
    pub const PREFIX: &'static str = "COMMENT";

    /// Create a comment identifier from a counter value.
    #[must_use]
    pub const fn new(id: NonZeroUsize) -> Self {
        Self(id)
    }

    /// Returns the numeric counter value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{:0width$}", Self::PREFIX, self.0, width = DIGITS)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{:0width$}", Self::PREFIX, self.0, width = DIGITS)
    }
}

/// Errors that can occur while parsing an identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed structure (missing separator, empty segments).
    #[error("Invalid identifier format: {0}")]
    Syntax(String),

    /// The identifier does not start with the expected prefix.
    #[error("Invalid identifier '{id}': expected prefix {expected}")]
    Prefix {
        /// The identifier as given.
        id: String,
        /// The prefix that was expected.
        expected: &'static str,
    },

    /// The counter is non-numeric or zero.
    #[error("Invalid ID in identifier '{0}': expected a non-zero integer, got {1}")]
    Id(String, String),
}

fn parse_counter(s: &str, prefix: &'static str) -> Result<NonZeroUsize, Error> {
    let Some((head, tail)) = s.rsplit_once('-') else {
        return Err(Error::Syntax(s.to_string()));
    };

    if head.is_empty() || tail.is_empty() {
        return Err(Error::Syntax(s.to_string()));
    }

    if head != prefix {
        return Err(Error::Prefix {
            id: s.to_string(),
            expected: prefix,
        });
    }

    // `usize::from_str` accepts a leading '+', which is not part of the format
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Id(s.to_string(), tail.to_string()));
    }

    tail.parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| Error::Id(s.to_string(), tail.to_string()))
}

impl FromStr for IssueId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_counter(s, Self::PREFIX).map(Self)
    }
}

impl FromStr for CommentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_counter(s, Self::PREFIX).map(Self)
    }
}

impl TryFrom<&str> for IssueId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl TryFrom<String> for IssueId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl TryFrom<String> for CommentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<IssueId> for String {
    fn from(id: IssueId) -> Self {
        id.to_string()
    }
}

impl From<CommentId> for String {
    fn from(id: CommentId) -> Self {
        id.to_string()
    }
}

/// Monotonic allocator of counter values, starting at 1.
///
/// Each registry owns its own sequences; values are never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sequence {
    next: NonZeroUsize,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            next: NonZeroUsize::MIN,
        }
    }
}

impl Sequence {
    /// Returns the next counter value and advances the sequence.
    ///
    /// # Panics
    ///
    /// Panics if the counter overflows `usize`.
    pub(crate) fn allocate(&mut self) -> NonZeroUsize {
        let current = self.next;
        self.next = current.checked_add(1).expect("identifier counter overflow!");
        current
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn issue(id: usize) -> IssueId {
        IssueId::new(NonZeroUsize::new(id).unwrap())
    }

    #[test_case(1, "BUG-0001"; "smallest")]
    #[test_case(42, "BUG-0042"; "padded")]
    #[test_case(9999, "BUG-9999"; "at boundary")]
    #[test_case(10_000, "BUG-10000"; "expansion")]
    fn issue_id_display(id: usize, expected: &str) {
        assert_eq!(issue(id).to_string(), expected);
    }

    #[test]
    fn comment_id_display() {
        let id = CommentId::new(NonZeroUsize::new(7).unwrap());
        assert_eq!(id.to_string(), "COMMENT-0007");
    }

    #[test]
    fn parse_valid() {
        assert_eq!("BUG-0001".parse::<IssueId>().unwrap(), issue(1));
        assert_eq!("BUG-1".parse::<IssueId>().unwrap(), issue(1));
        assert_eq!("BUG-12345".parse::<IssueId>().unwrap(), issue(12345));
        assert_eq!("COMMENT-0003".parse::<CommentId>().unwrap().get(), 3);
    }

    #[test_case(""; "empty")]
    #[test_case("BUG0001"; "no dash")]
    #[test_case("-0001"; "empty prefix")]
    #[test_case("BUG-"; "empty counter")]
    fn parse_invalid_syntax(input: &str) {
        assert!(matches!(IssueId::from_str(input), Err(Error::Syntax(_))));
    }

    #[test_case("bug-0001"; "lowercase")]
    #[test_case("COMMENT-0001"; "other kind")]
    #[test_case("X-BUG-0001"; "extra segment")]
    fn parse_invalid_prefix(input: &str) {
        assert!(matches!(IssueId::from_str(input), Err(Error::Prefix { .. })));
    }

    #[test_case("BUG-0000"; "zero")]
    #[test_case("BUG-abc"; "non numeric")]
    #[test_case("BUG-+12"; "sign")]
    #[test_case("BUG-12a"; "mixed")]
    fn parse_invalid_counter(input: &str) {
        assert!(matches!(IssueId::from_str(input), Err(Error::Id(_, _))));
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&issue(5)).unwrap();
        assert_eq!(json, "\"BUG-0005\"");
        let back: IssueId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issue(5));
    }

    #[test]
    fn sequence_is_monotonic() {
        let mut sequence = Sequence::default();
        let allocated: Vec<usize> = (0..4).map(|_| sequence.allocate().get()).collect();
        assert_eq!(allocated, vec![1, 2, 3, 4]);
    }

    #[test]
    fn error_display() {
        let error = Error::Id("BUG-x".to_string(), "x".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid ID in identifier 'BUG-x': expected a non-zero integer, got x"
        );
    }
}
