use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Comment, IssueId, UserId};

/// How urgently an issue needs attention.
///
/// Serialized in `snake_case`; deserialization accepts any spelling
/// [`FromStr`] does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal priority.
    Medium,
    /// Should be handled soon.
    High,
    /// Drop everything.
    Critical,
}

impl Priority {
    /// Every priority, in declaration order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("unknown priority: {s}")),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where an issue is in its lifecycle.
///
/// Any status may follow any other; no transition graph is enforced.
/// Deserialization accepts "In Progress", "in-progress" and "in_progress"
/// alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Status {
    /// Newly reported.
    Open,
    /// Someone is working on it.
    InProgress,
    /// A fix is available.
    Resolved,
    /// Done.
    Closed,
    /// Will not be fixed.
    Rejected,
}

impl Status {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Resolved,
        Self::Closed,
        Self::Rejected,
    ];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Rejected => "Rejected",
        })
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown status: {s}")),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Normalize a tag for storage and lookup.
///
/// Tags are trimmed and lower-cased. Returns `None` for blank input.
#[must_use]
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}

/// Error returned when a title update is blank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Title cannot be empty")]
pub struct EmptyTitleError;

/// A tracked defect.
///
/// Every mutation refreshes [`Issue::last_modified`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    id: IssueId,
    title: String,
    description: String,
    priority: Priority,
    status: Status,
    reporter: UserId,
    assignee: Option<UserId>,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    comments: Vec<Comment>,
    tags: BTreeSet<String>,
}

impl Issue {
    /// Construct a new open [`Issue`].
    ///
    /// The title is not validated here; only [`Issue::set_title`] rejects
    /// blank titles.
    pub(crate) fn new(
        id: IssueId,
        title: String,
        description: String,
        priority: Priority,
        reporter: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description,
            priority,
            status: Status::Open,
            reporter,
            assignee: None,
            created: now,
            last_modified: now,
            comments: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// The issue's identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// The issue's title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The issue's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The issue's priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// The issue's status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The user who reported the issue.
    #[must_use]
    pub const fn reporter(&self) -> &UserId {
        &self.reporter
    }

    /// The user the issue is assigned to, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&UserId> {
        self.assignee.as_ref()
    }

    /// When the issue was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// When the issue was last changed.
    #[must_use]
    pub const fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// The comments on the issue, oldest first.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// The issue's tags, normalized and sorted.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the issue carries the given tag (compared after
    /// normalization).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|tag| self.tags.contains(&tag))
    }

    /// Case-insensitive substring match against title or description.
    #[must_use]
    pub fn mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    #[cfg(test)]
    pub(crate) const fn backdate(&mut self, to: DateTime<Utc>) {
        self.last_modified = to;
    }

    /// Replace the title.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTitleError`] if the title is blank; the previous title
    /// is kept.
    pub(crate) fn set_title(&mut self, title: String) -> Result<(), EmptyTitleError> {
        if title.trim().is_empty() {
            return Err(EmptyTitleError);
        }
        self.title = title;
        self.touch();
        Ok(())
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
        self.touch();
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) -> Priority {
        let previous = std::mem::replace(&mut self.priority, priority);
        self.touch();
        previous
    }

    pub(crate) fn set_status(&mut self, status: Status) -> Status {
        let previous = std::mem::replace(&mut self.status, status);
        self.touch();
        previous
    }

    pub(crate) fn set_assignee(&mut self, assignee: UserId) {
        self.assignee = Some(assignee);
        self.touch();
    }

    pub(crate) fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.touch();
    }

    /// Add a tag.
    ///
    /// Blank tags are ignored and leave the issue untouched. Returns `true`
    /// if a new tag was inserted.
    pub(crate) fn add_tag(&mut self, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        let inserted = self.tags.insert(tag);
        self.touch();
        inserted
    }

    /// Remove a tag. Returns `true` if the tag was present; only then is the
    /// issue touched.
    pub(crate) fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        let removed = self.tags.remove(&tag);
        if removed {
            self.touch();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use test_case::test_case;

    use super::*;

    fn issue() -> Issue {
        Issue::new(
            IssueId::new(NonZeroUsize::MIN),
            "Login page crashes on mobile".to_string(),
            "The login page crashes in mobile Safari".to_string(),
            Priority::High,
            UserId::from("TEST001"),
        )
    }

    #[test]
    fn new_issue_is_open_and_unassigned() {
        let issue = issue();
        assert_eq!(issue.status(), Status::Open);
        assert!(issue.assignee().is_none());
        assert_eq!(issue.created(), issue.last_modified());
    }

    #[test_case("ui", Some("ui"); "plain")]
    #[test_case(" UI ", Some("ui"); "padded upper")]
    #[test_case("Mobile Web", Some("mobile web"); "inner space kept")]
    #[test_case("", None; "empty")]
    #[test_case("   ", None; "blank")]
    fn tag_normalization(input: &str, expected: Option<&str>) {
        assert_eq!(normalize_tag(input).as_deref(), expected);
    }

    #[test]
    fn tags_are_deduplicated_after_normalization() {
        let mut issue = issue();
        assert!(issue.add_tag("UI"));
        assert!(!issue.add_tag(" ui "));
        assert!(!issue.add_tag("ui"));
        assert_eq!(issue.tags().iter().collect::<Vec<_>>(), vec!["ui"]);
    }

    #[test]
    fn blank_tag_is_ignored_without_touching() {
        let mut issue = issue();
        let before = issue.last_modified();
        assert!(!issue.add_tag("  "));
        assert!(issue.tags().is_empty());
        assert_eq!(issue.last_modified(), before);
    }

    #[test]
    fn remove_tag_normalizes() {
        let mut issue = issue();
        issue.add_tag("database");
        assert!(issue.remove_tag(" DATABASE"));
        assert!(!issue.remove_tag("database"));
        assert!(issue.tags().is_empty());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut issue = issue();
        assert_eq!(issue.set_title("  ".to_string()), Err(EmptyTitleError));
        assert_eq!(issue.set_title(String::new()), Err(EmptyTitleError));
        assert_eq!(issue.title(), "Login page crashes on mobile");

        issue.set_title("Login crash".to_string()).unwrap();
        assert_eq!(issue.title(), "Login crash");
    }

    #[test]
    fn setters_return_previous_values() {
        let mut issue = issue();
        assert_eq!(issue.set_status(Status::Closed), Status::Open);
        assert_eq!(issue.set_status(Status::Open), Status::Closed);
        assert_eq!(issue.set_priority(Priority::Low), Priority::High);
    }

    #[test]
    fn keyword_matches_title_or_description() {
        let issue = issue();
        assert!(issue.mentions("LOGIN"));
        assert!(issue.mentions("safari"));
        assert!(!issue.mentions("database"));
    }

    #[test_case("in progress", Status::InProgress; "with space")]
    #[test_case("in_progress", Status::InProgress; "snake case")]
    #[test_case("In-Progress", Status::InProgress; "with dash")]
    #[test_case("REJECTED", Status::Rejected; "uppercase")]
    fn status_from_str(input: &str, expected: Status) {
        assert_eq!(input.parse::<Status>().unwrap(), expected);
    }

    #[test_case("\"in_progress\"", Status::InProgress; "snake case")]
    #[test_case("\"In Progress\"", Status::InProgress; "display name")]
    #[test_case("\"CLOSED\"", Status::Closed; "uppercase")]
    fn status_deserializes_leniently(json: &str, expected: Status) {
        assert_eq!(serde_json::from_str::<Status>(json).unwrap(), expected);
    }

    #[test]
    fn priority_round_trips_through_serde() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::from_str::<Priority>("\"Critical\"").unwrap(),
            Priority::Critical
        );
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(Status::InProgress.to_string(), "In Progress");
        assert_eq!(Priority::Critical.to_string(), "Critical");
        assert!("urgent".parse::<Priority>().is_err());
    }
}
