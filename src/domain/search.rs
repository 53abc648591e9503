//! Issue search criteria.

use regex::Regex;

use crate::domain::{Issue, Priority, Status, issue::normalize_tag};

/// A conjunction of optional search criteria.
///
/// An empty query matches every issue. Each criterion that is set must hold
/// for an issue to match.
///
/// ```
/// use bugtrack::{Priority, Query};
///
/// let query = Query::default().priority(Priority::High).tag("UI");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    status: Option<Status>,
    priority: Option<Priority>,
    assignee: Option<String>,
    reporter: Option<String>,
    tag: Option<String>,
    keyword: Option<String>,
    pattern: Option<Regex>,
}

impl Query {
    /// Only issues with this status.
    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Only issues with this priority.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Only issues assigned to this user.
    #[must_use]
    pub fn assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assignee = Some(user_id.into());
        self
    }

    /// Only issues reported by this user.
    #[must_use]
    pub fn reporter(mut self, user_id: impl Into<String>) -> Self {
        self.reporter = Some(user_id.into());
        self
    }

    /// Only issues carrying this tag.
    ///
    /// The tag is normalized the same way stored tags are, so the match is
    /// case-insensitive. A blank tag matches nothing.
    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(normalize_tag(tag).unwrap_or_default());
        self
    }

    /// Only issues whose title or description contains the keyword,
    /// ignoring case.
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into().to_lowercase());
        self
    }

    /// Only issues whose title or description matches the regular
    /// expression.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Whether no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.reporter.is_none()
            && self.tag.is_none()
            && self.keyword.is_none()
            && self.pattern.is_none()
    }

    /// Whether the issue satisfies every criterion.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.status.is_none_or(|status| issue.status() == status)
            && self
                .priority
                .is_none_or(|priority| issue.priority() == priority)
            && self.assignee.as_deref().is_none_or(|user| {
                issue
                    .assignee()
                    .is_some_and(|assignee| assignee.as_str() == user)
            })
            && self
                .reporter
                .as_deref()
                .is_none_or(|user| issue.reporter().as_str() == user)
            && self
                .tag
                .as_ref()
                .is_none_or(|tag| issue.tags().contains(tag))
            && self
                .keyword
                .as_deref()
                .is_none_or(|keyword| issue.mentions(keyword))
            && self.pattern.as_ref().is_none_or(|pattern| {
                pattern.is_match(issue.title()) || pattern.is_match(issue.description())
            })
    }
}
