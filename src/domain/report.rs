//! Summary counts and the textual issue view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Issue, Priority, Status, UserDirectory, UserId};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Issue counts, in total and grouped by status and by priority.
///
/// Every status and priority is listed, in declaration order, even when its
/// count is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of issues.
    pub total: usize,
    /// Count per status.
    pub by_status: Vec<(Status, usize)>,
    /// Count per priority.
    pub by_priority: Vec<(Priority, usize)>,
}

impl Summary {
    /// Count the given issues.
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut by_status = Status::ALL.map(|status| (status, 0));
        let mut by_priority = Priority::ALL.map(|priority| (priority, 0));
        let mut total = 0;

        for issue in issues {
            total += 1;
            for (status, count) in &mut by_status {
                if *status == issue.status() {
                    *count += 1;
                }
            }
            for (priority, count) in &mut by_priority {
                if *priority == issue.priority() {
                    *count += 1;
                }
            }
        }

        Self {
            total,
            by_status: by_status.to_vec(),
            by_priority: by_priority.to_vec(),
        }
    }

    /// Number of issues with the given status.
    #[must_use]
    pub fn status_count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, count)| *count)
    }

    /// Number of issues with the given priority.
    #[must_use]
    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority
            .iter()
            .find(|(p, _)| *p == priority)
            .map_or(0, |(_, count)| *count)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== BUG TRACKING SYSTEM SUMMARY ===")?;
        writeln!(f, "Total Bugs: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "Bugs by Status:")?;
        for (status, count) in &self.by_status {
            writeln!(f, "  {status}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Bugs by Priority:")?;
        for (priority, count) in &self.by_priority {
            writeln!(f, "  {priority}: {count}")?;
        }
        Ok(())
    }
}

/// A full textual view of one issue.
///
/// Returned by [`Registry::issue_details`](crate::Registry::issue_details).
/// User identifiers are resolved to display names through the user
/// directory; an identifier with no matching user is printed as-is.
#[derive(Debug, Clone, Copy)]
pub struct IssueDetails<'a> {
    issue: &'a Issue,
    users: &'a UserDirectory,
}

impl<'a> IssueDetails<'a> {
    pub(crate) const fn new(issue: &'a Issue, users: &'a UserDirectory) -> Self {
        Self { issue, users }
    }

    /// The issue being described.
    #[must_use]
    pub const fn issue(&self) -> &'a Issue {
        self.issue
    }

    fn name_of(&self, id: &'a UserId) -> &'a str {
        self.users
            .get_user(id.as_str())
            .map_or(id.as_str(), |user| user.name())
    }
}

fn timestamp(time: DateTime<Utc>) -> impl fmt::Display {
    time.format(TIMESTAMP_FORMAT)
}

impl fmt::Display for IssueDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issue = self.issue;

        writeln!(f, "Bug ID: {}", issue.id())?;
        writeln!(f, "Title: {}", issue.title())?;
        writeln!(f, "Description: {}", issue.description())?;
        writeln!(f, "Priority: {}", issue.priority())?;
        writeln!(f, "Status: {}", issue.status())?;
        writeln!(f, "Reporter: {}", self.name_of(issue.reporter()))?;
        writeln!(
            f,
            "Assignee: {}",
            issue
                .assignee()
                .map_or("Unassigned", |assignee| self.name_of(assignee))
        )?;
        writeln!(f, "Created: {}", timestamp(issue.created()))?;
        writeln!(f, "Last Modified: {}", timestamp(issue.last_modified()))?;

        if !issue.tags().is_empty() {
            let tags: Vec<&str> = issue.tags().iter().map(String::as_str).collect();
            writeln!(f, "Tags: {}", tags.join(", "))?;
        }

        if !issue.comments().is_empty() {
            writeln!(f, "Comments ({}):", issue.comments().len())?;
            for comment in issue.comments() {
                writeln!(
                    f,
                    "  [{}] {}: {}",
                    timestamp(comment.created()),
                    self.name_of(comment.author()),
                    comment.content()
                )?;
            }
        }

        Ok(())
    }
}
