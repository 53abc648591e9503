//! The in-memory registry of issues and users.
//!
//! The [`Registry`] owns every issue and the user directory. It allocates
//! identifiers and checks that every referenced issue and user exists before
//! changing anything, so a failed operation never leaves partial state
//! behind.

use std::{collections::BTreeMap, fmt};

use tracing::instrument;

use crate::domain::{
    Comment, CommentId, Config, Issue, IssueDetails, IssueId, Priority, Query, Status, Summary,
    User, UserDirectory,
    id::Sequence,
    issue::{EmptyTitleError, normalize_tag},
};

/// The kind of entity an operation failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// An issue.
    Issue,
    /// The user reporting an issue.
    Reporter,
    /// The user an issue is being assigned to.
    Assignee,
    /// The user writing a comment.
    Author,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Issue => "Bug",
            Self::Reporter => "Reporter",
            Self::Assignee => "Assignee",
            Self::Author => "Author",
        })
    }
}

/// Errors returned by [`Registry`] operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A referenced issue or user does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was being looked up.
        kind: EntityKind,
        /// The identifier that was not found.
        id: String,
    },

    /// An argument failed validation.
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<EmptyTitleError> for Error {
    fn from(error: EmptyTitleError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

/// The registry of issues and users.
///
/// Mutating operations take `&mut self`; a registry shared between threads
/// must be wrapped in a lock by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    users: UserDirectory,
    issues: BTreeMap<IssueId, Issue>,
    issue_ids: Sequence,
    comment_ids: Sequence,
}

impl Registry {
    /// Creates a registry with no users and no issues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the users named by the configuration.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for user in config.initial_users() {
            registry.add_user(user);
        }
        registry
    }

    /// The user directory.
    #[must_use]
    pub const fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Mutable access to the user directory.
    pub fn users_mut(&mut self) -> &mut UserDirectory {
        &mut self.users
    }

    /// Inserts a user, replacing any existing user with the same identifier.
    pub fn add_user(&mut self, user: User) {
        self.users.add_user(user);
    }

    /// Looks up a user by identifier.
    #[must_use]
    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.get_user(id)
    }

    /// Returns a snapshot of every user.
    #[must_use]
    pub fn list_users(&self) -> Vec<User> {
        self.users.list_users()
    }

    fn issue_mut(&mut self, id: IssueId) -> Result<&mut Issue, Error> {
        self.issues
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(EntityKind::Issue, id))
    }

    /// Creates a new open issue and returns its identifier.
    ///
    /// The title is accepted as given, even when blank; only later updates
    /// through [`Registry::update_title`] are validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the reporter does not exist.
    #[instrument(level = "debug", skip(self, title, description))]
    pub fn create_issue(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        reporter_id: &str,
    ) -> Result<IssueId, Error> {
        let reporter = self
            .users
            .get_user(reporter_id)
            .ok_or_else(|| Error::not_found(EntityKind::Reporter, reporter_id))?
            .id()
            .clone();

        let id = IssueId::new(self.issue_ids.allocate());
        let issue = Issue::new(id, title.into(), description.into(), priority, reporter);
        self.issues.insert(id, issue);

        tracing::info!("Bug created successfully: {id}");
        Ok(id)
    }

    /// Looks up an issue.
    #[must_use]
    pub fn get_issue(&self, id: IssueId) -> Option<&Issue> {
        self.issues.get(&id)
    }

    /// Every issue, ordered by identifier.
    #[must_use]
    pub fn list_issues(&self) -> Vec<&Issue> {
        self.issues.values().collect()
    }

    /// Assigns an issue to a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue or the assignee does not
    /// exist.
    #[instrument(level = "debug", skip(self))]
    pub fn assign_issue(&mut self, issue_id: IssueId, assignee_id: &str) -> Result<(), Error> {
        let issue = self
            .issues
            .get_mut(&issue_id)
            .ok_or_else(|| Error::not_found(EntityKind::Issue, issue_id))?;
        let assignee = self
            .users
            .get_user(assignee_id)
            .ok_or_else(|| Error::not_found(EntityKind::Assignee, assignee_id))?;

        issue.set_assignee(assignee.id().clone());
        tracing::info!("Bug {issue_id} assigned to {}", assignee.name());
        Ok(())
    }

    /// Sets the status of an issue and returns the previous status.
    ///
    /// Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn update_status(&mut self, issue_id: IssueId, status: Status) -> Result<Status, Error> {
        let previous = self.issue_mut(issue_id)?.set_status(status);
        tracing::info!("Bug {issue_id} status changed from {previous} to {status}");
        Ok(previous)
    }

    /// Sets the priority of an issue and returns the previous priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn update_priority(
        &mut self,
        issue_id: IssueId,
        priority: Priority,
    ) -> Result<Priority, Error> {
        let previous = self.issue_mut(issue_id)?.set_priority(priority);
        tracing::info!("Bug {issue_id} priority changed from {previous} to {priority}");
        Ok(previous)
    }

    /// Replaces the title of an issue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist, or
    /// [`Error::InvalidArgument`] if the title is blank. In both cases the
    /// issue is left unchanged.
    #[instrument(level = "debug", skip(self, title))]
    pub fn update_title(
        &mut self,
        issue_id: IssueId,
        title: impl Into<String>,
    ) -> Result<(), Error> {
        self.issue_mut(issue_id)?.set_title(title.into())?;
        tracing::info!("Bug {issue_id} title updated");
        Ok(())
    }

    /// Replaces the description of an issue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist.
    #[instrument(level = "debug", skip(self, description))]
    pub fn update_description(
        &mut self,
        issue_id: IssueId,
        description: impl Into<String>,
    ) -> Result<(), Error> {
        self.issue_mut(issue_id)?
            .set_description(description.into());
        tracing::info!("Bug {issue_id} description updated");
        Ok(())
    }

    /// Appends a comment to an issue and returns the comment's identifier.
    ///
    /// Comment identifiers come from a single sequence shared by every
    /// issue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue or the author does not exist.
    #[instrument(level = "debug", skip(self, content))]
    pub fn add_comment(
        &mut self,
        issue_id: IssueId,
        content: impl Into<String>,
        author_id: &str,
    ) -> Result<CommentId, Error> {
        let issue = self
            .issues
            .get_mut(&issue_id)
            .ok_or_else(|| Error::not_found(EntityKind::Issue, issue_id))?;
        let author = self
            .users
            .get_user(author_id)
            .ok_or_else(|| Error::not_found(EntityKind::Author, author_id))?
            .id()
            .clone();

        let id = CommentId::new(self.comment_ids.allocate());
        issue.add_comment(Comment::new(id, content.into(), author));

        tracing::info!("Comment {id} added to bug {issue_id}");
        Ok(id)
    }

    /// Tags an issue.
    ///
    /// The tag is trimmed and lower-cased. Blank tags are ignored without
    /// error. Returns `true` if the tag was not already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn add_tag(&mut self, issue_id: IssueId, tag: &str) -> Result<bool, Error> {
        let issue = self.issue_mut(issue_id)?;
        let Some(tag) = normalize_tag(tag) else {
            tracing::debug!("Ignoring blank tag for bug {issue_id}");
            return Ok(false);
        };
        let inserted = issue.add_tag(&tag);
        if inserted {
            tracing::info!("Tag '{tag}' added to bug {issue_id}");
        } else {
            tracing::debug!("Bug {issue_id} already tagged '{tag}'");
        }
        Ok(inserted)
    }

    /// Removes a tag from an issue. Returns `true` if the tag was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the issue does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_tag(&mut self, issue_id: IssueId, tag: &str) -> Result<bool, Error> {
        let removed = self.issue_mut(issue_id)?.remove_tag(tag);
        if removed {
            tracing::info!("Tag '{}' removed from bug {issue_id}", tag.trim().to_lowercase());
        }
        Ok(removed)
    }

    /// Every issue matching the query, ordered by identifier.
    #[must_use]
    pub fn search(&self, query: &Query) -> Vec<&Issue> {
        let results: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| query.matches(issue))
            .collect();
        tracing::debug!("{query:?} matched {} issue(s)", results.len());
        results
    }

    /// Issues with the given status.
    #[must_use]
    pub fn search_by_status(&self, status: Status) -> Vec<&Issue> {
        self.search(&Query::default().status(status))
    }

    /// Issues with the given priority.
    #[must_use]
    pub fn search_by_priority(&self, priority: Priority) -> Vec<&Issue> {
        self.search(&Query::default().priority(priority))
    }

    /// Issues currently assigned to the given user.
    #[must_use]
    pub fn search_by_assignee(&self, user_id: &str) -> Vec<&Issue> {
        self.search(&Query::default().assignee(user_id))
    }

    /// Issues reported by the given user.
    #[must_use]
    pub fn search_by_reporter(&self, user_id: &str) -> Vec<&Issue> {
        self.search(&Query::default().reporter(user_id))
    }

    /// Issues carrying the given tag, compared case-insensitively.
    #[must_use]
    pub fn search_by_tag(&self, tag: &str) -> Vec<&Issue> {
        self.search(&Query::default().tag(tag))
    }

    /// Issues whose title or description contains the keyword, ignoring
    /// case.
    #[must_use]
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&Issue> {
        self.search(&Query::default().keyword(keyword))
    }

    /// Counts issues in total, by status and by priority.
    #[must_use]
    pub fn summarize(&self) -> Summary {
        Summary::from_issues(self.issues.values())
    }

    /// A printable view of one issue, or `None` if it does not exist.
    #[must_use]
    pub fn issue_details(&self, id: IssueId) -> Option<IssueDetails<'_>> {
        self.issues
            .get(&id)
            .map(|issue| IssueDetails::new(issue, &self.users))
    }
}
