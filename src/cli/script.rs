//! Scripted tracker sessions.
//!
//! A script is a YAML sequence of steps, each tagged by `op`:
//!
//! ```yaml
//! - op: create
//!   title: Login page crashes on mobile
//!   priority: high
//!   reporter: TEST001
//! - op: assign
//!   issue: BUG-0001
//!   assignee: DEV001
//! - op: search
//!   tag: ui
//! ```

use bugtrack::{
    CommentId, Error, IssueId, Priority, Query, Registry, Role, Status, Summary, User,
};
use regex::Regex;
use serde::Deserialize;

/// One operation against the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Print a line of text.
    Echo { text: String },
    /// Register a user.
    AddUser {
        id: String,
        name: String,
        email: String,
        role: Role,
    },
    /// Report a new issue.
    Create {
        title: String,
        #[serde(default)]
        description: String,
        priority: Priority,
        reporter: String,
    },
    /// Assign an issue to a user.
    Assign {
        issue: IssueId,
        assignee: String,
    },
    /// Move an issue to a new status.
    Status {
        issue: IssueId,
        status: Status,
    },
    /// Change an issue's priority.
    Priority {
        issue: IssueId,
        priority: Priority,
    },
    /// Replace an issue's title.
    Title {
        issue: IssueId,
        title: String,
    },
    /// Replace an issue's description.
    Description {
        issue: IssueId,
        description: String,
    },
    /// Comment on an issue.
    Comment {
        issue: IssueId,
        content: String,
        author: String,
    },
    /// Tag an issue.
    Tag {
        issue: IssueId,
        tag: String,
    },
    /// Remove a tag from an issue.
    Untag {
        issue: IssueId,
        tag: String,
    },
    /// Print the full details of one issue.
    Show { issue: IssueId },
    /// Print every issue.
    List,
    /// Print the issues matching every given criterion.
    Search(Criteria),
    /// Print issue counts by status and priority.
    Summary,
}

/// Search criteria as written in a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Criteria {
    status: Option<Status>,
    priority: Option<Priority>,
    assignee: Option<String>,
    reporter: Option<String>,
    tag: Option<String>,
    keyword: Option<String>,
    /// Regular expression matched against title and description.
    pattern: Option<String>,
}

impl Criteria {
    fn to_query(&self) -> Result<Query, Error> {
        let mut query = Query::default();
        if let Some(status) = self.status {
            query = query.status(status);
        }
        if let Some(priority) = self.priority {
            query = query.priority(priority);
        }
        if let Some(assignee) = &self.assignee {
            query = query.assignee(assignee.as_str());
        }
        if let Some(reporter) = &self.reporter {
            query = query.reporter(reporter.as_str());
        }
        if let Some(tag) = &self.tag {
            query = query.tag(tag);
        }
        if let Some(keyword) = &self.keyword {
            query = query.keyword(keyword.as_str());
        }
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern)
                .map_err(|e| Error::InvalidArgument(format!("Invalid pattern: {e}")))?;
            query = query.pattern(regex);
        }
        Ok(query)
    }
}

/// What a step produced, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Echo(String),
    UserAdded(String),
    Created(IssueId),
    Assigned {
        issue: IssueId,
        assignee: String,
    },
    StatusChanged {
        issue: IssueId,
        from: Status,
        to: Status,
    },
    PriorityChanged {
        issue: IssueId,
        from: Priority,
        to: Priority,
    },
    TitleUpdated(IssueId),
    DescriptionUpdated(IssueId),
    Commented {
        issue: IssueId,
        comment: CommentId,
    },
    Tagged {
        issue: IssueId,
        tag: String,
        added: bool,
    },
    Untagged {
        issue: IssueId,
        tag: String,
        removed: bool,
    },
    Details(IssueId),
    Issues(Vec<IssueId>),
    Summary(Summary),
}

impl Step {
    /// The step's `op` name, for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Echo { .. } => "echo",
            Self::AddUser { .. } => "add_user",
            Self::Create { .. } => "create",
            Self::Assign { .. } => "assign",
            Self::Status { .. } => "status",
            Self::Priority { .. } => "priority",
            Self::Title { .. } => "title",
            Self::Description { .. } => "description",
            Self::Comment { .. } => "comment",
            Self::Tag { .. } => "tag",
            Self::Untag { .. } => "untag",
            Self::Show { .. } => "show",
            Self::List => "list",
            Self::Search(_) => "search",
            Self::Summary => "summary",
        }
    }

    /// Apply the step to the registry.
    pub fn apply(&self, registry: &mut Registry) -> Result<Outcome, Error> {
        let outcome = match self {
            Self::Echo { text } => Outcome::Echo(text.clone()),
            Self::AddUser {
                id,
                name,
                email,
                role,
            } => {
                registry.add_user(User::new(id.as_str(), name.as_str(), email.as_str(), *role));
                Outcome::UserAdded(id.clone())
            }
            Self::Create {
                title,
                description,
                priority,
                reporter,
            } => Outcome::Created(registry.create_issue(
                title.as_str(),
                description.as_str(),
                *priority,
                reporter,
            )?),
            Self::Assign { issue, assignee } => {
                registry.assign_issue(*issue, assignee)?;
                let name = registry
                    .get_user(assignee)
                    .map_or_else(|| assignee.clone(), |user| user.name().to_string());
                Outcome::Assigned {
                    issue: *issue,
                    assignee: name,
                }
            }
            Self::Status { issue, status } => Outcome::StatusChanged {
                issue: *issue,
                from: registry.update_status(*issue, *status)?,
                to: *status,
            },
            Self::Priority { issue, priority } => Outcome::PriorityChanged {
                issue: *issue,
                from: registry.update_priority(*issue, *priority)?,
                to: *priority,
            },
            Self::Title { issue, title } => {
                registry.update_title(*issue, title.as_str())?;
                Outcome::TitleUpdated(*issue)
            }
            Self::Description { issue, description } => {
                registry.update_description(*issue, description.as_str())?;
                Outcome::DescriptionUpdated(*issue)
            }
            Self::Comment {
                issue,
                content,
                author,
            } => Outcome::Commented {
                issue: *issue,
                comment: registry.add_comment(*issue, content.as_str(), author)?,
            },
            Self::Tag { issue, tag } => Outcome::Tagged {
                issue: *issue,
                tag: tag.clone(),
                added: registry.add_tag(*issue, tag)?,
            },
            Self::Untag { issue, tag } => Outcome::Untagged {
                issue: *issue,
                tag: tag.clone(),
                removed: registry.remove_tag(*issue, tag)?,
            },
            Self::Show { issue } => {
                if registry.get_issue(*issue).is_none() {
                    return Err(Error::NotFound {
                        kind: bugtrack::EntityKind::Issue,
                        id: issue.to_string(),
                    });
                }
                Outcome::Details(*issue)
            }
            Self::List => Outcome::Issues(ids(&registry.list_issues())),
            Self::Search(criteria) => {
                Outcome::Issues(ids(&registry.search(&criteria.to_query()?)))
            }
            Self::Summary => Outcome::Summary(registry.summarize()),
        };
        Ok(outcome)
    }
}

fn ids(issues: &[&bugtrack::Issue]) -> Vec<IssueId> {
    issues.iter().map(|issue| issue.id()).collect()
}

/// Parse a script from YAML.
pub fn parse(source: &str) -> Result<Vec<Step>, serde_yaml::Error> {
    serde_yaml::from_str(source)
}
