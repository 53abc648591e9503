use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CommentId, UserId};

/// A note left on an issue.
///
/// Comments are immutable once created and belong to exactly one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    id: CommentId,
    content: String,
    author: UserId,
    created: DateTime<Utc>,
}

impl Comment {
    pub(crate) fn new(id: CommentId, content: String, author: UserId) -> Self {
        Self {
            id,
            content,
            author,
            created: Utc::now(),
        }
    }

    /// The comment's identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// The comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The identifier of the user who wrote the comment.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// When the comment was written.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
