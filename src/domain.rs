//! Domain models for issue tracking.
//!
//! This module contains the core domain types: issues, users, comments,
//! their identifiers, and the registry that owns them.

/// Issue and comment identifiers.
pub mod id;
pub use id::{CommentId, IssueId};

/// Users and the user directory.
pub mod user;
pub use user::{Role, User, UserDirectory, UserId};

mod comment;
pub use comment::Comment;

/// Issues and their priority and status.
pub mod issue;
pub use issue::{Issue, Priority, Status};

mod config;
pub use config::{Config, UserSeed, default_users};

pub mod registry;
pub use registry::{EntityKind, Error, Registry};

pub mod report;
pub use report::{IssueDetails, Summary};

pub mod search;
pub use search::Query;
