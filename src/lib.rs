//! In-memory issue tracking.
//!
//! A [`Registry`] holds users and the issues they report, assign and comment
//! on. Nothing is persisted: a registry lives as long as the value that owns
//! it.
//!
//! ```
//! use bugtrack::{Config, Priority, Registry, Status};
//!
//! let mut registry = Registry::with_config(&Config::default());
//! let id = registry
//!     .create_issue("Login page crashes", "Crashes on mobile", Priority::High, "TEST001")
//!     .unwrap();
//! registry.assign_issue(id, "DEV001").unwrap();
//! registry.add_tag(id, "UI").unwrap();
//!
//! assert_eq!(id.to_string(), "BUG-0001");
//! assert_eq!(registry.search_by_tag("ui").len(), 1);
//! assert_eq!(registry.summarize().status_count(Status::Open), 1);
//! ```

pub mod domain;
pub use domain::{
    Comment, CommentId, Config, EntityKind, Error, Issue, IssueDetails, IssueId, Priority, Query,
    Registry, Role, Status, Summary, User, UserDirectory, UserId,
};
