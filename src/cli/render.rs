use bugtrack::{Issue, IssueId, Registry, Summary, User};
use serde_json::json;

use super::{
    script::Outcome,
    terminal::{Colorize, is_narrow, priority_label, status_label},
};

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints step outcomes.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn outcome(self, registry: &Registry, outcome: &Outcome) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                print!("{}", table(registry, outcome));
            }
            OutputFormat::Json => {
                if let Some(value) = json(registry, outcome) {
                    println!("{}", serde_json::to_string(&value)?);
                }
            }
        }
        Ok(())
    }

    pub fn users(self, users: &[User]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                if users.is_empty() {
                    println!("{}", "No users configured.".dim());
                }
                for user in users {
                    println!("{}", user_line(user));
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(users)?),
        }
        Ok(())
    }
}

/// The human-readable rendering of an outcome, newline terminated.
fn table(registry: &Registry, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Echo(text) => format!("{text}\n"),
        Outcome::UserAdded(id) => format!("User {id} added\n"),
        Outcome::Created(id) => format!("{} {id}\n", "Bug created successfully:".success()),
        Outcome::Assigned { issue, assignee } => {
            format!("Bug {issue} assigned to {assignee}\n")
        }
        Outcome::StatusChanged { issue, from, to } => format!(
            "Bug {issue} status changed from {} to {}\n",
            status_label(*from),
            status_label(*to)
        ),
        Outcome::PriorityChanged { issue, from, to } => format!(
            "Bug {issue} priority changed from {} to {}\n",
            priority_label(*from),
            priority_label(*to)
        ),
        Outcome::TitleUpdated(issue) => format!("Bug {issue} title updated\n"),
        Outcome::DescriptionUpdated(issue) => format!("Bug {issue} description updated\n"),
        Outcome::Commented { issue, comment } => {
            format!("Comment added to bug {issue} {}\n", format!("({comment})").dim())
        }
        Outcome::Tagged { issue, tag, added } => {
            if *added {
                format!("Tag '{tag}' added to bug {issue}\n")
            } else {
                format!("{}\n", format!("Tag '{tag}' already on bug {issue}").dim())
            }
        }
        Outcome::Untagged {
            issue,
            tag,
            removed,
        } => {
            if *removed {
                format!("Tag '{tag}' removed from bug {issue}\n")
            } else {
                format!("{}\n", format!("Tag '{tag}' was not on bug {issue}").dim())
            }
        }
        Outcome::Details(id) => registry.issue_details(*id).map_or_else(
            || format!("Bug not found: {id}\n"),
            |details| format!("\n{}\n{details}", "=== BUG DETAILS ===".info()),
        ),
        Outcome::Issues(ids) => issue_lines(registry, ids),
        Outcome::Summary(summary) => format!("\n{summary}"),
    }
}

/// One user per line, identifiers padded to a column before colouring.
fn user_line(user: &User) -> String {
    format!("  {} {user}", format!("{:<10}", user.id().as_str()).info())
}

fn issue_lines(registry: &Registry, ids: &[IssueId]) -> String {
    if ids.is_empty() {
        return format!("  {}\n", "(none)".dim());
    }

    let narrow = is_narrow();
    let mut out = String::new();
    for issue in ids.iter().filter_map(|id| registry.get_issue(*id)) {
        if narrow {
            out.push_str(&format!("  {}: {}\n", issue.id(), issue.title()));
        } else {
            out.push_str(&format!(
                "  {}: {} {}\n",
                issue.id(),
                issue.title(),
                format!("[{}, {}]", priority_label(issue.priority()), status_label(issue.status()))
                    .dim()
            ));
        }
    }
    out
}

/// The machine-readable rendering of an outcome.
///
/// Echo steps produce no output.
fn json(registry: &Registry, outcome: &Outcome) -> Option<serde_json::Value> {
    let value = match outcome {
        Outcome::Echo(_) => return None,
        Outcome::UserAdded(id) => json!({ "user_added": id }),
        Outcome::Created(id) => json!({ "created": id }),
        Outcome::Assigned { issue, assignee } => {
            json!({ "assigned": issue, "assignee": assignee })
        }
        Outcome::StatusChanged { issue, from, to } => {
            json!({ "issue": issue, "status": { "from": from, "to": to } })
        }
        Outcome::PriorityChanged { issue, from, to } => {
            json!({ "issue": issue, "priority": { "from": from, "to": to } })
        }
        Outcome::TitleUpdated(issue) => json!({ "issue": issue, "updated": "title" }),
        Outcome::DescriptionUpdated(issue) => {
            json!({ "issue": issue, "updated": "description" })
        }
        Outcome::Commented { issue, comment } => json!({ "issue": issue, "comment": comment }),
        Outcome::Tagged { issue, tag, added } => {
            json!({ "issue": issue, "tag": tag, "added": added })
        }
        Outcome::Untagged {
            issue,
            tag,
            removed,
        } => json!({ "issue": issue, "tag": tag, "removed": removed }),
        Outcome::Details(id) => json!({ "issue": registry.get_issue(*id) }),
        Outcome::Issues(ids) => {
            let issues: Vec<&Issue> = ids.iter().filter_map(|id| registry.get_issue(*id)).collect();
            json!({ "issues": issues })
        }
        Outcome::Summary(summary) => summary_json(summary),
    };
    Some(value)
}

fn summary_json(summary: &Summary) -> serde_json::Value {
    let by_status: serde_json::Map<String, serde_json::Value> = summary
        .by_status
        .iter()
        .map(|(status, count)| (status.to_string(), json!(count)))
        .collect();
    let by_priority: serde_json::Map<String, serde_json::Value> = summary
        .by_priority
        .iter()
        .map(|(priority, count)| (priority.to_string(), json!(count)))
        .collect();

    json!({
        "total": summary.total,
        "by_status": by_status,
        "by_priority": by_priority,
    })
}

#[cfg(test)]
mod tests {
    use bugtrack::{Config, Priority};

    use super::*;

    fn registry() -> (Registry, IssueId) {
        let mut registry = Registry::with_config(&Config::default());
        let id = registry
            .create_issue("Database connection timeout", "", Priority::Critical, "PM001")
            .unwrap();
        (registry, id)
    }

    #[test]
    fn json_for_issue_lists_contains_full_issues() {
        let (registry, id) = registry();
        let value = json(&registry, &Outcome::Issues(vec![id])).unwrap();

        assert_eq!(value["issues"][0]["id"], "BUG-0001");
        assert_eq!(value["issues"][0]["priority"], "critical");
        assert_eq!(value["issues"][0]["status"], "open");
        assert_eq!(value["issues"][0]["reporter"], "PM001");
    }

    #[test]
    fn json_summary_is_keyed_by_display_name() {
        let (registry, _) = registry();
        let value = summary_json(&registry.summarize());

        assert_eq!(value["total"], 1);
        assert_eq!(value["by_status"]["Open"], 1);
        assert_eq!(value["by_status"]["In Progress"], 0);
        assert_eq!(value["by_priority"]["Critical"], 1);
    }

    #[test]
    fn user_ids_are_padded_to_a_column() {
        let registry = Registry::with_config(&Config::default());
        let lines: Vec<String> = registry.list_users().iter().map(user_line).collect();

        assert!(lines.iter().any(|line| line.contains("PM001     ")));
        assert!(lines.iter().any(|line| line.contains("ADMIN001  ")));
        assert!(lines.iter().any(|line| line.ends_with("David Wilson (david@company.com) - Admin")));
    }

    #[test]
    fn echo_is_silent_in_json() {
        let (registry, _) = registry();
        assert!(json(&registry, &Outcome::Echo("hello".to_string())).is_none());
    }

    #[test]
    fn table_lines() {
        let (registry, id) = registry();
        assert!(table(&registry, &Outcome::Created(id)).ends_with("BUG-0001\n"));
        assert_eq!(
            table(
                &registry,
                &Outcome::Assigned {
                    issue: id,
                    assignee: "David Wilson".to_string()
                }
            ),
            "Bug BUG-0001 assigned to David Wilson\n"
        );
        assert!(table(&registry, &Outcome::Issues(vec![])).contains("(none)"));
        assert!(
            table(&registry, &Outcome::Issues(vec![id]))
                .starts_with("  BUG-0001: Database connection timeout")
        );
        assert!(table(&registry, &Outcome::Summary(registry.summarize())).contains("Total Bugs: 1"));
        assert!(table(&registry, &Outcome::Details(id)).contains("Reporter: Carol Davis"));
    }
}
