use bugtrack::{Config, Registry, domain::default_users};
use clap::Parser;
use tracing::instrument;

use super::{
    render::{OutputFormat, Renderer},
    run::execute,
    script,
};

/// The demo session: three issues worked through assignment, tagging,
/// comments and status changes, followed by a report and a few searches.
const SCRIPT: &str = include_str!("demo.yaml");

#[derive(Debug, Parser, Default)]
#[command(about = "Replay a sample session against a fresh tracker")]
pub struct Demo {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Demo {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let steps = script::parse(SCRIPT)?;
        let mut registry = registry(config);
        execute(&mut registry, &steps, Renderer::new(self.output), false)
    }
}

/// The demo always needs the built-in users, whatever the configuration says.
fn registry(config: &Config) -> Registry {
    let mut registry = Registry::new();
    for user in default_users().into_iter().chain(config.initial_users()) {
        registry.add_user(user);
    }
    registry
}

#[cfg(test)]
mod tests {
    use bugtrack::{IssueId, Priority, Status};

    use super::*;

    fn replay(config: &Config) -> Registry {
        let steps = script::parse(SCRIPT).unwrap();
        let mut registry = registry(config);
        for step in &steps {
            step.apply(&mut registry).unwrap();
        }
        registry
    }

    #[test]
    fn replays_without_errors() {
        let registry = replay(&Config::default());
        let summary = registry.summarize();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.status_count(Status::InProgress), 2);
        assert_eq!(summary.status_count(Status::Open), 1);
        assert_eq!(summary.priority_count(Priority::Critical), 1);

        let first: IssueId = "BUG-0001".parse().unwrap();
        let issue = registry.get_issue(first).unwrap();
        assert_eq!(issue.comments().len(), 2);
        assert!(issue.has_tag("mobile"));
        assert_eq!(registry.search_by_assignee("DEV001").len(), 2);
        assert_eq!(registry.search_by_tag("ui").len(), 2);
    }

    #[test]
    fn built_in_users_survive_config() {
        let mut config = Config::default();
        config.seed_default_users = false;

        let registry = replay(&config);
        assert_eq!(registry.list_users().len(), 4);
    }
}
