use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use bugtrack::{Config, Registry};
use clap::Parser;
use tracing::instrument;

use super::{
    render::{OutputFormat, Renderer},
    script::{self, Step},
    terminal::Colorize,
};

#[derive(Debug, Parser)]
#[command(about = "Execute a YAML script of tracker operations")]
pub struct Run {
    /// Path to the script, or '-' to read from stdin
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Report failing steps and carry on with the rest of the script
    #[arg(long)]
    keep_going: bool,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Run {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let source = read_script(&self.script)?;
        let steps = script::parse(&source)
            .with_context(|| format!("failed to parse script {}", self.script.display()))?;
        tracing::debug!("Parsed {} steps", steps.len());

        let mut registry = Registry::with_config(config);
        execute(
            &mut registry,
            &steps,
            Renderer::new(self.output),
            self.keep_going,
        )
    }
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read script from stdin")?;
        return Ok(source);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))
}

/// Applies each step in order, rendering its outcome.
///
/// Without `keep_going` the first failing step aborts the run. With it,
/// failures are reported as they happen and the first one is returned once
/// every step has been attempted.
pub fn execute(
    registry: &mut Registry,
    steps: &[Step],
    renderer: Renderer,
    keep_going: bool,
) -> anyhow::Result<()> {
    let mut first_error = None;

    for (index, step) in steps.iter().enumerate() {
        match step.apply(registry) {
            Ok(outcome) => renderer.outcome(registry, &outcome)?,
            Err(error) => {
                let error = anyhow::Error::new(error)
                    .context(format!("step {} ({}) failed", index + 1, step.name()));
                if !keep_going {
                    return Err(error);
                }
                tracing::warn!("{error:#}");
                eprintln!("{}", format!("{error:#}").danger());
                first_error.get_or_insert(error);
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bugtrack::{IssueId, Status};

    use super::*;
    use crate::cli::{EXIT_NOT_FOUND, exit_code};

    const SCRIPT: &str = r"
- op: create
  title: Login page crashes on mobile
  priority: high
  reporter: TEST001
- op: assign
  issue: BUG-0002
  assignee: DEV001
- op: status
  issue: BUG-0001
  status: resolved
";

    fn renderer() -> Renderer {
        Renderer::new(OutputFormat::Json)
    }

    #[test]
    fn stops_at_first_failure() {
        let steps = script::parse(SCRIPT).unwrap();
        let mut registry = Registry::with_config(&Config::default());

        let error = execute(&mut registry, &steps, renderer(), false).unwrap_err();

        assert_eq!(error.to_string(), "step 2 (assign) failed");
        assert_eq!(exit_code(&error), EXIT_NOT_FOUND);
        let first: IssueId = "BUG-0001".parse().unwrap();
        assert_eq!(registry.get_issue(first).unwrap().status(), Status::Open);
    }

    #[test]
    fn keep_going_runs_remaining_steps() {
        let steps = script::parse(SCRIPT).unwrap();
        let mut registry = Registry::with_config(&Config::default());

        let error = execute(&mut registry, &steps, renderer(), true).unwrap_err();

        assert_eq!(error.to_string(), "step 2 (assign) failed");
        let first: IssueId = "BUG-0001".parse().unwrap();
        assert_eq!(registry.get_issue(first).unwrap().status(), Status::Resolved);
    }

    #[test]
    fn runs_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"- op: create\n  title: Typo\n  priority: low\n  reporter: DEV001\n")
            .unwrap();

        let run = Run {
            script: file.path().to_path_buf(),
            keep_going: false,
            output: OutputFormat::Json,
        };
        run.run(&Config::default()).unwrap();
    }

    #[test]
    fn missing_script_names_path() {
        let tmp = tempfile::tempdir().unwrap();
        let run = Run {
            script: tmp.path().join("absent.yaml"),
            keep_going: false,
            output: OutputFormat::Table,
        };

        let error = run.run(&Config::default()).unwrap_err();
        assert!(error.to_string().contains("absent.yaml"));
        assert_eq!(exit_code(&error), 1);
    }
}
