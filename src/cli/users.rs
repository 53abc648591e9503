use bugtrack::{Config, Registry};
use clap::Parser;
use tracing::instrument;

use super::render::{OutputFormat, Renderer};

#[derive(Debug, Parser)]
#[command(about = "List the users a fresh tracker starts with")]
pub struct Users {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Users {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let registry = Registry::with_config(config);
        Renderer::new(self.output).users(&registry.list_users())
    }
}
