use super::DeployConfig;
use crate::utils::error::Result;
use crate::utils::logger;
use crate::utils::validation::Validate;
use clap::Args;
use std::path::PathBuf;

/// Flags shared by every binary. All optional; none reproduces the stock run.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Path to a TOML file overriding the built-in deployment settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Workspace root holding the build output
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CommonArgs {
    pub fn init_logging(&self) {
        if self.json_logs {
            logger::init_json_logger();
        } else {
            logger::init_cli_logger(self.verbose);
        }
    }

    pub fn load_config(&self) -> Result<DeployConfig> {
        let config = DeployConfig::load(self.config.as_deref())?;
        config.validate()?;
        if self.verbose {
            tracing::debug!("Deploy config: {:?}", config);
        }
        Ok(config)
    }
}
