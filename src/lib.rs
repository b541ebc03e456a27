pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CommonArgs;

pub use config::{DeployConfig, UnitDefinition};
pub use core::{
    build::{BuildPlan, CommandRunner},
    engine::DeployEngine,
    manifest::ManifestRewriter,
};
pub use utils::error::{DeployError, Result};
