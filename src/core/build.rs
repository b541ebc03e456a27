use crate::config::DeployConfig;
use crate::domain::model::{BuildJob, UnitKind};
use crate::domain::ports::BuildRunner;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Ordered build jobs: every remote in declared order, then the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub jobs: Vec<BuildJob>,
}

impl BuildPlan {
    pub fn from_config(config: &DeployConfig, working_dir: &Path) -> Self {
        let base_href = config.base_href();

        let mut jobs: Vec<BuildJob> = config
            .units
            .iter()
            .map(|unit| {
                let unit_href = format!("{}{}/", base_href, unit.name);
                build_job(config, working_dir, &unit.name, UnitKind::Remote, &unit_href)
            })
            .collect();
        jobs.push(build_job(
            config,
            working_dir,
            &config.host,
            UnitKind::Host,
            &base_href,
        ));

        Self { jobs }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn build_job(
    config: &DeployConfig,
    working_dir: &Path,
    unit: &str,
    kind: UnitKind,
    href: &str,
) -> BuildJob {
    let mut args = config.build.args.clone();
    args.push(unit.to_string());
    args.push(format!("--configuration={}", config.build.configuration));
    if config.build.skip_cache {
        args.push("--skip-nx-cache".to_string());
    }
    args.push(format!("--baseHref={}", href));
    args.push(format!("--deployUrl={}", href));

    BuildJob {
        unit: unit.to_string(),
        kind,
        program: config.build.program.clone(),
        args,
        working_dir: working_dir.to_path_buf(),
    }
}

/// Spawns the build tool with inherited stdio and waits for it to exit.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner;

#[async_trait]
impl BuildRunner for CommandRunner {
    async fn run(&self, job: &BuildJob) -> Result<()> {
        tracing::debug!("Running command: {}", job.command_line());

        let status = Command::new(&job.program)
            .args(&job.args)
            .current_dir(&job.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| DeployError::BuildSpawn {
                unit: job.unit.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DeployError::BuildFailed {
                unit: job.unit.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
