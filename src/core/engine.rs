use crate::config::DeployConfig;
use crate::core::build::BuildPlan;
use crate::core::manifest::ManifestRewriter;
use crate::core::routing::{build_routing_table, write_nojekyll, write_routing_file};
use crate::core::stage::{StageOutcome, Stager};
use crate::domain::model::{DeployLayout, DeploySummary, ManifestOutcome, RoutingTable, UnitKind};
use crate::domain::ports::BuildRunner;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Runs a deployment: build every unit, stage the outputs, fix manifests,
/// then publish the routing file.
pub struct DeployEngine<R: BuildRunner> {
    runner: R,
    config: DeployConfig,
    root: PathBuf,
}

impl<R: BuildRunner> DeployEngine<R> {
    pub fn new(runner: R, config: DeployConfig, root: &Path) -> Self {
        Self {
            runner,
            config,
            root: root.to_path_buf(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn layout(&self) -> DeployLayout {
        self.config.layout(&self.root)
    }

    pub fn plan(&self) -> BuildPlan {
        BuildPlan::from_config(&self.config, &self.root)
    }

    pub fn routing_table(&self) -> RoutingTable {
        build_routing_table(&self.config.remote_descriptors(), &self.config.entry_file)
    }

    pub fn manifest_locations(&self) -> Vec<PathBuf> {
        self.layout()
            .manifest_locations(&self.config.host, &self.config.manifest_file)
    }

    pub async fn run(&self) -> Result<DeploySummary> {
        let started = Instant::now();
        let mut summary = DeploySummary::default();
        let stager = Stager::new(self.layout());

        println!("📦 Cleaning previous build...");
        stager.prepare()?;

        let plan = self.plan();
        let total = plan.len();
        println!(
            "\n📦 Building {} remote applications...",
            self.config.units.len()
        );
        for (index, job) in plan.jobs.iter().enumerate() {
            match job.kind {
                UnitKind::Remote => {
                    println!("\n[{}/{}] 📦 Building {} remote...", index + 1, total, job.unit)
                }
                UnitKind::Host => println!(
                    "\n[{}/{}] 📦 Building Host application ({})...",
                    index + 1,
                    total,
                    job.unit
                ),
            }
            self.runner.run(job).await?;
            summary.built.push(job.unit.clone());
        }

        println!("\n📁 Organizing files for deployment...");
        for unit in &self.config.units {
            match stager.stage_remote(&unit.name)? {
                StageOutcome::Staged { .. } => summary.staged.push(unit.name.clone()),
                StageOutcome::Skipped => summary.skipped.push(unit.name.clone()),
            }
        }
        summary.host_staged = matches!(
            stager.stage_host(&self.config.host)?,
            StageOutcome::Staged { .. }
        );

        println!("\n🔧 Fixing module federation manifests...");
        summary.manifests =
            ManifestRewriter::from_config(&self.config).fix_all(&self.manifest_locations())?;

        write_nojekyll(stager.staging_dir())?;
        summary.routing = self.routing_table();
        write_routing_file(stager.staging_dir(), &summary.routing)?;

        summary.elapsed = started.elapsed();
        tracing::info!(
            built = summary.built.len(),
            staged = summary.staged.len(),
            skipped = summary.skipped.len(),
            "Deployment assembled in {:?}",
            summary.elapsed
        );
        Ok(summary)
    }
}

pub fn print_deployment_structure(config: &DeployConfig, summary: &DeploySummary) {
    println!(
        "\n✨ Build complete! Files are ready in {}/",
        config.staging_dir.display()
    );
    println!("\n📍 Deployment structure:");
    println!("   - Host: {}", config.public_base_url());
    println!("   - Remotes:");
    for remote in config.remote_descriptors() {
        let marker = if summary.skipped.contains(&remote.name) {
            " (missing)"
        } else {
            ""
        };
        println!("     • {}: {}{}", remote.name, remote.public_url(), marker);
    }

    let patched: usize = summary
        .manifests
        .iter()
        .map(|report| match &report.outcome {
            ManifestOutcome::Patched { rewrites } => rewrites.len(),
            _ => 0,
        })
        .sum();
    println!("\n🔧 Manifest entries rewritten: {}", patched);
}
