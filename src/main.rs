use clap::Parser;
use mfe_deploy::core::engine::print_deployment_structure;
use mfe_deploy::{CommandRunner, CommonArgs, DeployEngine};

#[derive(Parser)]
#[command(name = "deploy-build")]
#[command(about = "Build every micro-frontend and assemble the static-host deployment")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Show the build plan and routing table without running anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    args.common.init_logging();

    tracing::info!("🚀 Starting deploy-build");

    let config = match args.common.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let engine = DeployEngine::new(CommandRunner, config, &args.common.workspace);

    if args.dry_run {
        perform_dry_run(&engine);
        return;
    }

    match engine.run().await {
        Ok(summary) => {
            print_deployment_structure(engine.config(), &summary);
            println!("\n💡 To preview locally, run: test-local");
        }
        Err(e) => {
            tracing::error!(
                "❌ Deployment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

fn perform_dry_run(engine: &DeployEngine<CommandRunner>) {
    let config = engine.config();
    println!("🔍 Dry Run Analysis:");
    println!("  Public base: {}", config.public_base_url());
    println!("  Staging: {}", engine.layout().staging_dir.display());
    println!();

    println!("📦 Build plan:");
    let plan = engine.plan();
    for (index, job) in plan.jobs.iter().enumerate() {
        println!("  [{}/{}] {}", index + 1, plan.len(), job.command_line());
    }

    println!();
    println!("🔧 Manifests to fix:");
    for path in engine.manifest_locations() {
        println!("  {}", path.display());
    }

    println!();
    println!("🗺️  Routing table:");
    let routing = engine.routing_table();
    for unit in routing.units() {
        println!("  {} -> {}", unit, routing.get(unit).unwrap_or_default());
    }
}
