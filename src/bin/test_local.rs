use clap::Parser;
use mfe_deploy::core::engine::print_deployment_structure;
use mfe_deploy::{CommandRunner, CommonArgs, DeployEngine};

#[derive(Parser)]
#[command(name = "test-local")]
#[command(about = "Run the deployment build and explain how to serve it locally")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Port suggested for the local static server
    #[arg(long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    args.common.init_logging();

    println!("🧪 Testing the deployment build locally...\n");
    println!("This will simulate the static-host directory structure.\n");

    let config = match args.common.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Build failed: {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let engine = DeployEngine::new(CommandRunner, config, &args.common.workspace);
    match engine.run().await {
        Ok(summary) => {
            let config = engine.config();
            print_deployment_structure(config, &summary);

            let staging = config.staging_dir.display();
            println!("\n✅ Build successful!\n");
            println!("📁 Built files are in: {}/\n", staging);
            println!("To test locally, you can use a simple HTTP server:");
            println!("  npx http-server {} -p {} -c-1\n", staging, args.port);
            println!(
                "Then open: http://localhost:{}{}\n",
                args.port,
                config.base_href()
            );
        }
        Err(e) => {
            tracing::error!("❌ Build failed: {}", e);
            eprintln!("❌ Build failed: {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}
