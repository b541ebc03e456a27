use clap::Parser;
use mfe_deploy::{CommonArgs, ManifestRewriter};

#[derive(Parser)]
#[command(name = "fix-manifest")]
#[command(about = "Rewrite localhost remotes in the federation manifests to public URLs")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let args = Args::parse();
    args.common.init_logging();

    let result = args.common.load_config().and_then(|config| {
        let locations = config
            .layout(&args.common.workspace)
            .manifest_locations(&config.host, &config.manifest_file);
        ManifestRewriter::from_config(&config).fix_all(&locations)
    });

    match result {
        Ok(_) => println!("✅ Module Federation manifests fixed for deployment"),
        Err(e) => {
            tracing::error!("❌ Manifest fix failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}
