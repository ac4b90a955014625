use std::path::PathBuf;

use clap::Parser;
use sheets_records_core::logging;
use sheets_records_core::packager::config::{Layout, PackagerConfig};
use sheets_records_core::packager::Packager;
use tracing::{error, info};

/// Packages the function archives and the dependency layer archives for deployment.
#[derive(Parser, Debug)]
#[command(name = "zip_lambda", version)]
struct Args {
    /// Repository root containing `src/lambdas`, `src/layers` and `src/terraform/deployments`.
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Packager configuration file. Defaults to an optional `Packager.*` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_cli_logging();
    let args = Args::parse();

    let config = PackagerConfig::load(args.config.as_deref()).map_err(|report| {
        error!("{:?}", report);
        report.current_context().to_string()
    })?;

    let packager = Packager::new(Layout::new(args.base_dir), config);
    match packager.run().await {
        Ok(report) => {
            for skipped in &report.skipped {
                info!("Skipped {}: {}", skipped.name, skipped.reason);
            }
            info!("All ZIPs created successfully!");
            Ok(())
        }
        Err(report) => {
            error!("An error occurred: {:?}", report);
            Err(report.current_context().to_string().into())
        }
    }
}
