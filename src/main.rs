use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use cdn_resolver::catalog::loader::load_catalog;
use cdn_resolver::config::ResolverConfig;
use cdn_resolver::proxy::PackageProxy;

#[derive(Parser)]
#[command(name = "cdn-resolver")]
#[command(version, about = "Resolve package references into CDN URLs")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a request such as `jquery@2.1.x,bootstrap/js/bootstrap.min.js`
    Resolve {
        request: String,

        /// Catalog file or URL; overrides the configured sources
        #[arg(long = "catalog")]
        catalogs: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = cdn_resolver::logging::init(cli.json_logs)?;

    let mut config = match &cli.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };

    match cli.command {
        Command::Resolve { request, catalogs } => {
            if !catalogs.is_empty() {
                config.catalog.sources = catalogs;
            }

            let catalog = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(load_catalog(&config.catalog))?;
            info!("Catalog loaded with {} packages", catalog.len());

            let proxy = PackageProxy::with_catalog(config, Arc::new(catalog));
            let response = proxy.handle(request.as_str());
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
