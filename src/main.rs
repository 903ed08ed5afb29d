//! CLI entry point for slugroute

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slugroute")]
#[command(version)]
#[command(about = "Canonical slugs for content pages, kept in sync across router, sitemap and CI", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sitemap.xml and robots.txt
    Sitemap,

    /// Check for duplicate, missing and orphaned routes
    Validate,

    /// Write the route manifest read at startup
    Manifest {
        /// Regenerate on content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the sitemap on demand and routed pages lazily
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site information
    List {
        /// Type of information to list (route, file, unroutable)
        #[arg(default_value = "route")]
        r#type: String,
    },

    /// Remove generated artifacts
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "slugroute=debug,info"
    } else {
        "slugroute=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let site = slugroute::Site::new(&base_dir)?;

    match cli.command {
        Commands::Sitemap => {
            tracing::info!("Generating sitemap...");
            site.generate_sitemap().await?;
            println!("Generated successfully!");
        }

        Commands::Validate => {
            site.validate()?;
        }

        Commands::Manifest { watch } => {
            site.write_manifest()?;
            if watch {
                let site = site.clone();
                tokio::task::spawn_blocking(move || slugroute::commands::manifest::watch(&site))
                    .await??;
            }
        }

        Commands::Server { port, ip } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            slugroute::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            slugroute::commands::list::run(&site, &r#type)?;
        }

        Commands::Clean => {
            tracing::info!("Cleaning generated files...");
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
