use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use symres::config::{get_config_path, load_config, save_config, ResolverConfig};
use symres::resolution::Factory;
use symres::snapshot::Snapshot;

/// Resolves symbol references in Kotlin and Java sources.
#[derive(Parser)]
#[command(name = "symres", about = "Resolves symbol references in Kotlin and Java sources")]
struct Cli {
    /// Log resolution steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the project configuration
    CheckConfig {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Resolve every reference in a snapshot file or directory
    Resolve {
        /// Snapshot file, or a directory searched for *.symres.json
        snapshot: String,
        /// Project path holding the configuration
        #[arg(short, long)]
        root: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> symres::errors::Result<()> {
    match cli.command {
        Commands::Init { path, force } => {
            let project_path = resolve_path(path);
            let config_path = get_config_path(&project_path);
            if config_path.exists() && !force {
                println!("Configuration already exists at {}", config_path.display());
                return Ok(());
            }
            save_config(&project_path, &ResolverConfig::default())?;
            println!("Wrote {}", config_path.display());
        }
        Commands::CheckConfig { path } => {
            let project_path = resolve_path(path);
            let config = load_config(&project_path)?;
            let resolver = Factory::from_config(&config).build();
            println!("Configuration OK");
            println!("  Interceptors: {}", resolver.interceptor_names().join(" -> "));
            println!("  Stdlib names: {}", config.stdlib.len());
            println!("  Cache:        {}", if config.cache_results { "on" } else { "off" });
        }
        Commands::Resolve {
            snapshot,
            root,
            json,
        } => {
            let project_path = resolve_path(root);
            let config = load_config(&project_path)?;

            let mut snapshots = Vec::new();
            for file in Snapshot::discover(&PathBuf::from(&snapshot))? {
                snapshots.push(Snapshot::load(&file)?);
            }
            let snapshot = Snapshot::merge(snapshots).with_default_language(config.default_language);

            let resolver = Factory::from_config(&config)
                .declarations(snapshot.declarations())
                .build();

            let results = snapshot.resolve_with(&resolver).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&results).unwrap_or_default()
                );
            } else {
                for file in &results {
                    println!(
                        "{} ({}/{} resolved)",
                        file.path,
                        file.summary.resolved.len(),
                        file.summary.total
                    );
                    for r in &file.summary.resolved {
                        println!("  {} -> {}", r.original, r.resolved);
                    }
                    for r in &file.summary.unresolved {
                        println!("  {} (unresolved)", r);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
