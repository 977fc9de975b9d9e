mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grammy")]
#[command(about = "Declare API routes in KDL, get a stack manifest", long_about = None)]
struct Cli {
    /// Project file to load instead of searching for grammy.kdl
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the project, build the route table and print a summary
    Validate,
    /// Print the resolved route table
    Routes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the stack manifest for the provisioning engine
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `routes --json` and `manifest` stay pipeable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Version => {
            println!("grammy {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate => commands::validate::handle(cli.file)?,
        Commands::Routes { json } => commands::routes::handle(cli.file, json)?,
        Commands::Manifest { output } => commands::manifest::handle(cli.file, output)?,
    }

    Ok(())
}
