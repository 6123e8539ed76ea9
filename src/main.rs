use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod error;
mod github;
mod hierarchy;
mod site;
mod types;

#[derive(Parser)]
#[command(name = "orgmap")]
#[command(about = "Build a browsable static site from a GitHub organization's repository topics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: fetch, build hierarchy, generate site
    Build {
        /// GitHub organization name
        #[arg(long)]
        org: String,
        /// Output directory for the static site
        #[arg(long, default_value = "docs")]
        output_dir: PathBuf,
        /// Directory for intermediate data files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Include forked repositories
        #[arg(long)]
        include_forks: bool,
        /// Include archived repositories
        #[arg(long)]
        include_archived: bool,
        /// Skip fetching and reuse the existing repos.json
        #[arg(long)]
        skip_fetch: bool,
    },
    /// Fetch repository metadata from GitHub and save it as JSON
    Fetch {
        /// GitHub organization name
        #[arg(long)]
        org: String,
        /// Output JSON file path
        #[arg(long, default_value = "data/repos.json")]
        output: PathBuf,
        /// Include forked repositories
        #[arg(long)]
        include_forks: bool,
        /// Include archived repositories
        #[arg(long)]
        include_archived: bool,
    },
    /// Build the topic/language hierarchy from fetched data
    Hierarchy {
        /// Input JSON file with repository data
        #[arg(long, default_value = "data/repos.json")]
        input: PathBuf,
        /// Output JSON file path
        #[arg(long, default_value = "data/hierarchy.json")]
        output: PathBuf,
    },
    /// Generate the static site from a hierarchy snapshot
    Site {
        /// Input hierarchy JSON file
        #[arg(long, default_value = "data/hierarchy.json")]
        input: PathBuf,
        /// GitHub organization name
        #[arg(long)]
        org: String,
        /// Output directory for the static site
        #[arg(long, default_value = "docs")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            org,
            output_dir,
            data_dir,
            include_forks,
            include_archived,
            skip_fetch,
        } => commands::build_command(
            &org,
            &output_dir,
            &data_dir,
            include_forks,
            include_archived,
            skip_fetch,
        ),
        Commands::Fetch {
            org,
            output,
            include_forks,
            include_archived,
        } => commands::fetch_command(&org, &output, include_forks, include_archived),
        Commands::Hierarchy { input, output } => commands::hierarchy_command(&input, &output),
        Commands::Site { input, org, output } => commands::site_command(&input, &org, &output),
    }
}
