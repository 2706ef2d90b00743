use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "client-allocator")]
#[command(about = "Distributes clients to managers by status, origin and office proximity")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "allocator.toml")]
    pub config: String,

    /// Override the output file from the configuration
    #[arg(short, long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Read the rosters and build manager pools without geocoding or writing output
    #[arg(long)]
    pub dry_run: bool,
}
