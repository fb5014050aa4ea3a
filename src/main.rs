//! VirusTotal lookup CLI.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vtrecon::pacing::TokioSleeper;
use vtrecon::providers::virustotal::VirusTotalClient;
use vtrecon::{entry, Config, EntryKind, Lookup};

const BANNER: &str = r"
██╗   ██╗████████╗██████╗ ███████╗ ██████╗ ██████╗ ███╗   ██╗
██║   ██║╚══██╔══╝██╔══██╗██╔════╝██╔════╝██╔═══██╗████╗  ██║
██║   ██║   ██║   ██████╔╝█████╗  ██║     ██║   ██║██╔██╗ ██║
╚██╗ ██╔╝   ██║   ██╔══██╗██╔══╝  ██║     ██║   ██║██║╚██╗██║
 ╚████╔╝    ██║   ██║  ██║███████╗╚██████╗╚██████╔╝██║ ╚████║
  ╚═══╝     ╚═╝   ╚═╝  ╚═╝╚══════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═══╝

═══════════════════════════════════════════════════════════════
            VirusTotal OSINT Reconnaissance Tool
═══════════════════════════════════════════════════════════════
";

#[derive(Parser, Debug)]
#[command(name = "vtrecon")]
#[command(about = "VirusTotal IP/Domain lookup - print reputation summaries for a list of entries")]
#[command(version)]
struct Args {
    /// Input file with one IP or domain per line
    #[arg(long, required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Type of input
    #[arg(long = "type", value_enum, required_unless_present = "print_config")]
    kind: Option<EntryKind>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: String,

    /// Print example configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::example());
        return Ok(());
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // A missing .env file is fine; the key may come from the real environment.
    dotenvy::dotenv().ok();

    // Load configuration
    info!(config = %args.config.display(), "Loading configuration");
    let config = Config::load(&args.config)
        .with_context(|| format!("Error loading {}", args.config.display()))?;
    let api_key = config.resolve_api_key()?;

    let (Some(input), Some(kind)) = (args.input, args.kind) else {
        anyhow::bail!("--input and --type are required");
    };

    println!("{}", BANNER);

    let validated = entry::load(&input, kind)
        .with_context(|| format!("Error reading {}", input.display()))?;

    if !validated.invalid.is_empty() {
        warn!(count = validated.invalid.len(), "Skipping invalid entries");
        println!("Warning: The following entries are invalid and will be skipped:");
        for entry in &validated.invalid {
            println!("  {}", entry);
        }
    }

    let client = VirusTotalClient::new(&config, api_key)?;
    let lookup = Lookup::new(&config, kind, Box::new(client), Arc::new(TokioSleeper));

    let mut stdout = std::io::stdout().lock();
    let stats = lookup.run(&validated.valid, &mut stdout).await?;
    stdout.flush()?;

    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        invalid = validated.invalid.len(),
        "Lookups finished"
    );

    Ok(())
}
