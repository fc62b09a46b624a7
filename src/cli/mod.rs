// CLI module for vision-relay

use clap::Parser;
use std::path::PathBuf;

/// vision-relay - Image analysis relay for the OpenAI Responses API
#[derive(Parser, Debug, Default)]
#[command(name = "vision-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (defaults to ~/.vision-relay/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}
