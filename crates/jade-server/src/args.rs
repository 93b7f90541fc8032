use clap::Parser;
use std::path::PathBuf;

use crate::constants::BINARY_NAME;
use crate::output::OutputLevel;

// Example strings for after_long_help
const CLI_EXAMPLES: &str = r#"EXAMPLES:
  jade                                  # Serve on 0.0.0.0:8080 using ./templates
  jade --port 3000 --templates ./site   # Custom port and template directory
  jade --token sk-...                   # Pass the API token explicitly
  jade --config ./jade.toml --verbose   # Load settings from a file, log debug output"#;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "Answer search queries with pages written by a chat-completion model")]
#[command(name = BINARY_NAME)]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: 8080)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding index.html and include/search.html (default: ./templates)
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Timeout in seconds for each completion request made by /search (default: 200)
    #[arg(long, value_name = "SECONDS")]
    pub search_timeout: Option<u64>,

    /// API token; falls back to the OPENAI_API_TOKEN environment variable
    #[arg(long)]
    pub token: Option<String>,

    /// Configuration file (default: <config dir>/jade/config.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Quiet output (only show warnings and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn output_level(&self) -> OutputLevel {
        if self.quiet {
            OutputLevel::Quiet
        } else if self.verbose {
            OutputLevel::Verbose
        } else {
            OutputLevel::Normal
        }
    }
}
