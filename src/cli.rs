use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::DEFAULT_MAX_PASSES;

#[derive(Parser, Debug)]
#[command(name = "justc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "JUSTC configuration language interpreter", long_about = None)]
pub struct Args {
    /// JUSTC source file; stdin is read when neither FILE nor --code is given
    #[arg(value_name = "FILE", conflicts_with = "code")]
    pub file: Option<PathBuf>,

    #[arg(short, long, value_name = "CODE")]
    pub code: Option<String>,

    /// Print the token stream instead of evaluating
    #[arg(long = "lexer")]
    pub lexer: bool,

    #[arg(long = "format", value_name = "FORMAT", default_value = "json")]
    pub format: OutputFormat,

    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub out: Option<PathBuf>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(long = "compact")]
    pub compact: bool,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Do not print echoes or write log transcripts
    #[arg(long = "no-side-effects")]
    pub no_side_effects: bool,

    #[arg(long = "allow-http")]
    pub allow_http: bool,

    #[arg(long = "max-passes", value_name = "N", default_value_t = DEFAULT_MAX_PASSES)]
    pub max_passes: usize,

    /// JSON object file served to CONFIG(key)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(format!("Invalid output format: {}. Must be 'json' or 'xml'", s)),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
