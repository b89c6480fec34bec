use std::path::PathBuf;

use crate::cli::{Args, ColorChoice, OutputFormat};

/// Default fixed-point pass budget.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// How deep `JUSTC(...)`, `PARSEJUSTC(...)` and `HTTPJUSTC(...)` may nest.
pub const MAX_NESTING_DEPTH: usize = 16;

/// Options for a single parse/resolve run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Print echoes, register log files and append to them.
    pub execute_side_effects: bool,
    pub allow_http: bool,
    pub max_passes: usize,
    /// Current nesting depth of embedded JUSTC evaluation.
    pub depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            execute_side_effects: true,
            allow_http: false,
            max_passes: DEFAULT_MAX_PASSES,
            depth: 0,
        }
    }
}

impl ParseOptions {
    /// Parse without printing or touching log files.
    pub fn quiet() -> Self {
        Self {
            execute_side_effects: false,
            ..Self::default()
        }
    }

    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }
}

pub struct AppConfig {
    pub color_enabled: bool,
    pub compact: bool,
    pub verbose: bool,
    pub format: OutputFormat,
    pub config_file: Option<PathBuf>,
    pub options: ParseOptions,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            compact: args.compact,
            verbose: args.verbose,
            format: args.format,
            config_file: args.config.clone(),
            options: ParseOptions {
                execute_side_effects: !args.no_side_effects,
                allow_http: args.allow_http,
                max_passes: args.max_passes,
                depth: 0,
            },
        }
    }
}
