use clap::Parser;
use owo_colors::OwoColorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use justc::cli::{generate_completions, Args, Commands, OutputFormat};
use justc::config::AppConfig;
use justc::diagnostic::render_diagnostics;
use justc::format;
use justc::interpreter::{self, SystemCapabilities};
use justc::lexer::tokenize;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting justc");

    let (source, file_name) = match read_source(&args, &config) {
        Ok(input) => input,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    verbose_log(&config, &format!("Read {} bytes of source", source.len()));

    if args.lexer {
        run_lexer(&source, &file_name, &args.out, &config);
    } else {
        run_program(&source, &file_name, &args.out, &config);
    }
}

fn read_source(args: &Args, config: &AppConfig) -> Result<(String, String), String> {
    if let Some(code) = &args.code {
        verbose_log(config, "Using source from command-line argument");
        Ok((code.clone(), "<code>".to_string()))
    } else if let Some(file) = &args.file {
        verbose_log(config, &format!("Reading source from file: {}", file.display()));
        Ok((read_file(file)?, file.display().to_string()))
    } else {
        verbose_log(config, "Reading source from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok((buffer, "<stdin>".to_string()))
    }
}

fn run_lexer(source: &str, file_name: &str, out_file: &Option<PathBuf>, config: &AppConfig) {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            let error: interpreter::JustcError = e.into();
            let rendered = render_diagnostics(source, file_name, &[error.to_diagnostic()], config.color_enabled);
            eprint!("{}", rendered);
            std::process::exit(1);
        }
    };

    verbose_log(config, &format!("Produced {} tokens", tokens.len()));

    let output = match config.format {
        OutputFormat::Json => format::to_json_string(&format::tokens_to_json(source, &tokens), config.compact),
        OutputFormat::Xml => format::tokens_to_xml(source, &tokens),
    };
    emit(&output, out_file, config);
}

fn run_program(source: &str, file_name: &str, out_file: &Option<PathBuf>, config: &AppConfig) {
    let capabilities = match &config.config_file {
        Some(path) => {
            verbose_log(config, &format!("Loading configuration from {}", path.display()));
            match SystemCapabilities::from_config_file(path) {
                Ok(capabilities) => capabilities,
                Err(e) => {
                    error_message(config, &e);
                    std::process::exit(1);
                }
            }
        }
        None => SystemCapabilities::new(),
    };

    let result = interpreter::interpret_with(source, &config.options, &capabilities);
    verbose_log(
        config,
        &format!("Resolved {} outputs, {} log entries", result.outputs.len(), result.logs.len()),
    );

    if config.options.execute_side_effects && !result.log_file_path.is_empty() {
        verbose_log(config, &format!("Writing log transcript to {}", result.log_file_path));
        if let Err(e) = std::fs::write(&result.log_file_path, &result.log_file_content) {
            error_message(config, &format!("Failed to write {}: {}", result.log_file_path, e));
        }
    }

    let output = match config.format {
        OutputFormat::Json => format::to_json_string(&format::result_to_json(&result), config.compact),
        OutputFormat::Xml => format::result_to_xml(&result),
    };
    emit(&output, out_file, config);

    if let Some(error) = &result.error {
        let rendered = render_diagnostics(source, file_name, &[error.to_diagnostic()], config.color_enabled);
        eprint!("{}", rendered);
        std::process::exit(1);
    }
}

fn emit(output: &str, out_file: &Option<PathBuf>, config: &AppConfig) {
    let text = if output.ends_with('\n') {
        output.to_string()
    } else {
        format!("{}\n", output)
    };

    match out_file {
        Some(path) => {
            verbose_log(config, &format!("Writing output to {}", path.display()));
            if let Err(e) = std::fs::write(path, text) {
                error_message(config, &format!("Failed to write {}: {}", path.display(), e));
                std::process::exit(1);
            }
        }
        None => {
            print!("{}", text);
            io::stdout().flush().ok();
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[justc:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
