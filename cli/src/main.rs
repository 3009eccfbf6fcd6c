use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_args_core::{
    CommandSchema, ParseOutcome, ParsedCommand, ParserConfig, load_schema, parse_with_config,
    render_help, render_help_for_level, render_help_for_path,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status for malformed input tokens.
const EXIT_SYNTAX: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "command-args")]
#[command(about = "Parse command-line tokens against command schemas stored on disk")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log parser decisions to stderr (overrides RUST_LOG).
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the resolved command tree.
    Parse(ParseArgs),
    /// Render help text for a schema, optionally narrowed to a subcommand path.
    Help(HelpArgs),
    /// Validate one or more schema files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Parser configuration file (.json, .yaml or .yml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Subcommand names leading to the level to describe.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories containing schema files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// Why a command failed, and the exit status it maps to.
#[derive(Debug)]
enum Failure {
    /// Tokens did not match the schema; carries the usage text to print.
    Syntax { message: String, usage: String },
    General(String),
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::General(message)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args).map_err(Failure::from),
        Command::Validate(args) => run_validate(args).map_err(Failure::from),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Syntax { message, usage }) => {
            eprintln!("error: {message}\n");
            eprint!("{usage}");
            std::process::exit(EXIT_SYNTAX);
        }
        Err(Failure::General(err)) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let schema = read_schema(&args.schema)?;
    let config = match &args.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ParserConfig::default(),
    };
    debug!(tokens = ?args.tokens, schema = %schema.name, "Parsing tokens");

    let outcome = parse_with_config(&args.tokens, &schema, &config).map_err(|err| {
        Failure::Syntax {
            message: err.to_string(),
            usage: render_help(&schema),
        }
    })?;

    match outcome {
        ParseOutcome::Parsed(parsed) => {
            print!("{}", format_parsed(&parsed, args.format)?);
        }
        ParseOutcome::HelpRequested(levels) => {
            // Describe the deepest level that asked for help.
            let level = levels
                .iter()
                .max_by_key(|level| level.path.len())
                .ok_or_else(|| "Help was requested but no level recorded it".to_string())?;
            info!(command = %level.command, path = ?level.path, "Rendering requested help");
            let help = render_help_for_level(&schema, level)
                .unwrap_or_else(|| render_help(&schema));
            print!("{help}");
        }
    }
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let schema = read_schema(&args.schema)?;
    let path: Vec<&str> = args.path.iter().map(String::as_str).collect();
    let help = render_help_for_path(&schema, &path).ok_or_else(|| {
        format!(
            "'{}' has no command '{}'",
            schema.name,
            args.path.join(" ")
        )
    })?;
    print!("{help}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs)?;
    if paths.is_empty() {
        return Err("No schema files found in the given inputs".to_string());
    }

    let mut invalid = 0;
    for path in &paths {
        match load_schema(path) {
            Ok(schema) => debug!(path = %path.display(), command = %schema.name, "Schema is valid"),
            Err(err) => {
                invalid += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{invalid} of {} schema file(s) are invalid",
            paths.len()
        ));
    }
    println!("Validated {} schema file(s).", paths.len());
    Ok(())
}

fn read_schema(path: &Path) -> Result<CommandSchema, String> {
    load_schema(path).map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))
}

fn format_parsed(parsed: &ParsedCommand, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(parsed)
            .map(|mut raw| {
                raw.push('\n');
                raw
            })
            .map_err(|err| format!("Failed to serialize parse result: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(parsed)
            .map_err(|err| format!("Failed to serialize parse result: {err}")),
    }
}

/// Expands directories into the schema files they directly contain, sorted by path.
fn collect_schema_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }
        let entries = fs::read_dir(input)
            .map_err(|err| format!("Failed to read directory '{}': {err}", input.display()))?;
        let mut found = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| format!("Failed to read directory '{}': {err}", input.display()))?
                .path();
            if path.is_file() && is_schema_file(&path) {
                found.push(path);
            }
        }
        found.sort();
        paths.extend(found);
    }
    Ok(paths)
}

fn is_schema_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json" | "yaml" | "yml")
    )
}
