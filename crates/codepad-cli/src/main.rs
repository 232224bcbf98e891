//! Codepad CLI
//!
//! A command-line tool for running JavaScript and TypeScript snippets in the
//! codepad sandbox.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codepad::{Config, EXAMPLE_CONFIG, ExecutionLimits, ExecutionResult, Runner, strip_types};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codepad")]
#[command(about = "Run JavaScript and TypeScript snippets in an isolated sandbox")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: codepad.toml)
        #[arg(short, long, default_value = "codepad.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a source file in the sandbox
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language tag (inferred from the file extension if omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Timeout in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,

        /// Heap limit in KB
        #[arg(short, long)]
        memory_limit: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a TypeScript file with its type annotations stripped
    Strip {
        /// TypeScript file
        #[arg(value_name = "FILE")]
        source: PathBuf,
    },

    /// List available languages
    Languages,

    /// Show default configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            timeout_ms,
            memory_limit,
            json,
        } => {
            run_source(
                &config,
                &source,
                language.as_deref(),
                timeout_ms,
                memory_limit,
                json,
            )
            .await
        }
        Commands::Strip { source } => strip_source(&source).await,
        Commands::Languages => {
            list_languages(&config);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_source(
    config: &Config,
    source: &Path,
    language: Option<&str>,
    timeout_ms: Option<u64>,
    memory_limit: Option<u64>,
    json: bool,
) -> Result<()> {
    let language = match language {
        Some(tag) => tag.to_owned(),
        None => infer_language(config, source)?,
    };

    let source_content = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;

    // Only include explicitly-specified values so they don't override the
    // configured defaults
    let user_limits = ExecutionLimits {
        timeout_ms,
        memory_limit,
        ..ExecutionLimits::unset()
    };
    let has_user_limits = timeout_ms.is_some() || memory_limit.is_some();

    info!(%language, "running program");

    let runner = Runner::new(config.clone());
    let result = runner
        .run_with_limits(
            &source_content,
            &language,
            has_user_limits.then_some(&user_limits),
        )
        .await;

    if json {
        let report = serde_json::to_string_pretty(&result.report())
            .context("failed to serialize result")?;
        println!("{report}");
    } else {
        print_panel(&result);
    }

    if result.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn infer_language(config: &Config, source: &Path) -> Result<String> {
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .context("cannot infer language: file has no extension, pass --language")?;
    let (tag, _) = config.language_for_extension(extension).with_context(|| {
        format!("cannot infer language for '.{extension}' files, pass --language")
    })?;
    debug!(tag, extension, "inferred language from extension");
    Ok(tag.to_owned())
}

fn print_panel(result: &ExecutionResult) {
    match result {
        ExecutionResult::Completed { output, .. } if output.is_empty() => {
            println!("No output");
        }
        ExecutionResult::Completed { output, .. } => {
            println!("{output}");
        }
        ExecutionResult::Failed { error, .. } => {
            eprintln!("{error}");
        }
    }
    eprintln!("{:.2}ms", result.elapsed_ms());
}

async fn strip_source(source: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;
    let script = strip_types(&content).context("failed to strip type annotations")?;
    print!("{script}");
    Ok(())
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    let mut languages: Vec<_> = config.languages.iter().collect();
    languages.sort_by_key(|(tag, _)| *tag);

    for (tag, lang) in languages {
        let support = if lang.is_executable() {
            "executable"
        } else {
            "editor only"
        };
        println!("  {:<15} {} ({})", tag, lang.name, support);
    }
}

fn show_config(config: &Config) {
    let limits = &config.default_limits;
    println!("Default execution limits:");
    println!("  Timeout: {} ms", limits.timeout().as_millis());
    println!("  Memory limit: {:?} KB", limits.memory_limit);
    println!("  Stack limit: {:?} KB", limits.stack_limit);
    println!("  Max output: {:?} KB", limits.max_output);
    println!();
    println!("Languages configured: {}", config.languages.len());
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
