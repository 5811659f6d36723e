use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sage_infrastructure::settings::load_dotenv;
use sage_infrastructure::{SettingsOverrides, SettingsResolver};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sage")]
#[command(about = "SAGE - ask an expert persona a single question", long_about = None)]
struct Cli {
    /// Chat model to use (overrides secret.json and OPENAI_MODEL_NAME)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds to wait for an answer before giving up
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available expert personas
    Personas,
    /// Ask one question and print the answer
    Ask {
        /// Persona key (A, B, C or D)
        #[arg(short, long, default_value = "A")]
        persona: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Ask questions interactively; every question is answered on its own
    Chat {
        /// Persona to start with
        #[arg(short, long, default_value = "A")]
        persona: String,
    },
}

/// `--verbose` wins over `RUST_LOG`; without either only warnings are shown.
fn log_directives(verbose: bool, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        _ if verbose => "debug".to_string(),
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => "warn".to_string(),
    }
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(log_directives(verbose, rust_log.as_deref()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    // RUST_LOG may come from .env, so it is loaded before the subscriber.
    let dotenv = load_dotenv();
    init_tracing(cli.verbose);
    match dotenv {
        Ok(Some(path)) => tracing::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    let overrides = SettingsOverrides {
        model: cli.model,
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
    };

    match cli.command {
        Commands::Personas => {
            commands::personas::list();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ask {
            persona,
            json,
            question,
        } => {
            let context = build_context(&overrides)?;
            commands::ask::run(&context, &persona, &question.join(" "), json).await
        }
        Commands::Chat { persona } => {
            let context = build_context(&overrides)?;
            commands::chat::run(&context, &persona).await
        }
    }
}

fn build_context(overrides: &SettingsOverrides) -> Result<commands::Context> {
    let settings = SettingsResolver::new().resolve(overrides)?;
    commands::Context::from_settings(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_rust_log() {
        assert_eq!(log_directives(true, Some("sage=trace")), "debug");
        assert_eq!(log_directives(true, None), "debug");
    }

    #[test]
    fn test_rust_log_is_used_when_present() {
        assert_eq!(log_directives(false, Some(" info ")), "info");
    }

    #[test]
    fn test_defaults_to_warn() {
        assert_eq!(log_directives(false, None), "warn");
        assert_eq!(log_directives(false, Some("  ")), "warn");
    }

    #[test]
    fn test_cli_parses_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "sage", "ask", "-p", "c", "--json", "--model", "gpt-4o", "What", "now?",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        match cli.command {
            Commands::Ask {
                persona,
                json,
                question,
            } => {
                assert_eq!(persona, "c");
                assert!(json);
                assert_eq!(question.join(" "), "What now?");
            }
            _ => panic!("Expected ask command"),
        }
    }
}
