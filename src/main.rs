//! iam-expand CLI
//!
//! Expands wildcard IAM action patterns against a catalog data file, either
//! from command-line operands, from free-form text piped on stdin, or
//! throughout a JSON policy document piped on stdin.

use clap::{CommandFactory, Parser, ValueEnum};
use iam_expand::{
    DocumentConfig, ExpansionConfig, InMemoryCatalog, InvalidActionBehavior,
    cli::{StdinPayload, parse_stdin},
    expand_actions, expand_document, invert_actions,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Expand wildcard IAM action patterns into the actions they cover
#[derive(Parser, Debug)]
#[command(name = "iam-expand")]
#[command(version, about, long_about = None)]
struct Args {
    /// Action patterns to expand (reads stdin when omitted)
    #[arg(value_name = "ACTION")]
    actions: Vec<String>,

    /// Path to the catalog data file (JSON)
    #[arg(long, env = "IAM_EXPAND_DATA", value_name = "FILE")]
    data: PathBuf,

    /// Expand a lone `*` to all actions of all services
    #[arg(short = 'e', long, env = "IAM_EXPAND_EXPAND_ASTERISK")]
    expand_asterisk: bool,

    /// Expand `service:*` to all actions of that service
    #[arg(long, env = "IAM_EXPAND_EXPAND_SERVICE_ASTERISK")]
    expand_service_asterisk: bool,

    /// Fail if an action string is not in the service:action format
    #[arg(short = 'f', long, env = "IAM_EXPAND_ERROR_ON_INVALID_FORMAT")]
    error_on_invalid_format: bool,

    /// Fail if a service is not found
    #[arg(short = 's', long, env = "IAM_EXPAND_ERROR_ON_INVALID_SERVICE")]
    error_on_invalid_service: bool,

    /// What to do when an exact action is not in the catalog
    #[arg(
        long,
        value_enum,
        default_value = "remove",
        env = "IAM_EXPAND_INVALID_ACTION_BEHAVIOR"
    )]
    invalid_action_behavior: InvalidActionArg,

    /// If not JSON, print the inverse of the actions provided
    #[arg(short = 'i', long, env = "IAM_EXPAND_INVERT")]
    invert: bool,

    /// If JSON, replace NotAction values with Action arrays holding the
    /// inverse actions
    #[arg(short = 'n', long, env = "IAM_EXPAND_INVERT_NOT_ACTIONS")]
    invert_not_actions: bool,

    /// Print the catalog data version and exit
    #[arg(short = 'd', long)]
    show_data_version: bool,

    /// Milliseconds to wait for the first byte from stdin before timing out
    #[arg(long, env = "IAM_EXPAND_READ_WAIT_MS", value_name = "MS")]
    read_wait_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "IAM_EXPAND_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// CLI spelling of the invalid-action policy; normalized here, at the
/// parsing boundary, never inside the engine.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InvalidActionArg {
    Remove,
    Include,
    Error,
}

impl From<InvalidActionArg> for InvalidActionBehavior {
    fn from(value: InvalidActionArg) -> Self {
        match value {
            InvalidActionArg::Remove => InvalidActionBehavior::Remove,
            InvalidActionArg::Include => InvalidActionBehavior::Include,
            InvalidActionArg::Error => InvalidActionBehavior::Error,
        }
    }
}

impl Args {
    fn expansion_config(&self) -> ExpansionConfig {
        ExpansionConfig {
            expand_asterisk: self.expand_asterisk,
            expand_service_asterisk: self.expand_service_asterisk,
            error_on_invalid_format: self.error_on_invalid_format,
            error_on_invalid_service: self.error_on_invalid_service,
            invalid_action_behavior: self.invalid_action_behavior.into(),
        }
    }
}

fn print_notices(notices: &[String]) {
    for notice in notices {
        eprintln!("Notice: {notice}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load the catalog
    let catalog = InMemoryCatalog::from_path(&args.data)
        .inspect_err(|e| error!(error = %e, "Failed to load catalog data"))?;

    if args.show_data_version {
        println!(
            "Catalog data version: {}",
            catalog.version().unwrap_or("unknown")
        );
        println!(
            "Data last updated: {}",
            catalog.updated_at().unwrap_or("unknown")
        );
        return Ok(());
    }

    run(&args, &catalog).await
}

async fn run(args: &Args, catalog: &InMemoryCatalog) -> anyhow::Result<()> {
    let config = args.expansion_config();
    let mut actions = args.actions.clone();
    let mut notices: Vec<String> = Vec::new();

    if actions.is_empty() {
        // No operands, so the input comes from stdin
        let wait = args.read_wait_ms.map(Duration::from_millis);
        match parse_stdin(wait).await? {
            StdinPayload::Document(document) => {
                let document_config = DocumentConfig {
                    expand: config,
                    invert_not_actions: args.invert_not_actions,
                };
                let expanded = expand_document(catalog, &document_config, document).await?;
                println!("{}", serde_json::to_string_pretty(&expanded)?);
                if args.invert {
                    notices.push(
                        "--invert is not supported when processing JSON, ignoring. \
                         Did you mean --invert-not-actions ?"
                            .to_string(),
                    );
                }
                print_notices(&notices);
                return Ok(());
            }
            StdinPayload::Actions(scraped) => {
                if !scraped.is_empty() && args.expand_asterisk {
                    notices.push(
                        "--expand-asterisk is not supported when reading from stdin, ignoring."
                            .to_string(),
                    );
                }
                actions.extend(scraped);
            }
            StdinPayload::Empty => {}
        }
    }

    if !actions.is_empty() {
        if args.invert_not_actions {
            notices.push(
                "--invert-not-actions is only supported when processing JSON, ignoring."
                    .to_string(),
            );
        }

        let result = if args.invert {
            invert_actions(catalog, &actions).await?
        } else {
            expand_actions(catalog, &actions, &config).await?
        };
        for action in &result {
            println!("{action}");
        }
        print_notices(&notices);
        return Ok(());
    }

    println!("No actions provided or input from stdin");
    Args::command().print_help()?;
    Ok(())
}
