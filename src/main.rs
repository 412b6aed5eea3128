// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use reag::utils::logging::{format_error, format_heading, format_skipped, format_success};
use reag::{
    Answer, Config, Document, JsonExporter, MetadataFilter, OutputSchema, ProgressTracker,
    QueryEngine, QueryOptions, QueryReport, Validator, filter_documents, load_documents,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "reag")]
#[command(version)]
#[command(about = "Ask a question across documents with a filtration and a reasoning model", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a question against documents and print the relevant answers as JSON
    Query {
        /// Question to ask
        prompt: String,

        /// Directory, JSON file of documents, or single text file
        #[arg(short, long, value_name = "PATH")]
        docs: PathBuf,

        /// Metadata clause, repeatable; all clauses must hold
        #[arg(short, long, value_name = "KEY:OPERATOR:VALUE")]
        filter: Vec<MetadataFilter>,

        #[arg(long, value_name = "NUM")]
        batch_size: Option<usize>,

        /// File whose contents replace the system prompt
        #[arg(long, value_name = "FILE")]
        system: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// Show which documents pass the metadata filter without calling a model
    Filter {
        #[arg(short, long, value_name = "PATH")]
        docs: PathBuf,

        #[arg(short, long, value_name = "KEY:OPERATOR:VALUE")]
        filter: Vec<MetadataFilter>,
    },

    /// Print the JSON schema requested from both models
    Schema {
        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    reag::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Joins the error chain into one line. Causes already quoted by an outer
/// message are skipped.
fn failure_message(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    format_error(&message)
}

async fn run(cli: Cli) -> Result<()> {
    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };
    let config = config.with_env_api_keys();

    match cli.command {
        Commands::Query {
            prompt,
            docs,
            filter,
            batch_size,
            system,
            output,
            pretty,
            no_progress,
        } => {
            let args = QueryArgs {
                prompt,
                docs,
                filter,
                batch_size,
                system,
                output,
                pretty,
                show_progress: !no_progress,
            };
            cmd_query(&config, args, cli.color).await?;
        }
        Commands::Filter { docs, filter } => {
            cmd_filter(&config, &docs, &filter)?;
        }
        Commands::Schema { pretty } => {
            cmd_schema(pretty)?;
        }
    }

    Ok(())
}

struct QueryArgs {
    prompt: String,
    docs: PathBuf,
    filter: Vec<MetadataFilter>,
    batch_size: Option<usize>,
    system: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
    show_progress: bool,
}

fn read_documents(config: &Config, docs: &Path) -> Result<Vec<Document>> {
    Validator::validate_source_path(docs)?;
    load_documents(docs, &config.loader)
        .with_context(|| format!("Failed to load documents from {}", docs.display()))
}

async fn cmd_query(config: &Config, args: QueryArgs, colored: bool) -> Result<()> {
    Validator::validate_prompt(&args.prompt)?;

    if config.reasoning.api_key.is_none() || config.filtration.api_key.is_none() {
        warn!("No API key configured; requests are sent unauthenticated");
    }

    let documents = read_documents(config, &args.docs)?;

    let mut builder =
        QueryEngine::builder_from_config(config).context("Failed to configure query engine")?;
    if let Some(size) = args.batch_size {
        builder = builder.batch_size(size);
    }
    if let Some(path) = &args.system {
        let system = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read system prompt {}", path.display()))?;
        builder = builder.system_prompt(system);
    }
    let engine = builder.build();

    let progress = Arc::new(if args.show_progress {
        ProgressTracker::new(colored)
    } else {
        ProgressTracker::hidden()
    });
    let options = QueryOptions::new()
        .with_filter(args.filter)
        .with_progress(Arc::clone(&progress));

    let results = engine.query(&args.prompt, &documents, &options).await?;

    let stats = progress.get_stats();
    eprintln!(
        "{}",
        format_success(&format!(
            "{} relevant of {} evaluated documents ({} loaded) in {:.2}s",
            stats.documents_relevant,
            stats.documents_evaluated(),
            documents.len(),
            stats.duration_secs
        ))
    );

    let report = QueryReport::new(&args.prompt, &results).with_stats(stats);
    JsonExporter::new(args.pretty).export(&report, args.output.as_deref())?;

    Ok(())
}

fn cmd_filter(config: &Config, docs: &Path, filter: &[MetadataFilter]) -> Result<()> {
    let documents = read_documents(config, docs)?;
    let kept = filter_documents(&documents, filter)?;

    println!(
        "{}",
        format_heading(&format!(
            "{} of {} documents pass {} clause(s)",
            kept.len(),
            documents.len(),
            filter.len()
        ))
    );

    for document in &documents {
        let metadata = serde_json::to_string(&document.metadata)?;
        let line = format!("{} {}", document.name, metadata);
        if kept.iter().any(|k| std::ptr::eq(*k, document)) {
            println!("{}", format_success(&line));
        } else {
            println!("{}", format_skipped(&line));
        }
    }

    Ok(())
}

fn cmd_schema(pretty: bool) -> Result<()> {
    let schema = OutputSchema::for_type::<Answer>();
    JsonExporter::new(pretty).export(&schema, None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reag::{GenerationError, QueryError, ReagError};

    #[test]
    fn test_failure_message_reports_each_cause_once() {
        colored::control::set_override(false);

        let err = anyhow::Error::new(QueryError::from(ReagError::Filtration {
            document: "notes".to_string(),
            source: GenerationError::Transport("connection reset".to_string()),
        }));
        let message = failure_message(&err);
        assert!(message.starts_with("✗ Query failed: Filtration failed"));
        assert_eq!(message.matches("connection reset").count(), 1);

        let err = anyhow::anyhow!("missing file").context("Failed to load configuration");
        assert_eq!(
            failure_message(&err),
            "✗ Failed to load configuration: missing file"
        );
    }
}
