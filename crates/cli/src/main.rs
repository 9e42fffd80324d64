//! `appgen`: command-line front end for the context/diff/schema core.
//!
//! All semantics live in the library crates; this binary only loads JSON
//! manifests and documents, calls the core, and prints results. Stdout is
//! reserved for payloads, logs go to stderr.

use anyhow::{Context as _, Result};
use appgen_context::{build_context, ContextConfig};
use appgen_diff::{
    affected_files, compute_diff, detect_schema_changes, format_diff_summary, incremental_update,
    merge_files, IncrementalUpdate, SchemaField,
};
use appgen_protocol::{FileRecord, FileSet, Message};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "appgen")]
#[command(about = "Context packing, file diffing and schema versioning for AI-generated apps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a token-budgeted system prompt from a file manifest
    Context(ContextArgs),
    /// Classify every file change between two manifests
    Diff(DiffArgs),
    /// Derive the incremental update plan between two manifests
    Plan(PlanArgs),
    /// Apply an update plan to a manifest
    Merge(MergeArgs),
    /// Inspect, migrate, validate or export schema documents
    Schema(SchemaCmd),
}

#[derive(Args)]
struct ContextArgs {
    /// File manifest: JSON array of {path, content, language} ("-" = stdin)
    #[arg(long)]
    files: PathBuf,

    /// Conversation history: JSON array of {role, content}
    #[arg(long)]
    messages: Option<PathBuf>,

    /// Path of the file the user is currently editing
    #[arg(long)]
    active: Option<String>,

    /// Override the total token budget
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Override the file-count cap
    #[arg(long)]
    max_files: Option<usize>,

    /// List file paths without contents
    #[arg(long)]
    list_only: bool,

    /// Print only the rendered prompt instead of the full JSON result
    #[arg(long)]
    prompt_only: bool,
}

#[derive(Args)]
struct DiffArgs {
    /// Old file manifest ("-" = stdin)
    #[arg(long)]
    old: PathBuf,

    /// New file manifest
    #[arg(long)]
    new: PathBuf,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    summary: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Old file manifest ("-" = stdin)
    #[arg(long)]
    old: PathBuf,

    /// New file manifest
    #[arg(long)]
    new: PathBuf,
}

#[derive(Args)]
struct MergeArgs {
    /// Existing file manifest ("-" = stdin)
    #[arg(long)]
    existing: PathBuf,

    /// Update plan, as produced by `appgen plan`
    #[arg(long)]
    plan: PathBuf,
}

#[derive(Args)]
struct SchemaCmd {
    #[command(subcommand)]
    action: SchemaAction,
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Report a document's version and migration standing
    Info {
        /// Schema document ("-" = stdin)
        schema: PathBuf,
    },
    /// Migrate a document to the current schema version
    Migrate {
        /// Schema document ("-" = stdin)
        schema: PathBuf,
    },
    /// Check structural compatibility
    Validate {
        /// Schema document ("-" = stdin)
        schema: PathBuf,
    },
    /// Strip version bookkeeping for external use
    Export {
        /// Schema document ("-" = stdin)
        schema: PathBuf,
    },
    /// Build a complete versioned document from a partial one
    Create {
        /// Partial schema document ("-" = stdin, omit for an empty one)
        schema: Option<PathBuf>,

        /// Target platform recorded in meta.platform
        #[arg(long, default_value = "web")]
        platform: String,
    },
    /// Diff two documents and map changed fields to affected files
    Changes {
        /// Old schema document ("-" = stdin)
        #[arg(long)]
        old: PathBuf,

        /// New schema document
        #[arg(long)]
        new: PathBuf,
    },
    /// Describe what changes between two schema versions
    Changelog {
        /// Starting version (e.g. 1.0.0)
        #[arg(long)]
        from: String,

        /// Target version (e.g. 1.2.0)
        #[arg(long)]
        to: String,
    },
}

#[derive(Serialize)]
struct SchemaChangesOutput {
    changed_fields: Vec<SchemaField>,
    affected_files: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(error) = run(cli.command) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Context(args) => run_context(args),
        Commands::Diff(args) => run_diff(args),
        Commands::Plan(args) => run_plan(args),
        Commands::Merge(args) => run_merge(args),
        Commands::Schema(cmd) => run_schema(cmd.action),
    }
}

fn run_context(args: ContextArgs) -> Result<()> {
    let files = load_file_set(&args.files)?;
    let messages = match &args.messages {
        Some(path) => load_messages(path)?,
        None => Vec::new(),
    };

    let mut config = ContextConfig::default();
    if let Some(max_tokens) = args.max_tokens {
        config.max_context_tokens = max_tokens;
    }
    if let Some(max_files) = args.max_files {
        config.max_files_in_context = max_files;
    }
    if args.list_only {
        config.include_file_contents = false;
    }
    config
        .validate()
        .context("invalid context configuration")?;

    let result = build_context(&files, &messages, args.active.as_deref(), &config);
    log::info!(
        "packed {} files into {} tokens (truncated: {})",
        result.files.len(),
        result.total_tokens,
        result.truncated
    );

    if args.prompt_only {
        print!("{}", result.system_prompt);
        Ok(())
    } else {
        print_json(&result)
    }
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let old = load_file_set(&args.old)?;
    let new = load_file_set(&args.new)?;
    let report = compute_diff(&old, &new);

    if args.summary {
        print!("{}", format_diff_summary(&report));
        Ok(())
    } else {
        print_json(&report)
    }
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let old = load_file_set(&args.old)?;
    let new = load_file_set(&args.new)?;
    print_json(&incremental_update(&old, &new))
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let existing = load_file_set(&args.existing)?;
    let plan: IncrementalUpdate = serde_json::from_str(&read_input(&args.plan)?)
        .with_context(|| format!("invalid update plan in {}", args.plan.display()))?;

    let merged = merge_files(&existing, &plan);
    print_json(&merged.to_records())
}

fn run_schema(action: SchemaAction) -> Result<()> {
    match action {
        SchemaAction::Info { schema } => {
            let document = load_document(&schema)?;
            print_json(&appgen_schema::version_info(&document))
        }
        SchemaAction::Migrate { schema } => {
            let document = load_document(&schema)?;
            let result = appgen_schema::migrate(&document);
            if !result.success {
                log::warn!("migration failed: {}", result.warnings.join("; "));
            }
            print_json(&result)
        }
        SchemaAction::Validate { schema } => {
            let document = load_document(&schema)?;
            print_json(&appgen_schema::validate_compatibility(&document))
        }
        SchemaAction::Export { schema } => {
            let document = load_document(&schema)?;
            print_json(&appgen_schema::export_schema(&document))
        }
        SchemaAction::Create { schema, platform } => {
            let partial = match schema {
                Some(path) => load_document(&path)?,
                None => Value::Object(serde_json::Map::new()),
            };
            print_json(&appgen_schema::create_versioned_schema(&partial, &platform))
        }
        SchemaAction::Changes { old, new } => {
            let old_document = load_document(&old)?;
            let new_document = load_document(&new)?;
            let changed_fields = detect_schema_changes(&old_document, &new_document);
            let affected = affected_files(&changed_fields);
            print_json(&SchemaChangesOutput {
                changed_fields,
                affected_files: affected,
            })
        }
        SchemaAction::Changelog { from, to } => {
            print_json(&appgen_schema::version_diff(&from, &to))
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn load_file_set(path: &Path) -> Result<FileSet> {
    let records: Vec<FileRecord> = serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("invalid file manifest in {}", path.display()))?;
    Ok(records.into_iter().collect())
}

fn load_messages(path: &Path) -> Result<Vec<Message>> {
    serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("invalid message history in {}", path.display()))
}

fn load_document(path: &Path) -> Result<Value> {
    serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("invalid schema document in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
