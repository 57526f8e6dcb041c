//! CLI workbench for reviewing AI-extracted document data.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{add_field, approve, config, edit, export, ingest, queue, review, Context};

/// Document review - check, correct, and export AI-extracted fields
#[derive(Parser)]
#[command(name = "docreview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the review session file
    #[arg(short, long, global = true, default_value = "docreview-session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload documents and run extraction
    Ingest(ingest::IngestArgs),

    /// Show the review queue grouped by document type
    Queue(queue::QueueArgs),

    /// Show the fields of a document
    Show(review::ShowArgs),

    /// Select a document in the current view
    Select(review::SelectArgs),

    /// Move to the next document in the current view
    Next,

    /// Correct a field value
    Correct(edit::CorrectArgs),

    /// Change the document type
    Reclassify(edit::ReclassifyArgs),

    /// Ask the extraction service for one more field
    ///
    /// Only one lookup per document runs at a time, but that guard lives in
    /// this process. Separate docreview runs against the same session file
    /// are not serialized: each loads the file, and the last one to save
    /// wins, so a concurrent correction or lookup can be lost.
    AddField(add_field::AddFieldArgs),

    /// Approve a document, or every reviewable document with --batch
    Approve(approve::ApproveArgs),

    /// Export approved documents
    Export(export::ExportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = Context::new(cli.config.map(PathBuf::from), cli.session);

    // Execute command
    match cli.command {
        Commands::Ingest(args) => ingest::run(args, &ctx).await,
        Commands::Queue(args) => queue::run(args, &ctx),
        Commands::Show(args) => review::show(args, &ctx),
        Commands::Select(args) => review::select(args, &ctx),
        Commands::Next => review::next(&ctx),
        Commands::Correct(args) => edit::correct(args, &ctx),
        Commands::Reclassify(args) => edit::reclassify(args, &ctx),
        Commands::AddField(args) => add_field::run(args, &ctx).await,
        Commands::Approve(args) => approve::run(args, &ctx),
        Commands::Export(args) => export::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
