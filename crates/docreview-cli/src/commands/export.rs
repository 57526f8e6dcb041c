//! Export command - write approved documents to a file.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;

use docreview_core::ExportFormat;

use super::Context;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Output format (csv, json, xlsx)
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,

    /// Output directory (default: export.output_dir from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

pub fn run(args: ExportArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let session = ctx.open_session(&config)?;

    let artifact = session.export(args.format, Utc::now())?;

    if args.stdout {
        println!("{}", artifact.content);
        return Ok(());
    }

    let output_dir = args.output_dir.unwrap_or(config.export.output_dir);
    let path = artifact.write_to(&output_dir)?;

    println!(
        "{} Exported {} documents as {} to {}",
        style("✓").green(),
        artifact.documents,
        args.format,
        path.display()
    );

    Ok(())
}
