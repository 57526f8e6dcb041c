//! Ingest command - upload documents and run extraction.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use docreview_core::{DocStatus, SourceFile};

use super::{status_badge, Context, Gateway};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,
}

pub async fn run(args: IngestArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = ctx.config()?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            config.intake.accepts(ext)
        })
        .collect();

    let sources: Vec<SourceFile> = files
        .iter()
        .filter_map(|path| match SourceFile::from_path(path) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    if sources.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to ingest",
        style("ℹ").blue(),
        sources.len()
    );

    let gateway = Gateway::from_config(&config)?;
    let mut session = ctx.open_session(&config)?;

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let ids = session
        .ingest_with_progress(sources, &gateway, |doc| {
            pb.set_message(doc.file_name().to_string());
            pb.inc(1);
        })
        .await;

    pb.finish_and_clear();
    ctx.save_session(&session)?;

    let mut failed = 0;
    for id in &ids {
        let Some(doc) = session.document(id) else {
            continue;
        };
        if doc.status() == DocStatus::Failed {
            failed += 1;
        }
        println!(
            "  {:<8} {:<32} {:<8} {}",
            doc.id(),
            doc.file_name(),
            doc.doc_type().as_str(),
            status_badge(doc.status())
        );
    }

    println!();
    println!(
        "{} Ingested {} documents in {:?}",
        style("✓").green(),
        ids.len(),
        start.elapsed()
    );
    if failed > 0 {
        println!(
            "{} {} documents failed extraction",
            style("⚠").yellow(),
            failed
        );
    }

    info!("Session now holds {} documents", session.documents().len());
    Ok(())
}
