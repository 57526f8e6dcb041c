//! Approve command - approve one document or the whole reviewable set.

use clap::Args;
use console::style;

use super::{status_badge, Context};

/// Arguments for the approve command.
#[derive(Args)]
pub struct ApproveArgs {
    /// Document id
    #[arg(required_unless_present = "batch")]
    doc_id: Option<String>,

    /// Approve every Extracted or Review Needed document
    #[arg(long, conflicts_with = "doc_id")]
    batch: bool,
}

pub fn run(args: ApproveArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    if args.batch {
        let approved = session.approve_batch();
        ctx.save_session(&session)?;
        println!("{} Approved {} documents", style("✓").green(), approved);
        return Ok(());
    }

    let Some(doc_id) = args.doc_id else {
        anyhow::bail!("Specify a document id or --batch");
    };
    let Some(status) = session.document(&doc_id).map(|d| d.status()) else {
        anyhow::bail!("Document not found: {}", doc_id);
    };

    if session.approve(&doc_id) {
        ctx.save_session(&session)?;
        println!("{} Approved {}", style("✓").green(), doc_id);
    } else {
        println!(
            "{} {} is {} and was not changed",
            style("⚠").yellow(),
            doc_id,
            status_badge(status)
        );
    }

    Ok(())
}
