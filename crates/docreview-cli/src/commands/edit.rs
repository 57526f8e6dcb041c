//! Correct and reclassify commands.

use clap::Args;
use console::style;

use docreview_core::DocType;

use super::{status_badge, Context};

/// Arguments for the correct command.
#[derive(Args)]
pub struct CorrectArgs {
    /// Document id
    doc_id: String,

    /// Field id (see 'docreview show')
    field_id: String,

    /// Corrected value
    value: String,

    /// Apply to every field with the same label
    #[arg(long)]
    all: bool,
}

/// Arguments for the reclassify command.
#[derive(Args)]
pub struct ReclassifyArgs {
    /// Document id
    doc_id: String,

    /// New type (invoice, bol, receipt, unknown)
    doc_type: DocType,
}

pub fn correct(args: CorrectArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    if session.document(&args.doc_id).is_none() {
        anyhow::bail!("Document not found: {}", args.doc_id);
    }

    let touched = session.update_field(&args.doc_id, &args.field_id, &args.value, args.all);
    if touched == 0 {
        anyhow::bail!("Field {} not found in {}", args.field_id, args.doc_id);
    }
    ctx.save_session(&session)?;

    println!(
        "{} Updated {} field{}",
        style("✓").green(),
        touched,
        if touched == 1 { "" } else { "s" }
    );

    if let Some(doc) = session.document(&args.doc_id) {
        if let Some(warning) = doc.field(&args.field_id).and_then(|f| f.validation_warning()) {
            println!("{} {}", style("⚠").yellow(), warning);
        }
        if !args.all && doc.has_repeated_label(&args.field_id) {
            println!(
                "{} Other fields share this label. Use --all to correct them together.",
                style("ℹ").blue()
            );
        }
        println!("Status: {}", status_badge(doc.status()));
    }

    Ok(())
}

pub fn reclassify(args: ReclassifyArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    if !session.update_doc_type(&args.doc_id, args.doc_type) {
        anyhow::bail!("Document not found: {}", args.doc_id);
    }
    ctx.save_session(&session)?;

    println!(
        "{} {} is now {}",
        style("✓").green(),
        args.doc_id,
        args.doc_type
    );

    if let Some(doc) = session.document(&args.doc_id) {
        let missing = doc.missing_standard_fields();
        if !missing.is_empty() {
            println!(
                "{} {}: missing {}",
                style("ℹ").blue(),
                args.doc_type.template_title(),
                missing.join(", ")
            );
        }
    }

    Ok(())
}
