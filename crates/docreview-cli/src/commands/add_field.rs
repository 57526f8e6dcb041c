//! Add-field command - look up one named field on demand.

use clap::Args;
use console::style;

use super::{status_badge, Context, Gateway};

/// Arguments for the add-field command.
#[derive(Args)]
pub struct AddFieldArgs {
    /// Document id
    doc_id: String,

    /// Field to look for, e.g. "PO #" or "Due Date"
    name: String,
}

pub async fn run(args: AddFieldArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let gateway = Gateway::from_config(&config)?;
    let mut session = ctx.open_session(&config)?;

    println!(
        "{} Looking for \"{}\" in {}...",
        style("ℹ").blue(),
        args.name,
        args.doc_id
    );

    let field = session.smart_add_field(&args.doc_id, &args.name, &gateway).await?;
    ctx.save_session(&session)?;

    println!(
        "{} Added {} = {} ({}% {})",
        style("✓").green(),
        field.label(),
        field.effective_value(),
        field.confidence_percent(),
        field.confidence_level().display()
    );

    if let Some(doc) = session.document(&args.doc_id) {
        println!("Status: {}", status_badge(doc.status()));
    }

    Ok(())
}
