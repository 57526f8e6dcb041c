//! Show, select, and next commands - inspect and navigate the queue.

use clap::Args;
use console::style;

use docreview_core::{ConfidenceLevel, DocType, DocumentData, ExtractedField, Navigation};

use super::{status_badge, Context};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Document id (default: the selected document)
    id: Option<String>,

    /// Also print bounding boxes
    #[arg(long)]
    boxes: bool,
}

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    /// Document id
    id: String,
}

pub fn show(args: ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let session = ctx.open_session(&config)?;

    let doc = match &args.id {
        Some(id) => session
            .document(id)
            .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?,
        None => session
            .selected()
            .ok_or_else(|| anyhow::anyhow!("No document selected"))?,
    };

    print_header(doc);

    if doc.fields().is_empty() {
        println!();
        println!("{} No fields extracted", style("ℹ").blue());
    } else {
        println!();
        for field in doc.fields() {
            print_field(doc, field, args.boxes);
        }
    }

    if doc.doc_type() != DocType::Unknown {
        let missing = doc.missing_standard_fields();
        if !missing.is_empty() {
            println!();
            println!(
                "{} {}: missing {}",
                style("ℹ").blue(),
                doc.doc_type().template_title(),
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn print_header(doc: &DocumentData) {
    println!("{} ({})", style(doc.file_name()).bold(), doc.id());
    println!("Type:     {}", doc.doc_type());
    println!("Status:   {}", status_badge(doc.status()));
    println!("Uploaded: {}", doc.uploaded_at().format("%Y-%m-%d %H:%M:%S UTC"));
    if !doc.image_url().is_empty() {
        println!("Source:   {}", doc.image_url());
    }
}

fn print_field(doc: &DocumentData, field: &ExtractedField, boxes: bool) {
    let level = match field.confidence_level() {
        ConfidenceLevel::High => style(field.confidence_level().display()).green(),
        ConfidenceLevel::Medium => style(field.confidence_level().display()).yellow(),
        ConfidenceLevel::Low => style(field.confidence_level().display()).red(),
        ConfidenceLevel::Manual => style(field.confidence_level().display()).blue(),
    };

    println!(
        "  {:<20} {:<20} {:<28} {:>3}% {}",
        field.id(),
        field.label(),
        field.effective_value(),
        field.confidence_percent(),
        level
    );

    if field.user_correction().is_some() {
        println!("    extracted: {}", field.extracted_value());
    }
    if let Some(warning) = field.validation_warning() {
        println!("    {} {}", style("⚠").yellow(), warning);
    }
    if field.needs_review() && doc.has_repeated_label(field.id()) {
        println!(
            "    {} label repeats; 'correct --all' updates every \"{}\"",
            style("ℹ").blue(),
            field.label()
        );
    }
    if boxes {
        if let Some(vertices) = field.bounding_box() {
            let points: Vec<String> = vertices
                .iter()
                .map(|v| format!("({:.3}, {:.3})", v.x, v.y))
                .collect();
            println!("    box: {}", points.join(" "));
        }
    }
}

pub fn select(args: SelectArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    if !session.select(&args.id) {
        anyhow::bail!(
            "Document {} is not in the current view (filter: {})",
            args.id,
            session.view().filter()
        );
    }
    ctx.save_session(&session)?;

    println!("{} Selected {}", style("✓").green(), args.id);
    Ok(())
}

pub fn next(ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    match session.next() {
        Navigation::Moved(id) => {
            ctx.save_session(&session)?;
            let name = session.document(&id).map(|d| d.file_name()).unwrap_or_default();
            println!("{} Selected {} ({})", style("✓").green(), id, name);
        }
        Navigation::EndOfList => {
            println!(
                "{} Already at the last document in the current view",
                style("ℹ").blue()
            );
        }
        Navigation::NoSelection => {
            println!("{} No document selected", style("ℹ").blue());
        }
    }

    Ok(())
}
