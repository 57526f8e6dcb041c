//! Queue command - list documents grouped by type.

use clap::Args;
use console::style;

use docreview_core::collection::group_by_type;
use docreview_core::TypeFilter;

use super::{status_badge, Context};

/// Arguments for the queue command.
#[derive(Args)]
pub struct QueueArgs {
    /// Filter by document type (all, invoice, bol, receipt, unknown)
    #[arg(short, long)]
    filter: Option<TypeFilter>,
}

pub fn run(args: QueueArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config)?;

    if let Some(filter) = args.filter {
        session.set_filter(filter);
        ctx.save_session(&session)?;
    }

    if session.documents().is_empty() {
        println!(
            "{} No documents yet. Run 'docreview ingest <files>' to add some.",
            style("ℹ").blue()
        );
        return Ok(());
    }

    let progress = session.progress();
    if progress.pending() > 0 {
        println!(
            "{} Processing {}/{} ({:.0}%)",
            style("ℹ").blue(),
            progress.processed,
            progress.total,
            progress.percent()
        );
    }

    let counts = session.counts();
    let active = session.view().filter();
    let options: Vec<String> = counts
        .filters()
        .into_iter()
        .map(|f| {
            let option = format!("{} ({})", f.to_string().to_uppercase(), counts.get(f));
            if f == active {
                style(option).bold().underlined().to_string()
            } else {
                option
            }
        })
        .collect();
    println!("Filter: {}", options.join("  "));

    let statuses: Vec<String> = session
        .status_summary()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| format!("{} {}", status_badge(status), count))
        .collect();
    println!("Status: {}", statuses.join("  "));

    let selected = session.view().selected();
    for (doc_type, docs) in group_by_type(session.documents()) {
        if active != TypeFilter::All && active != TypeFilter::Only(doc_type) {
            continue;
        }

        println!();
        println!("{} ({})", style(doc_type.as_str()).bold(), docs.len());
        for doc in docs {
            let marker = if Some(doc.id()) == selected { ">" } else { " " };
            println!(
                "{} {:<8} {:<32} {}",
                marker,
                doc.id(),
                doc.file_name(),
                status_badge(doc.status())
            );
        }
    }

    if session.visible().is_empty() {
        println!();
        println!(
            "{} No documents match filter {}",
            style("ℹ").blue(),
            active
        );
    }

    Ok(())
}
