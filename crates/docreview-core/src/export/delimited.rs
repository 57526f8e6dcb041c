//! Delimited-text (CSV) export.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::Result;
use crate::models::document::DocumentData;

/// Distinct labels across all documents, in first-seen order.
pub fn label_union(docs: &[&DocumentData]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for field in docs.iter().flat_map(|d| d.fields()) {
        if !labels.iter().any(|l| l == field.label()) {
            labels.push(field.label().to_string());
        }
    }
    labels
}

/// Render documents as CSV.
///
/// Header: `fileName,docType,<labels...>`. In data rows `fileName` and
/// `docType` are quoted only when needed; every label value is quoted with
/// embedded quotes doubled, and a document lacking a label gets `""`. Rows
/// are joined with LF.
pub fn to_delimited(docs: &[&DocumentData]) -> Result<String> {
    let labels = label_union(docs);

    let mut lines = Vec::with_capacity(docs.len() + 1);
    lines.push(line(
        QuoteStyle::Necessary,
        ["fileName", "docType"]
            .into_iter()
            .chain(labels.iter().map(String::as_str)),
    )?);

    for doc in docs {
        let mut row = line(
            QuoteStyle::Necessary,
            [doc.file_name(), doc.doc_type().as_str()],
        )?;
        if !labels.is_empty() {
            let values = labels.iter().map(|label| {
                // A repeated label exports the value of its last field.
                doc.fields()
                    .iter()
                    .rev()
                    .find(|f| f.label() == label)
                    .map(|f| f.effective_value())
                    .unwrap_or("")
            });
            row.push(',');
            row.push_str(&line(QuoteStyle::Always, values)?);
        }
        lines.push(row);
    }

    Ok(lines.join("\n"))
}

/// Write one record with the given quoting, without its terminator.
fn line<'a>(style: QuoteStyle, record: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    writer.write_record(record)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_suffix('\n').unwrap_or(&text).to_string())
}
