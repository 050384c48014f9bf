use std::io::{self, Write};
use std::path::Path;

use tsefeed_core::{save_csv, write_csv, Envelope, EnvelopeMeta, Table};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
    meta: EnvelopeMeta,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match (format, &result.table) {
        (OutputFormat::Csv, Some(table)) => write_csv(table, &mut out)?,
        (OutputFormat::Table, Some(table)) => write_text_table(table, &mut out)?,
        (OutputFormat::Json, _) => {
            let envelope = Envelope::success(meta, &result.data);
            let payload = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        (_, None) => writeln!(out, "{}", serde_json::to_string_pretty(&result.data)?)?,
    }
    Ok(())
}

pub fn export(result: &CommandResult, path: &Path) -> Result<(), CliError> {
    match &result.table {
        Some(table) => Ok(save_csv(table, path)?),
        None => {
            tracing::warn!(path = %path.display(), "command produced no table; nothing exported");
            Ok(())
        }
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Space-aligned columns; numbers right-aligned, text left-aligned.
pub fn write_text_table<W: Write>(table: &Table, mut out: W) -> io::Result<()> {
    let mut header = vec![table.index_name().to_owned()];
    header.extend(table.columns().iter().map(|c| c.key.to_string()));

    let rows: Vec<Vec<String>> = table
        .rows()
        .map(|(key, cells)| {
            let mut line = vec![key.to_string()];
            line.extend(cells.into_iter().map(ToString::to_string));
            line
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|position| {
            rows.iter()
                .map(|row| width(&row[position]))
                .chain(std::iter::once(width(&header[position])))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let pad = |text: &str, position: usize, right: bool| {
        let fill = " ".repeat(widths[position].saturating_sub(width(text)));
        if right {
            format!("{fill}{text}")
        } else {
            format!("{text}{fill}")
        }
    };

    let line: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(position, name)| pad(name, position, position > 0))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())?;

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(position, text)| {
                let numeric = position > 0 && (text.is_empty() || text.parse::<f64>().is_ok());
                pad(text, position, numeric)
            })
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}
