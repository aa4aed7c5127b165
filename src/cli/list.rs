use std::path::Path;

use anyhow::Context;
use casebook::{Filter, Record};
use clap::{Parser, ValueEnum};
use tracing::instrument;

/// Command arguments for `casebook list`.
#[derive(Debug, Parser)]
#[command(about = "List design cases with optional filters")]
pub struct List {
    /// Keep only cases in this category ('all' for no filter).
    #[arg(long, short)]
    category: Option<String>,

    /// Keep only cases carrying this tag ('all' for no filter).
    #[arg(long, short)]
    tag: Option<String>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = super::open_store(root)?;

        let filter = Filter {
            category: self.category,
            tag: self.tag,
        };
        let records = store.filter(&filter);

        if records.is_empty() {
            if !self.quiet {
                if filter == Filter::default() {
                    println!("The catalog is empty.");
                } else {
                    println!("No cases matched the given filters.");
                }
            }
            return Ok(());
        }

        match self.output {
            OutputFormat::Table => {
                render_table(&records, self.quiet);
                Ok(())
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &records)
                    .context("failed to render json output")?;
                println!();
                Ok(())
            }
        }
    }
}

fn render_table(records: &[&Record], quiet: bool) {
    if quiet {
        for record in records {
            println!("{}\t{}", record.id, record.title);
        }
        return;
    }

    let headers = ["ID", "TITLE", "CATEGORY", "RATING", "DATE", "TAGS"];
    let data: Vec<[String; 6]> = records
        .iter()
        .map(|record| {
            [
                record.id.to_string(),
                record.title.clone(),
                record.category.clone(),
                super::stars(record.rating),
                record.date.to_string(),
                record.tags.join(", "),
            ]
        })
        .collect();

    // Determine column widths for alignment.
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in data {
        for (value, width) in row.iter().zip(&widths) {
            let pad = width.saturating_sub(value.chars().count());
            print!("{value}{}  ", " ".repeat(pad));
        }
        println!();
    }
}
