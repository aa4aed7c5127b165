use std::path::Path;

use casebook::{Record, RecordId};
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display the full detail of a design case")]
pub struct Show {
    /// The id of the case to display
    #[clap(value_parser = super::parse_record_id)]
    id: RecordId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = super::open_store(root)?;

        let Some(record) = store.find(&self.id) else {
            anyhow::bail!("Case {} not found", self.id);
        };

        match self.output {
            OutputFormat::Pretty => {
                Self::output_pretty(record);
                Ok(())
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(record)?);
                Ok(())
            }
        }
    }

    fn output_pretty(record: &Record) {
        println!("{}", record.title);
        println!("{}", "─".repeat(40).dim());
        println!("{} {}", "Id:      ".dim(), record.id);
        println!("{} {}", "Category:".dim(), record.category);
        println!("{} {}", "Date:    ".dim(), record.date);
        println!("{} {}", "Rating:  ".dim(), super::stars(record.rating));

        if !record.tags.is_empty() {
            println!("{} {}", "Tags:    ".dim(), record.tags.join(", "));
        }
        if !record.image_url.is_empty() {
            println!("{} {}", "Image:   ".dim(), record.image_url);
        }
        if !record.source_url.is_empty() {
            println!("{} {}", "Source:  ".dim(), record.source_url);
        }

        if !record.description.is_empty() {
            println!();
            println!("{}", "Description".info());
            println!("{}", record.description);
        }

        let points: Vec<_> = record
            .learning_points
            .iter()
            .filter(|p| !p.is_empty())
            .collect();
        if !points.is_empty() {
            println!();
            println!("{}", "Learning points".info());
            for point in points {
                println!("  • {point}");
            }
        }

        if !record.notes.is_empty() {
            println!();
            println!("{}", "Notes".info());
            println!("{}", record.notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use casebook::{Draft, Slot, Store};

    #[test]
    fn show_run_displays_an_existing_case() {
        let tmp = tempdir().unwrap();
        let mut store = Store::open(Slot::in_dir(tmp.path())).unwrap();
        let record = store
            .create(Draft {
                title: "Card UI".to_string(),
                category: "UI设计".to_string(),
                learning_points: vec!["Whitespace".to_string(), String::new()],
                ..Draft::default()
            })
            .unwrap();

        let show = Show {
            id: record.id,
            output: OutputFormat::Pretty,
        };
        show.run(tmp.path()).expect("show command should succeed");
    }

    #[test]
    fn show_run_fails_for_unknown_id() {
        let tmp = tempdir().unwrap();

        let show = Show {
            id: RecordId::from("missing"),
            output: OutputFormat::Json,
        };
        assert!(show.run(tmp.path()).is_err());
    }
}
