use std::path::{Path, PathBuf};

mod list;
mod show;
mod terminal;

use casebook::{transfer, Config, Draft, LoadError, RecordId, Slot, Store};
use chrono::Utc;
use clap::ArgAction;
use list::List;
use show::Show;
use terminal::Colorize;
use tracing::instrument;

/// File name of the catalog configuration inside the root directory.
const CONFIG_FILE: &str = "casebook.toml";

/// Parse a record id from a string.
///
/// This is a CLI boundary function; any string is a syntactically valid
/// id, so this cannot fail.
#[allow(clippy::unnecessary_wraps)]
fn parse_record_id(s: &str) -> Result<RecordId, String> {
    Ok(RecordId::from(s))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the catalog root directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show catalog totals (default)
    Status(Status),

    /// Add a new design case
    Add(Add),

    /// List cases with optional category and tag filters
    List(List),

    /// Show the full detail of a case
    Show(Show),

    /// Edit a case, replacing its fields
    Edit(Edit),

    /// Delete a case
    Delete(Delete),

    /// Export the catalog to a portable JSON file
    Export(Export),

    /// Import a catalog file, replacing the current collection
    Import(Import),

    /// List suggested and in-use categories
    Categories(Categories),

    /// List all tags in use
    Tags(Tags),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(&root)?,
            Self::Add(command) => command.run(&root)?,
            Self::List(command) => command.run(&root)?,
            Self::Show(command) => command.run(&root)?,
            Self::Edit(command) => command.run(&root)?,
            Self::Delete(command) => command.run(&root)?,
            Self::Export(command) => command.run(&root)?,
            Self::Import(command) => command.run(&root)?,
            Self::Categories(command) => command.run(&root)?,
            Self::Tags(command) => command.run(&root)?,
        }
        Ok(())
    }
}

/// Opens the store for the given root.
///
/// A corrupt storage slot is reported as a warning and the command
/// proceeds with an empty catalog; the unreadable file stays on disk until
/// the next mutation overwrites it.
fn open_store(root: &Path) -> anyhow::Result<Store> {
    let slot = Slot::in_dir(root);
    match Store::open(slot.clone()) {
        Ok(store) => Ok(store),
        Err(error @ LoadError::Corrupt { .. }) => {
            eprintln!(
                "{}",
                format!("⚠️  {error}; continuing with an empty catalog").warning()
            );
            Ok(Store::empty(slot))
        }
        Err(error) => Err(error.into()),
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[derive(Debug, Default, clap::Parser)]
pub struct Status {}

impl Status {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root)?;

        println!("Cases:      {}", store.len());
        println!("Categories: {}", store.categories().len());
        println!("Tags:       {}", store.tags().len());

        if store.is_empty() {
            println!();
            println!(
                "{}",
                "The catalog is empty. Add your first case with 'casebook add <TITLE>'".dim()
            );
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The title of the case
    title: String,

    /// The category. Defaults to the first suggested category.
    #[clap(long, short)]
    category: Option<String>,

    /// Tags (comma separated)
    #[clap(long, short, value_delimiter = ',')]
    tags: Vec<String>,

    /// A description of the case
    #[clap(long, short)]
    description: Option<String>,

    /// Link to the reference imagery
    #[clap(long)]
    image_url: Option<String>,

    /// Link to the original source
    #[clap(long)]
    source_url: Option<String>,

    /// Personal notes
    #[clap(long, short)]
    notes: Option<String>,

    /// Rating from 0 to 5
    #[clap(long, short, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    rating: u8,

    /// A learning point (repeatable)
    #[clap(long = "point", short)]
    points: Vec<String>,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let category = self
            .category
            .unwrap_or_else(|| config.default_category().to_string());

        if !config.is_suggested(&category) {
            println!(
                "{}",
                format!("Note: '{category}' is not in the suggested category set").info()
            );
        }

        let draft = Draft {
            title: self.title,
            category,
            tags: self.tags,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            source_url: self.source_url.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            rating: self.rating,
            learning_points: self.points,
        };

        let mut store = open_store(root)?;
        let record = store.create(draft)?;

        println!(
            "{}",
            format!("✅ Added case '{}' ({})", record.title, record.id).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The id of the case to edit
    #[clap(value_parser = parse_record_id)]
    id: RecordId,

    /// New title
    #[clap(long, short)]
    title: Option<String>,

    /// New category
    #[clap(long, short)]
    category: Option<String>,

    /// New tags, replacing the current ones (comma separated)
    #[clap(long, short, value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// New description
    #[clap(long, short)]
    description: Option<String>,

    /// New imagery link
    #[clap(long)]
    image_url: Option<String>,

    /// New source link
    #[clap(long)]
    source_url: Option<String>,

    /// New personal notes
    #[clap(long, short)]
    notes: Option<String>,

    /// New rating from 0 to 5
    #[clap(long, short, value_parser = clap::value_parser!(u8).range(0..=5))]
    rating: Option<u8>,

    /// New learning points, replacing the current ones (repeatable)
    #[clap(long = "point", short)]
    points: Option<Vec<String>>,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root)?;

        // Pre-fill from the current record, then apply the given flags, so
        // the store's whole-record replace keeps the untouched fields.
        let Some(record) = store.find(&self.id) else {
            anyhow::bail!("Case {} not found", self.id);
        };
        let mut draft = record.draft();

        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
        if let Some(source_url) = self.source_url {
            draft.source_url = source_url;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(points) = self.points {
            draft.learning_points = points;
        }

        let updated = store.update(&self.id, draft)?;

        println!(
            "{}",
            format!("✅ Updated case '{}' ({})", updated.title, updated.id).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the case to delete
    #[clap(value_parser = parse_record_id)]
    id: RecordId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root)?;

        let Some(record) = store.find(&self.id) else {
            println!("Nothing to delete: no case with id {}", self.id);
            return Ok(());
        };

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete case '{}'?", record.title))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        store.delete(&self.id)?;

        println!("{}", format!("✅ Deleted case {}", self.id).success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Export {
    /// Where to write the export file. Defaults to a dated file name in
    /// the current directory.
    #[clap(long, short)]
    output: Option<PathBuf>,
}

impl Export {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let store = open_store(root)?;
        let payload = transfer::export_blob(store.list())?;

        let path = self.output.unwrap_or_else(|| {
            PathBuf::from(transfer::export_file_name(Utc::now().date_naive()))
        });

        std::fs::write(&path, payload)
            .with_context(|| format!("failed to write export file {}", path.display()))?;

        println!(
            "{}",
            format!("✅ Exported {} cases to {}", store.len(), path.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Import {
    /// The catalog file to import
    file: PathBuf,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Import {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let payload = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read import file {}", self.file.display()))?;

        // Parse before touching the store, so a malformed payload leaves
        // the current collection untouched.
        let records = transfer::import_blob(&payload)?;

        let mut store = open_store(root)?;

        if !store.is_empty() && !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Replace the {} existing cases with {} imported ones?",
                    store.len(),
                    records.len()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        let count = records.len();
        store.replace_all(records)?;

        println!(
            "{}",
            format!("✅ Imported {count} cases from {}", self.file.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Categories {}

impl Categories {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let store = open_store(root)?;

        println!("Suggested categories:");
        for category in config.categories() {
            let count = store
                .list()
                .iter()
                .filter(|r| &r.category == category)
                .count();
            if count == 0 {
                println!("  {category}");
            } else {
                println!("  {category} {}", format!("({count})").dim());
            }
        }

        let unlisted: Vec<_> = store
            .categories()
            .into_iter()
            .filter(|c| !config.is_suggested(c))
            .collect();
        if !unlisted.is_empty() {
            println!();
            println!("Also in use:");
            for category in unlisted {
                let count = store
                    .list()
                    .iter()
                    .filter(|r| r.category == category)
                    .count();
                println!("  {category} {}", format!("({count})").dim());
            }
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Tags {}

impl Tags {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root)?;

        if store.tags().is_empty() {
            println!("No tags in use.");
            return Ok(());
        }

        for tag in store.tags() {
            let count = store
                .list()
                .iter()
                .filter(|r| r.tags.iter().any(|t| t == tag))
                .count();
            println!("{tag} {}", format!("({count})").dim());
        }

        Ok(())
    }
}
