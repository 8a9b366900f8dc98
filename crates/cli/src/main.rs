use anyhow::{Context, Result};
use catalog::{Catalog, Entry, Matcher, Segment};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::CatalogSource;
use pipeline::{FacetFilter, Query, Search, SearchField, Sort, SortKey};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// film-catalog - Film distribution catalogue tools
#[derive(Parser)]
#[command(name = "film-catalog")]
#[command(about = "Merge, search and sort a film distribution catalogue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a raw table (JSON array of rows) and print the catalog document
    Convert {
        /// Path to the table exported from the spreadsheet
        #[arg(long)]
        table: PathBuf,

        /// Snapshot date; defaults to a YYYY-MM-DD in the file name
        #[arg(long)]
        date: Option<String>,
    },

    /// Search, filter and sort a saved catalog
    Search {
        /// Path to a catalog document written by `convert`
        #[arg(short, long)]
        catalog: PathBuf,

        /// Search term (case- and accent-insensitive)
        #[arg(long)]
        term: Option<String>,

        /// Which fields the term is matched against
        #[arg(long, value_enum, default_value = "any")]
        field: FieldArg,

        /// Treat the term as a regular expression
        #[arg(long)]
        regex: bool,

        /// Sort key
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        #[arg(long)]
        certificate: Option<String>,

        #[arg(long)]
        format: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        picture: Option<String>,

        /// Number of results to show
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Print results as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// List the distinct formats, genres, countries and picture types
    Facets {
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Show merge conflicts and per-entry data warnings
    Warnings {
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Title,
    People,
    Any,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => SearchField::Title,
            FieldArg::People => SearchField::People,
            FieldArg::Any => SearchField::Any,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    Certificate,
    Duration,
    Year,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortKey::Title,
            SortArg::Certificate => SortKey::Certificate,
            SortArg::Duration => SortKey::Duration,
            SortArg::Year => SortKey::Year,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { table, date } => handle_convert(&table, date)?,
        Commands::Search {
            catalog,
            term,
            field,
            regex,
            sort,
            desc,
            certificate,
            format,
            genre,
            country,
            picture,
            limit,
            json,
        } => {
            let query = Query {
                sort: sort.map(|key| Sort {
                    key: key.into(),
                    desc,
                }),
                search: term.map(|term| Search {
                    term,
                    field: field.into(),
                    regex,
                }),
                filter: FacetFilter {
                    certificate,
                    format,
                    genre,
                    country,
                    picture,
                },
            };
            handle_search(&load_catalog(&catalog)?, &query, limit, json)?
        }
        Commands::Facets { catalog } => handle_facets(&load_catalog(&catalog)?),
        Commands::Warnings { catalog } => handle_warnings(&load_catalog(&catalog)?),
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let start = Instant::now();
    let source = CatalogSource::load(path)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
    let catalog = Catalog::new(source);
    tracing::info!("Loaded {} entries in {:?}", catalog.len(), start.elapsed());
    Ok(catalog)
}

/// Handle the 'convert' command
fn handle_convert(table: &Path, date: Option<String>) -> Result<()> {
    let source = CatalogSource::load_table(table, date)
        .with_context(|| format!("Failed to read table from {}", table.display()))?;
    println!("{}", source.to_json()?);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, query: &Query, limit: usize, json: bool) -> Result<()> {
    let matcher = match query.active_search() {
        Some(search) if search.regex => Some(Matcher::pattern(&search.term)?),
        Some(search) => Some(Matcher::literal(&search.term)?),
        None => None,
    };

    let results = query.run(catalog);
    let shown: Vec<&Entry> = results.iter().take(limit).copied().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} of {} titles match", results.len(), catalog.len())
            .bold()
            .blue()
    );
    for (rank, entry) in shown.iter().enumerate() {
        print_entry(rank + 1, entry, matcher.as_ref());
    }
    Ok(())
}

fn print_entry(rank: usize, entry: &Entry, matcher: Option<&Matcher>) {
    let years = entry.years();
    let year = if years.source.is_empty() { "????" } else { years.source.as_str() };
    println!(
        "{}. {} ({}) [{}] {}",
        rank.to_string().green(),
        entry.title().bold(),
        year,
        entry.certificate().unwrap_or("-"),
        entry.durations().source
    );
    if !entry.directors().is_empty() {
        println!("   Directed by {}", entry.directors().list.join(", "));
    }
    if !entry.genre().is_empty() || !entry.format().is_empty() {
        println!("   {} | {}", entry.genre().join(", "), entry.format().join(", "));
    }

    // Only show synopsis lines when they help explain a search hit
    if let Some(matcher) = matcher {
        for segments in entry.highlight(Some(matcher), |s| s.bold().yellow().to_string()) {
            if !segments.iter().any(|s| matches!(s, Segment::Marked(_))) {
                continue;
            }
            let line: String = segments
                .into_iter()
                .map(|segment| match segment {
                    Segment::Plain(text) | Segment::Marked(text) => text,
                })
                .collect();
            println!("   {}", line.dimmed());
        }
    }
}

/// Handle the 'facets' command
fn handle_facets(catalog: &Catalog) {
    let facets = catalog.facets();
    println!(
        "{}",
        format!("Catalog {}", catalog.date().unwrap_or("(undated)")).bold().blue()
    );
    for (name, values) in [
        ("Formats", &facets.formats),
        ("Genres", &facets.genres),
        ("Countries", &facets.countries),
        ("Pictures", &facets.pictures),
    ] {
        println!("{}{} ({}):", "• ".green(), name, values.len());
        for value in values {
            println!("    {}", value);
        }
    }
}

/// Handle the 'warnings' command
fn handle_warnings(catalog: &Catalog) {
    println!(
        "{}",
        format!("Merge conflicts: {}", catalog.warnings().len()).bold().blue()
    );
    for warning in catalog.warnings() {
        let title = warning
            .title
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default();
        println!("{}{}", "• ".red(), title);
        for conflict in &warning.fields {
            let show = |cell: &Option<data_loader::Cell>| {
                cell.as_ref()
                    .map(|c| format!("{:?}", c.to_string()))
                    .unwrap_or_else(|| "(empty)".to_string())
            };
            println!(
                "    {}: {} (kept {})",
                conflict.field,
                show(&conflict.incoming),
                show(&conflict.retained)
            );
        }
    }

    let flagged: Vec<&Entry> = catalog
        .entries()
        .iter()
        .filter(|e| !e.warnings().is_empty())
        .collect();
    println!(
        "{}",
        format!("Entries with data warnings: {}", flagged.len()).bold().blue()
    );
    for entry in flagged {
        println!("{}{}: {}", "• ".yellow(), entry.title(), entry.warnings().join("; "));
    }
}
