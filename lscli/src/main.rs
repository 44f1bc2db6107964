//! lscli - interactive shell over an in-memory ListingDB.
//!
//! Commands are read from a REPL or from a script file (one command per line).

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use listingdb::{CatalogConfig, ListingDB, NewProperty, Property, SearchCriteria, SortKey, Status};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lscli", about = "Property listing catalog shell")]
struct Cli {
    /// JSON file with catalog limits
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run commands from a file instead of the interactive prompt
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct Line {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create a listing
    Add {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        price: f64,
        #[arg(long = "type")]
        property_type: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "amenity")]
        amenities: Vec<String>,
    },
    /// Mark a listing Available or Sold
    Status {
        id: String,
        status: String,
        #[arg(long)]
        user: String,
    },
    /// Show one listing
    Get { id: String },
    /// Available listings of an owner, newest first
    Mine {
        #[arg(long)]
        user: String,
    },
    /// Search Available listings
    Search {
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        property_type: Option<String>,
        #[arg(long, default_value = "price")]
        sort: String,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        limit: Option<usize>,
        /// Print data and trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search with a raw JSON criteria document
    Query { json: String },
    Shortlist {
        id: String,
        #[arg(long)]
        user: String,
    },
    Unshortlist {
        id: String,
        #[arg(long)]
        user: String,
    },
    Shortlisted {
        #[arg(long)]
        user: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path).map_err(|e| anyhow!("loading {}: {}", path.display(), e))?,
        None => CatalogConfig::default(),
    };
    let db = ListingDB::with_config(config);

    match cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                println!("{} {}", ">".dimmed(), line);
                if let Err(e) = run_line(&db, line) {
                    eprintln!("{} {}", "error:".red().bold(), e);
                }
            }
            Ok(())
        }
        None => repl(&db),
    }
}

fn repl(db: &ListingDB) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("{}", "lscli - type `help` for commands, `exit` to quit".cyan());
    loop {
        match rl.readline("listings> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if line == "exit" || line == "quit" {
                    break;
                }
                if let Err(e) = run_line(db, line) {
                    eprintln!("{} {}", "error:".red().bold(), e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn run_line(db: &ListingDB, line: &str) -> Result<()> {
    let words = shell_words::split(line)?;
    let parsed = match Line::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // help and usage errors are printed by clap itself
            e.print()?;
            return Ok(());
        }
    };

    match parsed.cmd {
        Cmd::Add { owner, location, price, property_type, description, amenities } => {
            let details = NewProperty { location, price, property_type, description, amenities };
            let p = db.properties().add(&owner, details)?;
            println!("{} {}", "created".green(), p.id.bold());
        }
        Cmd::Status { id, status, user } => {
            let status: Status = status.parse()?;
            db.properties().set_status(&id, status, &user)?;
            println!("{} {} -> {}", "updated".green(), id.bold(), status);
        }
        Cmd::Get { id } => match db.properties().get(&id) {
            Some(p) => println!("{}", serde_json::to_string_pretty(&p)?),
            None => println!("{}", "not found".yellow()),
        },
        Cmd::Mine { user } => print_table(&db.properties().owned_by(&user)),
        Cmd::Search { min, max, location, property_type, sort, desc, page, limit, json } => {
            let criteria = SearchCriteria {
                min_price: min,
                max_price: max,
                location,
                property_type,
                status: Status::Available,
                sort_key: sort.parse::<SortKey>()?,
                descending: desc,
                page,
                limit,
            };
            let outcome = db.search_with(&criteria)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.to_json_response())?);
            } else {
                print_table(&outcome.data);
                println!("{}", format!("{} result(s) in {} us", outcome.data.len(), outcome.trace.total_us).dimmed());
            }
        }
        Cmd::Query { json } => {
            let criteria: SearchCriteria = serde_json::from_str(&json)?;
            let outcome = db.search_with(&criteria)?;
            println!("{}", serde_json::to_string_pretty(&outcome.to_json_response())?);
        }
        Cmd::Shortlist { id, user } => {
            db.shortlists().add(&user, &id)?;
            println!("{} {}", "shortlisted".green(), id.bold());
        }
        Cmd::Unshortlist { id, user } => {
            db.shortlists().remove(&user, &id)?;
            println!("{} {}", "removed".green(), id.bold());
        }
        Cmd::Shortlisted { user } => print_table(&db.shortlists().list(&user)),
    }
    Ok(())
}

fn print_table(props: &[Property]) {
    if props.is_empty() {
        println!("{}", "(none)".dimmed());
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["id", "owner", "location", "price", "type", "status", "listed", "amenities"]);
    for p in props {
        table.add_row(vec![
            p.id.clone(),
            p.owner_id.clone(),
            p.location.clone(),
            format!("{:.2}", p.price),
            p.property_type.clone(),
            p.status.to_string(),
            p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            p.amenities.join(", "),
        ]);
    }
    println!("{table}");
}
