//! CLI demo entry point.
//!
//! # Responsibility
//! - Seed the Techie demo data into a SQLite store and print the answers of
//!   the magazine aggregation queries.
//! - Reuse the seeded data when pointed at a database that already holds it.

use clap::Parser;
use pressdesk_core::db::{open_db, open_db_in_memory};
use pressdesk_core::{
    core_version, default_log_level, init_logging, Author, Magazine, PublishingResult,
    PublishingService, PublishingStore, QueryOutcome, ServiceConfig, SqliteStore,
    DEFAULT_CONTRIBUTING_THRESHOLD,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const DEMO_MAGAZINE: (&str, &str) = ("Techie", "Technology");
const DEMO_AUTHORS: [&str; 3] = ["Alice Smith", "Bob Johnson", "Charlie Brown"];
/// `(index into DEMO_AUTHORS, title)`
const DEMO_ARTICLES: [(usize, &str); 5] = [
    (0, "Latest Tech Trends"),
    (0, "AI in the Future"),
    (0, "The Rise of Quantum Computing"),
    (1, "Gadgets of Tomorrow"),
    (1, "Innovations in Robotics"),
];

#[derive(Parser, Debug)]
#[command(
    name = "pressdesk",
    about = "Seed a demo magazine and print its contributor queries",
    version
)]
struct Args {
    #[arg(
        value_name = "DB_PATH",
        help = "SQLite database file; an in-memory database is used when omitted"
    )]
    db_path: Option<PathBuf>,

    #[arg(
        long,
        env = "PRESSDESK_LOG_DIR",
        value_name = "DIR",
        help = "Absolute directory for rotating log files; logging is off when unset"
    )]
    log_dir: Option<String>,

    #[arg(
        long,
        env = "PRESSDESK_LOG_LEVEL",
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error; defaults by build mode"
    )]
    log_level: Option<String>,

    #[arg(
        long,
        env = "PRESSDESK_THRESHOLD",
        value_name = "N",
        default_value_t = DEFAULT_CONTRIBUTING_THRESHOLD,
        help = "Article count a contributing author must exceed"
    )]
    contributing_threshold: usize,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pressdesk: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = match &args.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let config = ServiceConfig {
        contributing_threshold: args.contributing_threshold,
    };
    let service = PublishingService::with_config(SqliteStore::try_new(&conn)?, config);

    println!("pressdesk_core version={}", core_version());

    let techie = demo_magazine(&service)?;

    println!("Article titles in {}:", techie.name());
    match service.article_titles(&techie)? {
        QueryOutcome::Empty => println!("  No articles found."),
        QueryOutcome::Found(titles) => titles.iter().for_each(|title| println!("  {title}")),
    }

    println!("Contributors:");
    print_authors(&service.contributors(&techie)?, "No contributors found.");

    println!(
        "Contributing authors (more than {} articles):",
        service.config().contributing_threshold
    );
    print_authors(
        &service.contributing_authors(&techie)?,
        "No authors above the threshold.",
    );

    Ok(())
}

/// Returns the stored demo magazine, seeding it and its articles first when
/// the database does not hold it yet.
fn demo_magazine<S: PublishingStore>(
    service: &PublishingService<S>,
) -> PublishingResult<Magazine> {
    let (name, category) = DEMO_MAGAZINE;
    if let Some(existing) = service
        .list_magazines()?
        .into_iter()
        .find(|magazine| magazine.name() == name)
    {
        return Ok(existing);
    }

    let techie = service.create_magazine(name, category)?;
    let authors = DEMO_AUTHORS
        .iter()
        .map(|author| service.create_author(*author))
        .collect::<PublishingResult<Vec<_>>>()?;
    for (author_index, title) in DEMO_ARTICLES {
        service.create_article(&authors[author_index], &techie, title)?;
    }
    Ok(techie)
}

fn print_authors(outcome: &QueryOutcome<Author>, empty_message: &str) {
    if outcome.is_empty() {
        println!("  {empty_message}");
    }
    for author in outcome.items() {
        println!("  {}", author.name());
    }
}
