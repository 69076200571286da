//! CLI interface for unidb.

pub mod output;

use crate::core::catalogue::{self, ExerciseReport, EXERCISES};
use crate::core::config::{StoreConfig, DEFAULT_DB_FILE};
use crate::core::db::Db;
use crate::core::error::{Result, UniError};
use crate::core::seed;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// unidb - university schema and query catalogue on SQLite
#[derive(Parser, Debug)]
#[command(name = "unidb", version)]
#[command(about = "Create a small university database and run example queries against it", long_about = None)]
struct Cli {
    /// Path of the database file
    #[arg(long, global = true, env = "UNIDB_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Enforce declared foreign keys
    #[arg(long, global = true, env = "UNIDB_ENFORCE_FOREIGN_KEYS")]
    enforce_foreign_keys: bool,

    /// Print result rows as JSON objects
    #[arg(long, global = true, env = "UNIDB_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recreate the database, load the seed rows and show the basics
    Setup,

    /// Run the exercise catalogue against an existing database
    Exercises,

    /// Run a single read query
    Query {
        /// Query name (see `unidb list`)
        name: String,
    },

    /// List the available read queries
    List,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.db).with_foreign_keys(self.enforce_foreign_keys)
    }
}

/// Create the store from scratch and print the basic queries.
fn setup(config: &StoreConfig, json: bool) -> Result<()> {
    let mut db = Db::create(config)?;
    db.init_schema()?;
    seed::insert_seed_data(&mut db)?;

    for section in catalogue::basics(&db)? {
        output::print_section(&section, json)?;
    }

    db.close()?;
    println!();
    println!("Created {}", config.path().display());
    Ok(())
}

fn run_exercises(db: &mut Db, json: bool) -> Result<()> {
    for (i, exercise) in EXERCISES.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Running {} Solutions...", exercise.label());

        match exercise.run(db)? {
            ExerciseReport::Read(sections) => {
                for section in &sections {
                    output::print_section(section, json)?;
                }
            }
            ExerciseReport::Write(Ok(outcomes)) => output::print_write_outcomes(&outcomes, json)?,
            // Already rolled back; carry on with the next exercise
            ExerciseReport::Write(Err(e)) => println!("An error occurred: {}", e),
        }
    }
    Ok(())
}

/// Run the exercise catalogue.
///
/// A read failure ends the catalogue early. The connection is closed
/// before the failure is reported.
fn exercises(config: &StoreConfig, json: bool) -> Result<()> {
    let mut db = Db::open(config)?;
    let outcome = run_exercises(&mut db, json);
    db.close()?;

    match outcome {
        Err(e) if e.is_storage() => {
            println!("An error occurred: {}", e);
            Ok(())
        }
        other => other,
    }
}

fn query(config: &StoreConfig, name: &str, json: bool) -> Result<()> {
    let query = catalogue::find_query(name)?;
    let db = Db::open(config)?;
    let section = query.run(&db)?;
    db.close()?;
    output::print_section(&section, json)
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.store_config();

    let result = match &cli.command {
        Command::Setup => setup(&config, cli.json),
        Command::Exercises => exercises(&config, cli.json),
        Command::Query { name } => query(&config, name, cli.json),
        Command::List => {
            output::format_query_list(catalogue::QUERIES);
            Ok(())
        }
    };

    match result {
        // A missing store is a user mistake, not a failure
        Err(e @ UniError::StorageUnavailable(_)) => {
            eprintln!("Error: {}", e);
            Ok(())
        }
        other => other,
    }
}
