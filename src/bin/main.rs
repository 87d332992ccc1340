//! shellite CLI - run SQL against a database through the sqlite3 shell
//!
//! Usage:
//!   shellite exec <database> <sql> [--raw] [--timeout-ms <ms>]
//!   shellite tables <database>
//!   shellite schema <database> <table>
//!
//! Examples:
//!   shellite exec app.db "SELECT * FROM users"
//!   shellite exec :memory: "SELECT 1+1"
//!   shellite tables app.db
//!   shellite schema app.db users

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shellite::config::Settings;
use shellite::db::Database;
use shellite::shell::{DecodeMode, QueryOutput, SessionConfig};

#[derive(Parser)]
#[command(name = "shellite")]
#[command(about = "Run SQL against a SQLite database through the sqlite3 shell")]
#[command(version)]
struct Cli {
    /// Emit per-command diagnostics
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a SQL statement or dot-command
    Exec {
        /// Database file, or :memory:
        database: String,

        /// The statement to run
        sql: String,

        /// Return the response as raw text instead of decoding JSON rows
        #[arg(long)]
        raw: bool,

        /// Response timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List user tables
    Tables {
        /// Database file, or :memory:
        database: String,
    },

    /// Show column metadata for a table
    Schema {
        /// Database file, or :memory:
        database: String,

        /// Table name
        table: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("shellite=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.debug) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Exec {
            database,
            sql,
            raw,
            timeout_ms,
        } => cmd_exec(database, sql, raw, timeout_ms, config).await,
        Commands::Tables { database } => cmd_tables(database, config).await,
        Commands::Schema { database, table } => cmd_schema(database, table, config).await,
    }
}

fn load_config(debug: bool) -> Result<SessionConfig, shellite::config::SettingsError> {
    let settings = Settings::load()?;
    let mut config = settings.session_config()?;
    if debug {
        config = config.debug(true);
    }
    Ok(config)
}

async fn cmd_exec(
    database: String,
    sql: String,
    raw: bool,
    timeout_ms: Option<u64>,
    mut config: SessionConfig,
) -> ExitCode {
    if let Some(ms) = timeout_ms {
        config = config.timeout(Duration::from_millis(ms));
    }

    let mut db = match Database::open(database, config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if raw {
        db.execute(&sql, DecodeMode::Raw).await
    } else {
        db.sql(&sql).await
    };

    let code = match result {
        Ok(output) => {
            print_output(&output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };

    if let Err(e) = db.close().await {
        eprintln!("Error closing session: {}", e);
        return ExitCode::FAILURE;
    }
    code
}

async fn cmd_tables(database: String, config: SessionConfig) -> ExitCode {
    let mut db = match Database::open(database, config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match db.tables().await {
        Ok(tables) => {
            for table in tables {
                println!("{}", table);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };

    let _ = db.close().await;
    code
}

async fn cmd_schema(database: String, table: String, config: SessionConfig) -> ExitCode {
    let mut db = match Database::open(database, config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match db.columns(&table).await {
        Ok(output) => {
            if output.is_none() {
                eprintln!("No such table: {}", table);
                ExitCode::FAILURE
            } else {
                print_output(&output);
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };

    let _ = db.close().await;
    code
}

fn print_output(output: &QueryOutput) {
    match output {
        QueryOutput::None => eprintln!("(no data)"),
        QueryOutput::Rows(rows) => match serde_json::to_string_pretty(rows) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error formatting rows: {}", e),
        },
        QueryOutput::Text(text) => println!("{}", text),
    }
}
