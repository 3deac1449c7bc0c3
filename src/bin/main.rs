//! sqlmorph CLI - Render JSON expression trees to dialect SQL
//!
//! Usage:
//!   sqlmorph render <expr.json> [--dialect <dialect>] [--format sql|json]
//!   sqlmorph features [--dialect <dialect>]
//!
//! Examples:
//!   sqlmorph render filter.json --dialect mysql
//!   sqlmorph render stats.json --dialect sqlite --format json
//!   RUST_LOG=sqlmorph=debug sqlmorph render stats.json --dialect firebird

use clap::{Parser, Subcommand, ValueEnum};
use sqlmorph::capability::{self, CapabilityRegistry};
use sqlmorph::config::Settings;
use sqlmorph::dialect::Dialect;
use sqlmorph::expr::Expr;
use sqlmorph::render::Renderer;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sqlmorph")]
#[command(about = "sqlmorph - Render dialect-neutral SQL expressions with feature emulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an expression tree to SQL
    Render {
        /// Path to the expression JSON file
        file: PathBuf,

        /// SQL dialect to generate
        #[arg(short, long, default_value = "postgres")]
        dialect: DialectArg,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        format: OutputFormat,
    },

    /// List the features a dialect renders natively
    Features {
        /// SQL dialect to inspect
        #[arg(short, long, default_value = "postgres")]
        dialect: DialectArg,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
    Bigquery,
    Snowflake,
    Databricks,
    Redshift,
    Sqlite,
    H2,
    Hsqldb,
    Firebird,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Bigquery => Dialect::BigQuery,
            DialectArg::Snowflake => Dialect::Snowflake,
            DialectArg::Databricks => Dialect::Databricks,
            DialectArg::Redshift => Dialect::Redshift,
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::H2 => Dialect::H2,
            DialectArg::Hsqldb => Dialect::Hsqldb,
            DialectArg::Firebird => Dialect::Firebird,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// SQL text, then one bind per line
    Sql,
    /// `{ "sql": ..., "binds": [...] }`
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match CapabilityRegistry::from_settings(&settings) {
        Ok(registry) => {
            // Nothing can have read the global registry yet
            let _ = capability::install(registry);
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match cli.command {
        Commands::Render {
            file,
            dialect,
            format,
        } => cmd_render(file, dialect.into(), format, &settings),
        Commands::Features { dialect } => cmd_features(dialect.into()),
    }
}

fn cmd_render(file: PathBuf, dialect: Dialect, format: OutputFormat, settings: &Settings) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let expr: Expr = match serde_json::from_str(&source) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("Error parsing expression: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = expr.validate() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let renderer = Renderer::new(dialect).with_settings(settings.render.clone());
    let rendered = match renderer.render(&expr) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Render error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Sql => {
            println!("{}", rendered.sql);
            for (i, bind) in rendered.binds.iter().enumerate() {
                let value = serde_json::to_string(&bind.value).unwrap_or_default();
                println!("-- ${}: {} ({:?})", i + 1, value, bind.ty);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&rendered) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing JSON: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_features(dialect: Dialect) -> ExitCode {
    println!("Dialect: {}", dialect);
    println!();
    for feature in capability::global().features(dialect) {
        println!("  {}", feature);
    }
    ExitCode::SUCCESS
}
