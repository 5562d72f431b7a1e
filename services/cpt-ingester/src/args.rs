//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storage::ConnectionParams;

#[derive(Parser, Debug)]
#[command(name = "cpt-ingester")]
#[command(about = "Extract CPT metadata from GEF files and store it per owner")]
pub struct Cli {
    #[command(flatten)]
    pub db: DbArgs,

    /// Log level
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the CPT table if it does not exist
    Init,

    /// Extract metadata and print it as JSON, without touching the database
    Inspect {
        /// GEF files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Extract metadata and store it together with the raw files
    Ingest {
        /// Owner the files are stored under
        #[arg(short, long)]
        owner: String,

        /// GEF files to store
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print all metadata stored for an owner
    List {
        /// Owner to list
        #[arg(short, long)]
        owner: String,
    },
}

/// Database connection arguments.
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long = "db-host", global = true, default_value = "localhost", env = "CPT_DB_HOST")]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", global = true, default_value_t = 5432, env = "CPT_DB_PORT")]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", global = true, default_value = "postgres", env = "CPT_DB_USER")]
    pub user: String,

    /// Database password
    #[arg(
        long = "db-password",
        global = true,
        default_value = "postgres",
        env = "CPT_DB_PASSWORD",
        hide_env_values = true
    )]
    pub password: String,

    /// Database name
    #[arg(long = "db-name", global = true, default_value = "cpt", env = "CPT_DB_NAME")]
    pub name: String,

    /// Seconds to wait for the database connection
    #[arg(
        long = "db-connect-timeout",
        global = true,
        default_value_t = 10,
        env = "CPT_DB_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Database schema to work in (default: the server's search path)
    #[arg(long = "db-schema", global = true, env = "CPT_DB_SCHEMA")]
    pub schema: Option<String>,
}

impl From<&DbArgs> for ConnectionParams {
    fn from(args: &DbArgs) -> Self {
        Self {
            username: args.user.clone(),
            password: args.password.clone(),
            host: args.host.clone(),
            port: args.port,
            database: args.name.clone(),
            connect_timeout_secs: args.connect_timeout,
            schema: args.schema.clone(),
        }
    }
}
