//! Command-line interface. With no subcommand the web server starts.

mod commands;

use clap::{Parser, Subcommand};

/// Larder - share, browse and like recipes
#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Load the sample admin, categories, countries and recipes
    Seed,

    /// Create an account from the command line
    CreateUser {
        username: String,

        #[arg(long)]
        email: Option<String>,

        /// Grant staff rights (may edit and delete anything)
        #[arg(long)]
        staff: bool,

        #[arg(long, env = "LARDER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

pub use commands::*;
