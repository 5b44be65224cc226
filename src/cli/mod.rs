// CLI module for operations that run next to the server rather than over HTTP

pub mod bootstrap;
pub mod migrate;

use clap::{Parser, Subcommand};

/// AIMS incident-management backend
#[derive(Parser, Debug)]
#[command(name = "aims-backend")]
#[command(about = "Incident-management API backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run pending migrations, then serve HTTP (default)
    Serve,

    /// Run pending migrations and exit
    Migrate,

    /// Create the first admin account and their team
    Bootstrap {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// Created when no team of this name exists yet
        #[arg(long)]
        team: String,

        /// Generated and printed once when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
