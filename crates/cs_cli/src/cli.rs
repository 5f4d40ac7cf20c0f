use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cs_cli")]
#[command(about = "camlsync client; run without a command to sync")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the client configuration and hidden directory, then sync.
    Init {
        url: Option<String>,
        token: Option<String>,
    },
    /// Remove the configuration, hidden directory, conflict files, and
    /// history trees.
    Clean,
    /// Overwrite the working tree with the last synced snapshot.
    Checkout,
    /// Print the current version and locally changed files.
    Status,
    /// `list`, `clean`, or a version number to materialize.
    History { target: Option<String> },
    /// List quarantined conflict files; `clean` removes them.
    Conflict { action: Option<String> },
}
