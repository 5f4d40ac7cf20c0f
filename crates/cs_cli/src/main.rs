mod cli;
mod client;
mod commands {
    pub mod checkout;
    pub mod clean;
    pub mod conflict;
    pub mod history;
    pub mod init;
    pub mod status;
    pub mod sync;
}

use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    let root = Path::new(".");
    let result = match cli.cmd {
        None => commands::sync::run_sync(root),
        Some(Command::Init { url, token }) => {
            commands::init::run_init(root, url.as_deref(), token.as_deref())
        }
        Some(Command::Clean) => commands::clean::run_clean(root),
        Some(Command::Checkout) => commands::checkout::run_checkout(root),
        Some(Command::Status) => commands::status::run_status(root),
        Some(Command::History { target }) => {
            commands::history::run_history(root, target.as_deref())
        }
        Some(Command::Conflict { action }) => {
            commands::conflict::run_conflict(root, action.as_deref())
        }
    };
    if let Err(e) = result {
        eprintln!("error[{}]: {}", e.code, e.message);
        std::process::exit(1);
    }
}
