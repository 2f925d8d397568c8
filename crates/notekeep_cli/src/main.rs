//! `notekeep` command-line front end.
//!
//! # Usage
//!
//! ```bash
//! notekeep register --username alice --password secret1 --confirm secret1
//! notekeep add --title Groceries --content "milk, eggs"
//! notekeep list
//! notekeep edit <id> --content "milk, eggs, bread"
//! notekeep delete <id>
//! notekeep logout
//! ```

mod app;
mod render;

use clap::{Parser, Subcommand};
use notekeep_core::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "notekeep", version, about = "Personal notes in the terminal")]
struct Cli {
    /// Path to notekeep.toml.
    #[arg(long, global = true, env = "NOTEKEEP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and log in.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "NOTEKEEP_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password.
        #[arg(long)]
        confirm: String,
    },
    /// Log in to an existing account.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "NOTEKEEP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Print the logged-in user.
    Whoami,
    /// List notes, most recently updated first.
    List,
    /// Print one note in full.
    Show { id: Uuid },
    /// Create a note.
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Change a note; omitted fields keep their current value.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete { id: Uuid },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match app::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match config.log_dir() {
        Ok(dir) => {
            if let Err(err) = init_logging(config.log_level(), &dir) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let mut stdout = std::io::stdout().lock();
    match app::run(&config, cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
