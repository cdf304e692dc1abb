//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::board::BoardCommand;
use crate::commands::comment::CommentCommand;
use crate::commands::scrap::ScrapCommand;
use crate::commands::user::UserCommand;

/// Command-line client for the bigs blog API.
#[derive(Parser, Debug)]
#[command(name = "bigs")]
#[command(author, version = env!("BIGS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL (HTTPS, or HTTP for localhost)
    #[arg(long, env = "BIGS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the session file
    #[arg(long, env = "BIGS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign up and manage the session
    Auth(AuthCommand),

    /// Read and write board posts
    Board(BoardCommand),

    /// Account settings
    User(UserCommand),

    /// Scrapped posts (kept on this machine)
    Scrap(ScrapCommand),

    /// Comments (kept on this machine)
    Comment(CommentCommand),
}
