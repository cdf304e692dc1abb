//! Scrap subcommands. These only touch the local session file.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ScrapCommand {
    #[command(subcommand)]
    pub command: ScrapSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ScrapSubcommand {
    /// Scrap a post, or unscrap it if already scrapped
    Toggle {
        /// Post id
        id: i64,
    },

    /// List scrapped post ids
    List,
}

pub fn handle(cmd: ScrapCommand, ctx: &AppContext) -> Result<()> {
    let book = ctx.scraps();

    match cmd.command {
        ScrapSubcommand::Toggle { id } => {
            if book.toggle(id)? {
                output::success(&format!("Scrapped post {id}"));
            } else {
                output::success(&format!("Removed post {id} from scraps"));
            }
        }
        ScrapSubcommand::List => {
            let ids = book.list()?;
            if ids.is_empty() {
                println!("No scrapped posts.");
            }
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}
