//! Board subcommands.

mod categories;
mod delete;
mod edit;
mod list;
mod show;
mod write;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BoardSubcommand {
    /// List posts
    List(list::ListArgs),

    /// List board categories
    Categories,

    /// Show one post
    Show(show::ShowArgs),

    /// Write a new post
    Write(write::WriteArgs),

    /// Edit a post
    Edit(edit::EditArgs),

    /// Delete a post
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: BoardCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        BoardSubcommand::List(args) => list::run(args, ctx).await,
        BoardSubcommand::Categories => categories::run(ctx).await,
        BoardSubcommand::Show(args) => show::run(args, ctx).await,
        BoardSubcommand::Write(args) => write::run(args, ctx).await,
        BoardSubcommand::Edit(args) => edit::run(args, ctx).await,
        BoardSubcommand::Delete(args) => delete::run(args, ctx).await,
    }
}
