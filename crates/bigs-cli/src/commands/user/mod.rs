//! User subcommands.

mod avatar;
mod password;
mod rename;
mod scraps;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Change the display name
    Rename(rename::RenameArgs),

    /// Change the password
    Password(password::PasswordArgs),

    /// Upload a profile image
    Avatar(avatar::AvatarArgs),

    /// List scrapped posts
    Scraps(scraps::ScrapsArgs),
}

pub async fn handle(cmd: UserCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        UserSubcommand::Rename(args) => rename::run(args, ctx).await,
        UserSubcommand::Password(args) => password::run(args, ctx).await,
        UserSubcommand::Avatar(args) => avatar::run(args, ctx).await,
        UserSubcommand::Scraps(args) => scraps::run(args, ctx).await,
    }
}
