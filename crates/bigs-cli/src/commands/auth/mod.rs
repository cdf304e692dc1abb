//! Auth subcommands.

mod login;
mod logout;
mod refresh;
mod signup;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in and store the session
    Login(login::LoginArgs),

    /// Create an account
    Signup(signup::SignupArgs),

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Exchange the refresh token for a new pair
    Refresh,
}

pub async fn handle(cmd: AuthCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, ctx).await,
        AuthSubcommand::Signup(args) => signup::run(args, ctx).await,
        AuthSubcommand::Logout => logout::run(ctx),
        AuthSubcommand::Whoami => whoami::run(ctx),
        AuthSubcommand::Refresh => refresh::run(ctx).await,
    }
}
