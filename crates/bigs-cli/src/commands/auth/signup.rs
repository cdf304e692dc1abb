//! Signup command implementation.

use anyhow::{Context, Result};
use clap::Args;

use bigs_core::SignUp;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Account email
    #[arg(long)]
    pub username: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Password: 8+ characters with a letter, a digit and one of !%*#?&
    #[arg(long, env = "BIGS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

pub async fn run(args: SignupArgs, ctx: &AppContext) -> Result<()> {
    let form = SignUp {
        confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
        username: args.username,
        name: args.name,
        password: args.password,
    };

    ctx.api()?
        .sign_up(&form)
        .await
        .context("Failed to create account")?;

    output::success("Account created. Sign in with 'bigs auth login'.");
    Ok(())
}
