//! Password command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct PasswordArgs {
    /// Current password
    #[arg(long)]
    pub current: String,

    /// New password
    #[arg(long)]
    pub new: String,
}

pub async fn run(args: PasswordArgs, ctx: &AppContext) -> Result<()> {
    if args.current == args.new {
        anyhow::bail!("The new password must differ from the current one");
    }

    ctx.api()?
        .change_password(&args.current, &args.new)
        .await
        .context("Failed to change password")?;

    output::success("Password changed. Sign in again with 'bigs auth login'.");
    Ok(())
}
