//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use bigs_core::Credentials;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "BIGS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Signing in...".dimmed());

    let profile = api.sign_in(&credentials).await.context("Failed to sign in")?;

    output::success("Signed in");
    println!();
    output::field("Name", &profile.display_name);
    output::field("Email", &profile.email);

    Ok(())
}
