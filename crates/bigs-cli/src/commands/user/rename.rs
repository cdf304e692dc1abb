use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// New display name
    pub name: String,
}

pub async fn run(args: RenameArgs, ctx: &AppContext) -> Result<()> {
    let name = args.name.trim();
    ctx.api()?
        .update_name(name)
        .await
        .context("Failed to change name")?;

    output::success(&format!("Name changed to {name}"));
    Ok(())
}
