//! Refresh command implementation.

use anyhow::{Context, Result};

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    ctx.api()?
        .refresh_session()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed");
    Ok(())
}
