use anyhow::{Context, Result};

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let categories = ctx
        .api()?
        .categories()
        .await
        .context("Failed to fetch categories")?;

    for (code, label) in &categories {
        output::field(code, label);
    }
    Ok(())
}
