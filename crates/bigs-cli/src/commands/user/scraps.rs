//! Scraps command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ScrapsArgs {
    /// Match the first listing page against local scraps instead of asking
    /// the server
    #[arg(long)]
    pub local: bool,

    /// Print the raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ScrapsArgs, ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;

    let posts = if args.local {
        api.scrapped_posts(&ctx.scraps(), 0, 10).await
    } else {
        api.scraps().await
    }
    .context("Failed to list scraps")?;

    if args.json {
        return output::json_pretty(&posts);
    }

    if posts.is_empty() {
        println!("No scrapped posts.");
    }
    for post in &posts {
        output::post_row(post);
    }
    Ok(())
}
