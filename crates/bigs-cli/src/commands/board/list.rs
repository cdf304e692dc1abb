//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Posts per page
    #[arg(long, default_value_t = 10)]
    pub size: u32,

    /// Only show posts of this category code
    #[arg(long)]
    pub category: Option<String>,

    /// Print the raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;

    let posts = match &args.category {
        Some(category) => api
            .posts_in_category(category, args.page, args.size)
            .await
            .context("Failed to list posts")?,
        None => {
            api.list_posts(args.page, args.size)
                .await
                .context("Failed to list posts")?
                .content
        }
    };

    if args.json {
        return output::json_pretty(&posts);
    }

    if posts.is_empty() {
        println!("No posts.");
    }
    for post in &posts {
        output::post_row(post);
    }
    Ok(())
}
