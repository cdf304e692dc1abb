//! Show command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Post id
    pub id: i64,

    /// Print the raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;
    let post = api
        .get_post(args.id)
        .await
        .with_context(|| format!("Failed to fetch post {}", args.id))?;

    if args.json {
        return output::json_pretty(&post);
    }

    output::field("Title", &post.title);
    output::field("Category", &post.category);
    if let Some(author) = &post.author {
        output::field("Author", author);
    }
    if let Some(created_at) = &post.created_at {
        output::field("Created", created_at);
    }
    if let Some(image) = &post.image_url {
        output::field("Image", &api.asset_url(image));
    }
    let scrapped = ctx.scraps().is_scrapped(post.id)?;
    output::field("Scrapped", if scrapped { "yes" } else { "no" });
    println!();
    println!("{}", post.content);

    Ok(())
}
