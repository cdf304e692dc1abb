//! Write command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bigs_core::PostDraft;

use crate::commands::read_attachment;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    /// Category code (see 'bigs board categories')
    #[arg(long)]
    pub category: String,

    /// Image to attach
    #[arg(long)]
    pub image: Option<PathBuf>,
}

pub async fn run(args: WriteArgs, ctx: &AppContext) -> Result<()> {
    let draft = PostDraft::new(args.title, args.content, args.category);
    if !draft.is_complete() {
        anyhow::bail!("Title, content and category are all required");
    }
    let image = args.image.as_deref().map(read_attachment).transpose()?;

    ctx.api()?
        .create_post(&draft, image)
        .await
        .context("Failed to create post")?;

    output::success("Post created");
    Ok(())
}
