//! Edit command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bigs_core::PostDraft;

use crate::commands::read_attachment;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Post id
    pub id: i64,

    /// New title (kept if omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// New content (kept if omitted)
    #[arg(long)]
    pub content: Option<String>,

    /// New category code (kept if omitted)
    #[arg(long)]
    pub category: Option<String>,

    /// Replacement image
    #[arg(long)]
    pub image: Option<PathBuf>,
}

pub async fn run(args: EditArgs, ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;
    let current = api
        .get_post(args.id)
        .await
        .with_context(|| format!("Failed to fetch post {}", args.id))?;

    let draft = PostDraft::new(
        args.title.unwrap_or(current.title),
        args.content.unwrap_or(current.content),
        args.category.unwrap_or(current.category),
    );
    if !draft.is_complete() {
        anyhow::bail!("Title, content and category must not be blank");
    }
    let image = args.image.as_deref().map(read_attachment).transpose()?;

    api.update_post(args.id, &draft, image)
        .await
        .with_context(|| format!("Failed to update post {}", args.id))?;

    output::success("Post updated");
    Ok(())
}
