use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Post id
    pub id: i64,
}

pub async fn run(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    ctx.api()?
        .delete_post(args.id)
        .await
        .with_context(|| format!("Failed to delete post {}", args.id))?;

    // A deleted post cannot stay scrapped.
    ctx.scraps().remove(args.id)?;

    output::success("Post deleted");
    Ok(())
}
