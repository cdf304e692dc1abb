use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::commands::read_attachment;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AvatarArgs {
    /// Image file to upload
    pub path: PathBuf,
}

pub async fn run(args: AvatarArgs, ctx: &AppContext) -> Result<()> {
    let image = read_attachment(&args.path)?;
    let api = ctx.api()?;

    let reference = api
        .upload_profile_image(image)
        .await
        .context("Failed to upload profile image")?;

    output::success("Profile image updated");
    output::field("Avatar", &api.asset_url(&reference));
    Ok(())
}
