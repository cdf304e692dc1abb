//! Subcommand implementations.

pub mod auth;
pub mod board;
pub mod comment;
pub mod scrap;
pub mod user;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use bigs_core::Attachment;

use crate::cli::Commands;
use crate::context::AppContext;

pub async fn handle(cmd: Commands, ctx: &AppContext) -> Result<()> {
    match cmd {
        Commands::Auth(cmd) => auth::handle(cmd, ctx).await,
        Commands::Board(cmd) => board::handle(cmd, ctx).await,
        Commands::User(cmd) => user::handle(cmd, ctx).await,
        Commands::Scrap(cmd) => scrap::handle(cmd, ctx),
        Commands::Comment(cmd) => comment::handle(cmd, ctx),
    }
}

/// Load a file to upload, typing it by extension.
pub(crate) fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("File name is not valid UTF-8")?;

    Ok(Attachment::new(file_name, mime_type(path), bytes))
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_type(Path::new("a/cat.PNG")), "image/png");
        assert_eq!(mime_type(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn attachment_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        fs::write(&path, b"png").unwrap();

        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.file_name, "cat.png");
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.bytes, b"png");
    }
}
