//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use bigs_core::{Comment, Post};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One line per post: id, category, title.
pub fn post_row(post: &Post) {
    println!(
        "{:>6}  {:<10} {}",
        post.id.to_string().bold(),
        post.category.cyan(),
        post.title
    );
}

pub fn comment_row(comment: &Comment) {
    println!(
        "{:>14}  {}  {}",
        comment.id.to_string().bold(),
        comment.created_at.dimmed(),
        comment.content
    );
}
