//! Comment subcommands. Comments are kept in the local session file.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// Add a comment to a post
    Add { post_id: i64, content: String },

    /// List the comments of a post
    List {
        post_id: i64,

        /// Print the raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of a comment
    Edit {
        post_id: i64,
        comment_id: i64,
        content: String,
    },

    /// Delete a comment
    Delete { post_id: i64, comment_id: i64 },
}

pub fn handle(cmd: CommentCommand, ctx: &AppContext) -> Result<()> {
    let book = ctx.comments();

    match cmd.command {
        CommentSubcommand::Add { post_id, content } => {
            let comment = book.add(post_id, &content)?;
            output::success(&format!("Added comment {}", comment.id));
        }
        CommentSubcommand::List { post_id, json } => {
            let comments = book.list(post_id)?;
            if json {
                return output::json_pretty(&comments);
            }
            if comments.is_empty() {
                println!("No comments.");
            }
            for comment in &comments {
                output::comment_row(comment);
            }
        }
        CommentSubcommand::Edit {
            post_id,
            comment_id,
            content,
        } => {
            book.update(post_id, comment_id, &content)?;
            output::success(&format!("Updated comment {comment_id}"));
        }
        CommentSubcommand::Delete {
            post_id,
            comment_id,
        } => {
            if !book.delete(post_id, comment_id)? {
                anyhow::bail!("Comment {comment_id} not found on post {post_id}");
            }
            output::success(&format!("Deleted comment {comment_id}"));
        }
    }
    Ok(())
}
