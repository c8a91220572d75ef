//! Conversation subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ConversationsCommand {
    #[command(subcommand)]
    pub command: ConversationsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConversationsSubcommand {
    /// List conversations
    List,

    /// Show a conversation with its messages
    Show { id: u64 },

    /// Send a message in a conversation
    Send { id: u64, content: String },

    /// Count unread messages
    Unread,
}

pub async fn handle(cmd: ConversationsCommand, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;
    session::require_session(&client)?;
    let conversations = client.conversations();

    match cmd.command {
        ConversationsSubcommand::List => {
            let list = conversations
                .list()
                .await
                .context("Failed to list conversations")?;

            if list.is_empty() {
                output::note("No conversations.");
            }
            for conversation in &list {
                let unread = if conversation.unread_count > 0 {
                    format!(" ({} unread)", conversation.unread_count)
                        .yellow()
                        .to_string()
                } else {
                    String::new()
                };
                println!(
                    "{}  {}  {}{}",
                    conversation.id.to_string().cyan(),
                    conversation.ad_title.bold(),
                    conversation.other_user.username.dimmed(),
                    unread
                );
            }
        }
        ConversationsSubcommand::Show { id } => {
            let conversation = conversations
                .get(id)
                .await
                .context("Failed to fetch conversation")?;

            output::field("Listing", &conversation.ad_title);
            output::field("With", &conversation.other_user.username);
            println!();
            for message in &conversation.messages {
                let who = if message.is_mine {
                    "me".green()
                } else {
                    message.sender.username.as_str().blue()
                };
                println!(
                    "{} {}: {}",
                    message.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    who,
                    message.content
                );
            }
        }
        ConversationsSubcommand::Send { id, content } => {
            conversations
                .send(id, &content)
                .await
                .context("Failed to send message")?;
            output::success("Message sent");
        }
        ConversationsSubcommand::Unread => {
            let count = conversations
                .unread_count()
                .await
                .context("Failed to count unread messages")?;
            println!("{}", count);
        }
    }

    Ok(())
}
