use crate::cli::HistoryCommand;
use crate::error::Result;
use crate::storage::SqliteStorage;
use crate::title::{ELLIPSIS, MAX_TITLE_CHARS};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle history commands
pub fn handle_history(storage: &SqliteStorage, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List { user } => {
            let conversations = storage.list_conversations(user.as_deref())?;

            if conversations.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "User".bold(),
                "Title".bold(),
                "Source".bold(),
                "Last Updated".bold()
            ]);

            for convo in conversations {
                let id_short: String = convo.id.chars().take(8).collect();
                let title = shorten(&convo.title);
                let context = convo.context.unwrap_or_else(|| "-".to_string());
                let updated = convo.updated_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    id_short.cyan(),
                    convo.user_id,
                    title,
                    context,
                    updated
                ]);
            }

            println!("\nConversation Titles:");
            table.printstd();
            println!();
            println!(
                "Use {} to see a full entry.",
                "titler history show <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => match storage.load_conversation(&id)? {
            Some(convo) => {
                println!("{} {}", "ID:".bold(), convo.id);
                println!("{} {}", "User:".bold(), convo.user_id);
                println!("{} {}", "Title:".bold(), convo.title);
                println!(
                    "{} {}",
                    "Source:".bold(),
                    convo.context.unwrap_or_else(|| "-".to_string())
                );
                println!(
                    "{} {}",
                    "Created:".bold(),
                    convo.created_at.format("%Y-%m-%d %H:%M:%S")
                );
                println!(
                    "{} {}",
                    "Updated:".bold(),
                    convo.updated_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            None => println!("{}", format!("No conversation found for {}", id).yellow()),
        },
        HistoryCommand::Delete { id } => {
            if storage.delete_conversation(&id)? {
                println!("{}", format!("Deleted conversation {}", id).green());
            } else {
                println!("{}", format!("No conversation found for {}", id).yellow());
            }
        }
    }

    Ok(())
}

fn shorten(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
        format!("{}{}", title.chars().take(keep).collect::<String>(), ELLIPSIS)
    } else {
        title.to_string()
    }
}
