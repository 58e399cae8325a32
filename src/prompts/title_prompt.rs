//! Conversation title prompt
//!
//! Builds the message list a provider receives when asked to title a
//! conversation.

use crate::providers::Message;

/// System instruction for title generation
pub const TITLE_SYSTEM_PROMPT: &str = "\
You write titles for chat conversations.
Reply with a concise title of at most 7 words that captures the main topic of the user's message.
Use the language of the message. Do not use quotation marks, emojis, or trailing punctuation.
Reply with the title only.";

/// Build the messages for a title request
///
/// # Examples
///
/// ```
/// use titler::prompts::build_title_messages;
///
/// let messages = build_title_messages("How do lifetimes work?");
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, "system");
/// assert!(messages[1].content.contains("How do lifetimes work?"));
/// ```
pub fn build_title_messages(text: &str) -> Vec<Message> {
    vec![
        Message::system(TITLE_SYSTEM_PROMPT),
        Message::user(format!(
            "Write a title for a conversation that starts with this message:\n\n{}",
            text
        )),
    ]
}
