//! Prompts sent to providers
//!
//! Titler only needs one prompt: the instruction that turns a user's opening
//! message into a short conversation title.

pub mod title_prompt;

pub use title_prompt::{build_title_messages, TITLE_SYSTEM_PROMPT};
