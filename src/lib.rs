//! Titler - conversation title generation library
//!
//! Titles a conversation by asking an LLM for a short title, racing it
//! against a deadline, and falling back to a title derived from the message
//! text. The result is published to a short-lived cache and saved to the
//! conversation store.
//!
//! # Architecture
//!
//! - `title`: Fallback derivation and the title orchestrator
//! - `providers`: LLM provider abstraction, Ollama, and title clients
//! - `prompts`: Prompt used for title generation
//! - `cache`: Namespaced TTL cache for freshly generated titles
//! - `storage`: SQLite conversation store
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use titler::cache::{CacheKeys, MemoryCache};
//! use titler::providers::TitleClient;
//! use titler::storage::{RequestContext, SqliteStorage};
//! use titler::title::{TitleOrchestrator, TitleRequest};
//! use titler::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let orchestrator = TitleOrchestrator::new(
//!         config.title.clone(),
//!         Arc::new(MemoryCache::new(CacheKeys::GenTitle)),
//!         Arc::new(SqliteStorage::new()?),
//!     );
//!
//!     let request = TitleRequest::new("convo-1", Some("hello".into()), TitleClient::plain());
//!     orchestrator.add_title(&RequestContext::new("user-1"), request).await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod storage;
pub mod title;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TitlerError};
pub use title::{derive_fallback_title, TitleOrchestrator, TitleOutcome, TitleRequest};

#[cfg(test)]
pub mod test_utils;
