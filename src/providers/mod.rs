//! Provider module for Titler
//!
//! This module contains the LLM provider abstraction, the Ollama
//! implementation, and the title generation capability built on top of it.

pub mod base;
pub mod ollama;
pub mod title;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use ollama::OllamaProvider;
pub use title::{
    clean_generated_title, ProviderTitleGenerator, TitleClient, TitleConvoRequest, TitleGenerator,
};

use crate::config::ProviderConfig;
use crate::error::{Result, TitlerError};
use std::sync::Arc;

/// Create the title client described by the provider configuration
///
/// `ollama` yields a title-capable client; `none` yields a plain client whose
/// titles always come from the deterministic fallback.
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
///
/// # Examples
///
/// ```
/// use titler::config::Config;
/// use titler::providers::{create_title_client, TitleClient};
///
/// let mut config = Config::default();
/// config.provider.provider_type = "none".to_string();
/// let client = create_title_client(&config.provider).unwrap();
/// assert!(matches!(client, TitleClient::Plain { .. }));
/// ```
pub fn create_title_client(config: &ProviderConfig) -> Result<TitleClient> {
    let client = match config.provider_type.as_str() {
        "ollama" => {
            let provider = OllamaProvider::new(config.ollama.clone())?;
            let generator: Arc<dyn TitleGenerator> =
                Arc::new(ProviderTitleGenerator::new(provider));
            TitleClient::capable(generator)
        }
        "none" => TitleClient::plain(),
        other => {
            return Err(
                TitlerError::Provider(format!("Unknown provider type: {}", other)).into(),
            )
        }
    };

    Ok(client.with_options(config.options.clone()))
}
