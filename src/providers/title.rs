//! Title generation capability
//!
//! A chat client may or may not know how to title a conversation. Rather than
//! probing at runtime, callers hand the orchestrator a [`TitleClient`] that is
//! either [`TitleClient::TitleCapable`] or [`TitleClient::Plain`].

use crate::config::ClientOptions;
use crate::error::{Result, TitlerError};
use crate::prompts::build_title_messages;
use crate::providers::Provider;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Input to a title generation call
#[derive(Debug, Clone)]
pub struct TitleConvoRequest {
    /// Message text to title
    pub text: String,
    /// Abort handle; cancelled when the caller stops waiting
    pub abort: CancellationToken,
}

/// Something that can produce a conversation title
///
/// Implementations should watch `request.abort` and stop work once it is
/// cancelled; the caller will not use a late result.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    /// Generate a title for the given message text
    async fn title_convo(&self, request: TitleConvoRequest) -> Result<String>;
}

/// Title generator backed by a chat completion provider
pub struct ProviderTitleGenerator<P> {
    provider: P,
}

impl<P: Provider> ProviderTitleGenerator<P> {
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> TitleGenerator for ProviderTitleGenerator<P> {
    async fn title_convo(&self, request: TitleConvoRequest) -> Result<String> {
        if request.text.trim().is_empty() {
            return Err(TitlerError::TitleGeneration("message text is empty".to_string()).into());
        }

        let messages = build_title_messages(&request.text);
        tracing::debug!(model = %self.provider.model_name(), "Requesting conversation title");

        let completion = tokio::select! {
            biased;

            _ = request.abort.cancelled() => {
                return Err(TitlerError::Cancelled.into());
            }

            result = self.provider.complete(&messages) => result?,
        };

        let title = clean_generated_title(&completion.message.content);
        if title.is_empty() {
            return Err(TitlerError::TitleGeneration(
                "provider returned an empty title".to_string(),
            )
            .into());
        }

        Ok(title)
    }
}

/// Normalize a model reply into a bare title
///
/// Keeps the first non-blank line, drops a leading `Title:` label, strips
/// wrapping quotes or emphasis markers and trailing periods, and collapses
/// whitespace.
///
/// # Examples
///
/// ```
/// use titler::providers::clean_generated_title;
///
/// assert_eq!(clean_generated_title("\"Rust Lifetimes Explained.\""), "Rust Lifetimes Explained");
/// assert_eq!(clean_generated_title("Title: Trip Planning\nextra"), "Trip Planning");
/// ```
pub fn clean_generated_title(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let line = match line.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("title:") => &line[6..],
        _ => line,
    };

    let wrappers: &[char] = &['"', '\'', '`', '*', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];
    let line = line
        .trim()
        .trim_matches(wrappers)
        .trim()
        .trim_end_matches('.')
        .trim();

    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The client a title request is made with
#[derive(Clone)]
pub enum TitleClient {
    /// Client that can generate titles itself
    TitleCapable {
        /// Generation capability
        generator: Arc<dyn TitleGenerator>,
        /// Per-instance options
        options: ClientOptions,
    },
    /// Client without a title capability; titles always come from the fallback
    Plain {
        /// Per-instance options
        options: ClientOptions,
    },
}

impl TitleClient {
    /// Title-capable client with default options
    pub fn capable(generator: Arc<dyn TitleGenerator>) -> Self {
        Self::TitleCapable {
            generator,
            options: ClientOptions::default(),
        }
    }

    /// Plain client with default options
    pub fn plain() -> Self {
        Self::Plain {
            options: ClientOptions::default(),
        }
    }

    /// Replace the per-instance options
    pub fn with_options(self, options: ClientOptions) -> Self {
        match self {
            Self::TitleCapable { generator, .. } => Self::TitleCapable { generator, options },
            Self::Plain { .. } => Self::Plain { options },
        }
    }

    /// Per-instance options
    pub fn options(&self) -> &ClientOptions {
        match self {
            Self::TitleCapable { options, .. } | Self::Plain { options } => options,
        }
    }
}

impl fmt::Debug for TitleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleCapable { options, .. } => f
                .debug_struct("TitleCapable")
                .field("options", options)
                .finish_non_exhaustive(),
            Self::Plain { options } => f.debug_struct("Plain").field("options", options).finish(),
        }
    }
}
