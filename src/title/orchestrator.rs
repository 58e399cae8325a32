//! Conversation title orchestration
//!
//! [`TitleOrchestrator::add_title`] asks the client for a title, gives up after
//! the configured deadline, substitutes the deterministic fallback when no
//! title came back, and publishes the result to the title cache and the
//! conversation store. It never returns an error: a failed main attempt is
//! followed by exactly one fallback write, and a failure there is only logged.

use crate::cache::{title_key, TitleCache};
use crate::config::TitleConfig;
use crate::error::{Result, TitlerError};
use crate::providers::{TitleClient, TitleConvoRequest, TitleGenerator};
use crate::storage::{ConversationStore, ConvoUpdate, RequestContext, SaveOptions};
use crate::title::derive_fallback_title;

use anyhow::Context;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Provenance label for titles saved by the main path
pub const SAVE_CONTEXT: &str = "title/orchestrator";

/// Provenance label for titles saved during error recovery
pub const FALLBACK_SAVE_CONTEXT: &str = "title/orchestrator - fallback";

/// Metadata of the response that triggered titling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Conversation the response belongs to
    pub conversation_id: String,
}

/// Everything needed to title one conversation
#[derive(Debug, Clone)]
pub struct TitleRequest {
    /// Message text the title is derived from
    pub text: Option<String>,
    /// Response that triggered titling
    pub response: ResponseMetadata,
    /// Client used for generation
    pub client: TitleClient,
}

impl TitleRequest {
    /// Build a request for a conversation
    pub fn new(
        conversation_id: impl Into<String>,
        text: Option<String>,
        client: TitleClient,
    ) -> Self {
        Self {
            text,
            response: ResponseMetadata {
                conversation_id: conversation_id.into(),
            },
            client,
        }
    }
}

/// Where a persisted title came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Produced by the client
    Generated,
    /// Derived from the message text
    Fallback,
}

/// What a single `add_title` invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleOutcome {
    /// Titling is disabled globally
    Disabled,
    /// The client instance has titling switched off
    ClientDisabled,
    /// The title was cached and saved on the main path
    Persisted {
        /// Saved title
        title: String,
        /// Origin of the title
        source: TitleSource,
    },
    /// The main path failed and the fallback title was saved instead
    Recovered {
        /// Saved fallback title
        title: String,
    },
    /// Both the main path and the fallback write failed
    Failed,
}

/// Generates, caches, and saves conversation titles
#[derive(Clone)]
pub struct TitleOrchestrator {
    config: TitleConfig,
    cache: Arc<dyn TitleCache>,
    store: Arc<dyn ConversationStore>,
}

impl TitleOrchestrator {
    /// Create an orchestrator over a cache and a conversation store
    pub fn new(
        config: TitleConfig,
        cache: Arc<dyn TitleCache>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            config,
            cache,
            store,
        }
    }

    /// Title configuration in effect
    pub fn config(&self) -> &TitleConfig {
        &self.config
    }

    /// Generate and persist a title for a conversation
    ///
    /// Never fails; see [`TitleOutcome`] for what happened.
    pub async fn add_title(&self, req: &RequestContext, request: TitleRequest) -> TitleOutcome {
        if !self.config.enabled {
            tracing::debug!("Title generation disabled globally");
            return TitleOutcome::Disabled;
        }

        if request.client.options().title_disabled() {
            tracing::debug!("Title generation disabled for this client");
            return TitleOutcome::ClientDisabled;
        }

        let conversation_id = request.response.conversation_id.as_str();
        let key = title_key(&req.user_id, conversation_id);

        match self.try_add_title(req, &request, &key).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(key = %key, "Error generating title: {:#}", error);

                let fallback = derive_fallback_title(request.text.as_deref());
                match self
                    .persist(req, conversation_id, &key, &fallback, FALLBACK_SAVE_CONTEXT)
                    .await
                {
                    Ok(()) => TitleOutcome::Recovered { title: fallback },
                    Err(fallback_error) => {
                        tracing::error!(key = %key, "Error saving fallback title: {:#}", fallback_error);
                        TitleOutcome::Failed
                    }
                }
            }
        }
    }

    /// Run [`add_title`](Self::add_title) in the background
    pub fn spawn_add_title(
        &self,
        req: RequestContext,
        request: TitleRequest,
    ) -> JoinHandle<TitleOutcome> {
        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.add_title(&req, request).await })
    }

    async fn try_add_title(
        &self,
        req: &RequestContext,
        request: &TitleRequest,
        key: &str,
    ) -> Result<TitleOutcome> {
        let text = request.text.as_deref();

        let generated = match &request.client {
            TitleClient::TitleCapable { generator, .. } => {
                self.generate(generator.as_ref(), text).await
            }
            TitleClient::Plain { .. } => None,
        };

        let (title, source) = match generated {
            Some(title) => (title, TitleSource::Generated),
            None => {
                tracing::debug!(key = %key, "No title generated from client, using fallback");
                (derive_fallback_title(text), TitleSource::Fallback)
            }
        };

        self.persist(
            req,
            &request.response.conversation_id,
            key,
            &title,
            SAVE_CONTEXT,
        )
        .await?;

        Ok(TitleOutcome::Persisted { title, source })
    }

    /// Race the client against the deadline; `None` means no usable title
    async fn generate(&self, generator: &dyn TitleGenerator, text: Option<&str>) -> Option<String> {
        let abort = CancellationToken::new();
        let request = TitleConvoRequest {
            text: text.unwrap_or_default().to_string(),
            abort: abort.clone(),
        };

        let outcome = tokio::select! {
            result = generator.title_convo(request) => match result {
                Ok(title) => Some(title),
                Err(error) => {
                    tracing::error!("Client title error: {:#}", error);
                    None
                }
            },
            _ = tokio::time::sleep(self.config.timeout()) => {
                let error = TitlerError::TitleTimeout {
                    timeout_ms: self.config.timeout_ms,
                };
                tracing::error!("Title error: {}", error);
                None
            }
        };

        // The losing branch is already dropped; this reaches work the client
        // handed off elsewhere.
        abort.cancel();

        outcome.filter(|title| !title.trim().is_empty())
    }

    async fn persist(
        &self,
        req: &RequestContext,
        conversation_id: &str,
        key: &str,
        title: &str,
        context: &str,
    ) -> Result<()> {
        self.cache
            .set(key, title, self.config.cache_ttl())
            .await
            .context("Failed to cache title")?;

        self.store
            .save_convo(
                req,
                ConvoUpdate {
                    conversation_id: conversation_id.to_string(),
                    title: title.to_string(),
                },
                SaveOptions::with_context(context),
            )
            .await
            .context("Failed to save conversation title")?;

        Ok(())
    }
}
