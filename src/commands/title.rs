//! Title command handler
//!
//! Wires the configured provider, an in-process title cache, and the SQLite
//! conversation store into a [`TitleOrchestrator`] and titles one
//! conversation.

use crate::cache::{CacheKeys, MemoryCache};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_title_client;
use crate::storage::{RequestContext, SqliteStorage};
use crate::title::{fetch_generated_title, TitleOrchestrator, TitleOutcome, TitleRequest, TitleSource};
use colored::Colorize;
use std::sync::Arc;

/// Arguments for the title command
#[derive(Debug, Clone)]
pub struct TitleArgs {
    pub user: String,
    pub conversation: String,
    pub text: Option<String>,
    pub no_client_title: bool,
}

/// Generate and persist a title for one conversation
///
/// # Errors
///
/// Returns error if the provider or the database cannot be set up. Failures
/// during titling itself are reported in the printed outcome.
pub async fn run_title(config: Config, args: TitleArgs) -> Result<()> {
    let mut client = create_title_client(&config.provider)?;
    if args.no_client_title {
        let mut options = client.options().clone();
        options.title_convo = Some(false);
        client = client.with_options(options);
    }

    let storage = SqliteStorage::open(config.storage.path.as_deref())?;
    tracing::debug!("Using conversation database at {}", storage.db_path().display());

    let cache = Arc::new(MemoryCache::new(CacheKeys::GenTitle));
    let orchestrator = TitleOrchestrator::new(
        config.title.clone(),
        cache.clone(),
        Arc::new(storage.clone()),
    );

    let req = RequestContext::new(args.user.clone());
    let request = TitleRequest::new(args.conversation.clone(), args.text, client);
    let outcome = orchestrator.add_title(&req, request).await;

    match &outcome {
        TitleOutcome::Disabled => {
            println!("{}", "Title generation is disabled (TITLE_CONVO).".yellow());
            return Ok(());
        }
        TitleOutcome::ClientDisabled => {
            println!("{}", "Title generation is disabled for this client.".yellow());
            return Ok(());
        }
        TitleOutcome::Persisted { title, source } => {
            let label = match source {
                TitleSource::Generated => "generated",
                TitleSource::Fallback => "fallback",
            };
            println!("{} {} ({})", "Title:".bold(), title.green(), label);
        }
        TitleOutcome::Recovered { title } => {
            println!(
                "{} {} (fallback after error)",
                "Title:".bold(),
                title.yellow()
            );
        }
        TitleOutcome::Failed => {
            println!("{}", "Failed to save a title; see logs for details.".red());
            return Ok(());
        }
    }

    if let Some(stored) = storage.load_conversation(&args.conversation)? {
        let context = stored.context.unwrap_or_else(|| "-".to_string());
        println!("{} {} [{}]", "Stored:".bold(), stored.title, context.dimmed());
    }

    match fetch_generated_title(cache.as_ref(), &args.user, &args.conversation).await? {
        Some(cached) => println!("{} {}", "Cached:".bold(), cached),
        None => println!("{} {}", "Cached:".bold(), "-".dimmed()),
    }

    Ok(())
}
