//! Conversation titles
//!
//! - `fallback`: deterministic titles derived from message text
//! - `orchestrator`: generation with a deadline, caching, and persistence

pub mod fallback;
pub mod orchestrator;

pub use fallback::{derive_fallback_title, DEFAULT_TITLE, ELLIPSIS, MAX_TITLE_CHARS};
pub use orchestrator::{
    ResponseMetadata, TitleOrchestrator, TitleOutcome, TitleRequest, TitleSource,
    FALLBACK_SAVE_CONTEXT, SAVE_CONTEXT,
};

use crate::cache::{title_key, TitleCache};
use crate::error::Result;

/// Pick up a freshly generated title
///
/// Returns the cached title for the conversation and removes it, so each
/// generated title is handed out once. `None` means no title is waiting
/// (not generated yet, already taken, or expired).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use titler::cache::{CacheKeys, MemoryCache, TitleCache};
/// use titler::title::fetch_generated_title;
///
/// # #[tokio::main]
/// # async fn main() -> titler::error::Result<()> {
/// let cache = MemoryCache::new(CacheKeys::GenTitle);
/// cache.set("u1-c1", "Trip Planning", Duration::from_secs(120)).await?;
///
/// assert_eq!(fetch_generated_title(&cache, "u1", "c1").await?.as_deref(), Some("Trip Planning"));
/// assert_eq!(fetch_generated_title(&cache, "u1", "c1").await?, None);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_generated_title(
    cache: &dyn TitleCache,
    user_id: &str,
    conversation_id: &str,
) -> Result<Option<String>> {
    let key = title_key(user_id, conversation_id);
    let title = cache.get(&key).await?;
    if title.is_some() {
        cache.delete(&key).await?;
    }
    Ok(title)
}
