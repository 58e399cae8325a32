//! Test utilities for Titler
//!
//! Recording stand-ins for the cache, the conversation store, and title
//! generators, so orchestration tests can assert on every write.

use crate::cache::{CacheKeys, MemoryCache, TitleCache};
use crate::error::{Result, TitlerError};
use crate::providers::{TitleConvoRequest, TitleGenerator};
use crate::storage::{ConversationStore, ConvoUpdate, RequestContext, SaveOptions};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cache that records every `set` call
pub struct RecordingCache {
    inner: MemoryCache,
    sets: Mutex<Vec<(String, String, Duration)>>,
    fail: AtomicBool,
}

impl RecordingCache {
    /// Working cache
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(CacheKeys::GenTitle),
            sets: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Cache whose writes always fail
    pub fn failing() -> Self {
        let cache = Self::new();
        cache.fail.store(true, Ordering::SeqCst);
        cache
    }

    /// Every `set` call made so far, including failed ones
    pub fn sets(&self) -> Vec<(String, String, Duration)> {
        self.sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl TitleCache for RecordingCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.sets
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string(), ttl));
        if self.fail.load(Ordering::SeqCst) {
            return Err(TitlerError::Cache("cache unavailable".to_string()).into());
        }
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.inner.delete(key).await
    }
}

/// One recorded `save_convo` call
#[derive(Debug, Clone)]
pub struct SaveAttempt {
    pub user_id: String,
    pub conversation_id: String,
    pub title: String,
    pub context: String,
    pub succeeded: bool,
}

/// Store that records every `save_convo` call
pub struct RecordingStore {
    attempts: Mutex<Vec<SaveAttempt>>,
    failures_remaining: AtomicUsize,
}

impl RecordingStore {
    /// Store whose writes always succeed
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    /// Store whose first `n` writes fail
    pub fn failing_first(n: usize) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            failures_remaining: AtomicUsize::new(n),
        }
    }

    /// Every `save_convo` call made so far
    pub fn attempts(&self) -> Vec<SaveAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for RecordingStore {
    async fn save_convo(
        &self,
        req: &RequestContext,
        update: ConvoUpdate,
        options: SaveOptions,
    ) -> Result<()> {
        let fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        self.attempts.lock().unwrap().push(SaveAttempt {
            user_id: req.user_id.clone(),
            conversation_id: update.conversation_id,
            title: update.title,
            context: options.context,
            succeeded: !fail,
        });

        if fail {
            return Err(TitlerError::Storage("database is locked".to_string()).into());
        }
        Ok(())
    }
}

/// Generator that answers immediately with a fixed result
pub struct StaticTitleGenerator {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
    abort: Mutex<Option<CancellationToken>>,
}

impl StaticTitleGenerator {
    /// Generator that returns `title`
    pub fn ok(title: &str) -> Self {
        Self::with_reply(Ok(title.to_string()))
    }

    /// Generator that fails with `message`
    pub fn err(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
            abort: Mutex::new(None),
        }
    }

    /// Number of generation calls
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Text passed to the last call
    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }

    /// Abort handle passed to the last call
    pub fn abort_handle(&self) -> Option<CancellationToken> {
        self.abort.lock().unwrap().clone()
    }
}

#[async_trait]
impl TitleGenerator for StaticTitleGenerator {
    async fn title_convo(&self, request: TitleConvoRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(request.text);
        *self.abort.lock().unwrap() = Some(request.abort);

        match &self.reply {
            Ok(title) => Ok(title.clone()),
            Err(message) => Err(TitlerError::TitleGeneration(message.clone()).into()),
        }
    }
}

/// Generator that never answers
pub struct HangingTitleGenerator {
    abort: Mutex<Option<CancellationToken>>,
}

impl HangingTitleGenerator {
    pub fn new() -> Self {
        Self {
            abort: Mutex::new(None),
        }
    }

    /// Abort handle passed to the call
    pub fn abort_handle(&self) -> Option<CancellationToken> {
        self.abort.lock().unwrap().clone()
    }
}

#[async_trait]
impl TitleGenerator for HangingTitleGenerator {
    async fn title_convo(&self, request: TitleConvoRequest) -> Result<String> {
        *self.abort.lock().unwrap() = Some(request.abort);
        std::future::pending().await
    }
}
