//! In-process fakes for the two persistence tiers, shared by unit tests.

use crate::{Entry, EntryRemote, LocalCache, MemoryCache, Result, TradebookError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scriptable stand-in for the entries API.
#[derive(Default)]
pub struct FakeRemote {
    offline: AtomicBool,
    malformed: AtomicBool,
    incomplete: AtomicBool,
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicUsize,
    pub fetches: AtomicUsize,
    pub creates: AtomicUsize,
}

impl FakeRemote {
    pub fn online(entries: Vec<Entry>) -> Arc<Self> {
        let remote = Self::default();
        *remote.entries.lock().unwrap() = entries;
        Arc::new(remote)
    }

    pub fn offline() -> Arc<Self> {
        let remote = Self::default();
        remote.set_offline(true);
        Arc::new(remote)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_malformed(&self, malformed: bool) {
        self.malformed.store(malformed, Ordering::SeqCst);
    }

    /// Makes `create_entry` answer without `id` and `created_at`.
    pub fn set_incomplete(&self, incomplete: bool) {
        self.incomplete.store(incomplete, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TradebookError::RemoteUnavailable("connection refused".into()));
        }
        if self.malformed.load(Ordering::SeqCst) {
            return Err(TradebookError::MalformedRemotePayload("expected value".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl EntryRemote for FakeRemote {
    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn create_entry(&self, draft: &Entry) -> Result<Entry> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut saved = draft.as_draft();
        if self.incomplete.load(Ordering::SeqCst) {
            return Ok(saved);
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        saved.id = Some(format!("srv-{n}"));
        saved.created_at = Some(Utc::now());
        self.entries.lock().unwrap().insert(0, saved.clone());
        Ok(saved)
    }
}

/// Cache whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FailingCache {
    inner: MemoryCache,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FailingCache {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }
}

impl LocalCache for FailingCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(TradebookError::LocalCacheUnavailable("injected read failure".into()));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(TradebookError::LocalCacheUnavailable("injected write failure".into()));
        }
        self.inner.set(key, value)
    }
}

/// Builds a persisted entry for fixtures.
pub fn stored_entry(id: &str, instrument: &str, tags: &[&str]) -> Entry {
    let mut entry = Entry::blank();
    entry.id = Some(id.to_string());
    entry.instrument = instrument.to_string();
    entry.set_tags(tags.iter().copied());
    entry.created_at = Some(Utc::now());
    entry
}
