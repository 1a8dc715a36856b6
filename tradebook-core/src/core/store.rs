//! The durable, ordered entry collection and its two-tier persistence.

use crate::core::cache::SNAPSHOT_KEY;
use crate::{Entry, EntryRemote, LocalCache, Result, TradebookError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Which tier supplied the collection on [`EntryStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Fetched from the remote API.
    Remote,
    /// The remote failed; read from the local snapshot.
    LocalCache,
    /// The remote failed and no local snapshot existed.
    Empty,
}

/// How a saved entry was persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The remote API accepted the entry and is its system of record.
    Remote(Entry),
    /// The remote failed; the entry lives only in the local snapshot.
    LocalOnly(Entry),
}

impl SaveOutcome {
    pub fn entry(&self) -> &Entry {
        match self {
            Self::Remote(entry) | Self::LocalOnly(entry) => entry,
        }
    }

    pub fn into_entry(self) -> Entry {
        match self {
            Self::Remote(entry) | Self::LocalOnly(entry) => entry,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Owns the ordered entry collection (most recent first).
///
/// Reads and writes go to the remote API first. Any remote failure is
/// absorbed here and turned into local-cache behaviour; only failures of the
/// local cache itself reach the caller.
pub struct EntryStore {
    remote: Box<dyn EntryRemote>,
    cache: Box<dyn LocalCache>,
    entries: Vec<Entry>,
}

impl EntryStore {
    /// Creates an empty store. Call [`load`](Self::load) to populate it.
    pub fn new<R, C>(remote: R, cache: C) -> Self
    where
        R: EntryRemote + 'static,
        C: LocalCache + 'static,
    {
        Self {
            remote: Box::new(remote),
            cache: Box::new(cache),
            entries: Vec::new(),
        }
    }

    /// Replaces the collection with the remote one, or with the local snapshot
    /// if the remote cannot be used. Never writes to either tier.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::LocalCacheUnavailable`] if the remote failed and
    /// the local snapshot could not be read or parsed.
    pub async fn load(&mut self) -> Result<LoadSource> {
        match self.remote.fetch_entries().await {
            Ok(entries) => {
                log::info!("loaded {} entries from remote", entries.len());
                self.entries = entries;
                Ok(LoadSource::Remote)
            }
            Err(e) if e.is_remote() => {
                log::warn!("remote unavailable, using local cache: {e}");
                self.load_snapshot()
            }
            Err(e) => Err(e),
        }
    }

    fn load_snapshot(&mut self) -> Result<LoadSource> {
        match self.cache.get(SNAPSHOT_KEY)? {
            Some(json) => {
                let entries: Vec<Entry> = serde_json::from_str(&json).map_err(|e| {
                    TradebookError::LocalCacheUnavailable(format!("corrupt snapshot: {e}"))
                })?;
                log::info!("loaded {} entries from local cache", entries.len());
                self.entries = entries;
                Ok(LoadSource::LocalCache)
            }
            None => {
                log::info!("no local snapshot, starting empty");
                self.entries.clear();
                Ok(LoadSource::Empty)
            }
        }
    }

    /// Persists `draft` as a new entry and prepends it to the collection.
    ///
    /// Any `id` or `created_at` on `draft` is ignored; the entry always gets
    /// a fresh identity from the tier that stores it. A remote answer lacking
    /// either field counts as a malformed payload and takes the local path.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::LocalCacheUnavailable`] if the remote failed and
    /// the snapshot could not be written. The collection is left unchanged.
    pub async fn save(&mut self, draft: &Entry) -> Result<SaveOutcome> {
        let draft = draft.as_draft();
        match self.remote.create_entry(&draft).await {
            Ok(saved) if saved.id.is_none() || saved.created_at.is_none() => {
                log::warn!("remote returned an entry without id or created_at, saving locally");
                self.save_locally(draft)
            }
            Ok(saved) => {
                log::debug!("entry {:?} saved remotely", saved.id);
                self.entries.insert(0, saved.clone());
                Ok(SaveOutcome::Remote(saved))
            }
            Err(e) if e.is_remote() => {
                log::warn!("remote save failed, saving locally: {e}");
                self.save_locally(draft)
            }
            Err(e) => Err(e),
        }
    }

    fn save_locally(&mut self, mut entry: Entry) -> Result<SaveOutcome> {
        entry.id = Some(Uuid::new_v4().to_string());
        entry.created_at = Some(self.next_local_timestamp());
        self.entries.insert(0, entry.clone());

        if let Err(e) = self.write_snapshot() {
            self.entries.remove(0);
            return Err(e);
        }
        Ok(SaveOutcome::LocalOnly(entry))
    }

    fn write_snapshot(&mut self) -> Result<()> {
        let snapshot = encode_snapshot(&self.entries)?;
        self.cache.set(SNAPSHOT_KEY, &snapshot)
    }

    /// Current time, clamped so it never precedes the newest entry's stamp.
    fn next_local_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.entries.first().and_then(|e| e.created_at) {
            Some(newest) if newest > now => newest,
            _ => now,
        }
    }

    /// The collection, most recent first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cache(&self) -> &dyn LocalCache {
        self.cache.as_ref()
    }
}

fn encode_snapshot<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| TradebookError::LocalCacheUnavailable(format!("cannot encode snapshot: {e}")))
}
