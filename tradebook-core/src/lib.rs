//! Core library for Tradebook, a trading journal kept one page per entry.
//!
//! The primary entry point is [`Journal`], which owns the entry collection
//! ([`EntryStore`]) and the open page ([`Navigator`]). Entries are written to a
//! remote API when it is reachable and to a local SQLite snapshot when it is not.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    cache::{LocalCache, MemoryCache, SqliteCache, SNAPSHOT_KEY},
    entry::{Entry, EntryEdit, Outcome, Session},
    error::{Result, TradebookError},
    images::{encode_batch, to_data_url, ImageSource},
    journal::Journal,
    navigator::{Navigator, Position},
    remote::{EntryRemote, HttpRemote, ENTRIES_PATH},
    search::{all_tags, filter_entries},
    settings::{
        default_cache_path, load_settings, load_settings_from, save_settings, save_settings_to,
        settings_file_path, AppSettings, BACKEND_URL_ENV,
    },
    store::{EntryStore, LoadSource, SaveOutcome},
};
