//! Internal domain modules for the Tradebook core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod cache;
pub mod entry;
pub mod error;
pub mod images;
pub mod journal;
pub mod navigator;
pub mod remote;
pub mod search;
pub mod settings;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

#[doc(inline)]
pub use cache::{LocalCache, MemoryCache, SqliteCache, SNAPSHOT_KEY};
#[doc(inline)]
pub use entry::{Entry, EntryEdit, Outcome, Session};
#[doc(inline)]
pub use error::{Result, TradebookError};
#[doc(inline)]
pub use images::{encode_batch, ImageSource};
#[doc(inline)]
pub use journal::Journal;
#[doc(inline)]
pub use navigator::{Navigator, Position};
#[doc(inline)]
pub use remote::{EntryRemote, HttpRemote};
#[doc(inline)]
pub use search::{all_tags, filter_entries};
#[doc(inline)]
pub use settings::{load_settings, save_settings, AppSettings};
#[doc(inline)]
pub use store::{EntryStore, LoadSource, SaveOutcome};
