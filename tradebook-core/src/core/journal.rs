//! High-level journal operations: the object a rendering surface drives.

use crate::core::{images, search};
use crate::{
    AppSettings, Entry, EntryEdit, EntryRemote, EntryStore, HttpRemote, ImageSource, LoadSource,
    LocalCache, Navigator, Position, Result, SaveOutcome, SqliteCache,
};

/// An open trading journal.
///
/// `Journal` combines an [`EntryStore`] with a [`Navigator`] over it, plus
/// the presentation state the core owns (search query, theme flag). All
/// state is exposed by shared reference; mutation goes through methods.
pub struct Journal {
    store: EntryStore,
    navigator: Navigator,
    query: String,
    dark_mode: bool,
}

impl Journal {
    /// Creates a journal over the given tiers. The collection is empty until
    /// [`load`](Self::load) is called.
    pub fn new<R, C>(remote: R, cache: C) -> Self
    where
        R: EntryRemote + 'static,
        C: LocalCache + 'static,
    {
        Self {
            store: EntryStore::new(remote, cache),
            navigator: Navigator::new(&[]),
            query: String::new(),
            dark_mode: true,
        }
    }

    /// Wires the HTTP remote and the SQLite cache described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TradebookError::Database`] or [`crate::TradebookError::Io`]
    /// if the cache file cannot be opened, or
    /// [`crate::TradebookError::RemoteUnavailable`] if the HTTP client cannot be built.
    pub fn open(settings: &AppSettings) -> Result<Self> {
        let remote = HttpRemote::new(&settings.backend_url, settings.request_timeout())?;
        let cache = SqliteCache::open(&settings.cache_path)?;
        log::info!(
            "journal opened (backend {}, cache {})",
            remote.endpoint(),
            settings.cache_path
        );
        let mut journal = Self::new(remote, cache);
        journal.dark_mode = settings.dark_mode;
        Ok(journal)
    }

    /// Loads the collection and opens its first page.
    pub async fn load(&mut self) -> Result<LoadSource> {
        let source = self.store.load().await?;
        self.navigator.reset(self.store.entries());
        Ok(source)
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// The collection, most recent first.
    pub fn entries(&self) -> &[Entry] {
        self.store.entries()
    }

    pub fn position(&self) -> Position {
        self.navigator.position()
    }

    /// The draft copy of the open page.
    pub fn current(&self) -> &Entry {
        self.navigator.current()
    }

    pub fn is_dirty(&self) -> bool {
        self.navigator.is_dirty(self.store.entries())
    }

    pub fn page_forward(&mut self) -> bool {
        self.navigator.page_forward(self.store.entries())
    }

    pub fn page_backward(&mut self) -> bool {
        self.navigator.page_backward(self.store.entries())
    }

    pub fn create_new(&mut self) {
        self.navigator.create_new();
    }

    pub fn edit(&mut self, edit: EntryEdit) {
        self.navigator.edit(edit);
    }

    /// Applies a string-keyed edit, as produced by form inputs.
    pub fn edit_field(&mut self, field: &str, value: &str) -> Result<()> {
        self.navigator.edit(EntryEdit::parse(field, value)?);
        Ok(())
    }

    /// Encodes `sources` and appends them to the open page's screenshots.
    ///
    /// Returns the number of screenshots added.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TradebookError::ImageRead`] if any source fails; the
    /// draft's screenshots are then unchanged.
    pub async fn attach_screenshots<I>(&mut self, sources: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<ImageSource>,
    {
        let encoded = images::encode_batch(sources).await?;
        let added = encoded.len();
        self.navigator.attach_screenshots(encoded);
        Ok(added)
    }

    /// Saves the open page and shows the saved entry at the front of the book.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        self.navigator.save(&mut self.store).await
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Entries matching the current query; the whole collection when it is blank.
    pub fn search_results(&self) -> Vec<&Entry> {
        search::filter_entries(self.store.entries(), &self.query)
    }

    pub fn all_tags(&self) -> Vec<String> {
        search::all_tags(self.store.entries())
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flips the theme flag and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}
