//! Book-style paging over the entry collection and the single active draft.

use crate::{Entry, EntryEdit, EntryStore, Result, SaveOutcome};

/// Which page is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// An existing entry, by index into the collection (0 = most recent).
    Viewing(usize),
    /// A new, unsaved page after the last existing one.
    Drafting,
}

/// Tracks the open page and holds an editable copy of it.
///
/// Edits only ever touch the draft copy. Moving to another page discards
/// them; [`save`](Self::save) is the only way they reach the store.
#[derive(Debug, Clone)]
pub struct Navigator {
    position: Position,
    draft: Entry,
}

impl Navigator {
    /// Opens the first page, or a blank draft if `entries` is empty.
    pub fn new(entries: &[Entry]) -> Self {
        let mut navigator = Self {
            position: Position::Drafting,
            draft: Entry::blank(),
        };
        navigator.reset(entries);
        navigator
    }

    /// Re-derives the initial position after the collection was reloaded.
    pub fn reset(&mut self, entries: &[Entry]) {
        match entries.first() {
            Some(first) => {
                self.position = Position::Viewing(0);
                self.draft = first.clone();
            }
            None => self.create_new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The draft copy of the open page.
    pub fn current(&self) -> &Entry {
        &self.draft
    }

    fn view(&mut self, index: usize, entries: &[Entry]) -> bool {
        match entries.get(index) {
            Some(entry) => {
                self.position = Position::Viewing(index);
                self.draft = entry.clone();
                true
            }
            None => false,
        }
    }

    /// Moves to the next (older) page. Returns `false` without changing anything
    /// on the last page or while drafting.
    pub fn page_forward(&mut self, entries: &[Entry]) -> bool {
        match self.position {
            Position::Viewing(i) if i + 1 < entries.len() => self.view(i + 1, entries),
            _ => false,
        }
    }

    /// Moves to the previous (newer) page. Returns `false` without changing
    /// anything on the first page or while drafting.
    pub fn page_backward(&mut self, entries: &[Entry]) -> bool {
        match self.position {
            Position::Viewing(i) if i > 0 => self.view(i - 1, entries),
            _ => false,
        }
    }

    /// Opens a fresh blank draft dated today, discarding any unsaved edits.
    pub fn create_new(&mut self) {
        self.position = Position::Drafting;
        self.draft = Entry::blank();
    }

    pub fn edit(&mut self, edit: EntryEdit) {
        self.draft.apply(edit);
    }

    /// Appends already-encoded screenshots after the draft's existing ones.
    pub fn attach_screenshots(&mut self, encoded: Vec<String>) {
        self.draft.screenshots.extend(encoded);
    }

    /// Whether the draft holds changes that are not in the store.
    pub fn is_dirty(&self, entries: &[Entry]) -> bool {
        match self.position {
            Position::Viewing(i) => entries.get(i) != Some(&self.draft),
            Position::Drafting => true,
        }
    }

    /// Saves the draft through `store` and opens the saved entry at index 0.
    ///
    /// # Errors
    ///
    /// Propagates local-cache failures from [`EntryStore::save`]; the position and
    /// draft are left untouched so the save can be retried.
    pub async fn save(&mut self, store: &mut EntryStore) -> Result<SaveOutcome> {
        let outcome = store.save(&self.draft).await?;
        self.position = Position::Viewing(0);
        self.draft = outcome.entry().clone();
        Ok(outcome)
    }
}
