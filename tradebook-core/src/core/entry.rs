//! The journal page record and the typed edits that can be applied to it.

use crate::{Result, TradebookError};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading session the entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Session {
    #[default]
    #[serde(rename = "NY")]
    NewYork,
    London,
    Asia,
    Other,
}

impl Session {
    pub const ALL: [Session; 4] = [Self::NewYork, Self::London, Self::Asia, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewYork => "NY",
            Self::London => "London",
            Self::Asia => "Asia",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = TradebookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|session| session.as_str() == s)
            .ok_or_else(|| TradebookError::InvalidField(format!("unknown session: {s}")))
    }
}

/// How the trade recorded on the page ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Win,
    Loss,
    #[serde(rename = "Break-even")]
    BreakEven,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Self::Win, Self::Loss, Self::BreakEven];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "Win",
            Self::Loss => "Loss",
            Self::BreakEven => "Break-even",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = TradebookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| TradebookError::InvalidField(format!("unknown outcome: {s}")))
    }
}

/// One journal page.
///
/// An entry without an `id` is a draft: it lives only in the navigator and
/// is not part of the durable collection. Missing or `null` fields in stored
/// or remote JSON fall back to the values of [`Entry::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(deserialize_with = "null_as_default")]
    pub instrument: String,
    #[serde(deserialize_with = "null_as_default")]
    pub session: Session,
    #[serde(deserialize_with = "null_as_default")]
    pub rr: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lot_size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub outcome: Outcome,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(deserialize_with = "deserialize_tags")]
    tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub screenshots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for Entry {
    /// A blank page dated today.
    fn default() -> Self {
        Self {
            id: None,
            date: Local::now().date_naive(),
            instrument: String::new(),
            session: Session::default(),
            rr: String::new(),
            lot_size: String::new(),
            outcome: Outcome::default(),
            notes: String::new(),
            tags: Vec::new(),
            screenshots: Vec::new(),
            created_at: None,
        }
    }
}

impl Entry {
    /// Returns a fresh blank draft dated today.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Whether the entry has been assigned an id by a persistence tier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns a copy of this entry's content with `id` and `created_at` cleared,
    /// the shape the remote create endpoint expects.
    pub fn as_draft(&self) -> Self {
        Self {
            id: None,
            created_at: None,
            ..self.clone()
        }
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds a tag after trimming it. Empty tags and tags already present are ignored.
    ///
    /// Returns `true` if the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes `tag` if present. Returns `true` if something was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Replaces all tags, keeping the first occurrence of each.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            self.add_tag(tag.as_ref());
        }
    }

    /// Applies a single field edit in place.
    pub fn apply(&mut self, edit: EntryEdit) {
        match edit {
            EntryEdit::Date(date) => self.date = date,
            EntryEdit::Instrument(value) => self.instrument = value,
            EntryEdit::Session(session) => self.session = session,
            EntryEdit::Rr(value) => self.rr = value,
            EntryEdit::LotSize(value) => self.lot_size = value,
            EntryEdit::Outcome(outcome) => self.outcome = outcome,
            EntryEdit::Notes(value) => self.notes = value,
            EntryEdit::AddTag(tag) => {
                self.add_tag(&tag);
            }
            EntryEdit::RemoveTag(tag) => {
                self.remove_tag(&tag);
            }
            EntryEdit::Tags(tags) => self.set_tags(tags),
            EntryEdit::Screenshots(screenshots) => self.screenshots = screenshots,
        }
    }
}

/// Reads `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = null_as_default(deserializer)?;
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// A change to one field of the active draft.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryEdit {
    Date(NaiveDate),
    Instrument(String),
    Session(Session),
    Rr(String),
    LotSize(String),
    Outcome(Outcome),
    Notes(String),
    AddTag(String),
    RemoveTag(String),
    /// Replaces the whole tag list.
    Tags(Vec<String>),
    /// Replaces the whole screenshot list.
    Screenshots(Vec<String>),
}

impl EntryEdit {
    /// Builds an edit from a wire-format field name and a raw input value.
    ///
    /// `tags` takes a comma-separated list; `tag` adds a single tag.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::InvalidField`] for an unknown field name, an
    /// unparseable date or an unknown session/outcome value.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let edit = match field {
            "date" => {
                let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
                    TradebookError::InvalidField(format!("invalid date '{value}': {e}"))
                })?;
                Self::Date(date)
            }
            "instrument" => Self::Instrument(value.to_string()),
            "session" => Self::Session(value.parse()?),
            "rr" => Self::Rr(value.to_string()),
            "lot_size" => Self::LotSize(value.to_string()),
            "outcome" => Self::Outcome(value.parse()?),
            "notes" => Self::Notes(value.to_string()),
            "tag" => Self::AddTag(value.to_string()),
            "tags" => Self::Tags(value.split(',').map(str::to_string).collect()),
            other => {
                return Err(TradebookError::InvalidField(format!(
                    "unknown field: {other}"
                )))
            }
        };
        Ok(edit)
    }
}
