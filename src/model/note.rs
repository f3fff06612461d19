use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Opaque note identifier assigned by the backend.
///
/// Backends disagree on whether ids are strings or numbers, so both are
/// accepted on the wire and normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        NoteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId(s.to_string())
    }
}

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = NoteId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a note id string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NoteId, E> {
                Ok(NoteId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NoteId, E> {
                Ok(NoteId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NoteId, E> {
                Ok(NoteId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// One row of the title list: display title plus the note it opens.
///
/// On the wire this is a two-element array `[title, id]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub title: String,
    pub id: NoteId,
}

impl TitleEntry {
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        TitleEntry {
            title: title.into(),
            id: NoteId::new(id),
        }
    }
}

impl Serialize for TitleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.title, &self.id).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TitleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = TitleEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [title, id] pair")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TitleEntry, A::Error> {
                let title: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let id: NoteId = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(TitleEntry { title, id })
            }
        }

        deserializer.deserialize_seq(PairVisitor)
    }
}

/// Note content as returned by `note/get/{id}`. Body is in storage form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(rename = "Body", alias = "body", default)]
    pub body: String,
}

/// Payload for `note/save`. An absent id asks the backend to create the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    #[serde(rename = "Id", serialize_with = "serialize_optional_id")]
    pub id: Option<NoteId>,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Body")]
    pub body: String,
    /// Derived from hashtags in `body`; never edited on its own.
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// Backends treat an empty Id as "create", so None goes out as "".
fn serialize_optional_id<S: Serializer>(id: &Option<NoteId>, s: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => s.serialize_str(id.as_str()),
        None => s.serialize_str(""),
    }
}

/// A tag as shown in the tag pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagView {
    pub name: String,
    /// Notes carrying this tag within the active filter
    pub count: u64,
    /// Whether adding this tag to the selection still matches a note
    pub related: bool,
}
