use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{NoteContent, NoteId, TitleEntry};
use crate::ops::format::storage_to_display;
use crate::ops::hashtags::parse_tags;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TagJson {
    pub name: String,
    pub count: u64,
}

#[derive(Serialize)]
pub struct TitleJson {
    pub id: String,
    pub title: String,
}

#[derive(Serialize)]
pub struct NoteJson {
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
pub struct SavedJson {
    pub id: String,
    pub created: bool,
}

#[derive(Serialize)]
pub struct DeletedJson {
    pub id: String,
    pub deleted: bool,
}

pub fn tags_to_json(tags: &IndexMap<String, u64>) -> Vec<TagJson> {
    tags.iter()
        .map(|(name, count)| TagJson {
            name: name.clone(),
            count: *count,
        })
        .collect()
}

pub fn titles_to_json(titles: &[TitleEntry]) -> Vec<TitleJson> {
    titles
        .iter()
        .map(|t| TitleJson {
            id: t.id.to_string(),
            title: t.title.clone(),
        })
        .collect()
}

pub fn note_to_json(id: &NoteId, note: &NoteContent) -> NoteJson {
    NoteJson {
        id: id.to_string(),
        title: note.title.clone(),
        body: note.body.clone(),
        tags: parse_tags(&format!("{}\n{}", note.title, note.body)),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `#tag  count`, names padded to a common width.
pub fn format_tag_listing(tags: &IndexMap<String, u64>) -> Vec<String> {
    let width = tags.keys().map(|t| t.chars().count()).max().unwrap_or(0);
    tags.iter()
        .map(|(name, count)| format!("#{:<width$}  {}", name, count, width = width))
        .collect()
}

/// `id  title`, ids right-aligned.
pub fn format_title_listing(titles: &[TitleEntry]) -> Vec<String> {
    let width = titles
        .iter()
        .map(|t| t.id.as_str().chars().count())
        .max()
        .unwrap_or(0);
    titles
        .iter()
        .map(|t| {
            let title = if t.title.is_empty() {
                "(untitled)"
            } else {
                t.title.as_str()
            };
            format!("{:>width$}  {}", t.id.as_str(), title, width = width)
        })
        .collect()
}

pub fn format_note_detail(id: &NoteId, note: &NoteContent, display: bool) -> Vec<String> {
    let mut lines = vec![format!("[{}] {}", id, note.title)];
    let tags = parse_tags(&format!("{}\n{}", note.title, note.body));
    if !tags.is_empty() {
        lines.push(format!(
            "tags: {}",
            tags.iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    lines.push(String::new());
    if display {
        lines.push(storage_to_display(&note.body));
    } else {
        lines.extend(note.body.lines().map(str::to_string));
    }
    lines
}
