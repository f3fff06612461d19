use indexmap::IndexMap;

use crate::io::api::{ApiError, NotesApi};
use crate::model::{NoteContent, NoteDraft, NoteId, TitleEntry};
use crate::ops::hashtags::parse_tags;

#[derive(Debug, Clone)]
struct StoredNote {
    id: NoteId,
    title: String,
    body: String,
    tags: Vec<String>,
}

/// In-process notebook answering the same queries as the HTTP backend.
///
/// Backs `tn --demo` and the state-machine tests. A note matches a selection
/// when it carries every selected tag; tag counts are taken over the
/// matching notes.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    notes: Vec<StoredNote>,
    next_id: u64,
    /// Fail every call with a transport error while set
    pub offline: bool,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small notebook to explore the client against.
    pub fn demo() -> Self {
        let mut api = MemoryApi::new();
        let seed = [
            ("Grocery List", "milk, eggs, coffee\n#home #errands"),
            ("Ideas", "a tag-filtered notes client\n#work #ideas"),
            ("Standup Notes", "shipped the title pane\n#work"),
            ("Reading", "finish the borrow checker chapter\n#ideas"),
        ];
        for (title, body) in seed {
            api.insert(title, body);
        }
        api
    }

    /// Store a note directly, returning its id.
    pub fn insert(&mut self, title: &str, body: &str) -> NoteId {
        self.next_id += 1;
        let id = NoteId::new(self.next_id.to_string());
        self.notes.push(StoredNote {
            id: id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            tags: note_tags(title, body),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn check_online(&self, what: &str) -> Result<(), ApiError> {
        if self.offline {
            return Err(ApiError::Transport {
                url: format!("memory:{}", what),
                message: "offline".into(),
            });
        }
        Ok(())
    }

    fn matching<'a>(
        &'a self,
        selection: Option<&'a [String]>,
    ) -> impl Iterator<Item = &'a StoredNote> + 'a {
        let wanted = selection.unwrap_or(&[]);
        self.notes
            .iter()
            .filter(move |n| wanted.iter().all(|t| n.tags.contains(t)))
    }
}

fn note_tags(title: &str, body: &str) -> Vec<String> {
    parse_tags(&format!("{}\n{}", title, body))
}

impl NotesApi for MemoryApi {
    fn list_tags(
        &mut self,
        selection: Option<&[String]>,
    ) -> Result<IndexMap<String, u64>, ApiError> {
        self.check_online("tags")?;
        let mut counts: IndexMap<String, u64> = IndexMap::new();
        for note in self.matching(selection) {
            for tag in &note.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts.sort_keys();
        Ok(counts)
    }

    fn list_titles(&mut self, selection: Option<&[String]>) -> Result<Vec<TitleEntry>, ApiError> {
        self.check_online("titles")?;
        Ok(self
            .matching(selection)
            .map(|n| TitleEntry {
                title: n.title.clone(),
                id: n.id.clone(),
            })
            .collect())
    }

    fn get_note(&mut self, id: &NoteId) -> Result<NoteContent, ApiError> {
        self.check_online("note/get")?;
        self.notes
            .iter()
            .find(|n| &n.id == id)
            .map(|n| NoteContent {
                title: n.title.clone(),
                body: n.body.clone(),
            })
            .ok_or_else(|| ApiError::NotFound(id.clone()))
    }

    fn save_note(&mut self, draft: &NoteDraft) -> Result<NoteId, ApiError> {
        self.check_online("note/save")?;
        match &draft.id {
            None => Ok(self.insert(&draft.title, &draft.body)),
            Some(id) => {
                let note = self
                    .notes
                    .iter_mut()
                    .find(|n| &n.id == id)
                    .ok_or_else(|| ApiError::NotFound(id.clone()))?;
                note.title = draft.title.clone();
                note.body = draft.body.clone();
                note.tags = note_tags(&draft.title, &draft.body);
                Ok(id.clone())
            }
        }
    }

    fn delete_note(&mut self, id: &NoteId) -> Result<(), ApiError> {
        self.check_online("note/delete")?;
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        if self.notes.len() == before {
            return Err(ApiError::NotFound(id.clone()));
        }
        Ok(())
    }
}
