use crate::model::{NoteId, TitleEntry};

/// Titles matching the active selection, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleList {
    entries: Vec<TitleEntry>,
}

impl TitleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TitleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TitleEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Replace the whole list with a fresh reply.
    pub fn replace(&mut self, entries: Vec<TitleEntry>) {
        self.entries = entries;
    }
}
