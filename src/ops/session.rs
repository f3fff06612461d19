use tracing::debug;

use crate::model::{NoteContent, NoteDraft, NoteId};
use crate::ops::format::{
    display_to_edit, edit_to_storage, join_title, split_title, storage_to_display,
};
use crate::ops::hashtags::{parse_tags, to_hashtags};

/// Error type for edit-session transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("note is empty, nothing to save")]
    EmptyNote,
    #[error("not editing")]
    NotEditing,
    #[error("no note open")]
    NothingOpen,
    #[error("note is still loading")]
    NotLoaded,
    #[error("already editing")]
    StillEditing,
    #[error("a save is in progress")]
    Busy,
}

/// Title and body of the open note, body in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNote {
    pub title: String,
    pub body: String,
}

/// The note shown in the note pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNote {
    pub id: NoteId,
    /// None while the note is being fetched
    pub shown: Option<DisplayedNote>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Existing(NoteId),
    New,
}

impl EditTarget {
    pub fn id(&self) -> Option<&NoteId> {
        match self {
            EditTarget::Existing(id) => Some(id),
            EditTarget::New => None,
        }
    }
}

/// Sibling action invoked while editing. Set before the edit is resolved,
/// it turns the resolution into a discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NewNote,
    DeleteNote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub target: EditTarget,
    /// Editor text: title on the first line, body after it
    pub buffer: String,
    pub pending: Option<PendingAction>,
    /// What the pane showed before editing began; restored on discard
    pub previous: Option<OpenNote>,
}

/// Build the save payload for editor text: title from the first line, body
/// after it, tags from hashtags anywhere in the text.
pub fn draft_from_edit(id: Option<NoteId>, text: &str) -> Result<NoteDraft, SessionError> {
    if text.trim().is_empty() {
        return Err(SessionError::EmptyNote);
    }
    let (title, body) = split_title(text);
    Ok(NoteDraft {
        id,
        tags: parse_tags(text),
        title,
        body: edit_to_storage(&body),
    })
}

/// How an edit was resolved when it lost focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlurOutcome {
    /// Send this draft to the backend
    Save(NoteDraft),
    /// Abandoned in favour of a sibling action; nothing was saved
    Discarded {
        action: PendingAction,
        target: EditTarget,
    },
}

/// Lifecycle of the note pane.
///
/// ```text
/// Viewing ──begin──▶ Editing ──blur──▶ Saving ──ok──▶ Viewing
///                      │  ▲              │
///                      │  └────failed────┘
///                      └──blur with pending action / cancel──▶ Viewing
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSession {
    Viewing(Option<OpenNote>),
    Editing(EditState),
    Saving { edit: EditState, draft: NoteDraft },
}

impl Default for EditSession {
    fn default() -> Self {
        EditSession::Viewing(None)
    }
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, EditSession::Saving { .. })
    }

    /// Id of the note this session is about, if it has one.
    pub fn open_id(&self) -> Option<&NoteId> {
        match self {
            EditSession::Viewing(open) => open.as_ref().map(|o| &o.id),
            EditSession::Editing(edit) | EditSession::Saving { edit, .. } => edit.target.id(),
        }
    }

    /// The note being viewed (not edited).
    pub fn viewing(&self) -> Option<&OpenNote> {
        match self {
            EditSession::Viewing(open) => open.as_ref(),
            _ => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            EditSession::Editing(edit) | EditSession::Saving { edit, .. } => Some(&edit.buffer),
            EditSession::Viewing(_) => None,
        }
    }

    /// Editable text; only while editing, never during a save.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            EditSession::Editing(edit) => Some(&mut edit.buffer),
            _ => None,
        }
    }

    /// Show note `id` in the pane. Its content arrives later via `show`.
    pub fn open(&mut self, id: NoteId) -> Result<(), SessionError> {
        match self {
            EditSession::Viewing(_) => {
                debug!(%id, "open note");
                *self = EditSession::Viewing(Some(OpenNote { id, shown: None }));
                Ok(())
            }
            EditSession::Editing(_) => Err(SessionError::StillEditing),
            EditSession::Saving { .. } => Err(SessionError::Busy),
        }
    }

    /// Fill in fetched content. Ignored unless `id` is still the open note.
    pub fn show(&mut self, id: &NoteId, content: &NoteContent) -> bool {
        match self {
            EditSession::Viewing(Some(open)) if &open.id == id => {
                open.shown = Some(DisplayedNote {
                    title: content.title.clone(),
                    body: storage_to_display(&content.body),
                });
                true
            }
            _ => false,
        }
    }

    /// Clear the pane. Edits are never closed from under the user.
    pub fn close(&mut self) -> bool {
        match self {
            EditSession::Viewing(open) => open.take().is_some(),
            _ => false,
        }
    }

    /// Start editing the open note.
    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        let open = match self {
            EditSession::Viewing(Some(open)) => open,
            EditSession::Viewing(None) => return Err(SessionError::NothingOpen),
            EditSession::Editing(_) => return Ok(()),
            EditSession::Saving { .. } => return Err(SessionError::Busy),
        };
        let shown = open.shown.as_ref().ok_or(SessionError::NotLoaded)?;
        let buffer = join_title(&shown.title, &display_to_edit(&shown.body));
        debug!(id = %open.id, "begin edit");
        *self = EditSession::Editing(EditState {
            target: EditTarget::Existing(open.id.clone()),
            buffer,
            pending: None,
            previous: Some(open.clone()),
        });
        Ok(())
    }

    /// Start a blank note whose body carries `selection` as hashtags.
    pub fn begin_new(&mut self, selection: &[String]) -> Result<(), SessionError> {
        let previous = match self {
            EditSession::Viewing(open) => open.take(),
            EditSession::Editing(_) => return Err(SessionError::StillEditing),
            EditSession::Saving { .. } => return Err(SessionError::Busy),
        };
        debug!(tags = selection.len(), "begin new note");
        *self = EditSession::Editing(EditState {
            target: EditTarget::New,
            buffer: join_title("", &to_hashtags(selection)),
            pending: None,
            previous,
        });
        Ok(())
    }

    /// Record that a sibling action was invoked while editing.
    pub fn press(&mut self, action: PendingAction) -> Result<(), SessionError> {
        match self {
            EditSession::Editing(edit) => {
                edit.pending = Some(action);
                Ok(())
            }
            _ => Err(SessionError::NotEditing),
        }
    }

    /// The editor lost focus: save, or discard if a sibling action is pending.
    ///
    /// A blank note is rejected without leaving `Editing`.
    pub fn blur(&mut self) -> Result<BlurOutcome, SessionError> {
        let edit = match self {
            EditSession::Editing(edit) => edit,
            _ => return Err(SessionError::NotEditing),
        };

        if let Some(action) = edit.pending.take() {
            let target = edit.target.clone();
            debug!(?action, "edit discarded for pending action");
            *self = EditSession::Viewing(edit.previous.take());
            return Ok(BlurOutcome::Discarded { action, target });
        }

        let draft = draft_from_edit(edit.target.id().cloned(), &edit.buffer)?;
        debug!(new = draft.is_new(), "saving edit");
        let edit = edit.clone();
        *self = EditSession::Saving {
            edit,
            draft: draft.clone(),
        };
        Ok(BlurOutcome::Save(draft))
    }

    /// Abandon the edit without saving.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self {
            EditSession::Editing(edit) => {
                *self = EditSession::Viewing(edit.previous.take());
                Ok(())
            }
            _ => Err(SessionError::NotEditing),
        }
    }

    /// The backend confirmed the save under `id`; show what was saved.
    pub fn save_succeeded(&mut self, id: NoteId) -> Result<(), SessionError> {
        let draft = match self {
            EditSession::Saving { draft, .. } => draft,
            _ => return Err(SessionError::NotEditing),
        };
        let shown = DisplayedNote {
            title: draft.title.clone(),
            body: storage_to_display(&draft.body),
        };
        *self = EditSession::Viewing(Some(OpenNote {
            id,
            shown: Some(shown),
        }));
        Ok(())
    }

    /// The save did not go through; go back to editing with the text intact.
    pub fn save_failed(&mut self) -> Result<(), SessionError> {
        match self {
            EditSession::Saving { edit, .. } => {
                let edit = edit.clone();
                *self = EditSession::Editing(edit);
                Ok(())
            }
            _ => Err(SessionError::NotEditing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewing(id: &str, title: &str, body: &str) -> EditSession {
        let mut session = EditSession::default();
        session.open(NoteId::from(id)).unwrap();
        session.show(
            &NoteId::from(id),
            &NoteContent {
                title: title.into(),
                body: body.into(),
            },
        );
        session
    }

    #[test]
    fn begin_edit_puts_title_first_and_body_after() {
        let mut session = viewing("5", "Buy milk", "Call Bob\nand <Alice>");
        session.begin_edit().unwrap();
        assert_eq!(session.buffer(), Some("Buy milk\nCall Bob\nand <Alice>"));
    }

    #[test]
    fn blur_without_pending_action_saves() {
        let mut session = viewing("5", "Buy milk", "Call Bob");
        session.begin_edit().unwrap();
        let outcome = session.blur().unwrap();
        assert_eq!(
            outcome,
            BlurOutcome::Save(NoteDraft {
                id: Some(NoteId::from("5")),
                title: "Buy milk".into(),
                body: "Call Bob".into(),
                tags: vec![],
            })
        );
        assert!(session.is_saving());
    }

    #[test]
    fn blur_with_pending_action_discards() {
        let mut session = viewing("5", "Buy milk", "Call Bob");
        session.begin_edit().unwrap();
        session.buffer_mut().unwrap().push_str(" changed");
        session.press(PendingAction::NewNote).unwrap();
        let outcome = session.blur().unwrap();
        assert_eq!(
            outcome,
            BlurOutcome::Discarded {
                action: PendingAction::NewNote,
                target: EditTarget::Existing(NoteId::from("5")),
            }
        );
        // previous view is back, unchanged
        let open = session.viewing().unwrap();
        assert_eq!(open.shown.as_ref().unwrap().body, "Call Bob");
    }

    #[test]
    fn blank_note_is_rejected_and_stays_editing() {
        let mut session = EditSession::default();
        session.begin_new(&[]).unwrap();
        assert_eq!(session.blur(), Err(SessionError::EmptyNote));
        assert!(session.is_editing());
    }

    #[test]
    fn new_note_prefills_selection_hashtags() {
        let mut session = EditSession::default();
        session
            .begin_new(&["ideas".to_string(), "work".to_string()])
            .unwrap();
        assert_eq!(session.buffer(), Some("\n#ideas #work"));

        session.buffer_mut().unwrap().insert_str(0, "Standup");
        match session.blur().unwrap() {
            BlurOutcome::Save(draft) => {
                assert!(draft.is_new());
                assert_eq!(draft.title, "Standup");
                assert_eq!(draft.body, "#ideas #work");
                assert_eq!(draft.tags, vec!["ideas", "work"]);
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn failed_save_returns_to_editing_with_text() {
        let mut session = viewing("5", "Buy milk", "Call Bob");
        session.begin_edit().unwrap();
        session.buffer_mut().unwrap().push_str("\nmore");
        session.blur().unwrap();
        session.save_failed().unwrap();
        assert!(session.is_editing());
        assert_eq!(session.buffer(), Some("Buy milk\nCall Bob\nmore"));
    }

    #[test]
    fn successful_save_shows_saved_note_under_new_id() {
        let mut session = EditSession::default();
        session.begin_new(&[]).unwrap();
        session.buffer_mut().unwrap().push_str("line a\nline b");
        session.blur().unwrap();
        session.save_succeeded(NoteId::from("42")).unwrap();
        let open = session.viewing().unwrap();
        assert_eq!(open.id, NoteId::from("42"));
        let shown = open.shown.as_ref().unwrap();
        assert_eq!(shown.title, "");
        assert_eq!(shown.body, "line a<br>line b");
    }

    #[test]
    fn edits_cannot_be_interrupted_by_open_or_close() {
        let mut session = viewing("1", "t", "b");
        session.begin_edit().unwrap();
        assert_eq!(session.open(NoteId::from("2")), Err(SessionError::StillEditing));
        assert!(!session.close());
        assert!(session.is_editing());
    }

    #[test]
    fn begin_edit_needs_loaded_note() {
        let mut session = EditSession::default();
        assert_eq!(session.begin_edit(), Err(SessionError::NothingOpen));
        session.open(NoteId::from("1")).unwrap();
        assert_eq!(session.begin_edit(), Err(SessionError::NotLoaded));
    }

    #[test]
    fn stale_content_is_ignored() {
        let mut session = EditSession::default();
        session.open(NoteId::from("1")).unwrap();
        let shown = session.show(&NoteId::from("2"), &NoteContent::default());
        assert!(!shown);
        assert!(session.viewing().unwrap().shown.is_none());
    }

    #[test]
    fn draft_tags_come_from_title_and_body() {
        let draft = draft_from_edit(None, "Plan #work\r\nship it #release #work").unwrap();
        assert_eq!(draft.title, "Plan #work");
        assert_eq!(draft.body, "ship it #release #work");
        assert_eq!(draft.tags, vec!["work", "release"]);
        assert_eq!(draft_from_edit(None, " \n "), Err(SessionError::EmptyNote));
    }

    #[test]
    fn cancel_restores_previous_view() {
        let mut session = viewing("3", "t", "b");
        session.begin_new(&[]).unwrap();
        session.cancel().unwrap();
        assert_eq!(session.open_id(), Some(&NoteId::from("3")));
    }
}
