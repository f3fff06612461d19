//! The single owned client state and every transition that mutates it.
//!
//! Handlers never perform I/O. Each returns the [`Request`]s it needs; the
//! caller runs them (in order) and feeds every [`Reply`] back through
//! [`ClientState::apply_reply`], which may ask for more.

use tracing::{debug, info, warn};

use crate::model::NoteId;
use crate::ops::request::{Reply, Request, Response, TagScope};
use crate::ops::selection::TagSelection;
use crate::ops::session::{BlurOutcome, EditSession, EditTarget, PendingAction, SessionError};
use crate::ops::titles::TitleList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A non-blocking message for the status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

const MAX_NOTICES: usize = 50;

#[derive(Debug, Default)]
pub struct ClientState {
    pub selection: TagSelection,
    pub titles: TitleList,
    pub session: EditSession,
    notices: Vec<Notice>,
    /// Note to open once the save it is waiting behind completes
    open_after_save: Option<NoteId>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for the first paint.
    pub fn start(&mut self) -> Vec<Request> {
        self.refresh()
    }

    /// Re-derive tags, related tags and titles for the current selection.
    /// The three always travel together.
    pub fn refresh(&self) -> Vec<Request> {
        let selection = self.selection.current();
        let mut requests = vec![Request::ListTags(TagScope::All)];
        if !selection.is_empty() {
            requests.push(Request::ListTags(TagScope::Related(selection.clone())));
        }
        requests.push(Request::ListTitles(selection));
        requests
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => info!("{}", message),
            Severity::Error => warn!("{}", message),
        }
        self.notices.push(Notice { severity, message });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    fn session_error(&mut self, err: SessionError) {
        let severity = match err {
            SessionError::EmptyNote | SessionError::Busy => Severity::Error,
            _ => Severity::Info,
        };
        self.notify(severity, err.to_string());
    }

    /// Settle any edit before navigating. `None` means navigation must stop:
    /// the edit could not be resolved (blank note) or a save is in flight.
    fn resolve_edit(&mut self) -> Option<Vec<Request>> {
        match &self.session {
            EditSession::Viewing(_) => Some(Vec::new()),
            EditSession::Saving { .. } => {
                self.session_error(SessionError::Busy);
                None
            }
            EditSession::Editing(_) => {
                let requests = self.blur();
                if self.session.is_editing() {
                    None
                } else {
                    Some(requests)
                }
            }
        }
    }

    /// Tag click.
    pub fn toggle_tag(&mut self, tag: &str) -> Vec<Request> {
        let Some(mut requests) = self.resolve_edit() else {
            return Vec::new();
        };
        self.selection.toggle(tag);
        debug!(selection = ?self.selection.current(), "selection changed");
        requests.extend(self.refresh());
        requests
    }

    /// Drop the whole selection ("all notes").
    pub fn clear_selection(&mut self) -> Vec<Request> {
        let Some(mut requests) = self.resolve_edit() else {
            return Vec::new();
        };
        self.selection.clear();
        requests.extend(self.refresh());
        requests
    }

    /// Title click.
    pub fn open_note(&mut self, id: NoteId) -> Vec<Request> {
        if self.session.is_saving() {
            self.open_after_save = Some(id);
            return Vec::new();
        }
        let Some(mut requests) = self.resolve_edit() else {
            return Vec::new();
        };
        if self.session.is_saving() {
            // the edit just went out to be saved; open once it lands
            self.open_after_save = Some(id);
            return requests;
        }
        match self.session.open(id.clone()) {
            Ok(()) => requests.push(Request::GetNote(id)),
            Err(err) => self.session_error(err),
        }
        requests
    }

    /// Activate the displayed note for editing.
    pub fn begin_edit(&mut self) -> Vec<Request> {
        if let Err(err) = self.session.begin_edit() {
            self.session_error(err);
        }
        Vec::new()
    }

    /// Record a sibling action ("new", "delete") invoked while editing.
    /// Call before `blur` resolves the edit.
    pub fn press(&mut self, action: PendingAction) {
        if self.session.press(action).is_ok() {
            debug!(?action, "pending action set");
        }
    }

    /// The editor lost focus.
    pub fn blur(&mut self) -> Vec<Request> {
        match self.session.blur() {
            Ok(BlurOutcome::Save(draft)) => vec![Request::SaveNote(draft)],
            Ok(BlurOutcome::Discarded { action, target }) => self.run_pending(action, target),
            Err(SessionError::NotEditing) => Vec::new(),
            Err(err) => {
                self.session_error(err);
                Vec::new()
            }
        }
    }

    /// Leave the editor without saving.
    pub fn cancel_edit(&mut self) {
        if self.session.cancel().is_ok() {
            self.notify(Severity::Info, "edit discarded");
        }
    }

    /// "New note" control.
    pub fn new_note(&mut self) -> Vec<Request> {
        match &self.session {
            EditSession::Saving { .. } => {
                self.session_error(SessionError::Busy);
                Vec::new()
            }
            EditSession::Editing(_) => {
                self.press(PendingAction::NewNote);
                self.blur()
            }
            EditSession::Viewing(_) => {
                let selection = self.selection.current();
                if let Err(err) = self.session.begin_new(&selection) {
                    self.session_error(err);
                }
                Vec::new()
            }
        }
    }

    /// "Delete note" control.
    pub fn delete_note(&mut self) -> Vec<Request> {
        match &self.session {
            EditSession::Saving { .. } => {
                self.session_error(SessionError::Busy);
                Vec::new()
            }
            EditSession::Editing(_) => {
                self.press(PendingAction::DeleteNote);
                self.blur()
            }
            EditSession::Viewing(Some(open)) => vec![Request::DeleteNote(open.id.clone())],
            EditSession::Viewing(None) => {
                self.session_error(SessionError::NothingOpen);
                Vec::new()
            }
        }
    }

    fn run_pending(&mut self, action: PendingAction, target: EditTarget) -> Vec<Request> {
        match action {
            PendingAction::NewNote => {
                let selection = self.selection.current();
                if let Err(err) = self.session.begin_new(&selection) {
                    self.session_error(err);
                }
                Vec::new()
            }
            PendingAction::DeleteNote => match target {
                EditTarget::Existing(id) => vec![Request::DeleteNote(id)],
                EditTarget::New => {
                    self.notify(Severity::Info, "new note discarded");
                    Vec::new()
                }
            },
        }
    }

    /// The displayed note must be in the title list; otherwise close it.
    fn enforce_open_note_listed(&mut self) {
        let stale = match self.session.viewing() {
            Some(open) => !self.titles.contains(&open.id),
            None => false,
        };
        if stale {
            debug!("open note left the title list");
            self.session.close();
        }
    }

    /// Fold a finished request back into state.
    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Request> {
        let Reply { request, result } = reply;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.notify(Severity::Error, format!("{} failed: {}", request.describe(), err));
                return self.apply_failure(request);
            }
        };

        match (request, response) {
            (Request::ListTags(TagScope::All), Response::Tags(all)) => {
                self.selection.set_tags(&all);
                Vec::new()
            }
            (Request::ListTags(TagScope::Related(selection)), Response::Tags(related)) => {
                if selection == self.selection.current() {
                    self.selection.set_related(&related);
                } else {
                    debug!(?selection, "dropping stale related tags");
                }
                Vec::new()
            }
            (Request::ListTitles(selection), Response::Titles(entries)) => {
                if selection == self.selection.current() {
                    self.titles.replace(entries);
                    self.enforce_open_note_listed();
                } else {
                    debug!(?selection, "dropping stale titles");
                }
                Vec::new()
            }
            (Request::GetNote(id), Response::Note(content)) => {
                if !self.session.show(&id, &content) {
                    debug!(%id, "dropping note no longer open");
                }
                Vec::new()
            }
            (Request::SaveNote(draft), Response::Saved(id)) => {
                let verb = if draft.is_new() { "created" } else { "saved" };
                self.notify(Severity::Info, format!("{} note {}", verb, id));
                if let Err(err) = self.session.save_succeeded(id) {
                    debug!(%err, "save reply without a pending save");
                }
                let mut requests = self.refresh();
                if let Some(next) = self.open_after_save.take() {
                    requests.extend(self.open_note(next));
                }
                requests
            }
            (Request::DeleteNote(id), Response::Deleted) => {
                self.notify(Severity::Info, format!("deleted note {}", id));
                if self.session.viewing().is_some_and(|open| open.id == id) {
                    self.session.close();
                }
                self.refresh()
            }
            (request, response) => {
                self.notify(
                    Severity::Error,
                    format!("{}: unexpected reply {:?}", request.describe(), response),
                );
                self.apply_failure(request)
            }
        }
    }

    fn apply_failure(&mut self, request: Request) -> Vec<Request> {
        match request {
            Request::SaveNote(_) => {
                self.open_after_save = None;
                if self.session.save_failed().is_err() {
                    debug!("save failure without a pending save");
                }
            }
            Request::GetNote(id) => {
                if self
                    .session
                    .viewing()
                    .is_some_and(|open| open.id == id && open.shown.is_none())
                {
                    self.session.close();
                }
            }
            _ => {}
        }
        Vec::new()
    }
}
