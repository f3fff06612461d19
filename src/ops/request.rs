use indexmap::IndexMap;

use crate::io::api::{ApiError, NotesApi};
use crate::model::{NoteContent, NoteDraft, NoteId, TitleEntry};

/// Which tag listing a request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagScope {
    /// Every tag, unfiltered
    All,
    /// Tags co-occurring with this selection
    Related(Vec<String>),
}

/// A backend call the client state wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListTags(TagScope),
    ListTitles(Vec<String>),
    GetNote(NoteId),
    SaveNote(NoteDraft),
    DeleteNote(NoteId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Tags(IndexMap<String, u64>),
    Titles(Vec<TitleEntry>),
    Note(NoteContent),
    Saved(NoteId),
    Deleted,
}

/// A finished request and what came back.
#[derive(Debug)]
pub struct Reply {
    pub request: Request,
    pub result: Result<Response, ApiError>,
}

impl Reply {
    pub fn ok(request: Request, response: Response) -> Self {
        Reply {
            request,
            result: Ok(response),
        }
    }

    pub fn err(request: Request, error: ApiError) -> Self {
        Reply {
            request,
            result: Err(error),
        }
    }
}

impl Request {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Request::SaveNote(_) | Request::DeleteNote(_))
    }

    /// Short human label, used in notices and logs.
    pub fn describe(&self) -> String {
        match self {
            Request::ListTags(TagScope::All) => "list tags".to_string(),
            Request::ListTags(TagScope::Related(_)) => "list related tags".to_string(),
            Request::ListTitles(_) => "list titles".to_string(),
            Request::GetNote(id) => format!("open note {}", id),
            Request::SaveNote(draft) => match &draft.id {
                Some(id) => format!("save note {}", id),
                None => "create note".to_string(),
            },
            Request::DeleteNote(id) => format!("delete note {}", id),
        }
    }

    /// Perform the call against `api`.
    pub fn execute(&self, api: &mut dyn NotesApi) -> Result<Response, ApiError> {
        match self {
            Request::ListTags(TagScope::All) => api.list_tags(None).map(Response::Tags),
            Request::ListTags(TagScope::Related(selection)) => {
                api.list_tags(query(selection)).map(Response::Tags)
            }
            Request::ListTitles(selection) => api.list_titles(query(selection)).map(Response::Titles),
            Request::GetNote(id) => api.get_note(id).map(Response::Note),
            Request::SaveNote(draft) => api.save_note(draft).map(Response::Saved),
            Request::DeleteNote(id) => api.delete_note(id).map(|_| Response::Deleted),
        }
    }

    /// Perform the call and wrap the outcome as a [`Reply`].
    pub fn run(self, api: &mut dyn NotesApi) -> Reply {
        let result = self.execute(api);
        Reply {
            request: self,
            result,
        }
    }
}

/// An empty selection goes out as `null`: no filter.
pub fn query(selection: &[String]) -> Option<&[String]> {
    if selection.is_empty() {
        None
    } else {
        Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::MemoryApi;

    #[test]
    fn empty_selection_is_unfiltered() {
        let mut api = MemoryApi::demo();
        let all = Request::ListTitles(vec![]).run(&mut api);
        match all.result.unwrap() {
            Response::Titles(titles) => assert_eq!(titles.len(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mutations_are_flagged() {
        assert!(Request::DeleteNote(NoteId::from("1")).is_mutation());
        assert!(!Request::ListTitles(vec![]).is_mutation());
        assert!(!Request::GetNote(NoteId::from("1")).is_mutation());
    }

    #[test]
    fn describe_names_the_note() {
        assert_eq!(Request::GetNote(NoteId::from("7")).describe(), "open note 7");
        let create = Request::SaveNote(NoteDraft {
            id: None,
            title: String::new(),
            body: "x".into(),
            tags: vec![],
        });
        assert_eq!(create.describe(), "create note");
    }
}
