use std::time::Duration;

use indexmap::IndexMap;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::io::memory::MemoryApi;
use crate::model::config::{ClientConfig, DeleteMethod, ServerConfig};
use crate::model::{NoteContent, NoteDraft, NoteId, TitleEntry};

pub const TAGS_PATH: &str = "tags/get";
pub const TITLES_PATH: &str = "titles";
pub const NOTE_GET_PATH: &str = "note/get";
pub const NOTE_SAVE_PATH: &str = "note/save";
pub const NOTE_DELETE_PATH: &str = "note/delete";

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("unexpected reply from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("invalid server url {0}")]
    Url(String),
    #[error("note {0} not found")]
    NotFound(NoteId),
}

/// The notes backend. A selection of `None` means "no filter".
pub trait NotesApi {
    /// Tag → number of notes carrying it among notes matching `selection`.
    fn list_tags(&mut self, selection: Option<&[String]>)
    -> Result<IndexMap<String, u64>, ApiError>;

    /// Titles of notes matching `selection`, in backend order.
    fn list_titles(&mut self, selection: Option<&[String]>) -> Result<Vec<TitleEntry>, ApiError>;

    fn get_note(&mut self, id: &NoteId) -> Result<NoteContent, ApiError>;

    /// Create (no id) or update a note. Returns the assigned or confirmed id.
    fn save_note(&mut self, draft: &NoteDraft) -> Result<NoteId, ApiError>;

    fn delete_note(&mut self, id: &NoteId) -> Result<(), ApiError>;
}

/// The backend to talk to: the configured server, or the demo notebook.
pub fn connect(config: &ClientConfig, demo: bool) -> Result<Box<dyn NotesApi + Send>, ApiError> {
    if demo {
        debug!("using in-memory demo notebook");
        return Ok(Box::new(MemoryApi::demo()));
    }
    debug!(base_url = %config.server.base_url, "using notes server");
    Ok(Box::new(HttpApi::new(&config.server)?))
}

/// JSON-over-HTTP implementation of [`NotesApi`].
pub struct HttpApi {
    base: Url,
    client: Client,
    delete_method: DeleteMethod,
}

impl HttpApi {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::Url(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ApiError::Transport {
                url: base.to_string(),
                message: e.to_string(),
            })?;
        Ok(HttpApi {
            base,
            client,
            delete_method: config.delete_method,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` joined with `path` and optional trailing segment, each segment percent-encoded.
    pub fn endpoint(&self, path: &str, id: Option<&NoteId>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Url(self.base.to_string()))?;
            segments.pop_if_empty();
            segments.extend(path.split('/'));
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn post_selection(&self, path: &str, selection: Option<&[String]>) -> Result<String, ApiError> {
        let url = self.endpoint(path, None)?;
        debug!(%url, ?selection, "POST");
        let response = self
            .client
            .post(url.clone())
            .json(&selection)
            .send()
            .map_err(|e| transport(&url, e))?;
        read_success(&url, response)
    }

    fn get(&self, path: &str, id: &NoteId) -> Result<String, ApiError> {
        let url = self.endpoint(path, Some(id))?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| transport(&url, e))?;
        read_success(&url, response)
    }
}

impl NotesApi for HttpApi {
    fn list_tags(
        &mut self,
        selection: Option<&[String]>,
    ) -> Result<IndexMap<String, u64>, ApiError> {
        let url = self.endpoint(TAGS_PATH, None)?;
        let text = self.post_selection(TAGS_PATH, selection)?;
        parse_nullable(&url, &text, "tag counts")
    }

    fn list_titles(&mut self, selection: Option<&[String]>) -> Result<Vec<TitleEntry>, ApiError> {
        let url = self.endpoint(TITLES_PATH, None)?;
        let text = self.post_selection(TITLES_PATH, selection)?;
        parse_nullable(&url, &text, "title list")
    }

    fn get_note(&mut self, id: &NoteId) -> Result<NoteContent, ApiError> {
        let url = self.endpoint(NOTE_GET_PATH, Some(id))?;
        let text = self.get(NOTE_GET_PATH, id)?;
        parse_json(&url, &text, "note")
    }

    fn save_note(&mut self, draft: &NoteDraft) -> Result<NoteId, ApiError> {
        let url = self.endpoint(NOTE_SAVE_PATH, None)?;
        debug!(%url, new = draft.is_new(), "POST");
        let response = self
            .client
            .post(url.clone())
            .json(draft)
            .send()
            .map_err(|e| transport(&url, e))?;
        let text = read_success(&url, response)?;
        parse_saved_id(&text, draft.id.as_ref()).ok_or_else(|| ApiError::Malformed {
            url: url.to_string(),
            reason: format!("no note id in {:?}", truncate(&text)),
        })
    }

    fn delete_note(&mut self, id: &NoteId) -> Result<(), ApiError> {
        let url = self.endpoint(NOTE_DELETE_PATH, Some(id))?;
        debug!(%url, method = ?self.delete_method, "delete");
        let request = match self.delete_method {
            DeleteMethod::Delete => self.client.delete(url.clone()),
            DeleteMethod::Get => self.client.get(url.clone()),
        };
        let response = request.send().map_err(|e| transport(&url, e))?;
        read_success(&url, response).map(|_| ())
    }
}

fn transport(url: &Url, err: reqwest::Error) -> ApiError {
    warn!(%url, error = %err, "request failed");
    ApiError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}

fn read_success(url: &Url, response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().map_err(|e| transport(url, e))?;
    if !status.is_success() {
        warn!(%url, status = status.as_u16(), "request rejected");
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: truncate(&body),
        });
    }
    Ok(body)
}

fn parse_json<T: DeserializeOwned>(url: &Url, text: &str, what: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Malformed {
        url: url.to_string(),
        reason: format!("{}: {}", what, e),
    })
}

/// Lists may come back as `null` when nothing matches.
fn parse_nullable<T: DeserializeOwned + Default>(
    url: &Url,
    text: &str,
    what: &str,
) -> Result<T, ApiError> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    parse_json::<Option<T>>(url, text, what).map(Option::unwrap_or_default)
}

/// Pull the note id out of a save reply. Accepts a raw id, a JSON string or
/// number, or a note object carrying `Id`/`ID`/`id`. An empty reply
/// confirms `sent` when updating.
pub fn parse_saved_id(text: &str, sent: Option<&NoteId>) -> Option<NoteId> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return sent.cloned();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => id_from_value(&value).or_else(|| sent.cloned()),
        Err(_) => Some(NoteId::new(trimmed)),
    }
}

fn id_from_value(value: &serde_json::Value) -> Option<NoteId> {
    use serde_json::Value;
    match value {
        Value::String(s) if !s.is_empty() => Some(NoteId::new(s.clone())),
        Value::Number(n) => Some(NoteId::new(n.to_string())),
        Value::Object(map) => ["Id", "ID", "id"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(id_from_value),
        _ => None,
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}\u{2026}", cut)
    }
}
