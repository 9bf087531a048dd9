use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDateTime;

use crate::error::ListenerError;
use crate::models::ResponseId;

/// Placeholder replaced with the response timestamp
pub const RESPONSE_DATE_TOKEN: &str = "ResponseDateValue";

/// Timestamp layout written in place of the placeholder
pub const RESPONSE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Storage of canned response documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the raw bytes of the document for an identifier
    async fn load(&self, id: &ResponseId) -> Result<Bytes, ListenerError>;
}

/// Documents stored as `<root>/<identifier>.xml`
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the document for an identifier
    pub fn path_for(&self, id: &ResponseId) -> PathBuf {
        self.root.join(id.document_path())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self, id: &ResponseId) -> Result<Bytes, ListenerError> {
        let path = self.path_for(id);

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ListenerError::DocumentNotFound(path)),
            Err(e) => Err(ListenerError::IoError(e)),
        }
    }
}

/// Replace every response date placeholder with `now`.
///
/// Works on raw bytes so documents in any ASCII-compatible encoding pass
/// through untouched apart from the substitution.
pub fn render_document(document: &[u8], now: NaiveDateTime) -> Bytes {
    let token = RESPONSE_DATE_TOKEN.as_bytes();
    let stamp = now.format(RESPONSE_DATE_FORMAT).to_string();

    let mut rendered = Vec::with_capacity(document.len());
    let mut rest = document;
    while let Some(index) = find(rest, token) {
        rendered.extend_from_slice(&rest[..index]);
        rendered.extend_from_slice(stamp.as_bytes());
        rest = &rest[index + token.len()..];
    }
    rendered.extend_from_slice(rest);

    Bytes::from(rendered)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
