// Models for the OAI-PMH listener

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Query string parameters of a single request, keyed case-sensitively
pub type QueryParameters = HashMap<String, String>;

/// Identifies which canned document answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseId {
    /// `verb=Identify`
    Identify,

    /// `verb=ListMetadataFormats`
    ListMetadataFormats,

    /// `verb=ListSets`
    ListSets,

    /// `verb=ListRecords` without a `set` restriction
    ListRecordsWithoutSet,

    /// First page of a set
    SetFirstPage(&'static str),

    /// A page reached through a resumption token
    ResumptionPage {
        set: &'static str,
        token: &'static str,
    },

    /// Missing or unknown verb, or unknown resumption token
    BadKey,

    /// Missing or unsupported metadata prefix
    BadMetadataPrefix,

    /// Unknown set
    BadSet,
}

impl ResponseId {
    /// Path of the backing document, relative to the content directory
    pub fn document_path(&self) -> PathBuf {
        match self {
            ResponseId::ResumptionPage { set, token } => {
                PathBuf::from(set).join(format!("{}.xml", token))
            }
            other => PathBuf::from(format!("{}.xml", other)),
        }
    }

    /// Whether this identifier answers a protocol-level error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ResponseId::BadKey | ResponseId::BadMetadataPrefix | ResponseId::BadSet
        )
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseId::Identify => f.write_str("Identify"),
            ResponseId::ListMetadataFormats => f.write_str("ListMetadataFormats"),
            ResponseId::ListSets => f.write_str("ListSets"),
            ResponseId::ListRecordsWithoutSet => f.write_str("ListRecordsWithoutSet"),
            ResponseId::SetFirstPage(set) => f.write_str(set),
            ResponseId::ResumptionPage { set, token } => write!(f, "{}/{}", set, token),
            ResponseId::BadKey => f.write_str("BadKey"),
            ResponseId::BadMetadataPrefix => f.write_str("BadMetadataPrefix"),
            ResponseId::BadSet => f.write_str("BadSet"),
        }
    }
}
