// OAI-PMH Listener Library

pub mod config;
pub mod core;
pub mod error;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use config::{DelaySettings, DelaySettingsSource, FileDelaySettings, ListenerConfig};
pub use self::core::{
    delay::{decide_delay, RandomSource},
    document::{render_document, DocumentStore, FileDocumentStore},
    listener::{Listener, OaiListener},
    request::ProtocolRequest,
    response::ProtocolResponse,
    selector::select,
};
pub use error::{ConfigError, ListenerError};
pub use models::{QueryParameters, ResponseId};
