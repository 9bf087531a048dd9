use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use tracing::Instrument;

use crate::config::{DelaySettingsSource, FileDelaySettings, ListenerConfig, ServerConfig};
use crate::core::delay::decide_delay;
use crate::core::document::{render_document, DocumentStore, FileDocumentStore};
use crate::core::request::{parse_query, ProtocolRequest};
use crate::core::response::ProtocolResponse;
use crate::core::selector::select;
use crate::error::ListenerError;
use crate::middleware::logging::log_request;

/// Core listener trait that defines the main functionality
#[async_trait]
pub trait Listener: Send + Sync {
    /// Process an incoming request and return a response
    async fn process_request(
        &self,
        request: ProtocolRequest,
    ) -> Result<ProtocolResponse, ListenerError>;

    /// Bind the configured address and start serving, returning the bound address
    async fn start(&self) -> Result<SocketAddr, ListenerError>;

    /// Stop the server gracefully
    async fn stop(&self) -> Result<(), ListenerError>;
}

/// Server state that can be mutated
#[derive(Default)]
struct ServerState {
    /// Server handle for graceful shutdown
    server_handle: Option<tokio::task::JoinHandle<()>>,
    /// Shutdown signal sender
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Simulated OAI-PMH endpoint answering from canned documents
#[derive(Clone)]
pub struct OaiListener {
    /// Server configuration
    config: ServerConfig,
    /// Content type of every document response
    content_type: String,
    /// Canned documents
    documents: Arc<dyn DocumentStore>,
    /// Delay settings, consulted per request
    delay_settings: Arc<dyn DelaySettingsSource>,
    /// Server state (handle and shutdown sender)
    server_state: Arc<tokio::sync::Mutex<ServerState>>,
}

impl OaiListener {
    /// Create a listener reading documents and delay settings from the filesystem
    pub fn new(config: &ListenerConfig) -> Self {
        let documents = FileDocumentStore::new(&config.content.content_dir);
        let delay_settings = FileDelaySettings::new(&config.content.settings_file);
        tracing::debug!(
            "Serving documents from {}, delay settings from {}",
            documents.root().display(),
            delay_settings.path().display()
        );

        Self {
            config: config.server.clone(),
            content_type: config.content.content_type.clone(),
            documents: Arc::new(documents),
            delay_settings: Arc::new(delay_settings),
            server_state: Arc::new(tokio::sync::Mutex::new(ServerState::default())),
        }
    }

    /// Replace the document store
    pub fn with_documents<D: DocumentStore + 'static>(mut self, documents: D) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    /// Replace the delay settings source
    pub fn with_delay_settings<S: DelaySettingsSource + 'static>(mut self, source: S) -> Self {
        self.delay_settings = Arc::new(source);
        self
    }

    fn app(&self) -> axum::Router {
        axum::Router::new()
            // Every path is the protocol endpoint
            .fallback(handle_request)
            .layer(axum::middleware::from_fn(log_request))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    async fn resolve_addr(&self) -> Result<SocketAddr, ListenerError> {
        let host = self.config.host.as_str();
        tokio::net::lookup_host((host, self.config.port))
            .await?
            .next()
            .ok_or_else(|| {
                ListenerError::InternalError(format!(
                    "Invalid address: {}:{}",
                    host, self.config.port
                ))
            })
    }
}

#[async_trait]
impl Listener for OaiListener {
    async fn process_request(
        &self,
        request: ProtocolRequest,
    ) -> Result<ProtocolResponse, ListenerError> {
        let response_id = select(&request.params);
        tracing::debug!("Forming a new response from {}", response_id);

        let document = self.documents.load(&response_id).await?;
        let body = render_document(&document, Local::now().naive_local());

        let settings = self.delay_settings.load().await;
        let delay_ms = {
            let mut rng = rand::thread_rng();
            decide_delay(&settings, &mut rng)
        };
        tracing::info!(
            response = %response_id,
            delay_ms,
            "Network pause value = {}",
            delay_ms
        );

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        tracing::debug!(
            method = %request.method,
            elapsed_ms = request.timestamp.elapsed().unwrap_or_default().as_millis() as u64,
            "Answering with {}",
            response_id
        );

        Ok(ProtocolResponse::document(&self.content_type, body)
            .with_response_id(response_id)
            .with_delay(delay_ms))
    }

    async fn start(&self) -> Result<SocketAddr, ListenerError> {
        // Check if server is already running
        let mut server_state = self.server_state.lock().await;
        if server_state.server_handle.is_some() {
            return Err(ListenerError::InternalError(
                "Server is already running".to_string(),
            ));
        }

        let addr = self.resolve_addr().await?;
        let server = axum::Server::try_bind(&addr)?.serve(self.app().into_make_service());
        let local_addr = server.local_addr();

        // Create a shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let server_handle = tokio::spawn(async move {
            let graceful = server.with_graceful_shutdown(async {
                shutdown_rx.await.ok();
                tracing::info!("Shutdown signal received, starting graceful shutdown");
            });

            if let Err(e) = graceful.await {
                tracing::error!("Server error: {}", e);
            }

            tracing::info!("Server on {} has been shut down", local_addr);
        });

        server_state.server_handle = Some(server_handle);
        server_state.shutdown_tx = Some(shutdown_tx);

        tracing::info!("Listening on http://{}/", local_addr);
        Ok(local_addr)
    }

    async fn stop(&self) -> Result<(), ListenerError> {
        let mut server_state = self.server_state.lock().await;

        if server_state.server_handle.is_none() {
            return Err(ListenerError::InternalError(
                "Server is not running".to_string(),
            ));
        }

        if let Some(tx) = server_state.shutdown_tx.take() {
            // The receiver is gone if the server already exited
            let _ = tx.send(());
        }

        match server_state.server_handle.take() {
            Some(handle) => handle.await.map_err(|e| {
                tracing::error!("Error while shutting down server: {}", e);
                ListenerError::InternalError(format!("Error while shutting down server: {}", e))
            }),
            None => Err(ListenerError::InternalError(
                "Server handle not found".to_string(),
            )),
        }
    }
}

/// Axum entry point: every request, whatever its path, lands here
async fn handle_request(
    State(listener): State<OaiListener>,
    method: Method,
    uri: Uri,
) -> Response {
    let params = parse_query(uri.query());
    let request = ProtocolRequest::new(method, uri, params);
    let span = tracing::info_span!(
        "request",
        request_id = %request.request_id,
        method = %request.method,
        path = %request.uri.path()
    );

    match listener.process_request(request).instrument(span).await {
        Ok(response) => (response.status, response.headers, response.body).into_response(),
        Err(e) => {
            tracing::error!("Failed to answer request: {}", e);
            let status = axum::http::StatusCode::from_u16(e.status_code())
                .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            let response = ProtocolResponse::error(status, &e.to_string());
            (response.status, response.headers, response.body).into_response()
        }
    }
}
