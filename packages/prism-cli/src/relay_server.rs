use crate::config::RelayConfig;
use crate::host::{ServerHost, TabState};
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use prism_protocol::{RuntimeMessage, TabId};
use prism_relay::{Port, Relay, RelayOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("relay server stopped: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    relay: Arc<Mutex<Relay<ServerHost>>>,
}

impl AppState {
    pub fn new(options: RelayOptions) -> Self {
        Self {
            relay: Arc::new(Mutex::new(Relay::new(ServerHost::default(), options))),
        }
    }

    /// The relay is plain routing data, so a panic elsewhere never leaves it
    /// unusable.
    pub fn relay(&self) -> MutexGuard<'_, Relay<ServerHost>> {
        self.relay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A WebSocket client seen as a relay port. Writes are queued to the socket's
/// send task.
pub struct WsPort {
    name: String,
    tab: Option<TabId>,
    tx: mpsc::UnboundedSender<WsMessage>,
}

impl WsPort {
    pub fn new(name: String, tab: Option<TabId>, tx: mpsc::UnboundedSender<WsMessage>) -> Self {
        Self { name, tab, tx }
    }
}

impl Port for WsPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn sender_tab(&self) -> Option<TabId> {
        self.tab
    }

    fn post_message(&self, message: &Value) {
        if self.tx.send(WsMessage::Text(message.to_string())).is_err() {
            tracing::trace!("Port `{}` is gone, dropping message", self.name);
        }
    }

    fn disconnect(&self) {
        if self.tx.send(WsMessage::Close(None)).is_err() {
            tracing::trace!("Port `{}` is already closed", self.name);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    pub tab: Option<TabId>,
}

#[derive(Debug, Serialize)]
pub struct TabStatus {
    pub tab: TabId,
    pub page: bool,
    pub panel: bool,
    pub active: bool,
    #[serde(flatten)]
    pub chrome: TabState,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/connect/:name", get(connect))
        .route("/runtime", post(runtime))
        .route("/tabs/:tab", get(tab_status))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(config: RelayConfig) -> Result<(), ServerError> {
    let app = router(AppState::new(config.relay.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    tracing::info!("Prism relay listening on ws://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down relay");
    }
}

async fn connect(
    ws: WebSocketUpgrade,
    Path(name): Path<String>,
    Query(query): Query<TabQuery>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, name, query.tab))
}

async fn handle_socket(socket: WebSocket, state: AppState, name: String, tab: Option<TabId>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, WsMessage::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let connected = state.relay().connect(Arc::new(WsPort::new(name, tab, tx)));
    let Some(id) = connected else {
        // Refused; the close frame is already queued.
        let _ = send_task.await;
        return;
    };

    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(message) => state.relay().message(id, &message),
            Err(err) => tracing::warn!("Port {} sent a frame that is not JSON: {}", id, err),
        }
    }

    state.relay().disconnect(id);
    send_task.abort();
}

async fn runtime(
    State(state): State<AppState>,
    Query(query): Query<TabQuery>,
    Json(message): Json<RuntimeMessage>,
) -> StatusCode {
    state.relay().runtime_message(&message, query.tab);
    StatusCode::NO_CONTENT
}

async fn tab_status(
    State(state): State<AppState>,
    Path(tab): Path<TabId>,
) -> Result<Json<TabStatus>, StatusCode> {
    let relay = state.relay();
    let conn = relay.connection(tab);
    let chrome = relay.host().tab(tab).cloned();
    if conn.is_none() && chrome.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(TabStatus {
        tab,
        page: conn.is_some_and(|c| c.has_page()),
        panel: conn.is_some_and(|c| c.has_panel()),
        active: conn.is_some_and(|c| c.is_active()),
        chrome: chrome.unwrap_or_default(),
    }))
}

async fn health() -> &'static str {
    "ok"
}
