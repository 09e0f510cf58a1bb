//! Wireless link stand-in.
//!
//! A WebSocket endpoint at `/link`: every inbound message is one write to the
//! command characteristic, and notifications go out to every attached client.

use crate::{AppError, AppResult, config::LinkConfig};

use std::{num::NonZeroUsize, panic::Location, time::Duration};

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use error_location::ErrorLocation;
use song_sync_core::{Dispatcher, encode_frames};
use tokio::{
    net::TcpListener,
    sync::{broadcast, watch},
};
use tracing::{debug, info, instrument, warn};

/// Frames buffered per client before it lags.
const NOTIFY_BUFFER: usize = 64;

/// Outbound notification channel shared by all link clients.
#[derive(Debug, Clone)]
pub struct NotifyHub {
    tx: broadcast::Sender<Vec<u8>>,
    chunk_size: NonZeroUsize,
    pacing: Duration,
}

impl NotifyHub {
    /// Create a hub sending `chunk_size` payload bytes per frame, `pacing`
    /// apart.
    pub fn new(chunk_size: NonZeroUsize, pacing: Duration) -> Self {
        let (tx, _) = broadcast::channel(NOTIFY_BUFFER);
        Self {
            tx,
            chunk_size,
            pacing,
        }
    }

    /// Receive every notification from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<u8>> {
        self.tx.subscribe()
    }

    /// Whether any client would receive a notification.
    pub fn is_subscribed(&self) -> bool {
        self.tx.receiver_count() > 0
    }

    /// Send `payload` as a `XML_BEGIN`/`XML_CHUNK`/`XML_END` frame sequence.
    ///
    /// Returns the number of frames sent.
    #[instrument(skip(self, payload), fields(len = payload.len()))]
    pub async fn send_chunked(&self, payload: &[u8]) -> AppResult<usize> {
        let mut sent = 0;

        for frame in encode_frames(payload, self.chunk_size) {
            if sent > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            self.tx
                .send(frame.to_bytes())
                .map_err(|_| AppError::LinkError {
                    reason: format!("No subscriber left after {} frames", sent),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            sent += 1;
        }

        debug!(frames = sent, "Notification sent");

        Ok(sent)
    }
}

#[derive(Clone)]
struct LinkState {
    dispatcher: Dispatcher,
    hub: NotifyHub,
}

/// Router exposing the `/link` WebSocket.
pub fn router(dispatcher: Dispatcher, hub: NotifyHub) -> Router {
    Router::new()
        .route("/link", get(link_handler))
        .with_state(LinkState { dispatcher, hub })
}

/// Serve the link until `shutdown_rx` flips.
#[instrument(skip_all, fields(bind_address = %config.bind_address))]
pub async fn serve(
    config: &LinkConfig,
    dispatcher: Dispatcher,
    hub: NotifyHub,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let listener =
        TcpListener::bind(&config.bind_address)
            .await
            .map_err(|e| AppError::LinkError {
                reason: format!("Failed to bind {}: {}", config.bind_address, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

    info!("Link listening");

    axum::serve(listener, router(dispatcher, hub))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
        .map_err(|e| AppError::LinkError {
            reason: format!("Link server failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Link stopped");

    Ok(())
}

async fn link_handler(ws: WebSocketUpgrade, State(state): State<LinkState>) -> Response {
    ws.on_upgrade(move |socket| serve_client(socket, state))
}

async fn serve_client(mut socket: WebSocket, state: LinkState) {
    let mut notify_rx = state.hub.subscribe();
    info!("Link client connected");

    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    state.dispatcher.handle_bytes(text.as_str().as_bytes());
                }
                Some(Ok(Message::Binary(bytes))) => {
                    state.dispatcher.handle_bytes(&bytes);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "Link receive failed");
                    break;
                }
            },
            outbound = notify_rx.recv() => match outbound {
                Ok(frame) => {
                    if let Err(e) = socket.send(Message::Binary(frame.into())).await {
                        warn!(error = %e, "Link notify failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Link client lagging, frames skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    info!("Link client disconnected");
}
