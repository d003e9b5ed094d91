//! Per-connection handler: outbound writer plus the inbound event loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound queue with the gateway
//!   2. Spawn a writer task draining that queue onto the socket
//!   3. Loop: receive frames → decode → dispatch under the gateway lock
//!   4. On close or error the guard runs disconnect cleanup

use std::sync::Arc;

use codeshare_protocol::{ClientEvent, Codec, ServerEvent};
use codeshare_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;

/// Drop guard that releases a connection from the gateway when the
/// handler exits.
///
/// Cleanup also runs if the handler panics. `Drop` is synchronous, so the
/// lock is taken in a spawned task.
struct DisconnectGuard<C: Codec> {
    conn_id: ConnectionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.gateway.lock().await.disconnect(conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::info!(%conn_id, "client connected");

    let (tx, rx) = mpsc::unbounded_channel();
    state.gateway.lock().await.connect(conn_id, tx);
    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    tokio::spawn(write_loop(Arc::clone(&conn), Arc::clone(&state), rx));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "client disconnected");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ignoring malformed event");
                continue;
            }
        };

        tracing::trace!(%conn_id, event = event.name(), "event received");
        state.gateway.lock().await.dispatch(conn_id, event);
    }

    // _guard drops here → gateway disconnect fires, which closes the
    // outbound queue and ends the writer.
}

/// Drains a connection's outbound queue onto the socket.
///
/// Ends when the queue is closed or a send fails.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
) {
    let conn_id = conn.id();
    while let Some(event) = rx.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
