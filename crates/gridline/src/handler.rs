//! Per-connection handler: room lookup, snapshot pump, event routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Parse the room identifier from the request path
//!   2. Attach to the room session (created on first reference)
//!   3. Pump outbound snapshots in one task, receive events in this one
//!   4. Detach on exit, however the handler leaves

use std::sync::Arc;

use gridline_protocol::{ClientEvent, ClientId, Codec, ProtocolError};
use gridline_room::SessionHandle;
use gridline_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::GridlineError;

/// Drop guard that detaches a connection from its room when the handler
/// exits. This ensures cleanup happens even if the handler errors out
/// early. Since `Drop` is synchronous, the detach runs in a spawned
/// fire-and-forget task.
struct DetachGuard {
    client_id: ClientId,
    session: SessionHandle,
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        let client_id = self.client_id;
        let session = self.session.clone();
        tokio::spawn(async move {
            let _ = session.detach(client_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GridlineError>
where
    C: Codec,
{
    let conn_id = conn.id();

    let Some(room_id) = room_id_from_path(conn.path()) else {
        tracing::debug!(%conn_id, path = conn.path(), "rejecting connection without a room id");
        let _ = conn.close().await;
        return Err(ProtocolError::InvalidMessage(format!(
            "no room id in path {:?}",
            conn.path()
        ))
        .into());
    };

    // The connection counter doubles as the client identity — there is
    // no authentication, a socket is a player for as long as it lives.
    let client_id = ClientId(conn_id.into_inner());

    let session = {
        let mut rooms = state.rooms.lock().await;
        rooms.get_or_create(&room_id)
    };

    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel();
    let role = session.attach(client_id, snapshot_tx).await?;
    let _guard = DetachGuard {
        client_id,
        session: session.clone(),
    };

    tracing::info!(%conn_id, %client_id, room_id, ?role, "connection joined room");

    let conn = Arc::new(conn);

    // Outbound pump: snapshots from the session go out as they arrive,
    // independent of whatever recv below is doing.
    let pump_conn = Arc::clone(&conn);
    let pump_state = Arc::clone(&state);
    let pump = tokio::spawn(async move {
        while let Some(snapshot) = snapshot_rx.recv().await {
            let bytes = match pump_state.codec.encode(&snapshot) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode snapshot");
                    continue;
                }
            };
            if pump_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop: undecodable frames are dropped, valid events go to
    // the session which applies its own validation.
    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%client_id, error = %e, "dropping undecodable frame");
                        continue;
                    }
                };
                if session.event(client_id, event).await.is_err() {
                    tracing::debug!(%client_id, "room session gone");
                    break;
                }
            }
            Ok(None) => {
                tracing::info!(%client_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%client_id, error = %e, "recv error");
                break;
            }
        }
    }

    // The socket is going away; no point flushing remaining snapshots.
    pump.abort();

    // _guard drops here → detach fires.
    Ok(())
}

/// Extracts the room identifier from a `/ws/{room_id}` request path.
fn room_id_from_path(path: &str) -> Option<String> {
    let room = path.strip_prefix("/ws/")?.trim_end_matches('/');
    if room.is_empty() || room.contains('/') {
        return None;
    }
    Some(room.to_string())
}
