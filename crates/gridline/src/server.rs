//! `GridlineServer` builder and accept loop.
//!
//! This is the entry point for running a Gridline server. It ties
//! together all the layers: transport → protocol → room.

use std::sync::Arc;

use gridline_protocol::{Codec, JsonCodec};
use gridline_room::RoomRegistry;
use gridline_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::GridlineError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry lock is held only for the map lookup when a connection
/// arrives, never while talking to a session.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Gridline server.
///
/// # Example
///
/// ```rust,ignore
/// use gridline::GridlineServer;
///
/// let server = GridlineServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct GridlineServerBuilder {
    bind_addr: String,
}

impl GridlineServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds the server: binds the listener and sets up shared state.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport` — the only wire
    /// format browser clients speak.
    pub async fn build(self) -> Result<GridlineServer<JsonCodec>, GridlineError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(GridlineServer { transport, state })
    }
}

impl Default for GridlineServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Gridline server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridlineServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GridlineServer<JsonCodec> {
    /// Creates a new builder.
    ///
    /// Lives on the `JsonCodec` instantiation — the one the builder
    /// produces — so `GridlineServer::builder()` needs no type
    /// annotation at the call site.
    pub fn builder() -> GridlineServerBuilder {
        GridlineServerBuilder::new()
    }
}

impl<C: Codec> GridlineServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, GridlineError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), GridlineError> {
        tracing::info!("Gridline server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
