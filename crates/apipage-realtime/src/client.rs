//! Per-connection WebSocket loop.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tracing::{debug, info, instrument, warn};

use crate::hub::{ClientId, HubHandle};

/// Liveness limits applied to every WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// How often the server pings the peer.
    pub heartbeat_interval: Duration,
    /// A peer silent for this long (no frame, not even a pong) is dropped.
    pub idle_timeout: Duration,
    /// Longest a single frame write may take before the peer is dropped.
    pub write_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(90),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// Upgrades the connection and attaches it to the hub as a new client.
///
/// The client only listens: inbound data frames are read and ignored. The
/// connection ends when the peer closes, a read fails, a write fails or
/// exceeds `config.write_timeout`, the peer stays silent past
/// `config.idle_timeout`, or the hub drops the client's queue.
pub fn serve_ws(ws: WebSocketUpgrade, hub: HubHandle, config: ConnectionConfig) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub, ClientId::new(), config))
}

type Sink = SplitSink<WebSocket, Message>;

/// Writes one frame within `limit`. The error names why the peer is dropped.
async fn send(sink: &mut Sink, message: Message, limit: Duration) -> Result<(), &'static str> {
    match timeout(limit, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            debug!(error = %err, "websocket write failed");
            Err("write failed")
        }
        Err(_) => Err("write timed out"),
    }
}

#[instrument(skip_all, fields(client_id = %client_id))]
async fn handle_socket(
    socket: WebSocket,
    hub: HubHandle,
    client_id: ClientId,
    config: ConnectionConfig,
) {
    let mut outbound = match hub.register(client_id) {
        Ok(outbound) => outbound,
        Err(err) => {
            warn!(error = %err, "rejecting websocket client");
            return;
        }
    };
    info!("websocket client connected");

    let (mut sink, mut stream) = socket.split();
    let mut heartbeat = interval_at(
        Instant::now() + config.heartbeat_interval,
        config.heartbeat_interval,
    );
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen = Instant::now();

    let reason = loop {
        tokio::select! {
            payload = outbound.recv() => {
                let Some(payload) = payload else {
                    break "dropped by hub";
                };
                if let Err(reason) = send(&mut sink, Message::Text(payload), config.write_timeout).await {
                    break reason;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break "closed by peer",
                Some(Ok(_)) => last_seen = Instant::now(),
                Some(Err(err)) => {
                    debug!(error = %err, "websocket read failed");
                    break "read failed";
                }
            },
            _ = heartbeat.tick() => {
                if last_seen.elapsed() >= config.idle_timeout {
                    break "idle timeout";
                }
                if let Err(reason) = send(&mut sink, Message::Ping(Bytes::new()), config.write_timeout).await {
                    break reason;
                }
            }
        }
    };

    hub.unregister(client_id);
    // The peer may be gone or stalled; the socket is dropped either way.
    let _ = timeout(config.write_timeout, sink.close()).await;
    info!(reason, "websocket client disconnected");
}
