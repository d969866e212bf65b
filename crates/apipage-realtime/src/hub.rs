//! Broadcast hub.
//!
//! One task ([`Hub::run`]) exclusively owns the client set and processes
//! register, unregister and broadcast commands one at a time, in submission
//! order. Producers talk to it through [`HubHandle`] and never lock anything.
//!
//! Every client has a bounded outbound queue. Broadcasting never waits on a
//! client: a client whose queue is full or closed is dropped from the set,
//! which closes its queue and lets its connection loop shut the socket.

use std::collections::HashMap;
use std::fmt;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::HubError;
use crate::message::BroadcastMessage;

/// Default capacity of a client's outbound queue.
pub const DEFAULT_CLIENT_BUFFER: usize = 32;

/// A serialized message, shared by every client it is delivered to.
pub type Payload = Utf8Bytes;

/// Identity of one accepted WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Allocates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Hub tuning.
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Capacity of each client's outbound queue. Must be at least 1.
    pub client_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            client_buffer: DEFAULT_CLIENT_BUFFER,
        }
    }
}

enum HubCommand {
    Register {
        client_id: ClientId,
        outbound: mpsc::Sender<Payload>,
    },
    Unregister {
        client_id: ClientId,
    },
    Broadcast {
        tag: &'static str,
        payload: Payload,
    },
    ClientCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable entry point to a running [`Hub`].
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
    client_buffer: usize,
}

impl fmt::Debug for HubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { client_id, .. } => write!(f, "Register({client_id})"),
            Self::Unregister { client_id } => write!(f, "Unregister({client_id})"),
            Self::Broadcast { tag, .. } => write!(f, "Broadcast({tag})"),
            Self::ClientCount { .. } => f.write_str("ClientCount"),
        }
    }
}

impl HubHandle {
    fn submit(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).map_err(|_| HubError::Stopped)
    }

    /// Admits a client and returns the receiving end of its outbound queue.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Stopped` if the hub task has exited.
    pub fn register(&self, client_id: ClientId) -> Result<mpsc::Receiver<Payload>, HubError> {
        let (outbound, inbound) = mpsc::channel(self.client_buffer);
        self.submit(HubCommand::Register {
            client_id,
            outbound,
        })?;
        Ok(inbound)
    }

    /// Removes a client. Removing an unknown or already removed client is a
    /// no-op, as is calling this after the hub has stopped.
    pub fn unregister(&self, client_id: ClientId) {
        // A stopped hub holds no clients, so there is nothing to remove.
        let _ = self.submit(HubCommand::Unregister { client_id });
    }

    /// Serializes `message` once and queues it for every client registered
    /// when the hub processes the request.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Serialization` if the message cannot be encoded and
    /// `HubError::Stopped` if the hub task has exited.
    pub fn broadcast(&self, message: &BroadcastMessage) -> Result<(), HubError> {
        let payload = Payload::from(serde_json::to_string(message)?);
        self.submit(HubCommand::Broadcast {
            tag: message.tag(),
            payload,
        })
    }

    /// Number of registered clients, answered in order with other commands.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Stopped` if the hub task has exited.
    pub async fn connected_clients(&self) -> Result<usize, HubError> {
        let (reply, answer) = oneshot::channel();
        self.submit(HubCommand::ClientCount { reply })?;
        answer.await.map_err(|_| HubError::Stopped)
    }
}

/// The hub's serial event loop and the client set it owns.
#[derive(Debug)]
pub struct Hub {
    commands: mpsc::UnboundedReceiver<HubCommand>,
    clients: HashMap<ClientId, mpsc::Sender<Payload>>,
}

impl Hub {
    /// Creates a hub and the handle used to reach it. Nothing is processed
    /// until [`Hub::run`] is spawned.
    #[must_use]
    pub fn new(config: HubConfig) -> (HubHandle, Self) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let handle = HubHandle {
            commands: commands_tx,
            client_buffer: config.client_buffer.max(1),
        };
        let hub = Self {
            commands: commands_rx,
            clients: HashMap::new(),
        };
        (handle, hub)
    }

    /// Processes commands until every [`HubHandle`] has been dropped.
    pub async fn run(mut self) {
        info!("broadcast hub started");
        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register {
                    client_id,
                    outbound,
                } => {
                    self.clients.insert(client_id, outbound);
                    debug!(%client_id, clients = self.clients.len(), "client registered");
                }
                HubCommand::Unregister { client_id } => {
                    if self.clients.remove(&client_id).is_some() {
                        debug!(%client_id, clients = self.clients.len(), "client unregistered");
                    }
                }
                HubCommand::Broadcast { tag, payload } => self.fan_out(tag, &payload),
                HubCommand::ClientCount { reply } => {
                    // The asker may have given up waiting.
                    let _ = reply.send(self.clients.len());
                }
            }
        }
        info!("broadcast hub stopped");
    }

    fn fan_out(&mut self, tag: &'static str, payload: &Payload) {
        let before = self.clients.len();
        self.clients
            .retain(|client_id, outbound| match outbound.try_send(payload.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(%client_id, event = tag, "client queue full, disconnecting");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%client_id, event = tag, "client queue closed, removing");
                    false
                }
            });
        debug!(
            event = tag,
            delivered = self.clients.len(),
            dropped = before - self.clients.len(),
            "broadcast fanned out"
        );
    }
}
