use std::collections::HashMap;

use mr_core::{Color, EntityId, StyledText};
use mr_engine::{Builtin, ClientId, Dispatch, Engine};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::frame::{ClientFrame, Frame};

/// A request from a connection task to the loop that owns the engine.
#[derive(Debug)]
pub enum Request {
    /// Attach a client to an existing entity.
    Connect {
        /// Client name.
        client: ClientId,
        /// Entity the client will control.
        entity: EntityId,
        /// Where the client's frames go.
        outbound: mpsc::UnboundedSender<Frame>,
        /// Receives the outcome.
        reply: oneshot::Sender<RuntimeResult<()>>,
    },
    /// Detach a client. Its entity stays in the world.
    Disconnect {
        /// Client name.
        client: ClientId,
    },
    /// A line of command text from a client.
    Command {
        /// Client name.
        client: ClientId,
        /// The raw text.
        line: String,
    },
    /// Stop the loop after the current request.
    Shutdown,
}

/// Cloneable sender side used by connection tasks.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    requests: mpsc::Sender<Request>,
}

impl RuntimeHandle {
    async fn send(&self, request: Request) -> RuntimeResult<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    /// Attach `client` to `entity`. Returns the client's frame stream.
    pub async fn connect(
        &self,
        client: impl Into<ClientId>,
        entity: impl Into<EntityId>,
    ) -> RuntimeResult<mpsc::UnboundedReceiver<Frame>> {
        let (outbound, frames) = mpsc::unbounded_channel();
        let (reply, outcome) = oneshot::channel();
        self.send(Request::Connect {
            client: client.into(),
            entity: entity.into(),
            outbound,
            reply,
        })
        .await?;
        outcome.await.map_err(|_| RuntimeError::Stopped)??;
        Ok(frames)
    }

    /// Detach a client.
    pub async fn disconnect(&self, client: impl Into<ClientId>) -> RuntimeResult<()> {
        self.send(Request::Disconnect {
            client: client.into(),
        })
        .await
    }

    /// Queue a line of command text for a client.
    pub async fn command(
        &self,
        client: impl Into<ClientId>,
        line: impl Into<String>,
    ) -> RuntimeResult<()> {
        self.send(Request::Command {
            client: client.into(),
            line: line.into(),
        })
        .await
    }

    /// Forward a decoded client frame.
    pub async fn submit(
        &self,
        client: impl Into<ClientId>,
        frame: ClientFrame,
    ) -> RuntimeResult<()> {
        match frame {
            ClientFrame::Message(line) => self.command(client, line).await,
            ClientFrame::Disconnect => self.disconnect(client).await,
        }
    }

    /// Ask the loop to stop.
    pub async fn shutdown(&self) -> RuntimeResult<()> {
        self.send(Request::Shutdown).await
    }
}

/// The single task that owns and mutates the engine.
///
/// Requests are applied one at a time between ticks, and a tick always runs
/// to completion before the next request or tick is looked at.
pub struct Runtime {
    engine: Engine,
    config: RuntimeConfig,
    requests: mpsc::Receiver<Request>,
    clients: HashMap<ClientId, mpsc::UnboundedSender<Frame>>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("engine", &self.engine)
            .field("clients", &self.clients.len())
            .finish()
    }
}

impl Runtime {
    /// Wrap an engine. The handle is how everything else talks to it.
    pub fn new(engine: Engine, config: RuntimeConfig) -> (Self, RuntimeHandle) {
        let (sender, requests) = mpsc::channel(config.inbound_capacity);
        let handle = RuntimeHandle { requests: sender };
        let runtime = Self {
            engine,
            config,
            requests,
            clients: HashMap::new(),
        };
        (runtime, handle)
    }

    /// Run until shutdown is requested or every handle is dropped, then
    /// return the engine so the host can persist it.
    pub async fn run(mut self) -> RuntimeResult<Engine> {
        let mut ticker = time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.config.tick_interval, "runtime started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.engine.tick()?;
                }
                request = self.requests.recv() => match request {
                    Some(Request::Shutdown) | None => break,
                    Some(request) => self.handle(request)?,
                },
            }
            self.flush();
        }

        self.flush();
        for (client, outbound) in self.clients.drain() {
            if outbound.send(Frame::disconnect()).is_err() {
                debug!(%client, "could not deliver disconnect frame");
            }
            self.engine.outbox_mut().dissociate_client(&client);
        }
        info!(tick = self.engine.clock().tick(), "runtime stopped");
        Ok(self.engine)
    }

    fn handle(&mut self, request: Request) -> RuntimeResult<()> {
        match request {
            Request::Connect {
                client,
                entity,
                outbound,
                reply,
            } => {
                let outcome = self.connect(client, entity, outbound);
                // The caller may have given up waiting; nothing to do then.
                let _ = reply.send(outcome);
            }
            Request::Disconnect { client } => self.disconnect(&client),
            Request::Command { client, line } => self.command(&client, &line)?,
            Request::Shutdown => {}
        }
        Ok(())
    }

    fn connect(
        &mut self,
        client: ClientId,
        entity: EntityId,
        outbound: mpsc::UnboundedSender<Frame>,
    ) -> RuntimeResult<()> {
        if self.clients.contains_key(&client) {
            return Err(RuntimeError::ClientExists(client));
        }
        if self.engine.get(&entity).is_none() {
            return Err(RuntimeError::UnknownEntity(entity));
        }
        info!(%client, %entity, "client connected");
        self.engine.outbox_mut().associate(entity, client.clone());
        self.clients.insert(client.clone(), outbound);
        self.engine.broadcast(
            StyledText::new(format!("Welcome to the server, {client}."), Color::Red).bold(),
        );
        Ok(())
    }

    fn disconnect(&mut self, client: &str) {
        self.clients.remove(client);
        if let Some(entity) = self.engine.outbox_mut().dissociate_client(client) {
            info!(%client, %entity, "client disconnected");
        }
    }

    fn command(&mut self, client: &str, line: &str) -> RuntimeResult<()> {
        let Some(entity) = self.engine.outbox().entity_for(client).cloned() else {
            debug!(%client, "command from unattached client ignored");
            return Ok(());
        };
        let outcome = self.engine.parse(line, &entity)?;
        if outcome == Dispatch::Builtin(Builtin::Quit) {
            self.flush();
            let delivered = self
                .clients
                .get(client)
                .is_some_and(|outbound| outbound.send(Frame::disconnect()).is_ok());
            if !delivered {
                debug!(%client, "could not deliver disconnect frame");
            }
            self.disconnect(client);
        }
        Ok(())
    }

    /// Hand queued output to the per-client channels. A closed channel
    /// detaches its client.
    fn flush(&mut self) {
        let mut closed = Vec::new();
        for delivery in self.engine.drain_output() {
            let Some(outbound) = self.clients.get(&delivery.client) else {
                continue;
            };
            if outbound.send(Frame::output(delivery.message)).is_err() {
                closed.push(delivery.client);
            }
        }
        for client in closed {
            self.disconnect(&client);
        }
    }
}
