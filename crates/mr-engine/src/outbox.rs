//! The output boundary between the engine and whatever displays text.
//!
//! Handlers write through [`OutputSink`]. The engine's sink is an
//! [`Outbox`]: it maps entities to clients and queues deliveries until
//! the host drains them.

use std::collections::{BTreeMap, HashMap};

use mr_core::{EntityId, Message};
use tracing::trace;

/// Identifier the host uses for a connected client (a username, a
/// connection number, "local" for the terminal).
pub type ClientId = String;

/// Where skill, reaction, and script output goes.
pub trait OutputSink {
    /// Deliver to the client associated with `entity`. Dropped silently when
    /// no client is associated.
    fn send_to(&mut self, entity: &EntityId, message: Message);

    /// Deliver to every associated client exactly once.
    fn broadcast(&mut self, message: Message);
}

/// One queued message for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub client: ClientId,
    /// What to show.
    pub message: Message,
}

/// Association table plus delivery queue.
#[derive(Debug, Default)]
pub struct Outbox {
    entity_to_client: HashMap<EntityId, ClientId>,
    client_to_entity: BTreeMap<ClientId, EntityId>,
    queue: Vec<Delivery>,
}

impl Outbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route output for `entity` to `client`. Any previous association of
    /// either side is replaced.
    pub fn associate(&mut self, entity: EntityId, client: impl Into<ClientId>) {
        let client = client.into();
        self.dissociate_entity(&entity);
        self.dissociate_client(&client);
        self.entity_to_client.insert(entity.clone(), client.clone());
        self.client_to_entity.insert(client, entity);
    }

    /// Forget a client. Returns the entity it was attached to. The entity
    /// itself is untouched.
    pub fn dissociate_client(&mut self, client: &str) -> Option<EntityId> {
        let entity = self.client_to_entity.remove(client)?;
        self.entity_to_client.remove(&entity);
        Some(entity)
    }

    /// Forget whichever client is attached to `entity`.
    pub fn dissociate_entity(&mut self, entity: &EntityId) -> Option<ClientId> {
        let client = self.entity_to_client.remove(entity)?;
        self.client_to_entity.remove(&client);
        Some(client)
    }

    /// The client attached to an entity.
    pub fn client_for(&self, entity: &EntityId) -> Option<&ClientId> {
        self.entity_to_client.get(entity)
    }

    /// The entity a client controls.
    pub fn entity_for(&self, client: &str) -> Option<&EntityId> {
        self.client_to_entity.get(client)
    }

    /// Number of associated clients.
    pub fn client_count(&self) -> usize {
        self.client_to_entity.len()
    }

    /// Deliveries waiting to be drained.
    pub fn pending(&self) -> &[Delivery] {
        &self.queue
    }

    /// Take every queued delivery, oldest first.
    pub fn drain(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.queue)
    }
}

impl OutputSink for Outbox {
    fn send_to(&mut self, entity: &EntityId, message: Message) {
        match self.entity_to_client.get(entity) {
            Some(client) => self.queue.push(Delivery {
                client: client.clone(),
                message,
            }),
            None => trace!(%entity, "no client associated, message dropped"),
        }
    }

    fn broadcast(&mut self, message: Message) {
        for client in self.client_to_entity.keys() {
            self.queue.push(Delivery {
                client: client.clone(),
                message: message.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_to_unassociated_entity_is_dropped() {
        let mut outbox = Outbox::new();
        outbox.send_to(&"ghost".into(), "boo".into());
        assert!(outbox.pending().is_empty());
    }

    #[test]
    fn send_to_reaches_associated_client() {
        let mut outbox = Outbox::new();
        outbox.associate("hero".into(), "alice");
        outbox.send_to(&"hero".into(), "hello".into());
        let drained = outbox.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].client, "alice");
        assert_eq!(drained[0].message, Message::from("hello"));
        assert!(outbox.pending().is_empty());
    }

    #[test]
    fn broadcast_reaches_each_client_once() {
        let mut outbox = Outbox::new();
        outbox.associate("hero".into(), "alice");
        outbox.associate("villain".into(), "bob");
        // Re-associating alice moves her; she must not receive twice.
        outbox.associate("sidekick".into(), "alice");
        outbox.broadcast("welcome".into());

        let clients: Vec<_> = outbox.drain().into_iter().map(|d| d.client).collect();
        assert_eq!(clients, vec!["alice".to_string(), "bob".to_string()]);
        assert!(outbox.client_for(&"hero".into()).is_none());
    }

    #[test]
    fn dissociate_client_returns_entity() {
        let mut outbox = Outbox::new();
        outbox.associate("hero".into(), "alice");
        assert_eq!(outbox.dissociate_client("alice"), Some("hero".into()));
        assert_eq!(outbox.dissociate_client("alice"), None);
        assert_eq!(outbox.client_count(), 0);
        outbox.send_to(&"hero".into(), "gone".into());
        assert!(outbox.pending().is_empty());
    }

    #[test]
    fn associating_taken_entity_moves_it() {
        let mut outbox = Outbox::new();
        outbox.associate("hero".into(), "alice");
        outbox.associate("hero".into(), "bob");
        assert_eq!(outbox.client_for(&"hero".into()), Some(&"bob".to_string()));
        assert!(outbox.entity_for("alice").is_none());
    }
}
