use std::collections::BTreeMap;

use mr_core::{EntityId, ListenerRecord, Mapping};

/// Name of the built-in event fired by [`crate::Engine::tick`].
pub const TICK_EVENT: &str = "tick";

/// The value carried to scripts when an event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// The built-in tick.
    Tick {
        /// Accumulated simulated seconds after this tick.
        time: f64,
    },
    /// A content-defined event.
    Custom {
        /// Free-form data chosen by whoever fired the event.
        data: Mapping,
    },
}

impl EventPayload {
    /// The simulated time, if this is a tick.
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::Tick { time } => Some(*time),
            Self::Custom { .. } => None,
        }
    }
}

/// One (listener, script) pair bound to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerBinding {
    /// The entity the script runs on behalf of.
    pub listener: EntityId,
    /// Name of the script, resolved against the catalog when the event fires.
    pub script: String,
}

impl ListenerBinding {
    /// Create a binding.
    pub fn new(listener: impl Into<EntityId>, script: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            script: script.into(),
        }
    }
}

impl From<&ListenerBinding> for ListenerRecord {
    fn from(binding: &ListenerBinding) -> Self {
        Self {
            listener: binding.listener.clone(),
            script: binding.script.clone(),
        }
    }
}

impl From<ListenerRecord> for ListenerBinding {
    fn from(record: ListenerRecord) -> Self {
        Self {
            listener: record.listener,
            script: record.script,
        }
    }
}

/// Event name to ordered bindings. Pure data; scripts are looked up by name
/// only when an event fires.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    bindings: BTreeMap<String, Vec<ListenerBinding>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding to an event.
    pub fn register(&mut self, event: impl Into<String>, binding: ListenerBinding) {
        self.bindings.entry(event.into()).or_default().push(binding);
    }

    /// Remove every binding of `script` for `listener` on `event`.
    /// Returns how many were removed.
    pub fn unregister(&mut self, event: &str, listener: &EntityId, script: &str) -> usize {
        let Some(list) = self.bindings.get_mut(event) else {
            return 0;
        };
        let before = list.len();
        list.retain(|b| !(b.listener == *listener && b.script == script));
        let removed = before - list.len();
        if list.is_empty() {
            self.bindings.remove(event);
        }
        removed
    }

    /// Remove every binding held by `listener`, on every event.
    pub fn unregister_listener(&mut self, listener: &EntityId) -> usize {
        let mut removed = 0;
        for list in self.bindings.values_mut() {
            let before = list.len();
            list.retain(|b| b.listener != *listener);
            removed += before - list.len();
        }
        self.bindings.retain(|_, list| !list.is_empty());
        removed
    }

    /// Bindings for an event, in registration order.
    pub fn bindings(&self, event: &str) -> &[ListenerBinding] {
        self.bindings.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All events with at least one binding.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ListenerBinding])> {
        self.bindings
            .iter()
            .map(|(event, list)| (event.as_str(), list.as_slice()))
    }

    /// Total number of bindings across all events.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Whether no event has any binding.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_keep_registration_order() {
        let mut bus = EventBus::new();
        bus.register("tick", ListenerBinding::new("b", "second"));
        bus.register("tick", ListenerBinding::new("a", "first"));
        let scripts: Vec<_> = bus.bindings("tick").iter().map(|b| b.script.as_str()).collect();
        assert_eq!(scripts, vec!["second", "first"]);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn unknown_event_has_no_bindings() {
        let bus = EventBus::new();
        assert!(bus.bindings("tick").is_empty());
        assert!(bus.is_empty());
    }

    #[test]
    fn unregister_removes_matching_pairs_only() {
        let mut bus = EventBus::new();
        bus.register("tick", ListenerBinding::new("shouter", "shout"));
        bus.register("tick", ListenerBinding::new("shouter", "wander"));
        bus.register("tick", ListenerBinding::new("guard", "shout"));

        assert_eq!(bus.unregister("tick", &"shouter".into(), "shout"), 1);
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.unregister("dawn", &"shouter".into(), "shout"), 0);
    }

    #[test]
    fn unregister_listener_clears_every_event() {
        let mut bus = EventBus::new();
        bus.register("tick", ListenerBinding::new("shouter", "shout"));
        bus.register("dawn", ListenerBinding::new("shouter", "wake"));
        bus.register("dawn", ListenerBinding::new("guard", "wake"));

        assert_eq!(bus.unregister_listener(&"shouter".into()), 2);
        assert!(bus.bindings("tick").is_empty());
        assert_eq!(bus.bindings("dawn").len(), 1);
        assert_eq!(bus.iter().count(), 1);
    }

    #[test]
    fn tick_payload_exposes_time() {
        assert_eq!(EventPayload::Tick { time: 1.5 }.time(), Some(1.5));
        let custom = EventPayload::Custom {
            data: Mapping::new(),
        };
        assert_eq!(custom.time(), None);
    }
}
