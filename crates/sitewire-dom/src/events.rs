//! Event types and the listener registry.
//!
//! Listeners are registered per target and event kind and receive the
//! [`Document`] they were dispatched on, so handlers never need to capture
//! the document themselves. Registration returns a [`ListenerId`] that can
//! be used to remove the listener again; [`ListenerSet`] removes a batch of
//! listeners when it is dropped.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::document::Document;
use crate::node::NodeId;

/// The kinds of events the document model dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer activation.
    Click,
    /// A control lost focus.
    Blur,
    /// A control's value changed through user input.
    Input,
    /// A form is being submitted.
    Submit,
    /// A key was pressed.
    KeyDown,
    /// The window scrolled.
    Scroll,
    /// The window was resized.
    Resize,
    /// A resource (such as an image) failed to load.
    Error,
}

impl EventKind {
    /// Whether events of this kind propagate to ancestors.
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::Input | Self::Submit | Self::KeyDown)
    }

    /// The host event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Blur => "blur",
            Self::Input => "input",
            Self::Submit => "submit",
            Self::KeyDown => "keydown",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event is dispatched or a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// An element.
    Node(NodeId),
    /// The document itself.
    Document,
    /// The window.
    Window,
}

impl From<NodeId> for EventTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: EventTarget,
    current_target: EventTarget,
    key: Option<String>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Creates an event of `kind` aimed at `target`.
    pub fn new(kind: EventKind, target: impl Into<EventTarget>) -> Self {
        let target = target.into();
        Self {
            kind,
            target,
            current_target: target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Creates a keydown event for `key` aimed at the document.
    pub fn key_down(key: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::KeyDown, EventTarget::Document);
        event.key = Some(key.into());
        event
    }

    /// The event kind.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The original target.
    pub const fn target(&self) -> EventTarget {
        self.target
    }

    /// The original target when it is an element.
    pub const fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The target whose listeners are currently running.
    pub const fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, target: EventTarget) {
        self.current_target = target;
    }

    /// The key for keyboard events.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Cancels the host's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stops propagation after the current target's listeners have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// A registered event handler.
pub type Listener = Arc<dyn Fn(&Document, &mut Event) + Send + Sync>;

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registration options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Remove the listener after its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a listener that fires at most once.
    pub const fn once() -> Self {
        Self { once: true }
    }
}

struct Entry {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    once: bool,
    handler: Listener,
}

/// All listeners of one document, in registration order.
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn add(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenerOptions,
        handler: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .expect("listener lock poisoned")
            .push(Entry {
                id,
                target,
                kind,
                once: options.once,
                handler,
            });
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write().expect("listener lock poisoned");
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() < before
    }

    /// Drops every listener attached to one of `nodes`.
    pub(crate) fn remove_targets(&self, nodes: &HashSet<NodeId>) {
        if nodes.is_empty() {
            return;
        }
        self.entries
            .write()
            .expect("listener lock poisoned")
            .retain(|entry| match entry.target {
                EventTarget::Node(node) => !nodes.contains(&node),
                _ => true,
            });
    }

    /// Snapshot of the handlers for one target and kind.
    ///
    /// `once` listeners are removed as part of taking the snapshot.
    pub(crate) fn take_handlers(&self, target: EventTarget, kind: EventKind) -> Vec<Listener> {
        let mut entries = self.entries.write().expect("listener lock poisoned");
        let handlers = entries
            .iter()
            .filter(|entry| entry.target == target && entry.kind == kind)
            .map(|entry| Arc::clone(&entry.handler))
            .collect();
        entries.retain(|entry| !(entry.once && entry.target == target && entry.kind == kind));
        handlers
    }

    pub(crate) fn count(&self) -> usize {
        self.entries.read().expect("listener lock poisoned").len()
    }

    pub(crate) fn count_for(&self, target: EventTarget) -> usize {
        self.entries
            .read()
            .expect("listener lock poisoned")
            .iter()
            .filter(|entry| entry.target == target)
            .count()
    }
}

/// Owns a group of listeners and removes them when dropped.
///
/// Every behaviour returns one of these (directly or wrapped) so the caller
/// controls how long the behaviour stays attached.
pub struct ListenerSet {
    document: Document,
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    /// Creates an empty set bound to `document`.
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            ids: Vec::new(),
        }
    }

    /// Takes ownership of a registered listener.
    pub fn push(&mut self, id: ListenerId) {
        self.ids.push(id);
    }

    /// Number of listeners still owned.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set owns no listeners.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Removes all owned listeners now.
    pub fn dispose(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        for id in self.ids.drain(..) {
            self.document.remove_event_listener(id);
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.ids.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubbling_kinds() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::Submit.bubbles());
        assert!(!EventKind::Blur.bubbles());
        assert!(!EventKind::Scroll.bubbles());
        assert!(!EventKind::Error.bubbles());
    }

    #[test]
    fn test_event_flags() {
        let mut event = Event::new(EventKind::Submit, NodeId(3));
        assert_eq!(event.target_node(), Some(NodeId(3)));
        assert!(!event.default_prevented());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }

    #[test]
    fn test_key_down_event() {
        let event = Event::key_down("Escape");
        assert_eq!(event.key(), Some("Escape"));
        assert_eq!(event.target(), EventTarget::Document);
        assert_eq!(event.kind().to_string(), "keydown");
    }

    #[test]
    fn test_registry_once_removed_on_take() {
        let registry = ListenerRegistry::new();
        let noop: Listener = Arc::new(|_, _| {});
        registry.add(
            EventTarget::Window,
            EventKind::Scroll,
            ListenerOptions::once(),
            Arc::clone(&noop),
        );
        registry.add(
            EventTarget::Window,
            EventKind::Scroll,
            ListenerOptions::default(),
            noop,
        );
        assert_eq!(registry.take_handlers(EventTarget::Window, EventKind::Scroll).len(), 2);
        assert_eq!(registry.take_handlers(EventTarget::Window, EventKind::Scroll).len(), 1);
    }

    #[test]
    fn test_registry_remove_targets() {
        let registry = ListenerRegistry::new();
        let noop: Listener = Arc::new(|_, _| {});
        registry.add(
            EventTarget::Node(NodeId(1)),
            EventKind::Click,
            ListenerOptions::default(),
            Arc::clone(&noop),
        );
        let kept = registry.add(
            EventTarget::Document,
            EventKind::Click,
            ListenerOptions::default(),
            noop,
        );
        registry.remove_targets(&[NodeId(1)].into_iter().collect());
        assert_eq!(registry.count(), 1);
        assert!(registry.remove(kept));
        assert!(!registry.remove(kept));
    }
}
