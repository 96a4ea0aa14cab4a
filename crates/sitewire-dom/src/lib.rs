//! # sitewire-dom
//!
//! In-memory document model that page behaviours are written against. It
//! provides an element tree with CSS-selector queries, event listeners with
//! bubbling, and window state (scroll offset, viewport, location, local
//! storage).
//!
//! ## Modules
//!
//! - [`document`] - The [`Document`] handle, tree operations, queries, dispatch
//! - [`selector`] - Selector parsing and matching
//! - [`events`] - Event types, listener registration, [`ListenerSet`]
//! - [`window`] - Scrolling, viewport, location, storage
//! - [`form_data`] - [`FormPayload`] snapshots of form controls
//! - [`timers`] - `set_timeout`, [`Throttle`], [`Debounce`]

pub mod builder;
pub mod document;
pub mod events;
pub mod form_data;
mod node;
pub mod selector;
pub mod timers;
pub mod window;

pub use builder::ElementBuilder;
pub use document::Document;
pub use events::{Event, EventKind, EventTarget, Listener, ListenerId, ListenerOptions, ListenerSet};
pub use form_data::FormPayload;
pub use node::{NodeId, Rect};
pub use selector::Selector;
pub use timers::{set_timeout, Debounce, Throttle};
pub use window::{ScrollBehavior, ScrollRequest};
