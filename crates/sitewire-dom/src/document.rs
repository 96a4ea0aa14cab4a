//! The document handle: element tree, queries, and event dispatch.
//!
//! [`Document`] is a cheap, cloneable handle. All clones share the same tree,
//! listener registry, and window state, so a handle can be moved into timer
//! tasks and event handlers freely. No lock is held while listeners run, which
//! lets handlers mutate the document they are dispatched on.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sitewire_core::SiteResult;

use crate::builder::ElementBuilder;
use crate::events::{
    Event, EventKind, EventTarget, ListenerId, ListenerOptions, ListenerRegistry,
};
use crate::node::{parse_style, Element, NodeId, Rect};
use crate::selector::{ElementSource, Selector};
use crate::window::WindowState;

pub(crate) struct Tree {
    pub(crate) nodes: Vec<Element>,
    pub(crate) root: NodeId,
    pub(crate) head: NodeId,
    pub(crate) body: NodeId,
    pub(crate) window: WindowState,
}

impl ElementSource for Tree {
    fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }
}

impl Tree {
    fn new(window: WindowState) -> Self {
        let mut nodes = vec![Element::new("html"), Element::new("head"), Element::new("body")];
        let (root, head, body) = (NodeId(0), NodeId(1), NodeId(2));
        nodes[0].children = vec![head, body];
        nodes[1].parent = Some(root);
        nodes[2].parent = Some(root);
        Self {
            nodes,
            root,
            head,
            body,
            window,
        }
    }

    fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.get(id).and_then(|el| el.parent);
        }
        false
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn is_inclusive_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|el| el.parent);
        }
        false
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(scope)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Unlinks `node` from its parent; returns the detached subtree.
    fn detach(&mut self, node: NodeId) -> Option<HashSet<NodeId>> {
        let parent = self.get(node)?.parent?;
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(el) = self.get_mut(node) {
            el.parent = None;
        }
        let mut subtree: HashSet<NodeId> = self.descendants(node).into_iter().collect();
        subtree.insert(node);
        Some(subtree)
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        let mut text = el.content.clone();
        for child in &el.children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    /// `option` descendants of a `select`, in document order.
    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|el| el.tag == "option"))
            .collect()
    }

    /// An option's value: its `value` attribute, else its collapsed text.
    fn option_value(&self, option: NodeId) -> String {
        if let Some(value) = self.get(option).and_then(|el| el.attributes.get("value")) {
            return value.clone();
        }
        self.text_content(option)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The first `option[selected]`, falling back to the first option.
    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options = self.options(select);
        options
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|el| el.attributes.contains_key("selected")))
            .or_else(|| options.first().copied())
    }

    /// The `value` property, resolving a `select` through its options.
    fn control_value(&self, node: NodeId) -> String {
        let Some(el) = self.get(node) else {
            return String::new();
        };
        if el.tag != "select" || el.value.is_some() {
            return el.value();
        }
        self.selected_option(node)
            .map(|option| self.option_value(option))
            .unwrap_or_default()
    }

    /// Selects the first option whose value is `value`; with no match nothing
    /// is selected and the value reads empty.
    fn select_value(&mut self, select: NodeId, value: &str) {
        let options = self.options(select);
        let matched = options.iter().copied().find(|id| self.option_value(*id) == value);
        for option in options {
            if let Some(el) = self.get_mut(option) {
                if Some(option) == matched {
                    el.attributes.insert("selected".to_string(), String::new());
                } else {
                    el.attributes.remove("selected");
                }
            }
        }
        if let Some(el) = self.get_mut(select) {
            el.value = if matched.is_some() { None } else { Some(String::new()) };
        }
    }
}

struct Shared {
    tree: RwLock<Tree>,
    listeners: ListenerRegistry,
    page_claimed: AtomicBool,
}

/// A handle to an in-memory page.
///
/// A fresh document contains `<html>`, `<head>`, and `<body>` and sits at
/// `http://localhost/`.
///
/// # Examples
///
/// ```
/// use sitewire_dom::{Document, Selector};
///
/// let doc = Document::new();
/// let form = doc.element("form").class("c-form").append_to(doc.body());
/// doc.element("input").id("email").class("c-form__input").append_to(form);
///
/// let inputs = doc.query_selector_all(&Selector::parse(".c-form input").unwrap());
/// assert_eq!(inputs.len(), 1);
/// assert_eq!(doc.id(inputs[0]), "email");
/// ```
#[derive(Clone)]
pub struct Document {
    shared: Arc<Shared>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.read();
        f.debug_struct("Document")
            .field("location", &tree.window.location.as_str())
            .field("nodes", &tree.nodes.len())
            .field("listeners", &self.shared.listeners.count())
            .finish()
    }
}

impl Document {
    /// Creates an empty document at `http://localhost/`.
    pub fn new() -> Self {
        Self::from_window(WindowState::default())
    }

    /// Creates an empty document at the given absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidUrl`](sitewire_core::SiteError::InvalidUrl)
    /// when `location` is not an absolute URL.
    pub fn with_location(location: &str) -> SiteResult<Self> {
        Ok(Self::from_window(WindowState::at(location)?))
    }

    fn from_window(window: WindowState) -> Self {
        Self {
            shared: Arc::new(Shared {
                tree: RwLock::new(Tree::new(window)),
                listeners: ListenerRegistry::new(),
                page_claimed: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.shared.tree.read().expect("document lock poisoned")
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.shared.tree.write().expect("document lock poisoned")
    }

    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.read().get(node).map(f)
    }

    fn with_element_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        self.write().get_mut(node).map(f)
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // ── Tree ─────────────────────────────────────────────────────────

    /// The `<html>` element.
    pub fn root(&self) -> NodeId {
        self.read().root
    }

    /// The `<head>` element.
    pub fn head(&self) -> NodeId {
        self.read().head
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.read().body
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.write();
        tree.nodes.push(Element::new(tag));
        NodeId(tree.nodes.len() - 1)
    }

    /// Creates a detached element and returns a builder for it.
    pub fn element(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder::new(self, self.create_element(tag))
    }

    /// Appends `child` to `parent`, moving it if it is attached elsewhere.
    ///
    /// Returns `false` (and changes nothing) if either node is unknown or if
    /// `child` is `parent` or one of its ancestors.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
        let mut tree = self.write();
        if tree.get(parent).is_none() || tree.get(child).is_none() {
            return false;
        }
        if tree.is_inclusive_descendant(child, parent) {
            return false;
        }
        tree.detach(child);
        if let Some(el) = tree.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(p) = tree.get_mut(parent) {
            p.children.push(child);
        }
        true
    }

    /// Removes `node` from its parent and drops the subtree's listeners.
    ///
    /// Removing a node that has no parent is a no-op returning `false`, so
    /// repeated removal is harmless.
    pub fn remove(&self, node: NodeId) -> bool {
        let subtree = {
            let mut tree = self.write();
            if node == tree.root {
                return false;
            }
            tree.detach(node)
        };
        match subtree {
            Some(nodes) => {
                self.shared.listeners.remove_targets(&nodes);
                true
            }
            None => false,
        }
    }

    /// The parent of `node`.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_element(node, |el| el.parent).flatten()
    }

    /// The element children of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_element(node, |el| el.children.clone())
            .unwrap_or_default()
    }

    /// Whether `node` is `ancestor` or a descendant of it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.read().is_inclusive_descendant(ancestor, node)
    }

    /// Whether `node` is attached to the document.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.read().is_connected(node)
    }

    // ── Element state ────────────────────────────────────────────────

    /// Lowercase tag name.
    pub fn tag_name(&self, node: NodeId) -> String {
        self.with_element(node, |el| el.tag.clone())
            .unwrap_or_default()
    }

    /// The `id` attribute, or an empty string.
    pub fn id(&self, node: NodeId) -> String {
        self.get_attribute(node, "id").unwrap_or_default()
    }

    /// Reads an attribute.
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |el| el.attribute(name)).flatten()
    }

    /// Sets an attribute. `class` and `style` update the class list and
    /// inline style.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_element_mut(node, |el| el.set_attribute(name, value));
    }

    /// Removes an attribute; returns whether it was present.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_element_mut(node, |el| el.remove_attribute(name))
            .unwrap_or(false)
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_element(node, |el| el.has_attribute(name))
            .unwrap_or(false)
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element(node, |el| el.has_class(class))
            .unwrap_or(false)
    }

    /// Adds a class; returns `false` if it was already present.
    pub fn add_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element_mut(node, |el| el.add_class(class))
            .unwrap_or(false)
    }

    /// Removes a class; returns `false` if it was absent.
    pub fn remove_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element_mut(node, |el| el.remove_class(class))
            .unwrap_or(false)
    }

    /// Toggles a class and returns whether it is now present.
    pub fn toggle_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element_mut(node, |el| {
            if el.remove_class(class) {
                false
            } else {
                el.add_class(class)
            }
        })
        .unwrap_or(false)
    }

    /// The class list in order.
    pub fn class_list(&self, node: NodeId) -> Vec<String> {
        self.with_element(node, |el| el.classes.clone())
            .unwrap_or_default()
    }

    /// Reads one inline style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |el| el.style.get(property).cloned())
            .flatten()
    }

    /// Sets one inline style property.
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_element_mut(node, |el| {
            el.style
                .insert(property.to_ascii_lowercase(), value.to_string());
        });
    }

    /// Replaces the inline style with a declaration list (`a:b;c:d`).
    pub fn set_style_text(&self, node: NodeId, css: &str) {
        self.with_element_mut(node, |el| el.style = parse_style(css));
    }

    /// Whether the element is shown, judged by its inline `display`.
    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.style(node, "display").as_deref() != Some("none")
    }

    /// Concatenated text of the element and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        self.read().text_content(node)
    }

    /// Replaces the element's content with text, removing its children.
    pub fn set_text_content(&self, node: NodeId, text: &str) {
        self.replace_content(node, text);
    }

    /// The element's own markup content.
    ///
    /// Markup is stored verbatim; child elements created through the tree
    /// API are not serialized into it.
    pub fn inner_html(&self, node: NodeId) -> String {
        self.with_element(node, |el| el.content.clone())
            .unwrap_or_default()
    }

    /// Replaces the element's content with markup, removing its children.
    pub fn set_inner_html(&self, node: NodeId, html: &str) {
        self.replace_content(node, html);
    }

    fn replace_content(&self, node: NodeId, content: &str) {
        let removed = {
            let mut tree = self.write();
            let children = match tree.get_mut(node) {
                Some(el) => {
                    el.content = content.to_string();
                    el.children.clone()
                }
                None => return,
            };
            let mut removed = HashSet::new();
            for child in children {
                if let Some(subtree) = tree.detach(child) {
                    removed.extend(subtree);
                }
            }
            removed
        };
        self.shared.listeners.remove_targets(&removed);
    }

    /// The control's current value.
    ///
    /// A `select` reads the value of its first selected option, or of its
    /// first option when none is marked `selected`.
    pub fn value(&self, node: NodeId) -> String {
        self.read().control_value(node)
    }

    /// Sets the control's current value without firing events.
    ///
    /// On a `select` this selects the matching option.
    pub fn set_value(&self, node: NodeId, value: &str) {
        let mut tree = self.write();
        if tree.get(node).is_some_and(|el| el.tag == "select") {
            tree.select_value(node, value);
        } else if let Some(el) = tree.get_mut(node) {
            el.value = Some(value.to_string());
        }
    }

    /// The control's checkedness.
    pub fn checked(&self, node: NodeId) -> bool {
        self.with_element(node, |el| el.checked)
            .unwrap_or(false)
    }

    /// Sets the control's checkedness without firing events.
    pub fn set_checked(&self, node: NodeId, checked: bool) {
        self.with_element_mut(node, |el| el.checked = checked);
    }

    /// The control's type (`text` for a bare input, `textarea`, `select-one`).
    pub fn input_type(&self, node: NodeId) -> String {
        self.with_element(node, Element::input_type)
            .unwrap_or_default()
    }

    /// Whether the `disabled` attribute is present.
    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    /// Adds or removes the `disabled` attribute.
    pub fn set_disabled(&self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    // ── Layout ───────────────────────────────────────────────────────

    /// The element's layout box in page coordinates.
    pub fn layout(&self, node: NodeId) -> Rect {
        self.with_element(node, |el| el.layout)
            .unwrap_or_default()
    }

    /// Assigns the element's layout box.
    pub fn set_layout(&self, node: NodeId, rect: Rect) {
        self.with_element_mut(node, |el| el.layout = rect);
    }

    /// Top edge relative to the viewport.
    pub fn bounding_client_top(&self, node: NodeId) -> f64 {
        let tree = self.read();
        tree.get(node).map_or(0.0, |el| el.layout.top) - tree.window.scroll_y
    }

    /// Rendered height.
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.layout(node).height
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// First connected element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        let tree = self.read();
        tree.descendants(tree.root)
            .into_iter()
            .find(|id| selector.matches(&*tree, *id))
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        let tree = self.read();
        tree.descendants(tree.root)
            .into_iter()
            .filter(|id| selector.matches(&*tree, *id))
            .collect()
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        let tree = self.read();
        tree.descendants(scope)
            .into_iter()
            .find(|id| selector.matches(&*tree, *id))
    }

    /// All descendants of `scope` matching `selector`.
    pub fn query_selector_all_in(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let tree = self.read();
        tree.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(&*tree, *id))
            .collect()
    }

    /// `node` itself or its nearest ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let tree = self.read();
        let mut current = Some(node);
        while let Some(id) = current {
            if selector.matches(&*tree, id) {
                return Some(id);
            }
            current = tree.get(id).and_then(|el| el.parent);
        }
        None
    }

    /// Whether `node` matches `selector`.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(&*self.read(), node)
    }

    /// The first connected element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.read();
        tree.descendants(tree.root).into_iter().find(|node| {
            tree.get(*node)
                .and_then(|el| el.attributes.get("id"))
                .is_some_and(|v| v == id)
        })
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Registers a listener.
    pub fn add_event_listener<F>(
        &self,
        target: impl Into<EventTarget>,
        kind: EventKind,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&Self, &mut Event) + Send + Sync + 'static,
    {
        self.add_event_listener_with(target, kind, ListenerOptions::default(), handler)
    }

    /// Registers a listener with options.
    pub fn add_event_listener_with<F>(
        &self,
        target: impl Into<EventTarget>,
        kind: EventKind,
        options: ListenerOptions,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&Self, &mut Event) + Send + Sync + 'static,
    {
        self.shared
            .listeners
            .add(target.into(), kind, options, Arc::new(handler))
    }

    /// Removes a listener; returns whether it was registered.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.count()
    }

    /// Number of listeners attached to `target`.
    pub fn listener_count_for(&self, target: impl Into<EventTarget>) -> usize {
        self.shared.listeners.count_for(target.into())
    }

    /// Dispatches `event` and returns it after propagation.
    ///
    /// Listeners on the target run first; bubbling kinds then visit each
    /// ancestor, the document, and the window (the last two only for
    /// connected nodes).
    pub fn dispatch(&self, mut event: Event) -> Event {
        let path = self.propagation_path(event.target(), event.kind().bubbles());
        for target in path {
            event.set_current_target(target);
            for handler in self.shared.listeners.take_handlers(target, event.kind()) {
                handler(self, &mut event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event
    }

    fn propagation_path(&self, target: EventTarget, bubbles: bool) -> Vec<EventTarget> {
        let mut path = vec![target];
        if !bubbles {
            return path;
        }
        match target {
            EventTarget::Node(node) => {
                let tree = self.read();
                let mut current = tree.get(node).and_then(|el| el.parent);
                while let Some(id) = current {
                    path.push(EventTarget::Node(id));
                    current = tree.get(id).and_then(|el| el.parent);
                }
                if tree.is_connected(node) {
                    path.push(EventTarget::Document);
                    path.push(EventTarget::Window);
                }
            }
            EventTarget::Document => path.push(EventTarget::Window),
            EventTarget::Window => {}
        }
        path
    }

    /// Dispatches a click on `node`.
    pub fn click(&self, node: NodeId) -> Event {
        self.dispatch(Event::new(EventKind::Click, node))
    }

    /// Dispatches a blur on `node`.
    pub fn blur(&self, node: NodeId) -> Event {
        self.dispatch(Event::new(EventKind::Blur, node))
    }

    /// Sets the control's value and dispatches an input event, as typing would.
    pub fn type_text(&self, node: NodeId, value: &str) -> Event {
        self.set_value(node, value);
        self.dispatch(Event::new(EventKind::Input, node))
    }

    /// Dispatches a submit on `form`.
    pub fn submit(&self, form: NodeId) -> Event {
        self.dispatch(Event::new(EventKind::Submit, form))
    }

    /// Dispatches a keydown on the document.
    pub fn key_down(&self, key: &str) -> Event {
        self.dispatch(Event::key_down(key))
    }

    /// Dispatches a load error on `node`.
    pub fn fire_error(&self, node: NodeId) -> Event {
        self.dispatch(Event::new(EventKind::Error, node))
    }

    // ── Page ownership ───────────────────────────────────────────────

    /// Marks the document as owned by a page runtime.
    ///
    /// Returns `false` if another runtime already holds it.
    pub fn try_claim_page(&self) -> bool {
        self.shared
            .page_claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Releases the page-runtime claim.
    pub fn release_page(&self) {
        self.shared.page_claimed.store(false, Ordering::Release);
    }
}
