//! Arena-backed in-memory document.
//!
//! Implements [`DocumentPort`] over a generational arena so that handles
//! to removed elements go stale instead of aliasing new ones.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::Markup;
use crate::infrastructure::traits::{
    DocumentError, DocumentPort, DocumentResult, Event, EventKind, Listener, ListenerId, NodeId,
    Selector, LIST_ITEM_CLASS,
};

/// One element in the arena.
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<Index>,
    children: Vec<Index>,
    listeners: Vec<(ListenerId, EventKind, Listener)>,
}

impl Element {
    fn from_markup(markup: &Markup, parent: Option<Index>) -> Self {
        Self {
            tag: markup.tag.clone(),
            attrs: markup.attrs.clone(),
            classes: markup.classes.clone(),
            style: BTreeMap::new(),
            text: markup.text.clone(),
            parent,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

struct Inner {
    arena: Arena<Element>,
    root: Index,
    focused: Option<Index>,
    next_listener: u64,
}

impl Inner {
    fn get(&self, node: NodeId) -> DocumentResult<&Element> {
        self.arena.get(node.0).ok_or(DocumentError::NodeGone(node))
    }

    fn get_mut(&mut self, node: NodeId) -> DocumentResult<&mut Element> {
        self.arena
            .get_mut(node.0)
            .ok_or(DocumentError::NodeGone(node))
    }

    /// Allocate `markup` and its children; returns the subtree root.
    fn build(&mut self, markup: &Markup, parent: Option<Index>) -> Index {
        let idx = self.arena.insert(Element::from_markup(markup, parent));
        for child in &markup.children {
            let child_idx = self.build(child, Some(idx));
            if let Some(element) = self.arena.get_mut(idx) {
                element.children.push(child_idx);
            }
        }
        idx
    }

    /// Rebuild the markup of the subtree at `idx`.
    fn markup(&self, idx: Index) -> Option<Markup> {
        let element = self.arena.get(idx)?;
        Some(Markup {
            tag: element.tag.clone(),
            attrs: element.attrs.clone(),
            classes: element.classes.clone(),
            text: element.text.clone(),
            children: element
                .children
                .iter()
                .filter_map(|&child| self.markup(child))
                .collect(),
        })
    }

    /// Pre-order walk below (and including) `start`.
    fn preorder(&self, start: Index) -> Vec<Index> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.arena.get(current) {
                order.push(current);
                // Push children in reverse order for left-to-right traversal
                for &child in element.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        order
    }
}

/// In-memory document with a synthetic root element.
pub struct MemoryDocument {
    inner: RefCell<Inner>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty document with a `<nav>` root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Element::from_markup(&Markup::element("nav"), None));
        Self {
            inner: RefCell::new(Inner {
                arena,
                root,
                focused: None,
                next_listener: 0,
            }),
        }
    }

    /// Navigation drawer fixture: a home item, the anchor and a calendar item.
    pub fn nav_drawer(anchor_key: &str, anchor_label: &str) -> Self {
        let doc = Self::new();
        let root = doc.root();
        let item = |key: &str, label: &str| {
            Markup::element("a")
                .with_class(LIST_ITEM_CLASS)
                .with_attr("data-key", key)
                .with_attr("href", format!("#{}", key))
                .with_text(label)
        };
        doc.append_child(root, &item("home", "Dashboard"));
        doc.append_child(root, &item(anchor_key, anchor_label));
        doc.append_child(root, &item("calendar", "Calendar"));
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(self.inner.borrow().root)
    }

    /// Append `markup` as the last child of `parent`.
    pub fn append_child(&self, parent: NodeId, markup: &Markup) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let idx = inner.build(markup, Some(parent.0));
        match inner.arena.get_mut(parent.0) {
            Some(element) => element.children.push(idx),
            None => {
                inner.arena.remove(idx);
            }
        }
        NodeId(idx)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        inner
            .arena
            .get(node.0)
            .map(|element| element.children.iter().map(|&c| NodeId(c)).collect())
            .unwrap_or_default()
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .get(node)
            .ok()
            .and_then(|e| e.text.clone())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner
            .borrow()
            .get(node)
            .ok()
            .and_then(|e| e.style.get(property).cloned())
    }

    pub fn focus(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if inner.arena.contains(node.0) {
            inner.focused = Some(node.0);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.borrow().focused.map(NodeId)
    }

    /// Number of elements, root included.
    pub fn len(&self) -> usize {
        self.inner.borrow().arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner
            .borrow()
            .get(node)
            .map(|e| e.listeners.len())
            .unwrap_or(0)
    }

    /// Structural fingerprint: one line per element in document order,
    /// with depth, tag, classes and attributes. Handles are not included.
    pub fn outline(&self) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut lines = Vec::new();
        let mut stack = vec![(inner.root, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            if let Some(element) = inner.arena.get(current) {
                let mut line = format!("{}{}", "  ".repeat(depth), element.tag);
                for class in &element.classes {
                    let _ = write!(line, ".{}", class);
                }
                for (name, value) in &element.attrs {
                    let _ = write!(line, " {}={}", name, value);
                }
                if let Some(text) = &element.text {
                    let _ = write!(line, " '{}'", text);
                }
                lines.push(line);
                for &child in element.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        lines
    }

    /// Serialize the document as HTML.
    pub fn to_html(&self) -> String {
        let inner = self.inner.borrow();
        inner
            .markup(inner.root)
            .map(|markup| markup.to_string())
            .unwrap_or_default()
    }

    /// Tree view of the menu items: labels with their state attributes.
    pub fn to_tree(&self) -> Tree<String> {
        let inner = self.inner.borrow();

        fn label(element: &Element) -> String {
            let mut label = element.text.clone().unwrap_or_else(|| element.tag.clone());
            let shown = [
                "data-key",
                "id",
                "data-past",
                "data-hidden",
                "data-collapse",
                "aria-expanded",
            ];
            let mut attrs = Vec::new();
            for name in shown {
                if let Some(value) = element.attrs.get(name) {
                    attrs.push(format!("{}={}", name, value));
                }
            }
            if !attrs.is_empty() {
                let _ = write!(label, " [{}]", attrs.join(" "));
            }
            label
        }

        fn build_tree(inner: &Inner, idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(element) = inner.arena.get(idx) {
                for &child_idx in &element.children {
                    if let Some(child) = inner.arena.get(child_idx) {
                        // Icons are decoration, not menu structure
                        if child.tag == "i" {
                            continue;
                        }
                        let mut child_tree = Tree::new(label(child));
                        build_tree(inner, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new("nav".to_string());
        build_tree(&inner, inner.root, &mut tree);
        tree
    }
}

impl DocumentPort for MemoryDocument {
    #[instrument(level = "trace", skip(self, selector), fields(selector = %selector))]
    fn query(&self, selector: &Selector) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        inner
            .preorder(inner.root)
            .into_iter()
            .filter(|&idx| {
                inner.arena.get(idx).is_some_and(|element| {
                    selector.matches(
                        |class| element.classes.contains(class),
                        |name| element.attrs.get(name).cloned(),
                    )
                })
            })
            .map(NodeId)
            .collect()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().arena.contains(node.0)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().get(node).ok().map(|e| e.tag.clone())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .get(node)
            .ok()
            .and_then(|e| e.attrs.get(name).cloned())
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) -> DocumentResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner
            .get_mut(node)?
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add_class(&self, node: NodeId, class: &str) -> DocumentResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.get_mut(node)?.classes.insert(class.to_string());
        Ok(())
    }

    fn remove_class(&self, node: NodeId, class: &str) -> DocumentResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.get_mut(node)?.classes.remove(class);
        Ok(())
    }

    fn find_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        inner
            .preorder(node.0)
            .into_iter()
            .skip(1)
            .filter(|&idx| {
                inner
                    .arena
                    .get(idx)
                    .is_some_and(|e| e.classes.contains(class))
            })
            .map(NodeId)
            .collect()
    }

    fn set_style(&self, node: NodeId, property: &str, value: Option<&str>) -> DocumentResult<()> {
        let mut inner = self.inner.borrow_mut();
        let element = inner.get_mut(node)?;
        match value {
            Some(value) => {
                element.style.insert(property.into(), value.into());
            }
            None => {
                element.style.remove(property);
            }
        }
        Ok(())
    }

    fn blur(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if inner.focused == Some(node.0) {
            inner.focused = None;
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn remove(&self, node: NodeId) -> DocumentResult<()> {
        let mut inner = self.inner.borrow_mut();
        let parent = inner.get(node)?.parent;
        if let Some(parent) = parent.and_then(|p| inner.arena.get_mut(p)) {
            parent.children.retain(|&c| c != node.0);
        }
        for idx in inner.preorder(node.0) {
            if inner.focused == Some(idx) {
                inner.focused = None;
            }
            inner.arena.remove(idx);
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self, markup), fields(tag = %markup.tag))]
    fn insert_after(&self, node: NodeId, markup: &Markup) -> DocumentResult<NodeId> {
        let mut inner = self.inner.borrow_mut();
        let parent = inner
            .get(node)?
            .parent
            .ok_or(DocumentError::NoParent(node))?;
        let idx = inner.build(markup, Some(parent));
        let siblings = &mut inner.get_mut(NodeId(parent))?.children;
        let position = siblings
            .iter()
            .position(|&c| c == node.0)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(position, idx);
        Ok(NodeId(idx))
    }

    fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        listener: Listener,
    ) -> DocumentResult<ListenerId> {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener);
        inner.get_mut(node)?.listeners.push((id, kind, listener));
        inner.next_listener += 1;
        Ok(id)
    }

    fn remove_listener(&self, node: NodeId, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.get_mut(node) {
            Ok(element) => {
                let before = element.listeners.len();
                element.listeners.retain(|(lid, _, _)| *lid != id);
                element.listeners.len() != before
            }
            Err(_) => false,
        }
    }

    fn dispatch(&self, node: NodeId, event: &Event) -> bool {
        // Listeners re-enter the document, so no borrow may be held while they run
        let listeners: Vec<Listener> = match self.inner.borrow().get(node) {
            Ok(element) => element
                .listeners
                .iter()
                .filter(|(_, kind, _)| *kind == event.kind())
                .map(|(_, _, listener)| listener.clone())
                .collect(),
            Err(_) => Vec::new(),
        };
        for listener in listeners {
            listener(self, node, event);
        }
        event.default_prevented()
    }
}
