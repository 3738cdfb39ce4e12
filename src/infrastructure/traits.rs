//! Host boundary traits for testability
//!
//! These traits abstract the host document, the template renderer and the
//! clock, allowing the engine to run against in-memory implementations.
//! Everything runs on one cooperative UI thread, so the ports are `!Send`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use generational_arena::Index;
use thiserror::Error;

use crate::domain::{DataRecord, Markup};

/// Class shared by every menu item in the navigation list.
pub const LIST_ITEM_CLASS: &str = "list-group-item";

/// Opaque handle to a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

/// Handle to a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Document mutation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("node no longer in document: {0:?}")]
    NodeGone(NodeId),

    #[error("node has no parent to insert into: {0:?}")]
    NoParent(NodeId),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    Present,
    Equals(String),
}

/// Attribute/class selector, the subset of CSS the engine needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub class: Option<String>,
    pub attrs: Vec<(String, AttrMatch)>,
}

impl Selector {
    /// Any element.
    pub fn any() -> Self {
        Self::default()
    }

    /// Elements carrying the menu item class.
    pub fn list_item() -> Self {
        Self {
            class: Some(LIST_ITEM_CLASS.to_string()),
            attrs: Vec::new(),
        }
    }

    pub fn attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push((name.to_string(), AttrMatch::Equals(value.to_string())));
        self
    }

    pub fn has_attr(mut self, name: &str) -> Self {
        self.attrs.push((name.to_string(), AttrMatch::Present));
        self
    }

    pub fn matches(
        &self,
        has_class: impl Fn(&str) -> bool,
        attr: impl Fn(&str) -> Option<String>,
    ) -> bool {
        if let Some(class) = &self.class {
            if !has_class(class) {
                return false;
            }
        }
        self.attrs.iter().all(|(name, expected)| {
            let value = attr(name);
            match expected {
                AttrMatch::Present => value.is_some(),
                AttrMatch::Equals(want) => value.as_deref() == Some(want.as_str()),
            }
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, ".{}", class)?,
            None => write!(f, "*")?,
        }
        for (name, expected) in &self.attrs {
            match expected {
                AttrMatch::Present => write!(f, "[{}]", name)?,
                AttrMatch::Equals(value) => write!(f, "[{}=\"{}\"]", name, value)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    MouseDown,
    MouseUp,
}

/// A dispatched UI event.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    key: Option<String>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    pub fn key_down(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventKind::KeyDown)
        }
    }

    pub fn mouse_down() -> Self {
        Self::new(EventKind::MouseDown)
    }

    pub fn mouse_up() -> Self {
        Self::new(EventKind::MouseUp)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Event callback: receives the document, the current target and the event.
pub type Listener = Rc<dyn Fn(&dyn DocumentPort, NodeId, &Event)>;

/// Host document abstraction.
///
/// Methods take `&self`; implementations use interior mutability, since
/// listeners mutate the document from inside `dispatch`.
pub trait DocumentPort {
    /// All matching elements in document order.
    fn query(&self, selector: &Selector) -> Vec<NodeId>;

    /// First matching element in document order.
    fn query_one(&self, selector: &Selector) -> Option<NodeId> {
        self.query(selector).into_iter().next()
    }

    fn contains(&self, node: NodeId) -> bool;

    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attr(&self, node: NodeId, name: &str, value: &str) -> DocumentResult<()>;

    fn add_class(&self, node: NodeId, class: &str) -> DocumentResult<()>;

    fn remove_class(&self, node: NodeId, class: &str) -> DocumentResult<()>;

    /// Descendants of `node` carrying `class`, in document order.
    fn find_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId>;

    /// Set an inline style property; `None` clears it.
    fn set_style(&self, node: NodeId, property: &str, value: Option<&str>) -> DocumentResult<()>;

    fn blur(&self, node: NodeId);

    /// Remove `node` and its subtree.
    fn remove(&self, node: NodeId) -> DocumentResult<()>;

    /// Materialize `markup` as the next sibling of `node`.
    fn insert_after(&self, node: NodeId, markup: &Markup) -> DocumentResult<NodeId>;

    fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        listener: Listener,
    ) -> DocumentResult<ListenerId>;

    /// Returns false when the listener was not registered on `node`.
    fn remove_listener(&self, node: NodeId, id: ListenerId) -> bool;

    /// Run the target's listeners for the event kind.
    /// Returns true when a listener prevented the default action.
    fn dispatch(&self, node: NodeId, event: &Event) -> bool;
}

/// Template rendering failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Asynchronous template renderer.
#[async_trait(?Send)]
pub trait Renderer {
    async fn render(&self, template: &str, data: &DataRecord) -> Result<Markup, RenderError>;
}

/// Time source for end-date classification.
pub trait Clock {
    fn now_epoch_seconds(&self) -> i64;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}
