//! Disclosure wiring: click/Enter handling, ARIA attributes, keyboard access.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{IdAllocator, ToggleEvent, ToggleState};
use crate::infrastructure::traits::{
    DocumentError, DocumentPort, DocumentResult, Event, EventKind, Listener, ListenerId, NodeId,
    Selector,
};

/// Elements whose visibility follows the disclosure state.
pub fn controlled_selector() -> Selector {
    Selector::list_item().attr_eq("data-past", "true")
}

/// Read the node's state from `data-collapse`.
pub fn current_state(doc: &dyn DocumentPort, node: NodeId) -> ToggleState {
    ToggleState::from_attr(doc.attr(node, "data-collapse").as_deref())
}

/// Write every attribute derived from `state`.
pub fn apply_state(doc: &dyn DocumentPort, node: NodeId, state: ToggleState) -> DocumentResult<()> {
    for controlled in doc.query(&controlled_selector()) {
        doc.set_attr(controlled, "data-hidden", state.hidden_attr())?;
    }
    doc.set_attr(node, "data-collapse", state.collapse_attr())?;
    doc.set_attr(node, "aria-expanded", state.aria_expanded())?;
    for icon in doc.find_with_class(node, state.stale_caret_class()) {
        doc.add_class(icon, state.caret_class())?;
        doc.remove_class(icon, state.stale_caret_class())?;
    }
    Ok(())
}

fn transition(doc: &dyn DocumentPort, node: NodeId, event: ToggleEvent) {
    let next = current_state(doc, node).transition(event);
    if let Err(e) = apply_state(doc, node, next) {
        warn!(error = %e, "toggle transition failed");
    }
}

/// Tags the browser already makes focusable and Enter-activatable.
fn is_native_interactive(tag: Option<&str>) -> bool {
    matches!(tag, Some("a") | Some("button"))
}

/// Wires toggle roots and tracks the listeners it registers.
pub struct ToggleController {
    doc: Rc<dyn DocumentPort>,
    settings: Rc<Settings>,
    registrations: RefCell<Vec<(NodeId, ListenerId)>>,
    wired: RefCell<HashSet<NodeId>>,
}

impl ToggleController {
    pub fn new(doc: Rc<dyn DocumentPort>, settings: Rc<Settings>) -> Self {
        Self {
            doc,
            settings,
            registrations: RefCell::new(Vec::new()),
            wired: RefCell::new(HashSet::new()),
        }
    }

    /// Make `node` a toggle root.
    ///
    /// Binds click handling (plus the anchor's collapse side channel), sets
    /// ids and `aria-controls` on the controlled nodes, and makes non-link
    /// nodes keyboard-activatable. Calling it again for a wired node only
    /// refreshes the ARIA attributes.
    #[instrument(level = "debug", skip(self))]
    pub fn init_toggle_nodes(&self, node: NodeId) -> ApplicationResult<()> {
        if !self.doc.contains(node) {
            return Err(DocumentError::NodeGone(node).into());
        }
        if self.wired.borrow().contains(&node) {
            debug!("node already wired, refreshing aria");
            self.add_aria(node)?;
            return Ok(());
        }

        self.bind_toggle(node)?;
        self.add_aria(node)?;
        if !is_native_interactive(self.doc.tag_name(node).as_deref()) {
            self.make_tabbable(node)?;
        }
        self.wired.borrow_mut().insert(node);
        Ok(())
    }

    /// Drop every listener registered so far; returns how many were removed.
    pub fn release(&self) -> usize {
        let registrations = std::mem::take(&mut *self.registrations.borrow_mut());
        self.wired.borrow_mut().clear();
        registrations
            .into_iter()
            .filter(|(node, id)| self.doc.remove_listener(*node, *id))
            .count()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ApplicationResult<()> {
        let id = self.doc.add_listener(node, kind, listener)?;
        self.registrations.borrow_mut().push((node, id));
        Ok(())
    }

    fn bind_toggle(&self, node: NodeId) -> ApplicationResult<()> {
        self.listen(
            node,
            EventKind::Click,
            Rc::new(|doc: &dyn DocumentPort, target: NodeId, event: &Event| {
                // the node's own link action must not fire
                event.prevent_default();
                transition(doc, target, ToggleEvent::Activate);
            }),
        )?;

        let anchor_key = &self.settings.anchor_key;
        match self
            .doc
            .query_one(&Selector::list_item().attr_eq("data-key", anchor_key))
        {
            Some(anchor) => self.listen(
                anchor,
                EventKind::Click,
                Rc::new(move |doc: &dyn DocumentPort, _anchor: NodeId, _event: &Event| {
                    if doc.contains(node) {
                        transition(doc, node, ToggleEvent::ParentActivated);
                    }
                }),
            )?,
            None => debug!(anchor = %anchor_key, "no anchor to follow"),
        }
        Ok(())
    }

    /// Assign ids to controlled nodes and derive `aria-controls` / `aria-expanded`.
    fn add_aria(&self, node: NodeId) -> ApplicationResult<Vec<String>> {
        let controlled = self.doc.query(&controlled_selector());
        let controlled_set: HashSet<NodeId> = controlled.iter().copied().collect();
        let existing = self
            .doc
            .query(&Selector::any().has_attr("id"))
            .into_iter()
            .filter(|n| !controlled_set.contains(n))
            .filter_map(|n| self.doc.attr(n, "id"));
        let mut ids = IdAllocator::new(
            &self.settings.id_prefix,
            &self.settings.id_namespace,
            existing,
        );

        let mut assigned = Vec::with_capacity(controlled.len());
        for element in controlled {
            let key = self.doc.attr(element, "data-key").unwrap_or_default();
            let id = ids.allocate(&key);
            self.doc.set_attr(element, "id", &id)?;
            assigned.push(id);
        }

        if !assigned.is_empty() {
            self.doc
                .set_attr(node, "aria-controls", &assigned.iter().join(" "))?;
        }
        let state = current_state(self.doc.as_ref(), node);
        self.doc
            .set_attr(node, "aria-expanded", state.aria_expanded())?;
        debug!(controls = assigned.len(), state = ?state, "aria attributes set");
        Ok(assigned)
    }

    fn make_tabbable(&self, node: NodeId) -> ApplicationResult<()> {
        self.doc.set_attr(node, "tabindex", "0")?;

        self.listen(
            node,
            EventKind::KeyDown,
            Rc::new(|doc: &dyn DocumentPort, target: NodeId, event: &Event| {
                if event.key() == Some("Enter") {
                    doc.dispatch(target, &Event::click());
                }
            }),
        )?;

        // Outline stays for keyboard focus only
        self.listen(
            node,
            EventKind::MouseDown,
            Rc::new(|doc: &dyn DocumentPort, target: NodeId, _event: &Event| {
                if let Err(e) = doc.set_style(target, "outline", Some("none")) {
                    warn!(error = %e, "outline suppression failed");
                }
            }),
        )?;
        self.listen(
            node,
            EventKind::MouseUp,
            Rc::new(|doc: &dyn DocumentPort, target: NodeId, _event: &Event| {
                if let Err(e) = doc.set_style(target, "outline", None) {
                    warn!(error = %e, "outline restore failed");
                }
                doc.blur(target);
            }),
        )?;
        Ok(())
    }
}
