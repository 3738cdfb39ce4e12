//! Grouping and insertion engine.
//!
//! Renders term headers and course entries and places them relative to an
//! anchor node. Renders are issued concurrently; insertion happens after
//! the fan-in, in input order, so the resulting document order never
//! depends on render completion order.

use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::fanin::fan_in;
use crate::application::services::toggle::ToggleController;
use crate::application::{ApplicationError, ApplicationResult, Diagnostics};
use crate::config::Settings;
use crate::domain::{Classification, CourseEntry, DataRecord, GroupLabel, Markup, TermHeader};
use crate::infrastructure::traits::{DocumentPort, NodeId, Renderer, Selector};

/// Term → header node for one classification group, built once per `init`.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    group: Classification,
    headers: HashMap<String, NodeId>,
    order: Vec<String>,
}

impl HeaderIndex {
    pub fn new(group: Classification) -> Self {
        Self {
            group,
            headers: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn group(&self) -> Classification {
        self.group
    }

    pub fn get(&self, term: &str) -> Option<NodeId> {
        self.headers.get(term).copied()
    }

    /// Terms in insertion (= document) order.
    pub fn terms(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, term: String, node: NodeId) {
        if self.headers.insert(term.clone(), node).is_none() {
            self.order.push(term);
        }
    }
}

/// What one group call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group label node, for groups that have one
    pub label: Option<NodeId>,
    pub headers: usize,
    pub entries: usize,
}

pub struct GroupingEngine {
    doc: Rc<dyn DocumentPort>,
    renderer: Rc<dyn Renderer>,
    settings: Rc<Settings>,
    toggles: ToggleController,
    diagnostics: Diagnostics,
}

impl GroupingEngine {
    pub fn new(
        doc: Rc<dyn DocumentPort>,
        renderer: Rc<dyn Renderer>,
        settings: Rc<Settings>,
    ) -> Self {
        let toggles = ToggleController::new(doc.clone(), settings.clone());
        Self {
            doc,
            renderer,
            settings,
            toggles,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn toggles(&self) -> &ToggleController {
        &self.toggles
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The fixed node every group is inserted after.
    pub fn anchor(&self) -> ApplicationResult<NodeId> {
        let key = &self.settings.anchor_key;
        self.doc
            .query_one(&Selector::list_item().attr_eq("data-key", key))
            .ok_or_else(|| ApplicationError::AnchorNotFound(key.clone()))
    }

    /// Remove everything a previous run inserted and drop its listeners.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&self) -> ApplicationResult<usize> {
        let released = self.toggles.release();
        let selector = Selector::list_item().attr_eq("data-parent-key", &self.settings.anchor_key);
        let mut removed = 0;
        for node in self.doc.query(&selector) {
            // nested matches vanish with their ancestor
            if self.doc.contains(node) {
                self.doc.remove(node)?;
                removed += 1;
            }
        }
        debug!(removed, released, "cleared previous menu");
        Ok(removed)
    }

    async fn render_record(&self, record: &DataRecord) -> ApplicationResult<Markup> {
        let template = &self.settings.template;
        self.renderer
            .render(template, record)
            .await
            .map_err(|source| ApplicationError::RenderFailure {
                template: template.clone(),
                key: record.key().to_string(),
                source,
            })
    }

    /// Render all records concurrently, then insert each after its target
    /// in list order. Failures are reported; returns the number inserted.
    async fn insert_rendered(&self, items: Vec<(NodeId, DataRecord)>) -> usize {
        let rendered = fan_in(items.iter().map(|(_, record)| self.render_record(record))).await;
        let mut placed = 0;
        for ((target, _), result) in items.iter().zip(rendered) {
            let inserted = result.and_then(|markup| {
                self.doc
                    .insert_after(*target, &markup)
                    .map_err(ApplicationError::from)
            });
            match inserted {
                Ok(_) => placed += 1,
                Err(e) => self.diagnostics.report(e),
            }
        }
        placed
    }

    /// Insert one header per distinct term after `anchor`, in term order.
    ///
    /// Resolves once every header render has settled and every successful
    /// render is inserted. Failed headers are reported and left out of the
    /// returned index.
    #[instrument(level = "debug", skip(self, terms), fields(terms = terms.len()))]
    pub async fn create_headers(
        &self,
        terms: &[String],
        anchor: NodeId,
        is_past: bool,
    ) -> HeaderIndex {
        let group = if is_past {
            Classification::Past
        } else {
            Classification::Current
        };
        let headers: Vec<TermHeader> = terms
            .iter()
            .unique()
            .map(|term| TermHeader::new(term, is_past))
            .collect();
        let records: Vec<DataRecord> = headers
            .iter()
            .map(|header| header.to_record(&self.settings.anchor_key))
            .collect();

        let rendered = fan_in(records.iter().map(|record| self.render_record(record))).await;

        let mut index = HeaderIndex::new(group);
        let mut cursor = anchor;
        for (header, result) in headers.into_iter().zip(rendered) {
            let inserted = result.and_then(|markup| {
                self.doc
                    .insert_after(cursor, &markup)
                    .map_err(ApplicationError::from)
            });
            match inserted {
                Ok(node) => {
                    cursor = node;
                    index.insert(header.text, node);
                }
                Err(e) => self.diagnostics.report(e),
            }
        }
        debug!(group = %group, headers = index.len(), "headers inserted");
        index
    }

    /// Header node for `entry`, checked against the group's `data-past` flag.
    pub fn resolve_header(
        &self,
        entry: &CourseEntry,
        index: &HeaderIndex,
    ) -> ApplicationResult<NodeId> {
        let missing = || ApplicationError::MissingHeader {
            term: entry.term.clone(),
            group: index.group(),
            key: entry.key.clone(),
        };
        let node = index.get(&entry.term).ok_or_else(missing)?;
        if self.doc.attr(node, "data-past").as_deref() != Some(index.group().past_attr()) {
            return Err(missing());
        }
        Ok(node)
    }

    /// Render `entry` and insert it directly after its term header.
    pub async fn place_entry(
        &self,
        entry: &CourseEntry,
        index: &HeaderIndex,
    ) -> ApplicationResult<NodeId> {
        let header = self.resolve_header(entry, index)?;
        let markup = self
            .render_record(&entry.to_record(&self.settings.anchor_key))
            .await?;
        Ok(self.doc.insert_after(header, &markup)?)
    }

    /// Place every entry under its header; unresolved entries are reported.
    async fn place_entries(&self, entries: &[CourseEntry], index: &HeaderIndex) -> usize {
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.resolve_header(entry, index) {
                Ok(header) => items.push((header, entry.to_record(&self.settings.anchor_key))),
                Err(e) => self.diagnostics.report(e),
            }
        }
        self.insert_rendered(items).await
    }

    /// "Past courses" disclosure node with term headers and hidden entries.
    #[instrument(level = "debug", skip_all, fields(entries = entries.len(), terms = terms.len()))]
    pub async fn create_past_group(
        &self,
        anchor: NodeId,
        entries: &[CourseEntry],
        terms: &[String],
    ) -> ApplicationResult<GroupSummary> {
        if entries.is_empty() {
            debug!("no past entries, skipping group");
            return Ok(GroupSummary::default());
        }
        let past = &self.settings.past_group;
        let label = GroupLabel::past(&past.key, &past.label, past.icon.clone());
        let markup = self
            .render_record(&label.to_record(&self.settings.anchor_key))
            .await?;
        let label_node = self.doc.insert_after(anchor, &markup)?;

        let index = self.create_headers(terms, label_node, true).await;
        let entries: Vec<CourseEntry> = entries
            .iter()
            .cloned()
            .map(CourseEntry::into_past)
            .collect();
        let placed = self.place_entries(&entries, &index).await;

        self.toggles.init_toggle_nodes(label_node)?;
        Ok(GroupSummary {
            label: Some(label_node),
            headers: index.len(),
            entries: placed,
        })
    }

    /// Flat "Ongoing courses" label with its entries directly below.
    #[instrument(level = "debug", skip_all, fields(entries = entries.len()))]
    pub async fn create_ongoing_group(
        &self,
        anchor: NodeId,
        entries: &[CourseEntry],
    ) -> ApplicationResult<GroupSummary> {
        if entries.is_empty() {
            debug!("no ongoing entries, skipping group");
            return Ok(GroupSummary::default());
        }
        let ongoing = &self.settings.ongoing_group;
        let label = GroupLabel::ongoing(&ongoing.key, &ongoing.label);
        let markup = self
            .render_record(&label.to_record(&self.settings.anchor_key))
            .await?;
        let label_node = self.doc.insert_after(anchor, &markup)?;

        let items = entries
            .iter()
            .cloned()
            .map(CourseEntry::into_ongoing)
            .map(|entry| (label_node, entry.to_record(&self.settings.anchor_key)))
            .collect();
        let placed = self.insert_rendered(items).await;
        Ok(GroupSummary {
            label: Some(label_node),
            headers: 0,
            entries: placed,
        })
    }

    /// Current term headers after `anchor`, entries under them.
    #[instrument(level = "debug", skip_all, fields(entries = entries.len(), terms = terms.len()))]
    pub async fn create_current_group(
        &self,
        anchor: NodeId,
        terms: &[String],
        entries: &[CourseEntry],
    ) -> ApplicationResult<GroupSummary> {
        if entries.is_empty() {
            debug!("no current entries, skipping group");
            return Ok(GroupSummary::default());
        }
        let index = self.create_headers(terms, anchor, false).await;
        let placed = self.place_entries(entries, &index).await;
        Ok(GroupSummary {
            label: None,
            headers: index.len(),
            entries: placed,
        })
    }
}
