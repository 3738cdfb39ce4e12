//! Tests for GroupingEngine: header creation, entry placement, group layout

mod common;

use std::rc::Rc;

use futures::executor::block_on;

use common::{
    entry, fixture, fixture_with, item_keys, node_by_key, terms, DelayedRenderer, FailingRenderer,
};
use coursenav::application::ApplicationError;
use coursenav::domain::{sort_for_group, Classification};
use coursenav::infrastructure::traits::{DocumentPort, Selector};

fn headers(doc: &dyn DocumentPort) -> Vec<String> {
    doc.query(&Selector::list_item().attr_eq("data-header", "true"))
        .into_iter()
        .filter_map(|n| doc.attr(n, "data-key"))
        .collect()
}

// ============================================================
// create_headers()
// ============================================================

#[test]
fn given_two_terms_and_no_entries_when_creating_headers_then_exactly_two_headers() {
    // Arrange
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let before = f.doc.len();
    let term_list = terms(&["Fall 2024", "Spring 2024"]);

    // Act
    let index = block_on(engine.create_headers(&term_list, anchor, false));

    // Assert
    assert_eq!(index.len(), 2);
    assert_eq!(f.doc.len(), before + 2);
    assert_eq!(headers(f.doc.as_ref()), vec!["Fall 2024", "Spring 2024"]);
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn given_shuffled_render_latency_when_creating_headers_then_order_matches_term_list() {
    // Arrange
    let renderer = Rc::new(DelayedRenderer::new(&[
        ("Spring 2025", 6),
        ("Fall 2024", 0),
        ("Spring 2024", 3),
    ]));
    let f = fixture_with(renderer.clone());
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let term_list = terms(&["Spring 2025", "Fall 2024", "Spring 2024"]);

    // Act
    let index = block_on(engine.create_headers(&term_list, anchor, false));

    // Assert - renders finished out of order, document order did not follow
    assert_eq!(
        renderer.completed(),
        vec!["Fall 2024", "Spring 2024", "Spring 2025"]
    );
    assert_eq!(index.terms(), term_list.as_slice());
    assert_eq!(
        item_keys(&f.doc),
        vec!["home", "mycourses", "Spring 2025", "Fall 2024", "Spring 2024", "calendar"]
    );
}

#[test]
fn given_duplicate_terms_when_creating_headers_then_one_header_per_term() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let term_list = terms(&["Fall 2024", "Fall 2024", "Spring 2024"]);

    let index = block_on(engine.create_headers(&term_list, anchor, false));

    assert_eq!(index.len(), 2);
    assert_eq!(headers(f.doc.as_ref()), vec!["Fall 2024", "Spring 2024"]);
}

#[test]
fn given_past_flag_when_creating_headers_then_headers_hidden_and_indented() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();

    block_on(engine.create_headers(&terms(&["Fall 2023"]), anchor, true));

    let header = node_by_key(&f.doc, "Fall 2023");
    assert_eq!(f.doc.attr(header, "data-past").as_deref(), Some("true"));
    assert_eq!(f.doc.attr(header, "data-hidden").as_deref(), Some("1"));
    assert_eq!(f.doc.attr(header, "data-indent").as_deref(), Some("1"));
}

#[test]
fn given_failing_header_render_when_creating_headers_then_reported_and_rest_kept() {
    // Arrange
    let f = fixture_with(Rc::new(FailingRenderer::new(&["Fall 2024"])));
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let term_list = terms(&["Spring 2025", "Fall 2024", "Spring 2024"]);

    // Act
    let index = block_on(engine.create_headers(&term_list, anchor, false));

    // Assert
    assert_eq!(
        index.terms(),
        terms(&["Spring 2025", "Spring 2024"]).as_slice()
    );
    assert_eq!(headers(f.doc.as_ref()), vec!["Spring 2025", "Spring 2024"]);
    let diagnostics = engine.diagnostics().drain();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        &diagnostics[0],
        ApplicationError::RenderFailure { key, .. } if key == "Fall 2024"
    ));
}

// ============================================================
// place_entry() / resolve_header()
// ============================================================

#[test]
fn given_header_when_placing_entry_then_inserted_directly_after_header() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let term_list = terms(&["Fall 2024", "Spring 2024"]);
    let index = block_on(engine.create_headers(&term_list, anchor, false));

    let c1 = entry("c1", "Algebra", "Spring 2024");
    block_on(engine.place_entry(&c1, &index)).unwrap();

    assert_eq!(
        item_keys(&f.doc),
        vec!["home", "mycourses", "Fall 2024", "Spring 2024", "c1", "calendar"]
    );
}

#[test]
fn given_entry_without_header_when_placing_then_missing_header() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let index = block_on(engine.create_headers(&terms(&["Fall 2024"]), anchor, false));

    let orphan = entry("c9", "Orphan", "Winter 1999");
    let result = block_on(engine.place_entry(&orphan, &index));

    assert_eq!(
        result,
        Err(ApplicationError::MissingHeader {
            term: "Winter 1999".into(),
            group: Classification::Current,
            key: "c9".into(),
        })
    );
}

#[test]
fn given_header_with_wrong_past_flag_when_resolving_then_missing_header() {
    // Arrange
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let index = block_on(engine.create_headers(&terms(&["Fall 2024"]), anchor, false));
    let header = node_by_key(&f.doc, "Fall 2024");
    f.doc.set_attr(header, "data-past", "true").unwrap();

    // Act
    let result = engine.resolve_header(&entry("c1", "Algebra", "Fall 2024"), &index);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::MissingHeader { .. })
    ));
}

// ============================================================
// create_current_group()
// ============================================================

#[test]
fn given_entries_across_terms_when_creating_current_group_then_contiguous_under_headers() {
    // Arrange
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let mut entries = vec![
        entry("a", "Algebra", "Fall 2024"),
        entry("b", "Biology", "Spring 2024"),
        entry("c", "Chemistry", "Fall 2024"),
        entry("d", "Drawing", "Spring 2024"),
    ];
    sort_for_group(&mut entries, Classification::Current);

    // Act
    let summary = block_on(engine.create_current_group(
        anchor,
        &terms(&["Fall 2024", "Spring 2024"]),
        &entries,
    ))
    .unwrap();

    // Assert
    assert_eq!(summary.headers, 2);
    assert_eq!(summary.entries, 4);
    assert_eq!(summary.label, None);
    assert_eq!(
        item_keys(&f.doc),
        vec!["home", "mycourses", "Fall 2024", "a", "c", "Spring 2024", "b", "d", "calendar"]
    );
}

#[test]
fn given_no_current_entries_when_creating_current_group_then_nothing_inserted() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let before = f.doc.len();
    let term_list = terms(&["Fall 2024"]);

    let summary = block_on(engine.create_current_group(anchor, &term_list, &[])).unwrap();

    assert_eq!(summary.headers, 0);
    assert_eq!(f.doc.len(), before);
}

// ============================================================
// create_past_group()
// ============================================================

#[test]
fn given_one_past_entry_when_creating_past_group_then_label_header_and_hidden_entry() {
    // Arrange
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();

    // Act
    let summary = block_on(engine.create_past_group(
        anchor,
        &[entry("p1", "History", "Fall 2024")],
        &terms(&["Fall 2024"]),
    ))
    .unwrap();

    // Assert
    let doc = f.doc.as_ref();
    let labels = doc.query(&Selector::list_item().attr_eq("data-key", "mycoursespast"));
    assert_eq!(labels.len(), 1);
    assert_eq!(summary.label, Some(labels[0]));
    assert_eq!(doc.text(labels[0]).as_deref(), Some("Past courses"));

    let header = node_by_key(doc, "Fall 2024");
    assert_eq!(doc.attr(header, "data-past").as_deref(), Some("true"));
    assert_eq!(doc.attr(header, "data-hidden").as_deref(), Some("1"));

    let p1 = node_by_key(doc, "p1");
    assert_eq!(doc.attr(p1, "data-hidden").as_deref(), Some("1"));
    assert_eq!(doc.attr(p1, "data-past").as_deref(), Some("true"));
    assert_eq!(
        item_keys(doc),
        vec!["home", "mycourses", "mycoursespast", "Fall 2024", "p1", "calendar"]
    );
}

#[test]
fn given_no_past_entries_when_creating_past_group_then_no_label() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let term_list = terms(&["Fall 2024"]);

    let summary = block_on(engine.create_past_group(anchor, &[], &term_list)).unwrap();

    assert_eq!(summary.label, None);
    assert!(f
        .doc
        .query_one(&Selector::list_item().attr_eq("data-key", "mycoursespast"))
        .is_none());
}

#[test]
fn given_past_label_render_failure_when_creating_past_group_then_error_returned() {
    let f = fixture_with(Rc::new(FailingRenderer::new(&["mycoursespast"])));
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();

    let result = block_on(engine.create_past_group(
        anchor,
        &[entry("p1", "History", "Fall 2024")],
        &terms(&["Fall 2024"]),
    ));

    assert!(matches!(
        result,
        Err(ApplicationError::RenderFailure { .. })
    ));
    assert!(result.unwrap_err().is_recoverable());
}

// ============================================================
// create_ongoing_group()
// ============================================================

#[test]
fn given_ongoing_entries_when_creating_group_then_flat_under_label_ascending() {
    // Arrange
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let mut entries = vec![
        entry("o2", "Zine club", ""),
        entry("o1", "Library induction", ""),
    ];
    sort_for_group(&mut entries, Classification::Ongoing);

    // Act
    let summary = block_on(engine.create_ongoing_group(anchor, &entries)).unwrap();

    // Assert
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.headers, 0);
    assert_eq!(
        item_keys(&f.doc),
        vec!["home", "mycourses", "mycoursesongoing", "o1", "o2", "calendar"]
    );
    let o1 = node_by_key(&f.doc, "o1");
    assert_eq!(f.doc.attr(o1, "data-hidden").as_deref(), Some("0"));
}

// ============================================================
// clear()
// ============================================================

#[test]
fn given_inserted_nodes_when_clearing_then_only_menu_nodes_removed() {
    let f = fixture();
    let engine = f.menu.engine();
    let anchor = engine.anchor().unwrap();
    let original = f.doc.outline();
    let term_list = terms(&["Fall 2024"]);
    let entries = [entry("c1", "Algebra", "Fall 2024")];
    block_on(engine.create_current_group(anchor, &term_list, &entries)).unwrap();

    let removed = engine.clear().unwrap();

    assert_eq!(removed, 2);
    assert_eq!(f.doc.outline(), original);
}
