//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;

use coursenav::application::services::MenuService;
use coursenav::config::Settings;
use coursenav::domain::{CourseEntry, DataRecord, Markup};
use coursenav::infrastructure::traits::{
    DocumentPort, FixedClock, NodeId, RenderError, Renderer, Selector,
};
use coursenav::infrastructure::{ListItemRenderer, MemoryDocument};
use coursenav::util::testing;

/// Fixed "now" used by every fixture: 2024-06-10.
pub const NOW: i64 = 1_718_000_000;

/// Pending for `n` polls, waking itself each time.
pub struct YieldNow(pub usize);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// List-item renderer whose completion order is controlled per key.
pub struct DelayedRenderer {
    inner: ListItemRenderer,
    delays: HashMap<String, usize>,
    default_delay: usize,
    completed: RefCell<Vec<String>>,
}

impl DelayedRenderer {
    pub fn new(delays: &[(&str, usize)]) -> Self {
        Self {
            inner: ListItemRenderer::new(&Settings::default().template),
            delays: delays.iter().map(|(k, d)| (k.to_string(), *d)).collect(),
            default_delay: 1,
            completed: RefCell::new(Vec::new()),
        }
    }

    /// Keys in the order their renders finished.
    pub fn completed(&self) -> Vec<String> {
        self.completed.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Renderer for DelayedRenderer {
    async fn render(&self, template: &str, data: &DataRecord) -> Result<Markup, RenderError> {
        let delay = self
            .delays
            .get(data.key())
            .copied()
            .unwrap_or(self.default_delay);
        YieldNow(delay).await;
        self.completed.borrow_mut().push(data.key().to_string());
        self.inner.render(template, data).await
    }
}

/// Fails every render for the listed keys.
pub struct FailingRenderer {
    inner: ListItemRenderer,
    failing: HashSet<String>,
}

impl FailingRenderer {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            inner: ListItemRenderer::new(&Settings::default().template),
            failing: failing.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[async_trait(?Send)]
impl Renderer for FailingRenderer {
    async fn render(&self, template: &str, data: &DataRecord) -> Result<Markup, RenderError> {
        if self.failing.contains(data.key()) {
            return Err(RenderError::new(format!("template exploded on {}", data.key())));
        }
        self.inner.render(template, data).await
    }
}

pub struct Fixture {
    pub doc: Rc<MemoryDocument>,
    pub menu: MenuService,
}

pub fn fixture_with(renderer: Rc<dyn Renderer>) -> Fixture {
    testing::init_test_setup();
    let settings = Settings::default();
    let doc = Rc::new(MemoryDocument::nav_drawer(
        &settings.anchor_key,
        "My courses",
    ));
    let port: Rc<dyn DocumentPort> = doc.clone();
    let menu = MenuService::new(
        port,
        renderer,
        Rc::new(FixedClock(NOW)),
        Rc::new(settings),
    );
    Fixture { doc, menu }
}

pub fn fixture() -> Fixture {
    let template = Settings::default().template;
    fixture_with(Rc::new(ListItemRenderer::new(&template)))
}

pub fn entry(key: &str, text: &str, term: &str) -> CourseEntry {
    CourseEntry::new(key, text, term)
}

pub fn terms(names: &[&str]) -> Vec<String> {
    names.iter().map(|t| t.to_string()).collect()
}

/// `data-key` of every menu item in document order.
pub fn item_keys(doc: &MemoryDocument) -> Vec<String> {
    doc.query(&Selector::list_item())
        .into_iter()
        .filter_map(|n| doc.attr(n, "data-key"))
        .collect()
}

pub fn node_by_key(doc: &MemoryDocument, key: &str) -> NodeId {
    doc.query_one(&Selector::list_item().attr_eq("data-key", key))
        .unwrap_or_else(|| panic!("no node keyed {key}"))
}
