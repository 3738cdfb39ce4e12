//! Service container for dependency injection
//!
//! Wires up the menu service with its host ports.

use std::rc::Rc;

use crate::application::services::MenuService;
use crate::config::Settings;
use crate::infrastructure::document::MemoryDocument;
use crate::infrastructure::renderer::ListItemRenderer;
use crate::infrastructure::traits::{Clock, DocumentPort, Renderer, SystemClock};

/// Label of the anchor item in a freshly built navigation drawer.
const ANCHOR_LABEL: &str = "My courses";

/// Container holding the host ports and the services built on them.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Rc<Settings>,

    /// Document the menu is built into
    pub document: Rc<MemoryDocument>,

    /// Template renderer
    pub renderer: Rc<dyn Renderer>,

    /// Time source for enddate classification
    pub clock: Rc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a container over an empty navigation drawer and the wall clock.
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, Rc::new(SystemClock))
    }

    /// Real document and renderer, caller-supplied clock.
    pub fn with_clock(settings: Settings, clock: Rc<dyn Clock>) -> Self {
        let document = Rc::new(MemoryDocument::nav_drawer(
            &settings.anchor_key,
            ANCHOR_LABEL,
        ));
        let renderer = Rc::new(ListItemRenderer::new(&settings.template));
        Self::with_deps(settings, document, renderer, clock)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        document: Rc<MemoryDocument>,
        renderer: Rc<dyn Renderer>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            settings: Rc::new(settings),
            document,
            renderer,
            clock,
        }
    }

    pub fn menu_service(&self) -> MenuService {
        let doc: Rc<dyn DocumentPort> = self.document.clone();
        MenuService::new(
            doc,
            self.renderer.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }
}
