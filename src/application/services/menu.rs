//! Menu entry point
//!
//! One `init` call rebuilds the whole course menu below the anchor.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{info, instrument};

use crate::application::services::grouping::{GroupSummary, GroupingEngine};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    partition_by_enddate, sort_for_group, Classification, CourseEntry, MenuInput, Partition,
};
use crate::infrastructure::traits::{Clock, DocumentPort, Renderer};

/// Outcome of one `init` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Nodes removed from the previous run
    pub removed: usize,
    pub past: GroupSummary,
    pub current: GroupSummary,
    pub ongoing: GroupSummary,
    /// Non-fatal failures, in the order they happened
    pub diagnostics: Vec<ApplicationError>,
}

impl InitReport {
    pub fn entries_placed(&self) -> usize {
        self.past.entries + self.current.entries + self.ongoing.entries
    }

    pub fn headers_placed(&self) -> usize {
        self.past.headers + self.current.headers
    }
}

/// Marks an `init` in flight; cleared on drop, also when `init` fails.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> ApplicationResult<Self> {
        if flag.replace(true) {
            return Err(ApplicationError::Busy);
        }
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Rebuilds the grouped course menu.
pub struct MenuService {
    engine: GroupingEngine,
    clock: Rc<dyn Clock>,
    in_flight: Cell<bool>,
}

impl MenuService {
    pub fn new(
        doc: Rc<dyn DocumentPort>,
        renderer: Rc<dyn Renderer>,
        clock: Rc<dyn Clock>,
        settings: Rc<Settings>,
    ) -> Self {
        Self {
            engine: GroupingEngine::new(doc, renderer, settings),
            clock,
            in_flight: Cell::new(false),
        }
    }

    pub fn engine(&self) -> &GroupingEngine {
        &self.engine
    }

    /// Rebuild the menu from fresh data.
    ///
    /// Clears the previous run, routes ended current entries into the past
    /// group, then builds the past, current and ongoing groups. Each group
    /// is inserted directly after the anchor, so the document reads
    /// ongoing, current, past from top to bottom.
    ///
    /// A second call while one is still running fails with
    /// [`ApplicationError::Busy`].
    #[instrument(
        level = "info",
        skip_all,
        fields(current = current.len(), past = past.len(), ongoing = ongoing.len())
    )]
    pub async fn init(
        &self,
        current: Vec<CourseEntry>,
        current_terms: Vec<String>,
        past: Vec<CourseEntry>,
        past_terms: Vec<String>,
        ongoing: Vec<CourseEntry>,
    ) -> ApplicationResult<InitReport> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let input = MenuInput {
            current,
            current_terms,
            past,
            past_terms,
            ongoing,
        };
        input.validate()?;

        // stale diagnostics from direct engine use
        self.engine.diagnostics().drain();

        let anchor = self.engine.anchor()?;
        let removed = self.engine.clear()?;

        let Partition {
            mut current,
            mut past,
            past_terms,
        } = partition_by_enddate(
            input.current,
            input.past,
            input.past_terms,
            self.clock.now_epoch_seconds(),
        );
        let mut ongoing = input.ongoing;
        sort_for_group(&mut current, Classification::Current);
        sort_for_group(&mut past, Classification::Past);
        sort_for_group(&mut ongoing, Classification::Ongoing);

        let engine = &self.engine;
        let past = engine.create_past_group(anchor, &past, &past_terms).await;
        let past = self.settle(past)?;
        let current = engine
            .create_current_group(anchor, &input.current_terms, &current)
            .await;
        let current = self.settle(current)?;
        let ongoing = engine.create_ongoing_group(anchor, &ongoing).await;
        let ongoing = self.settle(ongoing)?;

        let report = InitReport {
            removed,
            past,
            current,
            ongoing,
            diagnostics: self.engine.diagnostics().drain(),
        };
        info!(
            entries = report.entries_placed(),
            headers = report.headers_placed(),
            diagnostics = report.diagnostics.len(),
            "menu initialised"
        );
        Ok(report)
    }

    pub async fn init_with(&self, input: MenuInput) -> ApplicationResult<InitReport> {
        self.init(
            input.current,
            input.current_terms,
            input.past,
            input.past_terms,
            input.ongoing,
        )
        .await
    }

    /// A group that failed recoverably costs only itself.
    fn settle(&self, result: ApplicationResult<GroupSummary>) -> ApplicationResult<GroupSummary> {
        match result {
            Ok(summary) => Ok(summary),
            Err(e) if e.is_recoverable() => {
                self.engine.diagnostics().report(e);
                Ok(GroupSummary::default())
            }
            Err(e) => Err(e),
        }
    }
}
