//! Collector for non-fatal engine failures.

use std::cell::RefCell;

use tracing::warn;

use crate::application::ApplicationError;

/// Every reported error is logged and kept until drained.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<ApplicationError>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, error: ApplicationError) {
        warn!(error = %error, "menu diagnostic");
        self.entries.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Take everything reported so far.
    pub fn drain(&self) -> Vec<ApplicationError> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}
