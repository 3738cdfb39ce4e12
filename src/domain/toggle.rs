//! Two-state disclosure model.
//!
//! Every attribute that reflects the disclosure state is derived from one
//! [`ToggleState`] value.

/// Class of the caret icon while expanded.
pub const CARET_EXPANDED: &str = "fa-caret-down";
/// Class of the caret icon while collapsed.
pub const CARET_COLLAPSED: &str = "fa-caret-right";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleState {
    Expanded,
    Collapsed,
}

/// Inputs driving the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEvent {
    /// Click or Enter on the node itself
    Activate,
    /// Click on the enclosing anchor node
    ParentActivated,
}

impl ToggleState {
    /// Parse a `data-collapse` value; anything but `"0"` counts as collapsed.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("0") => ToggleState::Expanded,
            _ => ToggleState::Collapsed,
        }
    }

    pub fn from_collapsed(collapsed: bool) -> Self {
        if collapsed {
            ToggleState::Collapsed
        } else {
            ToggleState::Expanded
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ToggleState::Expanded => ToggleState::Collapsed,
            ToggleState::Collapsed => ToggleState::Expanded,
        }
    }

    pub fn transition(self, event: ToggleEvent) -> Self {
        match event {
            ToggleEvent::Activate => self.toggled(),
            ToggleEvent::ParentActivated => ToggleState::Collapsed,
        }
    }

    /// `data-collapse` value.
    pub fn collapse_attr(self) -> &'static str {
        match self {
            ToggleState::Expanded => "0",
            ToggleState::Collapsed => "1",
        }
    }

    /// `aria-expanded` value.
    pub fn aria_expanded(self) -> &'static str {
        match self {
            ToggleState::Expanded => "true",
            ToggleState::Collapsed => "false",
        }
    }

    /// `data-hidden` value of controlled nodes.
    pub fn hidden_attr(self) -> &'static str {
        self.collapse_attr()
    }

    pub fn caret_class(self) -> &'static str {
        match self {
            ToggleState::Expanded => CARET_EXPANDED,
            ToggleState::Collapsed => CARET_COLLAPSED,
        }
    }

    /// Caret class that must be removed when entering this state.
    pub fn stale_caret_class(self) -> &'static str {
        self.toggled().caret_class()
    }
}
