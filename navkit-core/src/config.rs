//! Coordinator configuration.
//!
//! Pages pass configuration as a JSON object with camelCase keys; every key
//! is optional.
//!
//! ```json
//! { "mobileBreakpoint": 767, "tabletBreakpoint": 900, "swipeThreshold": 50 }
//! ```

use serde::{Deserialize, Serialize};

use crate::breakpoint::Breakpoints;
use crate::diagnostics::{DEFAULT_DIAGNOSTIC_WIDTHS, DEFAULT_MIN_TOUCH_TARGET};
use crate::focus::DEFAULT_HIGHLIGHT_MS;
use crate::lazy::{RootMargin, DEFAULT_ROOT_MARGIN};
use crate::{CoordinatorError, CoordinatorResult};

/// All recognized options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinatorConfig {
    /// Widest viewport treated as mobile.
    pub mobile_breakpoint: u32,
    /// Widest viewport treated as tablet.
    pub tablet_breakpoint: u32,
    /// Minimum horizontal travel for a swipe, in CSS pixels.
    pub swipe_threshold: u32,
    /// Proximity margin for lazy images, CSS margin shorthand.
    pub lazy_load_margin: String,
    /// Quiet period before a resize is reclassified.
    pub debounce_ms: u32,
    /// Selector of the menu toggle button.
    pub toggle_selector: String,
    /// Selector of the collapsible menu.
    pub menu_selector: String,
    /// Class marking the toggle and menu while open.
    pub active_class: String,
    /// How long the keyboard focus highlight stays.
    pub focus_highlight_ms: u32,
    /// Minimum width and height of interactive elements in the self-test.
    pub min_touch_target: u32,
    /// Viewport widths the self-test iterates.
    pub diagnostic_widths: Vec<u32>,
    /// Verbose logging.
    pub debug: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 767,
            tablet_breakpoint: 900,
            swipe_threshold: 50,
            lazy_load_margin: DEFAULT_ROOT_MARGIN.to_string(),
            debounce_ms: 150,
            toggle_selector: ".nav-toggle".to_string(),
            menu_selector: ".nav-links".to_string(),
            active_class: "active".to_string(),
            focus_highlight_ms: DEFAULT_HIGHLIGHT_MS,
            min_touch_target: DEFAULT_MIN_TOUCH_TARGET,
            diagnostic_widths: DEFAULT_DIAGNOSTIC_WIDTHS.to_vec(),
            debug: false,
        }
    }
}

impl CoordinatorConfig {
    /// Parse and validate a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> CoordinatorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check option consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConfig`] describing the first
    /// violation found.
    pub fn validate(&self) -> CoordinatorResult<()> {
        if self.mobile_breakpoint >= self.tablet_breakpoint {
            return Err(CoordinatorError::InvalidConfig(format!(
                "mobileBreakpoint ({}) must be below tabletBreakpoint ({})",
                self.mobile_breakpoint, self.tablet_breakpoint
            )));
        }
        if self.swipe_threshold == 0 {
            return Err(CoordinatorError::InvalidConfig(
                "swipeThreshold must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("toggleSelector", &self.toggle_selector),
            ("menuSelector", &self.menu_selector),
            ("activeClass", &self.active_class),
        ] {
            if value.trim().is_empty() {
                return Err(CoordinatorError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if self.active_class.contains(char::is_whitespace) {
            return Err(CoordinatorError::InvalidConfig(format!(
                "activeClass '{}' must be a single class name",
                self.active_class
            )));
        }
        self.root_margin()?;
        Ok(())
    }

    /// Breakpoint pair.
    #[must_use]
    pub const fn breakpoints(&self) -> Breakpoints {
        Breakpoints::new(self.mobile_breakpoint, self.tablet_breakpoint)
    }

    /// Parsed lazy-load margin.
    ///
    /// # Errors
    ///
    /// Returns an error if `lazy_load_margin` is not valid CSS margin shorthand.
    pub fn root_margin(&self) -> CoordinatorResult<RootMargin> {
        RootMargin::parse(&self.lazy_load_margin)
    }
}
