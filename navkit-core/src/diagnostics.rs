//! Opt-in responsive self-test.
//!
//! Walks a list of viewport widths and checks two things at each: the
//! document does not scroll horizontally, and every interactive element is
//! at least `min_target` pixels in both dimensions. Problems are logged as
//! warnings and collected into a [`DiagnosticsReport`]; nothing here fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CoordinatorConfig;
use crate::geometry::Rect;

/// Elements checked for touch-target size.
pub const INTERACTIVE_SELECTOR: &str = "button, a, input";

/// Widths the self-test visits by default.
pub const DEFAULT_DIAGNOSTIC_WIDTHS: [u32; 5] = [480, 640, 768, 1024, 1280];

/// Default minimum touch-target edge, in CSS pixels.
pub const DEFAULT_MIN_TOUCH_TARGET: u32 = 36;

/// Query parameter that requests the self-test on page load.
pub const SELF_TEST_QUERY_FLAG: &str = "testResponsive";

/// CSS custom property the host sets while a width is simulated.
pub const TEST_WIDTH_PROPERTY: &str = "--_test-width";

/// An interactive element and its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveTarget {
    /// Human-readable identification (tag, id, text).
    pub label: String,
    /// Bounding client rect.
    pub rect: Rect,
}

/// Read-only layout access for the self-test.
pub trait LayoutProbe {
    /// Simulate a viewport width (non-destructively).
    fn simulate_width(&mut self, width: u32);

    /// Remove any width simulation.
    fn restore_width(&mut self);

    /// Scrollable width of the document body.
    fn scroll_width(&self) -> f64;

    /// Inner width of the viewport.
    fn viewport_width(&self) -> f64;

    /// Every element matching [`INTERACTIVE_SELECTOR`].
    fn interactive_targets(&self) -> Vec<InteractiveTarget>;
}

/// A single failed assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Finding {
    /// The document scrolls horizontally.
    #[serde(rename_all = "camelCase")]
    HorizontalOverflow {
        /// Simulated width.
        width: u32,
        /// Measured scroll width.
        scroll_width: f64,
        /// Measured viewport width.
        viewport_width: f64,
    },
    /// An interactive element is smaller than the minimum.
    #[serde(rename_all = "camelCase")]
    SmallTouchTarget {
        /// Simulated width.
        width: u32,
        /// Which element.
        label: String,
        /// Element width.
        target_width: f64,
        /// Element height.
        target_height: f64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HorizontalOverflow {
                width,
                scroll_width,
                viewport_width,
            } => write!(
                f,
                "Horizontal scroll detected at {width}px ({scroll_width} > {viewport_width})"
            ),
            Self::SmallTouchTarget {
                width,
                label,
                target_width,
                target_height,
            } => write!(
                f,
                "Touch target possibly too small at {width}px: {label} ({target_width}x{target_height})"
            ),
        }
    }
}

/// Outcome of a self-test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    /// Widths visited, in order.
    pub widths_checked: Vec<u32>,
    /// Interactive elements measured across all widths.
    pub targets_checked: usize,
    /// Failed assertions.
    pub findings: Vec<Finding>,
}

impl DiagnosticsReport {
    /// Whether every assertion held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// The self-test runner.
#[derive(Debug, Clone)]
pub struct SelfTest {
    widths: Vec<u32>,
    min_target: f64,
}

impl SelfTest {
    /// Create a runner.
    #[must_use]
    pub fn new(widths: Vec<u32>, min_target: u32) -> Self {
        Self {
            widths,
            min_target: f64::from(min_target),
        }
    }

    /// Runner configured from the coordinator options.
    #[must_use]
    pub fn from_config(config: &CoordinatorConfig) -> Self {
        Self::new(config.diagnostic_widths.clone(), config.min_touch_target)
    }

    /// Visit every width and collect findings.
    pub fn run<P: LayoutProbe + ?Sized>(&self, probe: &mut P) -> DiagnosticsReport {
        let mut report = DiagnosticsReport::default();

        for &width in &self.widths {
            probe.simulate_width(width);

            let scroll_width = probe.scroll_width();
            let viewport_width = probe.viewport_width();
            if scroll_width > viewport_width {
                report.findings.push(Finding::HorizontalOverflow {
                    width,
                    scroll_width,
                    viewport_width,
                });
            }

            for target in probe.interactive_targets() {
                report.targets_checked += 1;
                if target.rect.width < self.min_target || target.rect.height < self.min_target {
                    report.findings.push(Finding::SmallTouchTarget {
                        width,
                        label: target.label,
                        target_width: target.rect.width,
                        target_height: target.rect.height,
                    });
                }
            }

            report.widths_checked.push(width);
        }
        probe.restore_width();

        for finding in &report.findings {
            tracing::warn!("{finding}");
        }
        tracing::info!(
            "Responsive self-test completed: {} widths, {} findings",
            report.widths_checked.len(),
            report.findings.len()
        );
        report
    }
}

/// Whether a location query string (`?a=1&testResponsive=1`) requests the
/// self-test.
#[must_use]
pub fn self_test_requested(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == SELF_TEST_QUERY_FLAG && value == "1")
}
