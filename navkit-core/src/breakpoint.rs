//! Viewport width classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device class derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    /// Narrow viewports; the collapsible menu is in use.
    Mobile,
    /// Mid-size viewports; the collapsible menu is still in use.
    Tablet,
    /// Wide viewports; the menu is always laid out inline.
    Desktop,
}

impl DeviceTier {
    /// Whether this tier uses the inline (non-collapsible) menu.
    #[must_use]
    pub const fn is_desktop(self) -> bool {
        matches!(self, Self::Desktop)
    }

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a viewport width to a tier.
///
/// `width <= mobile_max` is mobile, `width <= tablet_max` is tablet, anything
/// wider is desktop. Callers keep `mobile_max < tablet_max`; if they don't,
/// the tablet range is simply empty.
#[must_use]
pub const fn classify(width: u32, mobile_max: u32, tablet_max: u32) -> DeviceTier {
    if width <= mobile_max {
        DeviceTier::Mobile
    } else if width <= tablet_max {
        DeviceTier::Tablet
    } else {
        DeviceTier::Desktop
    }
}

/// The pair of inclusive upper bounds used by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoints {
    /// Widest viewport still considered mobile.
    pub mobile_max: u32,
    /// Widest viewport still considered tablet.
    pub tablet_max: u32,
}

impl Breakpoints {
    /// Create a breakpoint pair.
    #[must_use]
    pub const fn new(mobile_max: u32, tablet_max: u32) -> Self {
        Self {
            mobile_max,
            tablet_max,
        }
    }

    /// Classify a width against these breakpoints.
    #[must_use]
    pub const fn classify(&self, width: u32) -> DeviceTier {
        classify(width, self.mobile_max, self.tablet_max)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new(767, 900)
    }
}
