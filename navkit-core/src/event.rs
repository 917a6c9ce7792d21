//! Input events delivered by the host.

use serde::{Deserialize, Serialize};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the browser (e.g. scroll takeover).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: i32,
    /// X position in CSS pixels relative to the viewport.
    pub x: f32,
    /// Y position in CSS pixels relative to the viewport.
    pub y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: i32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// A touch event with the contacts still on the surface.
///
/// As in the DOM, `touches` lists the contacts that remain down, so an `End`
/// event for the last finger carries an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since page load.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Single-contact convenience constructor.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(phase, vec![TouchPoint::new(0, x, y)], timestamp_ms)
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Keys the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Focus traversal.
    Tab,
    /// Dismiss overlays.
    Escape,
    /// Anything else.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Where a click landed relative to the navigation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickTarget {
    /// The toggle button (or one of its children).
    Toggle,
    /// An anchor inside the menu.
    MenuLink,
    /// Inside the menu, but not on an anchor.
    MenuOther,
    /// Neither the toggle nor the menu.
    Outside,
}
