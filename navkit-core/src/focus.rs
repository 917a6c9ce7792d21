//! Transient highlighting of keyboard focus.
//!
//! Pressing Tab marks the focused element with [`KEYBOARD_FOCUSED_CLASS`];
//! the host clears the class again after the configured delay. This is
//! advisory styling only.

use crate::event::Key;

/// Class applied to the element focused by keyboard traversal.
pub const KEYBOARD_FOCUSED_CLASS: &str = "keyboard-focused";

/// Default time the highlight stays visible.
pub const DEFAULT_HIGHLIGHT_MS: u32 = 1200;

/// The DOM seam for focus highlighting.
pub trait FocusHost {
    /// Mark the currently focused element and schedule removal after
    /// `clear_after_ms`. Returns `false` if nothing is focused.
    fn highlight_focused(&mut self, clear_after_ms: u32) -> bool;
}

/// Reacts to Tab presses.
#[derive(Debug, Clone)]
pub struct FocusHighlighter {
    clear_after_ms: u32,
    highlights: u64,
}

impl FocusHighlighter {
    /// Create a highlighter with the given highlight duration.
    #[must_use]
    pub const fn new(clear_after_ms: u32) -> Self {
        Self {
            clear_after_ms,
            highlights: 0,
        }
    }

    /// Highlight duration.
    #[must_use]
    pub const fn clear_after_ms(&self) -> u32 {
        self.clear_after_ms
    }

    /// Number of highlights applied so far.
    #[must_use]
    pub const fn highlights(&self) -> u64 {
        self.highlights
    }

    /// Handle a key press. Returns `true` if a highlight was applied.
    pub fn on_key<H: FocusHost + ?Sized>(&mut self, key: Key, host: &mut H) -> bool {
        if key != Key::Tab {
            return false;
        }
        let applied = host.highlight_focused(self.clear_after_ms);
        if applied {
            self.highlights += 1;
        }
        applied
    }
}

impl Default for FocusHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_MS)
    }
}
