//! # Navigation State Machine
//!
//! Owns the open/closed state of the collapsible menu, projects it onto the
//! DOM through a [`NavHost`], and manages the lifetime of the mobile-only
//! listeners.
//!
//! ```text
//!            toggle / swipe right
//!   Closed ───────────────────────▶ Open
//!     ▲                              │
//!     └──────────────────────────────┘
//!   toggle, link, outside click, Escape,
//!   swipe left, tier becomes desktop
//! ```
//!
//! Listener handles are tracked here rather than in the host so that every
//! (re-)initialization can detach what it attached before. Calling
//! [`NavStateMachine::init`] any number of times leaves exactly one set bound.

use serde::{Deserialize, Serialize};

use crate::breakpoint::DeviceTier;
use crate::event::ClickTarget;
use crate::gesture::SwipeDirection;
use crate::CoordinatorResult;

/// A listener the state machine asks the host to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerKind {
    /// `click` on the toggle.
    ToggleClick,
    /// `click` on the menu, delegated to anchors.
    MenuClick,
    /// `click` anywhere in the document.
    OutsideClick,
    /// `keydown` in the document, filtered to Escape.
    EscapeKey,
    /// `touchstart` in the document.
    TouchStart,
    /// `touchmove` in the document.
    TouchMove,
    /// `touchend` in the document.
    TouchEnd,
    /// `touchcancel` in the document.
    TouchCancel,
}

impl ListenerKind {
    /// Listeners that drive the collapsible menu.
    pub const MENU: [Self; 4] = [
        Self::ToggleClick,
        Self::MenuClick,
        Self::OutsideClick,
        Self::EscapeKey,
    ];

    /// Listeners feeding the gesture recognizer.
    pub const GESTURE: [Self; 4] = [
        Self::TouchStart,
        Self::TouchMove,
        Self::TouchEnd,
        Self::TouchCancel,
    ];

    /// DOM event type the listener subscribes to.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::ToggleClick | Self::MenuClick | Self::OutsideClick => "click",
            Self::EscapeKey => "keydown",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
        }
    }
}

/// Opaque handle issued by the host for an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

/// The DOM seam for the navigation pair.
pub trait NavHost {
    /// Look up the toggle and menu elements.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::MissingElement`](crate::CoordinatorError::MissingElement)
    /// naming the selector that matched nothing.
    fn locate(&mut self) -> CoordinatorResult<()>;

    /// Attach a listener and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener target is unavailable.
    fn attach(&mut self, kind: ListenerKind) -> CoordinatorResult<ListenerHandle>;

    /// Detach a listener previously returned by [`attach`](Self::attach).
    fn detach(&mut self, handle: ListenerHandle);

    /// Toggle the active marker class on the toggle and the menu.
    fn set_active(&mut self, active: bool);

    /// Write `aria-expanded` on the toggle.
    fn set_expanded(&mut self, expanded: bool);

    /// Lock or release body scrolling.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Move keyboard focus to the toggle.
    fn focus_toggle(&mut self);
}

/// Something that can move the menu between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NavEvent {
    /// The toggle was clicked.
    ToggleActivated,
    /// A link inside the menu was clicked.
    LinkActivated,
    /// A click landed outside both the toggle and the menu.
    OutsideInteraction,
    /// Escape was pressed.
    EscapeKey,
    /// The gesture recognizer resolved a swipe.
    Swipe(SwipeDirection),
    /// The viewport was reclassified.
    TierChanged(DeviceTier),
}

impl NavEvent {
    /// Translate a click location into a menu event, if it is one.
    #[must_use]
    pub const fn from_click(target: ClickTarget) -> Option<Self> {
        match target {
            ClickTarget::Toggle => Some(Self::ToggleActivated),
            ClickTarget::MenuLink => Some(Self::LinkActivated),
            ClickTarget::Outside => Some(Self::OutsideInteraction),
            ClickTarget::MenuOther => None,
        }
    }
}

/// Outcome of an initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitStatus {
    /// `init` has not run, or `teardown` undid it.
    Uninitialized,
    /// Mobile or tablet: listeners are bound.
    Bound,
    /// Desktop: the elements exist but no listeners are needed.
    Inert,
    /// The toggle or menu is missing; safe to retry later.
    Unavailable,
}

/// Visible effect of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Closed to open.
    Opened,
    /// Open to closed.
    Closed,
    /// No state change and no DOM writes.
    Unchanged,
}

/// A listener the machine currently owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundListener {
    /// What it listens for.
    pub kind: ListenerKind,
    /// Host handle used to detach it.
    pub handle: ListenerHandle,
}

/// Menu state. `is_open` is never true on desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    /// Whether the collapsible menu is expanded.
    pub is_open: bool,
    /// Current device tier.
    pub tier: DeviceTier,
    /// Listeners attached for the current toggle/menu pair.
    pub bound: Vec<BoundListener>,
}

/// The navigation state machine.
#[derive(Debug, Clone)]
pub struct NavStateMachine {
    state: NavState,
    status: InitStatus,
    gestures_enabled: bool,
}

impl NavStateMachine {
    /// Create an unbound, closed machine for the given tier.
    ///
    /// Touch listeners are requested only when `gestures_enabled` is set.
    #[must_use]
    pub const fn new(tier: DeviceTier, gestures_enabled: bool) -> Self {
        Self {
            state: NavState {
                is_open: false,
                tier,
                bound: Vec::new(),
            },
            status: InitStatus::Uninitialized,
            gestures_enabled,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &NavState {
        &self.state
    }

    /// Whether the menu is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Current tier.
    #[must_use]
    pub const fn tier(&self) -> DeviceTier {
        self.state.tier
    }

    /// Result of the last initialization.
    #[must_use]
    pub const fn status(&self) -> InitStatus {
        self.status
    }

    /// Whether swipe listeners are part of the mobile set.
    #[must_use]
    pub const fn gestures_enabled(&self) -> bool {
        self.gestures_enabled
    }

    /// Number of listeners currently attached.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.state.bound.len()
    }

    /// Whether a listener of `kind` is attached.
    #[must_use]
    pub fn is_bound(&self, kind: ListenerKind) -> bool {
        self.state.bound.iter().any(|l| l.kind == kind)
    }

    /// Bind (or re-bind) to the current toggle/menu pair.
    ///
    /// Always detaches previously attached listeners first. A missing
    /// element yields [`InitStatus::Unavailable`] and binds nothing.
    pub fn init<H: NavHost + ?Sized>(&mut self, host: &mut H) -> InitStatus {
        self.unbind_all(host);

        if let Err(err) = host.locate() {
            tracing::warn!("Navigation unavailable: {err}");
            self.status = InitStatus::Unavailable;
            return self.status;
        }

        if self.state.tier.is_desktop() {
            self.state.is_open = false;
            self.project(host);
            self.status = InitStatus::Inert;
        } else {
            // Re-project so a freshly located pair matches the current state.
            self.project(host);
            self.status = match self.bind_mobile(host) {
                Ok(()) => InitStatus::Bound,
                Err(err) => {
                    tracing::warn!("Failed to bind navigation listeners: {err}");
                    self.unbind_all(host);
                    InitStatus::Unavailable
                }
            };
        }

        tracing::debug!(
            "Navigation initialized for {} ({:?}, {} listeners)",
            self.state.tier,
            self.status,
            self.state.bound.len()
        );
        self.status
    }

    /// Detach everything and restore the closed projection.
    pub fn teardown<H: NavHost + ?Sized>(&mut self, host: &mut H) {
        self.unbind_all(host);
        let located = matches!(self.status, InitStatus::Bound | InitStatus::Inert);
        self.state.is_open = false;
        if located {
            self.project(host);
        }
        self.status = InitStatus::Uninitialized;
    }

    /// Apply an event.
    pub fn handle<H: NavHost + ?Sized>(&mut self, event: NavEvent, host: &mut H) -> Transition {
        let transition = match event {
            NavEvent::TierChanged(tier) => return self.change_tier(tier, host),
            NavEvent::ToggleActivated => {
                if self.state.is_open {
                    self.close(host)
                } else {
                    self.open(host)
                }
            }
            NavEvent::LinkActivated
            | NavEvent::OutsideInteraction
            | NavEvent::Swipe(SwipeDirection::Left) => self.close(host),
            NavEvent::EscapeKey => {
                let transition = self.close(host);
                if transition == Transition::Closed {
                    host.focus_toggle();
                }
                transition
            }
            NavEvent::Swipe(SwipeDirection::Right) => self.open(host),
        };
        if transition != Transition::Unchanged {
            tracing::debug!("Menu {transition:?} via {event:?}");
        }
        transition
    }

    fn change_tier<H: NavHost + ?Sized>(&mut self, tier: DeviceTier, host: &mut H) -> Transition {
        let previous = self.state.tier;
        if previous == tier {
            return Transition::Unchanged;
        }
        self.state.tier = tier;
        tracing::debug!("Tier changed: {previous} -> {tier}");

        let transition = if tier.is_desktop() && self.state.is_open {
            self.state.is_open = false;
            Transition::Closed
        } else {
            Transition::Unchanged
        };

        match self.status {
            // Not started yet; the first init will pick up the new tier.
            InitStatus::Uninitialized => {
                if transition == Transition::Closed {
                    self.project(host);
                }
            }
            // Rebinding also retries the lookup for an unavailable pair.
            InitStatus::Bound | InitStatus::Inert | InitStatus::Unavailable => {
                self.init(host);
            }
        }
        transition
    }

    fn open<H: NavHost + ?Sized>(&mut self, host: &mut H) -> Transition {
        if self.state.is_open || self.state.tier.is_desktop() {
            return Transition::Unchanged;
        }
        self.state.is_open = true;
        self.project(host);
        Transition::Opened
    }

    fn close<H: NavHost + ?Sized>(&mut self, host: &mut H) -> Transition {
        if !self.state.is_open {
            return Transition::Unchanged;
        }
        self.state.is_open = false;
        self.project(host);
        Transition::Closed
    }

    fn project<H: NavHost + ?Sized>(&self, host: &mut H) {
        debug_assert!(
            !(self.state.is_open && self.state.tier.is_desktop()),
            "menu must be closed on desktop"
        );
        let open = self.state.is_open;
        host.set_active(open);
        host.set_expanded(open);
        host.set_scroll_locked(open);
    }

    fn bind_mobile<H: NavHost + ?Sized>(&mut self, host: &mut H) -> CoordinatorResult<()> {
        let gestures: &[ListenerKind] = if self.gestures_enabled {
            &ListenerKind::GESTURE
        } else {
            &[]
        };
        for &kind in ListenerKind::MENU.iter().chain(gestures) {
            let handle = host.attach(kind)?;
            self.state.bound.push(BoundListener { kind, handle });
        }
        Ok(())
    }

    fn unbind_all<H: NavHost + ?Sized>(&mut self, host: &mut H) {
        for listener in self.state.bound.drain(..) {
            host.detach(listener.handle);
        }
    }
}
