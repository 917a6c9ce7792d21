//! # Responsive Interaction Coordinator
//!
//! Single owner of every component. The host creates one coordinator,
//! calls [`Coordinator::init`] once the document is ready, forwards browser
//! events to the `on_*` methods, and may call [`Coordinator::reinit`] after
//! loading content dynamically. [`Coordinator::teardown`] undoes everything.
//!
//! ```text
//!  resize ──▶ Debouncer ──▶ classify ──▶ NavStateMachine ◀── GestureRecognizer ◀── touch
//!                                  └────▶ MotionAdjuster  ◀── reduced-motion change
//!  click / Escape ──────────────────────▶ NavStateMachine
//!  Tab ─────────────────────────────────▶ FocusHighlighter
//!  intersection ────────────────────────▶ LazyImageLoader
//! ```

use serde::Serialize;

use crate::breakpoint::{Breakpoints, DeviceTier};
use crate::capability::{Capabilities, Feature};
use crate::config::CoordinatorConfig;
use crate::debounce::{DebounceTicket, Debouncer};
use crate::diagnostics::{DiagnosticsReport, LayoutProbe, SelfTest};
use crate::event::{ClickTarget, Key, TouchEvent};
use crate::focus::{FocusHighlighter, FocusHost};
use crate::gesture::GestureRecognizer;
use crate::lazy::{ImageHost, ImageId, LazyImageLoader, LoaderStatus};
use crate::motion::{MotionAdjuster, MotionHost, MotionPreference};
use crate::nav::{InitStatus, NavEvent, NavHost, NavStateMachine, Transition};
use crate::CoordinatorResult;

/// Everything the coordinator needs from the page.
pub trait Host: NavHost + ImageHost + MotionHost + FocusHost {}

impl<T: NavHost + ImageHost + MotionHost + FocusHost + ?Sized> Host for T {}

/// Point-in-time view of the coordinator, for debugging from the console.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorSnapshot {
    /// Last classified viewport width.
    pub viewport_width: u32,
    /// Current tier.
    pub tier: DeviceTier,
    /// Whether the menu is expanded.
    pub is_open: bool,
    /// Navigation initialization status.
    pub nav_status: InitStatus,
    /// Listeners currently attached by the navigation machine.
    pub bound_listeners: usize,
    /// Probed capabilities.
    pub capabilities: Capabilities,
    /// Whether reduced motion is in effect.
    pub reduced_motion: bool,
    /// Lazy loader status.
    pub lazy_status: LoaderStatus,
    /// Deferred images not yet loaded.
    pub pending_images: usize,
    /// Whether a resize reclassification is pending.
    pub resize_pending: bool,
}

/// The coordinator.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: CoordinatorConfig,
    capabilities: Capabilities,
    breakpoints: Breakpoints,
    viewport_width: u32,
    pending_width: Option<u32>,
    resize: Debouncer,
    nav: NavStateMachine,
    gestures: GestureRecognizer,
    lazy: LazyImageLoader,
    motion: MotionAdjuster,
    focus: FocusHighlighter,
    initialized: bool,
}

impl Coordinator {
    /// Create a coordinator for the current viewport.
    ///
    /// Nothing is bound until [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        config: CoordinatorConfig,
        capabilities: Capabilities,
        viewport_width: u32,
        preference: MotionPreference,
    ) -> CoordinatorResult<Self> {
        config.validate()?;
        let breakpoints = config.breakpoints();
        let margin = config.root_margin()?;
        let tier = breakpoints.classify(viewport_width);
        let gestures_enabled = capabilities.supports(Feature::CoarsePointer);

        #[allow(clippy::cast_precision_loss)]
        let threshold = config.swipe_threshold as f32;

        Ok(Self {
            resize: Debouncer::new(config.debounce_ms),
            nav: NavStateMachine::new(tier, gestures_enabled),
            gestures: GestureRecognizer::new(threshold),
            lazy: LazyImageLoader::new(margin),
            motion: MotionAdjuster::new(preference, tier),
            focus: FocusHighlighter::new(config.focus_highlight_ms),
            config,
            capabilities,
            breakpoints,
            viewport_width,
            pending_width: None,
            initialized: false,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Probed capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Current tier.
    #[must_use]
    pub const fn tier(&self) -> DeviceTier {
        self.nav.tier()
    }

    /// Whether the menu is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.nav.is_open()
    }

    /// Navigation state machine.
    #[must_use]
    pub const fn nav(&self) -> &NavStateMachine {
        &self.nav
    }

    /// Lazy image loader.
    #[must_use]
    pub const fn lazy(&self) -> &LazyImageLoader {
        &self.lazy
    }

    /// Whether [`init`](Self::init) has run since construction or teardown.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Quiet period the host should use for the resize timer.
    #[must_use]
    pub const fn resize_delay_ms(&self) -> u32 {
        self.resize.delay_ms()
    }

    /// Bind navigation, activate lazy loading and run the motion pass.
    ///
    /// Safe to call repeatedly; see [`reinit`](Self::reinit).
    pub fn init<H: Host + ?Sized>(&mut self, host: &mut H) -> InitStatus {
        let status = self.nav.init(host);
        if self.lazy.status() == LoaderStatus::Inactive {
            self.lazy.activate(&self.capabilities);
        }
        self.motion.apply(host);
        if !self.initialized {
            tracing::info!(
                "Coordinator initialized at {}px ({}): navigation {status:?}, lazy loading {:?}",
                self.viewport_width,
                self.tier(),
                self.lazy.status()
            );
        }
        self.initialized = true;
        status
    }

    /// Re-run initialization, e.g. after content was injected.
    ///
    /// Detaches the previous listener set before attaching a new one, so
    /// repeated calls never accumulate handlers.
    pub fn reinit<H: Host + ?Sized>(&mut self, host: &mut H) -> InitStatus {
        tracing::debug!("Re-initializing coordinator");
        self.init(host)
    }

    /// Detach every listener, stop observing images and close the menu.
    pub fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.nav.teardown(host);
        self.lazy.deactivate(host);
        self.gestures.reset();
        self.resize.cancel();
        self.pending_width = None;
        self.initialized = false;
        tracing::info!("Coordinator torn down");
    }

    /// Record a resize and (re)start the debounce window.
    ///
    /// The host arms a timer for [`resize_delay_ms`](Self::resize_delay_ms)
    /// and calls [`on_resize_settled`](Self::on_resize_settled) with the
    /// returned ticket when it fires.
    pub fn on_resize(&mut self, width: u32) -> DebounceTicket {
        self.pending_width = Some(width);
        self.resize.schedule()
    }

    /// Reclassify after the debounce window. Stale tickets are ignored.
    ///
    /// Returns the new tier if it changed.
    pub fn on_resize_settled<H: Host + ?Sized>(
        &mut self,
        ticket: DebounceTicket,
        host: &mut H,
    ) -> Option<DeviceTier> {
        if !self.resize.fire(ticket) {
            return None;
        }
        let width = self.pending_width.take()?;
        self.viewport_width = width;
        let tier = self.breakpoints.classify(width);
        if tier == self.nav.tier() {
            return None;
        }
        tracing::info!("Viewport {width}px is now {tier}");
        self.nav.handle(NavEvent::TierChanged(tier), host);
        if tier.is_desktop() {
            self.gestures.reset();
        }
        self.motion.set_tier(tier, host);
        Some(tier)
    }

    /// Route a click on or around the navigation pair.
    pub fn on_click<H: NavHost + ?Sized>(
        &mut self,
        target: ClickTarget,
        host: &mut H,
    ) -> Transition {
        match NavEvent::from_click(target) {
            Some(event) => self.nav.handle(event, host),
            None => Transition::Unchanged,
        }
    }

    /// Route a key press from the navigation's Escape listener.
    pub fn on_nav_key<H: NavHost + ?Sized>(&mut self, key: Key, host: &mut H) -> Transition {
        if key == Key::Escape {
            self.nav.handle(NavEvent::EscapeKey, host)
        } else {
            Transition::Unchanged
        }
    }

    /// Route a key press from the document-wide keyboard listener.
    pub fn on_key<H: FocusHost + ?Sized>(&mut self, key: Key, host: &mut H) -> bool {
        self.focus.on_key(key, host)
    }

    /// Feed the gesture recognizer; a resolved swipe drives the menu.
    pub fn on_touch<H: NavHost + ?Sized>(
        &mut self,
        event: &TouchEvent,
        host: &mut H,
    ) -> Transition {
        if !self.nav.gestures_enabled() {
            return Transition::Unchanged;
        }
        match self.gestures.process(event) {
            Some(direction) => self.nav.handle(NavEvent::Swipe(direction), host),
            None => Transition::Unchanged,
        }
    }

    /// The reduced-motion media query changed.
    pub fn on_motion_preference_changed<H: MotionHost + ?Sized>(
        &mut self,
        preference: MotionPreference,
        host: &mut H,
    ) {
        tracing::debug!("Reduced motion preference: {}", preference.prefers_reduced);
        self.motion.set_preference(preference, host);
    }

    /// Hand a deferred image to the loader.
    ///
    /// When lazy loading is unavailable the source is swapped immediately so
    /// the image still appears.
    pub fn register_lazy_image<H: ImageHost + ?Sized>(
        &mut self,
        id: ImageId,
        pending_src: &str,
        host: &mut H,
    ) {
        if let Err(err) = self.lazy.register(id, pending_src, host) {
            tracing::debug!("Loading {id} eagerly: {err}");
            host.swap_source(id, pending_src);
        }
    }

    /// The proximity observer reported on an image.
    pub fn on_image_intersection<H: ImageHost + ?Sized>(
        &mut self,
        id: ImageId,
        is_intersecting: bool,
        host: &mut H,
    ) -> bool {
        self.lazy.on_intersection(id, is_intersecting, host)
    }

    /// Run the responsive self-test with the configured widths.
    pub fn run_diagnostics<P: LayoutProbe + ?Sized>(&self, probe: &mut P) -> DiagnosticsReport {
        SelfTest::from_config(&self.config).run(probe)
    }

    /// Debug view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            viewport_width: self.viewport_width,
            tier: self.nav.tier(),
            is_open: self.nav.is_open(),
            nav_status: self.nav.status(),
            bound_listeners: self.nav.bound_count(),
            capabilities: self.capabilities,
            reduced_motion: self.motion.preference().prefers_reduced,
            lazy_status: self.lazy.status(),
            pending_images: self.lazy.pending_count(),
            resize_pending: self.resize.is_pending(),
        }
    }
}
