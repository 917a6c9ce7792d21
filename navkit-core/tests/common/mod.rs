//! Shared in-memory page for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use navkit_core::{
    CoordinatorError, CoordinatorResult, FocusHost, ImageHost, ImageId, InteractiveTarget,
    LayoutProbe, ListenerHandle, ListenerKind, MotionHost, NavHost, Rect, RootMargin,
};

/// A deferred image placed somewhere on the page.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub rect: Rect,
    pub src: Option<String>,
    pub swaps: u32,
}

/// Records every DOM effect the coordinator asks for.
#[derive(Debug)]
pub struct FakePage {
    pub has_toggle: bool,
    pub has_menu: bool,
    pub fail_attach: Option<ListenerKind>,
    next_handle: u64,
    pub listeners: BTreeMap<ListenerHandle, ListenerKind>,
    pub attach_calls: usize,

    pub active: bool,
    pub expanded: bool,
    pub scroll_locked: bool,
    pub toggle_focus_calls: usize,

    pub images: HashMap<ImageId, PageImage>,
    pub observed: HashMap<ImageId, RootMargin>,

    pub reduced_marker: bool,
    pub transition_duration: Option<String>,
    pub static_fallback: bool,

    pub has_focus: bool,
    pub highlighted: usize,
    pub last_highlight_ms: Option<u32>,

    pub scroll_y: f64,
    pub viewport: (f64, f64),
}

impl Default for FakePage {
    fn default() -> Self {
        Self {
            has_toggle: true,
            has_menu: true,
            fail_attach: None,
            next_handle: 0,
            listeners: BTreeMap::new(),
            attach_calls: 0,
            active: false,
            expanded: false,
            scroll_locked: false,
            toggle_focus_calls: 0,
            images: HashMap::new(),
            observed: HashMap::new(),
            reduced_marker: false,
            transition_duration: None,
            static_fallback: false,
            has_focus: true,
            highlighted: 0,
            last_highlight_ms: None,
            scroll_y: 0.0,
            viewport: (400.0, 800.0),
        }
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page without the navigation pair.
    pub fn without_nav() -> Self {
        Self {
            has_toggle: false,
            has_menu: false,
            ..Self::default()
        }
    }

    /// Page whose host refuses to attach listeners of `kind`.
    pub fn failing_attach(kind: ListenerKind) -> Self {
        Self {
            fail_attach: Some(kind),
            ..Self::default()
        }
    }

    pub fn add_image(&mut self, id: u32, top: f64) -> ImageId {
        let id = ImageId(id);
        self.images.insert(
            id,
            PageImage {
                rect: Rect::new(0.0, top, 300.0, 200.0),
                src: None,
                swaps: 0,
            },
        );
        id
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    /// Whether the projected DOM shows a consistent open/closed menu.
    pub fn projection(&self) -> Option<bool> {
        if self.active == self.expanded && self.expanded == self.scroll_locked {
            Some(self.active)
        } else {
            None
        }
    }

    /// Observed images currently within the root margin of the viewport.
    pub fn intersecting(&self) -> Vec<ImageId> {
        let viewport = Rect::new(0.0, self.scroll_y, self.viewport.0, self.viewport.1);
        let mut ids: Vec<_> = self
            .observed
            .iter()
            .filter(|(id, margin)| {
                self.images
                    .get(*id)
                    .is_some_and(|image| margin.within(&image.rect, &viewport))
            })
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl NavHost for FakePage {
    fn locate(&mut self) -> CoordinatorResult<()> {
        if !self.has_toggle {
            return Err(CoordinatorError::MissingElement(".nav-toggle".to_string()));
        }
        if !self.has_menu {
            return Err(CoordinatorError::MissingElement(".nav-links".to_string()));
        }
        Ok(())
    }

    fn attach(&mut self, kind: ListenerKind) -> CoordinatorResult<ListenerHandle> {
        self.attach_calls += 1;
        if self.fail_attach == Some(kind) {
            return Err(CoordinatorError::Dom(format!("cannot listen for {kind:?}")));
        }
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.listeners.insert(handle, kind);
        Ok(handle)
    }

    fn detach(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focus_toggle(&mut self) {
        self.toggle_focus_calls += 1;
    }
}

impl ImageHost for FakePage {
    fn observe(&mut self, id: ImageId, margin: &RootMargin) -> CoordinatorResult<()> {
        if !self.images.contains_key(&id) {
            return Err(CoordinatorError::MissingElement(id.to_string()));
        }
        self.observed.insert(id, *margin);
        Ok(())
    }

    fn unobserve(&mut self, id: ImageId) {
        self.observed.remove(&id);
    }

    fn swap_source(&mut self, id: ImageId, src: &str) {
        if let Some(image) = self.images.get_mut(&id) {
            image.src = Some(src.to_string());
            image.swaps += 1;
        }
    }
}

impl MotionHost for FakePage {
    fn set_reduced_motion_marker(&mut self, reduced: bool) {
        self.reduced_marker = reduced;
    }

    fn set_transition_duration(&mut self, duration: &str) {
        self.transition_duration = Some(duration.to_string());
    }

    fn set_static_fallback(&mut self, enabled: bool) {
        self.static_fallback = enabled;
    }
}

impl FocusHost for FakePage {
    fn highlight_focused(&mut self, clear_after_ms: u32) -> bool {
        if !self.has_focus {
            return false;
        }
        self.highlighted += 1;
        self.last_highlight_ms = Some(clear_after_ms);
        true
    }
}

/// Layout whose content is `content_width` wide regardless of viewport.
#[derive(Debug, Default)]
pub struct FakeLayout {
    pub content_width: f64,
    pub targets: Vec<InteractiveTarget>,
    pub simulated: Option<u32>,
    pub visited: Vec<u32>,
}

impl LayoutProbe for FakeLayout {
    fn simulate_width(&mut self, width: u32) {
        self.simulated = Some(width);
        self.visited.push(width);
    }

    fn restore_width(&mut self) {
        self.simulated = None;
    }

    fn scroll_width(&self) -> f64 {
        self.content_width.max(self.viewport_width())
    }

    fn viewport_width(&self) -> f64 {
        self.simulated.map(f64::from).unwrap_or(1280.0)
    }

    fn interactive_targets(&self) -> Vec<InteractiveTarget> {
        self.targets.clone()
    }
}
