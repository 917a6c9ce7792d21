//! The live DOM behind the coordinator's host traits.

use std::collections::HashMap;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use navkit_core::focus::KEYBOARD_FOCUSED_CLASS;
use navkit_core::lazy::{DEFERRED_SOURCE_ATTR, LAZY_IMAGE_SELECTOR};
use navkit_core::motion::{
    ANIMATED_SELECTOR, HEAVY_ANIMATION_SELECTOR, REDUCED_MOTION_CLASS, STATIC_FALLBACK_CLASS,
};
use navkit_core::{
    ClickTarget, CoordinatorConfig, CoordinatorError, CoordinatorResult, FocusHost, ImageHost,
    ImageId, Key, ListenerHandle, ListenerKind, MotionHost, NavHost, RootMargin, TouchEvent,
    TouchPhase, TouchPoint,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Node, Window,
};

use crate::runtime::{dispatch, WeakRuntime};

/// Attribute carrying the [`ImageId`] assigned to a deferred image.
pub(crate) const IMAGE_ID_ATTR: &str = "data-navkit-lazy";

/// Proximity observer plus the callback it calls into.
struct LazyObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl LazyObserver {
    fn new(margin: &RootMargin, runtime: WeakRuntime) -> CoordinatorResult<Self> {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(id) = image_id(&entry.target()) else {
                    continue;
                };
                let intersecting = entry.is_intersecting();
                dispatch(&runtime, |coordinator, host| {
                    coordinator.on_image_intersection(id, intersecting, host)
                });
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| CoordinatorError::Dom(format!("IntersectionObserver: {err:?}")))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for LazyObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn image_id(element: &Element) -> Option<ImageId> {
    element
        .get_attribute(IMAGE_ID_ATTR)
        .and_then(|raw| raw.parse().ok())
        .map(ImageId)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn touch_event(phase: TouchPhase, event: &web_sys::TouchEvent) -> TouchEvent {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|touch| {
            TouchPoint::new(
                touch.identifier(),
                touch.client_x() as f32,
                touch.client_y() as f32,
            )
        })
        .collect();
    TouchEvent::new(phase, touches, event.time_stamp().max(0.0) as u64)
}

const fn touch_phase(kind: ListenerKind) -> Option<TouchPhase> {
    match kind {
        ListenerKind::TouchStart => Some(TouchPhase::Start),
        ListenerKind::TouchMove => Some(TouchPhase::Move),
        ListenerKind::TouchEnd => Some(TouchPhase::End),
        ListenerKind::TouchCancel => Some(TouchPhase::Cancel),
        _ => None,
    }
}

pub(crate) struct DomHost {
    window: Window,
    document: Document,
    toggle_selector: String,
    menu_selector: String,
    active_class: String,
    runtime: WeakRuntime,
    toggle: Option<HtmlElement>,
    menu: Option<HtmlElement>,
    next_handle: u64,
    listeners: HashMap<ListenerHandle, EventListener>,
    next_image: u32,
    images: HashMap<ImageId, HtmlImageElement>,
    observer: Option<LazyObserver>,
}

impl DomHost {
    pub(crate) fn new(
        window: Window,
        document: Document,
        config: &CoordinatorConfig,
        runtime: WeakRuntime,
    ) -> Self {
        Self {
            window,
            document,
            toggle_selector: config.toggle_selector.clone(),
            menu_selector: config.menu_selector.clone(),
            active_class: config.active_class.clone(),
            runtime,
            toggle: None,
            menu: None,
            next_handle: 0,
            listeners: HashMap::new(),
            next_image: 0,
            images: HashMap::new(),
            observer: None,
        }
    }

    pub(crate) const fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) const fn document(&self) -> &Document {
        &self.document
    }

    /// Find deferred images, tagging new ones with an id.
    pub(crate) fn collect_lazy_images(&mut self) -> Vec<(ImageId, String)> {
        let Ok(nodes) = self.document.query_selector_all(LAZY_IMAGE_SELECTOR) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for index in 0..nodes.length() {
            let Some(image) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<HtmlImageElement>().ok())
            else {
                continue;
            };
            let Some(src) = image.get_attribute(DEFERRED_SOURCE_ATTR) else {
                continue;
            };
            let id = if let Some(id) = image_id(&image) {
                id
            } else {
                self.next_image += 1;
                let id = ImageId(self.next_image);
                if let Err(err) = image.set_attribute(IMAGE_ID_ATTR, &id.0.to_string()) {
                    tracing::warn!("Failed to tag deferred image: {err:?}");
                    continue;
                }
                id
            };
            self.images.insert(id, image);
            found.push((id, src));
        }
        tracing::debug!("Found {} deferred images", found.len());
        found
    }

    /// Drop every listener and the proximity observer.
    pub(crate) fn disconnect(&mut self) {
        self.listeners.clear();
        self.observer = None;
        self.images.clear();
        self.toggle = None;
        self.menu = None;
    }

    fn query_html(&self, selector: &str) -> CoordinatorResult<HtmlElement> {
        self.document
            .query_selector(selector)
            .map_err(|err| CoordinatorError::Dom(format!("{selector}: {err:?}")))?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| CoordinatorError::MissingElement(selector.to_string()))
    }

    fn located_toggle(&self) -> CoordinatorResult<HtmlElement> {
        self.toggle
            .clone()
            .ok_or_else(|| CoordinatorError::MissingElement(self.toggle_selector.clone()))
    }

    fn located_menu(&self) -> CoordinatorResult<HtmlElement> {
        self.menu
            .clone()
            .ok_or_else(|| CoordinatorError::MissingElement(self.menu_selector.clone()))
    }

    fn for_each_html(&self, selector: &str, mut f: impl FnMut(&HtmlElement)) {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            tracing::warn!("Invalid selector: {selector}");
            return;
        };
        for index in 0..nodes.length() {
            if let Some(element) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            {
                f(&element);
            }
        }
    }

    fn listen(&self, kind: ListenerKind) -> CoordinatorResult<EventListener> {
        let runtime = self.runtime.clone();
        let event_type = kind.event_type();

        let listener = match kind {
            ListenerKind::ToggleClick => {
                let toggle = self.located_toggle()?;
                EventListener::new_with_options(
                    &toggle,
                    event_type,
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        event.prevent_default();
                        event.stop_propagation();
                        dispatch(&runtime, |coordinator, host| {
                            coordinator.on_click(ClickTarget::Toggle, host)
                        });
                    },
                )
            }
            ListenerKind::MenuClick => {
                let menu = self.located_menu()?;
                EventListener::new(&menu, event_type, move |event| {
                    let on_link = event
                        .target()
                        .and_then(|target| target.dyn_into::<Element>().ok())
                        .is_some_and(|element| matches!(element.closest("a"), Ok(Some(_))));
                    let target = if on_link {
                        ClickTarget::MenuLink
                    } else {
                        ClickTarget::MenuOther
                    };
                    dispatch(&runtime, |coordinator, host| coordinator.on_click(target, host));
                })
            }
            ListenerKind::OutsideClick => {
                let toggle = self.located_toggle()?;
                let menu = self.located_menu()?;
                EventListener::new(&self.document, event_type, move |event| {
                    let node = event
                        .target()
                        .and_then(|target| target.dyn_into::<Node>().ok());
                    let inside = node.as_ref().is_some_and(|node| {
                        menu.contains(Some(node)) || toggle.contains(Some(node))
                    });
                    if !inside {
                        dispatch(&runtime, |coordinator, host| {
                            coordinator.on_click(ClickTarget::Outside, host)
                        });
                    }
                })
            }
            ListenerKind::EscapeKey => EventListener::new(&self.document, event_type, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = Key::from_dom_key(&event.key());
                if key == Key::Escape {
                    dispatch(&runtime, |coordinator, host| coordinator.on_nav_key(key, host));
                }
            }),
            ListenerKind::TouchStart
            | ListenerKind::TouchMove
            | ListenerKind::TouchEnd
            | ListenerKind::TouchCancel => {
                let Some(phase) = touch_phase(kind) else {
                    return Err(CoordinatorError::Dom(format!("{kind:?} is not a touch listener")));
                };
                EventListener::new(&self.document, event_type, move |event| {
                    let Some(event) = event.dyn_ref::<web_sys::TouchEvent>() else {
                        return;
                    };
                    let touch = touch_event(phase, event);
                    dispatch(&runtime, |coordinator, host| coordinator.on_touch(&touch, host));
                })
            }
        };
        Ok(listener)
    }
}

impl NavHost for DomHost {
    fn locate(&mut self) -> CoordinatorResult<()> {
        self.toggle = None;
        self.menu = None;
        let toggle = self.query_html(&self.toggle_selector)?;
        let menu = self.query_html(&self.menu_selector)?;
        self.toggle = Some(toggle);
        self.menu = Some(menu);
        Ok(())
    }

    fn attach(&mut self, kind: ListenerKind) -> CoordinatorResult<ListenerHandle> {
        let listener = self.listen(kind)?;
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.listeners.insert(handle, listener);
        Ok(handle)
    }

    fn detach(&mut self, handle: ListenerHandle) {
        // Dropping the listener removes it from its target.
        self.listeners.remove(&handle);
    }

    fn set_active(&mut self, active: bool) {
        for element in [&self.toggle, &self.menu].into_iter().flatten() {
            if let Err(err) = element
                .class_list()
                .toggle_with_force(&self.active_class, active)
            {
                tracing::warn!("Failed to toggle '{}': {err:?}", self.active_class);
            }
        }
    }

    fn set_expanded(&mut self, expanded: bool) {
        if let Some(toggle) = &self.toggle {
            let value = if expanded { "true" } else { "false" };
            if let Err(err) = toggle.set_attribute("aria-expanded", value) {
                tracing::warn!("Failed to set aria-expanded: {err:?}");
            }
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = result {
            tracing::warn!("Failed to update body overflow: {err:?}");
        }
    }

    fn focus_toggle(&mut self) {
        if let Some(toggle) = &self.toggle {
            if let Err(err) = toggle.focus() {
                tracing::warn!("Failed to focus toggle: {err:?}");
            }
        }
    }
}

impl ImageHost for DomHost {
    fn observe(&mut self, id: ImageId, margin: &RootMargin) -> CoordinatorResult<()> {
        let image = self
            .images
            .get(&id)
            .cloned()
            .ok_or_else(|| CoordinatorError::MissingElement(id.to_string()))?;
        if self.observer.is_none() {
            self.observer = Some(LazyObserver::new(margin, self.runtime.clone())?);
        }
        if let Some(lazy) = &self.observer {
            lazy.observer.observe(&image);
        }
        Ok(())
    }

    fn unobserve(&mut self, id: ImageId) {
        if let Some(image) = self.images.remove(&id) {
            if let Some(lazy) = &self.observer {
                lazy.observer.unobserve(&image);
            }
        }
    }

    fn swap_source(&mut self, id: ImageId, src: &str) {
        let Some(image) = self.images.get(&id) else {
            tracing::debug!("Swap requested for unknown image {id}");
            return;
        };
        image.set_src(src);
        if let Err(err) = image.remove_attribute(DEFERRED_SOURCE_ATTR) {
            tracing::warn!("Failed to clear {DEFERRED_SOURCE_ATTR} on {id}: {err:?}");
        }
    }
}

impl MotionHost for DomHost {
    fn set_reduced_motion_marker(&mut self, reduced: bool) {
        if let Some(root) = self.document.document_element() {
            if let Err(err) = root
                .class_list()
                .toggle_with_force(REDUCED_MOTION_CLASS, reduced)
            {
                tracing::warn!("Failed to toggle '{REDUCED_MOTION_CLASS}': {err:?}");
            }
        }
    }

    fn set_transition_duration(&mut self, duration: &str) {
        self.for_each_html(ANIMATED_SELECTOR, |element| {
            if let Err(err) = element
                .style()
                .set_property("transition-duration", duration)
            {
                tracing::warn!("Failed to set transition duration: {err:?}");
            }
        });
    }

    fn set_static_fallback(&mut self, enabled: bool) {
        if enabled {
            self.for_each_html(HEAVY_ANIMATION_SELECTOR, |element| {
                if let Err(err) = element.style().set_property("animation", "none") {
                    tracing::warn!("Failed to stop animation: {err:?}");
                }
                if let Err(err) = element.class_list().add_1(STATIC_FALLBACK_CLASS) {
                    tracing::warn!("Failed to add '{STATIC_FALLBACK_CLASS}': {err:?}");
                }
            });
        } else {
            self.for_each_html(&format!(".{STATIC_FALLBACK_CLASS}"), |element| {
                if let Err(err) = element.style().remove_property("animation") {
                    tracing::warn!("Failed to restore animation: {err:?}");
                }
                if let Err(err) = element.class_list().remove_1(STATIC_FALLBACK_CLASS) {
                    tracing::warn!("Failed to remove '{STATIC_FALLBACK_CLASS}': {err:?}");
                }
            });
        }
    }
}

impl FocusHost for DomHost {
    fn highlight_focused(&mut self, clear_after_ms: u32) -> bool {
        let Some(element) = self.document.active_element() else {
            return false;
        };
        if self
            .document
            .body()
            .is_some_and(|body| body.is_same_node(Some(&*element)))
        {
            return false;
        }
        if element.class_list().add_1(KEYBOARD_FOCUSED_CLASS).is_err() {
            return false;
        }
        Timeout::new(clear_after_ms, move || {
            if let Err(err) = element.class_list().remove_1(KEYBOARD_FOCUSED_CLASS) {
                tracing::warn!("Failed to remove '{KEYBOARD_FOCUSED_CLASS}': {err:?}");
            }
        })
        .forget();
        true
    }
}
