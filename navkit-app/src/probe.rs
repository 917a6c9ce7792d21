//! Browser feature detection and layout measurement.

use js_sys::Reflect;
use navkit_core::diagnostics::{INTERACTIVE_SELECTOR, TEST_WIDTH_PROPERTY};
use navkit_core::motion::REDUCED_MOTION_QUERY;
use navkit_core::{Capabilities, Feature, InteractiveTarget, LayoutProbe, MotionPreference, Rect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

/// Media query matching touch-first devices.
pub(crate) const COARSE_POINTER_QUERY: &str = "(pointer: coarse)";

fn window_has(window: &Window, name: &str) -> bool {
    Reflect::has(window, &JsValue::from_str(name)).unwrap_or(false)
}

/// Whether a media query currently matches. Unsupported queries never match.
pub(crate) fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .is_some_and(|list| list.matches())
}

/// Probe the optional APIs once.
pub(crate) fn detect_capabilities(window: &Window) -> Capabilities {
    let match_media = window_has(window, "matchMedia");
    let capabilities = Capabilities::none()
        .with(
            Feature::IntersectionObserver,
            window_has(window, "IntersectionObserver"),
        )
        .with(Feature::MatchMedia, match_media)
        .with(
            Feature::CoarsePointer,
            match_media && media_matches(window, COARSE_POINTER_QUERY),
        );
    tracing::debug!("Detected capabilities: {capabilities:?}");
    capabilities
}

/// Current reduced-motion preference.
pub(crate) fn motion_preference(window: &Window, capabilities: &Capabilities) -> MotionPreference {
    let reduced =
        capabilities.supports(Feature::MatchMedia) && media_matches(window, REDUCED_MOTION_QUERY);
    MotionPreference::new(reduced)
}

/// Viewport width in CSS pixels.
pub(crate) fn viewport_width(window: &Window) -> u32 {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_default();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = width.max(0.0).round() as u32;
    width
}

/// Short identification for an element in diagnostics output.
fn describe(element: &Element) -> String {
    let mut label = element.tag_name().to_lowercase();
    let id = element.id();
    if !id.is_empty() {
        label.push('#');
        label.push_str(&id);
    }
    for class in element.class_name().split_whitespace() {
        label.push('.');
        label.push_str(class);
    }
    label
}

/// [`LayoutProbe`] over the live document.
pub(crate) struct DomLayout {
    window: Window,
    document: Document,
}

impl DomLayout {
    pub(crate) fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn root_element(&self) -> Option<HtmlElement> {
        self.document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
    }
}

impl LayoutProbe for DomLayout {
    fn simulate_width(&mut self, width: u32) {
        if let Some(root) = self.root_element() {
            if let Err(err) = root
                .style()
                .set_property(TEST_WIDTH_PROPERTY, &format!("{width}px"))
            {
                tracing::warn!("Failed to simulate width {width}px: {err:?}");
            }
        }
    }

    fn restore_width(&mut self) {
        if let Some(root) = self.root_element() {
            if let Err(err) = root.style().remove_property(TEST_WIDTH_PROPERTY) {
                tracing::warn!("Failed to restore layout width: {err:?}");
            }
        }
    }

    fn scroll_width(&self) -> f64 {
        self.document
            .body()
            .map_or(0.0, |body| f64::from(body.scroll_width()))
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or_default()
    }

    fn interactive_targets(&self) -> Vec<InteractiveTarget> {
        let Ok(nodes) = self.document.query_selector_all(INTERACTIVE_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| {
                let rect = element.get_bounding_client_rect();
                InteractiveTarget {
                    label: describe(&element),
                    rect: Rect::new(rect.x(), rect.y(), rect.width(), rect.height()),
                }
            })
            .collect()
    }
}
