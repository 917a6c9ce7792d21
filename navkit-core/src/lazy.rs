//! # Lazy Image Loader
//!
//! Images carrying a deferred source (`data-src`) are handed to the host's
//! proximity observer. The first time one comes within the root margin of
//! the viewport, its deferred source is promoted to `src` and observation
//! stops. Each image goes through that transition exactly once.
//!
//! Without `IntersectionObserver` the loader stays inactive; see
//! [`Coordinator::register_lazy_image`](crate::Coordinator::register_lazy_image)
//! for the eager fallback.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, Feature};
use crate::geometry::Rect;
use crate::{CoordinatorError, CoordinatorResult};

/// Attribute holding the deferred source.
pub const DEFERRED_SOURCE_ATTR: &str = "data-src";

/// Selector matching images that still have a deferred source.
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";

/// Default proximity margin around the viewport.
pub const DEFAULT_ROOT_MARGIN: &str = "100px";

/// Host-assigned identity of a tracked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img#{}", self.0)
    }
}

/// An image waiting for its source swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyImageEntry {
    /// Which image.
    pub id: ImageId,
    /// Value of the deferred source attribute.
    pub pending_src: String,
}

/// Margin around the viewport inside which images start loading.
///
/// Parsed from CSS margin shorthand (one to four lengths, `px` or a bare
/// `0`), the same syntax `IntersectionObserver` accepts for `rootMargin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    /// Top extension.
    pub top: f64,
    /// Right extension.
    pub right: f64,
    /// Bottom extension.
    pub bottom: f64,
    /// Left extension.
    pub left: f64,
}

impl RootMargin {
    /// Same margin on all four sides.
    #[must_use]
    pub const fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// Parse CSS margin shorthand.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConfig`] for empty input, more than
    /// four values, or values that are not pixel lengths.
    pub fn parse(input: &str) -> CoordinatorResult<Self> {
        let values = input
            .split_whitespace()
            .map(parse_length)
            .collect::<CoordinatorResult<Vec<f64>>>()?;

        match values.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(CoordinatorError::InvalidConfig(format!(
                "root margin must have one to four values, got '{input}'"
            ))),
        }
    }

    /// Canonical four-value CSS form, suitable for `rootMargin`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }

    /// Whether `target` lies within this margin of `viewport`.
    #[must_use]
    pub fn within(&self, target: &Rect, viewport: &Rect) -> bool {
        viewport
            .expand(self.top, self.right, self.bottom, self.left)
            .intersects(target)
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(100.0)
    }
}

fn parse_length(token: &str) -> CoordinatorResult<f64> {
    let number = match token.strip_suffix("px") {
        Some(number) => number,
        None if token.parse::<f64>().is_ok_and(|v| v == 0.0) => token,
        None => {
            return Err(CoordinatorError::InvalidConfig(format!(
                "root margin value '{token}' must be a pixel length"
            )))
        }
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CoordinatorError::InvalidConfig(format!("root margin value '{token}' is not a number"))
        })
}

/// The DOM seam for deferred images.
pub trait ImageHost {
    /// Start proximity observation of an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is unknown or the observer could not
    /// be created.
    fn observe(&mut self, id: ImageId, margin: &RootMargin) -> CoordinatorResult<()>;

    /// Stop observing an image.
    fn unobserve(&mut self, id: ImageId);

    /// Promote the deferred source to `src` and drop the marker attribute.
    fn swap_source(&mut self, id: ImageId, src: &str);
}

/// Whether the loader is observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoaderStatus {
    /// Not activated yet, or deactivated.
    Inactive,
    /// Observing registered images.
    Active,
    /// `IntersectionObserver` is absent; the loader never activates.
    Unsupported,
}

/// Tracks deferred images until they load.
#[derive(Debug, Clone)]
pub struct LazyImageLoader {
    margin: RootMargin,
    status: LoaderStatus,
    entries: HashMap<ImageId, LazyImageEntry>,
    loaded: usize,
}

impl LazyImageLoader {
    /// Create an inactive loader.
    #[must_use]
    pub fn new(margin: RootMargin) -> Self {
        Self {
            margin,
            status: LoaderStatus::Inactive,
            entries: HashMap::new(),
            loaded: 0,
        }
    }

    /// Proximity margin.
    #[must_use]
    pub const fn margin(&self) -> &RootMargin {
        &self.margin
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> LoaderStatus {
        self.status
    }

    /// Images still waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Images swapped so far.
    #[must_use]
    pub const fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Whether `id` is still waiting.
    #[must_use]
    pub fn is_pending(&self, id: ImageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Activate if the environment supports proximity observation.
    pub fn activate(&mut self, capabilities: &Capabilities) -> LoaderStatus {
        self.status = match capabilities.require(Feature::IntersectionObserver) {
            Ok(()) => LoaderStatus::Active,
            Err(err) => {
                tracing::info!("Lazy loading disabled: {err}");
                LoaderStatus::Unsupported
            }
        };
        self.status
    }

    /// Begin tracking an image.
    ///
    /// Registering an id that is already pending only updates its source.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Unsupported`] if the loader is not
    /// active, or the host's error if observation fails.
    pub fn register<H: ImageHost + ?Sized>(
        &mut self,
        id: ImageId,
        pending_src: impl Into<String>,
        host: &mut H,
    ) -> CoordinatorResult<()> {
        if self.status != LoaderStatus::Active {
            return Err(CoordinatorError::Unsupported(Feature::IntersectionObserver));
        }
        let pending_src = pending_src.into();
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.pending_src = pending_src;
            return Ok(());
        }
        host.observe(id, &self.margin)?;
        self.entries.insert(id, LazyImageEntry { id, pending_src });
        Ok(())
    }

    /// Handle an observer notification. Returns `true` if the image was
    /// swapped by this call.
    pub fn on_intersection<H: ImageHost + ?Sized>(
        &mut self,
        id: ImageId,
        is_intersecting: bool,
        host: &mut H,
    ) -> bool {
        if !is_intersecting {
            return false;
        }
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        host.swap_source(id, &entry.pending_src);
        host.unobserve(id);
        self.loaded += 1;
        tracing::debug!("Loaded deferred image {id}: {}", entry.pending_src);
        true
    }

    /// Stop observing everything and forget pending images.
    pub fn deactivate<H: ImageHost + ?Sized>(&mut self, host: &mut H) {
        for id in self.entries.keys() {
            host.unobserve(*id);
        }
        self.entries.clear();
        if self.status == LoaderStatus::Active {
            self.status = LoaderStatus::Inactive;
        }
    }
}

impl Default for LazyImageLoader {
    fn default() -> Self {
        Self::new(RootMargin::default())
    }
}
