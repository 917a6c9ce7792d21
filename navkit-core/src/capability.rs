//! Browser capability flags.
//!
//! The host probes the environment once and hands the result to the
//! coordinator. Nothing here touches the environment itself, so absent APIs
//! simply show up as `false` and dependents pick their fallback path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoordinatorError, CoordinatorResult};

/// An optional browser feature the coordinator can take advantage of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// `IntersectionObserver`, used for lazy image loading.
    IntersectionObserver,
    /// `window.matchMedia`, used for the reduced-motion signal.
    MatchMedia,
    /// Coarse pointer (touch) input, used to enable swipe gestures.
    CoarsePointer,
}

impl Feature {
    /// Stable name of the feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IntersectionObserver => "intersectionObserver",
            Self::MatchMedia => "matchMedia",
            Self::CoarsePointer => "coarsePointer",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of probing the host environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// `IntersectionObserver` is constructible.
    pub intersection_observer: bool,
    /// `window.matchMedia` is callable.
    pub match_media: bool,
    /// `(pointer: coarse)` matches.
    pub coarse_pointer: bool,
}

impl Capabilities {
    /// No optional features available.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            intersection_observer: false,
            match_media: false,
            coarse_pointer: false,
        }
    }

    /// Every optional feature available.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            intersection_observer: true,
            match_media: true,
            coarse_pointer: true,
        }
    }

    /// Builder-style override of a single feature flag.
    #[must_use]
    pub fn with(mut self, feature: Feature, available: bool) -> Self {
        match feature {
            Feature::IntersectionObserver => self.intersection_observer = available,
            Feature::MatchMedia => self.match_media = available,
            Feature::CoarsePointer => self.coarse_pointer = available,
        }
        self
    }

    /// Check whether a feature is available.
    #[must_use]
    pub const fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::IntersectionObserver => self.intersection_observer,
            Feature::MatchMedia => self.match_media,
            Feature::CoarsePointer => self.coarse_pointer,
        }
    }

    /// Like [`supports`](Self::supports), but as a `Result` so callers can
    /// log the reason when they fall back.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Unsupported`] if the feature is absent.
    pub fn require(&self, feature: Feature) -> CoordinatorResult<()> {
        if self.supports(feature) {
            Ok(())
        } else {
            Err(CoordinatorError::Unsupported(feature))
        }
    }
}
