//! Reduced-motion handling and per-tier transition tuning.

use serde::{Deserialize, Serialize};

use crate::breakpoint::DeviceTier;

/// Media query for the user's motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Class toggled on the document element while reduced motion is active.
pub const REDUCED_MOTION_CLASS: &str = "reduced-motion";

/// Class marking heavy animations that were replaced by a static fallback.
pub const STATIC_FALLBACK_CLASS: &str = "static-fallback";

/// Elements whose transition duration is tuned per tier.
pub const ANIMATED_SELECTOR: &str = ".scroll-fade";

/// Elements flagged as heavy animations.
pub const HEAVY_ANIMATION_SELECTOR: &str = "[data-anim-heavy]";

/// Transition duration under reduced motion; effectively instant.
pub const REDUCED_DURATION: &str = "0.01ms";

/// Transition duration on mobile and tablet.
pub const COMPACT_DURATION: &str = "0.3s";

/// Transition duration on desktop.
pub const DESKTOP_DURATION: &str = "0.4s";

/// The user's motion preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionPreference {
    /// `prefers-reduced-motion: reduce` matches.
    pub prefers_reduced: bool,
}

impl MotionPreference {
    /// Construct from the media query result.
    #[must_use]
    pub const fn new(prefers_reduced: bool) -> Self {
        Self { prefers_reduced }
    }
}

/// Transition duration for a tier under a preference.
#[must_use]
pub const fn transition_duration(tier: DeviceTier, prefers_reduced: bool) -> &'static str {
    if prefers_reduced {
        REDUCED_DURATION
    } else if tier.is_desktop() {
        DESKTOP_DURATION
    } else {
        COMPACT_DURATION
    }
}

/// The DOM writes of one adjustment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionPlan {
    /// Whether the document carries [`REDUCED_MOTION_CLASS`].
    pub reduced_marker: bool,
    /// Duration written to every [`ANIMATED_SELECTOR`] element.
    pub transition_duration: &'static str,
    /// Whether heavy animations are replaced by their static fallback.
    pub static_fallback: bool,
}

impl MotionPlan {
    /// Compute the plan for a tier and preference.
    #[must_use]
    pub const fn for_state(tier: DeviceTier, preference: MotionPreference) -> Self {
        Self {
            reduced_marker: preference.prefers_reduced,
            transition_duration: transition_duration(tier, preference.prefers_reduced),
            static_fallback: preference.prefers_reduced,
        }
    }
}

/// The DOM seam for motion adjustments.
pub trait MotionHost {
    /// Toggle [`REDUCED_MOTION_CLASS`] on the document element.
    fn set_reduced_motion_marker(&mut self, reduced: bool);

    /// Write `transition-duration` on every [`ANIMATED_SELECTOR`] element.
    fn set_transition_duration(&mut self, duration: &str);

    /// With `true`, stop animations on [`HEAVY_ANIMATION_SELECTOR`] elements
    /// and mark them with [`STATIC_FALLBACK_CLASS`]; with `false`, restore
    /// every element carrying the class.
    fn set_static_fallback(&mut self, enabled: bool);
}

/// Re-runs the adjustment pass whenever the preference or tier changes.
#[derive(Debug, Clone)]
pub struct MotionAdjuster {
    preference: MotionPreference,
    tier: DeviceTier,
}

impl MotionAdjuster {
    /// Create an adjuster; nothing is written until [`apply`](Self::apply).
    #[must_use]
    pub const fn new(preference: MotionPreference, tier: DeviceTier) -> Self {
        Self { preference, tier }
    }

    /// Current preference.
    #[must_use]
    pub const fn preference(&self) -> MotionPreference {
        self.preference
    }

    /// Plan for the current inputs.
    #[must_use]
    pub const fn plan(&self) -> MotionPlan {
        MotionPlan::for_state(self.tier, self.preference)
    }

    /// Run the adjustment pass.
    pub fn apply<H: MotionHost + ?Sized>(&self, host: &mut H) -> MotionPlan {
        let plan = self.plan();
        host.set_reduced_motion_marker(plan.reduced_marker);
        host.set_transition_duration(plan.transition_duration);
        host.set_static_fallback(plan.static_fallback);
        tracing::debug!("Motion pass for {}: {plan:?}", self.tier);
        plan
    }

    /// Record a new preference and re-run the pass.
    pub fn set_preference<H: MotionHost + ?Sized>(
        &mut self,
        preference: MotionPreference,
        host: &mut H,
    ) -> MotionPlan {
        self.preference = preference;
        self.apply(host)
    }

    /// Record a new tier and re-run the pass.
    pub fn set_tier<H: MotionHost + ?Sized>(
        &mut self,
        tier: DeviceTier,
        host: &mut H,
    ) -> MotionPlan {
        self.tier = tier;
        self.apply(host)
    }
}
