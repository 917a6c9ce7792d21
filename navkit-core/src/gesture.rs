//! Swipe recognition from raw touch sequences.
//!
//! Only horizontal swipes are recognized. A sequence resolves when the
//! finger lifts: the horizontal travel must dominate the vertical travel and
//! exceed the threshold. Sequences that ever involved a second finger are
//! discarded, and the tracker resets after every resolution.

use serde::{Deserialize, Serialize};

use crate::event::{TouchEvent, TouchPhase};

/// Default minimum horizontal travel, in CSS pixels.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Direction of a recognized swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Finger travelled towards the left edge.
    Left,
    /// Finger travelled towards the right edge.
    Right,
}

/// Start and latest position of the tracked contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    /// X at touch start.
    pub start_x: f32,
    /// Y at touch start.
    pub start_y: f32,
    /// Most recent X.
    pub end_x: f32,
    /// Most recent Y.
    pub end_y: f32,
}

impl GestureSample {
    /// A sample that has not moved yet.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
        }
    }

    /// Horizontal travel (positive is rightwards).
    #[must_use]
    pub fn delta_x(&self) -> f32 {
        self.end_x - self.start_x
    }

    /// Vertical travel (positive is downwards).
    #[must_use]
    pub fn delta_y(&self) -> f32 {
        self.end_y - self.start_y
    }

    /// Classify the sample against a threshold.
    #[must_use]
    pub fn swipe(&self, threshold: f32) -> Option<SwipeDirection> {
        detect_swipe(self.delta_x(), self.delta_y(), threshold)
    }
}

/// Pure swipe rule: dominant horizontal axis and travel beyond `threshold`.
#[must_use]
pub fn detect_swipe(delta_x: f32, delta_y: f32, threshold: f32) -> Option<SwipeDirection> {
    let horizontal = delta_x.abs();
    if horizontal > delta_y.abs() && horizontal > threshold {
        if delta_x > 0.0 {
            Some(SwipeDirection::Right)
        } else {
            Some(SwipeDirection::Left)
        }
    } else {
        None
    }
}

/// Tracks one touch sequence at a time.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    threshold: f32,
    sample: Option<GestureSample>,
    multi_touch: bool,
}

impl GestureRecognizer {
    /// Create a recognizer with the given threshold.
    #[must_use]
    pub const fn new(threshold: f32) -> Self {
        Self {
            threshold,
            sample: None,
            multi_touch: false,
        }
    }

    /// Minimum horizontal travel for a swipe.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// The sequence currently being tracked, if any.
    #[must_use]
    pub const fn sample(&self) -> Option<&GestureSample> {
        self.sample.as_ref()
    }

    /// Whether a single-contact sequence is in progress.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.sample.is_some() && !self.multi_touch
    }

    /// Feed one touch event. Returns a direction when a sequence resolves
    /// into a swipe.
    pub fn process(&mut self, event: &TouchEvent) -> Option<SwipeDirection> {
        match event.phase {
            TouchPhase::Start => {
                if event.is_multi_touch() {
                    // A second finger joined a sequence in progress.
                    self.multi_touch = true;
                    return None;
                }
                // A lone contact starts a fresh sequence even if the previous
                // one never ended.
                self.reset();
                let point = event.primary_touch()?;
                self.sample = Some(GestureSample::at(point.x, point.y));
                None
            }
            TouchPhase::Move => {
                if event.is_multi_touch() {
                    self.multi_touch = true;
                }
                if self.multi_touch {
                    return None;
                }
                if let (Some(sample), Some(point)) = (self.sample.as_mut(), event.primary_touch()) {
                    sample.end_x = point.x;
                    sample.end_y = point.y;
                }
                None
            }
            TouchPhase::End => {
                let result = if self.multi_touch {
                    None
                } else {
                    self.sample.and_then(|sample| sample.swipe(self.threshold))
                };
                if let Some(direction) = result {
                    tracing::debug!("Swipe recognized: {direction:?}");
                }
                if event.touches.is_empty() {
                    self.reset();
                } else {
                    // Remaining fingers keep the sequence poisoned until all lift.
                    self.sample = None;
                }
                result
            }
            TouchPhase::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// Forget the current sequence.
    pub fn reset(&mut self) {
        self.sample = None;
        self.multi_touch = false;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}
