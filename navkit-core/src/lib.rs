//! # Navkit Core
//!
//! Platform-independent logic for coordinating responsive page behavior:
//! breakpoint classification, the mobile navigation menu, swipe gestures,
//! lazy image loading, motion preferences and keyboard focus highlighting.
//!
//! Every interaction with the page goes through the host traits
//! ([`NavHost`], [`ImageHost`], [`MotionHost`], [`FocusHost`],
//! [`LayoutProbe`]), so the whole state machine runs natively under test.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Coordinator                 │
//! ├─────────────────────────────────────────────┤
//! │  Viewport        │  Navigation              │
//! │  - Breakpoints   │  - Open/close machine    │
//! │  - Debounce      │  - Listener set          │
//! │  - Tier changes  │  - Swipe recognizer      │
//! ├─────────────────────────────────────────────┤
//! │  Media           │  Accessibility           │
//! │  - Lazy images   │  - Reduced motion        │
//! │  - Root margin   │  - Focus highlight       │
//! │                  │  - Self-test             │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod breakpoint;
pub mod capability;
pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod gesture;
pub mod lazy;
pub mod motion;
pub mod nav;

pub use breakpoint::{classify, Breakpoints, DeviceTier};
pub use capability::{Capabilities, Feature};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorSnapshot, Host};
pub use debounce::{DebounceTicket, Debouncer};
pub use diagnostics::{
    self_test_requested, DiagnosticsReport, Finding, InteractiveTarget, LayoutProbe, SelfTest,
};
pub use error::{CoordinatorError, CoordinatorResult};
pub use event::{ClickTarget, Key, TouchEvent, TouchPhase, TouchPoint};
pub use focus::{FocusHighlighter, FocusHost};
pub use geometry::Rect;
pub use gesture::{detect_swipe, GestureRecognizer, GestureSample, SwipeDirection};
pub use lazy::{ImageHost, ImageId, LazyImageLoader, LoaderStatus, RootMargin};
pub use motion::{MotionAdjuster, MotionHost, MotionPlan, MotionPreference};
pub use nav::{
    InitStatus, ListenerHandle, ListenerKind, NavEvent, NavHost, NavStateMachine, Transition,
};

/// Navkit core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
