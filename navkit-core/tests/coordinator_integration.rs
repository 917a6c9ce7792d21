//! Coordinator Integration Tests
//!
//! Drives a full coordinator against an in-memory page:
//! - Breakpoint classification and debounced resizes
//! - Navigation menu open/close and listener bookkeeping
//! - Swipe gestures
//! - Lazy image loading
//! - Motion preferences and focus highlighting
//! - Responsive self-test

mod common;

use common::{FakeLayout, FakePage};
use navkit_core::{
    classify, Capabilities, ClickTarget, Coordinator, CoordinatorConfig, DeviceTier, Feature,
    Finding, InitStatus, InteractiveTarget, Key, ListenerKind, LoaderStatus, MotionPreference,
    Rect, TouchEvent, TouchPhase, TouchPoint, Transition,
};

fn coordinator_at(width: u32) -> Coordinator {
    coordinator_with(width, Capabilities::all())
}

fn coordinator_with(width: u32, capabilities: Capabilities) -> Coordinator {
    Coordinator::new(
        CoordinatorConfig::default(),
        capabilities,
        width,
        MotionPreference::default(),
    )
    .expect("default config is valid")
}

fn swipe(coordinator: &mut Coordinator, page: &mut FakePage, from: f32, to: f32) -> Transition {
    let mut last = Transition::Unchanged;
    let events = [
        TouchEvent::single(TouchPhase::Start, from, 400.0, 0),
        TouchEvent::single(TouchPhase::Move, (from + to) / 2.0, 402.0, 16),
        TouchEvent::single(TouchPhase::Move, to, 405.0, 32),
        TouchEvent::new(TouchPhase::End, Vec::new(), 48),
    ];
    for event in &events {
        let transition = coordinator.on_touch(event, page);
        if transition != Transition::Unchanged {
            last = transition;
        }
    }
    last
}

fn resize(coordinator: &mut Coordinator, page: &mut FakePage, width: u32) -> Option<DeviceTier> {
    let ticket = coordinator.on_resize(width);
    coordinator.on_resize_settled(ticket, page)
}

// ============================================================================
// Breakpoint Tests
// ============================================================================

#[test]
fn test_every_width_has_exactly_one_tier() {
    for width in 0..2000 {
        let tier = classify(width, 767, 900);
        let expected = if width <= 767 {
            DeviceTier::Mobile
        } else if width <= 900 {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        };
        assert_eq!(tier, expected, "width {width}");
    }
}

#[test]
fn test_resize_burst_reclassifies_once() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    let first = coordinator.on_resize(820);
    let second = coordinator.on_resize(1000);
    let last = coordinator.on_resize(1200);

    assert_eq!(coordinator.on_resize_settled(first, &mut page), None);
    assert_eq!(coordinator.on_resize_settled(second, &mut page), None);
    assert_eq!(coordinator.tier(), DeviceTier::Mobile);

    assert_eq!(
        coordinator.on_resize_settled(last, &mut page),
        Some(DeviceTier::Desktop)
    );
    assert_eq!(coordinator.snapshot().viewport_width, 1200);
    assert!(!coordinator.snapshot().resize_pending);
}

#[test]
fn test_resize_within_tier_reports_no_change() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(400);
    coordinator.init(&mut page);

    assert_eq!(resize(&mut coordinator, &mut page, 600), None);
    assert_eq!(coordinator.snapshot().viewport_width, 600);
    assert_eq!(coordinator.tier(), DeviceTier::Mobile);
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_toggle_opens_and_closes_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    assert_eq!(coordinator.init(&mut page), InitStatus::Bound);
    assert_eq!(page.projection(), Some(false));

    assert_eq!(
        coordinator.on_click(ClickTarget::Toggle, &mut page),
        Transition::Opened
    );
    assert!(coordinator.is_open());
    assert_eq!(page.projection(), Some(true));

    assert_eq!(
        coordinator.on_click(ClickTarget::Toggle, &mut page),
        Transition::Closed
    );
    assert_eq!(page.projection(), Some(false));
}

#[test]
fn test_link_and_outside_clicks_close_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    coordinator.on_click(ClickTarget::Toggle, &mut page);
    assert_eq!(
        coordinator.on_click(ClickTarget::MenuLink, &mut page),
        Transition::Closed
    );

    coordinator.on_click(ClickTarget::Toggle, &mut page);
    assert_eq!(
        coordinator.on_click(ClickTarget::MenuOther, &mut page),
        Transition::Unchanged
    );
    assert!(coordinator.is_open());
    assert_eq!(
        coordinator.on_click(ClickTarget::Outside, &mut page),
        Transition::Closed
    );
    assert_eq!(page.projection(), Some(false));
}

#[test]
fn test_escape_closes_and_returns_focus_to_toggle() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);

    assert_eq!(
        coordinator.on_nav_key(Key::Escape, &mut page),
        Transition::Closed
    );
    assert_eq!(page.toggle_focus_calls, 1);

    // Closed already: nothing to do, focus untouched.
    assert_eq!(
        coordinator.on_nav_key(Key::Escape, &mut page),
        Transition::Unchanged
    );
    assert_eq!(page.toggle_focus_calls, 1);
}

#[test]
fn test_tab_does_not_affect_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);

    assert_eq!(
        coordinator.on_nav_key(Key::Tab, &mut page),
        Transition::Unchanged
    );
    assert!(coordinator.is_open());
}

#[test]
fn test_double_init_does_not_duplicate_listeners() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.reinit(&mut page);
    coordinator.reinit(&mut page);

    assert_eq!(page.listeners.len(), 8);
    for kind in ListenerKind::MENU.iter().chain(ListenerKind::GESTURE.iter()) {
        assert_eq!(page.listener_count(*kind), 1, "{kind:?}");
    }

    // A single toggle activation flips the menu exactly once.
    assert_eq!(
        coordinator.on_click(ClickTarget::Toggle, &mut page),
        Transition::Opened
    );
}

#[test]
fn test_reinit_preserves_open_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);

    // Content swap replaced the navigation markup.
    page.active = false;
    page.expanded = false;
    page.scroll_locked = false;

    coordinator.reinit(&mut page);
    assert!(coordinator.is_open());
    assert_eq!(page.projection(), Some(true));
}

#[test]
fn test_missing_navigation_is_non_fatal() {
    let mut page = FakePage::without_nav();
    let id = page.add_image(1, 100.0);
    let mut coordinator = coordinator_at(500);

    assert_eq!(coordinator.init(&mut page), InitStatus::Unavailable);
    assert!(page.listeners.is_empty());

    // Other features keep working.
    coordinator.register_lazy_image(id, "/hero.jpg", &mut page);
    assert!(page.observed.contains_key(&id));
    assert!(coordinator.on_key(Key::Tab, &mut page));

    // Once the markup appears a reinit binds normally.
    page.has_toggle = true;
    page.has_menu = true;
    assert_eq!(coordinator.reinit(&mut page), InitStatus::Bound);
    assert_eq!(page.listeners.len(), 8);
}

#[test]
fn test_failed_attach_leaves_no_partial_listener_set() {
    let mut page = FakePage::failing_attach(ListenerKind::EscapeKey);
    let mut coordinator = coordinator_at(500);

    assert_eq!(coordinator.init(&mut page), InitStatus::Unavailable);
    assert!(page.listeners.is_empty());
}

#[test]
fn test_desktop_init_is_inert() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(1200);

    assert_eq!(coordinator.init(&mut page), InitStatus::Inert);
    assert!(page.listeners.is_empty());
    assert_eq!(page.projection(), Some(false));
    assert_eq!(
        coordinator.on_click(ClickTarget::Toggle, &mut page),
        Transition::Unchanged
    );
    assert!(!coordinator.is_open());
}

#[test]
fn test_resize_to_desktop_closes_open_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);
    assert_eq!(page.projection(), Some(true));

    assert_eq!(
        resize(&mut coordinator, &mut page, 1200),
        Some(DeviceTier::Desktop)
    );
    assert!(!coordinator.is_open());
    assert_eq!(page.projection(), Some(false));
    assert!(page.listeners.is_empty());
    assert_eq!(coordinator.nav().status(), InitStatus::Inert);
    assert_eq!(page.transition_duration.as_deref(), Some("0.4s"));

    // Back to tablet: handlers return.
    assert_eq!(
        resize(&mut coordinator, &mut page, 850),
        Some(DeviceTier::Tablet)
    );
    assert_eq!(page.listeners.len(), 8);
    assert_eq!(page.transition_duration.as_deref(), Some("0.3s"));
    assert_eq!(
        coordinator.on_click(ClickTarget::Toggle, &mut page),
        Transition::Opened
    );
}

#[test]
fn test_mobile_to_tablet_keeps_menu_open() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);

    assert_eq!(
        resize(&mut coordinator, &mut page, 850),
        Some(DeviceTier::Tablet)
    );
    assert!(coordinator.is_open());
    assert_eq!(page.projection(), Some(true));
    assert_eq!(page.listeners.len(), 8);
}

#[test]
fn test_desktop_menu_never_open_across_event_sequences() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    let widths = [500, 1200, 850, 1300, 320, 901, 767];
    for (step, width) in widths.iter().enumerate() {
        coordinator.on_click(ClickTarget::Toggle, &mut page);
        swipe(&mut coordinator, &mut page, 100.0, 300.0);
        resize(&mut coordinator, &mut page, *width);
        if coordinator.tier().is_desktop() {
            assert!(!coordinator.is_open(), "step {step}");
            assert_eq!(page.projection(), Some(false), "step {step}");
        }
    }
}

#[test]
fn test_teardown_detaches_everything() {
    let mut page = FakePage::new();
    let id = page.add_image(1, 2000.0);
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.register_lazy_image(id, "/late.jpg", &mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);
    coordinator.on_resize(900);

    coordinator.teardown(&mut page);

    assert!(page.listeners.is_empty());
    assert!(page.observed.is_empty());
    assert_eq!(page.projection(), Some(false));
    assert!(!coordinator.is_initialized());
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.nav_status, InitStatus::Uninitialized);
    assert!(!snapshot.resize_pending);
    assert_eq!(snapshot.pending_images, 0);

    // A fresh init after teardown starts cleanly.
    assert_eq!(coordinator.init(&mut page), InitStatus::Bound);
    assert_eq!(page.listeners.len(), 8);
}

// ============================================================================
// Gesture Tests
// ============================================================================

#[test]
fn test_swipe_left_closes_open_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);
    coordinator.on_click(ClickTarget::Toggle, &mut page);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 300.0, 200.0),
        Transition::Closed
    );
    assert!(!coordinator.is_open());
}

#[test]
fn test_swipe_right_opens_closed_menu() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 200.0, 320.0),
        Transition::Opened
    );
    assert!(coordinator.is_open());
}

#[test]
fn test_lost_touchend_does_not_swallow_next_swipe() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    let stray = TouchEvent::single(TouchPhase::Start, 10.0, 10.0, 0);
    assert_eq!(coordinator.on_touch(&stray, &mut page), Transition::Unchanged);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 200.0, 320.0),
        Transition::Opened
    );
    assert!(coordinator.is_open());
}

#[test]
fn test_short_swipe_is_ignored() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 200.0, 240.0),
        Transition::Unchanged
    );
    assert!(!coordinator.is_open());
}

#[test]
fn test_vertical_scroll_is_not_a_swipe() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    let events = [
        TouchEvent::single(TouchPhase::Start, 200.0, 100.0, 0),
        TouchEvent::single(TouchPhase::Move, 270.0, 400.0, 16),
        TouchEvent::new(TouchPhase::End, Vec::new(), 32),
    ];
    for event in &events {
        assert_eq!(coordinator.on_touch(event, &mut page), Transition::Unchanged);
    }
    assert!(!coordinator.is_open());
}

#[test]
fn test_multi_touch_is_not_a_swipe() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(500);
    coordinator.init(&mut page);

    let events = [
        TouchEvent::single(TouchPhase::Start, 100.0, 400.0, 0),
        TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 100.0, 400.0), TouchPoint::new(1, 150.0, 420.0)],
            10,
        ),
        TouchEvent::new(
            TouchPhase::Move,
            vec![TouchPoint::new(0, 300.0, 400.0), TouchPoint::new(1, 350.0, 420.0)],
            20,
        ),
        TouchEvent::new(TouchPhase::End, Vec::new(), 30),
    ];
    for event in &events {
        assert_eq!(coordinator.on_touch(event, &mut page), Transition::Unchanged);
    }
    assert!(!coordinator.is_open());
}

#[test]
fn test_swipe_on_desktop_does_nothing() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(1400);
    coordinator.init(&mut page);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 100.0, 400.0),
        Transition::Unchanged
    );
    assert!(!coordinator.is_open());
}

#[test]
fn test_fine_pointer_binds_no_touch_listeners() {
    let mut page = FakePage::new();
    let mut coordinator =
        coordinator_with(500, Capabilities::all().with(Feature::CoarsePointer, false));
    coordinator.init(&mut page);

    assert_eq!(page.listeners.len(), 4);
    assert_eq!(page.listener_count(ListenerKind::TouchStart), 0);
    assert_eq!(
        swipe(&mut coordinator, &mut page, 100.0, 400.0),
        Transition::Unchanged
    );
}

#[test]
fn test_custom_swipe_threshold() {
    let config = CoordinatorConfig {
        swipe_threshold: 120,
        ..CoordinatorConfig::default()
    };
    let mut page = FakePage::new();
    let mut coordinator =
        Coordinator::new(config, Capabilities::all(), 500, MotionPreference::default())
            .expect("valid config");
    coordinator.init(&mut page);

    assert_eq!(
        swipe(&mut coordinator, &mut page, 100.0, 200.0),
        Transition::Unchanged
    );
    assert_eq!(
        swipe(&mut coordinator, &mut page, 100.0, 250.0),
        Transition::Opened
    );
}

// ============================================================================
// Lazy Image Tests
// ============================================================================

#[test]
fn test_image_loads_when_scrolled_near() {
    let mut page = FakePage::new();
    let near = page.add_image(1, 850.0);
    let far = page.add_image(2, 1500.0);
    let mut coordinator = coordinator_at(400);
    coordinator.init(&mut page);
    coordinator.register_lazy_image(near, "/near.jpg", &mut page);
    coordinator.register_lazy_image(far, "/far.jpg", &mut page);

    // Within the 100px margin below an 800px viewport.
    for id in page.intersecting() {
        coordinator.on_image_intersection(id, true, &mut page);
    }
    assert_eq!(page.images[&near].src.as_deref(), Some("/near.jpg"));
    assert_eq!(page.images[&far].src, None);
    assert!(!page.observed.contains_key(&near));

    page.scroll_y = 700.0;
    for id in page.intersecting() {
        coordinator.on_image_intersection(id, true, &mut page);
    }
    assert_eq!(page.images[&far].src.as_deref(), Some("/far.jpg"));
    assert!(page.observed.is_empty());
    assert_eq!(coordinator.lazy().loaded_count(), 2);
}

#[test]
fn test_image_loads_exactly_once() {
    let mut page = FakePage::new();
    let id = page.add_image(7, 100.0);
    let mut coordinator = coordinator_at(400);
    coordinator.init(&mut page);
    coordinator.register_lazy_image(id, "/once.jpg", &mut page);

    assert!(!coordinator.on_image_intersection(id, false, &mut page));
    assert!(coordinator.on_image_intersection(id, true, &mut page));
    assert!(!coordinator.on_image_intersection(id, true, &mut page));
    assert_eq!(page.images[&id].swaps, 1);
}

#[test]
fn test_images_load_eagerly_without_observer_support() {
    let mut page = FakePage::new();
    let id = page.add_image(1, 5000.0);
    let mut coordinator = coordinator_with(
        400,
        Capabilities::all().with(Feature::IntersectionObserver, false),
    );
    coordinator.init(&mut page);
    assert_eq!(coordinator.lazy().status(), LoaderStatus::Unsupported);

    coordinator.register_lazy_image(id, "/eager.jpg", &mut page);
    assert_eq!(page.images[&id].src.as_deref(), Some("/eager.jpg"));
    assert!(page.observed.is_empty());
}

// ============================================================================
// Motion and Focus Tests
// ============================================================================

#[test]
fn test_reduced_motion_applies_static_fallback() {
    let mut page = FakePage::new();
    let mut coordinator = Coordinator::new(
        CoordinatorConfig::default(),
        Capabilities::all(),
        1200,
        MotionPreference::new(true),
    )
    .expect("valid config");
    coordinator.init(&mut page);

    assert!(page.reduced_marker);
    assert!(page.static_fallback);
    assert_eq!(page.transition_duration.as_deref(), Some("0.01ms"));

    coordinator.on_motion_preference_changed(MotionPreference::new(false), &mut page);
    assert!(!page.reduced_marker);
    assert!(!page.static_fallback);
    assert_eq!(page.transition_duration.as_deref(), Some("0.4s"));
}

#[test]
fn test_tab_highlights_focused_element() {
    let mut page = FakePage::new();
    let mut coordinator = coordinator_at(1200);
    coordinator.init(&mut page);

    assert!(coordinator.on_key(Key::Tab, &mut page));
    assert_eq!(page.highlighted, 1);
    assert_eq!(page.last_highlight_ms, Some(1200));

    assert!(!coordinator.on_key(Key::Escape, &mut page));
    assert!(!coordinator.on_key(Key::Other, &mut page));
    assert_eq!(page.highlighted, 1);

    page.has_focus = false;
    assert!(!coordinator.on_key(Key::Tab, &mut page));
}

// ============================================================================
// Self-Test Tests
// ============================================================================

#[test]
fn test_self_test_reports_overflow_and_small_targets() {
    let coordinator = coordinator_at(1280);
    let mut layout = FakeLayout {
        content_width: 700.0,
        targets: vec![
            InteractiveTarget {
                label: "button.nav-toggle".to_string(),
                rect: Rect::new(0.0, 0.0, 44.0, 44.0),
            },
            InteractiveTarget {
                label: "a.tiny".to_string(),
                rect: Rect::new(0.0, 0.0, 20.0, 12.0),
            },
        ],
        ..FakeLayout::default()
    };

    let report = coordinator.run_diagnostics(&mut layout);

    assert_eq!(layout.visited, vec![480, 640, 768, 1024, 1280]);
    assert_eq!(layout.simulated, None);
    assert_eq!(report.targets_checked, 10);

    let overflow_widths: Vec<u32> = report
        .findings
        .iter()
        .filter_map(|finding| match finding {
            Finding::HorizontalOverflow { width, .. } => Some(*width),
            Finding::SmallTouchTarget { .. } => None,
        })
        .collect();
    assert_eq!(overflow_widths, vec![480, 640]);

    let small = report
        .findings
        .iter()
        .filter(|finding| matches!(finding, Finding::SmallTouchTarget { .. }))
        .count();
    assert_eq!(small, 5);
}

#[test]
fn test_self_test_clean_layout_passes() {
    let coordinator = coordinator_at(1280);
    let mut layout = FakeLayout::default();
    assert!(coordinator.run_diagnostics(&mut layout).passed());
}
