#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn active(rect: Rect) -> SelectionController {
    let mut c = SelectionController::default();
    c.activate(rect);
    c
}

fn resize(rect: Rect, handle: Handle, dx: f64, dy: f64) -> Rect {
    let mut c = active(rect);
    let start = handle.position(&rect);
    assert!(c.begin_resize(start, handle));
    c.on_pointer_move(pt(start.x + dx, start.y + dy));
    c.rect().unwrap()
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_controller_is_inactive() {
    let c = SelectionController::default();
    assert_eq!(c.state(), SelectionState::Inactive);
    assert_eq!(c.rect(), None);
    assert_eq!(c.min_size(), MIN_SELECTION_SIZE);
}

#[test]
fn activate_uses_seed() {
    let seed = Rect::new(-10.0, -10.0, 230.0, 180.0);
    let mut c = SelectionController::default();
    assert_eq!(c.activate(seed), SelectionEvent::Changed(seed));
    assert_eq!(c.state(), SelectionState::Selecting { rect: seed });
}

#[test]
fn activate_grows_tiny_seed_to_minimum() {
    let c = active(Rect::new(100.0, 100.0, 2.0, 2.0));
    let rect = c.rect().unwrap();
    assert_eq!(rect.width, 20.0);
    assert_eq!(rect.height, 20.0);
    assert_eq!(rect.center(), pt(101.0, 101.0));
}

#[test]
fn confirm_moves_to_confirmed() {
    let seed = Rect::new(0.0, 0.0, 50.0, 50.0);
    let mut c = active(seed);
    assert_eq!(c.confirm(), Some(seed));
    assert_eq!(c.state(), SelectionState::Confirmed { rect: seed });
    assert!(!c.is_active());
}

#[test]
fn confirm_while_inactive_is_none() {
    let mut c = SelectionController::default();
    assert_eq!(c.confirm(), None);
}

#[test]
fn confirm_mid_gesture_commits_current_rect() {
    let mut c = active(Rect::new(0.0, 0.0, 50.0, 50.0));
    c.begin_drag(pt(10.0, 10.0));
    c.on_pointer_move(pt(20.0, 30.0));
    assert_eq!(c.confirm(), Some(Rect::new(10.0, 20.0, 50.0, 50.0)));
}

#[test]
fn cancel_discards_rect() {
    let mut c = active(Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(c.cancel(), Some(SelectionEvent::Cleared));
    assert_eq!(c.state(), SelectionState::Cancelled);
    assert_eq!(c.rect(), None);
}

#[test]
fn cancel_when_inactive_is_none() {
    let mut c = SelectionController::default();
    assert_eq!(c.cancel(), None);
}

#[test]
fn reset_returns_to_inactive() {
    let mut c = active(Rect::new(0.0, 0.0, 50.0, 50.0));
    c.confirm();
    c.reset();
    assert_eq!(c.state(), SelectionState::Inactive);
}

#[test]
fn replace_clamps_to_minimum() {
    let mut c = active(Rect::new(0.0, 0.0, 50.0, 50.0));
    let ev = c.replace(Rect::new(10.0, 10.0, 5.0, 100.0)).unwrap();
    let SelectionEvent::Changed(rect) = ev else {
        panic!("expected Changed");
    };
    assert_eq!(rect.width, 20.0);
    assert_eq!(rect.height, 100.0);
}

#[test]
fn replace_requires_active_selection() {
    let mut c = SelectionController::default();
    assert_eq!(c.replace(Rect::new(0.0, 0.0, 40.0, 40.0)), None);
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_translates_by_total_delta() {
    let mut c = active(Rect::new(50.0, 50.0, 100.0, 100.0));
    c.begin_drag(pt(60.0, 60.0));
    c.on_pointer_move(pt(61.0, 65.0));
    c.on_pointer_move(pt(90.0, 40.0));
    assert_eq!(c.rect(), Some(Rect::new(80.0, 30.0, 100.0, 100.0)));
}

#[test]
fn end_adjust_returns_to_selecting() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    c.begin_drag(pt(10.0, 10.0));
    c.on_pointer_move(pt(15.0, 10.0));
    assert_eq!(c.end_adjust(), Some(SelectionEvent::Changed(Rect::new(5.0, 0.0, 40.0, 40.0))));
    assert!(matches!(c.state(), SelectionState::Selecting { .. }));
}

#[test]
fn move_without_gesture_is_ignored() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(c.on_pointer_move(pt(99.0, 99.0)), None);
}

#[test]
fn non_finite_move_is_absorbed() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    c.begin_drag(pt(10.0, 10.0));
    c.on_pointer_move(pt(20.0, 20.0));
    assert_eq!(c.on_pointer_move(pt(f64::NAN, 0.0)), None);
    assert_eq!(c.rect(), Some(Rect::new(10.0, 10.0, 40.0, 40.0)));
}

#[test]
fn gesture_cannot_start_twice() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    assert!(c.begin_drag(pt(1.0, 1.0)));
    assert!(!c.begin_resize(pt(1.0, 1.0), Handle::E));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_right_changes_width_only() {
    let r = resize(Rect::new(50.0, 50.0, 100.0, 100.0), Handle::E, 30.0, 40.0);
    assert_eq!(r, Rect::new(50.0, 50.0, 130.0, 100.0));
}

#[test]
fn resize_right_below_minimum_keeps_x() {
    let r = resize(Rect::new(50.0, 50.0, 100.0, 100.0), Handle::E, -500.0, 0.0);
    assert_eq!(r.x, 50.0);
    assert_eq!(r.width, 20.0);
}

#[test]
fn resize_top_left_past_anchor_clamps() {
    let r = resize(Rect::new(50.0, 50.0, 100.0, 100.0), Handle::Nw, 200.0, 200.0);
    assert_eq!(r, Rect::new(130.0, 130.0, 20.0, 20.0));
}

#[test]
fn resize_top_left_grows_up_and_left() {
    let r = resize(Rect::new(50.0, 50.0, 100.0, 100.0), Handle::Nw, -10.0, -20.0);
    assert_eq!(r, Rect::new(40.0, 30.0, 110.0, 120.0));
}

#[test]
fn resize_north_keeps_bottom() {
    let r = resize(Rect::new(0.0, 0.0, 60.0, 60.0), Handle::N, 7.0, 100.0);
    assert_eq!(r, Rect::new(0.0, 40.0, 60.0, 20.0));
}

#[test]
fn resize_every_handle_respects_minimum() {
    let orig = Rect::new(100.0, 100.0, 80.0, 80.0);
    for handle in Handle::ALL {
        for (dx, dy) in [(-400.0, -400.0), (400.0, 400.0), (400.0, -400.0), (-400.0, 400.0)] {
            let r = resize(orig, handle, dx, dy);
            assert!(r.width >= 20.0 && r.height >= 20.0, "{handle:?} {dx},{dy} -> {r:?}");
            if handle.moves_left() {
                assert_eq!(r.right(), orig.right(), "{handle:?} moved the anchor");
            }
            if handle.moves_right() {
                assert_eq!(r.x, orig.x, "{handle:?} moved the anchor");
            }
            if handle.moves_top() {
                assert_eq!(r.bottom(), orig.bottom(), "{handle:?} moved the anchor");
            }
            if handle.moves_bottom() {
                assert_eq!(r.y, orig.y, "{handle:?} moved the anchor");
            }
        }
    }
}

#[test]
fn resize_respects_custom_minimum() {
    let mut c = SelectionController::new(50.0);
    c.activate(Rect::new(0.0, 0.0, 100.0, 100.0));
    c.begin_resize(pt(100.0, 100.0), Handle::Se);
    c.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(c.rect(), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
}

// =============================================================
// Draw
// =============================================================

#[test]
fn draw_rubber_bands_from_start() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    c.begin_draw(pt(200.0, 200.0));
    c.on_pointer_move(pt(120.0, 260.0));
    c.end_adjust();
    assert_eq!(c.rect(), Some(Rect::new(120.0, 200.0, 80.0, 60.0)));
}

#[test]
fn draw_small_drag_clamps_around_start() {
    let mut c = active(Rect::new(0.0, 0.0, 40.0, 40.0));
    c.begin_draw(pt(200.0, 200.0));
    c.on_pointer_move(pt(190.0, 210.0));
    // Dragged left and down: start stays the right/top anchor.
    assert_eq!(c.rect(), Some(Rect::new(180.0, 200.0, 20.0, 20.0)));
}

#[test]
fn draw_click_restores_previous_rect() {
    let seed = Rect::new(0.0, 0.0, 40.0, 40.0);
    let mut c = active(seed);
    c.begin_draw(pt(200.0, 200.0));
    c.on_pointer_move(pt(203.0, 198.0));
    c.end_adjust();
    assert_eq!(c.rect(), Some(seed));
}

// =============================================================
// pointer_down
// =============================================================

#[test]
fn pointer_down_on_handle_resizes() {
    let mut c = active(Rect::new(100.0, 100.0, 100.0, 100.0));
    let g = c.pointer_down(pt(200.0, 150.0), &Camera::default());
    assert_eq!(g, Some(Gesture::Resize(Handle::E)));
}

#[test]
fn pointer_down_on_body_drags() {
    let mut c = active(Rect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(c.pointer_down(pt(150.0, 150.0), &Camera::default()), Some(Gesture::Move));
}

#[test]
fn pointer_down_outside_misses() {
    let mut c = active(Rect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(c.pointer_down(pt(10.0, 10.0), &Camera::default()), None);
    assert!(!c.is_adjusting());
}

#[test]
fn pointer_down_or_draw_outside_draws() {
    let mut c = active(Rect::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(c.pointer_down_or_draw(pt(10.0, 10.0), &Camera::default()), Some(Gesture::Draw));
}
