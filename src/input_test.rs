use super::*;
use crate::payload::PayloadKind;

// =============================================================
// Helpers
// =============================================================

#[derive(Debug, Default)]
struct RecordingSink {
    calls: Vec<String>,
    /// Refuse every press, as a controller busy with another gesture does.
    busy: bool,
}

impl GestureSink for RecordingSink {
    fn begin_gesture(&mut self, payload: DragPayload, origin: Point) -> bool {
        self.calls.push(format!("begin {} {},{}", payload.id, origin.x, origin.y));
        !self.busy
    }

    fn update_position(&mut self, point: Point) {
        self.calls.push(format!("move {},{}", point.x, point.y));
    }

    fn end_gesture(&mut self) {
        self.calls.push("end".into());
    }

    fn cancel(&mut self, reason: CancelReason) {
        self.calls.push(format!("cancel {reason:?}"));
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn start(points: &[Point]) -> TouchInput {
    TouchInput::Start { touches: points.to_vec() }
}

fn touch_move(points: &[Point]) -> TouchInput {
    TouchInput::Move { touches: points.to_vec() }
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), pt(0.0, 0.0));
}

#[test]
fn point_distance() {
    assert!((pt(0.0, 0.0).distance_to(pt(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
}

// =============================================================
// MouseAdapter
// =============================================================

#[test]
fn mouse_primary_down_presses() {
    let mut m = MouseAdapter;
    let ev = m.translate(&MouseInput::Down { point: pt(1.0, 2.0), button: MouseButton::Primary });
    assert_eq!(ev, Some(SessionEvent::Press(pt(1.0, 2.0))));
}

#[test]
fn mouse_other_buttons_are_ignored() {
    let mut m = MouseAdapter;
    for button in [MouseButton::Middle, MouseButton::Secondary] {
        assert_eq!(m.translate(&MouseInput::Down { point: pt(0.0, 0.0), button }), None);
        assert_eq!(m.translate(&MouseInput::Up { button }), None);
    }
}

#[test]
fn mouse_move_and_up() {
    let mut m = MouseAdapter;
    assert_eq!(m.translate(&MouseInput::Move { point: pt(4.0, 5.0) }), Some(SessionEvent::Move(pt(4.0, 5.0))));
    assert_eq!(m.translate(&MouseInput::Up { button: MouseButton::Primary }), Some(SessionEvent::Release));
}

// =============================================================
// TouchAdapter
// =============================================================

#[test]
fn touch_single_point_start_presses() {
    let mut t = TouchAdapter::new();
    assert_eq!(t.translate(&start(&[pt(7.0, 8.0)])), Some(SessionEvent::Press(pt(7.0, 8.0))));
    assert!(t.is_tracking());
}

#[test]
fn touch_multi_point_start_is_ignored_when_idle() {
    let mut t = TouchAdapter::new();
    assert_eq!(t.translate(&start(&[pt(0.0, 0.0), pt(1.0, 1.0)])), None);
    assert!(!t.is_tracking());
}

#[test]
fn touch_second_finger_cancels() {
    let mut t = TouchAdapter::new();
    t.translate(&start(&[pt(0.0, 0.0)]));
    assert_eq!(
        t.translate(&start(&[pt(0.0, 0.0), pt(5.0, 5.0)])),
        Some(SessionEvent::Cancel(CancelReason::MultiTouch))
    );
    assert!(!t.is_tracking());
    // Lifting fingers afterwards does not produce a release.
    assert_eq!(t.translate(&TouchInput::End), None);
}

#[test]
fn touch_multi_point_move_cancels() {
    let mut t = TouchAdapter::new();
    t.translate(&start(&[pt(0.0, 0.0)]));
    assert_eq!(
        t.translate(&touch_move(&[pt(1.0, 1.0), pt(2.0, 2.0)])),
        Some(SessionEvent::Cancel(CancelReason::MultiTouch))
    );
}

#[test]
fn touch_move_only_while_tracking() {
    let mut t = TouchAdapter::new();
    assert_eq!(t.translate(&touch_move(&[pt(1.0, 1.0)])), None);
    t.translate(&start(&[pt(0.0, 0.0)]));
    assert_eq!(t.translate(&touch_move(&[pt(1.0, 1.0)])), Some(SessionEvent::Move(pt(1.0, 1.0))));
}

#[test]
fn touch_end_releases_once() {
    let mut t = TouchAdapter::new();
    t.translate(&start(&[pt(0.0, 0.0)]));
    assert_eq!(t.translate(&TouchInput::End), Some(SessionEvent::Release));
    assert_eq!(t.translate(&TouchInput::End), None);
}

#[test]
fn touch_cancel_reports_capture_loss() {
    let mut t = TouchAdapter::new();
    assert_eq!(t.translate(&TouchInput::Cancel), None);
    t.translate(&start(&[pt(0.0, 0.0)]));
    assert_eq!(t.translate(&TouchInput::Cancel), Some(SessionEvent::Cancel(CancelReason::PointerCaptureLost)));
}

// =============================================================
// PointerSession
// =============================================================

#[test]
fn session_press_with_source_begins() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(MouseAdapter);
    let payload = DragPayload::new(PayloadKind::Client, "C1", "Mme Leroy");
    session.feed(&mut sink, &MouseInput::Down { point: pt(3.0, 4.0), button: MouseButton::Primary }, Some(&payload));
    session.feed(&mut sink, &MouseInput::Move { point: pt(5.0, 6.0) }, None);
    session.feed(&mut sink, &MouseInput::Up { button: MouseButton::Primary }, None);
    assert_eq!(sink.calls, vec!["begin C1 3,4", "move 5,6", "end"]);
}

#[test]
fn session_press_without_source_begins_nothing() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(MouseAdapter);
    let ev = session.feed(&mut sink, &MouseInput::Down { point: pt(0.0, 0.0), button: MouseButton::Primary }, None);
    assert_eq!(ev, Some(SessionEvent::Press(pt(0.0, 0.0))));
    assert!(sink.calls.is_empty());
}

#[test]
fn session_without_own_press_forwards_nothing() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(MouseAdapter);
    session.feed(&mut sink, &MouseInput::Down { point: pt(0.0, 0.0), button: MouseButton::Primary }, None);
    session.feed(&mut sink, &MouseInput::Move { point: pt(4.0, 4.0) }, None);
    let ev = session.feed(&mut sink, &MouseInput::Up { button: MouseButton::Primary }, None);
    assert_eq!(ev, Some(SessionEvent::Release));
    assert!(!session.is_engaged());
    assert!(sink.calls.is_empty());
}

#[test]
fn sourceless_touch_is_not_tracked() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(TouchAdapter::new());
    session.feed(&mut sink, &start(&[pt(5.0, 5.0)]), None);
    assert!(!session.adapter().is_tracking());
    assert_eq!(session.feed(&mut sink, &TouchInput::End, None), None);
    assert!(sink.calls.is_empty());
}

#[test]
fn refused_press_leaves_session_disengaged() {
    let mut sink = RecordingSink { busy: true, ..RecordingSink::default() };
    let mut session = PointerSession::new(TouchAdapter::new());
    let payload = DragPayload::new(PayloadKind::Client, "C1", "Mme Leroy");
    session.feed(&mut sink, &start(&[pt(1.0, 1.0)]), Some(&payload));
    assert!(!session.is_engaged());
    assert!(!session.adapter().is_tracking());
    session.feed(&mut sink, &TouchInput::End, None);
    assert_eq!(sink.calls, vec!["begin C1 1,1"]);
}

#[test]
fn session_touch_flow_with_second_finger() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(TouchAdapter::new());
    let payload = DragPayload::new(PayloadKind::Artisan, "A1", "Jean Dupont");
    session.feed(&mut sink, &start(&[pt(1.0, 1.0)]), Some(&payload));
    session.feed(&mut sink, &touch_move(&[pt(2.0, 2.0)]), None);
    session.feed(&mut sink, &start(&[pt(2.0, 2.0), pt(9.0, 9.0)]), None);
    session.feed(&mut sink, &TouchInput::End, None);
    assert_eq!(sink.calls, vec!["begin A1 1,1", "move 2,2", "cancel MultiTouch"]);
}

#[test]
fn session_blur_cancels_and_resets_tracking() {
    let mut sink = RecordingSink::default();
    let mut session = PointerSession::new(TouchAdapter::new());
    let payload = DragPayload::new(PayloadKind::Artisan, "A1", "Jean Dupont");
    session.feed(&mut sink, &start(&[pt(1.0, 1.0)]), Some(&payload));
    session.blur(&mut sink);
    assert!(!session.adapter().is_tracking());
    assert!(!session.is_engaged());
    assert_eq!(sink.calls, vec!["begin A1 1,1", "cancel WindowBlur"]);
}
