use super::*;

#[test]
fn tween_lands_exactly_on_target() {
    let tw = ScrollTween::new(0.0, 420.0, 1000.0);
    assert_eq!(tw.position_at(1000.0), 0.0);
    assert_eq!(tw.position_at(1000.0 + SMOOTH_SCROLL_MS), 420.0);
    assert_eq!(tw.position_at(99_999.0), 420.0);
    assert!(tw.is_finished(1000.0 + SMOOTH_SCROLL_MS));
}

#[test]
fn tween_moves_monotonically_towards_target() {
    let tw = ScrollTween::new(800.0, 100.0, 0.0);
    let mut last = tw.position_at(0.0);
    for step in 1..=10 {
        let now = SMOOTH_SCROLL_MS * f64::from(step) / 10.0;
        let pos = tw.position_at(now);
        assert!(pos <= last);
        last = pos;
    }
    assert_eq!(last, 100.0);
}

#[test]
fn zero_duration_jumps() {
    let tw = ScrollTween {
        duration_ms: 0.0,
        ..ScrollTween::new(0.0, 50.0, 0.0)
    };
    assert_eq!(tw.position_at(0.0), 50.0);
}
