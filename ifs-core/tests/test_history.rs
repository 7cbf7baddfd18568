use std::time::Duration;

use ifs_core::history::History;

#[test]
fn test_length_grows_by_one_per_advance() {
    let mut history = History::new(0usize);
    for n in 1..=10 {
        history.advance_with(|prev| prev + 1);
        assert_eq!(history.len(), n + 1);
        assert_eq!(history.cursor(), n);
    }
}

#[test]
fn test_replay_never_recomputes() {
    let mut history = History::new(0usize);
    let mut computations = 0usize;

    for _ in 0..5 {
        history.advance_with(|prev| {
            computations += 1;
            prev + 1
        });
    }
    assert_eq!(computations, 5);

    // Walk back and forward again over the cached entries.
    for _ in 0..3 {
        assert!(history.retreat());
    }
    for expected in [3usize, 4, 5] {
        history.advance_with(|prev| {
            computations += 1;
            prev + 1
        });
        assert_eq!(*history.current(), expected);
    }
    assert_eq!(computations, 5, "replay must not recompute cached entries");
    assert_eq!(history.len(), 6);
}

#[test]
fn test_retreat_at_zero_is_a_noop() {
    let mut history = History::new(7usize);
    assert!(!history.retreat());
    assert_eq!(*history.current(), 7);
    assert_eq!(history.cursor(), 0);
}

#[test]
fn test_mixed_navigation_keeps_cursor_in_bounds() {
    let mut history = History::new(0usize);
    history.advance_with(|prev| prev + 1);
    history.retreat();
    history.retreat();
    history.advance_with(|prev| prev + 1);
    history.advance_with(|prev| prev + 1);
    assert_eq!(history.cursor(), 2);
    assert_eq!(history.len(), 3);
    assert_eq!(*history.current(), 2);
}

#[test]
fn test_mark_drawn_records_duration() {
    let mut history = History::new(0usize);
    history.mark_drawn(Duration::from_millis(4));
    assert_eq!(history.last_draw_duration(), Duration::from_millis(4));
    assert!(!history.needs_redraw());
}
