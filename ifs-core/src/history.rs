//! Replayable generation history.
//!
//! Every generator appends one snapshot per forward step into an
//! append-only sequence and keeps a cursor into it. Advancing at the tip
//! computes a new snapshot; advancing behind the tip is a pure cursor
//! move, which is what makes undo/redo free of recomputation. Entries
//! are immutable once appended.

use std::time::Duration;

/// Run `f`, reporting how long it took. `Instant` is unavailable on
/// `wasm32-unknown-unknown`, so wasm builds report a zero duration.
fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let start = std::time::Instant::now();
        let out = f();
        (out, start.elapsed())
    }
    #[cfg(target_arch = "wasm32")]
    {
        (f(), Duration::ZERO)
    }
}

#[derive(Clone, Debug)]
pub struct History<S> {
    states: Vec<S>,
    cursor: usize,
    needs_redraw: bool,
    last_step: Duration,
    last_draw: Duration,
}

impl<S> History<S> {
    pub fn new(initial: S) -> Self {
        Self {
            states: vec![initial],
            cursor: 0,
            needs_redraw: true,
            last_step: Duration::ZERO,
            last_draw: Duration::ZERO,
        }
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> &S {
        &self.states[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Move forward one generation. When the cursor is at the tip,
    /// `compute` derives the next snapshot from the current one and the
    /// result is appended; otherwise the cached entry is replayed and
    /// `compute` is not called. Returns whether a new snapshot was
    /// computed.
    pub fn advance_with(&mut self, compute: impl FnOnce(&S) -> S) -> bool {
        let computed = if self.cursor == self.states.len() - 1 {
            let (next, took) = {
                let prev = &self.states[self.cursor];
                timed(|| compute(prev))
            };
            self.states.push(next);
            self.last_step = took;
            true
        } else {
            false
        };
        self.cursor += 1;
        self.needs_redraw = true;
        computed
    }

    /// Move back one generation; no-op at generation zero. Never destroys
    /// entries. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.needs_redraw = true;
        true
    }

    /// Whether the display is stale. Set by every successful advance or
    /// retreat; cleared by [`mark_drawn`](Self::mark_drawn).
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// The host reports it blitted the current snapshot, along with how
    /// long the blit took.
    pub fn mark_drawn(&mut self, elapsed: Duration) {
        self.needs_redraw = false;
        self.last_draw = elapsed;
    }

    /// Wall-clock cost of the most recent computed generation.
    pub fn last_step_duration(&self) -> Duration {
        self.last_step
    }

    /// Wall-clock cost of the most recent host blit.
    pub fn last_draw_duration(&self) -> Duration {
        self.last_draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_appends_and_retreat_moves_cursor() {
        let mut history = History::new(0u32);
        history.advance_with(|prev| prev + 1);
        history.advance_with(|prev| prev + 1);
        assert_eq!(history.len(), 3);
        assert_eq!(*history.current(), 2);
        assert!(history.retreat());
        assert_eq!(*history.current(), 1);
        assert!(history.retreat());
        assert!(!history.retreat());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn redraw_flag_follows_navigation() {
        let mut history = History::new(0u32);
        assert!(history.needs_redraw());
        history.mark_drawn(Duration::ZERO);
        assert!(!history.needs_redraw());
        history.advance_with(|prev| prev + 1);
        assert!(history.needs_redraw());
        history.mark_drawn(Duration::ZERO);
        history.retreat();
        assert!(history.needs_redraw());
    }
}
