#![forbid(unsafe_code)]

//! Coalescing for high-frequency drag moves.
//!
//! Pointer and touch devices can report moves far faster than a board can
//! re-run hit testing and re-render. [`MoveCoalescer`] throttles
//! [`DragGesture::Move`] to at most one per interval using a "latest wins"
//! strategy: moves inside the window replace the pending one instead of
//! being forwarded.
//!
//! # Invariants
//!
//! 1. The pending move is never silently lost: [`MoveCoalescer::flush`]
//!    returns it, and callers must flush before acting on a terminal gesture
//!    so the last position before a drop is always applied.
//! 2. Non-move gestures pass through untouched; flushing is the caller's job.
//! 3. A zero interval forwards every move.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use taskboard_core::geometry::Point;
//! use taskboard_core::gesture::DragGesture;
//! use taskboard_core::move_coalescer::MoveCoalescer;
//! use web_time::Instant;
//!
//! let mut coalescer = MoveCoalescer::new(Duration::from_millis(16));
//! let t = Instant::now();
//! let mv = |x| DragGesture::Move { pointer_id: 1, current: Point::new(x, 0.0), delta: (1.0, 0.0) };
//!
//! assert!(coalescer.push(mv(1.0), t).is_some()); // first move goes straight through
//! assert!(coalescer.push(mv(2.0), t).is_none()); // inside the window: held back
//! assert!(coalescer.push(mv(3.0), t).is_none()); // replaces the held move
//!
//! // Before a drop, flush so the final position is applied.
//! let pending = coalescer.flush().unwrap();
//! assert!(matches!(pending, DragGesture::Move { current, .. } if current.x == 3.0));
//! ```

use std::time::Duration;

use web_time::Instant;

use crate::gesture::DragGesture;

/// Latest-wins throttle for drag moves.
///
/// Not thread-safe; use from the single input-processing thread.
#[derive(Debug, Clone, Default)]
pub struct MoveCoalescer {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<DragGesture>,
}

impl MoveCoalescer {
    /// Create a coalescer forwarding at most one move per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Push a gesture.
    ///
    /// Returns `Some(gesture)` if it should be processed now, or `None` if it
    /// was a move held back as pending.
    pub fn push(&mut self, gesture: DragGesture, now: Instant) -> Option<DragGesture> {
        if !matches!(gesture, DragGesture::Move { .. }) {
            return Some(gesture);
        }
        let due = self
            .last_emit
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.pending = None;
            self.last_emit = Some(now);
            Some(gesture)
        } else {
            self.pending = Some(gesture);
            None
        }
    }

    /// Take the pending move, if any.
    #[must_use]
    pub fn flush(&mut self) -> Option<DragGesture> {
        self.pending.take()
    }

    /// Check if a move is being held back.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discard pending input and forget the throttle window.
    ///
    /// Use this when a drag is cancelled; the held move must not be applied.
    pub fn clear(&mut self) {
        self.pending = None;
        self.last_emit = None;
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
