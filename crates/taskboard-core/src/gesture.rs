#![forbid(unsafe_code)]

//! Gesture recognition: transforms raw pointer events into drag gestures.
//!
//! [`GestureRecognizer`] is a stateful processor that converts raw
//! [`InputEvent`] sequences into [`DragGesture`]s. Mouse, touch, and pen
//! input all run through the same state machine; only the start threshold
//! differs per modality.
//!
//! # State Machine
//!
//! ```text
//! Idle --down--> Pressed --move >= threshold--> Dragging --up--> Idle (End)
//!                   |                              |
//!                   +--up/cancel--> Idle           +--cancel/interrupt--> Idle (Cancel)
//! ```
//!
//! # Invariants
//!
//! 1. Every drag is well-formed: `Start` -> zero or more `Move` -> exactly one
//!    of `End` or `Cancel`.
//! 2. At most one pointer is tracked. Events from any other pointer id are
//!    ignored until the tracked pointer is released or cancelled.
//! 3. A press that never crosses the threshold produces no gestures at all.
//! 4. After [`GestureRecognizer::reset`] the recognizer is idle and emits
//!    nothing for the abandoned pointer.
//!
//! # Failure Modes
//!
//! - A release the host never delivered (pointer let go outside the window)
//!   shows up as a second `Down` from the tracked pointer. That press
//!   cancels any drag in progress with [`CancelReason::PointerCancel`] and
//!   re-arms at the new position.

use serde::{Deserialize, Serialize};

use crate::event::{
    CancelReason, InputEvent, PointerButtons, PointerEvent, PointerEventKind, PointerModality,
};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for drag recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Manhattan distance (px) a mouse or pen must travel before a drag starts (default: 4).
    pub drag_threshold: f32,
    /// Manhattan distance (px) a touch contact must travel before a drag starts (default: 8).
    pub touch_drag_threshold: f32,
    /// Buttons allowed to start a drag (default: primary only).
    pub accepted_buttons: PointerButtons,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
            touch_drag_threshold: 8.0,
            accepted_buttons: PointerButtons::PRIMARY,
        }
    }
}

impl GestureConfig {
    /// Start threshold for one modality.
    #[must_use]
    pub fn threshold_for(&self, modality: PointerModality) -> f32 {
        match modality {
            PointerModality::Touch => self.touch_drag_threshold,
            PointerModality::Mouse | PointerModality::Pen => self.drag_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A recognized drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragGesture {
    /// The pointer travelled past the threshold; `origin` is the press point.
    Start {
        pointer_id: u32,
        modality: PointerModality,
        origin: Point,
    },
    /// Ongoing drag movement.
    Move {
        pointer_id: u32,
        current: Point,
        /// Movement since the previous `Move` (dx, dy).
        delta: (f32, f32),
    },
    /// The pointer was released while dragging.
    End { pointer_id: u32, position: Point },
    /// The drag was aborted.
    Cancel { reason: CancelReason },
}

impl DragGesture {
    /// Whether this gesture terminates a drag.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. } | Self::Cancel { .. })
    }
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Tracks the one pointer currently pressed.
#[derive(Debug, Clone, Copy)]
struct PressTracker {
    pointer_id: u32,
    modality: PointerModality,
    origin: Point,
    last: Point,
    started: bool,
}

/// Stateful recognizer that turns pointer events into drag gestures.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    active: Option<PressTracker>,
}

impl GestureRecognizer {
    /// Create a new recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Process a raw event, returning any gestures produced.
    ///
    /// Most events produce zero or one gesture. The move that crosses the
    /// threshold produces both `Start` and the first `Move`.
    pub fn process(&mut self, event: &InputEvent) -> Vec<DragGesture> {
        let mut out = Vec::with_capacity(2);
        match event {
            InputEvent::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Down => self.on_down(pointer, &mut out),
                PointerEventKind::Move => self.on_move(pointer, &mut out),
                PointerEventKind::Up => self.on_up(pointer, &mut out),
                PointerEventKind::Cancel => {
                    if self.tracks(pointer.pointer_id) {
                        self.abort(CancelReason::PointerCancel, &mut out);
                    }
                }
            },
            InputEvent::Interrupt(reason) => self.abort(*reason, &mut out),
        }
        out
    }

    /// Whether a drag is currently in progress (threshold crossed).
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some_and(|a| a.started)
    }

    /// The pointer id being tracked, pressed or dragging.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|a| a.pointer_id)
    }

    /// Forget the tracked pointer without emitting `Cancel`.
    pub fn reset(&mut self) {
        self.active = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn tracks(&self, pointer_id: u32) -> bool {
        self.active.is_some_and(|a| a.pointer_id == pointer_id)
    }

    fn on_down(&mut self, pointer: &PointerEvent, out: &mut Vec<DragGesture>) {
        if pointer.pointer_id == 0 {
            return;
        }
        if self.tracks(pointer.pointer_id) {
            // The previous release was lost.
            self.abort(CancelReason::PointerCancel, out);
        }
        if self.active.is_some() || !self.config.accepted_buttons.contains(pointer.button.flag()) {
            return;
        }
        self.active = Some(PressTracker {
            pointer_id: pointer.pointer_id,
            modality: pointer.modality,
            origin: pointer.position,
            last: pointer.position,
            started: false,
        });
    }

    fn on_move(&mut self, pointer: &PointerEvent, out: &mut Vec<DragGesture>) {
        let Some(press) = self.active.as_mut() else {
            return;
        };
        if press.pointer_id != pointer.pointer_id {
            return;
        }
        let threshold = self.config.threshold_for(press.modality);

        let pos = pointer.position;
        if !press.started && press.origin.manhattan_distance(pos) >= threshold {
            press.started = true;
            out.push(DragGesture::Start {
                pointer_id: press.pointer_id,
                modality: press.modality,
                origin: press.origin,
            });
        }
        if press.started {
            out.push(DragGesture::Move {
                pointer_id: press.pointer_id,
                current: pos,
                delta: pos.delta_from(press.last),
            });
        }
        press.last = pos;
    }

    fn on_up(&mut self, pointer: &PointerEvent, out: &mut Vec<DragGesture>) {
        if !self.tracks(pointer.pointer_id) {
            return;
        }
        if let Some(press) = self.active.take()
            && press.started
        {
            out.push(DragGesture::End {
                pointer_id: press.pointer_id,
                position: pointer.position,
            });
        }
    }

    fn abort(&mut self, reason: CancelReason, out: &mut Vec<DragGesture>) {
        if let Some(press) = self.active.take()
            && press.started
        {
            out.push(DragGesture::Cancel { reason });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerButton;

    fn down(x: f32, y: f32) -> InputEvent {
        PointerEvent::mouse(PointerEventKind::Down, x, y).into()
    }

    fn drag(x: f32, y: f32) -> InputEvent {
        PointerEvent::mouse(PointerEventKind::Move, x, y).into()
    }

    fn up(x: f32, y: f32) -> InputEvent {
        PointerEvent::mouse(PointerEventKind::Up, x, y).into()
    }

    fn touch(id: u32, kind: PointerEventKind, x: f32, y: f32) -> InputEvent {
        PointerEvent::touch(id, kind, x, y).into()
    }

    #[test]
    fn press_without_travel_is_not_a_drag() {
        let mut gr = GestureRecognizer::default();
        assert!(gr.process(&down(10.0, 10.0)).is_empty());
        assert!(gr.process(&drag(11.0, 11.0)).is_empty());
        assert!(gr.process(&up(11.0, 11.0)).is_empty());
        assert!(!gr.is_dragging());
        assert_eq!(gr.active_pointer_id(), None);
    }

    #[test]
    fn drag_starts_after_threshold() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(10.0, 10.0));

        let events = gr.process(&drag(12.0, 10.0));
        assert!(events.is_empty());

        let events = gr.process(&drag(14.0, 11.0));
        assert_eq!(
            events,
            vec![
                DragGesture::Start {
                    pointer_id: 1,
                    modality: PointerModality::Mouse,
                    origin: Point::new(10.0, 10.0),
                },
                DragGesture::Move {
                    pointer_id: 1,
                    current: Point::new(14.0, 11.0),
                    delta: (2.0, 1.0),
                },
            ]
        );
        assert!(gr.is_dragging());
    }

    #[test]
    fn drag_end_on_release() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(0.0, 0.0));
        gr.process(&drag(20.0, 0.0));
        let events = gr.process(&up(25.0, 3.0));
        assert_eq!(
            events,
            vec![DragGesture::End {
                pointer_id: 1,
                position: Point::new(25.0, 3.0),
            }]
        );
        assert!(!gr.is_dragging());
    }

    #[test]
    fn touch_uses_its_own_threshold() {
        let mut gr = GestureRecognizer::default();
        gr.process(&touch(3, PointerEventKind::Down, 0.0, 0.0));
        // 6px is past the mouse threshold but not the touch one.
        assert!(gr.process(&touch(3, PointerEventKind::Move, 6.0, 0.0)).is_empty());
        let events = gr.process(&touch(3, PointerEventKind::Move, 9.0, 0.0));
        assert!(matches!(
            events[0],
            DragGesture::Start {
                pointer_id: 3,
                modality: PointerModality::Touch,
                ..
            }
        ));
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut gr = GestureRecognizer::default();
        gr.process(&touch(1, PointerEventKind::Down, 0.0, 0.0));
        gr.process(&touch(2, PointerEventKind::Down, 50.0, 50.0));
        assert!(gr.process(&touch(2, PointerEventKind::Move, 90.0, 90.0)).is_empty());
        assert!(gr.process(&touch(2, PointerEventKind::Up, 90.0, 90.0)).is_empty());
        assert_eq!(gr.active_pointer_id(), Some(1));
    }

    fn start_origin(events: &[DragGesture]) -> Option<Point> {
        events.iter().find_map(|g| match g {
            DragGesture::Start { origin, .. } => Some(*origin),
            _ => None,
        })
    }

    #[test]
    fn repeated_press_rearms_at_new_origin() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(100.0, 410.0));
        // No release arrives; the next press comes from the same pointer.
        assert!(gr.process(&down(100.0, 460.0)).is_empty());
        let events = gr.process(&drag(100.0, 480.0));
        assert_eq!(start_origin(&events), Some(Point::new(100.0, 460.0)));
    }

    #[test]
    fn repeated_press_cancels_running_drag() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(0.0, 0.0));
        gr.process(&drag(30.0, 0.0));
        let events = gr.process(&down(200.0, 200.0));
        assert_eq!(
            events,
            vec![DragGesture::Cancel {
                reason: CancelReason::PointerCancel,
            }]
        );
        assert!(!gr.is_dragging());
        assert_eq!(gr.active_pointer_id(), Some(1));

        let events = gr.process(&drag(210.0, 200.0));
        assert_eq!(start_origin(&events), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn pointer_cancel_emits_cancel_only_when_dragging() {
        let mut gr = GestureRecognizer::default();
        gr.process(&touch(1, PointerEventKind::Down, 0.0, 0.0));
        assert!(gr.process(&touch(1, PointerEventKind::Cancel, 0.0, 0.0)).is_empty());

        gr.process(&touch(1, PointerEventKind::Down, 0.0, 0.0));
        gr.process(&touch(1, PointerEventKind::Move, 0.0, 30.0));
        let events = gr.process(&touch(1, PointerEventKind::Cancel, 0.0, 30.0));
        assert_eq!(
            events,
            vec![DragGesture::Cancel {
                reason: CancelReason::PointerCancel,
            }]
        );
    }

    #[test]
    fn interrupt_cancels_active_drag() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(0.0, 0.0));
        gr.process(&drag(30.0, 0.0));
        let events = gr.process(&InputEvent::Interrupt(CancelReason::FocusLost));
        assert_eq!(
            events,
            vec![DragGesture::Cancel {
                reason: CancelReason::FocusLost,
            }]
        );
        assert!(gr.process(&up(30.0, 0.0)).is_empty());
    }

    #[test]
    fn unaccepted_button_never_starts() {
        let mut gr = GestureRecognizer::default();
        let right = PointerEvent::mouse(PointerEventKind::Down, 0.0, 0.0)
            .with_button(PointerButton::Secondary);
        gr.process(&right.into());
        assert!(gr.process(&drag(40.0, 0.0)).is_empty());
        assert_eq!(gr.active_pointer_id(), None);
    }

    #[test]
    fn pointer_id_zero_is_reserved() {
        let mut gr = GestureRecognizer::default();
        gr.process(&touch(0, PointerEventKind::Down, 0.0, 0.0));
        assert_eq!(gr.active_pointer_id(), None);
    }

    #[test]
    fn reset_abandons_silently() {
        let mut gr = GestureRecognizer::default();
        gr.process(&down(0.0, 0.0));
        gr.process(&drag(30.0, 0.0));
        gr.reset();
        assert!(!gr.is_dragging());
        assert!(gr.process(&up(30.0, 0.0)).is_empty());
    }

    #[test]
    fn end_is_terminal() {
        assert!(
            DragGesture::End {
                pointer_id: 1,
                position: Point::default(),
            }
            .is_terminal()
        );
        assert!(
            !DragGesture::Move {
                pointer_id: 1,
                current: Point::default(),
                delta: (0.0, 0.0),
            }
            .is_terminal()
        );
    }
}
