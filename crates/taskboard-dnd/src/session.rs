#![forbid(unsafe_code)]

//! Drag session lifecycle.
//!
//! [`DragSessionMachine`] owns the single authoritative record of an
//! in-progress drag: which card is dragged, where it came from, which column
//! the pointer is over, and the current placeholder.
//!
//! ```text
//! Idle --start--> Dragging --move_over--> Dragging
//!                    |
//!                    +--finish_drop / cancel--> Idle
//! ```
//!
//! Every call returns a [`SessionTransition`]. Calls that do not apply to
//! the current state are not errors: they yield [`SessionEffect::Noop`] with
//! a [`NoopReason`] and leave the machine untouched.
//!
//! # Invariants
//!
//! 1. At most one session exists. A second `start` while dragging is
//!    rejected and the active session is unchanged.
//! 2. Hover container and placeholder are updated together.
//! 3. Leaving every container clears the hover but keeps the last
//!    placeholder, dragged item, and source.
//! 4. `transition_id` increases strictly, including across no-ops.

use std::time::Duration;

use taskboard_core::event::{CancelReason, PointerModality};
use taskboard_core::geometry::Point;
use taskboard_core::placement::DropPosition;
use taskboard_core::task::{TaskId, TaskStatus};
use web_time::Instant;

use crate::hit_test::{ItemRect, find_insertion_target};

// ---------------------------------------------------------------------------
// Session data
// ---------------------------------------------------------------------------

/// Where the dragged card would land if dropped now.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub container: TaskStatus,
    /// `None` means "start of an empty container" or, after the target
    /// vanished, "end of the container".
    pub target_item_id: Option<TaskId>,
    pub position: DropPosition,
}

/// The one in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub dragged_item_id: TaskId,
    pub source_container: TaskStatus,
    pub over_container: Option<TaskStatus>,
    pub placeholder: Option<Placeholder>,
    pub modality: PointerModality,
    pub started_at: Instant,
}

impl DragSession {
    /// Time since the drag started.
    #[must_use]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging,
}

/// Why a call left the machine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    /// The container is not a droppable column.
    NotAColumn,
    /// The pointer moved but hover and placeholder stayed the same.
    PlaceholderUnchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Started {
        item: TaskId,
        source: TaskStatus,
    },
    PlaceholderMoved {
        placeholder: Placeholder,
    },
    LeftContainers,
    Dropped {
        placeholder: Option<Placeholder>,
    },
    Cancelled {
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTransition {
    pub transition_id: u64,
    pub from: SessionState,
    pub to: SessionState,
    pub effect: SessionEffect,
}

impl SessionTransition {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.effect, SessionEffect::Noop { .. })
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Lifecycle machine for card drags.
#[derive(Debug, Clone, Default)]
pub struct DragSessionMachine {
    session: Option<DragSession>,
    transition_counter: u64,
}

impl DragSessionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Dragging
        } else {
            SessionState::Idle
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Begin dragging `item` out of `source`.
    pub fn start(
        &mut self,
        item: TaskId,
        source: TaskStatus,
        modality: PointerModality,
        now: Instant,
    ) -> SessionTransition {
        if self.session.is_some() {
            return self.noop(NoopReason::ActiveDragAlreadyInProgress);
        }
        if !source.is_column() {
            return self.noop(NoopReason::NotAColumn);
        }
        self.session = Some(DragSession {
            dragged_item_id: item.clone(),
            source_container: source,
            over_container: None,
            placeholder: None,
            modality,
            started_at: now,
        });
        self.transition(
            SessionState::Idle,
            SessionEffect::Started { item, source },
        )
    }

    /// The pointer is at `pointer`, over `container` (or over none).
    ///
    /// `candidates` are the live rectangles of the cards in `container`; the
    /// dragged card is excluded here, so callers may pass the full list.
    pub fn move_over(
        &mut self,
        container: Option<TaskStatus>,
        pointer: Point,
        candidates: &[ItemRect],
    ) -> SessionTransition {
        let Some(session) = self.session.as_mut() else {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        };

        let Some(container) = container else {
            if session.over_container.take().is_some() {
                return self.transition(SessionState::Dragging, SessionEffect::LeftContainers);
            }
            return self.noop(NoopReason::PlaceholderUnchanged);
        };
        if !container.is_column() {
            return self.noop(NoopReason::NotAColumn);
        }

        let target = find_insertion_target(pointer, candidates, Some(&session.dragged_item_id));
        let placeholder = match target {
            Some(t) => Placeholder {
                container,
                target_item_id: Some(t.item_id),
                position: t.position,
            },
            None => Placeholder {
                container,
                target_item_id: None,
                position: DropPosition::Before,
            },
        };

        if session.over_container == Some(container)
            && session.placeholder.as_ref() == Some(&placeholder)
        {
            return self.noop(NoopReason::PlaceholderUnchanged);
        }
        (session.over_container, session.placeholder) = (Some(container), Some(placeholder.clone()));
        self.transition(
            SessionState::Dragging,
            SessionEffect::PlaceholderMoved { placeholder },
        )
    }

    /// End the drag with a drop, handing the final session to the caller.
    ///
    /// Returns `None` for the session when idle (stale or duplicate drop).
    pub fn finish_drop(&mut self) -> (SessionTransition, Option<DragSession>) {
        let Some(session) = self.session.take() else {
            return (self.noop(NoopReason::IdleWithoutActiveDrag), None);
        };
        let transition = self.transition(
            SessionState::Dragging,
            SessionEffect::Dropped {
                placeholder: session.placeholder.clone(),
            },
        );
        (transition, Some(session))
    }

    /// Abort the drag without producing a move.
    pub fn cancel(&mut self, reason: CancelReason) -> SessionTransition {
        if self.session.take().is_none() {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        }
        self.transition(SessionState::Dragging, SessionEffect::Cancelled { reason })
    }

    fn noop(&mut self, reason: NoopReason) -> SessionTransition {
        let state = self.state();
        self.transition(state, SessionEffect::Noop { reason })
    }

    fn transition(&mut self, from: SessionState, effect: SessionEffect) -> SessionTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        SessionTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state(),
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskboard_core::geometry::Rect;

    fn cards() -> Vec<ItemRect> {
        vec![
            ItemRect::new("1", Rect::new(0.0, 0.0, 100.0, 40.0)),
            ItemRect::new("3", Rect::new(0.0, 50.0, 100.0, 40.0)),
        ]
    }

    fn dragging(item: &str) -> DragSessionMachine {
        let mut machine = DragSessionMachine::new();
        let t = machine.start(
            TaskId::from(item),
            TaskStatus::Todo,
            PointerModality::Mouse,
            Instant::now(),
        );
        assert!(!t.is_noop());
        machine
    }

    #[test]
    fn start_records_item_and_source() {
        let machine = dragging("1");
        let session = machine.session().unwrap();
        assert_eq!(session.dragged_item_id, TaskId::from("1"));
        assert_eq!(session.source_container, TaskStatus::Todo);
        assert_eq!(session.placeholder, None);
        assert_eq!(session.over_container, None);
        assert_eq!(machine.state(), SessionState::Dragging);
    }

    #[test]
    fn reentrant_start_is_rejected() {
        let mut machine = dragging("1");
        let before = machine.session().cloned();
        let t = machine.start(
            TaskId::from("2"),
            TaskStatus::Done,
            PointerModality::Touch,
            Instant::now(),
        );
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: NoopReason::ActiveDragAlreadyInProgress
            }
        );
        assert_eq!(machine.session().cloned(), before);
    }

    #[test]
    fn start_from_deleted_is_rejected() {
        let mut machine = DragSessionMachine::new();
        let t = machine.start(
            TaskId::from("x"),
            TaskStatus::Deleted,
            PointerModality::Mouse,
            Instant::now(),
        );
        assert!(t.is_noop());
        assert!(!machine.is_dragging());
    }

    #[test]
    fn move_over_sets_hover_and_placeholder() {
        let mut machine = dragging("9");
        let t = machine.move_over(Some(TaskStatus::Done), Point::new(10.0, 48.0), &cards());
        let expected = Placeholder {
            container: TaskStatus::Done,
            target_item_id: Some(TaskId::from("3")),
            position: DropPosition::Before,
        };
        assert_eq!(
            t.effect,
            SessionEffect::PlaceholderMoved {
                placeholder: expected.clone()
            }
        );
        let session = machine.session().unwrap();
        assert_eq!(session.over_container, Some(TaskStatus::Done));
        assert_eq!(session.placeholder, Some(expected));
    }

    #[test]
    fn empty_container_targets_its_start() {
        let mut machine = dragging("9");
        machine.move_over(Some(TaskStatus::InProgress), Point::new(10.0, 10.0), &[]);
        assert_eq!(
            machine.session().unwrap().placeholder,
            Some(Placeholder {
                container: TaskStatus::InProgress,
                target_item_id: None,
                position: DropPosition::Before,
            })
        );
    }

    #[test]
    fn dragged_card_is_excluded_from_candidates() {
        // Only the dragged card is in the column: it counts as empty.
        let mut machine = dragging("1");
        let only_self = vec![ItemRect::new("1", Rect::new(0.0, 0.0, 100.0, 40.0))];
        machine.move_over(Some(TaskStatus::Todo), Point::new(5.0, 5.0), &only_self);
        let placeholder = machine.session().unwrap().placeholder.clone().unwrap();
        assert_eq!(placeholder.target_item_id, None);
    }

    #[test]
    fn leaving_containers_keeps_last_placeholder() {
        let mut machine = dragging("9");
        machine.move_over(Some(TaskStatus::Done), Point::new(10.0, 0.0), &cards());
        let t = machine.move_over(None, Point::new(-50.0, 0.0), &[]);
        assert_eq!(t.effect, SessionEffect::LeftContainers);
        let session = machine.session().unwrap();
        assert_eq!(session.over_container, None);
        assert!(session.placeholder.is_some());
        assert_eq!(session.dragged_item_id, TaskId::from("9"));

        let again = machine.move_over(None, Point::new(-60.0, 0.0), &[]);
        assert!(again.is_noop());
    }

    #[test]
    fn repeated_move_to_same_slot_is_noop() {
        let mut machine = dragging("9");
        machine.move_over(Some(TaskStatus::Done), Point::new(10.0, 2.0), &cards());
        let t = machine.move_over(Some(TaskStatus::Done), Point::new(30.0, 3.0), &cards());
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: NoopReason::PlaceholderUnchanged
            }
        );
    }

    #[test]
    fn drop_returns_session_and_resets() {
        let mut machine = dragging("9");
        machine.move_over(Some(TaskStatus::Done), Point::new(10.0, 2.0), &cards());
        let (t, session) = machine.finish_drop();
        assert_eq!(t.to, SessionState::Idle);
        assert!(session.is_some());
        assert!(!machine.is_dragging());

        let (dup, none) = machine.finish_drop();
        assert!(dup.is_noop());
        assert!(none.is_none());
    }

    #[test]
    fn cancel_resets_and_idle_cancel_is_noop() {
        let mut machine = dragging("9");
        let t = machine.cancel(CancelReason::FocusLost);
        assert_eq!(
            t.effect,
            SessionEffect::Cancelled {
                reason: CancelReason::FocusLost
            }
        );
        assert!(machine.session().is_none());
        assert!(machine.cancel(CancelReason::FocusLost).is_noop());
    }

    #[test]
    fn idle_move_is_noop() {
        let mut machine = DragSessionMachine::new();
        let t = machine.move_over(Some(TaskStatus::Todo), Point::new(0.0, 0.0), &cards());
        assert_eq!(
            t.effect,
            SessionEffect::Noop {
                reason: NoopReason::IdleWithoutActiveDrag
            }
        );
    }

    #[test]
    fn transition_ids_are_monotonic() {
        let mut machine = DragSessionMachine::new();
        let a = machine.cancel(CancelReason::Programmatic);
        let b = machine.start(
            TaskId::from("1"),
            TaskStatus::Todo,
            PointerModality::Pen,
            Instant::now(),
        );
        let (c, _) = machine.finish_drop();
        assert!(a.transition_id < b.transition_id);
        assert!(b.transition_id < c.transition_id);
    }
}
