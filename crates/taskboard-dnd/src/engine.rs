#![forbid(unsafe_code)]

//! Host-facing drag-and-drop engine.
//!
//! [`DragDropEngine`] wires the input layer to the session machine:
//!
//! ```text
//! PointerEvent -> GestureRecognizer -> MoveCoalescer -> DragSessionMachine
//!                                                          |        |
//!                                              AutoScroller    resolve + commit
//! ```
//!
//! The host owns everything with side effects. It passes the current
//! [`BoardLayout`] and the [`TaskStore`] into each call, applies the
//! [`ScrollDelta`] returned from [`DragDropEngine::on_frame`], and renders
//! [`BoardHints`].
//!
//! # Invariants
//!
//! 1. Mouse, touch, and pen input all reach the same session machine.
//! 2. Any pending coalesced move is applied before a drop is resolved.
//! 3. Whenever the session returns to idle, auto-scroll is stopped and
//!    pending input is discarded.
//! 4. The store sees at most one `apply_move` per finished drag.
//!
//! # Failure Modes
//!
//! - A press that does not land on a card is ignored for its whole gesture.
//! - Releasing outside every column cancels with
//!   [`CancelReason::ReleasedOutside`].
//! - A session outliving `max_session_lifetime_ms` is force-cancelled by
//!   [`DragDropEngine::check_expired`] with [`CancelReason::Expired`].

use rustc_hash::FxHashMap;
use taskboard_core::board::{BoardView, TaskStore};
use taskboard_core::event::{CancelReason, InputEvent, PointerModality};
use taskboard_core::geometry::{Point, Rect, Size};
use taskboard_core::gesture::{DragGesture, GestureRecognizer};
use taskboard_core::move_coalescer::MoveCoalescer;
use taskboard_core::task::{TaskId, TaskStatus};
use web_time::Instant;

use crate::autoscroll::{AutoScroller, FrameDriver, FrameId, ScrollDelta};
use crate::config::{ConfigError, EngineConfig};
use crate::hit_test::{self, ContainerRect, ItemRect};
use crate::placeholder::BoardHints;
use crate::resolver::{DropOutcome, commit_drop};
use crate::session::{
    DragSession, DragSessionMachine, Placeholder, SessionState, SessionTransition,
};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Renderer-supplied geometry, in viewport coordinates.
pub trait BoardLayout {
    fn viewport(&self) -> Size;

    /// Bounds of every droppable column.
    fn containers(&self) -> &[ContainerRect];

    /// Bounds of the cards rendered in `container`, in display order.
    fn items(&self, container: TaskStatus) -> &[ItemRect];

    fn container_at(&self, point: Point) -> Option<TaskStatus> {
        hit_test::container_at(point, self.containers())
    }

    /// The card under `point` and the column it is rendered in.
    fn item_at(&self, point: Point) -> Option<(TaskStatus, &TaskId)> {
        let container = self.container_at(point)?;
        hit_test::item_at(point, self.items(container)).map(|id| (container, id))
    }
}

/// Owned [`BoardLayout`] built from one render pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    viewport: Size,
    containers: Vec<ContainerRect>,
    items: FxHashMap<TaskStatus, Vec<ItemRect>>,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Add a column and its cards.
    #[must_use]
    pub fn with_container(mut self, id: TaskStatus, rect: Rect, items: Vec<ItemRect>) -> Self {
        self.containers.push(ContainerRect { id, rect });
        self.items.insert(id, items);
        self
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }
}

impl BoardLayout for LayoutSnapshot {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn containers(&self) -> &[ContainerRect] {
        &self.containers
    }

    fn items(&self, container: TaskStatus) -> &[ItemRect] {
        self.items.get(&container).map_or(&[][..], Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// What one input event did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOutput {
    pub transitions: Vec<SessionTransition>,
    /// Set when a drag finished with a drop attempt.
    pub drop: Option<DropOutcome>,
}

impl EngineOutput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.drop.is_none()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Drag-and-drop engine for one board view.
#[derive(Debug)]
pub struct DragDropEngine<D: FrameDriver> {
    config: EngineConfig,
    recognizer: GestureRecognizer,
    coalescer: MoveCoalescer,
    machine: DragSessionMachine,
    scroller: AutoScroller<D>,
}

impl<D: FrameDriver> DragDropEngine<D> {
    /// Build an engine; fails if `config` does not validate.
    pub fn new(config: EngineConfig, driver: D) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self {
            recognizer: GestureRecognizer::new(config.gesture.clone()),
            coalescer: MoveCoalescer::new(config.move_throttle()),
            machine: DragSessionMachine::new(),
            scroller: AutoScroller::new(config.auto_scroll.clone(), driver),
            config,
        })
    }

    // -- raw input ----------------------------------------------------------

    /// Feed one raw input event.
    pub fn handle_pointer<L, S>(
        &mut self,
        event: impl Into<InputEvent>,
        now: Instant,
        layout: &L,
        store: &mut S,
    ) -> EngineOutput
    where
        L: BoardLayout + ?Sized,
        S: TaskStore + ?Sized,
    {
        let event = event.into();
        let mut out = EngineOutput::default();
        for gesture in self.recognizer.process(&event) {
            match gesture {
                DragGesture::Start {
                    modality, origin, ..
                } => self.on_gesture_start(origin, modality, now, layout, &*store, &mut out),
                DragGesture::Move { .. } => {
                    if !self.machine.is_dragging() {
                        continue;
                    }
                    if let Some(DragGesture::Move { current, .. }) =
                        self.coalescer.push(gesture, now)
                    {
                        let t = self.drag_over(current, layout);
                        out.transitions.push(t);
                    }
                }
                DragGesture::End { .. } => {
                    if let Some(DragGesture::Move { current, .. }) = self.coalescer.flush() {
                        let t = self.drag_over(current, layout);
                        out.transitions.push(t);
                    }
                    let released_outside = self
                        .machine
                        .session()
                        .is_some_and(|s| s.over_container.is_none());
                    if released_outside {
                        out.transitions
                            .push(self.cancel(CancelReason::ReleasedOutside));
                    } else {
                        let dropped = self.complete_drop(store);
                        out.transitions.extend(dropped.transitions);
                        out.drop = dropped.drop;
                    }
                }
                // The recognizer already dropped (or re-armed) its press.
                DragGesture::Cancel { reason } => out.transitions.push(self.end_session(reason)),
            }
        }
        out
    }

    fn on_gesture_start<L, S>(
        &mut self,
        origin: Point,
        modality: PointerModality,
        now: Instant,
        layout: &L,
        board: &S,
        out: &mut EngineOutput,
    ) where
        L: BoardLayout + ?Sized,
        S: BoardView + ?Sized,
    {
        let hit = layout
            .item_at(origin)
            .map(|(shown_in, id)| (board.column_of(id).unwrap_or(shown_in), id.clone()));
        let Some((source, item)) = hit else {
            tracing::trace!(target: "taskboard::dnd", x = origin.x, y = origin.y, "drag started off any card");
            self.recognizer.reset();
            return;
        };
        let started = self.begin_drag(item, source, modality, now);
        let accepted = !started.is_noop();
        out.transitions.push(started);
        if accepted {
            out.transitions.push(self.drag_over(origin, layout));
        }
    }

    // -- semantic operations --------------------------------------------------

    /// Start dragging `item` out of `source`.
    pub fn begin_drag(
        &mut self,
        item: TaskId,
        source: TaskStatus,
        modality: PointerModality,
        now: Instant,
    ) -> SessionTransition {
        let t = self.machine.start(item, source, modality, now);
        self.record(t)
    }

    /// The dragged card is at `pointer`: update hover, placeholder, and
    /// auto-scroll.
    pub fn drag_over<L>(&mut self, pointer: Point, layout: &L) -> SessionTransition
    where
        L: BoardLayout + ?Sized,
    {
        let container = layout.container_at(pointer);
        let candidates = container.map_or(&[][..], |c| layout.items(c));
        let t = self.machine.move_over(container, pointer, candidates);
        if self.machine.is_dragging() {
            self.scroller.update(pointer, layout.viewport());
        }
        self.record(t)
    }

    /// Finish the drag at the current placeholder and write the result.
    pub fn complete_drop<S>(&mut self, store: &mut S) -> EngineOutput
    where
        S: TaskStore + ?Sized,
    {
        let (t, session) = self.machine.finish_drop();
        let t = self.record(t);
        let drop = session.map(|session| commit_drop(Some(&session), store));
        EngineOutput {
            transitions: vec![t],
            drop,
        }
    }

    /// Abort the drag, if any. No move is produced.
    pub fn cancel(&mut self, reason: CancelReason) -> SessionTransition {
        self.recognizer.reset();
        self.end_session(reason)
    }

    fn end_session(&mut self, reason: CancelReason) -> SessionTransition {
        let t = self.machine.cancel(reason);
        self.record(t)
    }

    /// Force-cancel a session older than the configured lifetime.
    pub fn check_expired(&mut self, now: Instant) -> Option<SessionTransition> {
        let limit = self.config.max_session_lifetime()?;
        let session = self.machine.session()?;
        let age = session.age(now);
        if age < limit {
            return None;
        }
        tracing::warn!(
            target: "taskboard::dnd",
            task = %session.dragged_item_id,
            age_ms = age.as_millis() as u64,
            "drag session expired, force-cancelling"
        );
        Some(self.cancel(CancelReason::Expired))
    }

    /// A frame requested through the driver fired.
    pub fn on_frame(&mut self, frame: FrameId) -> Option<ScrollDelta> {
        if !self.machine.is_dragging() {
            self.scroller.stop();
            return None;
        }
        self.scroller.on_frame(frame)
    }

    // -- queries ------------------------------------------------------------

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.machine.is_dragging()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.machine.session()
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.machine.session()?.placeholder.as_ref()
    }

    #[must_use]
    pub fn hover_container(&self) -> Option<TaskStatus> {
        self.machine.session()?.over_container
    }

    /// Render hints for the current frame.
    #[must_use]
    pub fn hints<B>(&self, board: &B) -> BoardHints
    where
        B: BoardView + ?Sized,
    {
        BoardHints::from_session(self.machine.session(), |status| {
            board.column(status).len()
        })
    }

    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scroller.is_active()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        self.scroller.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.scroller.driver_mut()
    }

    fn record(&mut self, t: SessionTransition) -> SessionTransition {
        if t.is_noop() {
            tracing::trace!(target: "taskboard::dnd", id = t.transition_id, effect = ?t.effect, "session no-op");
        } else {
            tracing::debug!(
                target: "taskboard::dnd",
                id = t.transition_id,
                from = ?t.from,
                to = ?t.to,
                effect = ?t.effect,
                "session transition"
            );
        }
        if t.to == SessionState::Idle {
            self.scroller.stop();
            self.coalescer.clear();
        }
        t
    }
}
