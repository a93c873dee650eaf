#![forbid(unsafe_code)]

//! Drop resolution: final session state to at most one store write.
//!
//! # Invariants
//!
//! 1. No session, no placeholder, or a drop back onto the card's own slot
//!    resolves to `None`, and `None` never reaches the store.
//! 2. A resolved [`Move`] is applied with exactly one
//!    [`TaskStore::apply_move`] call.
//! 3. Same-column index math removes the card before inserting it, so a
//!    card moving down lands one slot earlier than the raw target index.
//!
//! # Failure Modes
//!
//! - The target card vanished from the live column between hover and drop:
//!   the move falls back to appending at the end of the target column.
//! - The dragged card vanished: nothing is resolved.
//! - The store rejects the move: reported as [`DropOutcome::Rejected`].

use taskboard_core::board::{AppliedMove, BoardError, BoardView, TaskStore};
use taskboard_core::placement::Move;

use crate::session::DragSession;

/// Turn the session at drop time into a move against the live board.
#[must_use]
pub fn resolve_drop<B>(session: Option<&DragSession>, board: &B) -> Option<Move>
where
    B: BoardView + ?Sized,
{
    let session = session?;
    let placeholder = session.placeholder.as_ref()?;
    let dragged = &session.dragged_item_id;

    let Some(task) = board.task(dragged) else {
        tracing::debug!(target: "taskboard::dnd", task = %dragged, "dragged task no longer exists");
        return None;
    };
    let from = board.column_of(dragged).unwrap_or(task.status);
    if !from.is_column() {
        tracing::debug!(target: "taskboard::dnd", task = %dragged, status = %from, "dragged task left the board");
        return None;
    }

    let to = placeholder.container;
    let live = board.column(to);
    let target_item_id = match &placeholder.target_item_id {
        Some(target) if target != dragged && live.contains(target) => Some(target.clone()),
        Some(target) => {
            tracing::debug!(
                target: "taskboard::dnd",
                task = %dragged,
                missing = %target,
                container = %to,
                "drop target not in live column, appending"
            );
            None
        }
        None => None,
    };

    let mv = Move {
        task_id: dragged.clone(),
        from_container_id: from,
        to_container_id: to,
        target_item_id,
        position: placeholder.position,
    };

    if mv.is_reorder() {
        let current = live.iter().position(|id| id == dragged);
        if current == Some(mv.resolve_index(live)) {
            tracing::debug!(target: "taskboard::dnd", task = %dragged, "drop onto own slot, nothing to do");
            return None;
        }
    }
    Some(mv)
}

/// Result of committing a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Applied { mv: Move, placement: AppliedMove },
    /// Nothing resolved; the store was not touched.
    NoChange,
    Rejected { mv: Move, error: BoardError },
}

impl DropOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Resolve the drop and apply it to `store`.
pub fn commit_drop<S>(session: Option<&DragSession>, store: &mut S) -> DropOutcome
where
    S: TaskStore + ?Sized,
{
    let Some(mv) = resolve_drop(session, &*store) else {
        return DropOutcome::NoChange;
    };
    match store.apply_move(&mv) {
        Ok(placement) => {
            tracing::debug!(
                target: "taskboard::dnd",
                task = %mv.task_id,
                from = %mv.from_container_id,
                to = %mv.to_container_id,
                index = placement.index,
                "drop applied"
            );
            DropOutcome::Applied { mv, placement }
        }
        Err(error) => {
            tracing::warn!(target: "taskboard::dnd", task = %mv.task_id, %error, "store rejected drop");
            DropOutcome::Rejected { mv, error }
        }
    }
}
