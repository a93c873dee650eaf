#![forbid(unsafe_code)]

//! Move commands and the index arithmetic that places a task in a column.
//!
//! # Invariants
//!
//! 1. [`insertion_index`] is computed against the column order *with* the
//!    moved task still present and returns an index into the order *after*
//!    the task has been removed.
//! 2. When the moved task sits before the insertion point in the same
//!    column, the index is decremented by one to account for the removal
//!    shift.
//! 3. A target that is absent from the order means "append at the end".

use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskStatus};

/// Which side of the target item the dragged item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    #[default]
    Before,
    After,
}

/// A resolved drop, applied atomically by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub task_id: TaskId,
    pub from_container_id: TaskStatus,
    pub to_container_id: TaskStatus,
    /// `None` appends to the end of the target column (or fills an empty one).
    pub target_item_id: Option<TaskId>,
    pub position: DropPosition,
}

impl Move {
    /// Whether the move stays inside one column.
    #[must_use]
    pub fn is_reorder(&self) -> bool {
        self.from_container_id == self.to_container_id
    }

    /// Index the task will occupy in `target_order` once the move is applied.
    ///
    /// `target_order` is the current order of the target column.
    #[must_use]
    pub fn resolve_index(&self, target_order: &[TaskId]) -> usize {
        insertion_index(
            target_order,
            &self.task_id,
            self.target_item_id.as_ref(),
            self.position,
        )
    }
}

/// Final index of `moved` in `order` after removing it and re-inserting it
/// relative to `target`.
#[must_use]
pub fn insertion_index(
    order: &[TaskId],
    moved: &TaskId,
    target: Option<&TaskId>,
    position: DropPosition,
) -> usize {
    let from = order.iter().position(|id| id == moved);
    let remaining = order.len() - usize::from(from.is_some());

    let Some(target_idx) = target.and_then(|t| order.iter().position(|id| id == t)) else {
        return remaining;
    };

    let mut idx = match position {
        DropPosition::Before => target_idx,
        DropPosition::After => target_idx + 1,
    };
    // Removing the moved task shifts everything after it up by one.
    if let Some(from) = from
        && from < idx
    {
        idx -= 1;
    }
    idx.min(remaining)
}

/// Remove `moved` from `order` (if present) and insert it at the index
/// computed by [`insertion_index`]. Returns the final index.
pub fn reorder(
    order: &mut Vec<TaskId>,
    moved: &TaskId,
    target: Option<&TaskId>,
    position: DropPosition,
) -> usize {
    let idx = insertion_index(order, moved, target, position);
    order.retain(|id| id != moved);
    order.insert(idx, moved.clone());
    idx
}
