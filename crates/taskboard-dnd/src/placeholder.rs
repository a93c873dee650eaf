#![forbid(unsafe_code)]

//! Visual hints derived from the drag session.
//!
//! The renderer never tracks drag state on its own. It asks for a
//! [`PlaceholderHint`] and the hover column every frame and draws what it is
//! told. Projection is pure: the same session always yields the same hint.

use taskboard_core::placement::DropPosition;
use taskboard_core::task::{TaskId, TaskStatus};

use crate::session::DragSession;

/// Where the renderer should draw the drop gap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PlaceholderHint {
    /// Nothing to draw.
    #[default]
    None,
    Before {
        container: TaskStatus,
        item: TaskId,
    },
    After {
        container: TaskStatus,
        item: TaskId,
    },
    /// Below the last card of a non-empty column.
    End { container: TaskStatus },
    /// The column has no other cards; the gap is its only content.
    Empty { container: TaskStatus },
}

impl PlaceholderHint {
    /// Render index of the gap within `order`, with the dragged card
    /// `dragged` removed from the column first.
    #[must_use]
    pub fn slot_in(&self, order: &[TaskId], dragged: &TaskId) -> Option<usize> {
        let visible = || order.iter().filter(|id| *id != dragged);
        match self {
            Self::None => None,
            Self::Empty { .. } => Some(0),
            Self::End { .. } => Some(visible().count()),
            Self::Before { item, .. } => visible().position(|id| id == item),
            Self::After { item, .. } => visible().position(|id| id == item).map(|i| i + 1),
        }
    }
}

/// Project a session onto the hint to draw.
///
/// `container_len` reports how many cards a column holds; it separates a
/// targetless placeholder in an empty column from one at the end of a
/// populated column.
#[must_use]
pub fn project(
    session: Option<&DragSession>,
    container_len: impl Fn(TaskStatus) -> usize,
) -> PlaceholderHint {
    let Some(session) = session else {
        return PlaceholderHint::None;
    };
    if session.over_container.is_none() {
        return PlaceholderHint::None;
    }
    let Some(placeholder) = session.placeholder.as_ref() else {
        return PlaceholderHint::None;
    };
    let container = placeholder.container;
    match (&placeholder.target_item_id, placeholder.position) {
        (Some(item), DropPosition::Before) => PlaceholderHint::Before {
            container,
            item: item.clone(),
        },
        (Some(item), DropPosition::After) => PlaceholderHint::After {
            container,
            item: item.clone(),
        },
        (None, _) => {
            // The dragged card does not count toward its own column.
            let own = usize::from(session.source_container == container);
            if container_len(container).saturating_sub(own) == 0 {
                PlaceholderHint::Empty { container }
            } else {
                PlaceholderHint::End { container }
            }
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardHints {
    pub hover: Option<TaskStatus>,
    pub placeholder: PlaceholderHint,
    pub dragged: Option<TaskId>,
}

impl BoardHints {
    #[must_use]
    pub fn from_session(
        session: Option<&DragSession>,
        container_len: impl Fn(TaskStatus) -> usize,
    ) -> Self {
        Self {
            hover: session.and_then(|s| s.over_container),
            placeholder: project(session, container_len),
            dragged: session.map(|s| s.dragged_item_id.clone()),
        }
    }
}
