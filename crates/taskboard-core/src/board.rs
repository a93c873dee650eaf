#![forbid(unsafe_code)]

//! Task store interface and the in-memory reference board.
//!
//! The drag-and-drop engine never mutates task records itself. It reads
//! column order through [`BoardView`] and requests mutations through
//! [`TaskStore`]. [`TaskBoard`] is the in-memory implementation used by the
//! demo host and the test suites.
//!
//! # Invariants
//!
//! 1. A task with a column status appears in exactly one column order, the
//!    one matching its status. Soft-deleted tasks appear in none.
//! 2. Column order is manual insertion order; it is never re-derived from
//!    timestamps.
//! 3. [`TaskStore::apply_move`] computes the new column orders first and
//!    swaps them in only when every step succeeded, so a failed move leaves
//!    the board untouched.
//! 4. Every successful mutation refreshes the task's `updated_at`.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::placement::{self, Move};
use crate::task::{Clock, SystemClock, Task, TaskId, TaskStatus};

/// Errors raised by a task store when a mutation cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("task {0} does not exist")]
    UnknownTask(TaskId),
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
    #[error("task {0} is not on the board (status {1})")]
    NotOnBoard(TaskId, TaskStatus),
    #[error("status {0} is not a board column")]
    NotAColumn(TaskStatus),
}

/// Where a move landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Final index in the target column.
    pub index: usize,
}

/// Read access to the live board.
pub trait BoardView {
    /// Current order of a column. Non-column statuses yield an empty slice.
    fn column(&self, status: TaskStatus) -> &[TaskId];

    /// Look up a task record.
    fn task(&self, id: &TaskId) -> Option<&Task>;

    /// The column currently holding `id`, if any.
    fn column_of(&self, id: &TaskId) -> Option<TaskStatus> {
        TaskStatus::COLUMNS
            .into_iter()
            .find(|&status| self.column(status).contains(id))
    }
}

/// Write access requested by the drag-and-drop engine.
pub trait TaskStore: BoardView {
    /// Apply one move atomically.
    fn apply_move(&mut self, mv: &Move) -> Result<AppliedMove, BoardError>;

    /// Change a task's status, appending it to the end of the new column.
    fn update_task_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<(), BoardError>;
}

/// In-memory task store with per-column manual ordering.
pub struct TaskBoard {
    tasks: FxHashMap<TaskId, Task>,
    columns: [Vec<TaskId>; 3],
    clock: Box<dyn Clock>,
}

impl fmt::Debug for TaskBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBoard")
            .field("tasks", &self.tasks.len())
            .field("columns", &self.columns)
            .finish()
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBoard {
    /// Create an empty board stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty board with an explicit clock.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            tasks: FxHashMap::default(),
            columns: Default::default(),
            clock: Box::new(clock),
        }
    }

    /// Build a board from a flat task list. Column order follows input order.
    pub fn from_tasks(
        tasks: impl IntoIterator<Item = Task>,
        clock: impl Clock + 'static,
    ) -> Result<Self, BoardError> {
        let mut board = Self::with_clock(clock);
        for task in tasks {
            board.insert_untouched(task)?;
        }
        Ok(board)
    }

    /// Number of tasks in the store, including soft-deleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Add a task to the end of its column.
    pub fn insert(&mut self, mut task: Task) -> Result<(), BoardError> {
        task.touch(self.clock.today());
        self.insert_untouched(task)
    }

    fn insert_untouched(&mut self, task: Task) -> Result<(), BoardError> {
        if self.tasks.contains_key(&task.id) {
            return Err(BoardError::DuplicateTask(task.id));
        }
        if let Some(slot) = task.status.column_index() {
            self.columns[slot].push(task.id.clone());
        }
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Remove a task entirely, returning it.
    pub fn remove(&mut self, id: &TaskId) -> Result<Task, BoardError> {
        let task = self
            .tasks
            .remove(id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        for column in &mut self.columns {
            column.retain(|other| other != id);
        }
        Ok(task)
    }

    /// Mark a task `deleted`, taking it off the board but keeping the record.
    pub fn soft_delete(&mut self, id: &TaskId) -> Result<(), BoardError> {
        let today = self.clock.today();
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        task.status = TaskStatus::Deleted;
        task.touch(today);
        for column in &mut self.columns {
            column.retain(|other| other != id);
        }
        Ok(())
    }

    fn slot(status: TaskStatus) -> Result<usize, BoardError> {
        status.column_index().ok_or(BoardError::NotAColumn(status))
    }
}

impl BoardView for TaskBoard {
    fn column(&self, status: TaskStatus) -> &[TaskId] {
        match status.column_index() {
            Some(slot) => &self.columns[slot],
            None => &[],
        }
    }

    fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }
}

impl TaskStore for TaskBoard {
    fn apply_move(&mut self, mv: &Move) -> Result<AppliedMove, BoardError> {
        let task = self
            .tasks
            .get(&mv.task_id)
            .ok_or_else(|| BoardError::UnknownTask(mv.task_id.clone()))?;
        // The store trusts its own record of where the task lives.
        let from = task.status;
        let from_slot = from
            .column_index()
            .ok_or_else(|| BoardError::NotOnBoard(mv.task_id.clone(), from))?;
        let to_slot = Self::slot(mv.to_container_id)?;

        let mut target = self.columns[to_slot].clone();
        let index = placement::reorder(
            &mut target,
            &mv.task_id,
            mv.target_item_id.as_ref(),
            mv.position,
        );
        let source = (from_slot != to_slot).then(|| {
            let mut source = self.columns[from_slot].clone();
            source.retain(|id| id != &mv.task_id);
            source
        });

        // Commit.
        self.columns[to_slot] = target;
        if let Some(source) = source {
            self.columns[from_slot] = source;
        }
        let today = self.clock.today();
        if let Some(task) = self.tasks.get_mut(&mv.task_id) {
            task.status = mv.to_container_id;
            task.touch(today);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "taskboard::board",
            task = %mv.task_id,
            %from,
            to = %mv.to_container_id,
            index,
            "move applied"
        );

        Ok(AppliedMove {
            task_id: mv.task_id.clone(),
            from,
            to: mv.to_container_id,
            index,
        })
    }

    fn update_task_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<(), BoardError> {
        if status == TaskStatus::Deleted {
            return self.soft_delete(id);
        }
        let to_slot = Self::slot(status)?;
        let today = self.clock.today();
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        if task.status == status {
            return Ok(());
        }
        task.status = status;
        task.touch(today);
        for column in &mut self.columns {
            column.retain(|other| other != id);
        }
        self.columns[to_slot].push(id.clone());
        Ok(())
    }
}
