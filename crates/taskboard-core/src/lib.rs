#![forbid(unsafe_code)]

//! Core: task model, board store, geometry, and pointer input normalization.
//!
//! # Role in Taskboard
//! `taskboard-core` is the data and input layer. It owns the task records and
//! their per-column ordering, the pixel geometry shared with the renderer,
//! and the normalized pointer events that mouse, touch, and pen input all
//! collapse into.
//!
//! # Primary responsibilities
//! - **Task / TaskStatus**: the task record and the status columns it lives in.
//! - **TaskBoard**: reference in-memory store that applies [`placement::Move`]
//!   commands atomically.
//! - **PointerEvent**: one event type for every pointer modality.
//! - **GestureRecognizer**: turns raw pointer sequences into drag gestures.
//! - **MoveCoalescer**: latest-wins buffering of high-frequency moves.
//!
//! # How it fits in the system
//! The drag-and-drop engine (`taskboard-dnd`) consumes [`gesture::DragGesture`]
//! values and renderer geometry, and writes through the [`board::TaskStore`]
//! trait. Nothing in this crate knows about drag sessions.

pub mod board;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod move_coalescer;
pub mod placement;
pub mod task;

pub use board::{AppliedMove, BoardError, BoardView, TaskBoard, TaskStore};
pub use event::{CancelReason, InputEvent, PointerEvent, PointerEventKind, PointerModality};
pub use geometry::{Point, Rect, Size};
pub use gesture::{DragGesture, GestureConfig, GestureRecognizer};
pub use placement::{DropPosition, Move};
pub use task::{Clock, FixedClock, SystemClock, Task, TaskId, TaskPriority, TaskStatus};
