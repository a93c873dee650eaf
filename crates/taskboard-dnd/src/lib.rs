#![forbid(unsafe_code)]

//! Drag-and-drop interaction engine for Taskboard.
//!
//! # Role in Taskboard
//! `taskboard-dnd` decides what a drag means. It tracks the one in-progress
//! drag, maps pointer coordinates onto columns and insertion slots, scrolls
//! the board near its edges, and turns a finished drag into at most one
//! [`taskboard_core::Move`] written through the store.
//!
//! # Primary responsibilities
//! - **hit_test**: pure geometry from pointer position to insertion target.
//! - **autoscroll**: edge speed curve and the frame-driven scroll loop.
//! - **session**: the drag lifecycle machine.
//! - **placeholder**: render hints derived from session state.
//! - **resolver**: drop resolution and the single store write.
//! - **engine**: the host-facing facade wiring input to all of the above.
//!
//! # How it fits in the system
//! The host renders the board, snapshots card and column rectangles into a
//! [`BoardLayout`], and forwards pointer events to [`DragDropEngine`]. The
//! engine never touches the renderer or a timer directly: scroll frames go
//! through a host [`FrameDriver`] and writes go through
//! [`taskboard_core::TaskStore`].

pub mod autoscroll;
pub mod config;
pub mod engine;
pub mod placeholder;
pub mod resolver;
pub mod session;

pub use autoscroll::{
    AutoScrollConfig, AutoScroller, FrameDriver, FrameId, ScrollDelta, axis_speed,
    compute_scroll_delta,
};
pub use config::{ConfigError, EngineConfig};
pub use engine::{BoardLayout, DragDropEngine, EngineOutput, LayoutSnapshot};
pub use hit_test::{ContainerRect, InsertionTarget, ItemRect, find_insertion_target};
pub use placeholder::{BoardHints, PlaceholderHint};
pub use resolver::{DropOutcome, commit_drop, resolve_drop};
pub use session::{
    DragSession, DragSessionMachine, NoopReason, Placeholder, SessionEffect, SessionState,
    SessionTransition,
};
