#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! Mouse, touch, and pen input are reported through a single
//! [`PointerEvent`] tagged with its [`PointerModality`]. Downstream code
//! never branches on modality to decide *what* an event means; the tag is
//! carried only for diagnostics and per-modality thresholds.
//!
//! # Design Notes
//!
//! - Coordinates are viewport pixels (see [`crate::geometry`]).
//! - Touch contacts report [`PointerButton::Primary`].
//! - `pointer_id` 0 is reserved and never starts a gesture.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Canonical input event consumed by the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer lifecycle event.
    Pointer(PointerEvent),

    /// A host-level interruption (focus loss, orientation change, ...).
    Interrupt(CancelReason),
}

/// Which physical input produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerModality {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// The flag representing this button in a [`PointerButtons`] set.
    #[must_use]
    pub const fn flag(self) -> PointerButtons {
        match self {
            Self::Primary => PointerButtons::PRIMARY,
            Self::Secondary => PointerButtons::SECONDARY,
            Self::Middle => PointerButtons::MIDDLE,
        }
    }
}

bitflags! {
    /// Set of pointer buttons, used to configure which buttons may start a drag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 0b001;
        const SECONDARY = 0b010;
        const MIDDLE = 0b100;
    }
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed / finger touched down.
    Down,
    /// Pointer moved (with or without a pressed button).
    Move,
    /// Button released / finger lifted.
    Up,
    /// The platform aborted the pointer (e.g. `touchcancel`).
    Cancel,
}

/// A single pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub kind: PointerEventKind,
    pub modality: PointerModality,
    pub button: PointerButton,
    pub position: Point,
}

impl PointerEvent {
    /// Create a mouse event for the primary button (pointer id 1).
    #[must_use]
    pub const fn mouse(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            pointer_id: 1,
            kind,
            modality: PointerModality::Mouse,
            button: PointerButton::Primary,
            position: Point::new(x, y),
        }
    }

    /// Create a touch event for the given contact id.
    #[must_use]
    pub const fn touch(pointer_id: u32, kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            kind,
            modality: PointerModality::Touch,
            button: PointerButton::Primary,
            position: Point::new(x, y),
        }
    }

    /// Override the pointer id.
    #[must_use]
    pub const fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Override the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Override the modality.
    #[must_use]
    pub const fn with_modality(mut self, modality: PointerModality) -> Self {
        self.modality = modality;
        self
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Why an active drag was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The platform cancelled the pointer (`pointercancel` / `touchcancel`).
    PointerCancel,
    /// The window or surface lost focus.
    FocusLost,
    /// Device orientation or viewport layout changed.
    OrientationChanged,
    /// Another gesture claimed the input.
    CompetingGesture,
    /// The drag ended outside every container.
    ReleasedOutside,
    /// The session outlived the configured maximum lifetime.
    Expired,
    /// Cancelled by the host application.
    Programmatic,
}
