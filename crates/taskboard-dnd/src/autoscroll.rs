#![forbid(unsafe_code)]

//! Edge auto-scroll while a card is dragged near the viewport border.
//!
//! The speed curve is a pure function ([`compute_scroll_delta`]); the
//! repeating loop lives in [`AutoScroller`], which asks the host for
//! animation frames through a [`FrameDriver`] instead of owning a timer.
//!
//! # Speed curve
//!
//! Each axis has an edge zone of `edge_fraction * extent` on both sides.
//! Inside a zone:
//!
//! ```text
//! proximity = 1 - distance_to_edge / zone
//! speed     = min + proximity^power * (max - min)
//! ```
//!
//! so the zone boundary scrolls at `min` and the edge itself at `max`.
//! Outside the viewport the speed clamps to `max`. Left/up deltas are
//! negative. The axes are independent: a pointer in a corner scrolls both.
//!
//! # Invariants
//!
//! 1. At most one frame request is outstanding per scroller.
//! 2. [`AutoScroller::stop`] cancels the outstanding frame synchronously.
//!    A frame callback that still arrives afterwards carries a stale id and
//!    is ignored: it never yields a delta.
//! 3. Dropping a scroller stops it.
//!
//! # Failure Modes
//!
//! - A non-positive or non-finite viewport extent produces no scrolling
//!   on that axis.
//! - Non-finite pointer coordinates produce no scrolling on that axis.

use taskboard_core::geometry::{Point, Size};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for the edge speed curve. Speeds are pixels per frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AutoScrollConfig {
    /// Fraction of each viewport dimension treated as an edge zone (default: 0.3).
    pub edge_fraction: f32,
    /// Speed at the inner zone boundary (default: 50).
    pub min_speed: f32,
    /// Speed at the edge and beyond (default: 200).
    pub max_speed: f32,
    /// Curve exponent (default: 2).
    pub power: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            edge_fraction: 0.3,
            min_speed: 50.0,
            max_speed: 200.0,
            power: 2.0,
        }
    }
}

impl AutoScrollConfig {
    /// Human-readable problems with this config; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let fraction_ok = self.edge_fraction > 0.0 && self.edge_fraction <= 0.5;
        if !fraction_ok {
            errors.push(format!(
                "auto_scroll.edge_fraction must be in (0, 0.5], got {}",
                self.edge_fraction
            ));
        }
        let min_ok = self.min_speed.is_finite() && self.min_speed >= 0.0;
        if !min_ok {
            errors.push(format!(
                "auto_scroll.min_speed must be finite and >= 0, got {}",
                self.min_speed
            ));
        }
        let max_ok = self.max_speed.is_finite() && self.max_speed >= self.min_speed;
        if !max_ok {
            errors.push(format!(
                "auto_scroll.max_speed must be finite and >= min_speed ({}), got {}",
                self.min_speed, self.max_speed
            ));
        }
        let power_ok = self.power.is_finite() && self.power > 0.0;
        if !power_ok {
            errors.push(format!(
                "auto_scroll.power must be finite and > 0, got {}",
                self.power
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Pure speed curve
// ---------------------------------------------------------------------------

/// Per-frame scroll amount. Negative values scroll left/up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollDelta {
    pub dx: f32,
    pub dy: f32,
}

impl ScrollDelta {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Signed speed along one axis for a pointer at `coord` in `[0, extent)`.
#[must_use]
pub fn axis_speed(coord: f32, extent: f32, config: &AutoScrollConfig) -> f32 {
    if !extent.is_finite() || extent <= 0.0 || !coord.is_finite() {
        return 0.0;
    }
    if coord < 0.0 {
        return -config.max_speed;
    }
    if coord > extent {
        return config.max_speed;
    }

    let zone = extent * config.edge_fraction;
    if zone <= 0.0 {
        return 0.0;
    }
    let curve = |distance: f32| {
        let proximity = (1.0 - distance / zone).clamp(0.0, 1.0);
        config.min_speed + proximity.powf(config.power) * (config.max_speed - config.min_speed)
    };

    // Zone boundaries are inclusive.
    let from_start = coord;
    let from_end = extent - coord;
    if from_start <= zone && from_start <= from_end {
        -curve(from_start)
    } else if from_end <= zone {
        curve(from_end)
    } else {
        0.0
    }
}

/// Scroll delta for a pointer at `pointer` inside a `viewport`.
#[must_use]
pub fn compute_scroll_delta(
    pointer: Point,
    viewport: Size,
    config: &AutoScrollConfig,
) -> ScrollDelta {
    ScrollDelta {
        dx: axis_speed(pointer.x, viewport.width, config),
        dy: axis_speed(pointer.y, viewport.height, config),
    }
}

// ---------------------------------------------------------------------------
// Frame-driven loop
// ---------------------------------------------------------------------------

/// Handle for one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Host-side animation frame scheduler.
///
/// The host calls [`AutoScroller::on_frame`] (usually via the engine) with
/// the id it returned from `request_frame` when that frame fires.
pub trait FrameDriver {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Owned auto-scroll loop. Several can coexist; none share state.
#[derive(Debug)]
pub struct AutoScroller<D: FrameDriver> {
    config: AutoScrollConfig,
    driver: D,
    delta: ScrollDelta,
    pending: Option<FrameId>,
}

impl<D: FrameDriver> AutoScroller<D> {
    #[must_use]
    pub fn new(config: AutoScrollConfig, driver: D) -> Self {
        Self {
            config,
            driver,
            delta: ScrollDelta::ZERO,
            pending: None,
        }
    }

    /// Recompute the delta for a new pointer position.
    ///
    /// Starts the frame loop if the pointer is in an edge zone, stops it
    /// otherwise.
    pub fn update(&mut self, pointer: Point, viewport: Size) {
        let delta = compute_scroll_delta(pointer, viewport, &self.config);
        if delta.is_zero() {
            self.stop();
            return;
        }
        self.delta = delta;
        if self.pending.is_none() {
            self.pending = Some(self.driver.request_frame());
            tracing::trace!(target: "taskboard::dnd", dx = delta.dx, dy = delta.dy, "auto-scroll started");
        }
    }

    /// Cancel the loop. Idempotent.
    pub fn stop(&mut self) {
        self.delta = ScrollDelta::ZERO;
        if let Some(id) = self.pending.take() {
            self.driver.cancel_frame(id);
            tracing::trace!(target: "taskboard::dnd", frame = id.0, "auto-scroll stopped");
        }
    }

    /// A frame fired. Returns the delta to apply, or `None` if `id` is not
    /// the outstanding frame.
    pub fn on_frame(&mut self, id: FrameId) -> Option<ScrollDelta> {
        if self.pending != Some(id) {
            return None;
        }
        let delta = self.delta;
        self.pending = Some(self.driver.request_frame());
        tracing::trace!(target: "taskboard::dnd", frame = id.0, dx = delta.dx, dy = delta.dy, "auto-scroll tick");
        Some(delta)
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn delta(&self) -> ScrollDelta {
        self.delta
    }

    #[must_use]
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: FrameDriver> Drop for AutoScroller<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
