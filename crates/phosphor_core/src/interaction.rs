//! Interaction state: pointer, scroll and manual-override inputs.
//!
//! Event handlers write here fire-and-forget; the frame tick is the single
//! reader. Everything executes on one logical thread, so "most recent
//! event wins before the next tick reads it" is the whole ordering story.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Which signals may drive the explosion.
///
/// The observed variants of this effect differed only in which triggers
/// they wired up; that difference is configuration, not separate code.
/// The manual override is always honored - it is the debug/embedding knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionTriggers {
    /// Scroll progress drives the explosion.
    pub scroll: bool,
    /// Pointer hover near the field center drives the explosion.
    pub hover: bool,
}

impl Default for ExplosionTriggers {
    fn default() -> Self {
        Self { scroll: true, hover: true }
    }
}

/// Raw interaction inputs, mutated by event handlers and read each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionState {
    /// Pointer position in normalized device coordinates.
    ///
    /// Origin-centered; reset to the origin when the pointer leaves the
    /// viewport, which also zeroes the tilt targets.
    pointer: Vec2,
    /// Scroll progress through the host's scroll range, in [0, 1].
    scroll_progress: f32,
    /// Manual explosion override, in [0, 1].
    manual_explosion: f32,
}

impl InteractionState {
    /// Creates a centered, quiescent state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pointer position in NDC.
    #[inline]
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Records a pointer move (NDC, +Y up).
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    /// Records the pointer leaving the viewport.
    pub fn pointer_left(&mut self) {
        self.pointer = Vec2::ZERO;
    }

    /// Records scroll progress; clamped into [0, 1].
    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.scroll_progress = progress.clamp(0.0, 1.0);
    }

    /// Sets the manual explosion override; clamped into [0, 1].
    pub fn set_manual_explosion(&mut self, amount: f32) {
        self.manual_explosion = amount.clamp(0.0, 1.0);
    }

    /// Tilt targets `(tilt_x, tilt_y)` in radians for the current pointer.
    ///
    /// The tilt magnitude is the pointer's distance from center clamped to
    /// 1, times `max_tilt`. Pointer Y maps to a negative X tilt so the
    /// field leans toward the cursor.
    #[must_use]
    pub fn tilt_targets(&self, max_tilt: f32) -> (f32, f32) {
        let strength = self.pointer.length().min(1.0);
        (
            -self.pointer.y * strength * max_tilt,
            self.pointer.x * strength * max_tilt,
        )
    }

    /// Explosion target: the **max** of all enabled signals.
    ///
    /// Max rather than sum means any single active trigger fully drives
    /// the effect; triggers never stack additively. `projected_center` is
    /// the field center in NDC (hover fires when the pointer is within
    /// `hover_radius` of it, full strength, no falloff).
    #[must_use]
    pub fn explosion_target(
        &self,
        triggers: ExplosionTriggers,
        projected_center: Option<Vec2>,
        hover_radius: f32,
    ) -> f32 {
        let mut target = self.manual_explosion;
        if triggers.scroll {
            target = target.max(self.scroll_progress);
        }
        if triggers.hover {
            let hovering = projected_center
                .is_some_and(|center| self.pointer.distance(center) < hover_radius);
            if hovering {
                target = 1.0;
            }
        }
        target
    }
}
