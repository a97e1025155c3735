//! Clamped exponential smoothing.
//!
//! Every continuously animated scalar in the field (tilt angles, the
//! explosion amount) converges on its target with
//! `current += (target - current) * min(1, rate * delta)`.
//!
//! The clamp to 1 is the load-bearing part: after a dropped frame or a tab
//! switch `delta` can be huge, and an unclamped factor would overshoot the
//! target and oscillate. Clamped, the worst case is an instant snap.

/// A scalar that converges exponentially on a movable target.
#[derive(Debug, Clone, Copy)]
pub struct Smoothed {
    /// Current value.
    current: f32,
    /// Target value.
    target: f32,
    /// Convergence rate in 1/seconds.
    rate: f32,
}

impl Smoothed {
    /// Creates a smoothed value starting (and targeting) `value`.
    ///
    /// Non-positive rates are clamped to a tiny positive rate rather than
    /// rejected; a zero rate would freeze the value forever.
    #[must_use]
    pub fn new(value: f32, rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            rate: rate.max(f32::EPSILON),
        }
    }

    /// Returns the current value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Returns the target value.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Sets a new target; the current value keeps converging from where it is.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Immediately sets current and target without animation.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Advances the value by `delta` seconds.
    ///
    /// The interpolation factor is `min(1, rate * delta)`, so the updated
    /// value always lies between the old value and the target inclusive -
    /// never past it.
    pub fn advance(&mut self, delta: f32) {
        let factor = (self.rate * delta.max(0.0)).min(1.0);
        self.current += (self.target - self.current) * factor;
    }
}
