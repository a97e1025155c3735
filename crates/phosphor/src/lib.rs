//! # PHOSPHOR
//!
//! An interactive logo particle field: pixels sampled from a raster image
//! become point sprites that tilt with pointer movement and explode
//! outward on hover or scroll.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ logo.png ──decode──▶ sampler ──▶ ParticleSet ──▶ renderer    │
//! │                                                              │
//! │ pointer / scroll / resize ──▶ AnimationDriver ──▶ uniforms   │
//! │            ▲                        │                        │
//! │            └──── Ticker ◀─re-arm────┘     (every frame)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Embedding
//!
//! ```rust
//! use phosphor::{init, FakeTicker, FieldConfig, FieldRenderer, ViewportConfig};
//!
//! struct NullRenderer;
//!
//! impl FieldRenderer for NullRenderer {
//!     fn set_particles(&mut self, _: &phosphor::ParticleSet) {}
//!     fn resize(&mut self, _: &ViewportConfig) {}
//!     fn push_frame(&mut self, _: &phosphor::FrameParams) {}
//!     fn render(&mut self) {}
//!     fn release(&mut self) {}
//! }
//!
//! let handle = init(
//!     FieldConfig::default(),
//!     ViewportConfig::new(1280, 720, 1.0),
//!     Some(NullRenderer),
//!     FakeTicker::new(),
//! );
//! assert!(handle.is_active());
//! handle.destroy();
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod loader;

pub use driver::AnimationDriver;
pub use loader::{spawn_decode, PendingImage};

// The working vocabulary of an embedding, re-exported from the core.
pub use phosphor_core::{
    fallback_grid, sample, Camera, ExplosionTriggers, FakeTicker, FieldConfig, FieldError,
    FieldRenderer, FieldResult, FrameParams, ImagePixelBuffer, InteractionState, Particle,
    ParticleSet, SamplerConfig, Smoothed, TickHandle, Ticker, Vec2, Vec3, ViewportConfig,
};

#[cfg(feature = "rendering")]
pub use phosphor_rendering::PointFieldRenderer;

/// A running (or inert) field instance.
///
/// Returned by [`init`]; the only operation a host owes it is
/// [`destroy`](Self::destroy).
pub struct FieldHandle<R: FieldRenderer, T: Ticker> {
    driver: Option<AnimationDriver<R, T>>,
}

impl<R: FieldRenderer, T: Ticker> FieldHandle<R, T> {
    /// Whether this handle owns a live driver (false for the inert
    /// handle returned when no render target was available).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.driver.is_some()
    }

    /// Access to the driver for event forwarding (pointer, scroll,
    /// resize, tick). `None` on an inert handle.
    pub fn driver_mut(&mut self) -> Option<&mut AnimationDriver<R, T>> {
        self.driver.as_mut()
    }

    /// Tears the instance down. A harmless no-op on an inert handle.
    pub fn destroy(mut self) {
        if let Some(driver) = self.driver.take() {
            driver.destroy();
        }
    }
}

/// Creates and starts a field instance.
///
/// `renderer` is the mount target. When the host has none to offer (no
/// canvas, no surface), this logs and returns an inert handle instead of
/// failing - an embedding mistake must never break the page around it.
pub fn init<R: FieldRenderer, T: Ticker>(
    config: FieldConfig,
    viewport: ViewportConfig,
    renderer: Option<R>,
    ticker: T,
) -> FieldHandle<R, T> {
    let Some(renderer) = renderer else {
        tracing::warn!("No render target provided; returning inert field handle");
        return FieldHandle { driver: None };
    };

    let mut driver = AnimationDriver::new(config, viewport, renderer, ticker);
    driver.start();
    FieldHandle { driver: Some(driver) }
}
