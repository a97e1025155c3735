//! # PHOSPHOR Core
//!
//! The brain of the particle field: image sampling, smoothing, and
//! interaction state. No GPU, no windowing - those live behind the
//! [`renderer::FieldRenderer`] and [`ticker::Ticker`] seams.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DATA FLOW                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  RGBA image ──▶ sampler ──▶ ParticleSet ──▶ renderer (once)  │
//! │                                                              │
//! │  pointer/scroll ──▶ InteractionState ─┐                      │
//! │  time ────────────▶ Smoothed tilt/explosion ──▶ FrameParams  │
//! │                                            └──▶ renderer     │
//! │                                                 (every tick) │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ARCHITECT'S MANDATE
//!
//! - Sampling is pure and deterministic under a seeded RNG
//! - Smoothing never overshoots, whatever the frame delta
//! - One instance = one struct; no module-level state, ever

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod camera;
pub mod config;
pub mod error;
pub mod interaction;
pub mod math;
pub mod renderer;
pub mod sampler;
pub mod smoothing;
pub mod ticker;
pub mod viewport;

pub use camera::Camera;
pub use config::FieldConfig;
pub use error::{FieldError, FieldResult};
pub use interaction::{ExplosionTriggers, InteractionState};
pub use math::{Vec2, Vec3};
pub use renderer::{FieldRenderer, FrameParams};
pub use sampler::{fallback_grid, sample, ImagePixelBuffer, Particle, ParticleSet, SamplerConfig};
pub use smoothing::Smoothed;
pub use ticker::{FakeTicker, TickHandle, Ticker};
pub use viewport::{ViewportConfig, MAX_PIXEL_RATIO};
