//! # PHOSPHOR Rendering
//!
//! The GPU half of the particle field: a wgpu point-sprite pipeline fed
//! across the `FieldRenderer` seam.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      GPU PIPELINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │ ParticleSet ──▶ Instance Buffer ──┐                         │
//! │ FrameParams ──▶ Uniform Block ────┼──▶ vs_main (ripple +    │
//! │                                   │     explosion, billboard│
//! │                                   │     quad per instance)  │
//! │                                   └──▶ fs_main (circular    │
//! │                                         discard) ──▶ Frame  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The displacement math exists twice on purpose: once in WGSL
//! ([`shaders`]), once as pure Rust ([`procedural`]). The Rust version is
//! the testable authority; any shading backend must match it.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod pipeline;
pub mod procedural;
pub mod shaders;
pub mod uniforms;

pub use pipeline::PointFieldRenderer;
pub use shaders::FieldShaders;
pub use uniforms::{particle_instance_layout, FieldUniforms};
