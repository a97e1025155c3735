//! GPU data layouts.
//!
//! The uniform block and the per-particle instance layout the pipeline
//! binds. Layouts are mirrored by the WGSL structs in [`crate::shaders`];
//! the tests below pin the byte layout so a drive-by field reorder cannot
//! silently desync the two.

use bytemuck::{Pod, Zeroable};

use phosphor_core::renderer::FrameParams;
use phosphor_core::sampler::Particle;

/// Per-frame uniform block (mirrors `FieldUniforms` in the WGSL).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FieldUniforms {
    /// Model matrix (pointer tilt).
    pub model: [[f32; 4]; 4],
    /// View matrix.
    pub view: [[f32; 4]; 4],
    /// Projection matrix.
    pub proj: [[f32; 4]; 4],
    /// Viewport resolution in device pixels.
    pub resolution: [f32; 2],
    /// Base point size as a fraction of viewport height.
    pub point_size: f32,
    /// Seconds since the instance started.
    pub time: f32,
    /// Smoothed explosion amount in [0, 1].
    pub explosion: f32,
    /// Scene-unit displacement at full explosion.
    pub explosion_strength: f32,
    /// Frequency of the curve field in the explosion directions.
    pub wave_frequency: f32,
    /// Amplitude of the idle ripple.
    pub wave_amplitude: f32,
}

impl FieldUniforms {
    /// Size of the uniform block in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Builds the uniform block for one frame.
    #[must_use]
    pub fn from_params(params: &FrameParams) -> Self {
        Self {
            model: params.model,
            view: params.view,
            proj: params.proj,
            resolution: params.resolution,
            point_size: params.point_size,
            time: params.time,
            explosion: params.explosion,
            explosion_strength: params.explosion_strength,
            wave_frequency: params.wave_frequency,
            wave_amplitude: params.wave_amplitude,
        }
    }
}

/// Vertex attributes of one particle instance.
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

/// Instance buffer layout for [`Particle`] records.
///
/// One instance per particle; the six quad vertices come from the
/// vertex index, not a buffer.
#[must_use]
pub fn particle_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: Particle::SIZE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_core::math::MAT4_IDENTITY;

    #[test]
    fn test_uniform_block_layout() {
        // 3 mat4 (192) + vec2 (8) + 6 f32 (24) = 224, and WGSL uniform
        // structs must be 16-byte aligned.
        assert_eq!(FieldUniforms::SIZE, 224);
        assert_eq!(FieldUniforms::SIZE % 16, 0);
    }

    #[test]
    fn test_instance_layout_matches_particle() {
        let layout = particle_instance_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes.len(), 2);
        // size_scale sits right after the position vec3.
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_from_params_copies_scalars() {
        let params = FrameParams {
            model: MAT4_IDENTITY,
            view: MAT4_IDENTITY,
            proj: MAT4_IDENTITY,
            resolution: [1600.0, 1200.0],
            point_size: 0.06,
            time: 2.5,
            explosion: 0.4,
            explosion_strength: 0.3,
            wave_frequency: 15.0,
            wave_amplitude: 0.08,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        };
        let uniforms = FieldUniforms::from_params(&params);
        assert_eq!(uniforms.resolution, [1600.0, 1200.0]);
        assert_eq!(uniforms.time, 2.5);
        assert_eq!(uniforms.explosion, 0.4);
    }
}
