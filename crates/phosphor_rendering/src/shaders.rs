//! Point-Sprite Field Shaders
//!
//! One WGSL module with both entry points:
//! 1. `vs_main` - displaces each particle by the idle ripple plus the
//!    explosion offset, then billboards it as a two-triangle quad sized
//!    in device pixels (there is no point-size primitive in WGSL).
//! 2. `fs_main` - discards fragments outside a circular radius, producing
//!    round dots.
//!
//! The displacement math is the WGSL mirror of [`crate::procedural`];
//! change one, change both.
//!
//! Blend State Configuration (set in the pipeline):
//! ```text
//! color_blend:
//!   src_factor: SRC_ALPHA
//!   dst_factor: ONE_MINUS_SRC_ALPHA
//!   operation: ADD
//! ```
//! Normal alpha blending with depth writes off - these are flat tinted
//! dots over a clear color, not an additive glow pass.

/// Container for the field shader source.
pub struct FieldShaders;

impl FieldShaders {
    /// Returns the combined vertex + fragment WGSL source.
    #[must_use]
    pub fn source() -> &'static str {
        FIELD_WGSL
    }
}

/// Field render shader: instanced billboard quads with circular discard.
const FIELD_WGSL: &str = r#"
// Point-Sprite Field Shader
// One instance per particle; six vertices of quad come from vertex_index.

struct FieldUniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    resolution: vec2<f32>,      // device pixels
    point_size: f32,            // fraction of viewport height
    time: f32,                  // seconds since start
    explosion: f32,             // smoothed, 0-1
    explosion_strength: f32,    // scene units at full explosion
    wave_frequency: f32,        // curve field frequency
    wave_amplitude: f32,        // idle ripple amplitude
}

@group(0) @binding(0) var<uniform> field: FieldUniforms;

struct VertexInput {
    @builtin(vertex_index) vertex_idx: u32,
    @location(0) position: vec3<f32>,
    @location(1) size_scale: f32,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

// Quad corners (2 triangles)
const QUAD_POSITIONS: array<vec2<f32>, 6> = array<vec2<f32>, 6>(
    vec2<f32>(-0.5, -0.5),
    vec2<f32>(0.5, -0.5),
    vec2<f32>(0.5, 0.5),
    vec2<f32>(-0.5, -0.5),
    vec2<f32>(0.5, 0.5),
    vec2<f32>(-0.5, 0.5),
);

// Canonical shader hash - mirrored in procedural.rs
fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    // === Idle ripple: radial wave pushed along the particle's angle ===
    let dist = length(in.position.xy);
    let ripple = field.wave_amplitude * sin(dist * 3.0 - field.time * 0.8);
    let angle = atan2(in.position.y, in.position.x);
    let gravity_bias = -0.04;
    var pos = in.position + vec3<f32>(
        ripple * cos(angle) * 0.4,
        ripple * sin(angle) + gravity_bias,
        0.0,
    );

    // === Explosion: hash direction blended with a sinusoidal curve field ===
    var random_dir = vec2<f32>(
        hash(in.position.xy),
        hash(in.position.xy + 1.0),
    );
    random_dir = normalize(random_dir * 2.0 - 1.0);
    var curve_dir = vec2<f32>(
        sin(in.position.x * field.wave_frequency) * cos(in.position.y),
        cos(in.position.x) * sin(in.position.y * field.wave_frequency),
    );
    curve_dir = normalize(curve_dir + 0.001);
    let blended_dir = normalize(random_dir + curve_dir);
    pos += vec3<f32>(blended_dir * field.explosion * field.explosion_strength, 0.0);

    // === Project, then billboard in clip space ===
    let view_pos = field.view * field.model * vec4<f32>(pos, 1.0);
    var clip = field.proj * view_pos;

    // Point size in device pixels, shrinking with view depth.
    let size_px = field.point_size * in.size_scale * field.resolution.y
        / max(-view_pos.z, 0.001);

    let corner = QUAD_POSITIONS[in.vertex_idx % 6u];
    clip += vec4<f32>(corner * size_px / field.resolution * 2.0 * clip.w, 0.0, 0.0);

    out.position = clip;
    out.uv = corner + 0.5;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Round dots: discard outside the circular radius.
    let dist = distance(in.uv, vec2<f32>(0.5));
    if dist > 0.5 {
        discard;
    }
    return vec4<f32>(0.1, 0.2, 0.6, 1.0);
}
"#;
