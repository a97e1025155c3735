//! Image-to-particle sampling.
//!
//! Converts a decoded RGBA image into a sparse point cloud: the image is
//! walked on a regular grid (not every pixel - the spacing bounds particle
//! count and gives the stylized look), and a particle is emitted for every
//! sampled pixel whose alpha clears the threshold. Pixel coordinates map
//! to normalized scene coordinates with the vertical axis flipped, since
//! image rows grow downward and scene Y grows upward.
//!
//! ## Determinism Guarantee
//!
//! The sampler draws jitter and size tiers from a caller-supplied RNG.
//! Same image + same config + same seed = same field, ALWAYS.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::error::{FieldError, FieldResult};

/// Positional jitter amplitude in scene units.
///
/// Each axis gets an independent uniform offset in [-JITTER/2, +JITTER/2]
/// so the grid never reads as mechanically regular.
pub const JITTER: f32 = 0.02;

/// Size-tier odds: 70% small, 20% medium, 10% large.
const TIER_SMALL_CUTOFF: f32 = 0.7;
const TIER_MEDIUM_CUTOFF: f32 = 0.9;

/// Size multipliers per tier.
const TIER_SCALES: [f32; 3] = [1.0, 1.25, 1.5];

/// Half-extent of the synthetic fallback grid, in scene units.
const FALLBACK_EXTENT: f32 = 5.0;
/// Grid step of the synthetic fallback grid.
const FALLBACK_STEP: f32 = 0.5;

/// A decoded image: row-major RGBA, 4 bytes per pixel.
///
/// Immutable once constructed. Owned by the sampler for the duration of a
/// conversion call; the caller may retain it to re-sample with different
/// parameters.
#[derive(Debug, Clone)]
pub struct ImagePixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImagePixelBuffer {
    /// Wraps decoded RGBA bytes, validating dimensions against length.
    ///
    /// # Errors
    ///
    /// `ZeroDimension` if either dimension is 0, `PixelBufferMismatch` if
    /// `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FieldResult<Self> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FieldError::PixelBufferMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Image width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha channel value at pixel (x, y).
    #[inline]
    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let index = (y as usize * self.width as usize + x as usize) * 4 + 3;
        self.data[index]
    }
}

/// Configuration for particle spawning from an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Grid step in source pixels between sampled positions (>= 1).
    pub spacing: u32,
    /// Uniform scale applied to normalized scene coordinates (> 0).
    pub scale: f32,
    /// Alpha values at or below this are treated as background.
    pub threshold: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            spacing: 6,
            scale: 3.0,
            threshold: 8,
        }
    }
}

impl SamplerConfig {
    /// Returns a copy with out-of-range values clamped to safe minimums.
    ///
    /// Malformed values are a caller contract violation; clamping keeps the
    /// visual alive instead of failing.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            spacing: self.spacing.max(1),
            scale: if self.scale > 0.0 { self.scale } else { 1.0 },
            threshold: self.threshold,
        }
    }
}

/// A single particle (position + per-particle size multiplier).
///
/// Doubles as the GPU instance record: 16 bytes, tightly packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in normalized scene coordinates.
    pub position: [f32; 3],
    /// Size multiplier applied on top of the base point size.
    pub size_scale: f32,
}

impl Particle {
    /// Size of a particle record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// An ordered set of particles, produced fresh on every re-sample.
///
/// Fully replaces the previous set on swap - no incremental mutation.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Number of particles in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if the set holds no particles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// The particle records, in sampling order.
    #[inline]
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Raw bytes of the particle records, ready for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

/// Samples an image into a particle set.
///
/// Pure transform: no side effects, re-invoked whenever the config changes
/// or a new image loads. The caller swaps the previous set atomically.
#[must_use]
pub fn sample<R: Rng>(
    image: &ImagePixelBuffer,
    config: &SamplerConfig,
    rng: &mut R,
) -> ParticleSet {
    let config = config.normalized();
    let width = image.width();
    let height = image.height();
    let aspect = width as f32 / height as f32;

    let columns = width.div_ceil(config.spacing) as usize;
    let rows = height.div_ceil(config.spacing) as usize;
    let mut particles = Vec::with_capacity(columns * rows);

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            if image.alpha_at(x, y) > config.threshold {
                let px = (x as f32 / width as f32 - 0.5) * 2.0 * aspect;
                let py = -(y as f32 / height as f32 - 0.5) * 2.0;
                let jitter_x = (rng.gen::<f32>() - 0.5) * JITTER;
                let jitter_y = (rng.gen::<f32>() - 0.5) * JITTER;
                particles.push(Particle {
                    position: [
                        px * config.scale + jitter_x,
                        py * config.scale + jitter_y,
                        0.0,
                    ],
                    size_scale: draw_size_tier(rng),
                });
            }
            x += config.spacing;
        }
        y += config.spacing;
    }

    ParticleSet { particles }
}

/// Deterministic synthetic grid used when image decode fails.
///
/// An evenly spaced square spanning -5..5 in both axes with randomized
/// sizes, so the visual is never empty - only the silhouette differs.
#[must_use]
pub fn fallback_grid<R: Rng>(rng: &mut R) -> ParticleSet {
    let steps = (2.0 * FALLBACK_EXTENT / FALLBACK_STEP) as u32 + 1;
    let mut particles = Vec::with_capacity(steps as usize * steps as usize);

    for iy in 0..steps {
        for ix in 0..steps {
            let x = -FALLBACK_EXTENT + ix as f32 * FALLBACK_STEP;
            let y = -FALLBACK_EXTENT + iy as f32 * FALLBACK_STEP;
            particles.push(Particle {
                position: [x, y, 0.0],
                size_scale: 0.05 + rng.gen::<f32>() * 0.3,
            });
        }
    }

    ParticleSet { particles }
}

/// Draws a discrete size tier: 70% -> 1.0, 20% -> 1.25, 10% -> 1.5.
fn draw_size_tier<R: Rng>(rng: &mut R) -> f32 {
    let r = rng.gen::<f32>();
    if r < TIER_SMALL_CUTOFF {
        TIER_SCALES[0]
    } else if r < TIER_MEDIUM_CUTOFF {
        TIER_SCALES[1]
    } else {
        TIER_SCALES[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Builds a test image where `alpha(x, y)` decides each pixel.
    fn image_with_alpha(width: u32, height: u32, alpha: impl Fn(u32, u32) -> u8) -> ImagePixelBuffer {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[255, 255, 255, alpha(x, y)]);
            }
        }
        ImagePixelBuffer::new(width, height, data).unwrap()
    }

    #[test]
    fn test_particle_size() {
        // Must be tightly packed for GPU instancing.
        assert_eq!(Particle::SIZE, 16);
        assert_eq!(Particle::SIZE % 4, 0);
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        let err = ImagePixelBuffer::new(4, 4, vec![0; 7]).unwrap_err();
        assert!(matches!(err, FieldError::PixelBufferMismatch { expected: 64, actual: 7, .. }));

        let err = ImagePixelBuffer::new(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, FieldError::ZeroDimension { .. }));
    }

    #[test]
    fn test_transparent_image_yields_empty_set() {
        let image = image_with_alpha(32, 32, |_, _| 8);
        let mut rng = StdRng::seed_from_u64(1);
        // Threshold is exclusive: alpha == threshold is still background.
        let set = sample(&image, &SamplerConfig::default(), &mut rng);
        assert!(set.is_empty());
    }

    #[test]
    fn test_count_bounded_by_grid() {
        let image = image_with_alpha(100, 60, |_, _| 255);
        let config = SamplerConfig { spacing: 7, ..SamplerConfig::default() };
        let mut rng = StdRng::seed_from_u64(2);
        let set = sample(&image, &config, &mut rng);
        // ceil(100/7) * ceil(60/7) = 15 * 9
        assert_eq!(set.len(), 15 * 9);
    }

    #[test]
    fn test_only_opaque_pixels_survive() {
        // Left half transparent, right half opaque.
        let image = image_with_alpha(64, 64, |x, _| if x < 32 { 0 } else { 200 });
        let config = SamplerConfig { spacing: 4, scale: 1.0, threshold: 8 };
        let mut rng = StdRng::seed_from_u64(3);
        let set = sample(&image, &config, &mut rng);

        assert!(!set.is_empty());
        for particle in set.particles() {
            // Opaque pixels live on the right half: x >= 32 maps to px >= 0,
            // minus at most the jitter amplitude.
            assert!(particle.position[0] >= -JITTER);
        }
    }

    #[test]
    fn test_coordinates_bounded_by_scale_and_aspect() {
        let image = image_with_alpha(200, 100, |_, _| 255);
        let config = SamplerConfig { spacing: 3, scale: 3.0, threshold: 8 };
        let aspect = 2.0;
        let mut rng = StdRng::seed_from_u64(4);
        let set = sample(&image, &config, &mut rng);

        let half = JITTER / 2.0;
        for particle in set.particles() {
            let [x, y, z] = particle.position;
            assert!(x.abs() <= aspect * config.scale + half);
            assert!(y.abs() <= config.scale + half);
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn test_vertical_flip() {
        // A single opaque row at the top of the image must land at
        // positive scene Y.
        let image = image_with_alpha(16, 16, |_, y| u8::from(y == 0) * 255);
        let config = SamplerConfig { spacing: 1, scale: 1.0, threshold: 8 };
        let mut rng = StdRng::seed_from_u64(5);
        let set = sample(&image, &config, &mut rng);

        assert_eq!(set.len(), 16);
        for particle in set.particles() {
            assert!(particle.position[1] > 0.9);
        }
    }

    #[test]
    fn test_size_tier_distribution() {
        let image = image_with_alpha(400, 400, |_, _| 255);
        let config = SamplerConfig { spacing: 2, ..SamplerConfig::default() };
        let mut rng = StdRng::seed_from_u64(6);
        let set = sample(&image, &config, &mut rng);

        let total = set.len() as f32;
        let small = set.particles().iter().filter(|p| p.size_scale == 1.0).count() as f32;
        let medium = set.particles().iter().filter(|p| p.size_scale == 1.25).count() as f32;
        let large = set.particles().iter().filter(|p| p.size_scale == 1.5).count() as f32;

        assert_eq!(small + medium + large, total);
        // 40,000 samples; 2% absolute tolerance is generous.
        assert!((small / total - 0.7).abs() < 0.02);
        assert!((medium / total - 0.2).abs() < 0.02);
        assert!((large / total - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_same_seed_same_field() {
        let image = image_with_alpha(64, 64, |x, y| ((x + y) % 256) as u8);
        let config = SamplerConfig::default();
        let a = sample(&image, &config, &mut StdRng::seed_from_u64(9));
        let b = sample(&image, &config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_config_normalization() {
        let config = SamplerConfig { spacing: 0, scale: -2.0, threshold: 8 }.normalized();
        assert_eq!(config.spacing, 1);
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_fallback_grid_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = fallback_grid(&mut rng);
        assert_eq!(set.len(), 21 * 21);
        for particle in set.particles() {
            assert!(particle.position[0] >= -5.0 && particle.position[0] <= 5.0);
            assert!(particle.size_scale >= 0.05 && particle.size_scale < 0.35);
        }
    }
}
