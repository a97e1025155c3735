//! Pure reference implementation of the shader displacement math.
//!
//! Every formula here is duplicated verbatim in the WGSL
//! ([`crate::shaders`]); this module is the authority any shading backend
//! must reproduce. All functions are deterministic in their inputs.
//!
//! ## Determinism Guarantee
//!
//! Given the same position and parameters, these functions produce the
//! same displacement on any platform, any time. No RNG is involved - the
//! "random" directions are a hash of particle position.

use phosphor_core::math::Vec2;

/// Spatial frequency of the idle ripple (per scene unit).
pub const RIPPLE_FREQUENCY: f32 = 3.0;
/// Time rate of the idle ripple (radians per second).
pub const RIPPLE_RATE: f32 = 0.8;
/// Horizontal damping of the ripple offset.
pub const RIPPLE_X_DAMP: f32 = 0.4;
/// Constant downward bias added to the ripple's vertical offset.
pub const GRAVITY_BIAS: f32 = -0.04;

/// Fractional part, GLSL-style (`x - floor(x)`, always in [0, 1)).
#[inline]
#[must_use]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Canonical shader hash: `fract(sin(dot(p, (12.9898, 78.233))) * 43758.5453)`.
#[inline]
#[must_use]
#[allow(clippy::excessive_precision)]
pub fn hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(12.9898, 78.233))).sin() * 43758.5453)
}

/// Pseudo-random unit direction for a particle position.
///
/// Two hash draws (the second at `p + (1, 1)`) mapped from [0, 1] to
/// [-1, 1] and normalized.
#[must_use]
pub fn random_direction(p: Vec2) -> Vec2 {
    let raw = Vec2::new(
        hash(p) * 2.0 - 1.0,
        hash(p + Vec2::new(1.0, 1.0)) * 2.0 - 1.0,
    );
    raw.normalized()
}

/// Sinusoidal curve-field direction at a particle position.
///
/// `normalize((sin(x * freq) * cos(y), cos(x) * sin(y * freq)) + 0.001)` -
/// the epsilon keeps the zero crossings of the field normalizable.
#[must_use]
pub fn curve_direction(p: Vec2, frequency: f32) -> Vec2 {
    let raw = Vec2::new(
        (p.x * frequency).sin() * p.y.cos() + 0.001,
        p.x.cos() * (p.y * frequency).sin() + 0.001,
    );
    raw.normalized()
}

/// Explosion direction: hash direction and curve field, blended and
/// renormalized. Half structured, half chaotic.
#[must_use]
pub fn blended_direction(p: Vec2, frequency: f32) -> Vec2 {
    (random_direction(p) + curve_direction(p, frequency)).normalized()
}

/// Idle ripple offset at a particle position.
///
/// A radial wave `amplitude * sin(|p| * 3 - t * 0.8)` pushed along the
/// particle's angle from center, horizontally damped, with a constant
/// downward bias.
#[must_use]
pub fn ripple_offset(p: Vec2, time: f32, amplitude: f32) -> Vec2 {
    let dist = p.length();
    let ripple = amplitude * (dist * RIPPLE_FREQUENCY - time * RIPPLE_RATE).sin();
    let angle = p.y.atan2(p.x);
    Vec2::new(
        ripple * angle.cos() * RIPPLE_X_DAMP,
        ripple * angle.sin() + GRAVITY_BIAS,
    )
}

/// Full per-particle displacement: ripple plus explosion.
///
/// `explosion` is the smoothed scalar in [0, 1]; `strength` converts it to
/// scene units.
#[must_use]
pub fn displace(
    p: Vec2,
    time: f32,
    amplitude: f32,
    frequency: f32,
    explosion: f32,
    strength: f32,
) -> Vec2 {
    let rippled = p + ripple_offset(p, time, amplitude);
    rippled + blended_direction(p, frequency) * (explosion * strength)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQ: f32 = 15.0;

    #[test]
    fn test_hash_range_and_determinism() {
        for i in 0..100 {
            let p = Vec2::new(i as f32 * 0.37, i as f32 * -0.91);
            let h = hash(p);
            assert!((0.0..1.0).contains(&h), "hash out of range: {h}");
            assert_eq!(h, hash(p));
        }
    }

    #[test]
    fn test_directions_are_unit_length() {
        for i in 0..50 {
            let p = Vec2::new(i as f32 * 0.13 - 3.0, i as f32 * 0.29 - 7.0);
            assert!((random_direction(p).length() - 1.0).abs() < 1e-5);
            assert!((curve_direction(p, FREQ).length() - 1.0).abs() < 1e-5);
            assert!((blended_direction(p, FREQ).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ripple_at_center_is_pure_bias() {
        // dist = 0 at t = 0 => sin(0) = 0, only the gravity bias remains.
        let offset = ripple_offset(Vec2::ZERO, 0.0, 0.08);
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.y, GRAVITY_BIAS);
    }

    #[test]
    fn test_zero_amplitude_ripple() {
        let offset = ripple_offset(Vec2::new(1.5, -2.0), 3.7, 0.0);
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.y, GRAVITY_BIAS);
    }

    #[test]
    fn test_ripple_bounded_by_amplitude() {
        let amplitude = 0.08;
        for i in 0..100 {
            let p = Vec2::new(i as f32 * 0.11, (i as f32 * 0.07).sin() * 3.0);
            let offset = ripple_offset(p, i as f32 * 0.1, amplitude);
            assert!(offset.x.abs() <= amplitude * RIPPLE_X_DAMP + 1e-6);
            assert!((offset.y - GRAVITY_BIAS).abs() <= amplitude + 1e-6);
        }
    }

    #[test]
    fn test_displacement_scales_with_explosion() {
        let p = Vec2::new(0.8, -0.4);
        let calm = displace(p, 1.0, 0.08, FREQ, 0.0, 0.3);
        let exploded = displace(p, 1.0, 0.08, FREQ, 1.0, 0.3);
        // Full explosion moves the particle exactly `strength` units
        // further along the blended direction.
        assert!((exploded.distance(calm) - 0.3).abs() < 1e-5);
    }
}
