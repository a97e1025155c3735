//! The per-frame animation state machine.
//!
//! One instance = one driver struct; every piece of state lives here and
//! dies in `destroy`. The host owns the clock and the frame cadence: it
//! fires the callback the driver scheduled through its [`Ticker`], and the
//! driver re-arms exactly once per tick - which is also the entire
//! cancellation story.
//!
//! ```text
//! tick(now):
//!   1. delta / elapsed        (monotonic, saturating)
//!   2. poll pending decode    (swap particle set on resolve)
//!   3. tilt targets           <- pointer, clamped by distance-from-center
//!   4. explosion target       <- max(scroll, hover, manual)
//!   5. advance smoothing      (factor clamped at 1 - no overshoot)
//!   6. push uniforms + render
//!   7. re-arm the ticker
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use phosphor_core::camera::Camera;
use phosphor_core::config::FieldConfig;
use phosphor_core::interaction::InteractionState;
use phosphor_core::math::{self, Vec2, Vec3};
use phosphor_core::renderer::{FieldRenderer, FrameParams};
use phosphor_core::sampler::{self, ImagePixelBuffer};
use phosphor_core::smoothing::Smoothed;
use phosphor_core::ticker::{TickHandle, Ticker};
use phosphor_core::viewport::ViewportConfig;

use crate::loader::{self, PendingImage};

/// Seed for the driver-owned RNG ("PHOSPHOR" as bytes).
///
/// Jitter and size tiers only need to look organic, not vary between
/// runs; a fixed seed keeps two instances of the same logo identical.
const FIELD_SEED: u64 = 0x5048_4F53_5048_4F52;

/// Drives a particle field: interaction state, smoothing, and the
/// per-frame handoff to the rendering collaborator.
pub struct AnimationDriver<R: FieldRenderer, T: Ticker> {
    config: FieldConfig,
    viewport: ViewportConfig,
    camera: Camera,
    interaction: InteractionState,
    tilt_x: Smoothed,
    tilt_y: Smoothed,
    explosion: Smoothed,
    renderer: R,
    ticker: T,
    pending_tick: Option<TickHandle>,
    pending_image: Option<PendingImage>,
    retained_image: Option<ImagePixelBuffer>,
    rng: StdRng,
    started_at: Option<Duration>,
    last_tick: Option<Duration>,
}

impl<R: FieldRenderer, T: Ticker> AnimationDriver<R, T> {
    /// Creates a driver. Call [`start`](Self::start) to begin ticking.
    #[must_use]
    pub fn new(config: FieldConfig, viewport: ViewportConfig, renderer: R, ticker: T) -> Self {
        let config = config.normalized();
        Self {
            camera: Camera::new(viewport.aspect()),
            interaction: InteractionState::new(),
            tilt_x: Smoothed::new(0.0, config.tilt_speed),
            tilt_y: Smoothed::new(0.0, config.tilt_speed),
            explosion: Smoothed::new(0.0, config.explosion_speed),
            renderer,
            ticker,
            pending_tick: None,
            pending_image: None,
            retained_image: None,
            rng: StdRng::seed_from_u64(FIELD_SEED),
            started_at: None,
            last_tick: None,
            config,
            viewport,
        }
    }

    /// One-time setup: shows the fallback grid immediately, kicks off the
    /// logo decode, and schedules the first tick.
    ///
    /// The fallback-first order means the visual is never empty, however
    /// slow (or broken) the image source turns out to be.
    pub fn start(&mut self) {
        let fallback = sampler::fallback_grid(&mut self.rng);
        tracing::info!("Field started with {} fallback particles", fallback.len());
        self.renderer.set_particles(&fallback);
        self.renderer.resize(&self.viewport);

        if let Some(path) = self.config.image_path.clone() {
            self.pending_image = Some(loader::spawn_decode(path));
        }
        self.pending_tick = Some(self.ticker.schedule());
    }

    /// Advances one frame. `now` is host time since an arbitrary epoch;
    /// the first tick pins the epoch, and saturating arithmetic keeps both
    /// `delta` and `elapsed` monotonic even against a misbehaving clock.
    pub fn tick(&mut self, now: Duration) {
        // The host consumed the pending handle by firing this callback.
        self.pending_tick = None;

        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started_at);
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);
        let delta_secs = delta.as_secs_f32();

        self.poll_decode();

        let (target_x, target_y) = self.interaction.tilt_targets(self.config.max_tilt);
        self.tilt_x.set_target(target_x);
        self.tilt_y.set_target(target_y);
        self.tilt_x.advance(delta_secs);
        self.tilt_y.advance(delta_secs);

        let center = self.camera.project(Vec3::ZERO);
        self.explosion.set_target(self.interaction.explosion_target(
            self.config.triggers,
            center,
            self.config.hover_radius,
        ));
        self.explosion.advance(delta_secs);

        let params = FrameParams {
            model: math::multiply(
                math::rotation_x(self.tilt_x.value()),
                math::rotation_y(self.tilt_y.value()),
            ),
            view: self.camera.view(),
            proj: self.camera.projection(),
            resolution: self.viewport.resolution(),
            point_size: self.config.point_size,
            time: elapsed.as_secs_f32(),
            explosion: self.explosion.value(),
            explosion_strength: self.config.explosion_strength,
            wave_frequency: self.config.wave_frequency,
            wave_amplitude: self.config.wave_amplitude,
            clear_color: self.config.clear_color,
        };
        self.renderer.push_frame(&params);
        self.renderer.render();

        // The only place the loop re-arms.
        self.pending_tick = Some(self.ticker.schedule());
    }

    /// Applies a new viewport synchronously - inside the host's resize
    /// handler, so a resized-then-rendered frame is never misscaled.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.viewport = ViewportConfig::new(width, height, device_pixel_ratio);
        self.camera.set_aspect(self.viewport.aspect());
        self.renderer.resize(&self.viewport);
    }

    /// Records a pointer move in normalized device coordinates (+Y up).
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.interaction.pointer_moved(ndc);
    }

    /// Records the pointer leaving the viewport; tilt eases back to rest.
    pub fn pointer_left(&mut self) {
        self.interaction.pointer_left();
    }

    /// Records scroll progress in [0, 1].
    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.interaction.set_scroll_progress(progress);
    }

    /// Sets the manual explosion override in [0, 1].
    pub fn set_manual_explosion(&mut self, amount: f32) {
        self.interaction.set_manual_explosion(amount);
    }

    /// Changes the sampling parameters and re-samples the retained logo.
    ///
    /// Before the decode has resolved there is nothing to re-sample; the
    /// new parameters still apply to the decode when it lands.
    pub fn apply_sampling(&mut self, spacing: u32, scale: f32) {
        self.config.spacing = spacing.max(1);
        if scale > 0.0 {
            self.config.scale = scale;
        }
        if let Some(image) = &self.retained_image {
            let set = sampler::sample(image, &self.config.sampler(), &mut self.rng);
            tracing::debug!("Re-sampled logo into {} particles", set.len());
            self.renderer.set_particles(&set);
        }
    }

    /// Current smoothed explosion amount.
    #[must_use]
    pub fn explosion(&self) -> f32 {
        self.explosion.value()
    }

    /// Current smoothed tilt angles `(tilt_x, tilt_y)` in radians.
    #[must_use]
    pub fn tilt(&self) -> (f32, f32) {
        (self.tilt_x.value(), self.tilt_y.value())
    }

    /// Tears the instance down: cancels the pending frame callback, drops
    /// the in-flight decode, and releases the renderer.
    ///
    /// Safe to call before the decode resolves - the worker's send lands
    /// on a dropped channel and the thread exits.
    pub fn destroy(mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.ticker.cancel(handle);
        }
        self.pending_image = None;
        self.renderer.release();
        tracing::info!("Field instance destroyed");
    }

    /// Polls the in-flight decode; swaps the particle set when it lands.
    fn poll_decode(&mut self) {
        let Some(result) = self.pending_image.as_mut().and_then(PendingImage::poll) else {
            return;
        };
        self.pending_image = None;

        match result {
            Ok(image) => {
                let set = sampler::sample(&image, &self.config.sampler(), &mut self.rng);
                tracing::info!(
                    "Logo decoded ({}x{}) -> {} particles",
                    image.width(),
                    image.height(),
                    set.len()
                );
                self.retained_image = Some(image);
                self.renderer.set_particles(&set);
            }
            Err(error) => {
                // Recovered locally: the fallback grid stays up, only the
                // silhouette differs.
                tracing::warn!("Logo decode failed, keeping fallback grid: {error}");
                let fallback = sampler::fallback_grid(&mut self.rng);
                self.renderer.set_particles(&fallback);
            }
        }
    }
}
