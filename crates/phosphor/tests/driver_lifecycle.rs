//! # Driver Lifecycle Integration Tests
//!
//! Drives a full field instance with the fake ticker and a recording
//! renderer: deterministic synthetic time, no GPU, no window.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use phosphor::{
    init, AnimationDriver, FakeTicker, FieldConfig, FieldRenderer, FrameParams, ParticleSet, Vec2,
    ViewportConfig,
};

/// Shared state behind a [`RecordingRenderer`] and its clones.
#[derive(Default)]
struct RendererState {
    /// Particle counts, one per `set_particles` call.
    swaps: Mutex<Vec<usize>>,
    /// Resolutions, one per `resize` call.
    resolutions: Mutex<Vec<[f32; 2]>>,
    /// Uniform inputs, one per `push_frame` call.
    frames: Mutex<Vec<FrameParams>>,
    released: AtomicBool,
}

/// Renderer stub that records every call across the seam.
#[derive(Clone, Default)]
struct RecordingRenderer(Arc<RendererState>);

impl RecordingRenderer {
    fn swaps(&self) -> Vec<usize> {
        self.0.swaps.lock().unwrap().clone()
    }

    fn last_resolution(&self) -> Option<[f32; 2]> {
        self.0.resolutions.lock().unwrap().last().copied()
    }

    fn last_frame(&self) -> Option<FrameParams> {
        self.0.frames.lock().unwrap().last().copied()
    }

    fn released(&self) -> bool {
        self.0.released.load(Ordering::SeqCst)
    }
}

impl FieldRenderer for RecordingRenderer {
    fn set_particles(&mut self, set: &ParticleSet) {
        self.0.swaps.lock().unwrap().push(set.len());
    }

    fn resize(&mut self, viewport: &ViewportConfig) {
        self.0.resolutions.lock().unwrap().push(viewport.resolution());
    }

    fn push_frame(&mut self, params: &FrameParams) {
        self.0.frames.lock().unwrap().push(*params);
    }

    fn render(&mut self) {}

    fn release(&mut self) {
        self.0.released.store(true, Ordering::SeqCst);
    }
}

/// Fires the pending frame callback and ticks the driver at `now`.
fn pump(
    driver: &mut AnimationDriver<RecordingRenderer, FakeTicker>,
    ticker: &FakeTicker,
    now: Duration,
) {
    assert!(ticker.fire().is_some(), "driver had no pending frame callback");
    driver.tick(now);
}

/// Keeps pumping until `condition` holds, failing after 5 seconds of
/// wall-clock time (decode workers run on real threads).
fn pump_until(
    driver: &mut AnimationDriver<RecordingRenderer, FakeTicker>,
    ticker: &FakeTicker,
    mut condition: impl FnMut() -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut now = Duration::ZERO;
    while !condition() {
        assert!(Instant::now() < deadline, "condition never became true");
        now += Duration::from_millis(16);
        pump(driver, ticker, now);
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_destroy_right_after_init_leaves_nothing_pending() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );

    assert!(handle.is_active());
    assert_eq!(ticker.pending_count(), 1);

    handle.destroy();
    assert_eq!(ticker.pending_count(), 0, "dangling frame request after destroy");
    assert!(renderer.released());
}

#[test]
fn test_destroy_before_decode_resolves() {
    let config = FieldConfig {
        image_path: Some(PathBuf::from("no/such/logo.png")),
        ..FieldConfig::default()
    };
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();

    // Destroy immediately, before the decode worker can possibly finish.
    let handle = init(
        config,
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    handle.destroy();

    assert_eq!(ticker.pending_count(), 0);
    assert!(renderer.released());
}

#[test]
fn test_inert_handle_is_a_harmless_noop() {
    let ticker = FakeTicker::new();
    let handle = init::<RecordingRenderer, _>(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        None,
        ticker.clone(),
    );

    assert!(!handle.is_active());
    assert_eq!(ticker.pending_count(), 0);
    handle.destroy();
}

#[test]
fn test_fallback_grid_shown_immediately_and_kept_on_decode_failure() {
    let config = FieldConfig {
        image_path: Some(PathBuf::from("no/such/logo.png")),
        ..FieldConfig::default()
    };
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        config,
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    // The fallback grid is up before the decode resolves.
    assert_eq!(renderer.swaps(), vec![21 * 21]);

    // Pump frames until the failed decode lands; the swap is another
    // fallback grid, never an empty set.
    pump_until(driver, &ticker, || renderer.swaps().len() >= 2);
    assert_eq!(renderer.swaps()[1], 21 * 21);

    handle.destroy();
}

#[test]
fn test_decoded_logo_swaps_in_and_resamples() {
    // 18x18 fully opaque logo saved as a real PNG.
    let mut logo = image::RgbaImage::new(18, 18);
    for pixel in logo.pixels_mut() {
        *pixel = image::Rgba([255, 255, 255, 255]);
    }
    let path = std::env::temp_dir().join("phosphor_driver_test_logo.png");
    logo.save(&path).expect("write test png");

    let config = FieldConfig {
        image_path: Some(path.clone()),
        ..FieldConfig::default()
    };
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        config,
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    // Default spacing 6 over 18x18: ceil(18/6)^2 = 9 particles.
    pump_until(driver, &ticker, || renderer.swaps().len() >= 2);
    assert_eq!(renderer.swaps()[1], 9);

    // Re-sampling with tighter spacing uses the retained image.
    driver.apply_sampling(2, 1.0);
    assert_eq!(*renderer.swaps().last().unwrap(), 81);

    handle.destroy();
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_explosion_converges_on_max_signal() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    // Scroll at 0.2, pointer far from center (no hover), no manual.
    driver.pointer_moved(Vec2::new(0.9, 0.9));
    driver.set_scroll_progress(0.2);

    let mut now = Duration::ZERO;
    for _ in 0..300 {
        now += Duration::from_millis(16);
        pump(driver, &ticker, now);
    }
    assert!((driver.explosion() - 0.2).abs() < 1e-3);

    // Hover overrides scroll: pointer over the projected center drives
    // the target to 1 (max of signals, not a sum).
    driver.pointer_moved(Vec2::new(0.0, 0.0));
    for _ in 0..300 {
        now += Duration::from_millis(16);
        pump(driver, &ticker, now);
    }
    assert!((driver.explosion() - 1.0).abs() < 1e-3);
    assert!(driver.explosion() <= 1.0);

    handle.destroy();
}

#[test]
fn test_tilt_eases_toward_pointer_and_back() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    driver.pointer_moved(Vec2::new(1.0, 0.0));
    let mut now = Duration::ZERO;
    for _ in 0..300 {
        now += Duration::from_millis(16);
        pump(driver, &ticker, now);
    }
    let (tilt_x, tilt_y) = driver.tilt();
    assert_eq!(tilt_x, 0.0);
    assert!((tilt_y - 0.75).abs() < 1e-3, "tilt_y should reach max_tilt");

    driver.pointer_left();
    for _ in 0..300 {
        now += Duration::from_millis(16);
        pump(driver, &ticker, now);
    }
    let (_, tilt_y) = driver.tilt();
    assert!(tilt_y.abs() < 1e-3, "tilt should ease back to rest");

    handle.destroy();
}

#[test]
fn test_resize_updates_resolution_synchronously() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    // The pixel ratio cap applies only past 2.
    driver.resize(800, 600, 1.0);
    assert_eq!(renderer.last_resolution(), Some([800.0, 600.0]));
    driver.resize(800, 600, 2.0);
    assert_eq!(renderer.last_resolution(), Some([1600.0, 1200.0]));
    driver.resize(800, 600, 3.0);
    assert_eq!(renderer.last_resolution(), Some([1600.0, 1200.0]));

    // The next frame's uniforms already carry the new resolution.
    pump(driver, &ticker, Duration::from_millis(16));
    assert_eq!(renderer.last_frame().unwrap().resolution, [1600.0, 1200.0]);

    handle.destroy();
}

#[test]
fn test_rewound_clock_saturates() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    pump(driver, &ticker, Duration::from_secs(5));
    // A clock that runs backwards must not panic or produce negative time.
    pump(driver, &ticker, Duration::from_secs(1));
    let frame = renderer.last_frame().unwrap();
    assert_eq!(frame.time, 0.0);

    handle.destroy();
}

#[test]
fn test_loop_rearms_exactly_once_per_tick() {
    let renderer = RecordingRenderer::default();
    let ticker = FakeTicker::new();
    let mut handle = init(
        FieldConfig::default(),
        ViewportConfig::new(1280, 720, 1.0),
        Some(renderer.clone()),
        ticker.clone(),
    );
    let driver = handle.driver_mut().unwrap();

    for i in 1..=10u64 {
        assert_eq!(ticker.pending_count(), 1);
        pump(driver, &ticker, Duration::from_millis(16 * i));
    }
    assert_eq!(ticker.pending_count(), 1);

    handle.destroy();
    assert_eq!(ticker.pending_count(), 0);
}
