//! # PHOSPHOR Hero Demo
//!
//! Windowed host for the particle field:
//! - winit window + event loop (the Ticker is a redraw request)
//! - wgpu surface/device creation, handed to the point-sprite renderer
//! - pointer, scroll and resize events forwarded to the driver
//!
//! Controls:
//! - Move the pointer to tilt the field
//! - Hover the logo center (or scroll) to explode it
//! - ESC to exit
//!
//! Usage: `hero_demo [logo.png] [field.toml]`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use phosphor::{
    init, FieldConfig, FieldHandle, PointFieldRenderer, TickHandle, Ticker, Vec2, ViewportConfig,
};

/// Scroll progress accumulated per wheel line.
const SCROLL_STEP: f32 = 0.05;

/// Ticker backed by winit redraw requests.
///
/// winit cannot cancel a queued redraw, so `cancel` is a no-op; teardown
/// relies on the driver never ticking again, which the demo guarantees by
/// exiting the event loop right after `destroy`.
struct RedrawTicker {
    window: Arc<Window>,
    next_id: u64,
}

impl Ticker for RedrawTicker {
    fn schedule(&mut self) -> TickHandle {
        self.window.request_redraw();
        self.next_id += 1;
        TickHandle::new(self.next_id)
    }

    fn cancel(&mut self, _handle: TickHandle) {}
}

fn main() {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                 PHOSPHOR - HERO DEMO                          ║");
    println!("╠═══════════════════════════════════════════════════════════════╣");
    println!("║  Pointer     - Tilt the field                                 ║");
    println!("║  Hover logo  - Explode                                        ║");
    println!("║  Scroll      - Explode progressively                          ║");
    println!("║  ESC         - Exit                                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");

    // Config: optional TOML file, optional logo path override.
    let logo = std::env::args().nth(1).map(PathBuf::from);
    let config_path = std::env::args().nth(2).map(PathBuf::from);
    let mut config = match config_path {
        Some(path) => FieldConfig::load(&path).expect("readable field config"),
        None => FieldConfig::default(),
    };
    if logo.is_some() {
        config.image_path = logo;
    }
    if config.image_path.is_none() {
        config.image_path = Some(PathBuf::from("assets/logo.png"));
    }
    println!("[FIELD] Logo: {:?}", config.image_path);

    // Window
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let window = WindowBuilder::new()
        .with_title("PHOSPHOR - Hero Demo")
        .with_inner_size(PhysicalSize::new(1280, 720))
        .build(&event_loop)
        .expect("Failed to create window");
    let window = Arc::new(window);

    // GPU initialization
    println!("[GPU] Initializing...");
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    let surface = instance
        .create_surface(window.clone())
        .expect("Failed to create surface");
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .expect("No GPU adapter found");
    println!("[GPU] Using: {}", adapter.get_info().name);

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("PHOSPHOR"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        },
        None,
    ))
    .expect("Failed to create device");

    // Surface config: sRGB format, vsync, logical size times capped ratio.
    let scale_factor = window.scale_factor();
    let size = window.inner_size();
    let viewport = viewport_for(size, scale_factor);

    let caps = surface.get_capabilities(&adapter);
    let format = caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .copied()
        .unwrap_or(caps.formats[0]);
    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: viewport.physical_width(),
        height: viewport.physical_height(),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    let renderer = PointFieldRenderer::new(device, queue, surface, surface_config);
    let ticker = RedrawTicker { window: window.clone(), next_id: 0 };

    let mut field: Option<FieldHandle<PointFieldRenderer, RedrawTicker>> =
        Some(init(config, viewport, Some(renderer), ticker));

    let started = Instant::now();
    let mut scroll_progress = 0.0f32;

    let _ = event_loop.run(move |event, elwt| {
        // The driver re-arms its own redraws; nothing to poll between.
        elwt.set_control_flow(ControlFlow::Wait);

        let Event::WindowEvent { event, window_id } = event else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(handle) = field.take() {
                    handle.destroy();
                }
                elwt.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(handle) = field.take() {
                    handle.destroy();
                }
                elwt.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(driver) = field.as_mut().and_then(FieldHandle::driver_mut) {
                    let viewport = viewport_for(new_size, window.scale_factor());
                    driver.resize(viewport.width, viewport.height, viewport.pixel_ratio);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(driver) = field.as_mut().and_then(FieldHandle::driver_mut) {
                    let size = window.inner_size();
                    let ndc = Vec2::new(
                        (position.x / f64::from(size.width.max(1))) as f32 * 2.0 - 1.0,
                        -((position.y / f64::from(size.height.max(1))) as f32 * 2.0 - 1.0),
                    );
                    driver.pointer_moved(ndc);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if let Some(driver) = field.as_mut().and_then(FieldHandle::driver_mut) {
                    driver.pointer_left();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(driver) = field.as_mut().and_then(FieldHandle::driver_mut) {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => (pos.y / 40.0) as f32,
                    };
                    scroll_progress = (scroll_progress + lines * SCROLL_STEP).clamp(0.0, 1.0);
                    driver.set_scroll_progress(scroll_progress);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(driver) = field.as_mut().and_then(FieldHandle::driver_mut) {
                    driver.tick(started.elapsed());
                }
            }

            _ => {}
        }
    });
}

/// Builds the viewport from a physical window size: logical pixels plus
/// the (capped) scale factor.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> ViewportConfig {
    ViewportConfig::new(
        (f64::from(size.width) / scale_factor).round() as u32,
        (f64::from(size.height) / scale_factor).round() as u32,
        scale_factor as f32,
    )
}
