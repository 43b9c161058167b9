//! Window, event loop, and frame pacing.

use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::app::{KeyAction, Tracker};
use crate::render::{render_tracker, Canvas};
use crate::transport::Transport;

/// System locations tried when no `--font` path is given.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_font_bytes(explicit_path: Option<&str>) -> Result<Vec<u8>, Box<dyn Error>> {
    if let Some(path) = explicit_path {
        return std::fs::read(path)
            .map_err(|err| format!("cannot read font '{path}': {err}").into());
    }
    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(candidate) {
            return Ok(bytes);
        }
    }
    Err("no usable font found; pass one with --font <path>".into())
}

fn map_key(key: &Key) -> Option<KeyAction> {
    match key.as_ref() {
        Key::Character("c") | Key::Character("C") => Some(KeyAction::Center),
        Key::Named(NamedKey::ArrowUp) => Some(KeyAction::SpeedUp),
        Key::Named(NamedKey::ArrowDown) => Some(KeyAction::SpeedDown),
        Key::Named(NamedKey::ArrowRight) => Some(KeyAction::AngleUp),
        Key::Named(NamedKey::ArrowLeft) => Some(KeyAction::AngleDown),
        _ => None,
    }
}

/// Run the tracker UI until the window closes or the transport reports
/// shutdown. Failure to acquire the display surface or a font aborts here;
/// everything past startup is non-fatal.
pub fn run(mut tracker: Tracker, transport: Arc<dyn Transport>) -> Result<(), Box<dyn Error>> {
    let config = tracker.config().clone();
    let buffer_width = config.window_width as u32;
    let buffer_height = config.window_height as u32;

    let font_bytes = load_font_bytes(config.font_path.as_deref())?;
    let font = Font::try_from_vec(font_bytes).ok_or("font file is not a usable TTF/OTF")?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)?;
    let window = Arc::new(window);
    let window_clone = window.clone();

    // Fixed-size logical framebuffer; pixels scales it to the surface.
    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(buffer_width, buffer_height, surface_texture)?;

    let frame_duration = std::time::Duration::from_secs_f64(1.0 / config.max_framerate);
    let mut last_frame = Instant::now();
    let mut cursor = (0.0f64, 0.0f64);

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("window closed, shutting down");
                    transport.request_shutdown();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    let _ = pixels.resize_surface(new_size.width, new_size.height);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let pos: (f32, f32) = position.into();
                    let (px, py) = pixels
                        .window_pos_to_pixel(pos)
                        .unwrap_or_else(|p| pixels.clamp_pixel_pos(p));
                    cursor = (px as f64, py as f64);
                    tracker.pointer_moved(cursor.0, cursor.1);
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => tracker.pointer_pressed(cursor.0, cursor.1),
                    ElementState::Released => tracker.pointer_released(),
                },
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed {
                        if let Some(action) = map_key(&event.logical_key) {
                            tracker.key_pressed(action);
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let mut canvas = Canvas::new(
                        pixels.frame_mut(),
                        config.window_width,
                        config.window_height,
                    );
                    render_tracker(&mut canvas, tracker.state(), cursor, &config, &font);
                    if let Err(err) = pixels.render() {
                        error!("surface render failed: {err}");
                        transport.request_shutdown();
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if transport.is_shutdown_requested() {
                    window_target.exit();
                    return;
                }
                // Sleep out the rest of the frame budget, then redraw.
                let elapsed = last_frame.elapsed();
                if elapsed < frame_duration {
                    std::thread::sleep(frame_duration - elapsed);
                }
                last_frame = Instant::now();
                window_clone.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
