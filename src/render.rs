//! Software rendering of the tracker scene.
//!
//! Each frame is a pure function of the tracker state plus the hover
//! position: the scene is rebuilt as a retained list of draw commands and
//! rasterized onto the RGBA frame with alpha-blended primitives.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::app::TrackerState;
use crate::config::{self, Color, Rect, TrackerConfig};
use crate::input::map_range;

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug)]
pub(crate) enum DrawCommand {
    Clear(Color),
    Disc {
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        thickness: f32,
        color: Color,
    },
    RectFill {
        rect: Rect,
        color: Color,
    },
    RectOutline {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Color,
    },
}

pub(crate) struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn render(&self, canvas: &mut Canvas, font: &Font) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => {
                    canvas.clear(*color);
                }
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    draw_disc(canvas, *cx, *cy, *radius, *color);
                }
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => {
                    draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *color);
                }
                DrawCommand::RectFill { rect, color } => {
                    draw_rect_fill(canvas, *rect, *color);
                }
                DrawCommand::RectOutline {
                    rect,
                    thickness,
                    color,
                } => {
                    draw_rect_outline(canvas, *rect, *thickness, *color);
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color, alpha: f32) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let a = alpha.clamp(0.0, 1.0);
            let src = [color.r as f32, color.g as f32, color.b as f32];
            let dst = [
                self.frame[idx] as f32,
                self.frame[idx + 1] as f32,
                self.frame[idx + 2] as f32,
            ];
            let out = [
                (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
                (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
                (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
                0xff,
            ];
            self.frame[idx..idx + 4].copy_from_slice(&out);
        }
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

/// Build the full tracker scene from current state. No state mutation
/// happens here or in any rasterizer below.
pub(crate) fn build_scene(
    state: &TrackerState,
    cursor: (f64, f64),
    config: &TrackerConfig,
) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config::BACKGROUND));

    let (cx, cy) = config.center();
    let radius = config.dial_radius();

    // Title
    scene.add_command(DrawCommand::Text {
        x: config.window_width as i32 / 2,
        y: 35,
        text: config.title.clone(),
        font_size: config.title_font_size,
        color: config::TEXT_COLOR,
    });

    // Dial ring and face
    scene.add_command(DrawCommand::Disc {
        cx: cx as i32,
        cy: cy as i32,
        radius: radius as i32,
        color: config::TRACKER_CIRCLE,
    });
    scene.add_command(DrawCommand::Disc {
        cx: cx as i32,
        cy: cy as i32,
        radius: radius as i32 - 2,
        color: config::TRACKER_BG,
    });

    // Guide lines at 0°, 90°, 180° with degree labels outside the ring
    for guide_angle in [0, 90, 180] {
        let rad = f64::from(guide_angle).to_radians();
        let end_x = cx + (radius - config.guide_line_inset) * rad.cos();
        let end_y = cy - (radius - config.guide_line_inset) * rad.sin();
        scene.add_command(DrawCommand::Line {
            x0: cx as i32,
            y0: cy as i32,
            x1: end_x as i32,
            y1: end_y as i32,
            thickness: 1.0,
            color: config::GUIDE_LINE_COLOR,
        });
        let label_x = cx + (radius + 25.0) * rad.cos();
        let label_y = cy - (radius + 25.0) * rad.sin();
        scene.add_command(DrawCommand::Text {
            x: label_x as i32,
            y: label_y as i32,
            text: format!("{guide_angle}°"),
            font_size: config.label_font_size,
            color: config::TEXT_COLOR,
        });
    }

    // Angle indicator line
    let rad = f64::from(state.angle).to_radians();
    let end_x = cx + (radius - config.angle_line_inset) * rad.cos();
    let end_y = cy - (radius - config.angle_line_inset) * rad.sin();
    scene.add_command(DrawCommand::Line {
        x0: cx as i32,
        y0: cy as i32,
        x1: end_x as i32,
        y1: end_y as i32,
        thickness: 3.0,
        color: config::ANGLE_LINE_COLOR,
    });

    // Draggable handle, recolored while a drag is active
    let handle_color = if state.is_dragging {
        config::HANDLE_ACTIVE
    } else {
        config::HANDLE_COLOR
    };
    let handle_x = cx + (radius - config.handle_inset) * rad.cos();
    let handle_y = cy - (radius - config.handle_inset) * rad.sin();
    scene.add_command(DrawCommand::Disc {
        cx: handle_x as i32,
        cy: handle_y as i32,
        radius: config.handle_radius,
        color: handle_color,
    });

    // Value readouts
    let height = config.window_height as f64;
    scene.add_command(DrawCommand::Text {
        x: 100,
        y: (height - 80.0) as i32,
        text: format!("Angle: {}°", state.angle),
        font_size: config.label_font_size,
        color: config::TEXT_COLOR,
    });
    scene.add_command(DrawCommand::Text {
        x: 100,
        y: (height - 50.0) as i32,
        text: format!("Speed: {}ms", state.speed_value),
        font_size: config.label_font_size,
        color: config::TEXT_COLOR,
    });

    // Center button, highlighted while hovered
    let button = config.button_rect();
    let button_fill = if button.contains(cursor.0, cursor.1) {
        config::BUTTON_HOVER
    } else {
        config::BUTTON_COLOR
    };
    scene.add_command(DrawCommand::RectFill {
        rect: button,
        color: button_fill,
    });
    scene.add_command(DrawCommand::RectOutline {
        rect: button,
        thickness: 2.0,
        color: config::TEXT_COLOR,
    });
    let (bx, by) = button.center();
    scene.add_command(DrawCommand::Text {
        x: bx as i32,
        y: by as i32,
        text: "CENTER".to_string(),
        font_size: config.label_font_size,
        color: config::TEXT_COLOR,
    });

    // Speed slider: track, handle positioned by the inverse value mapping,
    // and a compact value label past the track end
    let (track_start, track_end, track_y) = config.slider_track();
    scene.add_command(DrawCommand::Line {
        x0: track_start as i32,
        y0: track_y as i32,
        x1: track_end as i32,
        y1: track_y as i32,
        thickness: 3.0,
        color: config::SLIDER_COLOR,
    });
    let (min_speed, max_speed) = config.speed_range;
    let slider_handle_x = map_range(
        f64::from(state.speed_value),
        f64::from(min_speed),
        f64::from(max_speed),
        track_start,
        track_end,
    );
    scene.add_command(DrawCommand::Disc {
        cx: slider_handle_x as i32,
        cy: track_y as i32,
        radius: config.slider_handle_radius,
        color: config::SLIDER_HANDLE,
    });
    scene.add_command(DrawCommand::Text {
        x: (track_end + 50.0) as i32,
        y: track_y as i32,
        text: format!("{}ms", state.speed_value),
        font_size: config.label_font_size,
        color: config::TEXT_COLOR,
    });

    scene
}

/// Rasterize one frame of the tracker UI.
pub fn render_tracker(
    canvas: &mut Canvas,
    state: &TrackerState,
    cursor: (f64, f64),
    config: &TrackerConfig,
    font: &Font,
) {
    build_scene(state, cursor, config).render(canvas, font);
}

// ============================================================================
// RASTERIZER PRIMITIVES
// ============================================================================

fn draw_disc(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: Color) {
    for y in -radius..=radius {
        for x in -radius..=radius {
            let dist = f64::from(x * x + y * y).sqrt();
            let aa = if dist > f64::from(radius) {
                1.0 - (dist - f64::from(radius)).min(1.0)
            } else {
                1.0
            };
            if dist <= f64::from(radius) + 1.0 && aa > 0.0 {
                let px = cx + x;
                let py = cy + y;
                if px >= 0 && py >= 0 {
                    canvas.set_pixel(px as usize, py as usize, color, aa as f32);
                }
            }
        }
    }
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    color: Color,
) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = (x - x0) as f32;
            let py = (y - y0) as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 && x >= 0 && y >= 0 {
                canvas.set_pixel(x as usize, y as usize, color, aa);
            }
        }
    }
}

fn draw_rect_fill(canvas: &mut Canvas, rect: Rect, color: Color) {
    let x0 = rect.x.max(0.0) as usize;
    let y0 = rect.y.max(0.0) as usize;
    let x1 = (rect.x + rect.width).max(0.0) as usize;
    let y1 = (rect.y + rect.height).max(0.0) as usize;
    for y in y0..=y1 {
        for x in x0..=x1 {
            canvas.set_pixel(x, y, color, 1.0);
        }
    }
}

fn draw_rect_outline(canvas: &mut Canvas, rect: Rect, thickness: f32, color: Color) {
    let x0 = rect.x as i32;
    let y0 = rect.y as i32;
    let x1 = (rect.x + rect.width) as i32;
    let y1 = (rect.y + rect.height) as i32;
    draw_thick_line_aa(canvas, x0, y0, x1, y0, thickness, color);
    draw_thick_line_aa(canvas, x0, y1, x1, y1, thickness, color);
    draw_thick_line_aa(canvas, x0, y0, x0, y1, thickness, color);
    draw_thick_line_aa(canvas, x1, y0, x1, y1, thickness, color);
}

fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    // Bounding box of the whole string, so the text centers on (x, y)
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && py >= 0 {
                    canvas.set_pixel(px as usize, py as usize, color, v);
                }
            });
        }
    }
}
