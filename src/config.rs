// ============================================================================
// COLORS & GEOMETRY TYPES
// ============================================================================

use bon::Builder;

/// Color representation for UI elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in framebuffer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ============================================================================
// PALETTE
// ============================================================================

pub const BACKGROUND: Color = Color::new(30, 30, 40);
pub const TRACKER_BG: Color = Color::new(50, 50, 60);
pub const TRACKER_CIRCLE: Color = Color::new(70, 70, 80);
pub const HANDLE_COLOR: Color = Color::new(65, 105, 225);
pub const HANDLE_ACTIVE: Color = Color::new(220, 60, 60);
pub const TEXT_COLOR: Color = Color::new(240, 240, 240);
pub const BUTTON_COLOR: Color = Color::new(80, 80, 100);
pub const BUTTON_HOVER: Color = Color::new(100, 100, 120);
pub const SLIDER_COLOR: Color = Color::new(90, 90, 110);
pub const SLIDER_HANDLE: Color = Color::new(70, 130, 180);
pub const GUIDE_LINE_COLOR: Color = Color::new(100, 100, 120);
pub const ANGLE_LINE_COLOR: Color = Color::new(255, 200, 50);

// ============================================================================
// TRACKER CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct TrackerConfig {
    #[builder(default = "Servo Angle Tracker".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 600)]
    pub window_width: usize,
    #[builder(default = 600)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Dial configuration
    #[builder(default = 250)]
    pub tracker_size: i32,
    #[builder(default = 10.0)]
    pub guide_line_inset: f64,
    #[builder(default = 20.0)]
    pub angle_line_inset: f64,
    #[builder(default = 30.0)]
    pub handle_inset: f64,
    #[builder(default = 12)]
    pub handle_radius: i32,

    // Slider configuration
    #[builder(default = 200.0)]
    pub slider_x: f64,
    #[builder(default = 300.0)]
    pub slider_width: f64,
    #[builder(default = 10)]
    pub slider_handle_radius: i32,
    #[builder(default = (5, 100))]
    pub speed_range: (i32, i32),

    // Angle / speed keyboard steps
    #[builder(default = 5)]
    pub angle_step: i32,
    #[builder(default = 5)]
    pub speed_step: i32,

    // Text configuration
    #[builder(default = 20.0)]
    pub label_font_size: f32,
    #[builder(default = 28.0)]
    pub title_font_size: f32,
    pub font_path: Option<String>,
}

impl TrackerConfig {
    /// Dial origin, fixed for process lifetime.
    pub fn center(&self) -> (f64, f64) {
        (
            self.window_width as f64 / 2.0,
            self.window_height as f64 / 2.0,
        )
    }

    pub fn dial_radius(&self) -> f64 {
        self.tracker_size as f64 / 2.0
    }

    /// Slider track endpoints and vertical position.
    pub fn slider_track(&self) -> (f64, f64, f64) {
        let y = self.window_height as f64 - 30.0;
        (self.slider_x, self.slider_x + self.slider_width, y)
    }

    /// Vertical band that accepts slider clicks.
    pub fn slider_band(&self) -> (f64, f64) {
        let h = self.window_height as f64;
        (h - 40.0, h - 20.0)
    }

    pub fn button_rect(&self) -> Rect {
        Rect::new(
            self.window_width as f64 - 150.0,
            self.window_height as f64 - 100.0,
            120.0,
            40.0,
        )
    }
}
