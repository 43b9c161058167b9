//! Servo tracker: a dial-and-slider control panel that publishes a servo
//! target angle (0–180°) and a step delay value on two named output
//! channels of a host messaging transport.
//!
//! The UI is rendered with a small software rasterizer onto a pixels
//! framebuffer inside a winit window. All input resolution and the
//! publish-on-change state machine live behind plain types so they can be
//! tested without a window or a live transport.

pub mod app;
pub mod config;
pub mod input;
pub mod render;
pub mod transport;
pub mod window;

pub use app::{KeyAction, Publisher, Tracker, TrackerState, SERVO_SPEED_TOPIC, SERVO_TOPIC};
pub use config::{Color, Rect, TrackerConfig};
pub use transport::{ChannelId, StdoutTransport, Transport};
