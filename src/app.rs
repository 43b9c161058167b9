//! Tracker state and the input event state machine.
//!
//! Every accepted state change publishes the affected value immediately;
//! the renderer only ever reads [`TrackerState`].

use std::sync::Arc;

use log::info;

use crate::config::TrackerConfig;
use crate::input::{inside_circle, resolve_angle, resolve_slider};
use crate::transport::{ChannelId, Transport};

pub const SERVO_TOPIC: &str = "servo";
pub const SERVO_SPEED_TOPIC: &str = "servo_speed";

/// Keyboard shortcuts, decoupled from the windowing layer's key types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Center,
    SpeedUp,
    SpeedDown,
    AngleUp,
    AngleDown,
}

/// Mutable UI state, owned by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerState {
    /// Servo target in degrees, always within [0, 180].
    pub angle: i32,
    /// Step delay in the consumer's unit, always within the speed range.
    pub speed_value: i32,
    /// True only between a press inside the dial and the next release.
    pub is_dragging: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            angle: 90,
            speed_value: 20,
            is_dragging: false,
        }
    }
}

/// Channel glue: forwards angle/speed values to the host transport.
pub struct Publisher {
    transport: Arc<dyn Transport>,
    servo: ChannelId,
    servo_speed: ChannelId,
}

impl Publisher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let servo = transport.advertise(SERVO_TOPIC);
        let servo_speed = transport.advertise(SERVO_SPEED_TOPIC);
        Self {
            transport,
            servo,
            servo_speed,
        }
    }

    pub fn publish_angle(&self, angle: i32) {
        self.transport.publish(self.servo, angle);
        info!("Published angle: {angle}°");
    }

    pub fn publish_speed(&self, speed: i32) {
        self.transport.publish(self.servo_speed, speed);
        info!("Published speed: {speed}ms");
    }
}

/// The servo tracker: holds the state record and applies input events.
pub struct Tracker {
    config: TrackerConfig,
    state: TrackerState,
    publisher: Publisher,
}

impl Tracker {
    pub fn new(config: TrackerConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            state: TrackerState::default(),
            publisher: Publisher::new(transport),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Left button pressed at framebuffer position (x, y).
    ///
    /// The dial, the CENTER button and the slider band are checked
    /// independently; a press outside all three is ignored.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        let (cx, cy) = self.config.center();

        if inside_circle(x, y, cx, cy, self.config.dial_radius()) {
            self.state.is_dragging = true;
            self.set_angle_from_pointer(x, y);
        }

        if self.config.button_rect().contains(x, y) {
            self.center_servo();
        }

        let (band_top, band_bottom) = self.config.slider_band();
        if y >= band_top && y <= band_bottom {
            let (track_start, track_end, _) = self.config.slider_track();
            let (min_speed, max_speed) = self.config.speed_range;
            self.state.speed_value = resolve_slider(x, track_start, track_end, min_speed, max_speed);
            self.publisher.publish_speed(self.state.speed_value);
        }
    }

    /// Pointer moved; only meaningful while dragging the dial handle.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.state.is_dragging {
            self.set_angle_from_pointer(x, y);
        }
    }

    /// Left button released anywhere; never publishes.
    pub fn pointer_released(&mut self) {
        self.state.is_dragging = false;
    }

    pub fn key_pressed(&mut self, action: KeyAction) {
        let (min_speed, max_speed) = self.config.speed_range;
        match action {
            KeyAction::Center => self.center_servo(),
            KeyAction::SpeedUp => {
                self.state.speed_value =
                    (self.state.speed_value + self.config.speed_step).min(max_speed);
                self.publisher.publish_speed(self.state.speed_value);
            }
            KeyAction::SpeedDown => {
                self.state.speed_value =
                    (self.state.speed_value - self.config.speed_step).max(min_speed);
                self.publisher.publish_speed(self.state.speed_value);
            }
            KeyAction::AngleUp => {
                self.state.angle = (self.state.angle + self.config.angle_step).min(180);
                self.publisher.publish_angle(self.state.angle);
            }
            KeyAction::AngleDown => {
                self.state.angle = (self.state.angle - self.config.angle_step).max(0);
                self.publisher.publish_angle(self.state.angle);
            }
        }
    }

    /// Return the servo to its 90° center position.
    pub fn center_servo(&mut self) {
        self.state.angle = 90;
        self.publisher.publish_angle(self.state.angle);
        info!("Servo centered to 90°");
    }

    fn set_angle_from_pointer(&mut self, x: f64, y: f64) {
        let (cx, cy) = self.config.center();
        self.state.angle = resolve_angle(x, y, cx, cy);
        self.publisher.publish_angle(self.state.angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;

    fn tracker_with_recorder() -> (Tracker, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let tracker = Tracker::new(TrackerConfig::builder().build(), transport.clone());
        (tracker, transport)
    }

    #[test]
    fn defaults_match_startup_state() {
        let (tracker, transport) = tracker_with_recorder();
        assert_eq!(tracker.state().angle, 90);
        assert_eq!(tracker.state().speed_value, 20);
        assert!(!tracker.state().is_dragging);
        assert!(transport.messages().is_empty());
    }

    #[test]
    fn press_inside_dial_starts_drag_and_publishes_angle() {
        let (mut tracker, transport) = tracker_with_recorder();

        // Straight up from center, on the dial rim.
        tracker.pointer_pressed(300.0, 175.0);
        assert!(tracker.state().is_dragging);
        assert_eq!(tracker.state().angle, 90);
        assert_eq!(transport.published(SERVO_TOPIC), vec![90]);

        // Drag to the right edge of the dial.
        tracker.pointer_moved(425.0, 300.0);
        assert_eq!(tracker.state().angle, 0);
        assert_eq!(transport.published(SERVO_TOPIC), vec![90, 0]);

        // Release publishes nothing.
        tracker.pointer_released();
        assert!(!tracker.state().is_dragging);
        assert_eq!(transport.published(SERVO_TOPIC), vec![90, 0]);
    }

    #[test]
    fn motion_without_drag_publishes_nothing() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.pointer_moved(310.0, 250.0);
        tracker.pointer_moved(350.0, 220.0);
        assert!(transport.messages().is_empty());
        assert_eq!(tracker.state().angle, 90);
    }

    #[test]
    fn press_outside_every_region_is_ignored() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.pointer_pressed(10.0, 10.0);
        assert!(!tracker.state().is_dragging);
        assert!(transport.messages().is_empty());
    }

    #[test]
    fn drag_does_not_survive_release() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.pointer_pressed(300.0, 200.0);
        tracker.pointer_released();
        tracker.pointer_moved(425.0, 300.0);
        assert_eq!(transport.published(SERVO_TOPIC).len(), 1);
        assert_eq!(tracker.state().angle, 90);
    }

    #[test]
    fn slider_click_updates_and_publishes_speed() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.pointer_pressed(350.0, 570.0);
        assert_eq!(tracker.state().speed_value, 52);
        assert_eq!(transport.published(SERVO_SPEED_TOPIC), vec![52]);
        assert!(transport.published(SERVO_TOPIC).is_empty());
    }

    #[test]
    fn slider_band_accepts_clicks_while_dragging_the_dial() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.pointer_pressed(300.0, 200.0);
        assert!(tracker.state().is_dragging);
        tracker.pointer_pressed(500.0, 565.0);
        assert_eq!(tracker.state().speed_value, 100);
        assert_eq!(transport.published(SERVO_SPEED_TOPIC), vec![100]);
    }

    #[test]
    fn button_click_centers_the_servo() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.key_pressed(KeyAction::AngleDown);
        tracker.pointer_pressed(510.0, 520.0);
        assert_eq!(tracker.state().angle, 90);
        assert_eq!(transport.published(SERVO_TOPIC), vec![85, 90]);
    }

    #[test]
    fn center_key_publishes_exactly_one_90() {
        let (mut tracker, transport) = tracker_with_recorder();
        tracker.key_pressed(KeyAction::Center);
        assert_eq!(tracker.state().angle, 90);
        assert_eq!(transport.published(SERVO_TOPIC), vec![90]);
    }

    #[test]
    fn speed_steps_clamp_at_both_ends() {
        let (mut tracker, transport) = tracker_with_recorder();
        for _ in 0..20 {
            tracker.key_pressed(KeyAction::SpeedUp);
        }
        assert_eq!(tracker.state().speed_value, 100);
        tracker.key_pressed(KeyAction::SpeedUp);
        assert_eq!(tracker.state().speed_value, 100);

        for _ in 0..30 {
            tracker.key_pressed(KeyAction::SpeedDown);
        }
        assert_eq!(tracker.state().speed_value, 5);
        tracker.key_pressed(KeyAction::SpeedDown);
        assert_eq!(tracker.state().speed_value, 5);

        // Clamped steps still publish, like the original node.
        let published = transport.published(SERVO_SPEED_TOPIC);
        assert_eq!(published.len(), 52);
        assert_eq!(published.last(), Some(&5));
    }

    #[test]
    fn angle_steps_clamp_at_both_ends() {
        let (mut tracker, _transport) = tracker_with_recorder();
        for _ in 0..40 {
            tracker.key_pressed(KeyAction::AngleUp);
        }
        assert_eq!(tracker.state().angle, 180);

        for _ in 0..80 {
            tracker.key_pressed(KeyAction::AngleDown);
        }
        assert_eq!(tracker.state().angle, 0);
        tracker.key_pressed(KeyAction::AngleDown);
        assert_eq!(tracker.state().angle, 0);
    }
}
