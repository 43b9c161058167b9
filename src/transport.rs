//! Host messaging runtime, modeled as an injected collaborator so the
//! input-resolution and state-machine logic stays testable without a live
//! transport.

use std::io::Write;
use std::sync::{Condvar, Mutex};

/// Handle to an advertised output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId(usize);

/// One-way integer output to an external consumer.
///
/// Publishes are fire-and-forget: delivery failure is the transport's
/// problem and is never surfaced to the caller.
pub trait Transport: Send + Sync {
    /// Create a named output channel and return its handle.
    fn advertise(&self, topic: &str) -> ChannelId;

    /// Emit a single integer on a previously advertised channel.
    fn publish(&self, channel: ChannelId, value: i32);

    /// True once shutdown has been requested by any party.
    fn is_shutdown_requested(&self) -> bool;

    /// Ask every loop attached to this transport to wind down.
    fn request_shutdown(&self);

    /// Block the calling thread until shutdown is requested.
    fn spin_until_shutdown(&self);
}

/// Production transport: one `<topic> <value>` line per publish on stdout,
/// for a downstream driver process to consume over a pipe.
pub struct StdoutTransport {
    topics: Mutex<Vec<String>>,
    shutdown: Mutex<bool>,
    shutdown_signal: Condvar,
}

impl StdoutTransport {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(Vec::new()),
            shutdown: Mutex::new(false),
            shutdown_signal: Condvar::new(),
        }
    }

    fn topic_name(&self, channel: ChannelId) -> Option<String> {
        self.topics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(channel.0)
            .cloned()
    }
}

impl Default for StdoutTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for StdoutTransport {
    fn advertise(&self, topic: &str) -> ChannelId {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.push(topic.to_string());
        ChannelId(topics.len() - 1)
    }

    fn publish(&self, channel: ChannelId, value: i32) {
        let Some(topic) = self.topic_name(channel) else {
            log::warn!("publish on unadvertised channel {channel:?} dropped");
            return;
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = writeln!(out, "{topic} {value}").and_then(|_| out.flush()) {
            // Fire and forget: the consumer end of the pipe owns delivery.
            log::debug!("publish on '{topic}' not delivered: {err}");
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request_shutdown(&self) {
        let mut flag = self.shutdown.lock().unwrap_or_else(|e| e.into_inner());
        *flag = true;
        self.shutdown_signal.notify_all();
    }

    fn spin_until_shutdown(&self) {
        let mut flag = self.shutdown.lock().unwrap_or_else(|e| e.into_inner());
        while !*flag {
            flag = self
                .shutdown_signal
                .wait(flag)
                .unwrap_or_else(|e| e.into_inner());
        }
    }
}

/// In-memory transport that records every publish, used by state-machine
/// tests in place of the host runtime.
#[cfg(test)]
pub(crate) struct RecordingTransport {
    topics: Mutex<Vec<String>>,
    messages: Mutex<Vec<(String, i32)>>,
}

#[cfg(test)]
impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            topics: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// All messages in emission order.
    pub(crate) fn messages(&self) -> Vec<(String, i32)> {
        self.messages.lock().unwrap().clone()
    }

    /// Payloads published on one topic, in emission order.
    pub(crate) fn published(&self, topic: &str) -> Vec<i32> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, v)| *v)
            .collect()
    }
}

#[cfg(test)]
impl Transport for RecordingTransport {
    fn advertise(&self, topic: &str) -> ChannelId {
        let mut topics = self.topics.lock().unwrap();
        topics.push(topic.to_string());
        ChannelId(topics.len() - 1)
    }

    fn publish(&self, channel: ChannelId, value: i32) {
        let topic = self.topics.lock().unwrap()[channel.0].clone();
        self.messages.lock().unwrap().push((topic, value));
    }

    fn is_shutdown_requested(&self) -> bool {
        false
    }

    fn request_shutdown(&self) {}

    fn spin_until_shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn advertise_hands_out_distinct_channels() {
        let transport = StdoutTransport::new();
        let servo = transport.advertise("servo");
        let speed = transport.advertise("servo_speed");
        assert_ne!(servo, speed);
        assert_eq!(transport.topic_name(servo).as_deref(), Some("servo"));
        assert_eq!(transport.topic_name(speed).as_deref(), Some("servo_speed"));
    }

    #[test]
    fn shutdown_request_wakes_a_spinning_thread() {
        let transport = Arc::new(StdoutTransport::new());
        assert!(!transport.is_shutdown_requested());

        let spinner = {
            let transport = transport.clone();
            std::thread::spawn(move || transport.spin_until_shutdown())
        };
        std::thread::sleep(Duration::from_millis(20));
        transport.request_shutdown();

        spinner.join().expect("spin thread panicked");
        assert!(transport.is_shutdown_requested());
    }

    #[test]
    fn recording_transport_keeps_emission_order() {
        let transport = RecordingTransport::new();
        let a = transport.advertise("servo");
        let b = transport.advertise("servo_speed");
        transport.publish(a, 90);
        transport.publish(b, 20);
        transport.publish(a, 0);
        assert_eq!(
            transport.messages(),
            vec![
                ("servo".to_string(), 90),
                ("servo_speed".to_string(), 20),
                ("servo".to_string(), 0),
            ]
        );
        assert_eq!(transport.published("servo"), vec![90, 0]);
    }
}
