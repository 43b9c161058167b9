use std::env;
use std::process;
use std::sync::Arc;
use std::thread;

use env_logger::{Builder, Env};
use log::{error, info, warn};

use servo_tracker::{StdoutTransport, Tracker, TrackerConfig, Transport};

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse --title and --font from the command line
    let mut title: Option<String> = None;
    let mut font_path: Option<String> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => title = args.next(),
            "--font" => font_path = args.next(),
            other => warn!("ignoring unknown argument '{other}'"),
        }
    }

    let config = TrackerConfig::builder()
        .maybe_title(title)
        .maybe_font_path(font_path)
        .build();

    let transport = Arc::new(StdoutTransport::new());

    // Ctrl-C during the blocking host wait is a clean shutdown request.
    {
        let transport = transport.clone();
        if let Err(err) = ctrlc::set_handler(move || transport.request_shutdown()) {
            warn!("could not install interrupt handler: {err}");
        }
    }

    // The host's blocking wait runs beside the UI loop so neither starves
    // the other; no state crosses this boundary except the transport.
    let spin_thread = {
        let transport = transport.clone();
        thread::spawn(move || transport.spin_until_shutdown())
    };

    let tracker = Tracker::new(config, transport.clone());
    info!("Servo Control Node Has Been Started!");

    let result = servo_tracker::window::run(tracker, transport.clone());

    transport.request_shutdown();
    let _ = spin_thread.join();

    if let Err(err) = result {
        error!("failed to start display: {err}");
        process::exit(1);
    }
    info!("servo tracker stopped");
}
