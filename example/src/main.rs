//! Routes the input of a simulated keyboard and of hot-plugged joysticks to a
//! window, logging every event.
//!
//! Run with `RUST_LOG=info`, or `RUST_LOG=debug` to see the manager's own
//! tracing. An optional TOML configuration file can be passed as the first
//! argument.

use ::inroute::{
    config::Config,
    device::DeviceDescriptor,
    event::{Event, EventKind},
    input::keyboard::KeySample,
    listener::Filter,
    manager::{Builder, DeviceManager},
    window::{Accessor, HostWindow},
};
use ::std::rc::Rc;
use ::tracing::info;
use ::tracing_subscriber::{fmt, prelude::*, EnvFilter};

const KEY_A: u32 = 30;

pub fn main() {
    ::tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = match ::std::env::args().nth(1) {
        Some(path) => Config::load(path).expect("Failed to load configuration"),
        None => Config::default(),
    };
    let manager = Builder::from_config(&config)
        .build()
        .expect("Failed to create device manager");

    let main_window = HostWindow::new("main");
    let popup = HostWindow::new("popup");
    main_window.set_active(true);
    let main_target = Accessor::window(main_window.clone());
    let popup_target = Accessor::window(popup.clone());
    manager.add_target(&main_target);
    manager.add_target(&popup_target);

    manager
        .add_listener(Filter::All, Rc::new(log_event))
        .expect("Listener registered twice");

    // A key held while the focus moves to the popup is cancelled, its late
    // release is dropped.
    let keyboard = manager.add_device(DeviceDescriptor::new("Simulated keyboard").with_keys());
    manager.key_input(&main_target, keyboard, KEY_A, KeySample::Press);
    main_window.set_active(false);
    popup.set_active(true);
    manager.focus_changed(&popup_target, true);
    manager.key_input(&main_target, keyboard, KEY_A, KeySample::Release);

    run_hotplug(&manager, &config);
}

fn log_event(ev: &Event) {
    match &ev.kind {
        EventKind::DeviceMgmt { input, device } => {
            info!(?input, device = %device.name(), "Device management")
        }
        kind => info!(device = %ev.device, target = ?ev.accessor, ?kind, "Input"),
    }
}

#[cfg(target_os = "linux")]
fn run_hotplug(manager: &DeviceManager, config: &Config) {
    use ::inroute::hotplug::HotplugWatcher;
    use ::std::time::{Duration, Instant};

    const POLL_INTERVAL: Duration = Duration::from_millis(20);

    let mut watcher =
        HotplugWatcher::from_config(&config.hotplug).expect("Failed to watch device files");
    let found = watcher.enumerate(manager);
    info!(found, "Watching for joysticks, press Ctrl+C to quit");

    loop {
        let now = Instant::now();
        watcher.poll(manager, now);

        let wait = watcher
            .next_deadline()
            .map_or(POLL_INTERVAL, |at| at.saturating_duration_since(now))
            .min(POLL_INTERVAL);
        ::std::thread::sleep(wait);
    }
}

#[cfg(not(target_os = "linux"))]
fn run_hotplug(_manager: &DeviceManager, _config: &Config) {
    info!("Joystick hot-plug is only available on Linux");
}
