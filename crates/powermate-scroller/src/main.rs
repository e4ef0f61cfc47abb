//! PowerMate-Scroller entry point.
//!
//! Registers the virtual scroll device, then forwards dial events to it until
//! SIGINT/SIGTERM or a fatal error.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ install_signal_handlers()     -- SIGINT/SIGTERM set the shutdown flag
//!  └─ VirtualDevice::create()       -- register wheel + left button on uinput
//!  └─ ConnectionLoop::run()         -- open / read / translate / reconnect
//!       ├─ dial absent   -> wait 3 s, retry
//!       ├─ dial removed  -> close handle, wait 3 s, retry
//!       └─ shutdown flag -> return Ok
//!  └─ VirtualDevice::destroy()      -- UI_DEV_DESTROY, close /dev/uinput
//! ```
//!
//! If `run` fails, the `?` drops the device on the way out, which destroys it
//! just the same.
//!
//! Logging goes to stderr; set `RUST_LOG=debug` to see each open attempt.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use powermate_core::ScrollerConfig;
use powermate_scroller::application::connection::ConnectionLoop;
use powermate_scroller::infrastructure::{
    dial::linux::EvdevDialOpener,
    shutdown::{install_signal_handlers, shutdown_flag, InterruptiblePause},
    virtual_device::{linux::LinuxUinput, VirtualDevice},
};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("PowerMate-Scroller starting");

    let config = ScrollerConfig::default();
    config.validate().context("invalid built-in configuration")?;

    install_signal_handlers().context("failed to install signal handlers")?;

    // ── Virtual device ────────────────────────────────────────────────────────
    let control = LinuxUinput::open(&config.uinput_path)?;
    let mut device = VirtualDevice::create(control, &config.identity)
        .context("failed to register virtual scroll device")?;

    // ── Dial connection loop ──────────────────────────────────────────────────
    let shutdown = shutdown_flag();
    let opener = EvdevDialOpener::new(&config.dial_path);
    let pause = InterruptiblePause::new(shutdown);
    let mut connection = ConnectionLoop::new(&config, opener, pause, shutdown);

    connection
        .run(&mut device)
        .with_context(|| format!("dial {}", config.dial_path.display()))?;

    let stats = connection.translation_stats();
    info!(
        "shutting down ({} events forwarded, {} ignored, {} reconnects)",
        stats.emitted,
        stats.ignored,
        connection.stats().disconnects
    );

    device.destroy().context("failed to destroy virtual device")?;
    info!("PowerMate-Scroller stopped");
    Ok(())
}
