//! Siberled CLI — LED control for SteelSeries Siberia v2 headsets.
//!
//! Locates the headset on the USB bus, claims its LED interface and sends
//! up to two HID output reports (intensity, pulse mode). Exit codes:
//! 0 success, 1 runtime failure, 2 invalid argument.

use clap::Parser;

use siberled_lib::device::{Result, SiberiaDevice, UsbDevice};
use siberled_lib::led::{self, LedSettings};
use siberled_lib::protocol::PulseMode;

#[derive(Parser)]
#[command(
    name = "siberled",
    version,
    about = "LED control for SteelSeries Siberia v2 headsets"
)]
struct Args {
    /// LED intensity (0-255)
    #[arg(short, long, value_name = "LEVEL")]
    intensity: Option<u8>,

    /// LED pulsation mode: steady, slow, medium, fast or trigger
    #[arg(short, long, value_name = "MODE")]
    pulse: Option<PulseMode>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = LedSettings {
        intensity: args.intensity,
        pulse: args.pulse,
    };
    if settings.is_noop() {
        log::debug!("no LED options given, claiming and releasing the interface only");
    }

    let device = UsbDevice::open()?;
    println!("Found SteelSeries Siberia v2 headset ({})", device.info());

    led::apply_settings(&device, &settings)
}
