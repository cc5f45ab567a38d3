//! Wire protocol for the Siberia v2 LED controller.
//!
//! All values decoded from USB captures of the vendor's configuration tool.
//! The headset exposes its LED controls on HID interface 3 and accepts
//! 37-byte output reports via the class-standard SET_REPORT request; only
//! bytes 4 and 5 of a report vary (command and value).

use std::fmt;
use std::str::FromStr;

// ── USB identifiers ──

/// SteelSeries vendor ID.
pub const VENDOR_ID: u16 = 0x1038;

/// Siberia v2 USB headset product ID.
pub const PRODUCT_ID: u16 = 0x1211;

/// HID interface the LED controller listens on.
pub const LED_INTERFACE: u8 = 3;

/// Timeout per USB control transfer in milliseconds.
pub const USB_TIMEOUT_MS: u64 = 1000;

// ── SET_REPORT parameters ──

/// HID class `bRequest` for SET_REPORT.
pub const REQUEST_SET_REPORT: u8 = 0x09;

/// `wValue` — report type "output" (0x02) in the high byte, report ID 4 in
/// the low byte.
pub const REPORT_TYPE_AND_ID: u16 = 0x0204;

// ── Report frame ──

/// Total length of an LED output report.
pub const REPORT_LEN: usize = 37;

/// Fixed preamble occupying bytes 0–3 of every report.
pub const REPORT_PREAMBLE: [u8; 4] = [0x04, 0x40, 0x01, 0x11];

/// Set LED intensity. Value byte: brightness, 0–255.
pub const CMD_SET_INTENSITY: u8 = 0x89;

/// Set LED pulsation mode. Value byte: one of the [`PulseMode`] codes.
pub const CMD_SET_PULSE: u8 = 0x87;

/// Build a 37-byte LED output report for a command/value pair.
///
/// Bytes 0–3 carry the fixed preamble, byte 4 the command, byte 5 the value;
/// the remainder is zero padding.
pub fn build_report(command: u8, value: u8) -> [u8; REPORT_LEN] {
    let mut report = [0u8; REPORT_LEN];
    report[..4].copy_from_slice(&REPORT_PREAMBLE);
    report[4] = command;
    report[5] = value;
    report
}

// ── Pulse modes ──

/// LED pulsation mode, as accepted by [`CMD_SET_PULSE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseMode {
    /// Constant illumination, no pulsing.
    Steady,
    Slow,
    Medium,
    Fast,
    /// Short burst pulsing.
    Trigger,
}

impl PulseMode {
    /// All modes, in the order they appear in CLI help.
    pub const ALL: [PulseMode; 5] = [
        PulseMode::Steady,
        PulseMode::Slow,
        PulseMode::Medium,
        PulseMode::Fast,
        PulseMode::Trigger,
    ];

    /// Value byte sent with [`CMD_SET_PULSE`].
    pub fn value_byte(self) -> u8 {
        match self {
            PulseMode::Steady => 0x02,
            PulseMode::Slow => 0x22,
            PulseMode::Medium => 0x26,
            PulseMode::Fast => 0x2A,
            PulseMode::Trigger => 0x12,
        }
    }

    /// Lower-case name as used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PulseMode::Steady => "steady",
            PulseMode::Slow => "slow",
            PulseMode::Medium => "medium",
            PulseMode::Fast => "fast",
            PulseMode::Trigger => "trigger",
        }
    }
}

impl fmt::Display for PulseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PulseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steady" => Ok(PulseMode::Steady),
            "slow" => Ok(PulseMode::Slow),
            "medium" => Ok(PulseMode::Medium),
            "fast" => Ok(PulseMode::Fast),
            "trigger" => Ok(PulseMode::Trigger),
            _ => Err(format!(
                "unknown pulse mode '{s}' (expected steady, slow, medium, fast or trigger)"
            )),
        }
    }
}
