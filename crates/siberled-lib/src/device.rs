//! Device session — discovery, kernel-driver handling, HID report transport.

use std::fmt;
use std::time::Duration;

use rusb::{Direction, GlobalContext, Recipient, RequestType};

use crate::protocol::{
    self, LED_INTERFACE, PRODUCT_ID, REPORT_LEN, REPORT_TYPE_AND_ID, REQUEST_SET_REPORT,
    USB_TIMEOUT_MS, VENDOR_ID,
};

// ── Error type ──

/// Device session errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// identifies the operation or step (e.g. `"interface 3"`, `"device list"`)
/// and *details* describes what went wrong.
#[derive(Debug)]
pub enum DeviceError {
    NotFound,
    EnumerationFailed(String),
    OpenFailed(String),
    DetachFailed(String),
    ClaimFailed(String),
    TransferFailed(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotFound => write!(f, "no supported headset found"),
            DeviceError::EnumerationFailed(e) => write!(f, "USB enumeration failed: {e}"),
            DeviceError::OpenFailed(e) => write!(f, "failed to open device: {e}"),
            DeviceError::DetachFailed(e) => write!(f, "kernel driver detach failed: {e}"),
            DeviceError::ClaimFailed(e) => write!(f, "interface claim failed: {e}"),
            DeviceError::TransferFailed(e) => write!(f, "transfer failed: {e}"),
        }
    }
}

impl std::error::Error for DeviceError {}

pub type Result<T> = std::result::Result<T, DeviceError>;

// ── Device info ──

/// Bus location and identity of the matched headset.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub bus_number: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usb:{:03}/{:03} [{:04x}:{:04x}]",
            self.bus_number, self.address, self.vendor_id, self.product_id
        )
    }
}

// ── Trait ──

/// LED report transport — the seam between the dispatcher and the bus.
pub trait SiberiaDevice {
    fn info(&self) -> &DeviceInfo;

    /// Send one HID output report carrying a command/value pair.
    fn send_report(&self, command: u8, value: u8) -> Result<()>;
}

// ── USB implementation ──

/// An opened headset with the LED interface claimed and any kernel driver
/// detached.
///
/// Dropping the session releases the interface and re-attaches the kernel
/// driver if one was detached, on every exit path — including a failed
/// claim during [`UsbDevice::open`].
pub struct UsbDevice {
    handle: rusb::DeviceHandle<GlobalContext>,
    info: DeviceInfo,
    claimed: bool,
    detached: bool,
}

impl UsbDevice {
    /// Locate the headset, open it and claim its LED interface.
    ///
    /// Devices whose descriptors cannot be read are skipped; the first
    /// device matching the Siberia v2 vendor/product IDs is taken and the
    /// rest of the list dropped.
    pub fn open() -> Result<Self> {
        let devices = rusb::devices()
            .map_err(|e| DeviceError::EnumerationFailed(format!("device list: {e}")))?;

        let mut matched = None;
        for device in devices.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(d) => d,
                Err(e) => {
                    log::warn!(
                        "skipping device {:03}/{:03}: descriptor read failed: {e}",
                        device.bus_number(),
                        device.address()
                    );
                    continue;
                }
            };
            if descriptor.vendor_id() == VENDOR_ID && descriptor.product_id() == PRODUCT_ID {
                matched = Some(device);
                break;
            }
        }
        let device = matched.ok_or(DeviceError::NotFound)?;

        let info = DeviceInfo {
            bus_number: device.bus_number(),
            address: device.address(),
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
        };

        let handle = device
            .open()
            .map_err(|e| DeviceError::OpenFailed(format!("{info}: {e}")))?;

        // From here on the session value owns cleanup: Drop runs on every
        // early return below.
        let mut session = UsbDevice {
            handle,
            info,
            claimed: false,
            detached: false,
        };

        let active = session
            .handle
            .kernel_driver_active(LED_INTERFACE)
            .map_err(|e| DeviceError::DetachFailed(format!("kernel driver query: {e}")))?;
        if active {
            session
                .handle
                .detach_kernel_driver(LED_INTERFACE)
                .map_err(|e| {
                    DeviceError::DetachFailed(format!("interface {LED_INTERFACE}: {e}"))
                })?;
            // Re-attach only what was actually detached.
            session.detached = true;
            log::debug!("detached kernel driver from interface {LED_INTERFACE}");
        }

        session
            .handle
            .claim_interface(LED_INTERFACE)
            .map_err(|e| DeviceError::ClaimFailed(format!("interface {LED_INTERFACE}: {e}")))?;
        session.claimed = true;
        log::debug!("claimed interface {LED_INTERFACE}");

        Ok(session)
    }
}

impl SiberiaDevice for UsbDevice {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn send_report(&self, command: u8, value: u8) -> Result<()> {
        let report = protocol::build_report(command, value);
        let request_type =
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        let written = self
            .handle
            .write_control(
                request_type,
                REQUEST_SET_REPORT,
                REPORT_TYPE_AND_ID,
                LED_INTERFACE as u16,
                &report,
                Duration::from_millis(USB_TIMEOUT_MS),
            )
            .map_err(|e| {
                DeviceError::TransferFailed(format!("set report 0x{command:02x}: {e}"))
            })?;
        if written != REPORT_LEN {
            return Err(DeviceError::TransferFailed(format!(
                "set report 0x{command:02x}: short write ({written} of {REPORT_LEN} bytes)"
            )));
        }
        Ok(())
    }
}

impl Drop for UsbDevice {
    fn drop(&mut self) {
        if self.claimed {
            if let Err(e) = self.handle.release_interface(LED_INTERFACE) {
                log::warn!("interface {LED_INTERFACE} release failed: {e}");
            }
        }
        if self.detached {
            if let Err(e) = self.handle.attach_kernel_driver(LED_INTERFACE) {
                log::warn!("kernel driver re-attach on interface {LED_INTERFACE} failed: {e}");
            }
        }
    }
}

// ── Mock device for testing ──

/// In-memory mock device for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Records every report instead of touching the bus.
    pub struct MockDevice {
        info: DeviceInfo,
        /// Recorded reports: (command, value) pairs in send order.
        pub reports: RefCell<Vec<(u8, u8)>>,
        /// If set, `send_report` fails when asked to send this command.
        pub fail_command: Cell<Option<u8>>,
    }

    impl Default for MockDevice {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockDevice {
        pub fn new() -> Self {
            MockDevice {
                info: DeviceInfo {
                    bus_number: 0,
                    address: 0,
                    vendor_id: VENDOR_ID,
                    product_id: PRODUCT_ID,
                },
                reports: RefCell::new(Vec::new()),
                fail_command: Cell::new(None),
            }
        }
    }

    impl SiberiaDevice for MockDevice {
        fn info(&self) -> &DeviceInfo {
            &self.info
        }

        fn send_report(&self, command: u8, value: u8) -> Result<()> {
            if self.fail_command.get() == Some(command) {
                return Err(DeviceError::TransferFailed(format!(
                    "mock: failure injected for command 0x{command:02x}"
                )));
            }
            self.reports.borrow_mut().push((command, value));
            Ok(())
        }
    }
}
