//! Siberled — LED control for SteelSeries Siberia v2 headsets.

pub mod device;
pub mod led;
pub mod protocol;

pub use device::DeviceError;
