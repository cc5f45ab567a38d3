//! LED device operations — intensity and pulse dispatch.

use crate::device::{Result, SiberiaDevice};
use crate::protocol::{CMD_SET_INTENSITY, CMD_SET_PULSE, PulseMode};

/// LED options for one invocation, parsed once at the CLI boundary.
///
/// `None` fields leave the corresponding LED property untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedSettings {
    /// Brightness, 0–255.
    pub intensity: Option<u8>,
    pub pulse: Option<PulseMode>,
}

impl LedSettings {
    /// True when no command would be sent. The device is still located and
    /// its interface claimed, but the LED state is left as it is.
    pub fn is_noop(&self) -> bool {
        self.intensity.is_none() && self.pulse.is_none()
    }
}

/// Apply the requested settings, one report per selected option.
///
/// Intensity is sent first, then the pulse mode. A failed transfer aborts
/// the sequence; each transfer is attempted exactly once.
pub fn apply_settings(device: &impl SiberiaDevice, settings: &LedSettings) -> Result<()> {
    if let Some(level) = settings.intensity {
        device.send_report(CMD_SET_INTENSITY, level)?;
        log::debug!("intensity set to {level}");
    }
    if let Some(mode) = settings.pulse {
        device.send_report(CMD_SET_PULSE, mode.value_byte())?;
        log::debug!("pulse mode set to {mode}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockDevice;

    #[test]
    fn intensity_only_sends_single_report() {
        let dev = MockDevice::new();
        let settings = LedSettings {
            intensity: Some(128),
            pulse: None,
        };
        apply_settings(&dev, &settings).unwrap();
        assert_eq!(*dev.reports.borrow(), vec![(CMD_SET_INTENSITY, 0x80)]);
    }

    #[test]
    fn pulse_only_sends_single_report() {
        let dev = MockDevice::new();
        let settings = LedSettings {
            intensity: None,
            pulse: Some(PulseMode::Fast),
        };
        apply_settings(&dev, &settings).unwrap();
        assert_eq!(*dev.reports.borrow(), vec![(CMD_SET_PULSE, 0x2A)]);
    }

    #[test]
    fn both_options_send_intensity_then_pulse() {
        let dev = MockDevice::new();
        let settings = LedSettings {
            intensity: Some(50),
            pulse: Some(PulseMode::Trigger),
        };
        apply_settings(&dev, &settings).unwrap();
        assert_eq!(
            *dev.reports.borrow(),
            vec![(CMD_SET_INTENSITY, 0x32), (CMD_SET_PULSE, 0x12)]
        );
    }

    #[test]
    fn no_options_send_nothing() {
        let dev = MockDevice::new();
        apply_settings(&dev, &LedSettings::default()).unwrap();
        assert!(dev.reports.borrow().is_empty());
    }

    #[test]
    fn failed_intensity_aborts_pulse() {
        let dev = MockDevice::new();
        dev.fail_command.set(Some(CMD_SET_INTENSITY));
        let settings = LedSettings {
            intensity: Some(200),
            pulse: Some(PulseMode::Slow),
        };
        assert!(apply_settings(&dev, &settings).is_err());
        assert!(
            dev.reports.borrow().is_empty(),
            "pulse must not be attempted after a failed intensity transfer"
        );
    }

    #[test]
    fn failed_pulse_keeps_intensity_report() {
        let dev = MockDevice::new();
        dev.fail_command.set(Some(CMD_SET_PULSE));
        let settings = LedSettings {
            intensity: Some(10),
            pulse: Some(PulseMode::Medium),
        };
        assert!(apply_settings(&dev, &settings).is_err());
        assert_eq!(*dev.reports.borrow(), vec![(CMD_SET_INTENSITY, 10)]);
    }

    #[test]
    fn every_pulse_mode_maps_to_its_code() {
        for mode in PulseMode::ALL {
            let dev = MockDevice::new();
            let settings = LedSettings {
                intensity: None,
                pulse: Some(mode),
            };
            apply_settings(&dev, &settings).unwrap();
            assert_eq!(*dev.reports.borrow(), vec![(CMD_SET_PULSE, mode.value_byte())]);
        }
    }

    #[test]
    fn intensity_boundaries_pass_through() {
        for level in [0u8, 255] {
            let dev = MockDevice::new();
            let settings = LedSettings {
                intensity: Some(level),
                pulse: None,
            };
            apply_settings(&dev, &settings).unwrap();
            assert_eq!(*dev.reports.borrow(), vec![(CMD_SET_INTENSITY, level)]);
        }
    }

    #[test]
    fn is_noop_reflects_options() {
        assert!(LedSettings::default().is_noop());
        assert!(
            !LedSettings {
                intensity: Some(0),
                pulse: None,
            }
            .is_noop()
        );
        assert!(
            !LedSettings {
                intensity: None,
                pulse: Some(PulseMode::Steady),
            }
            .is_noop()
        );
    }
}
