//! Front panel joystick: raw ADC bands to dial, fan and restart events.
//!
//! The joystick is a resistor ladder on one ADC pin, so each direction
//! shows up as a band of raw values. Up and down move the dial in fixed
//! steps; left and right switch the blower fan; a dedicated band restarts
//! the device. None of these feed the control law directly: only the dial
//! value does, through [`ControlTier::from_dial`].
//!
//! # Example
//!
//! ```rust
//! use rs_damper::config::PanelConfig;
//! use rs_damper::panel::{PanelEvent, SetpointDial};
//!
//! let config = PanelConfig::default();
//! let mut dial = SetpointDial::new(&config);
//! assert_eq!(dial.value(), 120);
//!
//! let event = PanelEvent::classify(&config, 80);
//! assert_eq!(event, PanelEvent::DialDown);
//! dial.apply(event);
//! assert_eq!(dial.value(), 110);
//! ```

use crate::config::PanelConfig;
use crate::gain::ControlTier;

/// Event decoded from one raw joystick sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelEvent {
    /// Raise the dial one step.
    DialUp,
    /// Lower the dial one step.
    DialDown,
    /// Switch the blower fan on.
    FanOn,
    /// Switch the blower fan off.
    FanOff,
    /// Restart the device.
    Restart,
    /// Joystick at rest.
    #[default]
    Idle,
}

impl PanelEvent {
    /// Classifies a raw ADC value against the configured bands.
    pub fn classify(config: &PanelConfig, raw: u16) -> Self {
        if config.up.contains(raw) {
            PanelEvent::DialUp
        } else if config.fan_on.contains(raw) {
            PanelEvent::FanOn
        } else if config.fan_off.contains(raw) {
            PanelEvent::FanOff
        } else if config.down.contains(raw) {
            PanelEvent::DialDown
        } else if config.restart.contains(raw) {
            PanelEvent::Restart
        } else {
            PanelEvent::Idle
        }
    }
}

/// User setpoint dial, moved in steps by the joystick.
///
/// Values at or below the manual threshold are a damper percentage; values
/// above select an automatic tier.
#[derive(Clone, Debug)]
pub struct SetpointDial {
    value: i16,
    step: i16,
    min: i16,
    max: i16,
}

impl SetpointDial {
    /// Creates a dial at the configured initial value.
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            value: config.initial_dial.clamp(config.dial_min, config.dial_max),
            step: config.dial_step,
            min: config.dial_min,
            max: config.dial_max,
        }
    }

    /// Current dial value.
    #[inline]
    pub fn value(&self) -> i16 {
        self.value
    }

    /// Applies a joystick event. Returns true if the value changed.
    pub fn apply(&mut self, event: PanelEvent) -> bool {
        let next = match event {
            PanelEvent::DialUp => self.value.saturating_add(self.step),
            PanelEvent::DialDown => self.value.saturating_sub(self.step),
            _ => return false,
        }
        .clamp(self.min, self.max);

        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Control tier for the current value.
    #[inline]
    pub fn tier(&self, manual_threshold: i16) -> ControlTier {
        ControlTier::from_dial(self.value, manual_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_all_bands() {
        let cfg = PanelConfig::default();
        assert_eq!(PanelEvent::classify(&cfg, 0), PanelEvent::DialUp);
        assert_eq!(PanelEvent::classify(&cfg, 10), PanelEvent::DialUp);
        assert_eq!(PanelEvent::classify(&cfg, 18), PanelEvent::FanOn);
        assert_eq!(PanelEvent::classify(&cfg, 40), PanelEvent::FanOff);
        assert_eq!(PanelEvent::classify(&cfg, 77), PanelEvent::DialDown);
        assert_eq!(PanelEvent::classify(&cfg, 150), PanelEvent::Restart);
    }

    #[test]
    fn gaps_and_rest_are_idle() {
        let cfg = PanelConfig::default();
        for raw in [11, 26, 29, 51, 69, 86, 139, 181, 400, 511] {
            assert_eq!(PanelEvent::classify(&cfg, raw), PanelEvent::Idle, "raw {}", raw);
        }
    }

    #[test]
    fn dial_steps_and_clamps() {
        let cfg = PanelConfig::default();
        let mut dial = SetpointDial::new(&cfg);
        assert!(dial.apply(PanelEvent::DialUp));
        assert_eq!(dial.value(), 130);
        assert!(dial.apply(PanelEvent::DialUp));
        assert_eq!(dial.value(), 140);
        assert!(!dial.apply(PanelEvent::DialUp));
        assert_eq!(dial.value(), 140);
    }

    #[test]
    fn dial_bottoms_out_at_zero() {
        let cfg = PanelConfig::default().with_initial_dial(10);
        let mut dial = SetpointDial::new(&cfg);
        dial.apply(PanelEvent::DialDown);
        dial.apply(PanelEvent::DialDown);
        assert_eq!(dial.value(), 0);
    }

    #[test]
    fn fan_and_restart_leave_dial_alone() {
        let cfg = PanelConfig::default();
        let mut dial = SetpointDial::new(&cfg);
        for event in [
            PanelEvent::FanOn,
            PanelEvent::FanOff,
            PanelEvent::Restart,
            PanelEvent::Idle,
        ] {
            assert!(!dial.apply(event));
        }
        assert_eq!(dial.value(), 120);
    }

    #[test]
    fn dial_walks_into_manual_range() {
        let cfg = PanelConfig::default();
        let mut dial = SetpointDial::new(&cfg);
        assert_eq!(dial.tier(100), ControlTier::Auto { level: 2 });
        dial.apply(PanelEvent::DialDown);
        dial.apply(PanelEvent::DialDown);
        assert_eq!(dial.tier(100), ControlTier::Manual { dial: 100 });
    }

    #[test]
    fn initial_dial_clamped_into_range() {
        let cfg = PanelConfig::default().with_initial_dial(900);
        assert_eq!(SetpointDial::new(&cfg).value(), 140);
    }
}
