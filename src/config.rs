//! Shared configuration for the regulator, actuator, alarms and panel.
//!
//! Every constant of the control algorithm lives here so that tests and
//! boards can tune it without touching the logic. Uses `heapless::String`
//! for `no_std` compatibility.
//!
//! # Example
//!
//! ```rust
//! use rs_damper::config::{ActuatorConfig, Config, RegulatorConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.actuator.deadband, 12);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_regulator(RegulatorConfig::default().with_thresholds(500.0, 800.0))
//!     .with_actuator(ActuatorConfig::default().with_deadband(5));
//! ```

use crate::traits::{AlarmTone, WakeLevel, WakeSource};
use heapless::String as HString;

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Feedback loop constants
    pub regulator: RegulatorConfig,
    /// Servo geometry and motion pacing
    pub actuator: ActuatorConfig,
    /// Buzzer tones and the overheat limit
    pub alarm: AlarmConfig,
    /// Joystick bands and dial range
    pub panel: PanelConfig,
    /// End-of-burn suspend behaviour
    pub sleep: SleepConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set regulator configuration
    pub fn with_regulator(mut self, regulator: RegulatorConfig) -> Self {
        self.regulator = regulator;
        self
    }

    /// Set actuator configuration
    pub fn with_actuator(mut self, actuator: ActuatorConfig) -> Self {
        self.actuator = actuator;
        self
    }

    /// Set alarm configuration
    pub fn with_alarm(mut self, alarm: AlarmConfig) -> Self {
        self.alarm = alarm;
        self
    }

    /// Set panel configuration
    pub fn with_panel(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }

    /// Set sleep configuration
    pub fn with_sleep(mut self, sleep: SleepConfig) -> Self {
        self.sleep = sleep;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Regulator Config
// ============================================================================

/// Feedback loop configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegulatorConfig {
    /// Integral time constant; the I coefficient is `gain / tau_i`
    pub tau_i: f32,
    /// Derivative time constant; the D coefficient is `gain / tau_d`
    pub tau_d: f32,
    /// Integral level above which a refill is requested
    pub refill_threshold: f32,
    /// Integral level at or above which the burn is considered over
    pub end_threshold: f32,
    /// Below this temperature an ended burn closes the damper and sleeps
    pub min_operating_c: i16,
    /// Lower damper limit in percent
    pub min_damper: u8,
    /// Upper damper limit in percent
    pub max_damper: u8,
    /// Dial values at or below this select manual damper control
    pub manual_threshold: i16,
    /// Idle delay at the end of each cycle in milliseconds
    pub loop_interval_ms: u32,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            tau_i: 1000.0,
            tau_d: 5.0,
            refill_threshold: 55_000.0,
            end_threshold: 85_000.0,
            min_operating_c: 50,
            min_damper: 0,
            max_damper: 100,
            manual_threshold: 100,
            loop_interval_ms: 20,
        }
    }
}

impl RegulatorConfig {
    /// Set the integral and derivative time constants
    pub fn with_time_constants(mut self, tau_i: f32, tau_d: f32) -> Self {
        self.tau_i = tau_i;
        self.tau_d = tau_d;
        self
    }

    /// Set the refill and end-of-burn integral thresholds
    ///
    /// The end threshold is raised to the refill threshold if given lower.
    pub fn with_thresholds(mut self, refill: f32, end: f32) -> Self {
        self.refill_threshold = refill;
        self.end_threshold = end.max(refill);
        self
    }

    /// Set the minimum operating temperature
    pub fn with_min_operating_c(mut self, celsius: i16) -> Self {
        self.min_operating_c = celsius;
        self
    }

    /// Set the damper limits in percent
    pub fn with_damper_limits(mut self, min: u8, max: u8) -> Self {
        self.max_damper = max.min(100);
        self.min_damper = min.min(self.max_damper);
        self
    }

    /// Set the manual mode threshold
    pub fn with_manual_threshold(mut self, threshold: i16) -> Self {
        self.manual_threshold = threshold;
        self
    }

    /// Set the loop interval
    pub fn with_loop_interval_ms(mut self, ms: u32) -> Self {
        self.loop_interval_ms = ms;
        self
    }
}

// ============================================================================
// Actuator Config
// ============================================================================

/// Servo geometry and motion pacing
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuatorConfig {
    /// Minimum setpoint change (percent) before the servo moves
    pub deadband: u8,
    /// Servo travel in degrees from fully closed to fully open
    pub angular_range: f32,
    /// Calibration divisor; 1.0 is neutral
    pub calibration: f32,
    /// Servo angle at a fully closed damper
    pub angle_offset: f32,
    /// Setpoint that maps to the full angular range
    pub max_setpoint: f32,
    /// Settle delay after each one-percent step
    pub step_delay_ms: u32,
    /// Delay before powering the servo for a move
    pub pre_move_delay_ms: u32,
    /// Angle the servo is parked at during startup
    pub park_angle: u16,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            deadband: 12,
            angular_range: 35.0,
            calibration: 1.5,
            angle_offset: 29.0,
            max_setpoint: 100.0,
            step_delay_ms: 50,
            pre_move_delay_ms: 50,
            park_angle: 50,
        }
    }
}

impl ActuatorConfig {
    /// Set the deadband
    pub fn with_deadband(mut self, percent: u8) -> Self {
        self.deadband = percent;
        self
    }

    /// Set the servo geometry
    pub fn with_geometry(mut self, angular_range: f32, calibration: f32, angle_offset: f32) -> Self {
        self.angular_range = angular_range;
        self.calibration = calibration;
        self.angle_offset = angle_offset;
        self
    }

    /// Set the per-step settle delay
    pub fn with_step_delay_ms(mut self, ms: u32) -> Self {
        self.step_delay_ms = ms;
        self
    }

    /// Set the park angle
    pub fn with_park_angle(mut self, degrees: u16) -> Self {
        self.park_angle = degrees;
        self
    }
}

// ============================================================================
// Alarm Config
// ============================================================================

/// Buzzer configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlarmConfig {
    /// Temperature above which the overheat alarm sounds
    pub overheat_c: i16,
    /// Tone for a failed temperature read
    pub fault_tone: AlarmTone,
    /// Tone for overheating
    pub overheat_tone: AlarmTone,
    /// Tone when fuel should be added
    pub refill_tone: AlarmTone,
    /// Tone when the burn has ended
    pub end_tone: AlarmTone,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            overheat_c: 90,
            fault_tone: AlarmTone::new(1900, 1000, 1000),
            overheat_tone: AlarmTone::new(1900, 1000, 1000),
            refill_tone: AlarmTone::new(1900, 1000, 1000),
            end_tone: AlarmTone::new(950, 200, 0),
        }
    }
}

impl AlarmConfig {
    /// Set the overheat limit
    pub fn with_overheat_c(mut self, celsius: i16) -> Self {
        self.overheat_c = celsius;
        self
    }

    /// Set the refill tone
    pub fn with_refill_tone(mut self, tone: AlarmTone) -> Self {
        self.refill_tone = tone;
        self
    }

    /// Set the end-of-burn tone
    pub fn with_end_tone(mut self, tone: AlarmTone) -> Self {
        self.end_tone = tone;
        self
    }
}

// ============================================================================
// Panel Config
// ============================================================================

/// Inclusive range of raw ADC values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawBand {
    /// Lowest raw value in the band
    pub low: u16,
    /// Highest raw value in the band
    pub high: u16,
}

impl RawBand {
    /// Creates a band
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Returns true if `raw` falls inside the band
    #[inline]
    pub const fn contains(&self, raw: u16) -> bool {
        raw >= self.low && raw <= self.high
    }
}

/// Joystick bands and dial range
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelConfig {
    /// Raw band that raises the dial
    pub up: RawBand,
    /// Raw band that switches the fan on
    pub fan_on: RawBand,
    /// Raw band that switches the fan off
    pub fan_off: RawBand,
    /// Raw band that lowers the dial
    pub down: RawBand,
    /// Raw band that restarts the device
    pub restart: RawBand,
    /// Dial value at boot
    pub initial_dial: i16,
    /// Dial change per joystick event
    pub dial_step: i16,
    /// Lowest dial value
    pub dial_min: i16,
    /// Highest dial value
    pub dial_max: i16,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            up: RawBand::new(0, 10),
            fan_on: RawBand::new(12, 25),
            fan_off: RawBand::new(30, 50),
            down: RawBand::new(70, 85),
            restart: RawBand::new(140, 180),
            initial_dial: 120,
            dial_step: 10,
            dial_min: 0,
            dial_max: 140,
        }
    }
}

impl PanelConfig {
    /// Set the dial value at boot
    pub fn with_initial_dial(mut self, dial: i16) -> Self {
        self.initial_dial = dial;
        self
    }

    /// Set the dial step
    pub fn with_dial_step(mut self, step: i16) -> Self {
        self.dial_step = step;
        self
    }

    /// Set the dial range
    pub fn with_dial_range(mut self, min: i16, max: i16) -> Self {
        self.dial_min = min;
        self.dial_max = max.max(min);
        self
    }
}

// ============================================================================
// Sleep Config
// ============================================================================

/// End-of-burn suspend configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SleepConfig {
    /// Whether the device may suspend at all
    pub enabled: bool,
    /// Wake source armed before suspending
    pub wake: WakeSource,
    /// Delay between the final refresh and the suspend
    pub final_delay_ms: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            wake: WakeSource {
                pin: 15,
                level: WakeLevel::Low,
            },
            final_delay_ms: 50,
        }
    }
}

impl SleepConfig {
    /// Enable or disable suspending
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the wake source
    pub fn with_wake(mut self, pin: i32, level: WakeLevel) -> Self {
        self.wake = WakeSource { pin, level };
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name, shown on the splash screen
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-damper"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}
