//! Hardware abstraction traits for the stove's sensors and actuators.
//!
//! This module defines the interfaces the regulator consumes so that the
//! control logic runs unchanged on ESP32 hardware and on desktop mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`TemperatureSensor`] | Flue/stove temperature in whole degrees Celsius |
//! | [`Potentiometer`] | Raw joystick ADC reading |
//! | [`DamperServo`] | Damper servo angle and power |
//! | [`AlarmDriver`] | Buzzer tones |
//! | [`FanRelay`] | Blower fan relay |
//! | [`SleepController`] | Deep sleep, wake source and restart |
//!
//! Blocking delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_damper::traits::{DamperServo, TemperatureSensor};
//! use rs_damper::hal::{MockSensor, MockServo};
//!
//! let mut sensor = MockSensor::new(72);
//! assert_eq!(sensor.read_celsius().unwrap(), 72);
//!
//! let mut servo = MockServo::new();
//! servo.set_powered(true).unwrap();
//! servo.set_angle(36).unwrap();
//! assert_eq!(servo.angles(), vec![36]);
//! ```

/// Temperature value reported when the sensor cannot be read.
///
/// Any negative reading (the DS18B20 reports -127 when disconnected) or a
/// transport error is normalised to this value.
pub const SENSOR_FAULT_C: i16 = -1;

/// Temperature sensor trait.
///
/// Returns whole degrees Celsius. Implementations report transport failures
/// as `Err`; the caller turns both errors and negative readings into a
/// sensor fault for that cycle.
pub trait TemperatureSensor {
    /// Error type for sensor reads.
    type Error: core::fmt::Debug;

    /// Performs a conversion and returns the temperature in degrees Celsius.
    fn read_celsius(&mut self) -> Result<i16, Self::Error>;
}

/// Raw analog input of the front panel joystick.
///
/// The stove uses a single resistor-ladder joystick on one ADC pin. The raw
/// value is classified into bands by [`crate::panel`].
pub trait Potentiometer {
    /// Error type for ADC reads.
    type Error: core::fmt::Debug;

    /// Returns the raw ADC value (9-bit scale, 0..=511).
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Hobby servo connected to the damper cable.
///
/// The servo is only powered while moving; holding torque is not needed
/// because the cable friction keeps the damper in place.
pub trait DamperServo {
    /// Error type for servo operations.
    type Error: core::fmt::Debug;

    /// Commands the servo to an absolute angle in degrees.
    fn set_angle(&mut self, degrees: u16) -> Result<(), Self::Error>;

    /// Enables or disables the servo PWM output.
    fn set_powered(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// A single buzzer tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlarmTone {
    /// Tone frequency in hertz.
    pub frequency_hz: u32,
    /// How long the tone sounds.
    pub duration_ms: u32,
    /// Silence after the tone before the cycle continues.
    pub pause_ms: u32,
}

impl AlarmTone {
    /// Creates a tone description.
    pub const fn new(frequency_hz: u32, duration_ms: u32, pause_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            pause_ms,
        }
    }

    /// Total time the tone blocks the loop.
    #[inline]
    pub const fn total_ms(&self) -> u32 {
        self.duration_ms + self.pause_ms
    }
}

/// Audible alarm driver.
///
/// `sound` blocks for the tone duration plus its pause. The regulator never
/// waits on the buzzer beyond that.
pub trait AlarmDriver {
    /// Error type for buzzer operations.
    type Error: core::fmt::Debug;

    /// Plays one tone and returns once it (and its pause) has finished.
    fn sound(&mut self, tone: AlarmTone) -> Result<(), Self::Error>;
}

/// Blower fan relay, toggled from the joystick.
pub trait FanRelay {
    /// Error type for relay operations.
    type Error: core::fmt::Debug;

    /// Switches the relay.
    fn set_on(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Returns the current relay state.
    fn is_on(&self) -> bool;
}

/// Logic level that wakes the device from deep sleep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WakeLevel {
    /// Wake when the pin is pulled low.
    Low,
    /// Wake when the pin is driven high.
    High,
}

/// External wake condition for deep sleep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WakeSource {
    /// GPIO number.
    pub pin: i32,
    /// Level that triggers the wake.
    pub level: WakeLevel,
}

/// Power management: deep sleep and restart.
///
/// On hardware, [`suspend`](Self::suspend) and [`restart`](Self::restart)
/// never return; the device boots again from scratch. Mocks record the call
/// and return `Ok(())`.
pub trait SleepController {
    /// Error type for power operations.
    type Error: core::fmt::Debug;

    /// Arms the wake source used by the next suspend.
    fn configure_wake(&mut self, source: WakeSource) -> Result<(), Self::Error>;

    /// Enters deep sleep.
    fn suspend(&mut self) -> Result<(), Self::Error>;

    /// Performs a full device restart.
    fn restart(&mut self) -> Result<(), Self::Error>;
}
