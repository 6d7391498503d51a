//! Hobby servo on the damper cable, driven by ESP32 LEDC PWM.
//!
//! # Wiring
//!
//! - Signal → GPIO5
//! - V+ → 5V supply shared with the board
//! - GND → GND

use crate::traits::DamperServo;
use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::ledc::{
    config::TimerConfig, LedcChannel, LedcDriver, LedcTimer, LedcTimerDriver, Resolution,
};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::EspError;

/// Servo driver on one LEDC channel.
///
/// "Unpowered" means zero duty: the servo receives no pulses and stops
/// holding its position.
pub struct Esp32Servo<'d> {
    pwm: LedcDriver<'d>,
    max_duty: u32,
    angle: Option<u16>,
    powered: bool,
}

impl<'d> Esp32Servo<'d> {
    /// Standard servo frame rate.
    const PWM_FREQ_HZ: u32 = 50;
    const PERIOD_US: u32 = 20_000;
    /// Pulse width at 0°.
    const MIN_PULSE_US: u32 = 500;
    /// Pulse width at 180°.
    const MAX_PULSE_US: u32 = 2500;

    /// Creates the servo driver with its own LEDC timer. The output starts
    /// unpowered.
    pub fn new<T, TI, C, CI, P, PI>(pin: P, timer: T, channel: C) -> Result<Self, EspError>
    where
        TI: LedcTimer + 'd,
        T: Peripheral<P = TI> + 'd,
        CI: LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        C: Peripheral<P = CI> + 'd,
        PI: OutputPin + 'd,
        P: Peripheral<P = PI> + 'd,
    {
        let timer_config = TimerConfig::default()
            .frequency(Self::PWM_FREQ_HZ.Hz())
            .resolution(Resolution::Bits14);
        let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;
        let mut pwm = LedcDriver::new(channel, timer_driver, pin)?;
        pwm.set_duty(0)?;
        let max_duty = pwm.get_max_duty();

        Ok(Self {
            pwm,
            max_duty,
            angle: None,
            powered: false,
        })
    }

    fn angle_to_duty(&self, angle: u16) -> u32 {
        let angle = u32::from(angle.min(180));
        let pulse_us = Self::MIN_PULSE_US + angle * (Self::MAX_PULSE_US - Self::MIN_PULSE_US) / 180;
        pulse_us * self.max_duty / Self::PERIOD_US
    }

    fn apply(&mut self) -> Result<(), EspError> {
        // Powering up before any angle was commanded emits no pulses.
        let duty = match (self.powered, self.angle) {
            (true, Some(angle)) => self.angle_to_duty(angle),
            _ => 0,
        };
        self.pwm.set_duty(duty)
    }
}

impl DamperServo for Esp32Servo<'_> {
    type Error = EspError;

    fn set_angle(&mut self, degrees: u16) -> Result<(), EspError> {
        self.angle = Some(degrees);
        self.apply()
    }

    fn set_powered(&mut self, on: bool) -> Result<(), EspError> {
        self.powered = on;
        self.apply()
    }
}
