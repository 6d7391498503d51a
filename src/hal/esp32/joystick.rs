//! Resistor-ladder joystick read through the ESP32-S3 ADC.
//!
//! # Wiring
//!
//! - Ladder output → GPIO15 (ADC2 channel 4, also the deep sleep wake pin)
//!
//! The panel bands are defined on a 9-bit scale, so the 12-bit oneshot
//! reading is shifted down by three bits.

use crate::traits::Potentiometer;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC2;
use esp_idf_hal::gpio::Gpio15;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Joystick ADC input.
pub struct Esp32Joystick<'d> {
    channel: AdcChannelDriver<'d, Gpio15, &'d AdcDriver<'d, ADC2>>,
}

impl<'d> Esp32Joystick<'d> {
    /// Bits dropped from the 12-bit reading.
    const SHIFT: u16 = 3;

    /// Creates the joystick input on GPIO15.
    pub fn new(
        adc: &'d AdcDriver<'d, ADC2>,
        pin: impl Peripheral<P = Gpio15> + 'd,
    ) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }
}

impl Potentiometer for Esp32Joystick<'_> {
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, EspError> {
        Ok(self.channel.read()? >> Self::SHIFT)
    }
}
