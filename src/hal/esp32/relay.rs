//! Blower fan relay on a GPIO.
//!
//! # Wiring
//!
//! - Relay module IN → GPIO13 (active high)

use crate::traits::FanRelay;
use esp_idf_hal::gpio::{Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Fan relay, off at construction.
pub struct Esp32Relay<'d, PIN: OutputPin> {
    pin: PinDriver<'d, PIN, Output>,
    on: bool,
}

impl<'d, PIN: OutputPin> Esp32Relay<'d, PIN> {
    /// Creates the relay output and switches it off.
    pub fn new(pin: impl Peripheral<P = PIN> + 'd) -> Result<Self, EspError> {
        let mut pin = PinDriver::output(pin)?;
        pin.set_low()?;
        Ok(Self { pin, on: false })
    }
}

impl<PIN: OutputPin> FanRelay for Esp32Relay<'_, PIN> {
    type Error = EspError;

    fn set_on(&mut self, on: bool) -> Result<(), EspError> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
