//! Passive piezo buzzer driven by toggling a GPIO.
//!
//! # Wiring
//!
//! - Buzzer + → GPIO2
//! - Buzzer − → GND

use crate::traits::{AlarmDriver, AlarmTone};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Square-wave buzzer. [`sound`](AlarmDriver::sound) blocks for the tone
/// and its pause.
pub struct Esp32Buzzer<'d, PIN: OutputPin> {
    pin: PinDriver<'d, PIN, Output>,
}

impl<'d, PIN: OutputPin> Esp32Buzzer<'d, PIN> {
    /// Creates a silent buzzer on `pin`.
    pub fn new(pin: impl Peripheral<P = PIN> + 'd) -> Result<Self, EspError> {
        let mut pin = PinDriver::output(pin)?;
        pin.set_low()?;
        Ok(Self { pin })
    }
}

impl<PIN: OutputPin> AlarmDriver for Esp32Buzzer<'_, PIN> {
    type Error = EspError;

    fn sound(&mut self, tone: AlarmTone) -> Result<(), EspError> {
        if tone.frequency_hz > 0 {
            let half_period_us = 500_000 / tone.frequency_hz;
            let cycles = u64::from(tone.duration_ms) * u64::from(tone.frequency_hz) / 1000;
            for _ in 0..cycles {
                self.pin.set_high()?;
                Ets::delay_us(half_period_us);
                self.pin.set_low()?;
                Ets::delay_us(half_period_us);
            }
        }
        self.pin.set_low()?;
        FreeRtos::delay_ms(tone.pause_ms);
        Ok(())
    }
}
