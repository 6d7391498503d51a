//! Deep sleep and restart through ESP-IDF system calls.

use crate::traits::{SleepController, WakeLevel, WakeSource};
use esp_idf_hal::sys::{self, esp, EspError};

/// ESP32 power control. `suspend` and `restart` never return.
#[derive(Debug, Default)]
pub struct Esp32Power;

impl Esp32Power {
    /// Creates the power controller.
    pub fn new() -> Self {
        Self
    }
}

impl SleepController for Esp32Power {
    type Error = EspError;

    fn configure_wake(&mut self, source: WakeSource) -> Result<(), EspError> {
        let level = match source.level {
            WakeLevel::Low => 0,
            WakeLevel::High => 1,
        };
        // SAFETY: plain ESP-IDF call; the pin number is validated by IDF.
        esp!(unsafe { sys::esp_sleep_enable_ext0_wakeup(source.pin, level) })
    }

    fn suspend(&mut self) -> Result<(), EspError> {
        log::info!("entering deep sleep");
        // SAFETY: does not return; the chip resets on wake.
        unsafe { sys::esp_deep_sleep_start() }
    }

    fn restart(&mut self) -> Result<(), EspError> {
        // SAFETY: does not return.
        unsafe { sys::esp_restart() }
    }
}
