//! ESP32-S3 wood stove damper controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a fixed-cadence regulation loop that:
//! - Polls the joystick for dial, fan and restart input
//! - Reads the DS18B20 stove temperature
//! - Computes the damper opening and walks the servo there
//! - Sounds refill, end-of-burn, overheat and sensor alarms
//! - Renders state to the OLED display (if enabled) or the log
//! - Suspends to deep sleep once the burn is over
//!
//! # Build
//!
//! ```bash
//! # Basic (log output only)
//! cargo build --release --features esp32 --bin esp32_main
//!
//! # With OLED display
//! cargo build --release --features esp32,display --bin esp32_main
//! ```

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use rs_damper::hal::esp32::{
    Esp32Buzzer, Esp32Joystick, Esp32OneWire, Esp32Power, Esp32Relay, Esp32Servo,
};
use rs_damper::{ds18b20::Ds18b20, Config, StoveController, StoveParts};
use std::thread;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = Config::default();
    log::info!("{} booting", config.device.name);

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Sensor (DS18B20 on GPIO6)
    // =========================================================================
    let sensor = Ds18b20::new(Esp32OneWire::new(peripherals.pins.gpio6)?, FreeRtos);
    log::info!("[OK] Sensor bus initialized (GPIO6)");

    // =========================================================================
    // Joystick (ADC2 on GPIO15)
    // =========================================================================
    let adc2 = AdcDriver::new(peripherals.adc2)?;
    let joystick = Esp32Joystick::new(&adc2, peripherals.pins.gpio15)?;
    log::info!("[OK] Joystick initialized (GPIO15 ADC)");

    // =========================================================================
    // Outputs
    // =========================================================================
    let servo = Esp32Servo::new(
        peripherals.pins.gpio5,
        peripherals.ledc.timer0,
        peripherals.ledc.channel0,
    )?;
    let alarm = Esp32Buzzer::new(peripherals.pins.gpio2)?;
    let relay = Esp32Relay::new(peripherals.pins.gpio13)?;
    log::info!("[OK] Servo, buzzer and relay initialized (GPIO5/2/13)");

    // =========================================================================
    // Display (SSD1306 on GPIO8/9) - Optional
    // =========================================================================
    #[cfg(feature = "display")]
    let display = {
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::prelude::*;
        use rs_damper::hal::esp32::Esp32Display;

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio8, // SDA
            peripherals.pins.gpio9, // SCL
            &I2cConfig::new().baudrate(400.kHz().into()),
        )?;

        let disp =
            Esp32Display::new(i2c).map_err(|e| anyhow::anyhow!("Display init failed: {:?}", e))?;
        log::info!("[OK] Display initialized (GPIO8/9 I2C)");
        disp
    };

    #[cfg(not(feature = "display"))]
    let display = rs_damper::hal::LogDisplay::new();

    // =========================================================================
    // Controller
    // =========================================================================
    let loop_interval = Duration::from_millis(u64::from(config.regulator.loop_interval_ms));
    let mut stove = StoveController::new(
        config,
        StoveParts {
            sensor,
            joystick,
            servo,
            alarm,
            relay,
            power: Esp32Power::new(),
            display,
            delay: FreeRtos,
        },
    );
    stove.start()?;
    log::info!("Starting regulation loop...");

    // =========================================================================
    // Main Regulation Loop
    // =========================================================================
    loop {
        match stove.run_cycle() {
            Ok(report) => log::debug!("{:?}", report),
            Err(e) => log::warn!("cycle aborted: {}", e),
        }

        thread::sleep(loop_interval);
    }
}
