//! ESP32-S3 hardware abstraction layer for the stove damper controller.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-S3
//! - **Sensor**: DS18B20 on a bit-banged 1-Wire bus
//! - **Actuator**: Hobby servo on the damper cable
//! - **Panel**: 5-way resistor-ladder joystick on one ADC pin
//! - **Outputs**: Passive buzzer, blower fan relay
//! - **Display**: SSD1306 128x64 OLED (I2C, optional)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod buzzer;
mod joystick;
mod onewire;
mod power;
mod relay;
mod servo;

pub use buzzer::Esp32Buzzer;
pub use joystick::Esp32Joystick;
pub use onewire::{Esp32OneWire, Esp32Sensor};
pub use power::Esp32Power;
pub use relay::Esp32Relay;
pub use servo::Esp32Servo;

#[cfg(feature = "display")]
mod display;
#[cfg(feature = "display")]
pub use display::{DisplayError, Esp32Display};

/// Pin assignments for the controller board.
pub mod pins {
    // =========================================================================
    // Sensing
    // =========================================================================

    /// DS18B20 data line (1-Wire, external 4.7kΩ pull-up)
    pub const ONE_WIRE: i32 = 6;

    /// Joystick ladder (ADC2 channel 4). Also the deep sleep wake pin.
    pub const JOYSTICK: i32 = 15;

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Damper servo signal (LEDC PWM)
    pub const SERVO: i32 = 5;

    /// Passive buzzer
    pub const BUZZER: i32 = 2;

    /// Blower fan relay
    pub const FAN_RELAY: i32 = 13;

    // =========================================================================
    // I2C Display (SSD1306)
    // =========================================================================

    /// I2C data line
    pub const I2C_SDA: i32 = 8;

    /// I2C clock line
    pub const I2C_SCL: i32 = 9;

    /// Default I2C address for SSD1306 OLED
    pub const OLED_I2C_ADDR: u8 = 0x3C;
}
