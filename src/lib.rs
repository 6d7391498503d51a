//! # rs-damper
//!
//! A wood stove air damper regulator: reads the stove temperature, runs a
//! gain-scheduled PID loop with refill and end-of-burn detection, and walks
//! a servo-driven damper to the computed opening.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for the sensor, joystick, servo, buzzer, fan relay and power
//! - **Gain scheduling**: Per-tier target temperatures with banded proportional gains
//! - **Burn tracking**: Integral-based refill and end-of-burn phases, reload detection from the temperature trend
//! - **Gentle actuation**: Deadband plus one-percent servo steps, powered only while moving
//! - **Deep sleep**: The device suspends once the burn is over and the stove is cold
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and display abstractions
//! - `history`, `gain`, `regulator` - The control law
//! - `actuator`, `alarm`, `panel`, `sleep` - Policies around it
//! - `stove` - Main controller that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_damper::hal::{MockSensor, MockStove};
//! use rs_damper::{CombustionPhase, Config};
//!
//! let mut stove = MockStove::with_mocks(Config::default(), MockSensor::new(70));
//! stove.start().unwrap();
//!
//! // Call once per loop tick
//! let report = stove.run_cycle().unwrap();
//! assert_eq!(report.phase, CombustionPhase::AutoRegulating);
//! assert_eq!(report.schedule.target_c, 73);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Damper motion planning and servo driving.
pub mod actuator;
/// Alarm priority and one-shot latching.
pub mod alarm;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// DS18B20 1-Wire sensor protocol.
pub mod ds18b20;
/// Crate error type.
pub mod error;
/// Tier and band based gain scheduling.
pub mod gain;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Temperature history and trend detection.
pub mod history;
/// Front panel joystick decoding.
pub mod panel;
/// PID regulation and combustion phases.
pub mod regulator;
/// End-of-burn suspend policy.
pub mod sleep;
/// Main stove controller that runs the regulation cycle.
pub mod stove;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use actuator::{plan_motion, DamperActuator, MotionPlan, MotionStep, ServoGeometry};
pub use alarm::{Alarm, AlarmPolicy};
pub use error::Error;
pub use gain::{ControlTier, GainScheduler, Schedule};
pub use history::{TemperatureHistory, Trend};
pub use panel::{PanelEvent, SetpointDial};
pub use regulator::{CombustionController, CombustionPhase, ControlOutput, PidTerms};
pub use sleep::SleepPolicy;
pub use stove::{CycleReport, StoveController, StoveParts, StoveState};
pub use traits::{
    // Hardware
    AlarmDriver,
    AlarmTone,
    DamperServo,
    // Display
    DisplayFrame,
    FanRelay,
    Potentiometer,
    SleepController,
    StoveDisplay,
    TemperatureSensor,
    WakeLevel,
    WakeSource,
    SENSOR_FAULT_C,
};

// Config re-exports
pub use config::{
    ActuatorConfig, AlarmConfig, Config, DeviceConfig, PanelConfig, RegulatorConfig, SleepConfig,
};
