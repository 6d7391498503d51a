//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstractions that allow rs-damper to run on
//! different hardware (ESP32, desktop mock) without touching the regulator.
//!
//! # Submodules
//!
//! - `hardware`: temperature sensor, joystick ADC, damper servo, buzzer,
//!   fan relay, sleep controller
//! - `display`: display rendering trait and frame type

pub mod display;
pub mod hardware;

pub use display::*;
pub use hardware::*;
