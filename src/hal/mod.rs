//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `log_display`: Display sink that writes frames to the log
//! - `esp32`: ESP32-S3 stove controller board (requires `esp32` feature)

pub mod log_display;
pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use log_display::LogDisplay;
pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
