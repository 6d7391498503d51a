//! Display abstraction for stove state visualization.
//!
//! This module defines the [`StoveDisplay`] trait and the [`DisplayFrame`]
//! it renders. The regulator is display-agnostic: it builds a frame each
//! cycle and hands it to whatever sink is attached.

use heapless::String as HString;

/// Maximum length of the rotating info line.
pub const INFO_LINE_LEN: usize = 24;

/// Text of the rotating info line.
pub type InfoLine = HString<INFO_LINE_LEN>;

/// Everything shown on screen for one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayFrame {
    /// Phase label ("Manual", "Auto", "Fill", "End" or "Error").
    pub label: &'static str,
    /// Measured temperature, or the sensor fault value.
    pub temperature_c: i16,
    /// Target temperature of the selected tier.
    pub target_c: i16,
    /// Damper setpoint in percent.
    pub damper_percent: u8,
    /// Alternates between fan state and damper/dial summary.
    pub info: InfoLine,
}

/// Display trait for rendering stove state.
///
/// Implementors provide hardware-specific rendering for displays like
/// SSD1306 OLED or TFT panels, or record frames for testing.
///
/// # Example
///
/// ```ignore
/// use rs_damper::traits::{DisplayFrame, StoveDisplay};
///
/// struct MyDisplay { /* ... */ }
///
/// impl StoveDisplay for MyDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn render(&mut self, frame: &DisplayFrame) -> Result<(), ()> {
///         // Draw temperature, damper percent, label...
///         Ok(())
///     }
///     fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait StoveDisplay {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Initializes the display hardware. Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Renders one cycle's frame.
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error>;

    /// Shows a simple message (e.g., for startup or before sleeping).
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
