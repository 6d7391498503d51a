//! SSD1306 OLED display implementation for ESP32.
//!
//! Provides a 128x64 pixel display for showing stove state including:
//! - Damper opening bar graph
//! - Measured and target temperature
//! - Phase label ("Auto", "Fill", "End", "Manual" or "Error")
//! - Rotating info line (fan state or damper/dial summary)
//!
//! # Wiring
//!
//! - SDA → GPIO8
//! - SCL → GPIO9
//! - VCC → 3.3V
//! - GND → GND

use crate::traits::{DisplayFrame, StoveDisplay};
use core::fmt::Write;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};
use esp_idf_hal::i2c::I2cDriver;
use heapless::String as HString;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

/// SSD1306 display type alias for cleaner code.
type DisplayDriver<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// SSD1306 OLED display for ESP32.
///
/// # Display Layout
///
/// ```text
/// ┌────────────────────────────┐
/// │█████████████░░░░░░░░░░░░░░░│  Damper bar (top)
/// │ Auto             -> 73C    │
/// │ 71C                        │  Temperature (large)
/// │ Dmp 32% Pot 120            │  Info line
/// └────────────────────────────┘
/// ```
pub struct Esp32Display<'d> {
    display: DisplayDriver<'d>,
}

impl<'d> Esp32Display<'d> {
    /// Creates a new display instance on an I2C bus.
    pub fn new(i2c: I2cDriver<'d>) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Ok(Self { display })
    }
}

impl StoveDisplay for Esp32Display<'_> {
    type Error = DisplayError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.display.init()?;
        self.clear()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;
        self.display.flush()?;
        Ok(())
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let fill_style = PrimitiveStyle::with_fill(BinaryColor::On);

        // 120 px wide at 100%
        let bar_width = u32::from(frame.damper_percent.min(100)) * 120 / 100;
        if bar_width > 0 {
            Rectangle::new(Point::new(4, 2), Size::new(bar_width, 6))
                .into_styled(fill_style)
                .draw(&mut self.display)?;
        }

        Text::new(frame.label, Point::new(4, 20), small).draw(&mut self.display)?;

        let mut target: HString<12> = HString::new();
        let _ = write!(target, "-> {}C", frame.target_c);
        Text::new(&target, Point::new(80, 20), small).draw(&mut self.display)?;

        let mut temp: HString<8> = HString::new();
        let _ = write!(temp, "{}C", frame.temperature_c);
        Text::new(&temp, Point::new(4, 42), large).draw(&mut self.display)?;

        Text::new(&frame.info, Point::new(4, 60), small).draw(&mut self.display)?;

        self.display.flush()?;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        Text::new(line1, Point::new(4, 24), text_style).draw(&mut self.display)?;

        if let Some(l2) = line2 {
            Text::new(l2, Point::new(4, 40), text_style).draw(&mut self.display)?;
        }

        self.display.flush()?;
        Ok(())
    }
}

/// Display error type.
#[derive(Debug)]
pub struct DisplayError;

impl From<display_interface::DisplayError> for DisplayError {
    fn from(_: display_interface::DisplayError) -> Self {
        DisplayError
    }
}
