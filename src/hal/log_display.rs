//! Display that writes frames to the log.
//!
//! Used when no screen is fitted (the `display` feature is off), so the
//! regulation cycle still has a sink for its frames and the serial monitor
//! shows the same information the OLED would.

use crate::traits::{DisplayFrame, StoveDisplay};
use core::convert::Infallible;

/// [`StoveDisplay`] that logs at info level.
///
/// Only frames that differ from the previous one are logged, so a steady
/// stove does not flood the console.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: Option<DisplayFrame>,
}

impl LogDisplay {
    /// Creates a log display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoveDisplay for LogDisplay {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.last = None;
        Ok(())
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), Infallible> {
        if self.last.as_ref() != Some(frame) {
            log::info!(
                "[{}] {}C -> {}C damper {}% | {}",
                frame.label,
                frame.temperature_c,
                frame.target_c,
                frame.damper_percent,
                frame.info
            );
            self.last = Some(frame.clone());
        }
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Infallible> {
        match line2 {
            Some(l2) => log::info!("{} / {}", line1, l2),
            None => log::info!("{}", line1),
        }
        Ok(())
    }
}
