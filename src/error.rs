//! Errors raised while driving the stove's output hardware.
//!
//! Each collaborator trait has its own associated error type. The stove
//! controller flattens them into [`Error`], keeping the collaborator's debug
//! rendering as detail text so no generic parameters leak into callers.

use core::fmt::{self, Debug, Write};
use heapless::String as HString;

/// Maximum length of the detail text kept for an error.
pub const DETAIL_LEN: usize = 48;

/// Debug rendering of a collaborator error, truncated to [`DETAIL_LEN`].
pub type Detail = HString<DETAIL_LEN>;

/// Renders `err` with `{:?}` into a [`Detail`], truncating silently.
pub fn detail<E: Debug>(err: &E) -> Detail {
    let mut out = Detail::new();
    let _ = write!(Truncating(&mut out), "{:?}", err);
    out
}

struct Truncating<'a>(&'a mut Detail);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Stove controller error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The damper servo rejected a command.
    Actuator(Detail),
    /// The buzzer failed.
    Alarm(Detail),
    /// The display failed.
    Display(Detail),
    /// The fan relay failed.
    Relay(Detail),
    /// Wake configuration, suspend or restart failed.
    Power(Detail),
}

impl Error {
    /// Name of the collaborator that failed.
    pub fn source_name(&self) -> &'static str {
        match self {
            Self::Actuator(_) => "actuator",
            Self::Alarm(_) => "alarm",
            Self::Display(_) => "display",
            Self::Relay(_) => "relay",
            Self::Power(_) => "power",
        }
    }

    /// Collaborator error text.
    pub fn detail(&self) -> &str {
        match self {
            Self::Actuator(d)
            | Self::Alarm(d)
            | Self::Display(d)
            | Self::Relay(d)
            | Self::Power(d) => d.as_str(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.source_name(), self.detail())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
