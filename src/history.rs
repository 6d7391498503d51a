//! Temperature trend buffer used to detect fuel reloads.
//!
//! Keeps the last [`DEPTH`] samples, newest first, and compares the mean of
//! the [`RECENT_WINDOW`] newest samples against the mean of the older ones.
//! A higher recent mean means the fire picked up again, which is how a
//! refill is inferred without a door switch.

/// Number of samples kept.
pub const DEPTH: usize = 10;

/// Number of newest samples in the "recent" window. The remaining
/// `DEPTH - RECENT_WINDOW` samples form the "older" window.
pub const RECENT_WINDOW: usize = 6;

/// Direction of the temperature trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Trend {
    /// Recent samples average above the older ones.
    Climbing,
    /// Recent samples average at or below the older ones.
    Falling,
}

/// Fixed-depth temperature history, newest sample at index 0.
#[derive(Clone, Debug, Default)]
pub struct TemperatureHistory {
    samples: [i16; DEPTH],
}

impl TemperatureHistory {
    /// Creates a zero-filled history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts `sample` in and returns the resulting trend.
    pub fn update(&mut self, sample: i16) -> Trend {
        self.samples.copy_within(0..DEPTH - 1, 1);
        self.samples[0] = sample;
        self.trend()
    }

    /// Trend of the samples currently held.
    pub fn trend(&self) -> Trend {
        let (recent, older) = self.samples.split_at(RECENT_WINDOW);
        if mean(recent) > mean(older) {
            Trend::Climbing
        } else {
            Trend::Falling
        }
    }

    /// Samples, newest first.
    pub fn samples(&self) -> &[i16; DEPTH] {
        &self.samples
    }
}

fn mean(window: &[i16]) -> f32 {
    let sum: i32 = window.iter().map(|&s| i32::from(s)).sum();
    sum as f32 / window.len() as f32
}
