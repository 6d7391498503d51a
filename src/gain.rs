//! Gain scheduling: dial tier and temperature to target and proportional gain.
//!
//! Each tier has a target temperature and an ordered list of temperature
//! bands with a gain each. Band bounds are exclusive on both ends, so the
//! tables leave one- or two-degree gaps between bands. A temperature inside
//! a gap (or outside every band) keeps the gain selected last time instead
//! of dropping it to zero.
//!
//! # Example
//!
//! ```rust
//! use rs_damper::gain::{ControlTier, GainScheduler};
//!
//! let mut gains = GainScheduler::new();
//! let tier = ControlTier::from_dial(120, 100);
//!
//! let schedule = gains.select(tier, 70);
//! assert_eq!(schedule.target_c, 73);
//! assert_eq!(schedule.gain, 9.0);
//!
//! // 66 sits in the gap between (61,65) and (66,100): gain is kept.
//! let schedule = gains.select(tier, 66);
//! assert!(!schedule.band_matched);
//! assert_eq!(schedule.gain, 9.0);
//! ```

/// Number of gain profiles (manual range plus automatic tiers).
pub const TIER_COUNT: usize = 5;

/// Number of automatic tiers above the manual range.
pub const AUTO_TIERS: u8 = (TIER_COUNT - 1) as u8;

/// Dial distance between consecutive automatic tiers.
pub const TIER_STEP: i16 = 10;

/// Control tier derived from the dial value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ControlTier {
    /// Damper follows the dial directly; `dial` is the requested percent.
    Manual {
        /// Dial value, 0..=manual threshold.
        dial: i16,
    },
    /// Automatic regulation at tier `level` (1 = lowest target).
    Auto {
        /// Tier number, 1..=[`AUTO_TIERS`].
        level: u8,
    },
}

impl ControlTier {
    /// Maps a dial value to a tier.
    ///
    /// Values at or below `manual_threshold` are manual. Above it, every
    /// [`TIER_STEP`] selects the next automatic tier, saturating at the top.
    pub fn from_dial(dial: i16, manual_threshold: i16) -> Self {
        if dial <= manual_threshold {
            return ControlTier::Manual { dial };
        }
        let above = i32::from(dial) - i32::from(manual_threshold);
        let level = ((above + i32::from(TIER_STEP) - 1) / i32::from(TIER_STEP))
            .clamp(1, i32::from(AUTO_TIERS));
        ControlTier::Auto { level: level as u8 }
    }

    /// Returns true for the manual range.
    #[inline]
    pub const fn is_manual(&self) -> bool {
        matches!(self, ControlTier::Manual { .. })
    }

    /// Index into the profile table.
    #[inline]
    pub const fn profile_index(&self) -> usize {
        match self {
            ControlTier::Manual { .. } => 0,
            ControlTier::Auto { level } => *level as usize,
        }
    }
}

/// One `(low, high) -> gain` entry. Both bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainBand {
    /// Temperatures must be strictly above this.
    pub low: i16,
    /// Temperatures must be strictly below this.
    pub high: i16,
    /// Proportional gain for the band.
    pub gain: f32,
}

impl GainBand {
    /// Creates a band.
    pub const fn new(low: i16, high: i16, gain: f32) -> Self {
        Self { low, high, gain }
    }

    /// Returns true if `temperature` lies strictly inside the band.
    #[inline]
    pub const fn contains(&self, temperature: i16) -> bool {
        temperature > self.low && temperature < self.high
    }
}

/// Target temperature and gain bands for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainProfile {
    /// Target temperature in degrees Celsius.
    pub target_c: i16,
    /// Bands evaluated in order; the last match wins.
    pub bands: &'static [GainBand],
}

impl GainProfile {
    /// Gain of the last band containing `temperature`, if any.
    pub fn gain_for(&self, temperature: i16) -> Option<f32> {
        self.bands
            .iter()
            .rev()
            .find(|band| band.contains(temperature))
            .map(|band| band.gain)
    }
}

const MANUAL_BANDS: [GainBand; 4] = [
    GainBand::new(0, 40, 2.0),
    GainBand::new(41, 55, 4.0),
    GainBand::new(56, 60, 7.0),
    GainBand::new(61, 100, 9.0),
];

const TIER1_BANDS: [GainBand; 4] = [
    GainBand::new(0, 50, 2.0),
    GainBand::new(51, 55, 4.0),
    GainBand::new(56, 62, 5.0),
    GainBand::new(63, 100, 9.0),
];

const TIER2_BANDS: [GainBand; 5] = [
    GainBand::new(0, 50, 2.0),
    GainBand::new(51, 55, 4.0),
    GainBand::new(56, 60, 6.0),
    GainBand::new(61, 65, 7.0),
    GainBand::new(66, 100, 9.0),
];

const TIER4_BANDS: [GainBand; 5] = [
    GainBand::new(0, 50, 2.0),
    GainBand::new(51, 60, 4.0),
    GainBand::new(61, 68, 6.0),
    GainBand::new(69, 73, 8.0),
    GainBand::new(76, 100, 9.0),
];

/// Factory profiles: manual range (dial ≤ 100) then dial 110, 120, 130, 140.
pub const DEFAULT_PROFILES: [GainProfile; TIER_COUNT] = [
    GainProfile {
        target_c: 65,
        bands: &MANUAL_BANDS,
    },
    GainProfile {
        target_c: 67,
        bands: &TIER1_BANDS,
    },
    GainProfile {
        target_c: 73,
        bands: &TIER2_BANDS,
    },
    GainProfile {
        target_c: 75,
        bands: &TIER2_BANDS,
    },
    GainProfile {
        target_c: 79,
        bands: &TIER4_BANDS,
    },
];

/// Result of one scheduling step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Target temperature of the active tier.
    pub target_c: i16,
    /// Proportional gain in effect this cycle.
    pub gain: f32,
    /// False if the temperature matched no band and the gain was carried over.
    pub band_matched: bool,
}

/// Stateful gain scheduler.
///
/// The selected gain persists across cycles; it starts at zero until the
/// first band matches.
#[derive(Clone, Debug)]
pub struct GainScheduler {
    profiles: [GainProfile; TIER_COUNT],
    gain: f32,
}

impl GainScheduler {
    /// Creates a scheduler with the factory profiles.
    pub fn new() -> Self {
        Self::with_profiles(DEFAULT_PROFILES)
    }

    /// Creates a scheduler with custom profiles.
    pub fn with_profiles(profiles: [GainProfile; TIER_COUNT]) -> Self {
        Self {
            profiles,
            gain: 0.0,
        }
    }

    /// Selects target and gain for `tier` at `temperature`.
    pub fn select(&mut self, tier: ControlTier, temperature: i16) -> Schedule {
        let profile = &self.profiles[tier.profile_index()];
        let band_matched = match profile.gain_for(temperature) {
            Some(gain) => {
                self.gain = gain;
                true
            }
            None => {
                log::debug!(
                    "no gain band for {}C in tier {:?}, keeping gain {}",
                    temperature,
                    tier,
                    self.gain
                );
                false
            }
        };
        Schedule {
            target_c: profile.target_c,
            gain: self.gain,
            band_matched,
        }
    }

    /// Gain selected by the last call to [`select`](Self::select).
    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Profile used for `tier`.
    pub fn profile(&self, tier: ControlTier) -> &GainProfile {
        &self.profiles[tier.profile_index()]
    }
}

impl Default for GainScheduler {
    fn default() -> Self {
        Self::new()
    }
}
