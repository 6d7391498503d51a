//! Combustion regulation: PID feedback, refill and end-of-burn phases.
//!
//! This module provides [`CombustionController`], which turns the scheduled
//! target and gain into a damper setpoint once per cycle.
//!
//! # Phases
//!
//! | Phase | Entered when |
//! |-------|--------------|
//! | [`Manual`](CombustionPhase::Manual) | Dial is in the manual range |
//! | [`AutoRegulating`](CombustionPhase::AutoRegulating) | Integral below the refill threshold |
//! | [`RefillPending`](CombustionPhase::RefillPending) | Integral above the refill threshold |
//! | [`EndOfBurn`](CombustionPhase::EndOfBurn) | Integral at or above the end threshold |
//!
//! Refill and end phases are not sticky: the guards are evaluated from the
//! current integral every cycle, so clearing the integral after a detected
//! refill drops the controller back to automatic regulation.
//!
//! # Example
//!
//! ```rust
//! use rs_damper::config::RegulatorConfig;
//! use rs_damper::gain::{ControlTier, GainScheduler};
//! use rs_damper::regulator::{CombustionController, CombustionPhase};
//!
//! let tier = ControlTier::from_dial(120, 100);
//! let mut gains = GainScheduler::new();
//! let mut controller = CombustionController::new(RegulatorConfig::default(), tier);
//!
//! let schedule = gains.select(tier, 70);
//! let output = controller.step(tier, schedule, 70);
//! assert_eq!(output.phase, CombustionPhase::AutoRegulating);
//! assert_eq!(output.damper, 32);
//! ```

use crate::config::RegulatorConfig;
use crate::gain::{ControlTier, Schedule};
use crate::history::{TemperatureHistory, Trend};

/// Combustion phase for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombustionPhase {
    /// User drives the damper directly.
    Manual,
    /// PID regulation toward the tier target.
    #[default]
    AutoRegulating,
    /// Fuel is running low; waiting for a reload.
    RefillPending,
    /// Fuel is spent; the damper closes once the stove cools down.
    EndOfBurn,
}

impl CombustionPhase {
    /// Short label for the display.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            CombustionPhase::Manual => "Manual",
            CombustionPhase::AutoRegulating => "Auto",
            CombustionPhase::RefillPending => "Fill",
            CombustionPhase::EndOfBurn => "End",
        }
    }

    /// Returns true for the automatic phases.
    #[inline]
    pub const fn is_auto(&self) -> bool {
        !matches!(self, CombustionPhase::Manual)
    }
}

/// PID error terms carried between cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidTerms {
    /// Proportional error, `target - temperature`.
    pub err_p: f32,
    /// Accumulated proportional error.
    pub err_i: f32,
    /// Change of the proportional error since the previous cycle.
    pub err_d: f32,
    /// Proportional error of the previous automatic cycle.
    pub err_prev: f32,
}

/// Result of one controller step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlOutput {
    /// Phase after this cycle's transitions.
    pub phase: CombustionPhase,
    /// Damper setpoint in percent, always within the configured limits.
    pub damper: u8,
    /// Set when the burn has ended and the stove is cold.
    pub sleep: bool,
    /// Trend reported by the history; `None` in manual cycles.
    pub trend: Option<Trend>,
    /// True if a climbing trend cleared the integral this cycle.
    pub refill_detected: bool,
}

/// PID damper controller with refill and end-of-burn detection.
///
/// Owns the error accumulators and the temperature history. Call
/// [`step`](Self::step) once per cycle.
#[derive(Clone, Debug)]
pub struct CombustionController {
    config: RegulatorConfig,
    terms: PidTerms,
    history: TemperatureHistory,
    phase: CombustionPhase,
    damper: u8,
}

impl CombustionController {
    /// Creates a controller with zeroed accumulators.
    ///
    /// The initial phase is manual or automatic depending on `tier`.
    pub fn new(config: RegulatorConfig, tier: ControlTier) -> Self {
        let phase = if tier.is_manual() {
            CombustionPhase::Manual
        } else {
            CombustionPhase::AutoRegulating
        };
        Self {
            config,
            terms: PidTerms::default(),
            history: TemperatureHistory::new(),
            phase,
            damper: 0,
        }
    }

    /// Runs one control cycle.
    ///
    /// `temperature` may be the sensor fault value; it is used as-is.
    pub fn step(&mut self, tier: ControlTier, schedule: Schedule, temperature: i16) -> ControlOutput {
        let previous = self.phase;
        let output = match tier {
            ControlTier::Manual { dial } => self.step_manual(dial),
            ControlTier::Auto { .. } => self.step_auto(schedule, temperature),
        };

        if output.phase != previous {
            log::info!(
                "phase {:?} -> {:?} (errI {:.0}, {}C)",
                previous,
                output.phase,
                self.terms.err_i,
                temperature
            );
        }
        if output.refill_detected {
            log::info!("refill detected at {}C, integral cleared", temperature);
        }

        self.phase = output.phase;
        self.damper = output.damper;
        output
    }

    fn step_manual(&mut self, dial: i16) -> ControlOutput {
        self.terms.err_i = 0.0;
        self.terms.err_d = 0.0;

        // round(dial * max / 100) in integer arithmetic
        let dial = i32::from(dial.max(0));
        let scaled = (dial * i32::from(self.config.max_damper) + 50) / 100;
        let damper = self.clamp_percent(scaled as f32);

        ControlOutput {
            phase: CombustionPhase::Manual,
            damper,
            sleep: false,
            trend: None,
            refill_detected: false,
        }
    }

    fn step_auto(&mut self, schedule: Schedule, temperature: i16) -> ControlOutput {
        let terms = &mut self.terms;
        terms.err_p = f32::from(schedule.target_c) - f32::from(temperature);
        terms.err_i += terms.err_p;
        terms.err_d = terms.err_p - terms.err_prev;
        terms.err_prev = terms.err_p;

        // Coefficients follow the gain selected this cycle.
        let k_p = schedule.gain;
        let k_i = schedule.gain / self.config.tau_i;
        let k_d = schedule.gain / self.config.tau_d;
        let raw = k_p * terms.err_p + k_i * terms.err_i + k_d * terms.err_d;
        let mut damper = self.clamp_percent(raw);

        log::debug!(
            "pid target {} temp {} gain {} errP {} errI {} errD {} -> {:.1}",
            schedule.target_c,
            temperature,
            schedule.gain,
            self.terms.err_p,
            self.terms.err_i,
            self.terms.err_d,
            raw
        );

        let trend = self.history.update(temperature);
        let climbing = trend == Trend::Climbing;
        let mut sleep = false;
        let mut refill_detected = false;

        let phase = if self.terms.err_i >= self.config.end_threshold {
            if temperature < self.config.min_operating_c {
                damper = 0;
                sleep = true;
            }
            if climbing {
                // Late reload: next cycle re-evaluates from a clear integral.
                self.terms.err_i = 0.0;
                refill_detected = true;
            }
            CombustionPhase::EndOfBurn
        } else if self.terms.err_i > self.config.refill_threshold {
            if climbing {
                self.terms.err_i = 0.0;
                refill_detected = true;
                CombustionPhase::AutoRegulating
            } else {
                CombustionPhase::RefillPending
            }
        } else {
            CombustionPhase::AutoRegulating
        };

        ControlOutput {
            phase,
            damper,
            sleep,
            trend: Some(trend),
            refill_detected,
        }
    }

    fn clamp_percent(&self, value: f32) -> u8 {
        // Limits may come straight from deserialised fields.
        let max = self.config.max_damper.min(100);
        let min = self.config.min_damper.min(max);
        let (min, max) = (f32::from(min), f32::from(max));
        // Truncation after clamping; NaN saturates to 0.
        value.clamp(min, max) as u8
    }

    /// Phase after the last step.
    #[inline]
    pub fn phase(&self) -> CombustionPhase {
        self.phase
    }

    /// Damper setpoint computed by the last step.
    #[inline]
    pub fn damper(&self) -> u8 {
        self.damper
    }

    /// Current PID terms.
    #[inline]
    pub fn terms(&self) -> PidTerms {
        self.terms
    }

    /// Temperature history used for refill detection.
    #[inline]
    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    /// Regulator configuration.
    #[inline]
    pub fn config(&self) -> &RegulatorConfig {
        &self.config
    }
}
