//! Audible alarm selection.
//!
//! At most one tone plays per cycle, chosen by priority:
//! sensor fault, overheat, end of burn, refill. Fault and overheat repeat
//! every cycle while the condition holds. Refill and end-of-burn sound once
//! per entry into their phase and re-arm when regulation returns to manual
//! or normal automatic operation.

use crate::config::AlarmConfig;
use crate::regulator::CombustionPhase;
use crate::traits::AlarmTone;

/// Alarm condition, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alarm {
    /// Temperature could not be read.
    SensorFault,
    /// Stove above the overheat limit.
    Overheat,
    /// Fuel exhausted.
    EndOfBurn,
    /// Fuel should be added.
    Refill,
}

impl Alarm {
    /// Tone configured for this alarm.
    pub fn tone(self, config: &AlarmConfig) -> AlarmTone {
        match self {
            Alarm::SensorFault => config.fault_tone,
            Alarm::Overheat => config.overheat_tone,
            Alarm::EndOfBurn => config.end_tone,
            Alarm::Refill => config.refill_tone,
        }
    }
}

/// Picks the alarm for each cycle and remembers which one-shot alarms
/// already sounded.
#[derive(Clone, Debug)]
pub struct AlarmPolicy {
    config: AlarmConfig,
    refill_sounded: bool,
    end_sounded: bool,
}

impl AlarmPolicy {
    /// Creates a policy with both latches armed.
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            refill_sounded: false,
            end_sounded: false,
        }
    }

    /// Tone configuration.
    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    /// Selects this cycle's alarm, if any.
    pub fn select(
        &mut self,
        sensor_fault: bool,
        temperature: i16,
        phase: CombustionPhase,
    ) -> Option<Alarm> {
        if matches!(phase, CombustionPhase::Manual | CombustionPhase::AutoRegulating) {
            self.refill_sounded = false;
            self.end_sounded = false;
        }

        if sensor_fault {
            return Some(Alarm::SensorFault);
        }
        if temperature > self.config.overheat_c {
            return Some(Alarm::Overheat);
        }
        match phase {
            CombustionPhase::EndOfBurn if !self.end_sounded => {
                self.end_sounded = true;
                Some(Alarm::EndOfBurn)
            }
            CombustionPhase::RefillPending if !self.refill_sounded => {
                self.refill_sounded = true;
                Some(Alarm::Refill)
            }
            _ => None,
        }
    }
}
