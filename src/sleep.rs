//! End-of-burn suspend policy.
//!
//! Once the controller reports a cold, burnt-out stove the device has
//! nothing left to regulate. [`SleepPolicy`] decides whether to suspend and
//! runs the suspend sequence: final message, short delay, wake source, deep
//! sleep. Waking restarts the firmware, which picks manual or automatic
//! regulation from the dial again.

use crate::config::SleepConfig;
use crate::traits::{SleepController, WakeSource};
use embedded_hal::delay::DelayNs;

/// Decides when to suspend and how.
#[derive(Clone, Debug)]
pub struct SleepPolicy {
    config: SleepConfig,
}

impl SleepPolicy {
    /// Creates a policy from configuration.
    pub fn new(config: SleepConfig) -> Self {
        Self { config }
    }

    /// Returns true if the device should suspend after this cycle.
    #[inline]
    pub fn should_sleep(&self, sleep_flag: bool) -> bool {
        sleep_flag && self.config.enabled
    }

    /// Wake source armed before suspending.
    #[inline]
    pub fn wake_source(&self) -> WakeSource {
        self.config.wake
    }

    /// Arms the wake source and suspends.
    ///
    /// Must be the last action of a cycle. On hardware this does not return.
    pub fn suspend<Z, D>(&self, power: &mut Z, delay: &mut D) -> Result<(), Z::Error>
    where
        Z: SleepController,
        D: DelayNs,
    {
        log::info!(
            "burn finished, suspending until pin {} goes {:?}",
            self.config.wake.pin,
            self.config.wake.level
        );
        delay.delay_ms(self.config.final_delay_ms);
        power.configure_wake(self.config.wake)?;
        power.suspend()
    }
}
