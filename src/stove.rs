//! Stove controller that ties the regulation cycle together.
//!
//! This module provides [`StoveController`], which owns every collaborator
//! and the regulation state, and runs one fixed-order cycle per call:
//!
//! 1. Read the joystick and apply dial, fan or restart input
//! 2. Read the temperature, normalising faults to [`SENSOR_FAULT_C`]
//! 3. Schedule target and gain, then step the PID regulator
//! 4. Sound at most one alarm
//! 5. Render the display frame
//! 6. Drive the damper through its motion plan
//! 7. Suspend if the burn has finished
//!
//! # Example
//!
//! ```rust
//! use rs_damper::hal::{MockSensor, MockStove};
//! use rs_damper::regulator::CombustionPhase;
//! use rs_damper::Config;
//!
//! // Dial starts at 120: automatic tier 2, target 73
//! let mut stove = MockStove::with_mocks(Config::default(), MockSensor::new(70));
//! stove.start().unwrap();
//!
//! let report = stove.run_cycle().unwrap();
//! assert_eq!(report.phase, CombustionPhase::AutoRegulating);
//! assert_eq!(report.damper, 32);
//! assert_eq!(stove.parts().servo.angles().last(), Some(&36));
//! ```
//!
//! # Sensor Faults
//!
//! A failed or negative reading is not an error: the cycle continues with
//! the fault value, the display shows "Error" and the fault alarm sounds.
//!
//! ```rust
//! use rs_damper::hal::{MockSensor, MockStove};
//! use rs_damper::Config;
//!
//! let mut sensor = MockSensor::new(70);
//! sensor.push_error();
//! let mut stove = MockStove::with_mocks(Config::default(), sensor);
//!
//! let report = stove.run_cycle().unwrap();
//! assert!(report.sensor_fault);
//! assert_eq!(report.temperature_c, -1);
//! assert_eq!(stove.parts().display.last_frame().unwrap().label, "Error");
//! ```

use core::fmt::{Debug, Write};

use crate::actuator::DamperActuator;
use crate::alarm::{Alarm, AlarmPolicy};
use crate::config::Config;
use crate::error::{detail, Detail, Error};
use crate::gain::{ControlTier, GainScheduler, Schedule};
use crate::panel::{PanelEvent, SetpointDial};
use crate::regulator::{CombustionController, CombustionPhase, PidTerms};
use crate::sleep::SleepPolicy;
use crate::traits::{
    AlarmDriver, DamperServo, DisplayFrame, FanRelay, InfoLine, Potentiometer, SleepController,
    StoveDisplay, TemperatureSensor, SENSOR_FAULT_C,
};
use embedded_hal::delay::DelayNs;

/// Phase label shown while the sensor is faulted.
pub const FAULT_LABEL: &str = "Error";

/// Hardware collaborators owned by the controller.
///
/// Fields are public so callers (and tests) can inspect or swap parts
/// through [`StoveController::parts`] and [`StoveController::parts_mut`].
pub struct StoveParts<T, P, S, A, F, Z, V, D> {
    /// Stove temperature sensor.
    pub sensor: T,
    /// Front panel joystick.
    pub joystick: P,
    /// Damper servo.
    pub servo: S,
    /// Buzzer.
    pub alarm: A,
    /// Blower fan relay.
    pub relay: F,
    /// Deep sleep and restart.
    pub power: Z,
    /// Screen.
    pub display: V,
    /// Blocking delay used for servo pacing and the sleep transition.
    pub delay: D,
}

/// What happened during one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Joystick event decoded this cycle.
    pub event: PanelEvent,
    /// Dial value after applying the event.
    pub dial: i16,
    /// True if the cycle ended in a restart request. The regulation fields
    /// then repeat the previous cycle's values.
    pub restarted: bool,
    /// Temperature used for regulation.
    pub temperature_c: i16,
    /// True if the temperature is the fault value.
    pub sensor_fault: bool,
    /// Target and gain in effect.
    pub schedule: Schedule,
    /// Phase after this cycle.
    pub phase: CombustionPhase,
    /// Damper setpoint in percent.
    pub damper: u8,
    /// Alarm sounded this cycle.
    pub alarm: Option<Alarm>,
    /// Number of servo steps executed.
    pub motion_steps: usize,
    /// True if the device was suspended at the end of the cycle.
    pub slept: bool,
}

/// Full state snapshot for logging or a status screen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoveState {
    /// Current dial value.
    pub dial: i16,
    /// Tier selected by the dial.
    pub tier: ControlTier,
    /// Regulation phase.
    pub phase: CombustionPhase,
    /// Last temperature used, if a cycle has run.
    pub temperature_c: Option<i16>,
    /// Whether the last reading was a fault.
    pub sensor_fault: bool,
    /// Damper setpoint from the last cycle.
    pub damper: u8,
    /// Position the servo was last driven to.
    pub servo_position: u8,
    /// Gain currently selected.
    pub gain: f32,
    /// PID terms.
    pub terms: PidTerms,
    /// Blower fan relay state.
    pub fan_on: bool,
}

/// Main stove controller.
///
/// # Type Parameters
///
/// - `T`: [`TemperatureSensor`]
/// - `P`: [`Potentiometer`] (joystick)
/// - `S`: [`DamperServo`]
/// - `A`: [`AlarmDriver`]
/// - `F`: [`FanRelay`]
/// - `Z`: [`SleepController`]
/// - `V`: [`StoveDisplay`]
/// - `D`: [`DelayNs`]
pub struct StoveController<T, P, S, A, F, Z, V, D> {
    config: Config,
    parts: StoveParts<T, P, S, A, F, Z, V, D>,
    dial: SetpointDial,
    gains: GainScheduler,
    regulator: CombustionController,
    actuator: DamperActuator,
    alarms: AlarmPolicy,
    sleep: SleepPolicy,
    odd_cycle: bool,
    last: Option<CycleReport>,
}

fn hardware<E: Debug>(kind: fn(Detail) -> Error) -> impl FnOnce(E) -> Error {
    move |e| {
        let err = kind(detail(&e));
        log::warn!("{}", err);
        err
    }
}

impl<T, P, S, A, F, Z, V, D> StoveController<T, P, S, A, F, Z, V, D>
where
    T: TemperatureSensor,
    P: Potentiometer,
    S: DamperServo,
    A: AlarmDriver,
    F: FanRelay,
    Z: SleepController,
    V: StoveDisplay,
    D: DelayNs,
{
    /// Creates a controller. The initial phase follows the configured dial.
    pub fn new(config: Config, parts: StoveParts<T, P, S, A, F, Z, V, D>) -> Self {
        let dial = SetpointDial::new(&config.panel);
        let tier = dial.tier(config.regulator.manual_threshold);
        Self {
            dial,
            gains: GainScheduler::new(),
            regulator: CombustionController::new(config.regulator.clone(), tier),
            actuator: DamperActuator::new(config.actuator.clone()),
            alarms: AlarmPolicy::new(config.alarm.clone()),
            sleep: SleepPolicy::new(config.sleep.clone()),
            config,
            parts,
            odd_cycle: false,
            last: None,
        }
    }

    /// Replaces the gain scheduler, e.g. to use custom profiles.
    pub fn with_gains(mut self, gains: GainScheduler) -> Self {
        self.gains = gains;
        self
    }

    /// Boot sequence: initialise the display, show a splash and park the
    /// servo at its start angle.
    pub fn start(&mut self) -> Result<(), Error> {
        let parts = &mut self.parts;
        parts.display.init().map_err(hardware(Error::Display))?;
        parts
            .display
            .show_message(self.config.device.name.as_str(), Some("Starting"))
            .map_err(hardware(Error::Display))?;
        self.actuator
            .park(&mut parts.servo)
            .map_err(hardware(Error::Actuator))?;
        log::info!(
            "{} started, dial {} ({:?})",
            self.config.device.name,
            self.dial.value(),
            self.tier()
        );
        Ok(())
    }

    /// Runs one regulation cycle.
    ///
    /// Hardware errors from output collaborators abort the rest of the
    /// cycle; the next call starts a fresh cycle.
    pub fn run_cycle(&mut self) -> Result<CycleReport, Error> {
        let event = self.read_panel();
        if let Some(report) = self.apply_panel(event)? {
            return Ok(report);
        }

        let (temperature, sensor_fault) = self.read_temperature();

        let tier = self.tier();
        let schedule = self.gains.select(tier, temperature);
        let output = self.regulator.step(tier, schedule, temperature);

        let alarm = self.alarms.select(sensor_fault, temperature, output.phase);
        if let Some(alarm) = alarm {
            log::info!("alarm {:?}", alarm);
            self.parts
                .alarm
                .sound(alarm.tone(self.alarms.config()))
                .map_err(hardware(Error::Alarm))?;
        }

        let frame = self.frame(&schedule, output.phase, output.damper, temperature, sensor_fault);
        self.parts
            .display
            .render(&frame)
            .map_err(hardware(Error::Display))?;

        let plan = self
            .actuator
            .drive(&mut self.parts.servo, &mut self.parts.delay, output.damper)
            .map_err(hardware(Error::Actuator))?;

        let slept = self.sleep.should_sleep(output.sleep);
        if slept {
            self.parts
                .display
                .show_message("Burn finished", Some("Sleeping"))
                .map_err(hardware(Error::Display))?;
            self.sleep
                .suspend(&mut self.parts.power, &mut self.parts.delay)
                .map_err(hardware(Error::Power))?;
        }

        self.odd_cycle = !self.odd_cycle;

        let report = CycleReport {
            event,
            dial: self.dial.value(),
            restarted: false,
            temperature_c: temperature,
            sensor_fault,
            schedule,
            phase: output.phase,
            damper: output.damper,
            alarm,
            motion_steps: plan.len(),
            slept,
        };
        self.last = Some(report.clone());
        Ok(report)
    }

    fn read_panel(&mut self) -> PanelEvent {
        match self.parts.joystick.read_raw() {
            Ok(raw) => PanelEvent::classify(&self.config.panel, raw),
            Err(e) => {
                log::warn!("joystick read failed: {:?}", e);
                PanelEvent::Idle
            }
        }
    }

    /// Applies side inputs. Returns a report if the cycle ends here.
    fn apply_panel(&mut self, event: PanelEvent) -> Result<Option<CycleReport>, Error> {
        match event {
            PanelEvent::DialUp | PanelEvent::DialDown => {
                if self.dial.apply(event) {
                    log::info!("dial {} ({:?})", self.dial.value(), self.tier());
                }
            }
            PanelEvent::FanOn | PanelEvent::FanOff => {
                let on = event == PanelEvent::FanOn;
                if self.parts.relay.is_on() != on {
                    log::info!("fan {}", if on { "on" } else { "off" });
                }
                self.parts
                    .relay
                    .set_on(on)
                    .map_err(hardware(Error::Relay))?;
            }
            PanelEvent::Restart => {
                log::info!("restart requested from panel");
                if let Err(e) = self.parts.display.show_message("Restarting", None) {
                    log::warn!("display error before restart: {:?}", e);
                }
                self.parts
                    .power
                    .restart()
                    .map_err(hardware(Error::Power))?;
                return Ok(Some(self.restart_report()));
            }
            PanelEvent::Idle => {}
        }
        Ok(None)
    }

    fn restart_report(&self) -> CycleReport {
        let mut report = self.last.clone().unwrap_or_else(|| CycleReport {
            event: PanelEvent::Restart,
            dial: self.dial.value(),
            restarted: true,
            temperature_c: SENSOR_FAULT_C,
            sensor_fault: true,
            schedule: Schedule {
                target_c: self.gains.profile(self.tier()).target_c,
                gain: self.gains.gain(),
                band_matched: false,
            },
            phase: self.regulator.phase(),
            damper: self.regulator.damper(),
            alarm: None,
            motion_steps: 0,
            slept: false,
        });
        report.event = PanelEvent::Restart;
        report.restarted = true;
        report.alarm = None;
        report.motion_steps = 0;
        report.slept = false;
        report
    }

    fn read_temperature(&mut self) -> (i16, bool) {
        match self.parts.sensor.read_celsius() {
            Ok(t) if t >= 0 => (t, false),
            Ok(t) => {
                log::warn!("sensor reported {}C, treating as fault", t);
                (SENSOR_FAULT_C, true)
            }
            Err(e) => {
                log::warn!("sensor read failed: {:?}", e);
                (SENSOR_FAULT_C, true)
            }
        }
    }

    fn frame(
        &self,
        schedule: &Schedule,
        phase: CombustionPhase,
        damper: u8,
        temperature: i16,
        sensor_fault: bool,
    ) -> DisplayFrame {
        let mut info = InfoLine::new();
        let _ = if self.odd_cycle {
            let fan = if self.parts.relay.is_on() {
                "FAN ON"
            } else {
                "FAN OFF"
            };
            info.write_str(fan)
        } else {
            write!(info, "Dmp {}% Pot {}", damper, self.dial.value())
        };

        DisplayFrame {
            label: if sensor_fault {
                FAULT_LABEL
            } else {
                phase.label()
            },
            temperature_c: temperature,
            target_c: schedule.target_c,
            damper_percent: damper,
            info,
        }
    }

    /// Tier selected by the current dial value.
    pub fn tier(&self) -> ControlTier {
        self.dial.tier(self.config.regulator.manual_threshold)
    }

    /// Current dial value.
    pub fn dial(&self) -> i16 {
        self.dial.value()
    }

    /// Regulator state.
    pub fn regulator(&self) -> &CombustionController {
        &self.regulator
    }

    /// Position the servo was last driven to.
    pub fn servo_position(&self) -> u8 {
        self.actuator.position()
    }

    /// Report of the last completed cycle.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last.as_ref()
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hardware collaborators.
    pub fn parts(&self) -> &StoveParts<T, P, S, A, F, Z, V, D> {
        &self.parts
    }

    /// Hardware collaborators, mutably.
    pub fn parts_mut(&mut self) -> &mut StoveParts<T, P, S, A, F, Z, V, D> {
        &mut self.parts
    }

    /// Gets the current state for logging or UI.
    pub fn state(&self) -> StoveState {
        let last = self.last.as_ref();
        StoveState {
            dial: self.dial.value(),
            tier: self.tier(),
            phase: self.regulator.phase(),
            temperature_c: last.map(|r| r.temperature_c),
            sensor_fault: last.map(|r| r.sensor_fault).unwrap_or(false),
            damper: self.regulator.damper(),
            servo_position: self.actuator.position(),
            gain: self.gains.gain(),
            terms: self.regulator.terms(),
            fan_on: self.parts.relay.is_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, PanelConfig};
    use crate::gain::ControlTier;
    use crate::hal::{MockSensor, MockStove, ServoEvent};
    use crate::panel::PanelEvent;
    use crate::regulator::CombustionPhase;

    fn stove(temperature: i16) -> MockStove {
        MockStove::with_mocks(Config::default(), MockSensor::new(temperature))
    }

    #[test]
    fn start_parks_and_splashes() {
        let mut s = stove(20);
        s.start().unwrap();
        let parts = s.parts();
        assert!(parts.display.initialized);
        assert_eq!(
            parts.display.last_message.as_ref().map(|(l1, _)| l1.as_str()),
            Some("rs-damper")
        );
        assert!(parts.servo.events.contains(&ServoEvent::Angle(50)));
        assert_eq!(s.servo_position(), 0);
    }

    #[test]
    fn auto_cycle_drives_servo() {
        let mut s = stove(70);
        let report = s.run_cycle().unwrap();
        assert_eq!(report.schedule.target_c, 73);
        assert_eq!(report.damper, 32);
        assert_eq!(report.motion_steps, 32);
        assert_eq!(s.servo_position(), 32);
        assert!(!s.parts().servo.powered);
    }

    #[test]
    fn info_line_alternates() {
        let mut s = stove(70);
        s.run_cycle().unwrap();
        s.run_cycle().unwrap();
        s.run_cycle().unwrap();
        let frames = &s.parts().display.frames;
        assert!(frames[0].info.starts_with("Dmp "));
        assert!(frames[0].info.ends_with("Pot 120"));
        assert_eq!(frames[1].info.as_str(), "FAN OFF");
        assert!(frames[2].info.starts_with("Dmp "));
    }

    #[test]
    fn joystick_moves_dial_into_manual() {
        let mut s = stove(60);
        s.parts_mut().joystick.push_raw(80);
        s.parts_mut().joystick.push_raw(80);
        s.parts_mut().joystick.push_raw(80);

        s.run_cycle().unwrap();
        s.run_cycle().unwrap();
        let report = s.run_cycle().unwrap();

        assert_eq!(report.event, PanelEvent::DialDown);
        assert_eq!(report.dial, 90);
        assert_eq!(s.tier(), ControlTier::Manual { dial: 90 });
        assert_eq!(report.phase, CombustionPhase::Manual);
        assert_eq!(report.damper, 90);
    }

    #[test]
    fn fan_toggles_relay_and_info() {
        let mut s = stove(60);
        s.parts_mut().joystick.push_raw(20);
        s.run_cycle().unwrap();
        assert!(s.parts().relay.on);
        s.run_cycle().unwrap();
        assert_eq!(
            s.parts().display.last_frame().unwrap().info.as_str(),
            "FAN ON"
        );

        s.parts_mut().joystick.push_raw(40);
        s.run_cycle().unwrap();
        assert!(!s.parts().relay.on);
        assert!(!s.state().fan_on);
    }

    #[test]
    fn restart_ends_cycle_early() {
        let mut s = stove(70);
        s.parts_mut().joystick.push_raw(160);
        let report = s.run_cycle().unwrap();
        assert!(report.restarted);
        assert_eq!(s.parts().power.restart_count, 1);
        assert!(s.parts().display.frames.is_empty());
        assert!(s.parts().servo.events.is_empty());
        assert_eq!(s.parts().sensor.read_count, 0);
    }

    #[test]
    fn restart_survives_display_failure() {
        let mut s = stove(70);
        s.parts_mut().display.fail = true;
        s.parts_mut().joystick.push_raw(160);
        let report = s.run_cycle().unwrap();
        assert!(report.restarted);
        assert_eq!(s.parts().power.restart_count, 1);
        assert!(s.parts().display.last_message.is_none());
    }

    #[test]
    fn restart_before_any_cycle_reports_fault_reading() {
        let mut s = stove(70);
        s.parts_mut().joystick.push_raw(160);
        let report = s.run_cycle().unwrap();
        assert_eq!(report.temperature_c, crate::SENSOR_FAULT_C);
        assert!(report.sensor_fault);
    }

    #[test]
    fn joystick_failure_is_idle() {
        let mut s = stove(70);
        s.parts_mut().joystick.push_error();
        let report = s.run_cycle().unwrap();
        assert_eq!(report.event, PanelEvent::Idle);
        assert_eq!(report.dial, 120);
    }

    #[test]
    fn negative_reading_is_fault() {
        let mut sensor = MockSensor::new(70);
        sensor.push_reading(-127);
        let mut s = MockStove::with_mocks(Config::default(), sensor);
        let report = s.run_cycle().unwrap();
        assert!(report.sensor_fault);
        assert_eq!(report.temperature_c, -1);
        assert_eq!(s.parts().alarm.tones.len(), 1);
    }

    #[test]
    fn servo_failure_aborts_cycle() {
        let mut s = stove(70);
        s.parts_mut().servo.fail = true;
        let err = s.run_cycle().unwrap_err();
        assert_eq!(err.source_name(), "actuator");
        assert!(s.last_report().is_none());
        assert_eq!(s.parts().power.suspend_count, 0);
    }

    #[test]
    fn manual_start_from_config() {
        let config = Config::default().with_panel(PanelConfig::default().with_initial_dial(40));
        let mut s = MockStove::with_mocks(config, MockSensor::new(30));
        assert_eq!(s.regulator().phase(), CombustionPhase::Manual);
        let report = s.run_cycle().unwrap();
        assert_eq!(report.damper, 40);
        assert_eq!(report.schedule.target_c, 65);
    }

    #[test]
    fn state_snapshot() {
        let mut s = stove(70);
        assert_eq!(s.state().temperature_c, None);
        s.run_cycle().unwrap();
        let state = s.state();
        assert_eq!(state.temperature_c, Some(70));
        assert_eq!(state.damper, 32);
        assert_eq!(state.servo_position, 32);
        assert_eq!(state.gain, 9.0);
        assert_eq!(state.tier, ControlTier::Auto { level: 2 });
    }
}
