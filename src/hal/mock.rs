//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every hardware trait, so the whole
//! regulation cycle runs on a desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockSensor`] | [`TemperatureSensor`] | Queued readings and read failures |
//! | [`MockPotentiometer`] | [`Potentiometer`] | Queued raw joystick values |
//! | [`MockServo`] | [`DamperServo`] | Records power and angle commands |
//! | [`MockAlarm`] | [`AlarmDriver`] | Records tones |
//! | [`MockFanRelay`] | [`FanRelay`] | Tracks relay state |
//! | [`MockPower`] | [`SleepController`] | Records wake, suspend and restart |
//! | [`MockDisplay`] | [`StoveDisplay`] | Records rendered frames |
//! | [`MockDelay`] | [`DelayNs`] | Accumulates requested delay time |
//!
//! # Example
//!
//! ```rust
//! use rs_damper::hal::{MockStove, MockSensor};
//! use rs_damper::Config;
//!
//! let mut stove = MockStove::with_mocks(Config::default(), MockSensor::new(72));
//! let report = stove.run_cycle().unwrap();
//! assert_eq!(report.temperature_c, 72);
//! assert_eq!(stove.parts().display.frames.len(), 1);
//! ```
//!
//! [`TemperatureSensor`]: crate::traits::TemperatureSensor
//! [`Potentiometer`]: crate::traits::Potentiometer
//! [`DamperServo`]: crate::traits::DamperServo
//! [`AlarmDriver`]: crate::traits::AlarmDriver
//! [`FanRelay`]: crate::traits::FanRelay
//! [`SleepController`]: crate::traits::SleepController
//! [`StoveDisplay`]: crate::traits::StoveDisplay
//! [`DelayNs`]: embedded_hal::delay::DelayNs

extern crate alloc;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::Config;
use crate::stove::{StoveController, StoveParts};
use crate::traits::{
    AlarmDriver, AlarmTone, DamperServo, DisplayFrame, FanRelay, Potentiometer, SleepController,
    StoveDisplay, TemperatureSensor, WakeSource,
};
use embedded_hal::delay::DelayNs;

/// Error returned by mocks set up to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

// ============================================================================
// Inputs
// ============================================================================

/// Mock temperature sensor.
///
/// Queued readings are returned first, oldest first. Once the queue is empty
/// every read returns [`temperature`](Self::temperature).
///
/// # Example
///
/// ```rust
/// use rs_damper::hal::MockSensor;
/// use rs_damper::traits::TemperatureSensor;
///
/// let mut sensor = MockSensor::new(70);
/// sensor.push_reading(71);
/// sensor.push_error();
///
/// assert_eq!(sensor.read_celsius(), Ok(71));
/// assert!(sensor.read_celsius().is_err());
/// assert_eq!(sensor.read_celsius(), Ok(70));
/// ```
#[derive(Debug, Default)]
pub struct MockSensor {
    /// Reading returned when nothing is queued.
    pub temperature: i16,
    queue: VecDeque<Result<i16, MockError>>,
    /// Number of reads performed.
    pub read_count: usize,
}

impl MockSensor {
    /// Creates a sensor that always reads `temperature`.
    pub fn new(temperature: i16) -> Self {
        Self {
            temperature,
            ..Default::default()
        }
    }

    /// Queues one reading.
    pub fn push_reading(&mut self, celsius: i16) {
        self.queue.push_back(Ok(celsius));
    }

    /// Queues several readings.
    pub fn push_readings(&mut self, readings: &[i16]) {
        self.queue.extend(readings.iter().copied().map(Ok));
    }

    /// Queues one failed read.
    pub fn push_error(&mut self) {
        self.queue.push_back(Err(MockError));
    }
}

impl TemperatureSensor for MockSensor {
    type Error = MockError;

    fn read_celsius(&mut self) -> Result<i16, MockError> {
        self.read_count += 1;
        self.queue.pop_front().unwrap_or(Ok(self.temperature))
    }
}

/// Raw value of a joystick at rest. Lies outside every panel band.
pub const JOYSTICK_REST: u16 = 300;

/// Mock joystick ADC.
///
/// Queued values are returned oldest first; afterwards the joystick reads
/// [`JOYSTICK_REST`].
#[derive(Debug)]
pub struct MockPotentiometer {
    /// Value returned when nothing is queued.
    pub rest: u16,
    queue: VecDeque<Result<u16, MockError>>,
}

impl MockPotentiometer {
    /// Creates a joystick at rest.
    pub fn new() -> Self {
        Self {
            rest: JOYSTICK_REST,
            queue: VecDeque::new(),
        }
    }

    /// Queues one raw sample.
    pub fn push_raw(&mut self, raw: u16) {
        self.queue.push_back(Ok(raw));
    }

    /// Queues one failed conversion.
    pub fn push_error(&mut self) {
        self.queue.push_back(Err(MockError));
    }
}

impl Default for MockPotentiometer {
    fn default() -> Self {
        Self::new()
    }
}

impl Potentiometer for MockPotentiometer {
    type Error = MockError;

    fn read_raw(&mut self) -> Result<u16, MockError> {
        self.queue.pop_front().unwrap_or(Ok(self.rest))
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// Command recorded by [`MockServo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServoEvent {
    /// `set_powered` was called.
    Power(bool),
    /// `set_angle` was called.
    Angle(u16),
}

/// Mock damper servo.
///
/// Records every command in order. Set [`fail`](Self::fail) to make the
/// next commands return an error.
#[derive(Debug, Default)]
pub struct MockServo {
    /// Commands in call order.
    pub events: Vec<ServoEvent>,
    /// Whether the PWM output is currently on.
    pub powered: bool,
    /// Last commanded angle.
    pub angle: Option<u16>,
    /// Fail every command while set.
    pub fail: bool,
}

impl MockServo {
    /// Creates an unpowered servo with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Angles commanded so far, in order.
    pub fn angles(&self) -> Vec<u16> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ServoEvent::Angle(a) => Some(*a),
                ServoEvent::Power(_) => None,
            })
            .collect()
    }

    /// Forgets recorded commands.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DamperServo for MockServo {
    type Error = MockError;

    fn set_angle(&mut self, degrees: u16) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.events.push(ServoEvent::Angle(degrees));
        self.angle = Some(degrees);
        Ok(())
    }

    fn set_powered(&mut self, on: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.events.push(ServoEvent::Power(on));
        self.powered = on;
        Ok(())
    }
}

/// Mock buzzer. Records every tone played.
#[derive(Debug, Default)]
pub struct MockAlarm {
    /// Tones in play order.
    pub tones: Vec<AlarmTone>,
}

impl MockAlarm {
    /// Creates a silent buzzer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlarmDriver for MockAlarm {
    type Error = MockError;

    fn sound(&mut self, tone: AlarmTone) -> Result<(), MockError> {
        self.tones.push(tone);
        Ok(())
    }
}

/// Mock fan relay.
#[derive(Debug, Default)]
pub struct MockFanRelay {
    /// Relay state.
    pub on: bool,
    /// Number of `set_on` calls.
    pub switch_count: usize,
}

impl MockFanRelay {
    /// Creates a relay in the off state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FanRelay for MockFanRelay {
    type Error = MockError;

    fn set_on(&mut self, on: bool) -> Result<(), MockError> {
        self.on = on;
        self.switch_count += 1;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Mock power controller. Suspend and restart return instead of resetting.
#[derive(Debug, Default)]
pub struct MockPower {
    /// Last armed wake source.
    pub wake: Option<WakeSource>,
    /// Number of suspends.
    pub suspend_count: usize,
    /// Number of restarts.
    pub restart_count: usize,
}

impl MockPower {
    /// Creates a power controller that has never slept.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SleepController for MockPower {
    type Error = MockError;

    fn configure_wake(&mut self, source: WakeSource) -> Result<(), MockError> {
        self.wake = Some(source);
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), MockError> {
        self.suspend_count += 1;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), MockError> {
        self.restart_count += 1;
        Ok(())
    }
}

/// Mock display for testing UI rendering.
///
/// Keeps every rendered frame for inspection.
///
/// # Example
///
/// ```
/// use rs_damper::hal::MockDisplay;
/// use rs_damper::traits::StoveDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// assert!(display.frames.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Frames in render order.
    pub frames: Vec<DisplayFrame>,
    /// Last message shown via show_message().
    pub last_message: Option<(String, Option<String>)>,
    /// Whether init() was called.
    pub initialized: bool,
    /// Number of clear() calls.
    pub clear_count: usize,
    /// Fail render() and show_message() while set.
    pub fail: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently rendered frame.
    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.frames.last()
    }
}

impl StoveDisplay for MockDisplay {
    type Error = MockError;

    fn init(&mut self) -> Result<(), MockError> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), MockError> {
        self.clear_count += 1;
        Ok(())
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }
}

/// Mock blocking delay. Returns immediately and adds up the requested time.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
    /// Number of delay calls.
    pub calls: usize,
}

impl MockDelay {
    /// Creates a delay with nothing accumulated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in whole milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    /// Forgets accumulated time.
    pub fn reset(&mut self) {
        self.total_ns = 0;
        self.calls = 0;
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}

// ============================================================================
// Assembled controller
// ============================================================================

/// Stove controller wired entirely to mocks.
pub type MockStove = StoveController<
    MockSensor,
    MockPotentiometer,
    MockServo,
    MockAlarm,
    MockFanRelay,
    MockPower,
    MockDisplay,
    MockDelay,
>;

impl MockStove {
    /// Builds a controller around `sensor` with fresh mocks everywhere else.
    pub fn with_mocks(config: Config, sensor: MockSensor) -> Self {
        StoveController::new(
            config,
            StoveParts {
                sensor,
                joystick: MockPotentiometer::new(),
                servo: MockServo::new(),
                alarm: MockAlarm::new(),
                relay: MockFanRelay::new(),
                power: MockPower::new(),
                display: MockDisplay::new(),
                delay: MockDelay::new(),
            },
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_falls_back_after_queue() {
        let mut sensor = MockSensor::new(60);
        sensor.push_readings(&[61, 62]);
        assert_eq!(sensor.read_celsius(), Ok(61));
        assert_eq!(sensor.read_celsius(), Ok(62));
        assert_eq!(sensor.read_celsius(), Ok(60));
        assert_eq!(sensor.read_count, 3);
    }

    #[test]
    fn sensor_error_is_queued_in_order() {
        let mut sensor = MockSensor::new(60);
        sensor.push_error();
        sensor.push_reading(-127);
        assert_eq!(sensor.read_celsius(), Err(MockError));
        assert_eq!(sensor.read_celsius(), Ok(-127));
    }

    #[test]
    fn joystick_rests_outside_bands() {
        let mut joystick = MockPotentiometer::new();
        joystick.push_raw(5);
        assert_eq!(joystick.read_raw(), Ok(5));
        assert_eq!(joystick.read_raw(), Ok(JOYSTICK_REST));
    }

    #[test]
    fn servo_records_commands() {
        let mut servo = MockServo::new();
        servo.set_powered(true).unwrap();
        servo.set_angle(40).unwrap();
        servo.set_angle(41).unwrap();
        servo.set_powered(false).unwrap();

        assert_eq!(servo.angles(), vec![40, 41]);
        assert_eq!(servo.angle, Some(41));
        assert!(!servo.powered);
        assert_eq!(servo.events.len(), 4);
    }

    #[test]
    fn failing_servo_records_nothing() {
        let mut servo = MockServo::new();
        servo.fail = true;
        assert!(servo.set_angle(40).is_err());
        assert!(servo.events.is_empty());
    }

    #[test]
    fn alarm_records_tones() {
        let mut alarm = MockAlarm::new();
        alarm.sound(AlarmTone::new(1900, 1000, 1000)).unwrap();
        assert_eq!(alarm.tones.len(), 1);
        assert_eq!(alarm.tones[0].frequency_hz, 1900);
    }

    #[test]
    fn relay_counts_switches() {
        let mut relay = MockFanRelay::new();
        relay.set_on(true).unwrap();
        relay.set_on(true).unwrap();
        assert!(relay.is_on());
        assert_eq!(relay.switch_count, 2);
    }

    #[test]
    fn power_records_calls() {
        let mut power = MockPower::new();
        power.restart().unwrap();
        power.suspend().unwrap();
        assert_eq!(power.restart_count, 1);
        assert_eq!(power.suspend_count, 1);
        assert!(power.wake.is_none());
    }

    #[test]
    fn display_keeps_frames_and_message() {
        let mut display = MockDisplay::new();
        display.init().unwrap();
        display.show_message("Hello", Some("World")).unwrap();

        let (line1, line2) = display.last_message.as_ref().unwrap();
        assert_eq!(line1, "Hello");
        assert_eq!(line2.as_deref(), Some("World"));
        assert!(display.initialized);
        assert!(display.last_frame().is_none());
    }

    #[test]
    fn delay_accumulates_all_units() {
        let mut delay = MockDelay::new();
        delay.delay_ms(50);
        delay.delay_us(2_000);
        delay.delay_ns(1_000_000);
        assert_eq!(delay.total_ms(), 53);
        assert_eq!(delay.calls, 3);

        delay.reset();
        assert_eq!(delay.total_ms(), 0);
    }
}
