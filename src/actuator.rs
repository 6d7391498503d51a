//! Damper actuator: deadband and stepped, paced servo motion.
//!
//! A setpoint change is turned into a [`MotionPlan`] of one-percent steps.
//! Small changes inside the deadband produce an empty plan so the servo does
//! not chatter on a noisy loop. Large changes are walked one percent at a
//! time with a settle delay between steps, which keeps the current draw and
//! cable stress low compared with one large jump.
//!
//! # Example
//!
//! ```rust
//! use rs_damper::actuator::{plan_motion, ServoGeometry};
//! use rs_damper::config::ActuatorConfig;
//!
//! let config = ActuatorConfig::default();
//! let geometry = ServoGeometry::from_config(&config);
//!
//! // Inside the deadband: nothing to do.
//! assert!(plan_motion(40, 50, config.deadband, &geometry).is_empty());
//!
//! // Outside: one step per percent.
//! let plan = plan_motion(0, 30, config.deadband, &geometry);
//! assert_eq!(plan.len(), 30);
//! assert_eq!(plan.steps().last().map(|s| s.angle), Some(36));
//! ```

use crate::config::ActuatorConfig;
use crate::traits::DamperServo;
use embedded_hal::delay::DelayNs;
use heapless::Vec as HVec;

/// Largest possible plan: fully closed to fully open.
pub const MAX_STEPS: usize = 100;

/// Linear map from damper percent to servo angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoGeometry {
    /// Travel in degrees across the full setpoint range.
    pub angular_range: f32,
    /// Calibration divisor applied to the setpoint range.
    pub calibration: f32,
    /// Angle at setpoint zero.
    pub angle_offset: f32,
    /// Setpoint that maps to the full travel.
    pub max_setpoint: f32,
}

impl ServoGeometry {
    /// Geometry taken from the actuator configuration.
    pub fn from_config(config: &ActuatorConfig) -> Self {
        Self {
            angular_range: config.angular_range,
            calibration: config.calibration,
            angle_offset: config.angle_offset,
            max_setpoint: config.max_setpoint,
        }
    }

    /// Servo angle for a damper position, truncated to whole degrees.
    pub fn angle_for(&self, position: u8) -> u16 {
        let angle = f32::from(position) * self.angular_range
            / (self.max_setpoint * self.calibration)
            + self.angle_offset;
        angle.max(0.0) as u16
    }
}

/// One servo command in a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionStep {
    /// Damper position reached by this step.
    pub position: u8,
    /// Servo angle commanded for it.
    pub angle: u16,
}

/// Ordered servo commands moving the damper from one setpoint to another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionPlan {
    steps: HVec<MotionStep, MAX_STEPS>,
}

impl MotionPlan {
    /// Steps in execution order.
    pub fn steps(&self) -> &[MotionStep] {
        &self.steps
    }

    /// Commanded angles in execution order.
    pub fn angles(&self) -> impl Iterator<Item = u16> + '_ {
        self.steps.iter().map(|s| s.angle)
    }

    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan moves nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Final damper position, if the plan moves.
    pub fn destination(&self) -> Option<u8> {
        self.steps.last().map(|s| s.position)
    }
}

/// Plans the motion from `previous` to `target`.
///
/// Returns an empty plan when `|target - previous| <= deadband`. Both
/// setpoints are clamped to 0..=100 first.
pub fn plan_motion(previous: u8, target: u8, deadband: u8, geometry: &ServoGeometry) -> MotionPlan {
    let from = i16::from(previous.min(100));
    let to = i16::from(target.min(100));
    let delta = to - from;

    let mut plan = MotionPlan::default();
    if delta.unsigned_abs() <= u16::from(deadband) {
        return plan;
    }

    let direction = delta.signum();
    for i in 1..=delta.abs() {
        let position = (from + direction * i) as u8;
        // Capacity is MAX_STEPS and |delta| never exceeds 100.
        let _ = plan.steps.push(MotionStep {
            position,
            angle: geometry.angle_for(position),
        });
    }
    plan
}

/// Drives a [`DamperServo`] through motion plans and tracks its position.
///
/// The tracked position only changes when a move is executed, so repeated
/// small setpoint changes accumulate until they leave the deadband.
#[derive(Clone, Debug)]
pub struct DamperActuator {
    config: ActuatorConfig,
    geometry: ServoGeometry,
    position: u8,
}

impl DamperActuator {
    /// Creates an actuator assumed to be at position 0.
    pub fn new(config: ActuatorConfig) -> Self {
        let geometry = ServoGeometry::from_config(&config);
        Self {
            config,
            geometry,
            position: 0,
        }
    }

    /// Last position the servo was driven to.
    #[inline]
    pub fn position(&self) -> u8 {
        self.position
    }

    /// Servo geometry in use.
    #[inline]
    pub fn geometry(&self) -> &ServoGeometry {
        &self.geometry
    }

    /// Plans the move from the tracked position to `target`.
    pub fn plan(&self, target: u8) -> MotionPlan {
        plan_motion(self.position, target, self.config.deadband, &self.geometry)
    }

    /// Moves the servo to `target` if it lies outside the deadband.
    ///
    /// The servo is powered for the move only, and is released even when a
    /// step fails. On failure the tracked position is the last step the
    /// servo accepted. Returns the executed plan, empty if nothing moved.
    pub fn drive<S, D>(&mut self, servo: &mut S, delay: &mut D, target: u8) -> Result<MotionPlan, S::Error>
    where
        S: DamperServo,
        D: DelayNs,
    {
        let plan = self.plan(target);
        let Some(destination) = plan.destination() else {
            return Ok(plan);
        };

        log::debug!(
            "damper {}% -> {}% in {} steps",
            self.position,
            destination,
            plan.len()
        );

        delay.delay_ms(self.config.pre_move_delay_ms);
        servo.set_powered(true)?;
        let mut moved = Ok(());
        for step in plan.steps() {
            if let Err(e) = servo.set_angle(step.angle) {
                log::warn!(
                    "damper stalled at {}% on the way to {}%",
                    self.position,
                    destination
                );
                moved = Err(e);
                break;
            }
            self.position = step.position;
            delay.delay_ms(self.config.step_delay_ms);
        }
        let released = servo.set_powered(false);

        moved?;
        released?;
        Ok(plan)
    }

    /// Moves the servo once to the configured park angle.
    ///
    /// Used at boot so the linkage starts from a known place. The tracked
    /// position is left unchanged.
    pub fn park<S: DamperServo>(&mut self, servo: &mut S) -> Result<(), S::Error> {
        servo.set_powered(true)?;
        servo.set_angle(self.config.park_angle)?;
        servo.set_powered(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockDelay, MockServo, ServoEvent};

    fn geometry() -> ServoGeometry {
        ServoGeometry::from_config(&ActuatorConfig::default())
    }

    #[test]
    fn angle_mapping_matches_linkage() {
        let g = geometry();
        assert_eq!(g.angle_for(0), 29);
        assert_eq!(g.angle_for(1), 29);
        assert_eq!(g.angle_for(30), 36);
        assert_eq!(g.angle_for(32), 36);
        assert_eq!(g.angle_for(100), 52);
    }

    #[test]
    fn deadband_suppresses_small_moves() {
        let g = geometry();
        for target in 28..=52 {
            assert!(plan_motion(40, target, 12, &g).is_empty(), "target {}", target);
        }
        assert!(!plan_motion(40, 27, 12, &g).is_empty());
        assert!(!plan_motion(40, 53, 12, &g).is_empty());
    }

    #[test]
    fn opening_steps_upward() {
        let plan = plan_motion(10, 25, 12, &geometry());
        let positions: Vec<u8> = plan.steps().iter().map(|s| s.position).collect();
        assert_eq!(positions, (11..=25).collect::<Vec<u8>>());
    }

    #[test]
    fn closing_steps_downward() {
        let plan = plan_motion(60, 40, 12, &geometry());
        assert_eq!(plan.len(), 20);
        assert_eq!(plan.steps()[0].position, 59);
        assert_eq!(plan.destination(), Some(40));
    }

    #[test]
    fn full_travel_fits_plan() {
        let plan = plan_motion(0, 100, 12, &geometry());
        assert_eq!(plan.len(), MAX_STEPS);
        assert_eq!(plan.angles().last(), Some(52));
    }

    #[test]
    fn out_of_range_setpoints_are_clamped() {
        let plan = plan_motion(0, 200, 12, &geometry());
        assert_eq!(plan.destination(), Some(100));
    }

    #[test]
    fn drive_powers_only_while_moving() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = MockServo::new();
        let mut delay = MockDelay::new();

        let plan = actuator.drive(&mut servo, &mut delay, 20).unwrap();
        assert_eq!(plan.len(), 20);
        assert_eq!(servo.events.first(), Some(&ServoEvent::Power(true)));
        assert_eq!(servo.events.last(), Some(&ServoEvent::Power(false)));
        assert_eq!(servo.angles().len(), 20);
        assert!(!servo.powered);
        assert_eq!(actuator.position(), 20);
    }

    /// Servo that rejects the angle command with the given 1-based index.
    struct StallingServo {
        stall_at: usize,
        angles: usize,
        powered: bool,
    }

    impl DamperServo for StallingServo {
        type Error = ();

        fn set_angle(&mut self, _degrees: u16) -> Result<(), ()> {
            self.angles += 1;
            if self.angles == self.stall_at {
                Err(())
            } else {
                Ok(())
            }
        }

        fn set_powered(&mut self, on: bool) -> Result<(), ()> {
            self.powered = on;
            Ok(())
        }
    }

    #[test]
    fn failed_step_releases_servo_and_keeps_reached_position() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = StallingServo {
            stall_at: 5,
            angles: 0,
            powered: false,
        };
        let mut delay = MockDelay::new();

        assert!(actuator.drive(&mut servo, &mut delay, 40).is_err());
        assert!(!servo.powered);
        assert_eq!(actuator.position(), 4);

        // The next plan starts from where the damper actually is.
        assert_eq!(actuator.plan(40).len(), 36);
    }

    #[test]
    fn drive_paces_each_step() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = MockServo::new();
        let mut delay = MockDelay::new();

        actuator.drive(&mut servo, &mut delay, 20).unwrap();
        // 50ms before powering, then 50ms per step
        assert_eq!(delay.total_ms(), 50 + 20 * 50);
    }

    #[test]
    fn drive_inside_deadband_issues_nothing() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = MockServo::new();
        let mut delay = MockDelay::new();

        let plan = actuator.drive(&mut servo, &mut delay, 12).unwrap();
        assert!(plan.is_empty());
        assert!(servo.events.is_empty());
        assert_eq!(delay.total_ms(), 0);
        assert_eq!(actuator.position(), 0);
    }

    #[test]
    fn small_changes_accumulate_against_driven_position() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = MockServo::new();
        let mut delay = MockDelay::new();

        assert!(actuator.drive(&mut servo, &mut delay, 10).unwrap().is_empty());
        assert!(actuator.drive(&mut servo, &mut delay, 12).unwrap().is_empty());
        // 13 away from the last driven position (0)
        let plan = actuator.drive(&mut servo, &mut delay, 13).unwrap();
        assert_eq!(plan.len(), 13);
        assert_eq!(actuator.position(), 13);
    }

    #[test]
    fn park_moves_without_tracking() {
        let mut actuator = DamperActuator::new(ActuatorConfig::default());
        let mut servo = MockServo::new();
        actuator.park(&mut servo).unwrap();
        assert_eq!(
            servo.events,
            vec![
                ServoEvent::Power(true),
                ServoEvent::Angle(50),
                ServoEvent::Power(false)
            ]
        );
        assert_eq!(actuator.position(), 0);
    }
}
