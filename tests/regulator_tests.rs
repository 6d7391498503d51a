//! Integration tests for the regulation cycle, driven entirely by mocks

use rs_damper::{
    hal::{MockSensor, MockStove},
    ActuatorConfig, AlarmConfig, CombustionPhase, Config, ControlTier, PanelConfig,
    RegulatorConfig, ServoGeometry, SleepConfig, WakeLevel,
};

/// Servo angle the default linkage uses for a damper opening.
fn angle_at(position: u8) -> u16 {
    ServoGeometry::from_config(&ActuatorConfig::default()).angle_for(position)
}

fn stove(temperature: i16) -> MockStove {
    MockStove::with_mocks(Config::default(), MockSensor::new(temperature))
}

/// Lower integral thresholds so refill and end of burn are reached quickly.
fn quick_burn() -> Config {
    Config::default().with_regulator(RegulatorConfig::default().with_thresholds(500.0, 800.0))
}

// ============================================================================
// Automatic Regulation
// ============================================================================

#[test]
fn auto_regulation_opens_damper_below_target() {
    let mut s = stove(70);
    let report = s.run_cycle().unwrap();

    assert_eq!(report.phase, CombustionPhase::AutoRegulating);
    assert_eq!(report.schedule.target_c, 73);
    assert_eq!(report.schedule.gain, 9.0);
    assert_eq!(report.damper, 32);
    assert_eq!(report.alarm, None);

    let angles = s.parts().servo.angles();
    assert_eq!(angles.len(), 32);
    assert_eq!(angles.last(), Some(&angle_at(32)));
}

#[test]
fn small_correction_stays_inside_deadband() {
    let mut s = stove(70);
    s.run_cycle().unwrap();
    s.parts_mut().servo.clear();

    // errP 3, errI 6, errD 0 -> 27%, five points from the servo
    let report = s.run_cycle().unwrap();
    assert_eq!(report.damper, 27);
    assert_eq!(report.motion_steps, 0);
    assert!(s.parts().servo.events.is_empty());
    assert_eq!(s.servo_position(), 32);
}

#[test]
fn hot_stove_closes_damper() {
    let mut s = stove(85);
    let report = s.run_cycle().unwrap();
    assert_eq!(report.damper, 0);
    assert_eq!(report.alarm, None);
}

#[test]
fn each_tier_targets_its_own_temperature() {
    let cases = [(110, 67), (120, 73), (130, 75), (140, 79)];
    for (dial, target) in cases {
        let config = Config::default().with_panel(PanelConfig::default().with_initial_dial(dial));
        let mut s = MockStove::with_mocks(config, MockSensor::new(60));
        let report = s.run_cycle().unwrap();
        assert_eq!(report.schedule.target_c, target, "dial {}", dial);
        assert_eq!(report.phase, CombustionPhase::AutoRegulating);
    }
}

// ============================================================================
// Manual Control
// ============================================================================

#[test]
fn manual_dial_sets_damper_and_clears_accumulators() {
    let mut s = stove(70);
    s.run_cycle().unwrap();
    s.run_cycle().unwrap();
    assert!(s.state().terms.err_i > 0.0);

    // Eight dial-down events: 120 -> 40
    for _ in 0..8 {
        s.parts_mut().joystick.push_raw(75);
    }
    let mut report = s.run_cycle().unwrap();
    for _ in 0..7 {
        report = s.run_cycle().unwrap();
    }

    assert_eq!(report.dial, 40);
    assert_eq!(s.tier(), ControlTier::Manual { dial: 40 });
    assert_eq!(report.phase, CombustionPhase::Manual);
    assert_eq!(report.damper, 40);
    assert_eq!(s.state().terms.err_i, 0.0);
    assert_eq!(s.state().terms.err_d, 0.0);
    assert_eq!(s.parts().display.last_frame().unwrap().label, "Manual");
}

#[test]
fn manual_ignores_temperature() {
    let config = Config::default().with_panel(PanelConfig::default().with_initial_dial(60));
    let mut sensor = MockSensor::new(30);
    sensor.push_readings(&[30, 80, 55]);
    let mut s = MockStove::with_mocks(config, sensor);

    for _ in 0..3 {
        let report = s.run_cycle().unwrap();
        assert_eq!(report.damper, 60);
        assert_eq!(report.phase, CombustionPhase::Manual);
    }
}

// ============================================================================
// Refill Detection
// ============================================================================

#[test]
fn low_fuel_requests_refill_once() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(40));

    // errP 33 per cycle: 15 * 33 = 495, 16 * 33 = 528
    for _ in 0..15 {
        assert_eq!(s.run_cycle().unwrap().phase, CombustionPhase::AutoRegulating);
    }
    let report = s.run_cycle().unwrap();
    assert_eq!(report.phase, CombustionPhase::RefillPending);
    assert_eq!(s.parts().display.last_frame().unwrap().label, "Fill");

    for _ in 0..5 {
        assert_eq!(s.run_cycle().unwrap().phase, CombustionPhase::RefillPending);
    }

    let refill = AlarmConfig::default().refill_tone;
    assert_eq!(s.parts().alarm.tones, vec![refill]);
}

#[test]
fn rising_temperature_after_refill_resets_integral() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(40));
    for _ in 0..16 {
        s.run_cycle().unwrap();
    }
    assert_eq!(s.regulator().phase(), CombustionPhase::RefillPending);

    s.parts_mut().sensor.temperature = 45;
    let report = s.run_cycle().unwrap();

    assert_eq!(report.phase, CombustionPhase::AutoRegulating);
    assert_eq!(s.state().terms.err_i, 0.0);
    assert_eq!(s.parts().display.last_frame().unwrap().label, "Auto");
}

#[test]
fn refill_alarm_rearms_after_recovery() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(40));
    for _ in 0..16 {
        s.run_cycle().unwrap();
    }
    s.parts_mut().sensor.temperature = 45;
    s.run_cycle().unwrap();

    // Fire settles back down and the integral climbs again.
    s.parts_mut().sensor.temperature = 40;
    let mut phase = CombustionPhase::AutoRegulating;
    for _ in 0..40 {
        phase = s.run_cycle().unwrap().phase;
        if phase == CombustionPhase::RefillPending {
            break;
        }
    }
    assert_eq!(phase, CombustionPhase::RefillPending);
    assert_eq!(s.parts().alarm.tones.len(), 2);
}

// ============================================================================
// End Of Burn
// ============================================================================

#[test]
fn cold_spent_stove_closes_and_sleeps() {
    let mut s = stove(40);

    // errI grows by 33 per cycle and crosses 85000 on cycle 2576
    let mut cycles = 0;
    let report = loop {
        let report = s.run_cycle().unwrap();
        cycles += 1;
        if report.slept || cycles > 4000 {
            break report;
        }
    };

    assert_eq!(cycles, 2576);
    assert_eq!(report.phase, CombustionPhase::EndOfBurn);
    assert_eq!(report.damper, 0);
    assert_eq!(s.servo_position(), 0);

    let power = &s.parts().power;
    assert_eq!(power.suspend_count, 1);
    assert_eq!(
        power.wake.map(|w| (w.pin, w.level)),
        Some((15, WakeLevel::Low))
    );

    let alarms = AlarmConfig::default();
    assert_eq!(
        s.parts().alarm.tones,
        vec![alarms.refill_tone, alarms.end_tone]
    );
    assert_eq!(s.parts().alarm.tones[1].frequency_hz, 950);

    let message = s.parts().display.last_message.clone().unwrap();
    assert_eq!(message.0, "Burn finished");
    assert_eq!(message.1.as_deref(), Some("Sleeping"));
}

#[test]
fn end_tone_does_not_repeat() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(40));
    for _ in 0..30 {
        s.run_cycle().unwrap();
    }
    assert_eq!(s.regulator().phase(), CombustionPhase::EndOfBurn);
    assert_eq!(s.parts().alarm.tones.len(), 2);
    assert!(s.parts().power.suspend_count > 1);
}

#[test]
fn warm_stove_at_end_of_burn_keeps_regulating() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(60));

    // errP 13 per cycle: end threshold crossed on cycle 62
    let mut report = s.run_cycle().unwrap();
    for _ in 0..61 {
        report = s.run_cycle().unwrap();
    }
    assert_eq!(report.phase, CombustionPhase::EndOfBurn);
    assert!(!report.slept);
    assert_eq!(s.parts().power.suspend_count, 0);
}

#[test]
fn late_reload_leaves_end_of_burn() {
    let mut s = MockStove::with_mocks(quick_burn(), MockSensor::new(60));
    for _ in 0..62 {
        s.run_cycle().unwrap();
    }
    assert_eq!(s.regulator().phase(), CombustionPhase::EndOfBurn);

    s.parts_mut().sensor.temperature = 65;
    assert_eq!(s.run_cycle().unwrap().phase, CombustionPhase::EndOfBurn);
    assert_eq!(s.state().terms.err_i, 0.0);
    assert_eq!(s.run_cycle().unwrap().phase, CombustionPhase::AutoRegulating);
}

#[test]
fn sleep_can_be_disabled() {
    let config = quick_burn().with_sleep(SleepConfig::default().with_enabled(false));
    let mut s = MockStove::with_mocks(config, MockSensor::new(40));
    let mut report = s.run_cycle().unwrap();
    for _ in 0..29 {
        report = s.run_cycle().unwrap();
    }
    assert_eq!(report.phase, CombustionPhase::EndOfBurn);
    assert_eq!(report.damper, 0);
    assert!(!report.slept);
    assert_eq!(s.parts().power.suspend_count, 0);
}

// ============================================================================
// Alarms
// ============================================================================

#[test]
fn sensor_fault_shows_error_and_beeps_once_per_cycle() {
    let mut sensor = MockSensor::new(70);
    sensor.push_error();
    let mut s = MockStove::with_mocks(Config::default(), sensor);

    let report = s.run_cycle().unwrap();
    assert!(report.sensor_fault);
    assert_eq!(report.temperature_c, -1);

    let frame = s.parts().display.last_frame().unwrap();
    assert_eq!(frame.label, "Error");
    assert_eq!(frame.temperature_c, -1);
    assert_eq!(
        s.parts().alarm.tones,
        vec![AlarmConfig::default().fault_tone]
    );

    // Sensor recovers on the next cycle.
    let report = s.run_cycle().unwrap();
    assert!(!report.sensor_fault);
    assert_eq!(s.parts().display.last_frame().unwrap().label, "Auto");
    assert_eq!(s.parts().alarm.tones.len(), 1);
}

#[test]
fn persistent_fault_beeps_every_cycle() {
    let mut sensor = MockSensor::new(70);
    sensor.push_error();
    sensor.push_error();
    sensor.push_error();
    let mut s = MockStove::with_mocks(Config::default(), sensor);
    for _ in 0..3 {
        s.run_cycle().unwrap();
    }
    assert_eq!(s.parts().alarm.tones.len(), 3);
}

#[test]
fn overheat_beeps_every_cycle() {
    let mut s = stove(95);
    for _ in 0..3 {
        let report = s.run_cycle().unwrap();
        assert_eq!(report.damper, 0);
    }
    let overheat = AlarmConfig::default().overheat_tone;
    assert_eq!(s.parts().alarm.tones, vec![overheat; 3]);
}

#[test]
fn custom_overheat_limit() {
    let config = Config::default().with_alarm(AlarmConfig::default().with_overheat_c(80));
    let mut s = MockStove::with_mocks(config, MockSensor::new(81));
    s.run_cycle().unwrap();
    assert_eq!(s.parts().alarm.tones.len(), 1);
}
