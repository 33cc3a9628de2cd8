//! Dimmable and RGB controllers against mock PWM channels and storage.

use xiaolight::app::ports::{StoragePort, Updatable};
use xiaolight::color::RgbDuty;
use xiaolight::diagnostics::FaultLog;
use xiaolight::error::ActuatorError;
use xiaolight::lights::dimmable::DimmableLed;
use xiaolight::lights::rgb::RgbLed;
use xiaolight::lights::{Endpoint, SetRequest};

use crate::mock_hw::{MockNvs, MockPwm, PwmProbe, mock_pin};

fn rgb_led(nvs: &MockNvs) -> (RgbLed<MockPwm>, [PwmProbe; 3]) {
    let (r, pr) = mock_pin(5);
    let (g, pg) = mock_pin(6);
    let (b, pb) = mock_pin(7);
    (RgbLed::new("led1", r, g, b, nvs), [pr, pg, pb])
}

fn last_rgb(probes: &[PwmProbe; 3]) -> (u16, u16, u16) {
    (
        probes[0].last().unwrap_or_default(),
        probes[1].last().unwrap_or_default(),
        probes[2].last().unwrap_or_default(),
    )
}

// ── Dimmable ──────────────────────────────────────────────────

#[test]
fn dimmable_starts_off_at_default_brightness() {
    let nvs = MockNvs::new();
    let (pin, probe) = mock_pin(4);
    let led = DimmableLed::new("led0", pin, &nvs);

    assert!(!led.power().val());
    assert_eq!(led.level().val(), 50);
    assert_eq!(probe.history(), vec![0]);
}

#[test]
fn dimmable_restores_persisted_state() {
    let mut nvs = MockNvs::new();
    nvs.put("led0", "on", true);
    nvs.put("led0", "bri", 30i32);
    let (pin, probe) = mock_pin(4);
    let led = DimmableLed::new("led0", pin, &nvs);

    assert_eq!(led.level().val(), 30);
    assert_eq!(probe.last(), Some(30));
}

#[test]
fn dimmable_pending_brightness_drives_output() {
    let mut nvs = MockNvs::new();
    nvs.put("led0", "on", true);
    let (pin, probe) = mock_pin(4);
    let mut led = DimmableLed::new("led0", pin, &nvs);

    led.level_mut().request(80);
    assert!(led.update());
    assert_eq!(probe.last(), Some(80));
}

#[test]
fn dimmable_power_off_forces_zero() {
    let mut nvs = MockNvs::new();
    nvs.put("led0", "on", true);
    nvs.put("led0", "bri", 80i32);
    let (pin, probe) = mock_pin(4);
    let mut led = DimmableLed::new("led0", pin, &nvs);
    assert_eq!(probe.last(), Some(80));

    led.power_mut().request(false);
    assert!(led.update());
    assert_eq!(probe.last(), Some(0));
}

#[test]
fn dimmable_brightness_request_is_clamped() {
    let nvs = MockNvs::new();
    let (pin, _probe) = mock_pin(4);
    let mut led = DimmableLed::new("led0", pin, &nvs);

    led.level_mut().request(1);
    assert_eq!(led.level().new_val(), 5);
    led.level_mut().request(250);
    assert_eq!(led.level().new_val(), 100);
}

#[test]
fn dimmable_commit_persists_under_namespace() {
    let mut nvs = MockNvs::new();
    let (pin, _probe) = mock_pin(4);
    let mut led = DimmableLed::new("led0", pin, &nvs);

    led.power_mut().request(true);
    led.level_mut().request(70);
    led.update();
    led.commit(&mut nvs);

    assert!(!led.level().updated());
    assert_eq!(led.level().val(), 70);
    assert_eq!(nvs.get::<bool>("led0", "on"), Some(true));
    assert_eq!(nvs.get::<i32>("led0", "bri"), Some(70));
    assert!(!nvs.exists("led1", "bri"));
}

#[test]
fn dimmable_write_failure_still_reports_success() {
    let nvs = MockNvs::new();
    let (pin, probe) = mock_pin(4);
    let mut led = DimmableLed::new("led0", pin, &nvs);

    probe.set_failing(true);
    led.power_mut().request(true);
    assert!(led.update());
    assert_eq!(led.pin().fault_count(), 1);

    let mut log = FaultLog::new();
    led.drain_faults(&mut log);
    let fault = log.latest().copied().unwrap();
    assert_eq!(fault.gpio, 4);
    assert_eq!(fault.error, ActuatorError::PwmWriteFailed);
    assert_eq!(fault.duty, 50);
}

// ── RGB ───────────────────────────────────────────────────────

#[test]
fn rgb_defaults_are_off() {
    let nvs = MockNvs::new();
    let (led, probes) = rgb_led(&nvs);

    assert_eq!(led.duty(), RgbDuty::OFF);
    assert_eq!(last_rgb(&probes), (0, 0, 0));
    assert_eq!(led.value().val(), 100.0);
}

#[test]
fn rgb_full_red() {
    let mut nvs = MockNvs::new();
    nvs.put("led1", "sat", 100.0f32);
    let (mut led, probes) = rgb_led(&nvs);

    led.power_mut().request(true);
    led.hue_mut().request(0.0);
    assert!(led.update());
    assert_eq!(last_rgb(&probes), (100, 0, 0));
}

#[test]
fn rgb_power_off_is_black() {
    let mut nvs = MockNvs::new();
    nvs.put("led1", "on", true);
    nvs.put("led1", "hue", 200.0f32);
    nvs.put("led1", "sat", 80.0f32);
    let (mut led, probes) = rgb_led(&nvs);
    assert_ne!(last_rgb(&probes), (0, 0, 0));

    led.power_mut().request(false);
    assert!(led.update());
    assert_eq!(last_rgb(&probes), (0, 0, 0));
}

#[test]
fn rgb_pending_hue_mixes_with_committed_traits() {
    let mut nvs = MockNvs::new();
    nvs.put("led1", "on", true);
    nvs.put("led1", "sat", 100.0f32);
    nvs.put("led1", "bri", 100.0f32);
    let (mut led, probes) = rgb_led(&nvs);
    assert_eq!(last_rgb(&probes), (100, 0, 0));

    led.hue_mut().request(120.0);
    assert!(!led.saturation().updated());
    assert!(led.update());
    assert_eq!(last_rgb(&probes), (0, 100, 0));
}

#[test]
fn rgb_duty_truncates() {
    let mut nvs = MockNvs::new();
    nvs.put("led1", "on", true);
    nvs.put("led1", "sat", 100.0f32);
    let (mut led, probes) = rgb_led(&nvs);

    // Hue 10: green is 1/6 of full scale, 16.67 % truncates to 16.
    led.hue_mut().request(10.0);
    assert!(led.update());
    assert_eq!(last_rgb(&probes), (100, 16, 0));
}

#[test]
fn rgb_value_request_snaps_to_step() {
    let nvs = MockNvs::new();
    let (mut led, _probes) = rgb_led(&nvs);

    led.value_mut().request(2.0);
    assert_eq!(led.value().new_val(), 5.0);
    led.hue_mut().request(400.0);
    assert_eq!(led.hue().new_val(), 360.0);
}

#[test]
fn rgb_undecodable_value_keeps_default() {
    let mut nvs = MockNvs::new();
    nvs.put_raw("led1", "hue", &[0xFF]);
    let (led, _probes) = rgb_led(&nvs);
    assert_eq!(led.hue().val(), 0.0);
}

// ── Endpoint routing ──────────────────────────────────────────

#[test]
fn endpoint_rejects_colour_on_dimmable() {
    let nvs = MockNvs::new();
    let (pin, _probe) = mock_pin(4);
    let mut ep = Endpoint::from(DimmableLed::new("led0", pin, &nvs));

    assert!(ep.request(SetRequest::Hue(90.0)).is_err());
    assert!(ep.request(SetRequest::Saturation(10.0)).is_err());
    assert!(!ep.any_updated());
}

#[test]
fn endpoint_brightness_maps_to_rgb_value() {
    let nvs = MockNvs::new();
    let (led, _probes) = rgb_led(&nvs);
    let mut ep = Endpoint::from(led);

    ep.request(SetRequest::Brightness(40)).unwrap();
    assert!(ep.any_updated());
    match &ep {
        Endpoint::Rgb(led) => assert_eq!(led.value().new_val(), 40.0),
        Endpoint::Dimmable(_) => unreachable!(),
    }
    assert_eq!(ep.gpios().as_slice(), &[5, 6, 7]);
}

#[test]
fn endpoint_equal_request_is_not_an_update() {
    let nvs = MockNvs::new();
    let (pin, _probe) = mock_pin(4);
    let mut ep = Endpoint::from(DimmableLed::new("led0", pin, &nvs));

    ep.request(SetRequest::Brightness(50)).unwrap();
    assert!(!ep.any_updated());
}
