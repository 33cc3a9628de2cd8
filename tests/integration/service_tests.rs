//! AccessoryService routing, update dispatch, commit, and fault reporting.

use xiaolight::app::commands::{AppCommand, EndpointId};
use xiaolight::app::events::AppEvent;
use xiaolight::app::service::AccessoryService;
use xiaolight::color::RgbDuty;
use xiaolight::config::AccessoryIdentity;
use xiaolight::error::{ActuatorError, Error, RequestError};
use xiaolight::events;
use xiaolight::lights::Output;
use xiaolight::lights::dimmable::DimmableLed;
use xiaolight::lights::identify::IdentifyRoutine;
use xiaolight::lights::info::AccessoryInformation;
use xiaolight::lights::rgb::RgbLed;

use crate::mock_hw::{MockNvs, MockPwm, MockStatus, PwmProbe, RecordingSink, mock_pin};

const DIMMABLE: EndpointId = EndpointId(0);
const RGB: EndpointId = EndpointId(1);

struct Rig {
    service: AccessoryService<MockPwm>,
    nvs: MockNvs,
    status: MockStatus,
    sink: RecordingSink,
    dimmable: PwmProbe,
    rgb: [PwmProbe; 3],
}

fn rig_with(nvs: MockNvs) -> Rig {
    let identity = AccessoryIdentity::new("XiaoLight", "Acme", "XL-0001", "XIAO-C3", "0.3.0");
    let info = AccessoryInformation::new(identity, 10, IdentifyRoutine::new(3));
    let mut service = AccessoryService::new(info);
    let mut sink = RecordingSink::default();

    let (pin, dimmable) = mock_pin(4);
    service
        .add_endpoint(DimmableLed::new("led0", pin, &nvs), &mut sink)
        .unwrap();

    let (r, pr) = mock_pin(5);
    let (g, pg) = mock_pin(6);
    let (b, pb) = mock_pin(7);
    service
        .add_endpoint(RgbLed::new("led1", r, g, b, &nvs), &mut sink)
        .unwrap();

    Rig {
        service,
        nvs,
        status: MockStatus::default(),
        sink,
        dimmable,
        rgb: [pr, pg, pb],
    }
}

fn rig() -> Rig {
    rig_with(MockNvs::new())
}

impl Rig {
    fn send(&mut self, cmd: AppCommand) -> Result<(), Error> {
        self.service
            .handle_command(cmd, 0, &mut self.status, &mut self.sink)
    }

    fn process(&mut self) {
        self.service.process(&mut self.nvs, &mut self.sink);
    }
}

#[test]
fn registration_reports_restored_output() {
    let r = rig();
    assert_eq!(r.service.endpoint_count(), 2);
    assert_eq!(
        r.sink.events,
        vec![
            AppEvent::EndpointRestored {
                id: DIMMABLE,
                output: Output::Single(0)
            },
            AppEvent::EndpointRestored {
                id: RGB,
                output: Output::Rgb(RgbDuty::OFF)
            },
        ]
    );
}

#[test]
fn set_requests_take_effect_on_process() {
    let mut r = rig();
    r.sink.events.clear();

    r.send(AppCommand::SetPower {
        endpoint: DIMMABLE,
        on: true,
    })
    .unwrap();
    r.send(AppCommand::SetBrightness {
        endpoint: DIMMABLE,
        level: 80,
    })
    .unwrap();
    assert_eq!(r.dimmable.last(), Some(0));

    r.process();
    assert_eq!(r.dimmable.last(), Some(80));
    assert_eq!(
        r.sink.events,
        vec![AppEvent::EndpointUpdated {
            id: DIMMABLE,
            output: Output::Single(80)
        }]
    );
    assert_eq!(r.nvs.get::<i32>("led0", "bri"), Some(80));
    assert_eq!(r.nvs.get::<bool>("led0", "on"), Some(true));
}

#[test]
fn pending_values_collapse_after_process() {
    let mut r = rig();
    r.send(AppCommand::SetPower {
        endpoint: RGB,
        on: true,
    })
    .unwrap();
    r.process();
    r.sink.events.clear();

    // Nothing pending: a second pass updates nothing.
    r.process();
    assert!(r.sink.events.is_empty());
    assert_eq!(r.service.metrics(0).updates_processed, 1);
}

#[test]
fn rgb_colour_through_service() {
    let mut nvs = MockNvs::new();
    nvs.put("led1", "on", true);
    nvs.put("led1", "sat", 100.0f32);
    let mut r = rig_with(nvs);
    assert_eq!(r.rgb[0].last(), Some(100));

    r.send(AppCommand::SetHue {
        endpoint: RGB,
        degrees: 120.0,
    })
    .unwrap();
    r.process();

    let rgb: Vec<_> = r.rgb.iter().map(|p| p.last()).collect();
    assert_eq!(rgb, vec![Some(0), Some(100), Some(0)]);
    assert_eq!(r.nvs.get::<f32>("led1", "hue"), Some(120.0));
}

#[test]
fn colour_request_on_dimmable_is_rejected() {
    let mut r = rig();
    assert_eq!(
        r.send(AppCommand::SetSaturation {
            endpoint: DIMMABLE,
            percent: 50.0,
        }),
        Err(Error::Request(RequestError::UnknownTrait))
    );
}

#[test]
fn unknown_endpoint_is_rejected() {
    let mut r = rig();
    assert_eq!(
        r.send(AppCommand::SetPower {
            endpoint: EndpointId(7),
            on: true,
        }),
        Err(Error::Request(RequestError::UnknownEndpoint))
    );
}

#[test]
fn failed_channel_write_is_logged_not_returned() {
    let mut r = rig();
    r.sink.events.clear();
    r.dimmable.set_failing(true);

    r.send(AppCommand::SetPower {
        endpoint: DIMMABLE,
        on: true,
    })
    .unwrap();
    r.process();

    assert_eq!(r.service.faults().total(), 1);
    let fault = *r.service.faults().latest().unwrap();
    assert_eq!(fault.gpio, 4);
    assert_eq!(fault.error, ActuatorError::PwmWriteFailed);
    assert!(r.sink.events.contains(&AppEvent::OutputFault(fault)));
    // Committed anyway.
    assert_eq!(r.nvs.get::<bool>("led0", "on"), Some(true));
}

#[test]
fn identify_runs_from_tick() {
    let mut r = rig();
    r.sink.events.clear();

    r.send(AppCommand::Identify).unwrap();
    assert_eq!(r.sink.events, vec![AppEvent::IdentifyStarted { blinks: 3 }]);
    assert_eq!(r.status.levels, vec![false]);

    for now in (250..1500).step_by(250) {
        r.service.tick(now, &mut r.status, &mut r.sink);
    }
    assert!(!r.sink.events.contains(&AppEvent::IdentifyCompleted));

    r.service.tick(1500, &mut r.status, &mut r.sink);
    assert_eq!(r.sink.events.last(), Some(&AppEvent::IdentifyCompleted));
    assert_eq!(r.status.levels, vec![false, true, false, true, false, true]);
    assert_eq!(r.service.metrics(1500).identify_runs, 1);
}

#[test]
fn identify_while_running_is_ignored() {
    let mut r = rig();
    r.sink.events.clear();

    r.send(AppCommand::Identify).unwrap();
    r.service.tick(300, &mut r.status, &mut r.sink);
    r.send(AppCommand::Identify).unwrap();

    let started = r
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::IdentifyStarted { .. }))
        .count();
    assert_eq!(started, 1);
    assert_eq!(r.status.levels, vec![false, true]);
}

#[test]
fn status_pin_failure_becomes_fault() {
    let mut r = rig();
    r.status.failing = true;

    r.send(AppCommand::Identify).unwrap();
    let fault = *r.service.faults().latest().unwrap();
    assert_eq!(fault.gpio, 10);
    assert_eq!(fault.error, ActuatorError::GpioWriteFailed);
    assert_eq!(fault.duty, 0);
}

#[test]
fn queued_commands_reach_the_service() {
    let mut r = rig();
    assert!(events::submit(AppCommand::SetPower {
        endpoint: DIMMABLE,
        on: true,
    }));
    assert!(events::submit(AppCommand::SetBrightness {
        endpoint: DIMMABLE,
        level: 20,
    }));

    let Rig {
        service,
        status,
        sink,
        ..
    } = &mut r;
    events::drain_commands(|cmd| {
        service
            .handle_command(cmd, 0, &mut *status, &mut *sink)
            .unwrap();
    });
    r.process();
    assert_eq!(r.dimmable.last(), Some(20));
}
