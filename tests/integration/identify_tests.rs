//! Identify routine: async runner and non-blocking state machine.

use futures_lite::future::block_on;
use xiaolight::config::AccessoryConfig;
use xiaolight::lights::identify::{IdentifyRoutine, IdentifyState};
use xiaolight::lights::info::AccessoryInformation;

use crate::mock_hw::{InfallibleStatus, MockDelay, MockStatus};

#[test]
fn async_run_three_blinks() {
    let mut routine = IdentifyRoutine::new(3);
    let mut pin = InfallibleStatus::default();
    let mut delay = MockDelay::default();

    assert!(block_on(routine.run(&mut pin, &mut delay)));
    assert_eq!(pin.levels, vec![false, true, false, true, false, true]);
    assert_eq!(delay.waits_ns, vec![250_000_000; 6]);
    assert_eq!(delay.total_ms(), 1500);
}

#[test]
fn async_run_zero_blinks_touches_nothing() {
    let mut routine = IdentifyRoutine::new(0);
    let mut pin = InfallibleStatus::default();
    let mut delay = MockDelay::default();

    assert!(block_on(routine.run(&mut pin, &mut delay)));
    assert!(pin.levels.is_empty());
    assert_eq!(delay.total_ms(), 0);
}

#[test]
fn polled_sequence_matches_async_cadence() {
    let mut routine = IdentifyRoutine::new(3);
    let mut pin = MockStatus::default();

    assert!(routine.start(10_000, &mut pin));
    let mut now = 10_000;
    while routine.poll(now, &mut pin) != IdentifyState::Done {
        now += 10;
        assert!(now <= 12_000, "sequence did not finish");
    }
    assert_eq!(now, 11_500);
    assert_eq!(pin.levels, vec![false, true, false, true, false, true]);
    assert!(routine.complete());
    assert!(!routine.complete());
    assert_eq!(routine.state(), IdentifyState::Idle);
}

#[test]
fn restart_after_completion() {
    let mut routine = IdentifyRoutine::with_half_period(1, 100);
    let mut pin = MockStatus::default();

    routine.start(0, &mut pin);
    routine.poll(100, &mut pin);
    routine.poll(200, &mut pin);
    assert!(routine.complete());
    assert!(routine.start(300, &mut pin));
    assert!(routine.is_running());
}

#[test]
fn failed_write_still_completes() {
    let mut routine = IdentifyRoutine::new(2);
    let mut pin = MockStatus {
        failing: true,
        ..Default::default()
    };

    routine.start(0, &mut pin);
    for now in [250, 500, 750] {
        routine.poll(now, &mut pin);
    }
    assert_eq!(routine.poll(1_000, &mut pin), IdentifyState::Done);
    // Last failed level wins.
    assert_eq!(routine.take_failed_level(), Some(true));
    assert_eq!(routine.take_failed_level(), None);
}

#[test]
fn accessory_information_from_config() {
    let config = AccessoryConfig {
        identify_blinks: 5,
        identify_half_period_ms: 100,
        ..Default::default()
    };
    let mut info = AccessoryInformation::from_config(&config);
    assert_eq!(info.identify().n_blinks(), 5);
    assert_eq!(info.identify().half_period_ms(), 100);
    assert_eq!(info.status_gpio(), config.status_gpio);
    assert_eq!(info.identity(), &config.identity);

    let mut pin = MockStatus::default();
    assert!(info.request_identify(0, &mut pin));
    for now in (100..1_000).step_by(100) {
        assert!(!info.poll_identify(now, &mut pin));
    }
    assert!(!info.poll_identify(999, &mut pin));
    assert!(info.poll_identify(1_000, &mut pin));
    assert_eq!(pin.levels.len(), 10);
}
