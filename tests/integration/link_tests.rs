//! Link supervision scenarios driven through the full control tick.
//!
//! The watchdog policy itself has unit tests next to its implementation;
//! these verify how a link outage interacts with the rest of the tick:
//! what runs, what is skipped, and what the escalation looks like.

use crate::mock_hw::{MockBroker, MockClock, MockHardware, MockLink};

use levelguard::app::ports::{ControlSignal, RestartReason};
use levelguard::app::service::ControlLoop;
use levelguard::config::SystemConfig;

fn make_loop() -> ControlLoop {
    ControlLoop::new(&SystemConfig::default(), 0x4c47)
}

#[test]
fn persistent_outage_escalates_and_skips_the_tick_body() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::down();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();

    assert_eq!(
        ctl.tick(&mut hw, &mut link, &mut broker, &mut clock),
        Some(ControlSignal::Restart(RestartReason::LinkLost))
    );

    // One reconnect kick and one grace wait — then straight out, with no
    // broker traffic, no sampling, no actuation, no pacing delay.
    assert_eq!(link.reconnects, 1);
    assert_eq!(clock.delays, vec![5_000]);
    assert!(broker.connect_ids.is_empty());
    assert_eq!(hw.reads, 0);
    assert!(hw.calls.is_empty());
    assert_eq!(ctl.tick_count(), 1);
}

#[test]
fn link_blip_recovers_within_grace_and_tick_continues() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::down();
    link.recover_on_reconnect = true;
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);

    // Grace wait followed by the normal pacing delay: the tick ran.
    assert_eq!(clock.delays, vec![5_000, 500]);
    assert_eq!(hw.reads, 1);
    assert_eq!(hw.calls.len(), 3);
}

#[test]
fn healthy_link_is_never_kicked() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();

    for _ in 0..5 {
        assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);
    }
    assert_eq!(link.reconnects, 0);
    assert_eq!(clock.delays, vec![500; 5]);
}
