//! Broker session lifecycle scenarios: bounded retry bursts, fresh client
//! identities, drop recovery, report delivery policy, and inbound command
//! handling — all driven through `ControlLoop::tick`.

use crate::mock_hw::{MockBroker, MockClock, MockHardware, MockLink};

use levelguard::app::ports::{ControlSignal, RestartReason};
use levelguard::app::service::ControlLoop;
use levelguard::config::SystemConfig;

fn make_loop() -> ControlLoop {
    ControlLoop::new(&SystemConfig::default(), 0x4c47)
}

// ── Retry burst ───────────────────────────────────────────────

#[test]
fn unreachable_broker_bounds_the_burst_and_control_continues() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::unreachable();
    let mut clock = MockClock::new();

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);

    // Exactly five dials, a backoff after every failure — the final one
    // included — then the tick carries on and paces normally.
    assert_eq!(broker.connect_ids.len(), 5);
    assert_eq!(clock.delays, vec![5_000, 5_000, 5_000, 5_000, 5_000, 500]);

    // The level was still sampled and the outputs still driven: a broker
    // outage never stops the tank control itself.
    assert_eq!(hw.reads, 1);
    assert_eq!(hw.calls.len(), 3);
}

#[test]
fn every_dial_uses_a_fresh_prefixed_identity() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::unreachable();
    let mut clock = MockClock::new();

    // Two full failed bursts.
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);

    assert_eq!(broker.connect_ids.len(), 10);
    for id in &broker.connect_ids {
        assert!(id.starts_with("levelguard-"), "unexpected id {id}");
        assert_eq!(id.len(), "levelguard-".len() + 4);
    }
    // No identity is ever reused, within a burst or across ticks.
    let mut unique = broker.connect_ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 10);
}

#[test]
fn accepting_dial_mid_burst_stops_the_burst() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::reachable();
    broker.reject_dials = 2;
    let mut clock = MockClock::new();

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);

    assert_eq!(broker.connect_ids.len(), 3);
    assert_eq!(clock.delays, vec![5_000, 5_000, 500]);
    assert_eq!(broker.subscribed, vec!["levelguard/alert"]);
    assert_eq!(broker.published_strings(), vec!["device online"]);
}

// ── Drop recovery ─────────────────────────────────────────────

#[test]
fn dropped_session_redials_and_announces_again() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();

    // A session that is already live at first sight is reused as-is.
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    assert!(broker.connect_ids.is_empty());
    assert!(broker.published.is_empty());

    // The broker drops us; the next tick redials and re-announces.
    broker.connected = false;
    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);
    assert_eq!(broker.connect_ids.len(), 1);
    assert_eq!(broker.subscribed, vec!["levelguard/alert"]);
    assert_eq!(broker.published_strings(), vec!["device online"]);
}

// ── Report delivery policy ────────────────────────────────────

#[test]
fn crossing_while_offline_is_dropped_not_queued() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[4000]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::unreachable();
    let mut clock = MockClock::new();

    // The alarm crossing happens on the third tick with no session up:
    // the alert is dropped, not queued.
    for _ in 0..3 {
        ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    }
    assert!(hw.relay_on());
    assert!(broker.published.is_empty());

    // The broker comes back; connecting does not retro-publish the
    // missed alert.
    broker.reject_dials = 0;
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    assert_eq!(broker.published_strings(), vec!["device online"]);

    // The next crossing is the recovery mechanism.
    hw.readings.push_back(1000);
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock); // 73%, still high
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock); // 48%, crossed back
    assert_eq!(
        broker.published_strings(),
        vec!["device online", "Water level normal (48%), valve open"]
    );
}

#[test]
fn failed_publish_is_dropped_and_never_retried() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[4000]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    broker.fail_publish = true;
    let mut clock = MockClock::new();

    for _ in 0..3 {
        assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);
    }
    assert!(hw.relay_on(), "publish failure must not affect control");
    assert!(broker.published.is_empty());

    // Delivery recovers but the state has not changed since the failed
    // report, so nothing is re-sent.
    broker.fail_publish = false;
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    assert!(broker.published.is_empty());
}

#[test]
fn failed_subscribe_keeps_the_session_alive() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::reachable();
    broker.fail_subscribe = true;
    let mut clock = MockClock::new();

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);

    // Subscribe failed, but the session stands and the announcement was
    // still attempted.
    assert!(broker.connected);
    assert!(broker.subscribed.is_empty());
    assert_eq!(broker.published_strings(), vec!["device online"]);

    // No redial on the next tick.
    ctl.tick(&mut hw, &mut link, &mut broker, &mut clock);
    assert_eq!(broker.connect_ids.len(), 1);
}

// ── Inbound commands ──────────────────────────────────────────

#[test]
fn embedded_reset_command_triggers_restart() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();
    broker.push_inbound(b"please RESETX now");

    assert_eq!(
        ctl.tick(&mut hw, &mut link, &mut broker, &mut clock),
        Some(ControlSignal::Restart(RestartReason::RemoteCommand))
    );
}

#[test]
fn lowercase_reset_is_ignored() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();
    broker.push_inbound(b"reset");

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);
    assert_eq!(hw.reads, 1, "tick must run to completion");
    assert_eq!(clock.delays, vec![500]);
}

#[test]
fn garbage_inbound_is_drained_and_ignored() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();
    broker.push_inbound(b"hello");
    broker.push_inbound(b"{\"cmd\":\"status\"}");
    broker.push_inbound(b"RES ET");

    assert_eq!(ctl.tick(&mut hw, &mut link, &mut broker, &mut clock), None);
    assert!(broker.inbound.is_empty(), "queue must be fully drained");
    assert_eq!(hw.calls.len(), 3);
}

#[test]
fn reset_queued_behind_garbage_still_fires() {
    let mut ctl = make_loop();
    let mut hw = MockHardware::with_readings(&[2500]);
    let mut link = MockLink::up();
    let mut broker = MockBroker::live();
    let mut clock = MockClock::new();
    broker.push_inbound(b"hello");
    broker.push_inbound(b"RESET");

    assert_eq!(
        ctl.tick(&mut hw, &mut link, &mut broker, &mut clock),
        Some(ControlSignal::Restart(RestartReason::RemoteCommand))
    );
    assert!(broker.inbound.is_empty());
}
