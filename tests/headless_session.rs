use std::sync::mpsc;
use std::time::Duration;

use thirty::ping::{NullPingSink, PingKind, PingSink};
use thirty::runtime::{Event, Runner, TestEventSource};
use thirty::session::{PingUnit, Session, SessionConfig, SessionEvent};

// Headless integration: drive a Session through the Runner/TestEventSource
// plumbing without a TTY, the way the shell does, and check that a full set
// plays out: cadenced pings, a single completion, counter increment.
#[test]
fn headless_full_set_via_runner() {
    let config = SessionConfig {
        set_minutes: 1,
        ping_value: 20,
        ping_unit: PingUnit::Seconds,
        volume: 60,
    };
    let mut session = Session::new(config, 0);
    let sink = NullPingSink::new();

    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(1));

    session.start();

    // Each Tick from the quiet source stands in for one elapsed second
    let mut completions = 0;
    for _ in 0..90u32 {
        if let Event::Tick = runner.step() {
            for event in session.advance() {
                match event {
                    SessionEvent::Ping => {
                        sink.play(PingKind::Awareness, session.config().volume);
                    }
                    SessionEvent::Completed => {
                        completions += 1;
                        sink.play(PingKind::Completion, session.config().volume);
                    }
                }
            }
        }
        if !session.is_running() && session.remaining_seconds() == 0 {
            break;
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(session.sets_done(), 1);
    assert_eq!(session.remaining_seconds(), 0);

    // Pings at elapsed 20/40/60; the last one shares the tick with completion
    assert_eq!(
        sink.played(),
        vec![
            (PingKind::Awareness, 60),
            (PingKind::Awareness, 60),
            (PingKind::Awareness, 60),
            (PingKind::Completion, 60),
        ]
    );
}

#[test]
fn headless_key_events_pass_through_runner() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(10));

    tx.send(Event::Key(KeyEvent::new(
        KeyCode::Char(' '),
        KeyModifiers::NONE,
    )))
    .unwrap();

    let mut session = Session::new(
        SessionConfig {
            set_minutes: 1,
            ping_unit: PingUnit::Off,
            ..SessionConfig::default()
        },
        0,
    );

    match runner.step() {
        Event::Key(key) => {
            if key.code == KeyCode::Char(' ') {
                session.toggle();
            }
        }
        other => panic!("expected the key event, got {:?}", other),
    }

    assert!(session.is_running());
}

#[test]
fn headless_pause_freezes_remaining_across_ticks() {
    let mut session = Session::new(
        SessionConfig {
            set_minutes: 1,
            ping_unit: PingUnit::Off,
            ..SessionConfig::default()
        },
        0,
    );

    session.start();
    for _ in 0..10 {
        session.advance();
    }
    let frozen = session.remaining_seconds();

    session.pause();
    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(1));

    for _ in 0..25u32 {
        if let Event::Tick = runner.step() {
            session.advance();
        }
    }

    assert_eq!(session.remaining_seconds(), frozen);
}
