use std::fs;

use tempfile::tempdir;
use thirty::prefs::{FilePrefStore, PrefStore, Prefs};
use thirty::session::{PingUnit, Session, SessionConfig};

// End-to-end persistence contract: what a session writes, a fresh process
// (here: a fresh store over the same path) reads back identically.
#[test]
fn session_state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let config = SessionConfig {
        set_minutes: 50,
        ping_value: 10,
        ping_unit: PingUnit::Minutes,
        volume: 35,
    };
    let mut session = Session::new(config, 0);
    session.start();
    for _ in 0..50 * 60 {
        session.advance();
    }
    assert_eq!(session.sets_done(), 1);

    FilePrefStore::with_path(&path)
        .save(&Prefs::from_session(session.config(), session.sets_done()))
        .unwrap();

    // "Restart": a new store and a new session built from what it loads
    let prefs = FilePrefStore::with_path(&path).load();
    let restored = Session::new(prefs.config(), prefs.sets_done);

    assert_eq!(restored.sets_done(), 1);
    assert_eq!(restored.config(), session.config());
    assert_eq!(restored.remaining_seconds(), 50 * 60);
    assert!(!restored.is_running());
}

#[test]
fn first_run_without_a_file_yields_the_documented_defaults() {
    let dir = tempdir().unwrap();
    let prefs = FilePrefStore::with_path(dir.path().join("state.json")).load();

    assert_eq!(prefs.sets_done, 0);
    assert_eq!(prefs.set_minutes, 30);
    assert_eq!(prefs.ping_value, 5);
    assert_eq!(prefs.ping_unit, PingUnit::Minutes);
    assert_eq!(prefs.volume, 50);

    let session = Session::new(prefs.config(), prefs.sets_done);
    assert_eq!(session.remaining_seconds(), 30 * 60);
}

#[test]
fn file_written_by_an_older_build_still_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    // Flat object with a float volume and no unit key
    fs::write(
        &path,
        br#"{"sets_done": 4, "set_minutes": 30, "ping_value": 5, "volume": 50.0}"#,
    )
    .unwrap();

    let prefs = FilePrefStore::with_path(&path).load();
    assert_eq!(prefs.sets_done, 4);
    assert_eq!(prefs.volume, 50);
    assert_eq!(prefs.ping_unit, PingUnit::Minutes);
}

#[test]
fn truncated_file_falls_back_to_defaults_silently() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, br#"{"sets_done": 4, "set_min"#).unwrap();

    let prefs = FilePrefStore::with_path(&path).load();
    assert_eq!(prefs, Prefs::default());
}

#[test]
fn save_is_a_full_object_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = FilePrefStore::with_path(&path);

    store
        .save(&Prefs {
            sets_done: 9,
            ..Prefs::default()
        })
        .unwrap();
    store
        .save(&Prefs {
            sets_done: 2,
            ..Prefs::default()
        })
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["sets_done"], 2);
    assert_eq!(value["set_minutes"], 30);
    assert_eq!(value["ping_unit"], "Minutes");
}
