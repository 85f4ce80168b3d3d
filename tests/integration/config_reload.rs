//! Live reload: a changed config file reaches the running actors.

use std::time::Duration;

use tokio::sync::mpsc;

use folio::config::Config;
use folio::tea::NotificationLevel;
use folio::watch::{spawn_reloader, DEBOUNCE};

use crate::fixtures::{ConfigDir, Harness};

const RELOADED: &str = r#"
[typewriter]
words = ["Rust"]
type_speed_ms = 10
pause_ms = 100

[[counters]]
target = 12
label = "Papers"
suffix = ""
"#;

#[tokio::test(start_paused = true)]
async fn test_reload_restarts_typewriter_and_counters() {
    let dir = ConfigDir::new();
    dir.write(RELOADED);

    let mut h = Harness::new(Config::default(), 80, 200);
    let (change_tx, change_rx) = mpsc::unbounded_channel();
    let reloader = spawn_reloader(dir.path.clone(), Config::default(), change_rx, h.msg_tx.clone());

    // Let the original counters finish first
    h.run_for(Duration::from_millis(1600)).await;
    assert!(h.model.counters.iter().all(|c| c.done));

    change_tx.send(()).unwrap();
    h.run_for(DEBOUNCE + Duration::from_millis(5)).await;

    assert_eq!(h.model.config.typewriter.words, vec!["Rust"]);
    assert_eq!(h.model.counter_generation, 1);
    assert_eq!(h.model.counters.len(), 1);
    assert_eq!(
        h.model.notification.as_ref().map(|n| n.level),
        Some(NotificationLevel::Info)
    );

    // The replacement counter is on screen and runs from zero
    h.run_for(Duration::from_millis(1510)).await;
    assert_eq!(h.model.counters[0].value, 12);
    assert!(h.model.counters[0].done);
    assert_eq!(h.model.snapshot().counters[0].display_value(), "12");

    // Typewriter now cycles the new word only
    assert_eq!(h.model.word_index, 0);
    assert!("Rust".starts_with(&h.model.typed));

    reloader.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_broken_file_keeps_running_config() {
    let dir = ConfigDir::new();
    dir.write("[typewriter]\nwords = []\n");

    let mut h = Harness::new(Config::default(), 80, 15);
    let (change_tx, change_rx) = mpsc::unbounded_channel();
    let reloader = spawn_reloader(dir.path.clone(), Config::default(), change_rx, h.msg_tx.clone());

    change_tx.send(()).unwrap();
    h.run_for(DEBOUNCE * 2).await;

    let notification = h.model.notification.clone().expect("notification");
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(h.model.config, Config::default());
    assert_eq!(h.model.counter_generation, 0);

    // The original typewriter is still going
    assert!(!h.model.typed.is_empty());

    reloader.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_profile_only_change_keeps_animations() {
    let dir = ConfigDir::new();
    let mut edited = Config::default();
    edited.profile.name = "Sam Lee".to_string();
    edited.save_to(&dir.path).unwrap();

    let mut h = Harness::new(Config::default(), 80, 200);
    h.run_for(Duration::from_millis(600)).await;
    let before = h.counter_values();

    let (change_tx, change_rx) = mpsc::unbounded_channel();
    let reloader = spawn_reloader(dir.path.clone(), Config::default(), change_rx, h.msg_tx.clone());
    change_tx.send(()).unwrap();
    h.run_for(DEBOUNCE + Duration::from_millis(5)).await;

    assert_eq!(h.model.snapshot().initials, "SL");
    assert_eq!(h.model.counter_generation, 0);
    // Counters kept counting instead of starting over
    let after = h.counter_values();
    assert!(after.iter().zip(&before).all(|(a, b)| a.0 >= b.0));

    reloader.shutdown();
}
