//! End-to-end page behavior: scrolling drives the counters, the typewriter
//! feeds the model, and keys reach the right commands.

use std::time::Duration;

use crossterm::event::KeyCode;

use folio::config::Config;
use folio::content::SectionId;
use folio::counter::CounterConfig;
use folio::typewriter::{Phase, TypewriterConfig};

use crate::fixtures::Harness;

const TARGETS: [(u64, bool); 4] = [(90, true), (89, true), (35, true), (8, true)];

#[tokio::test(start_paused = true)]
async fn test_counters_wait_below_the_fold() {
    let mut h = Harness::new(Config::default(), 80, 15);
    h.run_for(Duration::from_secs(3)).await;
    assert_eq!(h.counter_values(), vec![(0, false); 4]);
    assert!(h.model.counters.iter().all(|c| !c.started));
}

#[tokio::test(start_paused = true)]
async fn test_scrolling_into_view_runs_counters_to_target() {
    let mut h = Harness::new(Config::default(), 80, 15);
    h.key(KeyCode::Tab);
    assert_eq!(h.model.snapshot().active_section, SectionId::Highlights);

    h.run_for(Duration::from_millis(750)).await;
    let halfway = h.counter_values();
    assert!(halfway.iter().all(|(_, done)| !done));
    assert!(halfway[0].0 > 30 && halfway[0].0 < 60, "{:?}", halfway);

    h.run_for(Duration::from_millis(800)).await;
    assert_eq!(h.counter_values(), TARGETS.to_vec());

    let snapshot = h.model.snapshot();
    let shown: Vec<String> = snapshot.counters.iter().map(|c| c.display_value()).collect();
    assert_eq!(shown, vec!["90%", "89%", "35%", "8+"]);
}

#[tokio::test(start_paused = true)]
async fn test_scrolling_away_mid_animation_does_not_stop_or_restart() {
    let mut h = Harness::new(Config::default(), 80, 15);
    h.key(KeyCode::Tab);
    h.run_for(Duration::from_millis(300)).await;

    h.key(KeyCode::Char('g'));
    h.run_for(Duration::from_millis(200)).await;
    h.key(KeyCode::Tab);
    h.run_for(Duration::from_millis(1100)).await;

    // Still on the original 1500ms schedule
    assert_eq!(h.counter_values(), TARGETS.to_vec());

    // And nothing moves after completion
    h.key(KeyCode::Char('g'));
    h.key(KeyCode::Tab);
    h.run_for(Duration::from_secs(2)).await;
    assert_eq!(h.counter_values(), TARGETS.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_counters_are_independent() {
    let mut config = Config::default();
    config.counters = vec![
        CounterConfig::new(100, "First"),
        CounterConfig::new(0, "Zero"),
    ];
    let mut h = Harness::new(config, 80, 15);
    let first = h.model.page.counter_span(0).unwrap().top;
    while h.model.viewport.bottom() <= first {
        h.key(KeyCode::Down);
    }
    h.run_for(Duration::from_millis(610)).await;
    assert_eq!(h.counter_values()[0], (40, false));
    assert_eq!(h.counter_values()[1], (0, false));
    assert!(!h.model.counters[1].started);

    h.key(KeyCode::Down);
    h.run_for(Duration::from_millis(10)).await;
    assert_eq!(h.counter_values()[1], (0, true));

    h.run_for(Duration::from_millis(1000)).await;
    assert_eq!(h.counter_values()[0], (100, true));
}

#[tokio::test(start_paused = true)]
async fn test_tall_terminal_starts_counters_immediately() {
    let mut h = Harness::new(Config::default(), 80, 200);
    h.run_for(Duration::from_millis(1510)).await;
    assert_eq!(h.counter_values(), TARGETS.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_typewriter_frames_reach_the_model() {
    let mut config = Config::default();
    config.typewriter = TypewriterConfig::new(["Computer Vision"], 80, 2000);
    let mut h = Harness::new(config, 80, 15);

    h.run_for(Duration::from_millis(410)).await;
    assert_eq!(h.model.typed, "Compu");
    assert_eq!(h.model.phase, Phase::Typing);
    assert_eq!(h.model.snapshot().typed, "Compu");
}

#[tokio::test(start_paused = true)]
async fn test_quit_key_stops_the_loop() {
    let mut h = Harness::new(Config::default(), 80, 15);
    assert!(!h.quit);
    h.key(KeyCode::Char('q'));
    assert!(h.quit);
}
