//! Timing scenarios against the real actors.
//!
//! Each test runs with paused time, so every assertion about elapsed time is
//! exact.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use folio::actors::{CounterActor, TypewriterActor};
use folio::counter::ViewportCounter;
use folio::tea::Message;
use folio::typewriter::{Phase, Typewriter, TypewriterConfig};

#[derive(Debug, PartialEq)]
struct Frame {
    at_ms: u64,
    text: String,
    word_index: usize,
    phase: Phase,
}

/// Scenario: "Vision" types in 600ms, pauses 500ms, deletes in 300ms and the
/// cycle moves on to "NLP" on the tick that empties the text.
#[tokio::test(start_paused = true)]
async fn test_typewriter_type_pause_delete_timing() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let config = TypewriterConfig::new(["Vision", "NLP"], 100, 500);
    let handle = TypewriterActor::new(Typewriter::new(config).unwrap(), tx).spawn();
    let start = Instant::now();

    let mut frames = Vec::new();
    while frames.len() < 14 {
        if let Some(Message::TypewriterFrame {
            text,
            word_index,
            phase,
        }) = rx.recv().await
        {
            frames.push(Frame {
                at_ms: start.elapsed().as_millis() as u64,
                text,
                word_index,
                phase,
            });
        }
    }
    handle.shutdown();

    assert_eq!(
        frames[5],
        Frame {
            at_ms: 600,
            text: "Vision".to_string(),
            word_index: 0,
            phase: Phase::PausingAfterTyped,
        }
    );
    assert_eq!(frames[6].at_ms, 1100);
    assert_eq!(frames[6].phase, Phase::Deleting);
    assert_eq!(frames[6].text, "Vision");

    // Six deletions at 50ms each
    let last = &frames[12];
    assert_eq!(last.at_ms, 1400);
    assert_eq!(last.text, "");
    assert_eq!(last.word_index, 1);
    assert_eq!(last.phase, Phase::Typing);

    assert_eq!(frames[13].text, "N");
    assert_eq!(frames[13].at_ms, 1500);
}

/// A typewriter that is typing never shows anything but a prefix of the
/// current word, one grapheme longer or shorter than the frame before.
#[tokio::test(start_paused = true)]
async fn test_typewriter_frames_are_prefixes() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let words = ["naïve", "日本語", "e\u{301}tude"];
    let config = TypewriterConfig::new(words, 20, 100);
    let handle = TypewriterActor::new(Typewriter::new(config).unwrap(), tx).spawn();

    let mut previous = 0usize;
    for _ in 0..60 {
        let Some(Message::TypewriterFrame {
            text, word_index, ..
        }) = rx.recv().await
        else {
            continue;
        };
        assert!(words[word_index].starts_with(&text), "{:?}", text);
        let len = unicode_len(&text);
        assert!(len.abs_diff(previous) <= 1 || len == 0);
        previous = len;
    }
    handle.shutdown();
}

fn unicode_len(text: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    text.graphemes(true).count()
}

async fn run_counter(target: i64) -> (Vec<u64>, Duration) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let counter = ViewportCounter::new(target).unwrap();
    let handle = CounterActor::new(0, 0, counter, tx).spawn();
    let start = Instant::now();
    handle.notify_visibility(true).unwrap();

    let mut values = Vec::new();
    let mut finished_at = Duration::ZERO;
    while let Some(msg) = rx.recv().await {
        if let Message::CounterFrame { value, done, .. } = msg {
            values.push(value);
            if done {
                finished_at = start.elapsed();
            }
        }
    }
    (values, finished_at)
}

/// Scenario: target 100 steps by 2 every 30ms and lands on 100 at 1500ms,
/// with no 51st tick.
#[tokio::test(start_paused = true)]
async fn test_counter_hundred() {
    let (values, finished_at) = run_counter(100).await;
    assert_eq!(values.len(), 50);
    assert_eq!(values[0], 2);
    assert_eq!(values[49], 100);
    assert_eq!(finished_at, Duration::from_millis(1500));
}

/// Scenario: target 37 steps by 0.74; the last value is exactly 37.
#[tokio::test(start_paused = true)]
async fn test_counter_fractional_step_clamps() {
    let (values, _) = run_counter(37).await;
    assert_eq!(values.len(), 50);
    assert_eq!(values[0], 0);
    assert_eq!(values[1], 1);
    assert_eq!(*values.last().unwrap(), 37);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values.iter().all(|v| *v <= 37));
}
