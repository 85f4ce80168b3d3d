//! Headless runs of the animations, for `folio type` and `folio count`.
//!
//! Both drive the real actors and hand every frame to a callback, so what
//! prints on the terminal is exactly what the TUI would have drawn.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::actors::{CounterActor, TypewriterActor};
use crate::counter::{CounterConfig, ViewportCounter};
use crate::tea::Message;
use crate::typewriter::{Phase, Typewriter, TypewriterConfig};
use crate::{flog_debug, Error, Result};

/// One typewriter frame, as emitted with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRecord {
    pub elapsed_ms: u64,
    pub word_index: usize,
    pub phase: Phase,
    pub text: String,
}

/// One counter frame, as emitted with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRecord {
    pub elapsed_ms: u64,
    pub value: u64,
    pub display: String,
    pub done: bool,
}

/// Run the typewriter for `cycles` full passes over its words.
///
/// A pass ends on the tick that finishes deleting the last word, which is the
/// only tick that leaves the first word empty while typing.
pub async fn run_typewriter<F>(config: TypewriterConfig, cycles: u32, mut on_frame: F) -> Result<()>
where
    F: FnMut(TypeRecord),
{
    let typewriter = Typewriter::new(config)?;
    if cycles == 0 {
        return Ok(());
    }

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel();
    let handle = TypewriterActor::new(typewriter, msg_tx).spawn();
    let start = Instant::now();
    let mut completed = 0;

    while let Some(msg) = msg_rx.recv().await {
        let Message::TypewriterFrame {
            text,
            word_index,
            phase,
        } = msg
        else {
            continue;
        };

        let wrapped = word_index == 0 && phase == Phase::Typing && text.is_empty();
        on_frame(TypeRecord {
            elapsed_ms: start.elapsed().as_millis() as u64,
            word_index,
            phase,
            text,
        });

        if wrapped {
            completed += 1;
            flog_debug!("Typewriter cycle {}/{} done", completed, cycles);
            if completed >= cycles {
                break;
            }
        }
    }

    handle.shutdown();
    Ok(())
}

/// Trigger one counter as if it had just scrolled into view and run it to
/// the end.
pub async fn run_counter<F>(config: CounterConfig, mut on_frame: F) -> Result<()>
where
    F: FnMut(CountRecord),
{
    let counter = ViewportCounter::from_config(&config)?;

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel();
    let handle = CounterActor::new(0, 0, counter, msg_tx).spawn();
    let start = Instant::now();
    handle.notify_visibility(true)?;

    while let Some(msg) = msg_rx.recv().await {
        let Message::CounterFrame { value, done, .. } = msg else {
            continue;
        };
        on_frame(CountRecord {
            elapsed_ms: start.elapsed().as_millis() as u64,
            value,
            display: config.format_value(value),
            done,
        });
        if done {
            handle.shutdown();
            return Ok(());
        }
    }

    Err(Error::ChannelClosed(
        "counter actor stopped before finishing".to_string(),
    ))
}
