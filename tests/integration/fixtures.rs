//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Driving the model and the real actors the way the logic thread does
//! - Writing config files into temporary directories

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use tokio::sync::mpsc;

use folio::app::Actors;
use folio::config::Config;
use folio::tea::{update, Message, Model};

/// Simulated time between two drains of the message queue.
pub const STEP: Duration = Duration::from_millis(5);

/// Model plus live actors, pumped by hand.
///
/// Must be created inside a tokio runtime, normally a
/// `#[tokio::test(start_paused = true)]` so that time only moves when the
/// test sleeps.
pub struct Harness {
    pub model: Model,
    pub actors: Actors,
    pub msg_tx: mpsc::UnboundedSender<Message>,
    msg_rx: mpsc::UnboundedReceiver<Message>,
    pub quit: bool,
}

impl Harness {
    /// Spawn everything for `config` in a `width` x `height` terminal.
    pub fn new(config: Config, width: u16, height: u16) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let actors = Actors::spawn(&config, msg_tx.clone()).expect("spawn actors");
        let mut harness = Self {
            model: Model::new(config),
            actors,
            msg_tx,
            msg_rx,
            quit: false,
        };
        harness.send(Message::Resize(width, height));
        harness
    }

    /// Apply one message and execute the resulting commands.
    pub fn send(&mut self, msg: Message) {
        for cmd in update(&mut self.model, msg) {
            if self
                .actors
                .execute(cmd, &self.msg_tx)
                .expect("execute command")
            {
                self.quit = true;
            }
        }
    }

    pub fn key(&mut self, code: KeyCode) {
        self.send(Message::Key(KeyEvent::new(code, KeyModifiers::empty())));
    }

    /// Apply every queued background message.
    pub fn drain(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.send(msg);
        }
    }

    /// Let `duration` of simulated time pass, draining as the logic thread
    /// would.
    pub async fn run_for(&mut self, duration: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            tokio::time::sleep(STEP).await;
            elapsed += STEP;
            self.drain();
        }
    }

    /// (value, done) of every counter, in config order.
    pub fn counter_values(&self) -> Vec<(u64, bool)> {
        self.model
            .counters
            .iter()
            .map(|c| (c.value, c.done))
            .collect()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.actors.shutdown();
    }
}

/// A temporary directory holding a config file.
pub struct ConfigDir {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl ConfigDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("folio.toml");
        Self { temp_dir, path }
    }

    pub fn write(&self, contents: &str) {
        write_file(&self.path, contents);
    }
}

pub fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("Failed to write config");
}
