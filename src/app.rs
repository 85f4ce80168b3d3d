use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::actors::{CounterActor, CounterHandle, TypewriterActor, TypewriterHandle};
use crate::config::Config;
use crate::counter::{CounterConfig, ViewportCounter};
use crate::render::RenderState;
use crate::tea::{update, Command, Message, Model};
use crate::typewriter::Typewriter;
use crate::watch::{self, ConfigWatcher};
use crate::{flog_debug, flog_error, flog_trace, flog_warn, Result};

const MAX_BG_MESSAGES: usize = 50;

pub struct LogicThread;

impl LogicThread {
    /// Run until `shutdown` is set or the user quits. `config_path` enables
    /// live reload of that file.
    pub fn run(
        config: Config,
        config_path: Option<PathBuf>,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(config, config_path, state_tx, shutdown))
    }

    async fn run_async(
        config: Config,
        config_path: Option<PathBuf>,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        flog_debug!(
            "LogicThread::run_async words={} counters={}",
            config.typewriter.words.len(),
            config.counters.len()
        );
        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
        let mut model = Model::new(config.clone());
        let mut actors = Actors::spawn(&config, msg_tx.clone())?;

        let _watcher: Option<ConfigWatcher> = config_path.and_then(|path| {
            match watch::watch(&path, config.clone(), msg_tx.clone()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    flog_warn!("Live reload disabled: {}", e);
                    None
                }
            }
        });

        // The first resize sizes the viewport and reveals anything above the fold
        let (width, height) = terminal::size()?;
        for cmd in update(&mut model, Message::Resize(width, height)) {
            actors.execute(cmd, &msg_tx)?;
        }
        send_state(&state_tx, &model);
        model.dirty = false;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                let msg = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => Message::Key(key),
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };

                for cmd in update(&mut model, msg) {
                    if actors.execute(cmd, &msg_tx)? {
                        shutdown.store(true, Ordering::Relaxed);
                        actors.shutdown();
                        return Ok(());
                    }
                }

                if model.dirty {
                    send_state(&state_tx, &model);
                    model.dirty = false;
                }
            }

            // Background messages (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                for cmd in update(&mut model, msg) {
                    if actors.execute(cmd, &msg_tx)? {
                        shutdown.store(true, Ordering::Relaxed);
                        actors.shutdown();
                        return Ok(());
                    }
                }
            }

            if model.dirty {
                send_state(&state_tx, &model);
                model.dirty = false;
            }

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        actors.shutdown();
        Ok(())
    }
}

fn send_state(state_tx: &Sender<RenderState>, model: &Model) {
    let _ = state_tx.try_send(model.snapshot());
}

/// The running animation actors.
pub struct Actors {
    typewriter: TypewriterHandle,
    /// Indexed like the configured counters.
    counters: Vec<CounterHandle>,
}

impl Actors {
    /// Spawn the typewriter and one idle actor per counter. Must be called
    /// inside a tokio runtime.
    pub fn spawn(config: &Config, msg_tx: mpsc::UnboundedSender<Message>) -> Result<Self> {
        let typewriter = Typewriter::new(config.typewriter.clone())?;
        let typewriter = TypewriterActor::new(typewriter, msg_tx.clone()).spawn();
        let counters = spawn_counters(0, &config.counters, &msg_tx)?;
        Ok(Self {
            typewriter,
            counters,
        })
    }

    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }

    /// Execute one command. Returns `true` when the app should quit.
    pub fn execute(
        &mut self,
        cmd: Command,
        msg_tx: &mpsc::UnboundedSender<Message>,
    ) -> Result<bool> {
        match cmd {
            Command::NotifyVisibility { index, visible } => {
                flog_trace!("Command::NotifyVisibility index={} visible={}", index, visible);
                if let Some(counter) = self.counters.get(index) {
                    // A finished counter has dropped its receiver; nothing to do
                    if counter.notify_visibility(visible).is_err() {
                        flog_trace!("Counter {} already finished", index);
                    }
                }
            }

            Command::ReconfigureTypewriter(config) => {
                flog_debug!("Command::ReconfigureTypewriter words={}", config.words.len());
                if let Err(e) = self.typewriter.reconfigure(config) {
                    flog_error!("Typewriter reconfigure failed: {}", e);
                }
            }

            Command::RespawnCounters {
                generation,
                counters,
            } => {
                flog_debug!(
                    "Command::RespawnCounters gen={} count={}",
                    generation,
                    counters.len()
                );
                for counter in &self.counters {
                    counter.shutdown();
                }
                self.counters = spawn_counters(generation, &counters, msg_tx)?;
            }

            Command::Quit => {
                flog_debug!("Command::Quit");
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub fn shutdown(&self) {
        flog_debug!("Shutting down {} actors", self.counters.len() + 1);
        self.typewriter.shutdown();
        for counter in &self.counters {
            counter.shutdown();
        }
    }
}

fn spawn_counters(
    generation: u64,
    configs: &[CounterConfig],
    msg_tx: &mpsc::UnboundedSender<Message>,
) -> Result<Vec<CounterHandle>> {
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| {
            let counter = ViewportCounter::from_config(config)?;
            Ok(CounterActor::new(index, generation, counter, msg_tx.clone()).spawn())
        })
        .collect()
}
