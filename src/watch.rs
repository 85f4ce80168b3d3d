//! Live config reload.
//!
//! The notify callback only forwards "something changed" pings. A reloader
//! task waits for the burst to settle ([`DEBOUNCE`] after the last ping),
//! reloads the file and hands the result to the logic thread, skipping
//! results identical to the previous one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actors::ActorHandle;
use crate::config::Config;
use crate::tea::Message;
use crate::timer::TimerSlot;
use crate::{flog, flog_debug, flog_warn, Error, Result};

pub const DEBOUNCE: Duration = Duration::from_millis(250);

type Outcome = std::result::Result<Config, String>;

/// Keeps the OS watcher and the reloader task alive.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    reloader: ActorHandle,
}

impl ConfigWatcher {
    pub fn shutdown(&self) {
        self.reloader.shutdown();
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.reloader.shutdown();
    }
}

/// Watch `path` and send `ConfigReloaded` / `ConfigRejected` on changes.
///
/// The parent directory is watched rather than the file, so editors that
/// save by rename keep working. `current` is the config already in use.
pub fn watch(
    path: &Path,
    current: Config,
    msg_tx: mpsc::UnboundedSender<Message>,
) -> Result<ConfigWatcher> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| {
            Error::InvalidConfiguration(format!("not a file path: {}", path.display()))
        })?;

    std::fs::create_dir_all(&dir)?;

    let (change_tx, change_rx) = mpsc::unbounded_channel::<()>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_config_event(&event, &file_name) {
                    let _ = change_tx.send(());
                }
            }
            Err(e) => flog_warn!("Config watcher error: {}", e),
        },
        NotifyConfig::default(),
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    flog!("Watching {} for changes", path.display());
    let reloader = spawn_reloader(path.to_path_buf(), current, change_rx, msg_tx);

    Ok(ConfigWatcher {
        _watcher: watcher,
        reloader,
    })
}

/// Modify or create events that touch the config file itself.
fn is_config_event(event: &Event, file_name: &OsString) -> bool {
    match event.kind {
        EventKind::Modify(_) | EventKind::Create(_) => {}
        _ => return false,
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()))
}

/// Reload after each burst of pings on `change_rx` has been quiet for
/// [`DEBOUNCE`].
pub fn spawn_reloader(
    path: PathBuf,
    current: Config,
    mut change_rx: mpsc::UnboundedReceiver<()>,
    msg_tx: mpsc::UnboundedSender<Message>,
) -> ActorHandle {
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        let mut timer = TimerSlot::new();
        let mut last: Outcome = Ok(current);

        loop {
            tokio::select! {
                biased;

                _ = cancel_clone.cancelled() => {
                    flog_debug!("Config reloader cancelled");
                    break;
                }
                ping = change_rx.recv() => {
                    if ping.is_none() {
                        flog_debug!("Config watcher gone, reloader exiting");
                        break;
                    }
                    // Trailing edge: every ping pushes the reload back
                    timer.once(DEBOUNCE);
                }
                _ = timer.fired() => {
                    let outcome: Outcome = Config::load_from(&path).map_err(|e| e.to_string());
                    if outcome == last {
                        flog_debug!("Config unchanged after reload, skipping");
                        continue;
                    }

                    let msg = match &outcome {
                        Ok(config) => Message::ConfigReloaded(Box::new(config.clone())),
                        Err(e) => {
                            flog_warn!("Config rejected: {}", e);
                            Message::ConfigRejected(e.clone())
                        }
                    };
                    last = outcome;
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            }
        }
    });

    ActorHandle::new(cancel)
}
