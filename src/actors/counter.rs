//! Counter actor: one per on-page counter.
//!
//! Sits idle until the logic thread reports the counter on screen, then runs
//! the 50-step count-up on a repeating [`TimerSlot`] and exits once the target
//! is shown. Visibility changes after the start are ignored.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::counter::{Trigger, ViewportCounter, TICK_INTERVAL};
use crate::tea::Message;
use crate::timer::TimerSlot;
use crate::{flog_debug, Error, Result};

use super::ActorHandle;

pub struct CounterActor {
    index: usize,
    generation: u64,
    counter: ViewportCounter,
    msg_tx: mpsc::UnboundedSender<Message>,
}

pub struct CounterHandle {
    actor: ActorHandle,
    visibility_tx: mpsc::UnboundedSender<bool>,
}

impl CounterHandle {
    /// Forward a visibility transition. Fails once the actor has finished.
    pub fn notify_visibility(&self, visible: bool) -> Result<()> {
        self.visibility_tx
            .send(visible)
            .map_err(|_| Error::ChannelClosed("counter actor".to_string()))
    }

    pub fn shutdown(&self) {
        self.actor.shutdown();
    }

    pub fn is_cancelled(&self) -> bool {
        self.actor.is_cancelled()
    }
}

impl CounterActor {
    pub fn new(
        index: usize,
        generation: u64,
        counter: ViewportCounter,
        msg_tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            index,
            generation,
            counter,
            msg_tx,
        }
    }

    pub fn spawn(self) -> CounterHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        let (visibility_tx, mut visibility_rx) = mpsc::unbounded_channel::<bool>();

        let CounterActor {
            index,
            generation,
            mut counter,
            msg_tx,
        } = self;

        flog_debug!(
            "CounterActor::spawn index={} gen={} target={}",
            index,
            generation,
            counter.target()
        );

        let frame = move |counter: &ViewportCounter| Message::CounterFrame {
            generation,
            index,
            value: counter.value(),
            done: counter.is_done(),
        };

        tokio::spawn(async move {
            let mut timer = TimerSlot::new();

            loop {
                tokio::select! {
                    biased;

                    _ = cancel_clone.cancelled() => {
                        flog_debug!("CounterActor {} cancelled", index);
                        counter.dispose();
                        break;
                    }
                    visible = visibility_rx.recv() => {
                        let Some(visible) = visible else {
                            flog_debug!("CounterActor {}: handle dropped", index);
                            counter.dispose();
                            break;
                        };
                        match counter.on_visibility_changed(visible) {
                            Trigger::Ignored => {}
                            Trigger::Started => {
                                flog_debug!("CounterActor {} started", index);
                                timer.every(TICK_INTERVAL);
                            }
                            Trigger::Completed => {
                                flog_debug!("CounterActor {} completed immediately", index);
                                let _ = msg_tx.send(frame(&counter));
                                break;
                            }
                        }
                    }
                    _ = timer.fired() => {
                        if cancel_clone.is_cancelled() {
                            counter.dispose();
                            break;
                        }

                        let done = counter.tick();
                        if msg_tx.send(frame(&counter)).is_err() {
                            counter.dispose();
                            break;
                        }
                        if done {
                            flog_debug!(
                                "CounterActor {} done after {} ticks",
                                index,
                                counter.ticks()
                            );
                            timer.cancel();
                            break;
                        }
                    }
                }
            }
        });

        CounterHandle {
            actor: ActorHandle::new(cancel),
            visibility_tx,
        }
    }
}
