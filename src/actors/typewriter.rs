//! Typewriter actor: drives a [`Typewriter`] from a single-slot timer.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tea::Message;
use crate::timer::TimerSlot;
use crate::typewriter::{Typewriter, TypewriterConfig};
use crate::{flog_debug, flog_trace, flog_warn, Error, Result};

use super::ActorHandle;

/// Actor that ticks the typewriter and reports every frame.
pub struct TypewriterActor {
    typewriter: Typewriter,
    msg_tx: mpsc::UnboundedSender<Message>,
}

/// Running typewriter: shutdown plus live reconfiguration.
pub struct TypewriterHandle {
    actor: ActorHandle,
    config_tx: mpsc::UnboundedSender<TypewriterConfig>,
}

impl TypewriterHandle {
    /// Restart the animation with `config`. Any tick already scheduled is
    /// cancelled before the new one is armed.
    pub fn reconfigure(&self, config: TypewriterConfig) -> Result<()> {
        self.config_tx
            .send(config)
            .map_err(|_| Error::ChannelClosed("typewriter actor".to_string()))
    }

    pub fn shutdown(&self) {
        self.actor.shutdown();
    }

    pub fn is_cancelled(&self) -> bool {
        self.actor.is_cancelled()
    }
}

impl TypewriterActor {
    pub fn new(typewriter: Typewriter, msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { typewriter, msg_tx }
    }

    pub fn spawn(self) -> TypewriterHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        let (config_tx, mut config_rx) = mpsc::unbounded_channel::<TypewriterConfig>();

        flog_debug!(
            "TypewriterActor::spawn words={}",
            self.typewriter.word_count()
        );

        let TypewriterActor {
            mut typewriter,
            msg_tx,
        } = self;

        tokio::spawn(async move {
            let mut timer = TimerSlot::new();
            timer.once(typewriter.remaining());

            loop {
                tokio::select! {
                    biased;

                    _ = cancel_clone.cancelled() => {
                        flog_debug!("TypewriterActor cancelled");
                        typewriter.dispose();
                        break;
                    }
                    config = config_rx.recv() => {
                        let Some(config) = config else {
                            flog_debug!("TypewriterActor: handle dropped");
                            typewriter.dispose();
                            break;
                        };
                        match typewriter.reconfigure(config) {
                            Ok(delay) => {
                                flog_debug!(
                                    "TypewriterActor reconfigured, first tick in {:?}",
                                    delay
                                );
                                timer.cancel();
                                timer.once(delay);
                            }
                            Err(e) => {
                                flog_warn!("TypewriterActor: keeping old config: {}", e);
                            }
                        }
                    }
                    _ = timer.fired() => {
                        if cancel_clone.is_cancelled() {
                            typewriter.dispose();
                            break;
                        }

                        let delay = typewriter.tick();
                        flog_trace!(
                            "TypewriterActor tick text={:?} phase={}",
                            typewriter.text(),
                            typewriter.phase().label()
                        );

                        let frame = Message::TypewriterFrame {
                            text: typewriter.text().to_string(),
                            word_index: typewriter.word_index(),
                            phase: typewriter.phase(),
                        };
                        if msg_tx.send(frame).is_err() {
                            flog_debug!("TypewriterActor: message channel closed");
                            typewriter.dispose();
                            break;
                        }
                        timer.once(delay);
                    }
                }
            }
        });

        TypewriterHandle {
            actor: ActorHandle::new(cancel),
            config_tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typewriter::Phase;
    use std::time::Duration;
    use tokio::time::Instant;

    fn frames(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<(String, Phase)> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Message::TypewriterFrame { text, phase, .. } = msg {
                out.push((text, phase));
            }
        }
        out
    }

    fn spawn(
        words: &[&str],
        speed: u64,
        pause: u64,
    ) -> (TypewriterHandle, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = TypewriterConfig::new(words.iter().copied(), speed, pause);
        let tw = Typewriter::new(config).unwrap();
        (TypewriterActor::new(tw, tx).spawn(), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_types_one_grapheme_per_tick() {
        let (handle, mut rx) = spawn(&["Hi", "NLP"], 100, 1000);

        let start = Instant::now();
        let mut texts = Vec::new();
        while texts.len() < 2 {
            if let Some(Message::TypewriterFrame { text, .. }) = rx.recv().await {
                texts.push(text);
            }
        }
        assert_eq!(texts, vec!["H", "Hi"]);
        assert_eq!(start.elapsed(), Duration::from_millis(200));
        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cycle_timing() {
        let (handle, mut rx) = spawn(&["ab"], 100, 500);

        // 2 typing ticks, then the pause tick 500ms later, then 2 deletes at 50ms
        tokio::time::sleep(Duration::from_millis(200 + 500 + 100 + 1)).await;
        let seen = frames(&mut rx);
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), Phase::Typing),
                ("ab".to_string(), Phase::PausingAfterTyped),
                ("ab".to_string(), Phase::Deleting),
                ("a".to_string(), Phase::Deleting),
                ("".to_string(), Phase::Typing),
            ]
        );
        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconfigure_restarts_from_scratch() {
        let (handle, mut rx) = spawn(&["Vision"], 100, 1000);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(frames(&mut rx).len(), 3);

        handle
            .reconfigure(TypewriterConfig::new(["Go"], 40, 300))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(41)).await;

        // The old 100ms tick was cancelled; only the new config ticks
        let seen = frames(&mut rx);
        assert_eq!(seen, vec![("G".to_string(), Phase::Typing)]);
        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_reconfigure_keeps_running() {
        let (handle, mut rx) = spawn(&["abc"], 100, 1000);

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle
            .reconfigure(TypewriterConfig::new(Vec::<String>::new(), 100, 1000))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let texts: Vec<String> = frames(&mut rx).into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["a", "ab"]);
        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_frames() {
        let (handle, mut rx) = spawn(&["abc"], 100, 1000);
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.shutdown();
        assert!(handle.is_cancelled());

        // Drain what was sent before shutdown; the task then drops its sender
        frames(&mut rx);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_frames() {
        let (handle, mut rx) = spawn(&["abc"], 100, 1000);
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(handle);

        frames(&mut rx);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(frames(&mut rx).is_empty());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconfigure_after_exit_fails() {
        let (handle, rx) = spawn(&["abc"], 100, 1000);
        drop(rx);
        // The first send fails and the actor exits
        tokio::time::sleep(Duration::from_millis(200)).await;
        let err = handle
            .reconfigure(TypewriterConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::ChannelClosed(_)));
    }
}
