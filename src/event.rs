use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::{mpsc, oneshot, Notify};

use crate::error::Result;

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A periodic tick for status-message expiry.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
///
/// While paused the polling task stops reading the terminal so a foreground
/// child process (the editor) gets every keystroke.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    pause_tx: mpsc::UnboundedSender<oneshot::Sender<()>>,
    resume: Arc<Notify>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (pause_tx, mut pause_rx) = mpsc::unbounded_channel::<oneshot::Sender<()>>();
        let resume = Arc::new(Notify::new());
        let resume_signal = resume.clone();

        tokio::spawn(async move {
            loop {
                if let Ok(ack) = pause_rx.try_recv() {
                    let _ = ack.send(());
                    resume_signal.notified().await;
                    continue;
                }
                let next = match tokio::task::block_in_place(|| event::poll(tick_rate)) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    },
                    Ok(false) => Some(Event::Tick),
                    Err(_) => {
                        tokio::time::sleep(tick_rate).await;
                        Some(Event::Tick)
                    }
                };
                if let Some(ev) = next {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            rx,
            pause_tx,
            resume,
        }
    }

    /// Stop reading terminal input. Returns once the polling task has
    /// finished its current poll and parked, so no later keystroke is read.
    pub async fn pause(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.pause_tx.send(ack_tx).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Resume reading terminal input and drop anything queued before the pause.
    pub fn resume(&mut self) {
        while self.rx.try_recv().is_ok() {}
        self.resume.notify_one();
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
