use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}

/// Merges terminal input and the refresh timer into one stream.
///
/// The task waits on both at once, so keys are delivered as soon as they
/// arrive while ticks keep their cadence. Changing the tick rate restarts
/// the timer one full period from now.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    rate_tx: mpsc::UnboundedSender<Duration>,
    tick_rate: Duration,
    _task: tokio::task::JoinHandle<()>,
}

fn tick_timer(rate: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + rate, rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let (rate_tx, mut rate_rx) = mpsc::unbounded_channel::<Duration>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut tick_interval = tick_timer(tick_rate);

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    Some(rate) = rate_rx.recv() => {
                        tick_interval = tick_timer(rate);
                    }
                }
            }
        });

        Self {
            rx,
            rate_tx,
            tick_rate,
            _task: task,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn set_tick_rate(&mut self, rate: Duration) {
        if rate == self.tick_rate {
            return;
        }
        self.tick_rate = rate;
        let _ = self.rate_tx.send(rate);
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
