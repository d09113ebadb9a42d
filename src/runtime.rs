use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use log::debug;

use crate::dictionary::{DictionaryChecker, DictionaryError, WordValidity};
use crate::session::PendingCheck;

/// Unified event type consumed by the game loop.
///
/// Everything that can mutate the session arrives here: keyboard input,
/// timer ticks, and dictionary verdicts. A single consumer drains the
/// queue, so no two state mutations can interleave.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    Verdict {
        generation: u64,
        verdict: Result<WordValidity, DictionaryError>,
    },
}

/// Source of game events for the main loop.
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if one arrives before the timeout, or Err(Timeout)
    /// if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Event source draining a shared channel. Production code hands the
/// sending half to the terminal reader and the dictionary worker; tests
/// feed it directly.
pub struct ChannelEventSource {
    rx: Receiver<GameEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Spawn the thread that forwards terminal events into the shared channel.
pub fn spawn_terminal_reader(tx: Sender<GameEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(GameEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(GameEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

/// Runs dictionary checks off the main loop.
///
/// Each request carries its generation tag; the verdict re-enters the
/// shared event channel, so it is ordered with every tick and keypress and
/// the session can discard it if the round has moved on. There is no
/// cancellation: an abandoned check simply resolves to a stale verdict.
pub struct DictionaryWorker {
    req_tx: Sender<PendingCheck>,
}

impl DictionaryWorker {
    pub fn spawn(events: Sender<GameEvent>, checker: Arc<dyn DictionaryChecker>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<PendingCheck>();

        thread::spawn(move || {
            while let Ok(check) = req_rx.recv() {
                debug!("checking \"{}\"", check.word);
                let verdict = checker.check(&check.word);
                let sent = events.send(GameEvent::Verdict {
                    generation: check.generation,
                    verdict,
                });
                if sent.is_err() {
                    break;
                }
            }
        });

        Self { req_tx }
    }

    /// Queue a check; the verdict arrives later as a `GameEvent::Verdict`.
    pub fn request(&self, check: PendingCheck) {
        let _ = self.req_tx.send(check);
    }
}

/// Configurable ticker interface.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the game one event/tick at a time.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick
    /// on timeout.
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}
