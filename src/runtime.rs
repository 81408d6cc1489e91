use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tracing::debug;

/// What the main loop reacts to: terminal input, a resize, or an idle tick.
#[derive(Clone, Debug)]
pub enum PlaygroundEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

impl PlaygroundEvent {
    /// Map a raw crossterm event; focus changes and pastes are dropped.
    pub fn from_terminal(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(key) => Some(Self::Key(key)),
            CtEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            CtEvent::Resize(..) => Some(Self::Resize),
            _ => None,
        }
    }
}

pub trait EventSource: Send + 'static {
    /// Wait at most `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<PlaygroundEvent, RecvTimeoutError>;
}

/// Events fed through an mpsc channel. Headless tests hold the sender.
pub struct ChannelEventSource {
    rx: Receiver<PlaygroundEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<PlaygroundEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PlaygroundEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Reads the real terminal on a background thread.
///
/// The thread exits when crossterm fails to read or the receiving side is dropped.
pub struct CrosstermEventSource {
    inner: ChannelEventSource,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || loop {
            let raw = match event::read() {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(error = %e, "terminal reader stopped");
                    break;
                }
            };
            let Some(ev) = PlaygroundEvent::from_terminal(raw) else {
                continue;
            };
            if tx.send(ev).is_err() {
                break;
            }
        });
        Self {
            inner: ChannelEventSource::new(rx),
        }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PlaygroundEvent, RecvTimeoutError> {
        self.inner.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

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

/// Pulls one event per call, falling back to `Tick` so game timers keep firing while
/// the user is idle.
pub struct Runner<E: EventSource, T: Ticker> {
    source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(source: E, ticker: T) -> Self {
        Self { source, ticker }
    }

    pub fn step(&self) -> PlaygroundEvent {
        self.source
            .recv_timeout(self.ticker.interval())
            .unwrap_or(PlaygroundEvent::Tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use std::sync::mpsc;

    fn runner(rx: Receiver<PlaygroundEvent>) -> Runner<ChannelEventSource, FixedTicker> {
        Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        )
    }

    #[test]
    fn idle_step_is_a_tick() {
        let (_tx, rx) = mpsc::channel();
        assert!(matches!(runner(rx).step(), PlaygroundEvent::Tick));
    }

    #[test]
    fn queued_input_comes_first() {
        let (tx, rx) = mpsc::channel();
        tx.send(PlaygroundEvent::Key(KeyEvent::new(
            KeyCode::Char('1'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let r = runner(rx);
        match r.step() {
            PlaygroundEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('1')),
            other => panic!("expected a key, got {other:?}"),
        }
        assert!(matches!(r.step(), PlaygroundEvent::Tick));
    }

    #[test]
    fn closed_channel_still_ticks() {
        let (tx, rx) = mpsc::channel::<PlaygroundEvent>();
        drop(tx);
        assert!(matches!(runner(rx).step(), PlaygroundEvent::Tick));
    }

    #[test]
    fn terminal_events_are_translated() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(
            PlaygroundEvent::from_terminal(CtEvent::Mouse(click)),
            Some(PlaygroundEvent::Mouse(m)) if m.column == 3 && m.row == 4
        ));
        assert!(matches!(
            PlaygroundEvent::from_terminal(CtEvent::Resize(80, 24)),
            Some(PlaygroundEvent::Resize)
        ));
        assert!(PlaygroundEvent::from_terminal(CtEvent::FocusGained).is_none());
    }
}
