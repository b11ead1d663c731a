//! Keyboard input for the hivecheck TUI.
//!
//! Keys are translated into a synthetic pointer-delta stream: arrows nudge the
//! card, Enter/Space release it, `h`/`l` swipe it away in one step.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use hivecheck_engine::{Direction, ReleaseOutcome, Session};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Horizontal/vertical nudge per arrow key, as a fraction of the viewport width.
pub const NUDGE_RATIO: f32 = 0.10;
/// Drag distance of a quick swipe, as a fraction of the viewport width.
pub const QUICK_SWIPE_RATIO: f32 = 0.50;

enum InputMsg {
    Event(Event),
    Error(String),
}

/// What a key asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    /// Move the pointer by a fraction of the viewport width.
    Nudge { dx_ratio: f32, dy_ratio: f32 },
    Release,
    QuickSwipe(Direction),
    Stop,
}

#[must_use]
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    let action = match key.code {
        KeyCode::Left => KeyAction::Nudge {
            dx_ratio: -NUDGE_RATIO,
            dy_ratio: 0.0,
        },
        KeyCode::Right => KeyAction::Nudge {
            dx_ratio: NUDGE_RATIO,
            dy_ratio: 0.0,
        },
        KeyCode::Up => KeyAction::Nudge {
            dx_ratio: 0.0,
            dy_ratio: -NUDGE_RATIO,
        },
        KeyCode::Down => KeyAction::Nudge {
            dx_ratio: 0.0,
            dy_ratio: NUDGE_RATIO,
        },
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Release,
        KeyCode::Char('h') => KeyAction::QuickSwipe(Direction::Left),
        KeyCode::Char('l') => KeyAction::QuickSwipe(Direction::Right),
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Stop,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Stop,
        _ => return None,
    };
    Some(action)
}

/// Accumulated drag of the synthetic pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDriver {
    dx: f32,
    dy: f32,
}

impl PointerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    /// Feed one action to the session. Returns `true` when the user asked to
    /// stop.
    pub fn apply(&mut self, action: KeyAction, session: &mut Session) -> bool {
        let width = session.stack().config().viewport_width;
        match action {
            KeyAction::Nudge { dx_ratio, dy_ratio } => {
                let (dx, dy) = (self.dx + dx_ratio * width, self.dy + dy_ratio * width);
                if session.pointer_move(dx, dy) {
                    self.dx = dx;
                    self.dy = dy;
                }
                false
            }
            KeyAction::Release => {
                self.release(session, self.dx, self.dy);
                false
            }
            KeyAction::QuickSwipe(direction) => {
                let dx = direction.sign() * QUICK_SWIPE_RATIO * width;
                if session.pointer_move(dx, self.dy) {
                    self.release(session, dx, self.dy);
                }
                false
            }
            KeyAction::Stop => true,
        }
    }

    fn release(&mut self, session: &mut Session, dx: f32, dy: f32) {
        let outcome = session.pointer_release(dx, dy);
        if outcome != ReleaseOutcome::Ignored {
            debug!(?outcome, dx, dy, "Pointer released");
            *self = Self::default();
        }
    }
}

/// Reads terminal events on a blocking thread and hands them to the event loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Wait for the next key press.
    pub async fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            match self.rx.recv().await {
                Some(InputMsg::Event(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    return Ok(key);
                }
                Some(InputMsg::Event(_)) => {}
                Some(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
                None => return Err(anyhow!("input pump disconnected")),
            }
        }
    }

    pub async fn shutdown(&mut self) {
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending key events into the session. Returns `true` when the user
/// asked to stop.
pub fn handle_events(
    session: &mut Session,
    driver: &mut PointerDriver,
    input: &mut InputPump,
) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        processed += 1;

        let Event::Key(key) = ev else {
            continue;
        };
        if let Some(action) = map_key(&key)
            && driver.apply(action, session)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use hivecheck_engine::{GestureConfig, GesturePhase, Item, Label, ReviewerName};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session() -> Session {
        Session::timed(
            ReviewerName::new("Ann").unwrap(),
            30,
            GestureConfig::for_viewport(100.0),
            [
                Item::new("a", "a.jpg", Label::Healthy),
                Item::new("b", "b.jpg", Label::Unhealthy),
            ],
        )
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(
            map_key(&press(KeyCode::Left)),
            Some(KeyAction::Nudge {
                dx_ratio: -NUDGE_RATIO,
                dy_ratio: 0.0
            })
        );
        assert_eq!(map_key(&press(KeyCode::Enter)), Some(KeyAction::Release));
        assert_eq!(
            map_key(&press(KeyCode::Char('l'))),
            Some(KeyAction::QuickSwipe(Direction::Right))
        );
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(KeyAction::Stop));
        assert_eq!(map_key(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn three_nudges_then_release_commits() {
        let mut session = session();
        let mut driver = PointerDriver::new();
        for _ in 0..3 {
            driver.apply(map_key(&press(KeyCode::Right)).unwrap(), &mut session);
        }
        assert!((driver.position().0 - 30.0).abs() < 1e-3);

        driver.apply(KeyAction::Release, &mut session);
        assert_eq!(
            session.stack().phase(),
            GesturePhase::Committing(Direction::Right)
        );
        assert_eq!(driver.position(), (0.0, 0.0));
    }

    #[test]
    fn two_nudges_then_release_cancels() {
        let mut session = session();
        let mut driver = PointerDriver::new();
        driver.apply(map_key(&press(KeyCode::Left)).unwrap(), &mut session);
        driver.apply(map_key(&press(KeyCode::Left)).unwrap(), &mut session);
        driver.apply(KeyAction::Release, &mut session);
        assert_eq!(session.stack().phase(), GesturePhase::Cancelling);
    }

    #[test]
    fn quick_swipe_commits_in_one_step() {
        let mut session = session();
        let mut driver = PointerDriver::new();
        driver.apply(KeyAction::QuickSwipe(Direction::Left), &mut session);
        assert_eq!(
            session.stack().phase(),
            GesturePhase::Committing(Direction::Left)
        );
        let events = session.finish_animation();
        assert_eq!(events.len(), 1);
        assert_eq!(session.score().reviewed, 1);
    }

    #[test]
    fn nudges_during_animation_do_not_accumulate() {
        let mut session = session();
        let mut driver = PointerDriver::new();
        driver.apply(KeyAction::QuickSwipe(Direction::Right), &mut session);
        driver.apply(map_key(&press(KeyCode::Right)).unwrap(), &mut session);
        assert_eq!(driver.position(), (0.0, 0.0));
    }

    #[test]
    fn stop_is_reported() {
        let mut session = session();
        let mut driver = PointerDriver::new();
        assert!(driver.apply(KeyAction::Stop, &mut session));
    }
}
