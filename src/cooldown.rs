use std::time::{Duration, Instant};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// A flex was seen while idle; detection is suppressed until reset.
    Detected,
    /// The suppression window elapsed.
    Reset,
    /// Nothing was seen while idle.
    NotDetected,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Until(Instant),
    /// The window reaches past the latest representable instant.
    Forever,
}

/// Suppresses repeat detections for a fixed window after each positive one.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    state: State,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: State::Idle,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_cooling_down(&self) -> bool {
        self.state != State::Idle
    }

    /// Feed one frame's result observed at `now`.
    ///
    /// Returns no events while a detection is being suppressed. A frame that
    /// arrives once the window has elapsed reports the reset and is then
    /// evaluated like any idle frame.
    pub fn observe(&mut self, flexed: bool, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();
        match self.state {
            State::Idle => {}
            State::Until(until) if now >= until => {
                self.state = State::Idle;
                events.push(Event::Reset);
            }
            State::Until(_) | State::Forever => return events,
        }

        if !flexed {
            events.push(Event::NotDetected);
            return events;
        }

        if !self.window.is_zero() {
            self.state = match now.checked_add(self.window) {
                Some(until) => State::Until(until),
                None => State::Forever,
            };
        }
        events.push(Event::Detected);
        events
    }
}
