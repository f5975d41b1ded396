//! Button debouncing

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::MonotonicInstant;

/// Default debounce window for mechanical push buttons
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(80);

/// Per-input debouncer turning raw level samples into press events
///
/// Each input keeps its own state, keyed by an explicit identifier.
/// A level change is accepted only if the previous accepted change on the
/// same input is older than the debounce window.
#[derive(Debug)]
pub struct Debouncer<K> {
    window: Duration,
    inputs: HashMap<K, InputState>,
}

#[derive(Debug, Clone, Copy)]
struct InputState {
    pressed: bool,
    last_change: Option<MonotonicInstant>,
}

impl<K: Copy + Eq + Hash> Debouncer<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            inputs: HashMap::new(),
        }
    }

    /// Feed a raw level sample for `input`.
    ///
    /// Returns `true` exactly once per accepted rising edge (released -> pressed).
    pub fn sample(&mut self, input: K, pressed: bool, now: MonotonicInstant) -> bool {
        let state = self.inputs.entry(input).or_insert(InputState {
            pressed: false,
            last_change: None,
        });

        if pressed == state.pressed {
            return false;
        }

        let settled = match state.last_change {
            Some(last) => now.saturating_duration_since(last) > self.window,
            None => true,
        };
        if !settled {
            return false;
        }

        state.pressed = pressed;
        state.last_change = Some(now);
        pressed
    }

    /// Current debounced level of `input`
    pub fn is_pressed(&self, input: K) -> bool {
        self.inputs.get(&input).is_some_and(|s| s.pressed)
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl<K: Copy + Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Input {
        A,
        B,
    }

    #[test]
    fn test_first_press_is_reported_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(80));
        let t0 = MonotonicInstant::now();

        assert!(debouncer.sample(Input::A, true, t0));
        // Held down: no repeat
        assert!(!debouncer.sample(Input::A, true, t0 + Duration::from_millis(500)));
        assert!(debouncer.is_pressed(Input::A));
    }

    #[test]
    fn test_bounce_inside_window_is_ignored() {
        let mut debouncer = Debouncer::new(Duration::from_millis(80));
        let t0 = MonotonicInstant::now();

        assert!(debouncer.sample(Input::A, true, t0));
        // Contact bounce 10ms later
        assert!(!debouncer.sample(Input::A, false, t0 + Duration::from_millis(10)));
        assert!(!debouncer.sample(Input::A, true, t0 + Duration::from_millis(20)));
        assert!(debouncer.is_pressed(Input::A));

        // Proper release and second press
        assert!(!debouncer.sample(Input::A, false, t0 + Duration::from_millis(100)));
        assert!(!debouncer.is_pressed(Input::A));
        assert!(debouncer.sample(Input::A, true, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_release_is_never_a_press() {
        let mut debouncer = Debouncer::new(Duration::from_millis(80));
        let t0 = MonotonicInstant::now();

        assert!(!debouncer.sample(Input::A, false, t0));
        assert!(debouncer.sample(Input::A, true, t0 + Duration::from_millis(100)));
        assert!(!debouncer.sample(Input::A, false, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_inputs_are_independent() {
        let mut debouncer = Debouncer::new(Duration::from_millis(80));
        let t0 = MonotonicInstant::now();

        assert!(debouncer.sample(Input::A, true, t0));
        assert!(debouncer.sample(Input::B, true, t0 + Duration::from_millis(5)));
        assert!(debouncer.is_pressed(Input::A));
        assert!(debouncer.is_pressed(Input::B));

        // Releasing A does not affect B
        assert!(!debouncer.sample(Input::A, false, t0 + Duration::from_millis(100)));
        assert!(debouncer.is_pressed(Input::B));
    }
}
