use core::time::Duration;

use crate::config::{DOUBLE_TAP_WINDOW, LOCK_KEY, SCREEN_NEXT_KEY};
use crate::timer::elapsed;

/// What an unlocked key press asks the UI to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    NextScreen,
    Lock,
}

/// Turns single key events into UI gestures while unlocked.
/// Remembers only the previous key, so any other key between two
/// lock-key presses breaks the double tap.
#[derive(Debug, Default)]
pub struct InputController {
    last: Option<(char, Duration)>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpret(&mut self, key: char, now: Duration) -> Option<UiCommand> {
        let previous = self.last.replace((key, now));

        if key == SCREEN_NEXT_KEY {
            return Some(UiCommand::NextScreen);
        }
        if key == LOCK_KEY {
            if let Some((LOCK_KEY, at)) = previous {
                if elapsed(now, at) < DOUBLE_TAP_WINDOW {
                    self.last = None;
                    return Some(UiCommand::Lock);
                }
            }
        }
        None
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
