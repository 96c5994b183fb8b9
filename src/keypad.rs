//! 4x4 matrix keypad scanner.
//!
//! Rows are driven low one at a time, columns are read with pull-ups.
//! A key is reported once per press, after it has been stable for the
//! debounce time.

use core::time::Duration;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::timer::elapsed;

pub const ROWS: usize = 4;
pub const COLS: usize = 4;

pub const KEYMAP: [[char; COLS]; ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Non-blocking key source, polled once per loop iteration.
pub trait KeySource {
    fn poll_key(&mut self, now: Duration) -> Option<char>;
}

pub struct Keypad<R, C> {
    rows: [R; ROWS],
    cols: [C; COLS],
    debounce: Duration,
    candidate: Option<char>,
    since: Duration,
    reported: Option<char>,
}

impl<R: OutputPin, C: InputPin> Keypad<R, C> {
    pub fn new(mut rows: [R; ROWS], cols: [C; COLS], debounce: Duration) -> Self {
        for row in rows.iter_mut() {
            let _ = row.set_high();
        }
        Self {
            rows,
            cols,
            debounce,
            candidate: None,
            since: Duration::ZERO,
            reported: None,
        }
    }

    /// First key found held down, if any.
    fn scan(&mut self) -> Option<char> {
        let mut found = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            if row.set_low().is_err() {
                continue;
            }
            for (c, col) in self.cols.iter_mut().enumerate() {
                if found.is_none() && col.is_low().unwrap_or(false) {
                    found = Some(KEYMAP[r][c]);
                }
            }
            let _ = row.set_high();
            if found.is_some() {
                break;
            }
        }
        found
    }
}

impl<R: OutputPin, C: InputPin> KeySource for Keypad<R, C> {
    fn poll_key(&mut self, now: Duration) -> Option<char> {
        let current = self.scan();
        if current != self.candidate {
            self.candidate = current;
            self.since = now;
            return None;
        }
        if elapsed(now, self.since) < self.debounce || self.reported == current {
            return None;
        }
        self.reported = current;
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Matrix {
        driven_row: Cell<Option<usize>>,
        held: Cell<Option<(usize, usize)>>,
    }

    struct Row(Rc<Matrix>, usize);
    struct Col(Rc<Matrix>, usize);

    impl ErrorType for Row {
        type Error = Infallible;
    }
    impl ErrorType for Col {
        type Error = Infallible;
    }

    impl OutputPin for Row {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.driven_row.set(Some(self.1));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.0.driven_row.get() == Some(self.1) {
                self.0.driven_row.set(None);
            }
            Ok(())
        }
    }

    impl InputPin for Col {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_low()?)
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(match (self.0.held.get(), self.0.driven_row.get()) {
                (Some((r, c)), Some(driven)) => r == driven && c == self.1,
                _ => false,
            })
        }
    }

    fn keypad() -> (Rc<Matrix>, Keypad<Row, Col>) {
        let m = Rc::new(Matrix::default());
        let rows = [0, 1, 2, 3].map(|i| Row(m.clone(), i));
        let cols = [0, 1, 2, 3].map(|i| Col(m.clone(), i));
        (m, Keypad::new(rows, cols, Duration::from_millis(10)))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn idle_matrix_reports_nothing() {
        let (_, mut kp) = keypad();
        assert_eq!(kp.poll_key(ms(0)), None);
        assert_eq!(kp.poll_key(ms(50)), None);
    }

    #[test]
    fn held_key_is_reported_once_after_debounce() {
        let (m, mut kp) = keypad();
        m.held.set(Some((3, 2)));
        assert_eq!(kp.poll_key(ms(0)), None);
        assert_eq!(kp.poll_key(ms(5)), None);
        assert_eq!(kp.poll_key(ms(10)), Some('#'));
        assert_eq!(kp.poll_key(ms(20)), None);
        assert_eq!(kp.poll_key(ms(500)), None);
    }

    #[test]
    fn release_and_press_again_repeats() {
        let (m, mut kp) = keypad();
        m.held.set(Some((1, 1)));
        kp.poll_key(ms(0));
        assert_eq!(kp.poll_key(ms(10)), Some('5'));
        m.held.set(None);
        kp.poll_key(ms(20));
        kp.poll_key(ms(30));
        m.held.set(Some((1, 1)));
        kp.poll_key(ms(40));
        assert_eq!(kp.poll_key(ms(50)), Some('5'));
    }

    #[test]
    fn bounce_shorter_than_debounce_is_ignored() {
        let (m, mut kp) = keypad();
        m.held.set(Some((0, 0)));
        kp.poll_key(ms(0));
        m.held.set(None);
        assert_eq!(kp.poll_key(ms(3)), None);
        assert_eq!(kp.poll_key(ms(30)), None);
    }

    #[test]
    fn keymap_positions() {
        let (m, mut kp) = keypad();
        m.held.set(Some((0, 3)));
        kp.poll_key(ms(0));
        assert_eq!(kp.poll_key(ms(10)), Some('A'));
    }
}
