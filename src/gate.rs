//! Keypad PIN gate in front of the UI.
//!
//! The PIN is compared in plaintext with no retry limit and no lockout.

use core::fmt;

use anyhow::{bail, Result};
use heapless::Vec;

pub const PIN_LEN: usize = 4;

/// A single numeric key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn from_key(key: char) -> Option<Self> {
        key.is_ascii_digit().then(|| Digit(key as u8))
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

/// The configured secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AccessPin([u8; PIN_LEN]);

impl AccessPin {
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != PIN_LEN || !bytes.iter().all(u8::is_ascii_digit) {
            bail!("access PIN must be exactly {PIN_LEN} digits");
        }
        let mut pin = [0u8; PIN_LEN];
        pin.copy_from_slice(bytes);
        Ok(Self(pin))
    }
}

// keep the secret out of logs
impl fmt::Debug for AccessPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessPin(****)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Digit stored; echo a mask at `position` (0-based).
    Pending { position: usize },
    Granted,
    Denied,
}

#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
    entered: Vec<u8, PIN_LEN>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn entered_len(&self) -> usize {
        self.entered.len()
    }
}

#[derive(Debug)]
pub struct AccessGate {
    pin: AccessPin,
    session: Session,
}

impl AccessGate {
    /// Starts locked.
    pub fn new(pin: AccessPin) -> Self {
        Self {
            pin,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    pub fn submit_digit(&mut self, digit: Digit) -> GateOutcome {
        // Never full here: the 4th digit always resolves and clears below.
        let _ = self.session.entered.push(digit.0);

        if self.session.entered.len() < PIN_LEN {
            return GateOutcome::Pending {
                position: self.session.entered.len() - 1,
            };
        }

        let matched = self.session.entered.as_slice() == self.pin.0.as_slice();
        self.session.entered.clear();
        if matched {
            self.session.authenticated = true;
            GateOutcome::Granted
        } else {
            self.session.authenticated = false;
            GateOutcome::Denied
        }
    }

    pub fn lock(&mut self) {
        self.session.authenticated = false;
        self.session.entered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(AccessPin::parse("2233").unwrap())
    }

    fn enter(gate: &mut AccessGate, code: &str) -> GateOutcome {
        let mut last = None;
        for c in code.chars() {
            last = Some(gate.submit_digit(Digit::from_key(c).unwrap()));
        }
        last.unwrap()
    }

    #[test]
    fn parse_rejects_bad_pins() {
        assert!(AccessPin::parse("123").is_err());
        assert!(AccessPin::parse("12345").is_err());
        assert!(AccessPin::parse("12a4").is_err());
        assert!(AccessPin::parse("0000").is_ok());
    }

    #[test]
    fn debug_does_not_leak_pin() {
        let pin = AccessPin::parse("2233").unwrap();
        assert!(!format!("{pin:?}").contains("2233"));
    }

    #[test]
    fn only_numeric_keys_are_digits() {
        assert!(Digit::from_key('7').is_some());
        for key in ['A', 'D', '*', '#'] {
            assert!(Digit::from_key(key).is_none());
        }
    }

    #[test]
    fn correct_pin_grants_on_fourth_digit() {
        let mut g = gate();
        assert_eq!(
            g.submit_digit(Digit::from_key('2').unwrap()),
            GateOutcome::Pending { position: 0 }
        );
        assert_eq!(
            g.submit_digit(Digit::from_key('2').unwrap()),
            GateOutcome::Pending { position: 1 }
        );
        assert_eq!(
            g.submit_digit(Digit::from_key('3').unwrap()),
            GateOutcome::Pending { position: 2 }
        );
        assert!(!g.is_authenticated());
        assert_eq!(
            g.submit_digit(Digit::from_key('3').unwrap()),
            GateOutcome::Granted
        );
        assert!(g.is_authenticated());
        assert_eq!(g.session().entered_len(), 0);
    }

    #[test]
    fn every_other_pin_is_denied() {
        let mut g = gate();
        for n in 0..10_000u32 {
            let code = format!("{n:04}");
            if code == "2233" {
                continue;
            }
            assert_eq!(enter(&mut g, &code), GateOutcome::Denied, "{code}");
            assert!(!g.is_authenticated());
            assert_eq!(g.session().entered_len(), 0);
        }
    }

    #[test]
    fn no_lockout_after_failures() {
        let mut g = gate();
        for _ in 0..50 {
            assert_eq!(enter(&mut g, "9999"), GateOutcome::Denied);
        }
        assert_eq!(enter(&mut g, "2233"), GateOutcome::Granted);
    }

    #[test]
    fn lock_clears_session() {
        let mut g = gate();
        enter(&mut g, "2233");
        enter(&mut g, "12");
        g.lock();
        assert!(!g.is_authenticated());
        assert_eq!(g.session().entered_len(), 0);
    }
}
