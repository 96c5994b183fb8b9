use core::time::Duration;

use anyhow::Result;

use crate::config::{ALARM_HZ, ALARM_PULSE};
use crate::timer::Deadline;

/// Piezo output.
pub trait Buzzer {
    fn start_tone(&mut self, hz: u32) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Fixed-pitch, fixed-length alarm pulse. The tone is switched off by
/// `service` from the control loop, so triggering never blocks.
#[derive(Debug, Default)]
pub struct Alarm {
    until: Option<Deadline>,
}

impl Alarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sounding(&self) -> bool {
        self.until.is_some()
    }

    /// Starts a pulse, or extends the running one.
    pub fn trigger<B: Buzzer + ?Sized>(&mut self, buzzer: &mut B, now: Duration) -> Result<()> {
        if self.until.is_none() {
            buzzer.start_tone(ALARM_HZ)?;
        }
        self.until = Some(Deadline::after(now, ALARM_PULSE));
        Ok(())
    }

    pub fn service<B: Buzzer + ?Sized>(&mut self, buzzer: &mut B, now: Duration) -> Result<()> {
        match self.until {
            Some(deadline) if deadline.is_reached(now) => {
                self.until = None;
                buzzer.stop()
            }
            _ => Ok(()),
        }
    }
}
