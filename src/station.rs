//! Top-level controller: owns the session, the UI cursor and every
//! peripheral, and advances them one step per loop iteration.

use core::time::Duration;
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError};

use anyhow::Result;
use log::{debug, info, warn};

use crate::alarm::{Alarm, Buzzer};
use crate::config::{BOOT_BANNER, MESSAGE_HOLD};
use crate::display::{self, CharDisplay, ScreenCursor};
use crate::gate::{AccessGate, AccessPin, Digit, GateOutcome};
use crate::input::{InputController, UiCommand};
use crate::keypad::KeySource;
use crate::sensor::{self, Reading, SensorBank};
use crate::timer::Deadline;
use crate::web;

/// A `/data` request forwarded from the HTTP server; answered with the
/// rendered fragment.
pub struct DataRequest {
    pub reply: SyncSender<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AfterHold {
    Prompt,
    Unlocked,
}

pub struct Station<S, D, K, B> {
    sensors: S,
    lcd: D,
    keys: K,
    buzzer: B,
    gate: AccessGate,
    input: InputController,
    cursor: ScreenCursor,
    alarm: Alarm,
    // a timed message on the LCD; keys are not consumed until it expires
    hold: Option<(Deadline, AfterHold)>,
}

impl<S, D, K, B> Station<S, D, K, B>
where
    S: SensorBank,
    D: CharDisplay,
    K: KeySource,
    B: Buzzer,
{
    pub fn new(pin: AccessPin, sensors: S, lcd: D, keys: K, buzzer: B) -> Self {
        Self {
            sensors,
            lcd,
            keys,
            buzzer,
            gate: AccessGate::new(pin),
            input: InputController::new(),
            cursor: ScreenCursor::new(),
            alarm: Alarm::new(),
            hold: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn cursor(&self) -> &ScreenCursor {
        &self.cursor
    }

    pub fn display(&self) -> &D {
        &self.lcd
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }

    /// Shows the access point address, then the PIN prompt.
    pub fn boot(&mut self, ip: &str, now: Duration) -> Result<()> {
        display::show(&mut self.lcd, &["AP Mode Started", ip])?;
        self.hold = Some((Deadline::after(now, BOOT_BANNER), AfterHold::Prompt));
        Ok(())
    }

    /// One pass of the UI: alarm, timed messages, then either PIN entry
    /// or keypad gestures plus LCD refresh.
    pub fn step(&mut self, now: Duration) -> Result<()> {
        if let Err(e) = self.alarm.service(&mut self.buzzer, now) {
            warn!("buzzer: {e:#}");
        }

        if let Some((deadline, then)) = self.hold {
            if !deadline.is_reached(now) {
                return Ok(());
            }
            self.hold = None;
            match then {
                AfterHold::Prompt => self.prompt()?,
                AfterHold::Unlocked => {
                    self.lcd.clear()?;
                    self.cursor.reset(now);
                }
            }
        }

        if self.gate.is_authenticated() {
            self.unlocked_step(now)
        } else {
            self.locked_step(now)
        }
    }

    fn locked_step(&mut self, now: Duration) -> Result<()> {
        let Some(digit) = self.keys.poll_key(now).and_then(Digit::from_key) else {
            return Ok(());
        };

        match self.gate.submit_digit(digit) {
            GateOutcome::Pending { position } => {
                self.lcd.write_at(position as u8, 1, "*")?;
            }
            GateOutcome::Granted => {
                info!("access granted");
                display::show(&mut self.lcd, &["Access Granted"])?;
                self.hold = Some((Deadline::after(now, MESSAGE_HOLD), AfterHold::Unlocked));
            }
            GateOutcome::Denied => {
                warn!("wrong PIN entered");
                display::show(&mut self.lcd, &["Wrong Password"])?;
                self.hold = Some((Deadline::after(now, MESSAGE_HOLD), AfterHold::Prompt));
            }
        }
        Ok(())
    }

    fn unlocked_step(&mut self, now: Duration) -> Result<()> {
        if let Some(key) = self.keys.poll_key(now) {
            match self.input.interpret(key, now) {
                Some(UiCommand::NextScreen) => {
                    self.cursor.advance();
                    debug!("screen -> {:?}", self.cursor.screen());
                }
                Some(UiCommand::Lock) => {
                    info!("locked by double tap");
                    return self.lock();
                }
                None => {}
            }
        }

        display::render(&mut self.cursor, &mut self.lcd, &mut self.sensors, now)?;
        Ok(())
    }

    pub fn lock(&mut self) -> Result<()> {
        self.gate.lock();
        self.input.reset();
        self.hold = None;
        self.prompt()
    }

    fn prompt(&mut self) -> Result<()> {
        display::show(&mut self.lcd, &["Enter Password:"])
    }

    /// Fresh sample of all sensors, independent of what the LCD shows.
    pub fn read_sensors(&mut self) -> Reading {
        sensor::sample(&mut self.sensors)
    }

    pub fn sound_alarm(&mut self, now: Duration) {
        if let Err(e) = self.alarm.trigger(&mut self.buzzer, now) {
            warn!("buzzer: {e:#}");
        }
    }

    /// `/data`: renders a fresh reading and, while smoke is detected,
    /// pulses the alarm. Reading the endpoint is therefore not side-effect free.
    pub fn serve_data(&mut self, now: Duration) -> String {
        let reading = self.read_sensors();
        let html = web::render_fragment(&reading);
        if reading.smoke_detected {
            self.sound_alarm(now);
        }
        html
    }

    /// Answers every `/data` request queued since the last call.
    /// Returns how many were answered.
    pub fn answer_pending(&mut self, requests: &Receiver<DataRequest>, now: Duration) -> usize {
        let mut answered = 0;
        loop {
            match requests.try_recv() {
                Ok(req) => {
                    let html = self.serve_data(now);
                    if req.reply.send(html).is_err() {
                        debug!("/data client gave up before the reply");
                    }
                    answered += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return answered,
            }
        }
    }
}
